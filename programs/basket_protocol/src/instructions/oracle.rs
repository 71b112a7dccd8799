use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};

use crate::{
    draw::resolve_request,
    errors::BasketError,
    events::RandomnessFulfilled,
    utils::{assert_ed25519_ix_matches, expected_randomness_msg},
    FulfillRandomness,
};

#[cfg(feature = "mock-randomness")]
use crate::FulfillRandomnessMock;

// Tx layout must be: [ ed25519_verify, fulfill_randomness ]
pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    request_id: u64,
    value: [u8; 32],
) -> Result<()> {
    let broker_key = ctx.accounts.broker.key();
    let oracle_pubkey = ctx.accounts.broker.oracle_pubkey;
    require!(oracle_pubkey != Pubkey::default(), BasketError::OracleNotSet);

    let current_slot = Clock::get()?.slot;

    // --- ed25519 introspection ---
    let ix_sys = ctx.accounts.instructions.to_account_info();
    let current_ix = load_current_index_checked(&ix_sys)? as usize;
    require!(current_ix >= 1, BasketError::MissingOrInvalidEd25519Ix);

    let ed_ix = load_instruction_at_checked(current_ix - 1, &ix_sys)
        .map_err(|_| error!(BasketError::MissingOrInvalidEd25519Ix))?;

    let expected = expected_randomness_msg(
        ctx.program_id,
        &broker_key,
        request_id,
        &ctx.accounts.request.correlation,
        &value,
    );
    assert_ed25519_ix_matches(&ed_ix, &oracle_pubkey, expected.as_slice())?;

    let broker = &mut ctx.accounts.broker;
    let request = &mut ctx.accounts.request;
    let winner_index = resolve_request(broker, request, value, current_slot)?;

    msg!("Randomness request #{} fulfilled, winner entry #{}", request_id, winner_index);
    emit!(RandomnessFulfilled {
        broker: broker_key,
        request_id,
        winner_index,
    });

    Ok(())
}

#[cfg(feature = "mock-randomness")]
pub fn fulfill_randomness_mock(
    ctx: Context<FulfillRandomnessMock>,
    request_id: u64,
    value: [u8; 32],
) -> Result<()> {
    let broker_key = ctx.accounts.broker.key();
    require_keys_eq!(
        ctx.accounts.broker.authority,
        ctx.accounts.authority.key(),
        BasketError::Unauthorized
    );

    let current_slot = Clock::get()?.slot;
    let broker = &mut ctx.accounts.broker;
    let request = &mut ctx.accounts.request;
    let winner_index = resolve_request(broker, request, value, current_slot)?;

    emit!(RandomnessFulfilled {
        broker: broker_key,
        request_id,
        winner_index,
    });

    Ok(())
}
