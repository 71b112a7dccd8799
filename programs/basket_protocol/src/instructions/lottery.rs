use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{
    constants::MAX_ENTRY_PAGE,
    draw::{expire_request, open_request, settle_request},
    errors::BasketError,
    events::{PotClaimed, RandomnessExpired, RandomnessRequested},
    state::LotteryEntry,
    utils::{EntryRecord, BROKER_SEED, ENTRY_SEED},
    ClaimPot, ExpireRandomnessRequest, GetLotteryEntries, ImFeelingLucky,
};

/// Reads entries `start..start + n` where n = remaining_accounts.len().
pub fn get_lottery_entries<'info>(
    ctx: Context<'_, '_, 'info, 'info, GetLotteryEntries<'info>>,
    start: u64,
) -> Result<Vec<EntryRecord>> {
    let remaining: &'info [AccountInfo<'info>] = ctx.remaining_accounts;
    require!(remaining.len() <= MAX_ENTRY_PAGE, BasketError::PageTooLarge);

    let broker = &ctx.accounts.broker;
    let broker_key = broker.key();

    let mut out = Vec::with_capacity(remaining.len());
    for (i, entry_ai) in remaining.iter().enumerate() {
        let sequence = start
            .checked_add(i as u64)
            .ok_or(BasketError::MathOverflow)?;
        require!(sequence < broker.entry_count, BasketError::EntryPdaMismatch);

        let (expected, _bump) = Pubkey::find_program_address(
            &[ENTRY_SEED, broker_key.as_ref(), sequence.to_le_bytes().as_ref()],
            ctx.program_id,
        );
        require_keys_eq!(expected, *entry_ai.key, BasketError::EntryPdaMismatch);

        let entry = Account::<LotteryEntry>::try_from(entry_ai)
            .map_err(|_| error!(BasketError::EntryPdaMismatch))?;
        out.push(EntryRecord {
            participant: entry.participant,
            weight: entry.weight,
            sequence: entry.sequence,
        });
    }

    Ok(out)
}

pub fn im_feeling_lucky(ctx: Context<ImFeelingLucky>) -> Result<()> {
    require!(!ctx.accounts.registry.paused, BasketError::Paused);

    let current_slot = Clock::get()?.slot;
    let broker_key = ctx.accounts.broker.key();
    let requester = ctx.accounts.requester.key();
    let bump = ctx.bumps.request;

    let broker = &mut ctx.accounts.broker;
    let request = &mut ctx.accounts.request;
    open_request(broker, &broker_key, request, requester, bump, current_slot)?;

    msg!(
        "Randomness request #{} over entries [{}, {})",
        request.request_id,
        request.draw_start,
        request.draw_end
    );
    emit!(RandomnessRequested {
        broker: broker_key,
        request_id: request.request_id,
        requester: request.requester,
        correlation: request.correlation,
        draw_start: request.draw_start,
        draw_end: request.draw_end,
    });

    Ok(())
}

pub fn expire_randomness_request(ctx: Context<ExpireRandomnessRequest>, request_id: u64) -> Result<()> {
    let current_slot = Clock::get()?.slot;

    let broker = &mut ctx.accounts.broker;
    let request = &mut ctx.accounts.request;
    expire_request(broker, request, current_slot)?;

    msg!("Randomness request #{} timed out", request_id);
    emit!(RandomnessExpired {
        broker: broker.key(),
        request_id,
    });

    Ok(())
}

/// Pays the prize reserved for this draw to the holder recorded on the winning entry.
pub fn claim_pot(ctx: Context<ClaimPot>, request_id: u64) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    let winner = ctx.accounts.winning_entry.participant;

    let broker = &mut ctx.accounts.broker;
    let request = &mut ctx.accounts.request;
    let prize = settle_request(broker, request, winner, current_slot)?;
    require!(
        ctx.accounts.pot_vault.amount >= prize,
        BasketError::InsufficientBalance
    );

    let broker_key = broker.key();
    let basket_key = broker.basket;
    let broker_bump = broker.bump;

    if prize > 0 {
        let signer_seeds: &[&[&[u8]]] = &[&[BROKER_SEED, basket_key.as_ref(), &[broker_bump]]];
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.pot_vault.to_account_info(),
                    to: ctx.accounts.winner_basket_account.to_account_info(),
                    authority: ctx.accounts.broker.to_account_info(),
                },
                signer_seeds,
            ),
            prize,
        )?;
    }

    msg!("Pot of {} paid to {} (request #{})", prize, winner, request_id);
    emit!(PotClaimed {
        broker: broker_key,
        request_id,
        winner,
        prize,
    });

    Ok(())
}
