use anchor_lang::prelude::*;
use anchor_spl::token::{self, MintTo, TokenAccount, Transfer};

use crate::{
    accounting::{plan_pulls, record_mint, Holding},
    errors::BasketError,
    events::BasketMinted,
    utils::{BROKER_SEED, CUSTODY_SEED},
    MintBasketToken,
};

/// Pulls the bundle for `amount` basket units from the payer into custody,
/// mints `amount` units to `recipient` and records a lottery entry.
///
/// remaining_accounts, per bundle component in order: `[source, custody_vault]`.
pub fn mint_basket_token<'info>(
    ctx: Context<'_, '_, 'info, 'info, MintBasketToken<'info>>,
    amount: u64,
    recipient: Pubkey,
) -> Result<()> {
    require!(!ctx.accounts.registry.paused, BasketError::Paused);
    require!(amount > 0, BasketError::InvalidAmount);

    let basket_key = ctx.accounts.basket.key();
    require!(
        ctx.accounts.registry.baskets.contains(&basket_key),
        BasketError::UnknownBasket
    );

    let components = ctx.accounts.basket.components.clone();
    let remaining: &'info [AccountInfo<'info>] = ctx.remaining_accounts;
    require!(
        remaining.len() == components.len() * 2,
        BasketError::ComponentAccountsMismatch
    );

    let broker_key = ctx.accounts.broker.key();
    let payer_key = ctx.accounts.payer.key();

    // --- PRECHECK: custody PDAs + every pull planned BEFORE moving funds ---
    let mut sources: Vec<Holding> = Vec::with_capacity(components.len());
    for (i, component) in components.iter().enumerate() {
        let source_ai = &remaining[2 * i];
        let custody_ai = &remaining[2 * i + 1];

        let (expected_custody, _bump) = Pubkey::find_program_address(
            &[CUSTODY_SEED, broker_key.as_ref(), component.mint.as_ref()],
            ctx.program_id,
        );
        require_keys_eq!(
            expected_custody,
            *custody_ai.key,
            BasketError::CustodyVaultMismatch
        );
        // custody must already exist as a token account of this asset
        let custody = Account::<TokenAccount>::try_from(custody_ai)
            .map_err(|_| error!(BasketError::TransferFailed))?;
        require_keys_eq!(custody.mint, component.mint, BasketError::TransferFailed);

        let source = Account::<TokenAccount>::try_from(source_ai)
            .map_err(|_| error!(BasketError::TransferFailed))?;
        sources.push(Holding::from(&*source));
    }
    let pulls = plan_pulls(&components, amount, &payer_key, &sources)?;

    // --- bookkeeping ---
    let slot = Clock::get()?.slot;
    let entry_bump = ctx.bumps.lottery_entry;
    let broker = &mut ctx.accounts.broker;
    let sequence = record_mint(
        broker,
        broker_key,
        &mut ctx.accounts.lottery_entry,
        recipient,
        amount,
        entry_bump,
        slot,
    )?;
    let broker_bump = broker.bump;

    // --- pull every asset into custody ---
    for (i, pull) in pulls.iter().enumerate() {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: remaining[2 * i].clone(),
                    to: remaining[2 * i + 1].clone(),
                    authority: ctx.accounts.payer.to_account_info(),
                },
            ),
            *pull,
        )?;
    }

    // --- mint basket units (broker PDA signs) ---
    let signer_seeds: &[&[&[u8]]] = &[&[BROKER_SEED, basket_key.as_ref(), &[broker_bump]]];
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.basket_mint.to_account_info(),
                to: ctx.accounts.recipient_basket_account.to_account_info(),
                authority: ctx.accounts.broker.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    msg!("Minted {} basket units to {} (entry #{})", amount, recipient, sequence);
    emit!(BasketMinted {
        basket: basket_key,
        payer: payer_key,
        recipient,
        amount,
        sequence,
    });

    Ok(())
}
