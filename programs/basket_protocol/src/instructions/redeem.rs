use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, TokenAccount, Transfer};

use crate::{
    accounting::{plan_payouts, record_redemption, split_redemption_fee, Holding},
    errors::BasketError,
    events::BasketRedeemed,
    utils::{BROKER_SEED, CUSTODY_SEED},
    RedeemFundsFromBasket,
};

/// Burns `amount - fee` basket units, moves `fee` units into the broker pot and
/// pays the full underlying bundle of `amount` units to `recipient`.
///
/// remaining_accounts, per bundle component in order: `[custody_vault, destination]`.
pub fn redeem_funds_from_basket<'info>(
    ctx: Context<'_, '_, 'info, 'info, RedeemFundsFromBasket<'info>>,
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

    let redeemer_key = ctx.accounts.redeemer.key();
    let holding = Holding::from(&*ctx.accounts.redeemer_basket_account);
    require!(
        holding.spendable_by(&redeemer_key) >= amount,
        BasketError::InsufficientBalance
    );

    let (fee, net) = split_redemption_fee(amount, ctx.accounts.broker.redemption_fee_bps)?;

    let components = ctx.accounts.basket.components.clone();
    let remaining: &'info [AccountInfo<'info>] = ctx.remaining_accounts;
    require!(
        remaining.len() == components.len() * 2,
        BasketError::ComponentAccountsMismatch
    );

    // --- PRECHECK: custody PDAs, destinations and every payout BEFORE moving funds ---
    let broker_key = ctx.accounts.broker.key();
    let mut custody: Vec<(Pubkey, u64)> = Vec::with_capacity(components.len());
    for (i, component) in components.iter().enumerate() {
        let custody_ai = &remaining[2 * i];
        let destination_ai = &remaining[2 * i + 1];

        let (expected_custody, _bump) = Pubkey::find_program_address(
            &[CUSTODY_SEED, broker_key.as_ref(), component.mint.as_ref()],
            ctx.program_id,
        );
        require_keys_eq!(
            expected_custody,
            *custody_ai.key,
            BasketError::CustodyVaultMismatch
        );

        let vault = Account::<TokenAccount>::try_from(custody_ai)
            .map_err(|_| error!(BasketError::CustodyVaultMismatch))?;
        custody.push((vault.mint, vault.amount));

        let destination = Account::<TokenAccount>::try_from(destination_ai)
            .map_err(|_| error!(BasketError::RecipientMismatch))?;
        require_keys_eq!(destination.mint, component.mint, BasketError::AssetMismatch);
        require_keys_eq!(destination.owner, recipient, BasketError::RecipientMismatch);
    }
    let payouts = plan_payouts(&components, amount, &custody)?;

    // --- bookkeeping ---
    let broker = &mut ctx.accounts.broker;
    let pot = record_redemption(broker, amount, fee)?;
    let total_redeemed = broker.total_redeemed;
    let broker_bump = broker.bump;

    // --- burn the net amount ---
    if net > 0 {
        token::burn(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Burn {
                    mint: ctx.accounts.basket_mint.to_account_info(),
                    from: ctx.accounts.redeemer_basket_account.to_account_info(),
                    authority: ctx.accounts.redeemer.to_account_info(),
                },
            ),
            net,
        )?;
    }

    // --- retain the fee in the pot ---
    if fee > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.redeemer_basket_account.to_account_info(),
                    to: ctx.accounts.pot_vault.to_account_info(),
                    authority: ctx.accounts.redeemer.to_account_info(),
                },
            ),
            fee,
        )?;
    }

    // --- pay out the underlying bundle (broker PDA signs) ---
    let signer_seeds: &[&[&[u8]]] = &[&[BROKER_SEED, basket_key.as_ref(), &[broker_bump]]];
    for (i, payout) in payouts.iter().enumerate() {
        if *payout == 0 {
            continue;
        }
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: remaining[2 * i].clone(),
                    to: remaining[2 * i + 1].clone(),
                    authority: ctx.accounts.broker.to_account_info(),
                },
                signer_seeds,
            ),
            *payout,
        )?;
    }

    msg!(
        "Redeemed {} basket units: burned {}, pot +{} (pot = {})",
        amount,
        net,
        fee,
        pot
    );
    emit!(BasketRedeemed {
        basket: basket_key,
        redeemer: redeemer_key,
        recipient,
        amount,
        burned: net,
        fee,
        pot,
        total_redeemed,
    });

    Ok(())
}
