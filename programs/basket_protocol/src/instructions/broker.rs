use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::BasketError;
use crate::events::BrokerInitialized;
use crate::{InitializeBroker, InitializeCustodyVault, SetOraclePubkey, UpdateRedemptionFee};

/// `redemption_fee_bps = None` falls back to DEFAULT_REDEMPTION_FEE_BPS.
pub fn initialize_broker(
    ctx: Context<InitializeBroker>,
    redemption_fee_bps: Option<u16>,
    oracle_pubkey: Pubkey,
) -> Result<()> {
    let redemption_fee_bps = redemption_fee_bps.unwrap_or(DEFAULT_REDEMPTION_FEE_BPS);
    let basket = &ctx.accounts.basket;
    require_keys_eq!(basket.creator, ctx.accounts.creator.key(), BasketError::Unauthorized);
    require_keys_eq!(basket.broker, ctx.accounts.broker.key(), BasketError::Unauthorized);
    require!(
        (redemption_fee_bps as u64) < BPS_DENOMINATOR,
        BasketError::InvalidFeeBps
    );
    require!(oracle_pubkey != Pubkey::default(), BasketError::OracleNotSet);

    let broker = &mut ctx.accounts.broker;
    broker.basket = basket.key();
    broker.basket_mint = basket.mint;
    broker.authority = ctx.accounts.creator.key();
    broker.bump = basket.broker_bump;

    broker.oracle_pubkey = oracle_pubkey;
    broker.redemption_fee_bps = redemption_fee_bps;

    broker.pot = 0;
    broker.reserved_pot = 0;
    broker.pot_vault = ctx.accounts.pot_vault.key();
    broker.pot_vault_bump = ctx.bumps.pot_vault;

    broker.entry_count = 0;
    broker.total_minted = 0;
    broker.total_redeemed = 0;
    broker.draw_start = 0;

    broker.request_count = 0;
    broker.pending_request = false;

    broker.version = INITIAL_VERSION;

    emit!(BrokerInitialized {
        basket: broker.basket,
        broker: broker.key(),
        oracle_pubkey,
        redemption_fee_bps,
    });

    Ok(())
}

/// Creates the broker-owned custody account for one asset of the bundle.
pub fn initialize_custody_vault(ctx: Context<InitializeCustodyVault>) -> Result<()> {
    let asset = ctx.accounts.asset_mint.key();
    require!(
        ctx.accounts.basket.components.iter().any(|c| c.mint == asset),
        BasketError::AssetNotInBundle
    );

    msg!("Custody vault {} for asset {}", ctx.accounts.custody_vault.key(), asset);
    Ok(())
}

pub fn update_redemption_fee(ctx: Context<UpdateRedemptionFee>, redemption_fee_bps: u16) -> Result<()> {
    require!(
        (redemption_fee_bps as u64) < BPS_DENOMINATOR,
        BasketError::InvalidFeeBps
    );

    let broker = &mut ctx.accounts.broker;
    require_keys_eq!(broker.authority, ctx.accounts.authority.key(), BasketError::Unauthorized);

    broker.redemption_fee_bps = redemption_fee_bps;
    Ok(())
}

pub fn set_oracle_pubkey(ctx: Context<SetOraclePubkey>, oracle_pubkey: Pubkey) -> Result<()> {
    require!(oracle_pubkey != Pubkey::default(), BasketError::OracleNotSet);

    let broker = &mut ctx.accounts.broker;
    require_keys_eq!(broker.authority, ctx.accounts.authority.key(), BasketError::Unauthorized);

    broker.oracle_pubkey = oracle_pubkey;
    Ok(())
}
