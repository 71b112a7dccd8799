use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;

use crate::{
    constants::{
        BASKET_UNIT_SCALE, BPS_DENOMINATOR, MAX_COMPONENTS, MAX_NAME_LEN, MAX_SYMBOL_LEN,
    },
    errors::BasketError,
    state::{Broker, BundleComponent, LotteryEntry},
};

// -------------------------
// Bundle definition
// -------------------------
pub fn validate_bundle(assets: &[Pubkey], units: &[u64]) -> Result<Vec<BundleComponent>> {
    require!(assets.len() == units.len(), BasketError::InvalidBundle);
    require!(!assets.is_empty(), BasketError::InvalidBundle);
    require!(assets.len() <= MAX_COMPONENTS, BasketError::InvalidBundle);

    let mut components: Vec<BundleComponent> = Vec::with_capacity(assets.len());
    for (mint, units) in assets.iter().zip(units.iter()) {
        require!(*mint != Pubkey::default(), BasketError::InvalidBundle);
        require!(*units > 0, BasketError::InvalidBundle);
        require!(
            !components.iter().any(|c| c.mint == *mint),
            BasketError::InvalidBundle
        );
        components.push(BundleComponent {
            mint: *mint,
            units: *units,
        });
    }

    Ok(components)
}

pub fn validate_metadata(name: &str, symbol: &str) -> Result<()> {
    require!(
        !name.is_empty() && name.len() <= MAX_NAME_LEN,
        BasketError::InvalidMetadata
    );
    require!(
        !symbol.is_empty() && symbol.len() <= MAX_SYMBOL_LEN,
        BasketError::InvalidMetadata
    );
    Ok(())
}

// -------------------------
// Per-asset amounts
// -------------------------

/// Raw asset amount backing `amount` raw basket units.
/// Only amounts that map to whole asset units are accepted, so a mint and the
/// matching redemption move exactly the same asset amounts.
pub fn component_amount(units: u64, amount: u64) -> Result<u64> {
    let scaled = (units as u128)
        .checked_mul(amount as u128)
        .ok_or(BasketError::MathOverflow)?;
    require!(scaled % BASKET_UNIT_SCALE == 0, BasketError::InvalidAmount);
    u64::try_from(scaled / BASKET_UNIT_SCALE).map_err(|_| error!(BasketError::MathOverflow))
}

/// Returns `(fee, net)` where `fee = floor(amount * bps / 10_000)`.
pub fn split_redemption_fee(amount: u64, fee_bps: u16) -> Result<(u64, u64)> {
    require!((fee_bps as u64) < BPS_DENOMINATOR, BasketError::InvalidFeeBps);

    let fee = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(BasketError::MathOverflow)?
        / BPS_DENOMINATOR as u128;
    let fee = u64::try_from(fee).map_err(|_| error!(BasketError::MathOverflow))?;
    let net = amount.checked_sub(fee).ok_or(BasketError::MathOverflow)?;

    Ok((fee, net))
}

// -------------------------
// Token account views
// -------------------------

/// The parts of an SPL token account the broker reasons about.
#[derive(Clone, Copy, Debug)]
pub struct Holding {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: u64,
    pub amount: u64,
}

impl Holding {
    /// Amount `authority` may move out of this account: the whole balance for
    /// the owner, the remaining allowance (capped by balance) for the delegate.
    pub fn spendable_by(&self, authority: &Pubkey) -> u64 {
        if self.owner == *authority {
            self.amount
        } else if self.delegate == Some(*authority) {
            self.delegated_amount.min(self.amount)
        } else {
            0
        }
    }
}

impl From<&anchor_spl::token::TokenAccount> for Holding {
    fn from(acc: &anchor_spl::token::TokenAccount) -> Self {
        Self {
            mint: acc.mint,
            owner: acc.owner,
            delegate: match acc.delegate {
                COption::Some(d) => Some(d),
                COption::None => None,
            },
            delegated_amount: acc.delegated_amount,
            amount: acc.amount,
        }
    }
}

// -------------------------
// Mint / redeem planning
// -------------------------

/// Validates every pull of a mint before any of them runs.
/// Returns the per-component pull amounts in bundle order.
pub fn plan_pulls(
    components: &[BundleComponent],
    amount: u64,
    authority: &Pubkey,
    sources: &[Holding],
) -> Result<Vec<u64>> {
    require!(amount > 0, BasketError::InvalidAmount);
    require!(
        sources.len() == components.len(),
        BasketError::ComponentAccountsMismatch
    );

    let mut pulls = Vec::with_capacity(components.len());
    for (component, source) in components.iter().zip(sources.iter()) {
        require_keys_eq!(source.mint, component.mint, BasketError::AssetMismatch);

        let required = component_amount(component.units, amount)?;
        require!(
            source.spendable_by(authority) >= required,
            BasketError::TransferFailed
        );
        pulls.push(required);
    }

    Ok(pulls)
}

/// Validates every payout of a redemption against custody balances.
/// `custody` holds `(mint, balance)` per component, in bundle order.
pub fn plan_payouts(
    components: &[BundleComponent],
    amount: u64,
    custody: &[(Pubkey, u64)],
) -> Result<Vec<u64>> {
    require!(amount > 0, BasketError::InvalidAmount);
    require!(
        custody.len() == components.len(),
        BasketError::ComponentAccountsMismatch
    );

    let mut payouts = Vec::with_capacity(components.len());
    for (component, (mint, balance)) in components.iter().zip(custody.iter()) {
        require_keys_eq!(*mint, component.mint, BasketError::AssetMismatch);

        let due = component_amount(component.units, amount)?;
        require!(*balance >= due, BasketError::InsufficientBalance);
        payouts.push(due);
    }

    Ok(payouts)
}

// -------------------------
// Broker bookkeeping
// -------------------------

/// Books a mint of `amount` units to `participant` and fills its lottery entry.
/// Returns the entry sequence.
pub fn record_mint(
    broker: &mut Broker,
    broker_key: Pubkey,
    entry: &mut LotteryEntry,
    participant: Pubkey,
    amount: u64,
    bump: u8,
    current_slot: u64,
) -> Result<u64> {
    require!(amount > 0, BasketError::InvalidAmount);

    let sequence = broker.entry_count;
    broker.entry_count = broker
        .entry_count
        .checked_add(1)
        .ok_or(BasketError::MathOverflow)?;
    broker.total_minted = broker
        .total_minted
        .checked_add(amount)
        .ok_or(BasketError::MathOverflow)?;

    entry.broker = broker_key;
    entry.participant = participant;
    entry.weight = amount;
    entry.sequence = sequence;
    entry.minted_slot = current_slot;
    entry.bump = bump;

    Ok(sequence)
}

/// Books a redemption of `amount` units of which `fee` stay in the pot.
/// Returns the new pot.
pub fn record_redemption(broker: &mut Broker, amount: u64, fee: u64) -> Result<u64> {
    require!(amount > 0, BasketError::InvalidAmount);
    require!(fee <= amount, BasketError::MathOverflow);

    broker.pot = broker.pot.checked_add(fee).ok_or(BasketError::MathOverflow)?;
    broker.total_redeemed = broker
        .total_redeemed
        .checked_add(amount)
        .ok_or(BasketError::MathOverflow)?;

    Ok(broker.pot)
}

// -------------------------
// Winner selection
// -------------------------

/// Picks an entry sequence in `[draw_start, draw_end)` from an oracle value.
pub fn select_winner_index(value: &[u8; 32], draw_start: u64, draw_end: u64) -> Result<u64> {
    require!(draw_end > draw_start, BasketError::NoEntries);

    let count = (draw_end - draw_start) as u128;
    let mut lo = [0u8; 16];
    lo.copy_from_slice(&value[..16]);
    let r = u128::from_le_bytes(lo);

    let offset = (r % count) as u64;
    draw_start
        .checked_add(offset)
        .ok_or_else(|| error!(BasketError::MathOverflow))
}
