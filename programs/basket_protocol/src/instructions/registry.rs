use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::accounting::{validate_bundle, validate_metadata};
use crate::constants::*;
use crate::errors::BasketError;
use crate::events::BasketCreated;
use crate::{CreateBasket, InitializeRegistry, ListBaskets, SetPause};

pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;

    registry.admin = ctx.accounts.admin.key();
    registry.bump = ctx.bumps.registry;
    registry.paused = false;
    registry.basket_count = 0;
    registry.baskets = Vec::new();
    registry.version = INITIAL_VERSION;

    Ok(())
}

pub fn set_pause(ctx: Context<SetPause>, paused: bool) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    require_keys_eq!(registry.admin, ctx.accounts.admin.key(), BasketError::Unauthorized);
    registry.paused = paused;
    Ok(())
}

/// Defines a new basket bound to an immutable bundle.
/// remaining_accounts: the asset mints, in the same order as `assets`.
pub fn create_basket<'info>(
    ctx: Context<'_, '_, 'info, 'info, CreateBasket<'info>>,
    assets: Vec<Pubkey>,
    units: Vec<u64>,
    name: String,
    symbol: String,
) -> Result<()> {
    require!(!ctx.accounts.registry.paused, BasketError::Paused);
    require!(
        ctx.accounts.registry.baskets.len() < MAX_BASKETS,
        BasketError::RegistryFull
    );

    let components = validate_bundle(&assets, &units)?;
    validate_metadata(&name, &symbol)?;

    // every asset must be a live SPL mint
    let remaining: &'info [AccountInfo<'info>] = ctx.remaining_accounts;
    require!(
        remaining.len() == components.len(),
        BasketError::InvalidBundle
    );
    for (component, mint_ai) in components.iter().zip(remaining.iter()) {
        require_keys_eq!(*mint_ai.key, component.mint, BasketError::InvalidBundle);
        Account::<Mint>::try_from(mint_ai).map_err(|_| error!(BasketError::InvalidBundle))?;
    }

    let registry = &mut ctx.accounts.registry;
    let index = registry.basket_count;
    let basket_key = ctx.accounts.basket.key();

    let basket = &mut ctx.accounts.basket;
    basket.registry = registry.key();
    basket.index = index;
    basket.bump = ctx.bumps.basket;
    basket.creator = ctx.accounts.creator.key();

    basket.mint = ctx.accounts.basket_mint.key();
    basket.mint_bump = ctx.bumps.basket_mint;

    basket.broker = ctx.accounts.broker.key();
    basket.broker_bump = ctx.bumps.broker;

    basket.name = name;
    basket.symbol = symbol;
    basket.components = components;

    basket.created_slot = Clock::get()?.slot;
    basket.version = INITIAL_VERSION;

    registry.baskets.push(basket_key);
    registry.basket_count = registry
        .basket_count
        .checked_add(1)
        .ok_or(BasketError::MathOverflow)?;

    msg!("Basket {} created at index {}", basket_key, index);
    emit!(BasketCreated {
        registry: registry.key(),
        basket: basket_key,
        mint: basket.mint,
        index,
        creator: basket.creator,
    });

    Ok(())
}

/// One page of baskets in creation order. Empty past the end.
pub fn list_baskets(ctx: Context<ListBaskets>, offset: u32) -> Result<Vec<Pubkey>> {
    Ok(basket_page(&ctx.accounts.registry.baskets, offset as usize))
}

pub fn basket_page(baskets: &[Pubkey], offset: usize) -> Vec<Pubkey> {
    let start = offset.min(baskets.len());
    let end = start.saturating_add(MAX_LIST_PAGE).min(baskets.len());
    baskets[start..end].to_vec()
}
