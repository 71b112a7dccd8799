// programs/basket_protocol/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::BASKET_DECIMALS;
use crate::errors::BasketError;
use crate::state::{Basket, Broker, LotteryEntry, RandomnessRequest, Registry};
use crate::utils::{
    BASKET_MINT_SEED, BASKET_SEED, BROKER_SEED, CUSTODY_SEED, ENTRY_SEED, POT_SEED,
    REGISTRY_SEED, REQUEST_SEED,
};

// ----------------------------
// Registry
// ----------------------------

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Registry::INIT_SPACE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetPause<'info> {
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct CreateBasket<'info> {
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        init,
        payer = creator,
        space = 8 + Basket::INIT_SPACE,
        seeds = [BASKET_SEED, registry.key().as_ref(), registry.basket_count.to_le_bytes().as_ref()],
        bump
    )]
    pub basket: Account<'info, Basket>,

    /// Basket unit mint; only the broker PDA can mint.
    #[account(
        init,
        payer = creator,
        seeds = [BASKET_MINT_SEED, basket.key().as_ref()],
        bump,
        mint::decimals = BASKET_DECIMALS,
        mint::authority = broker,
    )]
    pub basket_mint: Account<'info, Mint>,

    /// CHECK: address only. The Broker account at this PDA is created by `initialize_broker`.
    #[account(
        seeds = [BROKER_SEED, basket.key().as_ref()],
        bump
    )]
    pub broker: UncheckedAccount<'info>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct ListBaskets<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,
}

// ----------------------------
// Broker setup
// ----------------------------

#[derive(Accounts)]
pub struct InitializeBroker<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        seeds = [BASKET_SEED, registry.key().as_ref(), basket.index.to_le_bytes().as_ref()],
        bump = basket.bump
    )]
    pub basket: Account<'info, Basket>,

    #[account(
        init,
        payer = creator,
        space = 8 + Broker::INIT_SPACE,
        seeds = [BROKER_SEED, basket.key().as_ref()],
        bump
    )]
    pub broker: Account<'info, Broker>,

    #[account(address = basket.mint)]
    pub basket_mint: Account<'info, Mint>,

    /// Pot: basket units retained from redemption fees (authority = broker PDA)
    #[account(
        init,
        payer = creator,
        seeds = [POT_SEED, broker.key().as_ref()],
        bump,
        token::mint = basket_mint,
        token::authority = broker
    )]
    pub pot_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct InitializeCustodyVault<'info> {
    #[account(
        seeds = [BASKET_SEED, basket.registry.as_ref(), basket.index.to_le_bytes().as_ref()],
        bump = basket.bump
    )]
    pub basket: Account<'info, Basket>,

    #[account(
        seeds = [BROKER_SEED, basket.key().as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    pub asset_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        seeds = [CUSTODY_SEED, broker.key().as_ref(), asset_mint.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = broker
    )]
    pub custody_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct UpdateRedemptionFee<'info> {
    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetOraclePubkey<'info> {
    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    pub authority: Signer<'info>,
}

// ----------------------------
// Mint / redeem
// ----------------------------

#[derive(Accounts)]
#[instruction(amount: u64, recipient: Pubkey)]
pub struct MintBasketToken<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        seeds = [BASKET_SEED, registry.key().as_ref(), basket.index.to_le_bytes().as_ref()],
        bump = basket.bump
    )]
    pub basket: Box<Account<'info, Basket>>,

    #[account(
        mut,
        seeds = [BROKER_SEED, basket.key().as_ref()],
        bump = broker.bump,
        constraint = basket.broker == broker.key() @ BasketError::Unauthorized
    )]
    pub broker: Box<Account<'info, Broker>>,

    #[account(
        mut,
        seeds = [BASKET_MINT_SEED, basket.key().as_ref()],
        bump = basket.mint_bump,
        address = basket.mint
    )]
    pub basket_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = recipient_basket_account.mint == basket_mint.key() @ BasketError::AssetMismatch,
        constraint = recipient_basket_account.owner == recipient @ BasketError::RecipientMismatch
    )]
    pub recipient_basket_account: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = payer,
        space = 8 + LotteryEntry::INIT_SPACE,
        seeds = [ENTRY_SEED, broker.key().as_ref(), broker.entry_count.to_le_bytes().as_ref()],
        bump
    )]
    pub lottery_entry: Account<'info, LotteryEntry>,

    /// Owner or delegate of every source account; pays for the entry PDA.
    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // remaining_accounts: per bundle component, in order: [source (writable), custody_vault (writable)]
}

#[derive(Accounts)]
#[instruction(amount: u64, recipient: Pubkey)]
pub struct RedeemFundsFromBasket<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        seeds = [BASKET_SEED, registry.key().as_ref(), basket.index.to_le_bytes().as_ref()],
        bump = basket.bump
    )]
    pub basket: Box<Account<'info, Basket>>,

    #[account(
        mut,
        seeds = [BROKER_SEED, basket.key().as_ref()],
        bump = broker.bump,
        constraint = basket.broker == broker.key() @ BasketError::Unauthorized
    )]
    pub broker: Box<Account<'info, Broker>>,

    #[account(
        mut,
        seeds = [BASKET_MINT_SEED, basket.key().as_ref()],
        bump = basket.mint_bump,
        address = basket.mint
    )]
    pub basket_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = redeemer_basket_account.mint == basket_mint.key() @ BasketError::AssetMismatch
    )]
    pub redeemer_basket_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [POT_SEED, broker.key().as_ref()],
        bump = broker.pot_vault_bump,
        address = broker.pot_vault
    )]
    pub pot_vault: Account<'info, TokenAccount>,

    /// Owner or delegate of `redeemer_basket_account`.
    pub redeemer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    // remaining_accounts: per bundle component, in order: [custody_vault (writable), destination (writable)]
}

// ----------------------------
// Lottery
// ----------------------------

#[derive(Accounts)]
pub struct GetLotteryEntries<'info> {
    #[account(
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,
    // remaining_accounts: consecutive LotteryEntry PDAs starting at `start`
}

#[derive(Accounts)]
pub struct ImFeelingLucky<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    #[account(
        init,
        payer = requester,
        space = 8 + RandomnessRequest::INIT_SPACE,
        seeds = [REQUEST_SEED, broker.key().as_ref(), broker.request_count.to_le_bytes().as_ref()],
        bump
    )]
    pub request: Account<'info, RandomnessRequest>,

    #[account(mut)]
    pub requester: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct FulfillRandomness<'info> {
    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    #[account(
        mut,
        seeds = [REQUEST_SEED, broker.key().as_ref(), request_id.to_le_bytes().as_ref()],
        bump = request.bump
    )]
    pub request: Account<'info, RandomnessRequest>,

    /// CHECK: instructions sysvar for ed25519 introspection
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,
}

#[cfg(feature = "mock-randomness")]
#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct FulfillRandomnessMock<'info> {
    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    #[account(
        mut,
        seeds = [REQUEST_SEED, broker.key().as_ref(), request_id.to_le_bytes().as_ref()],
        bump = request.bump
    )]
    pub request: Account<'info, RandomnessRequest>,

    pub authority: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct ExpireRandomnessRequest<'info> {
    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    #[account(
        mut,
        seeds = [REQUEST_SEED, broker.key().as_ref(), request_id.to_le_bytes().as_ref()],
        bump = request.bump
    )]
    pub request: Account<'info, RandomnessRequest>,
}

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct ClaimPot<'info> {
    #[account(
        mut,
        seeds = [BROKER_SEED, broker.basket.as_ref()],
        bump = broker.bump
    )]
    pub broker: Account<'info, Broker>,

    #[account(
        mut,
        seeds = [REQUEST_SEED, broker.key().as_ref(), request_id.to_le_bytes().as_ref()],
        bump = request.bump
    )]
    pub request: Account<'info, RandomnessRequest>,

    #[account(
        seeds = [ENTRY_SEED, broker.key().as_ref(), request.winner_index.to_le_bytes().as_ref()],
        bump = winning_entry.bump
    )]
    pub winning_entry: Account<'info, LotteryEntry>,

    #[account(
        mut,
        seeds = [POT_SEED, broker.key().as_ref()],
        bump = broker.pot_vault_bump,
        address = broker.pot_vault
    )]
    pub pot_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = winner_basket_account.mint == broker.basket_mint @ BasketError::AssetMismatch,
        constraint = winner_basket_account.owner == winning_entry.participant @ BasketError::WinnerMismatch
    )]
    pub winner_basket_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
