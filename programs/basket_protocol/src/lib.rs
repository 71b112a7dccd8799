use anchor_lang::prelude::*;

pub mod accounting;
pub mod constants;
pub mod contexts;
pub mod draw;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

pub use constants::*;
pub use contexts::*;
pub use errors::*;
pub use instructions::*;
pub use state::*;
pub use utils::*;

use solana_security_txt::security_txt;

security_txt! {
    // Required fields
    name: "Basket Protocol",
    project_url: "https://github.com/basket-protocol/basket-protocol",
    contacts: "link:https://github.com/basket-protocol/basket-protocol/issues",
    policy: "https://github.com/basket-protocol/basket-protocol/blob/main/SECURITY.md",

    // Optional fields
    preferred_languages: "en",
    source_code: "https://github.com/basket-protocol/basket-protocol"
}

declare_id!("FkShUkXZ7fL3p9Gy8AAQFxFf7dnmyedQsEVBZSaChgNB");

#[program]
pub mod basket_protocol {
    use super::*;
    use crate::instructions::{broker, lottery, mint, oracle, redeem, registry};

    // ----------------------------
    // Registry
    // ----------------------------
    pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
        registry::initialize_registry(ctx)
    }

    pub fn set_pause(ctx: Context<SetPause>, paused: bool) -> Result<()> {
        registry::set_pause(ctx, paused)
    }

    pub fn create_basket<'info>(
        ctx: Context<'_, '_, 'info, 'info, CreateBasket<'info>>,
        assets: Vec<Pubkey>,
        units: Vec<u64>,
        name: String,
        symbol: String,
    ) -> Result<()> {
        registry::create_basket(ctx, assets, units, name, symbol)
    }

    pub fn list_baskets(ctx: Context<ListBaskets>, offset: u32) -> Result<Vec<Pubkey>> {
        registry::list_baskets(ctx, offset)
    }

    // ----------------------------
    // Broker setup
    // ----------------------------
    pub fn initialize_broker(
        ctx: Context<InitializeBroker>,
        redemption_fee_bps: Option<u16>,
        oracle_pubkey: Pubkey,
    ) -> Result<()> {
        broker::initialize_broker(ctx, redemption_fee_bps, oracle_pubkey)
    }

    pub fn initialize_custody_vault(ctx: Context<InitializeCustodyVault>) -> Result<()> {
        broker::initialize_custody_vault(ctx)
    }

    pub fn update_redemption_fee(ctx: Context<UpdateRedemptionFee>, redemption_fee_bps: u16) -> Result<()> {
        broker::update_redemption_fee(ctx, redemption_fee_bps)
    }

    pub fn set_oracle_pubkey(ctx: Context<SetOraclePubkey>, oracle_pubkey: Pubkey) -> Result<()> {
        broker::set_oracle_pubkey(ctx, oracle_pubkey)
    }

    // ----------------------------
    // Mint / redeem
    // ----------------------------
    pub fn mint_basket_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, MintBasketToken<'info>>,
        amount: u64,
        recipient: Pubkey,
    ) -> Result<()> {
        mint::mint_basket_token(ctx, amount, recipient)
    }

    pub fn redeem_funds_from_basket<'info>(
        ctx: Context<'_, '_, 'info, 'info, RedeemFundsFromBasket<'info>>,
        amount: u64,
        recipient: Pubkey,
    ) -> Result<()> {
        redeem::redeem_funds_from_basket(ctx, amount, recipient)
    }

    // ----------------------------
    // Lottery
    // ----------------------------
    pub fn get_lottery_entries<'info>(
        ctx: Context<'_, '_, 'info, 'info, GetLotteryEntries<'info>>,
        start: u64,
    ) -> Result<Vec<EntryRecord>> {
        lottery::get_lottery_entries(ctx, start)
    }

    pub fn im_feeling_lucky(ctx: Context<ImFeelingLucky>) -> Result<()> {
        lottery::im_feeling_lucky(ctx)
    }

    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        request_id: u64,
        value: [u8; 32],
    ) -> Result<()> {
        oracle::fulfill_randomness(ctx, request_id, value)
    }

    #[cfg(feature = "mock-randomness")]
    pub fn fulfill_randomness_mock(
        ctx: Context<FulfillRandomnessMock>,
        request_id: u64,
        value: [u8; 32],
    ) -> Result<()> {
        oracle::fulfill_randomness_mock(ctx, request_id, value)
    }

    pub fn expire_randomness_request(ctx: Context<ExpireRandomnessRequest>, request_id: u64) -> Result<()> {
        lottery::expire_randomness_request(ctx, request_id)
    }

    pub fn claim_pot(ctx: Context<ClaimPot>, request_id: u64) -> Result<()> {
        lottery::claim_pot(ctx, request_id)
    }
}
