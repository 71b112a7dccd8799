use anchor_lang::prelude::*;

#[account]
#[derive(InitSpace)]
pub struct Registry {
    pub admin: Pubkey,
    pub bump: u8,
    pub paused: bool,

    pub basket_count: u64,

    /// Every basket ever created, in creation order. Append-only.
    /// NOTE: max_len must stay equal to MAX_BASKETS.
    #[max_len(128)]
    pub baskets: Vec<Pubkey>,

    pub version: u16,
}

/// One (asset, units) pair of a bundle.
/// `units` is the raw asset amount backing one whole basket unit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct BundleComponent {
    pub mint: Pubkey,
    pub units: u64,
}

#[account]
#[derive(InitSpace)]
pub struct Basket {
    pub registry: Pubkey,
    pub index: u64,
    pub bump: u8,
    pub creator: Pubkey,

    // basket unit mint (authority = broker PDA)
    pub mint: Pubkey,
    pub mint_bump: u8,

    // broker PDA bound at creation; initialized later by the creator
    pub broker: Pubkey,
    pub broker_bump: u8,

    #[max_len(32)]
    pub name: String,
    #[max_len(10)]
    pub symbol: String,

    #[max_len(8)]
    pub components: Vec<BundleComponent>,

    pub created_slot: u64,
    pub version: u16,
}

#[account]
#[derive(InitSpace)]
pub struct Broker {
    pub basket: Pubkey,
    pub basket_mint: Pubkey,
    pub authority: Pubkey,
    pub bump: u8,

    /// Ed25519 key whose attestations fulfill randomness requests.
    pub oracle_pubkey: Pubkey,

    /// Redemption fee (basis points), always < 10_000.
    pub redemption_fee_bps: u16,

    // pot: basket units retained from redemption fees, not yet won
    pub pot: u64,
    /// Prizes of fulfilled draws that have not been claimed yet.
    /// pot + reserved_pot is what the pot vault holds.
    pub reserved_pot: u64,
    pub pot_vault: Pubkey,
    pub pot_vault_bump: u8,

    // lottery entries
    pub entry_count: u64,
    pub total_minted: u64,
    pub total_redeemed: u64,

    /// First entry sequence eligible for the next draw.
    pub draw_start: u64,

    pub request_count: u64,
    pub pending_request: bool,

    pub version: u16,
}

#[account]
#[derive(InitSpace)]
pub struct LotteryEntry {
    pub broker: Pubkey,
    pub participant: Pubkey,
    pub weight: u64,
    pub sequence: u64,
    pub minted_slot: u64,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Settled,
    TimedOut,
}

#[account]
#[derive(InitSpace)]
pub struct RandomnessRequest {
    pub broker: Pubkey,
    pub request_id: u64,
    pub bump: u8,
    pub requester: Pubkey,

    /// Binds the oracle answer to this request and its entry snapshot.
    pub correlation: [u8; 32],

    // snapshot of the draw window: sequences [draw_start, draw_end)
    pub draw_start: u64,
    pub draw_end: u64,

    pub status: RequestStatus,
    pub value: [u8; 32],
    pub winner_index: u64,
    pub winner: Pubkey,
    pub prize: u64,

    pub requested_slot: u64,
    pub fulfilled_slot: u64,
    pub settled_slot: u64,
}
