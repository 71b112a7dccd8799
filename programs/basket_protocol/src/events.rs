use anchor_lang::prelude::*;

#[event]
pub struct BasketCreated {
    pub registry: Pubkey,
    pub basket: Pubkey,
    pub mint: Pubkey,
    pub index: u64,
    pub creator: Pubkey,
}

#[event]
pub struct BrokerInitialized {
    pub basket: Pubkey,
    pub broker: Pubkey,
    pub oracle_pubkey: Pubkey,
    pub redemption_fee_bps: u16,
}

#[event]
pub struct BasketMinted {
    pub basket: Pubkey,
    pub payer: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub sequence: u64,
}

#[event]
pub struct BasketRedeemed {
    pub basket: Pubkey,
    pub redeemer: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub burned: u64,
    pub fee: u64,
    pub pot: u64,
    pub total_redeemed: u64,
}

#[event]
pub struct RandomnessRequested {
    pub broker: Pubkey,
    pub request_id: u64,
    pub requester: Pubkey,
    pub correlation: [u8; 32],
    pub draw_start: u64,
    pub draw_end: u64,
}

#[event]
pub struct RandomnessFulfilled {
    pub broker: Pubkey,
    pub request_id: u64,
    pub winner_index: u64,
}

#[event]
pub struct RandomnessExpired {
    pub broker: Pubkey,
    pub request_id: u64,
}

#[event]
pub struct PotClaimed {
    pub broker: Pubkey,
    pub request_id: u64,
    pub winner: Pubkey,
    pub prize: u64,
}
