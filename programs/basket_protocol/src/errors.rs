use anchor_lang::prelude::*;

#[error_code]
pub enum BasketError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Protocol paused")]
    Paused,

    // -----------------
    // Registry / bundle
    // -----------------
    #[msg("Invalid bundle: assets and units must match, be non-empty, distinct and positive")]
    InvalidBundle,
    #[msg("Invalid basket name or symbol")]
    InvalidMetadata,
    #[msg("Registry is full")]
    RegistryFull,
    #[msg("Basket is not listed in the registry")]
    UnknownBasket,

    // -----------------
    // Mint / redeem
    // -----------------
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Insufficient balance")]
    InsufficientBalance,
    #[msg("Underlying asset transfer failed (balance or allowance)")]
    TransferFailed,
    #[msg("Component accounts do not match the bundle")]
    ComponentAccountsMismatch,
    #[msg("Token account mint does not match the bundle asset")]
    AssetMismatch,
    #[msg("Asset is not part of the bundle")]
    AssetNotInBundle,
    #[msg("Custody vault PDA mismatch")]
    CustodyVaultMismatch,
    #[msg("Token account is not owned by the recipient")]
    RecipientMismatch,

    // -----------------
    // Broker config
    // -----------------
    #[msg("Invalid fee bps (must be < 10_000)")]
    InvalidFeeBps,
    #[msg("Oracle pubkey not set")]
    OracleNotSet,

    // -----------------
    // Lottery
    // -----------------
    #[msg("No lottery entries in the current draw")]
    NoEntries,
    #[msg("Lottery entry PDA mismatch")]
    EntryPdaMismatch,
    #[msg("Too many accounts for a single page")]
    PageTooLarge,
    #[msg("A randomness request is already pending")]
    RequestPending,
    #[msg("Randomness request is not pending")]
    RequestNotPending,
    #[msg("Randomness request timed out")]
    RequestTimeout,
    #[msg("Randomness request has not timed out yet")]
    RequestNotExpired,
    #[msg("Randomness not fulfilled")]
    RandomnessNotFulfilled,
    #[msg("Winner account mismatch")]
    WinnerMismatch,

    // -----------------
    // Oracle attestation
    // -----------------
    #[msg("Missing or invalid ed25519 verify instruction")]
    MissingOrInvalidEd25519Ix,
    #[msg("Ed25519 pubkey mismatch")]
    Ed25519PubkeyMismatch,
    #[msg("Ed25519 message mismatch")]
    Ed25519MessageMismatch,

    #[msg("Math overflow")]
    MathOverflow,
}
