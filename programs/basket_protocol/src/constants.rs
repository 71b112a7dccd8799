// Centralized Protocol Constants

// Basket Units
// ============

/// Decimals of every basket unit mint.
/// Bundle `units` are expressed per whole basket unit (10^BASKET_DECIMALS raw units).
pub const BASKET_DECIMALS: u8 = 9;

/// 10^BASKET_DECIMALS, the raw amount of one whole basket unit.
pub const BASKET_UNIT_SCALE: u128 = 1_000_000_000;

/// Maximum number of underlying assets in a single bundle.
pub const MAX_COMPONENTS: usize = 8;

/// Maximum number of baskets a registry remembers.
pub const MAX_BASKETS: usize = 128;

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;

// Fees
// ====

/// Basis points denominator. A fee rate f is stored as f * BPS_DENOMINATOR.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default redemption fee (basis points). 500 = 5%.
pub const DEFAULT_REDEMPTION_FEE_BPS: u16 = 500;

// Views
// =====

/// Return data is capped at 1024 bytes: 4 (len) + 30 * 32.
pub const MAX_LIST_PAGE: usize = 30;

/// 4 (len) + 20 * 48 bytes per entry record.
pub const MAX_ENTRY_PAGE: usize = 20;

// Randomness
// ==========

/// Slots an oracle has to fulfill a request before anyone may expire it.
/// 1500 slots ~ 10 minutes (@ 0.4s/slot).
pub const REQUEST_TIMEOUT_SLOTS: u64 = 1500;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;
