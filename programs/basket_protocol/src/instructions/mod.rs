pub mod broker;
pub mod lottery;
pub mod mint;
pub mod oracle;
pub mod redeem;
pub mod registry;

pub use broker::*;
pub use lottery::*;
pub use mint::*;
pub use oracle::*;
pub use redeem::*;
pub use registry::*;
