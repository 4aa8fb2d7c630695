mod clock;
mod expiry_sweep;
mod rate_limit_store;
mod renewal_store;

pub use clock::*;
pub use expiry_sweep::*;
pub use rate_limit_store::*;
pub use renewal_store::*;
