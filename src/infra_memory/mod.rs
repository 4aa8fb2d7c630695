mod rate_limit_store_memory;
mod renewal_store_memory;

pub use rate_limit_store_memory::*;
pub use renewal_store_memory::*;
