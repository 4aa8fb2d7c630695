mod renewal_store_redis;

pub use renewal_store_redis::*;
