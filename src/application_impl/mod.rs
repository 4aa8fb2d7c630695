mod argon2_hasher;
mod jwt_codec;
mod jwt_issuer;
mod rate_limiter_impl;
mod session_service_impl;

pub use argon2_hasher::*;
pub use jwt_codec::*;
pub use jwt_issuer::*;
pub use rate_limiter_impl::*;
pub use session_service_impl::*;
