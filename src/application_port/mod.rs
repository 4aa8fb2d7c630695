mod access_guard;
mod credential_hasher;
mod rate_limiter;
mod session_service;
mod token_issuer;

pub use access_guard::*;
pub use credential_hasher::*;
pub use rate_limiter::*;
pub use session_service::*;
pub use token_issuer::*;
