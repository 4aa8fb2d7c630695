mod jti;
mod renewal_record;
mod secret;
mod token;
mod ttl;
mod user;

pub use jti::*;
pub use renewal_record::*;
pub use secret::*;
pub use token::*;
pub use ttl::*;
pub use user::*;
