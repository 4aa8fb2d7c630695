mod app;
mod janitor;

pub use app::*;
pub use janitor::*;
