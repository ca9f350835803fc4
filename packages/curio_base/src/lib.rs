mod auth;
mod msg;
mod query;

pub use crate::auth::*;
pub use crate::msg::*;
pub use crate::query::*;
