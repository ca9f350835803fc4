pub mod contract;
pub mod msg;
pub mod sale;
pub mod schedule;
pub mod state;

mod error;

pub use crate::error::ContractError;
