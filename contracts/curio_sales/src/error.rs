use cosmwasm_std::StdError;
use thiserror::Error;

use curio_base::AuthError;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Unauthorized, sender is {sender}")]
    Unauthorized { sender: String },

    #[error("Nonce mismatch, expected {expected} got {actual}")]
    NonceMismatch { expected: u64, actual: u64 },

    #[error("Authorization expired at {expiry}")]
    AuthorizationExpired { expiry: u64 },

    #[error("Contract is paused")]
    Paused {},

    #[error("Price must be greater than zero")]
    ZeroPrice {},

    #[error("A currency is required for non-fiat listings")]
    MissingCurrency {},

    #[error("Payment token {address} is not registered")]
    UnknownPaymentToken { address: String },

    #[error("Duration profile {id} does not exist")]
    DurationNotFound { id: u64 },

    #[error("Duration must be greater than zero")]
    InvalidDuration {},

    #[error("Sale {id} does not exist")]
    SaleNotFound { id: u64 },

    #[error("Sale {id} is no longer active")]
    SaleNotActive { id: u64 },

    #[error("Sale has not started, starts at {start}")]
    SaleNotStarted { start: u64 },

    #[error("Sale expired at {end}")]
    SaleExpired { end: u64 },

    #[error("Sale is still running until {end}")]
    SaleStillActive { end: u64 },

    #[error("Invalid schedule window {day}/{hour}:{minute}")]
    InvalidSchedule { day: u64, hour: u64, minute: u64 },

    #[error("Schedule window {id} does not exist")]
    ScheduleNotFound { id: u64 },
}
