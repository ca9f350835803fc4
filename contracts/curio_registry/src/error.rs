use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized registry access with sender: {sender}")]
    Unauthorized { sender: String },

    #[error("{holder} does not hold role {role}")]
    RoleNotHeld { role: String, holder: String },

    #[error("Payment token {address} is not registered")]
    PaymentTokenNotFound { address: String },

    #[error("{address} is the default fiat-proxy token; register a replacement first")]
    DefaultFiatTokenInUse { address: String },
}
