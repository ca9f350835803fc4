use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized fee-settlement access with sender: {sender}")]
    Unauthorized { sender: String },

    #[error("A fee named {name} already exists")]
    DuplicateFee { name: String },

    #[error("Active fee percentages would total {total} bps, exceeding 10000")]
    FeeOverflow { total: u64 },

    #[error("Fee percentage {value} bps exceeds 10000")]
    InvalidFeePercentage { value: u64 },

    #[error("No fee named {name}")]
    FeeNotFound { name: String },
}
