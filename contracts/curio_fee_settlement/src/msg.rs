use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use crate::state::{ContractInfo, FeeEntry, MembershipFeeTier};

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub registry: Addr,
    pub treasury: Addr,
}

/// `SplitFees` and `ChargeServiceFee` stay wire-compatible with
/// `curio_base::FeeExecuteMsg`, the interface other components call.
#[cw_serde]
pub enum ExecuteMsg {
    AddFee {
        name: String,
        percentage: u64,
        recipient: Addr,
    },
    RemoveFee {
        name: String,
    },
    SetMembershipFees {
        membership_id: u64,
        seller_fee: u64,
        buyer_fee: u64,
    },
    SetServiceFee {
        operation: String,
        amount: Uint128,
    },
    UpdateTreasuryAddress {
        treasury: Addr,
    },
    SplitFees {
        amount: Uint128,
        currency: Addr,
        seller: Addr,
        buyer: Addr,
        seller_membership: u64,
        buyer_membership: u64,
    },
    ChargeServiceFee {
        operation: String,
        payer: Addr,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(FeeEntry)]
    GetFee { name: String },
    #[returns(FeesResponse)]
    GetFees {
        limit: Option<u8>,
        offset: Option<String>,
        order: Option<u8>,
    },
    #[returns(MembershipFeeTier)]
    GetMembershipFees { membership_id: u64 },
    #[returns(ServiceFeeResponse)]
    ServiceFee { operation: String },
    #[returns(ContractInfo)]
    GetContractInfo {},
}

#[cw_serde]
pub struct FeesResponse {
    pub fees: Vec<FeeEntry>,
    /// sum of active percentages, in basis points
    pub total_percentage: u64,
}

#[cw_serde]
pub struct ServiceFeeResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct MigrateMsg {}
