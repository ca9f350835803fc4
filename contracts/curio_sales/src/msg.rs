use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use curio_base::AuthToken;

use crate::state::{ContractInfo, Sale, ScheduleWindow};

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub version: String,
    pub registry: Addr,
    pub fee_contract: Addr,
    pub membership_contract: Addr,
    pub addr_prefix: String,
    pub listing_delay: u64,
}

#[cw_serde]
pub struct ListMsg {
    pub auth: AuthToken,
    pub nft_contract: Addr,
    pub token_id: String,
    pub price: Uint128,
    /// required unless `is_fiat`; must be registered in the registry
    pub currency: Option<Addr>,
    pub duration_id: u64,
    pub is_fiat: bool,
    pub collection: String,
}

#[cw_serde]
pub struct ScheduleMsg {
    pub day_of_week: u64,
    pub hour: u64,
    pub minute: u64,
    pub active: bool,
}

#[cw_serde]
pub struct DurationMsg {
    pub duration_id: u64,
    pub seconds: u64,
}

#[cw_serde]
pub struct UpdateContractMsg {
    pub registry: Option<Addr>,
    pub fee_contract: Option<Addr>,
    pub membership_contract: Option<Addr>,
    pub creator: Option<Addr>,
}

#[cw_serde]
pub enum ExecuteMsg {
    // relayed user actions, gated on the signed authorization
    List(ListMsg),
    Buy {
        auth: AuthToken,
        sale_id: u64,
    },
    Withdraw {
        auth: AuthToken,
        sale_id: u64,
    },
    Renew {
        auth: AuthToken,
        sale_id: u64,
    },
    // admin configuration
    SetSchedules {
        schedules: Vec<ScheduleMsg>,
    },
    RemoveSchedules {
        ids: Vec<u64>,
    },
    SetDurations {
        durations: Vec<DurationMsg>,
    },
    SetListingDelay {
        seconds: u64,
    },
    Pause {},
    Unpause {},
    UpdateInfo(UpdateContractMsg),
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Sale)]
    GetSale { sale_id: u64 },
    #[returns(SalesResponse)]
    GetSales {
        limit: Option<u8>,
        offset: Option<u64>,
        order: Option<u8>,
    },
    #[returns(SalesResponse)]
    GetSalesBySeller {
        seller: Addr,
        limit: Option<u8>,
        offset: Option<u64>,
        order: Option<u8>,
    },
    #[returns(SalesResponse)]
    GetSalesByCollection {
        collection: String,
        limit: Option<u8>,
        offset: Option<u64>,
        order: Option<u8>,
    },
    #[returns(ScheduleWindow)]
    GetSchedule { schedule_id: u64 },
    #[returns(SchedulesResponse)]
    GetSchedules {},
    #[returns(SchedulesResponse)]
    GetActiveSchedules {},
    #[returns(u64)]
    GetDuration { duration_id: u64 },
    #[returns(DurationsResponse)]
    GetDurations {},
    #[returns(u64)]
    GetNonce { address: Addr },
    #[returns(String)]
    GetDomainSeparator {},
    #[returns(bool)]
    Paused {},
    #[returns(ContractInfo)]
    GetContractInfo {},
}

#[cw_serde]
pub struct SalesResponse {
    pub sales: Vec<Sale>,
}

#[cw_serde]
pub struct SchedulesResponse {
    pub schedules: Vec<ScheduleWindow>,
}

#[cw_serde]
pub struct DurationEntry {
    pub duration_id: u64,
    pub seconds: u64,
}

#[cw_serde]
pub struct DurationsResponse {
    pub durations: Vec<DurationEntry>,
}
