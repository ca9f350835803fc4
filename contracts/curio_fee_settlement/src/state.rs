use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

/// 100% in basis points; the active fee table may never exceed it.
pub const MAX_FEE_BPS: u64 = 10_000;

#[cw_serde]
pub struct ContractInfo {
    pub name: String,
    pub creator: Addr,
    /// access-control registry consulted for admin and delegate checks
    pub registry: Addr,
    /// distinguished recipient for membership cuts and service fees
    pub treasury: Addr,
}

#[cw_serde]
pub struct FeeEntry {
    pub name: String,
    /// basis points of the gross sale amount
    pub percentage: u64,
    pub recipient: Addr,
}

#[cw_serde]
pub struct MembershipFeeTier {
    pub seller_fee: u64,
    pub buyer_fee: u64,
}

pub const CONTRACT_INFO: Item<ContractInfo> = Item::new("contract_info");
pub const FEES: Map<&str, FeeEntry> = Map::new("fees");
pub const MEMBERSHIP_FEES: Map<u64, MembershipFeeTier> = Map::new("membership_fees");
/// Flat per-operation charges, keyed by operation tag.
pub const SERVICE_FEES: Map<&str, Uint128> = Map::new("service_fees");
