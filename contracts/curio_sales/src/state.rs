use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, StdResult, Storage, Uint128};
use cw_storage_plus::{Index, IndexList, IndexedMap, Item, Map, MultiIndex};

#[cw_serde]
pub struct ContractInfo {
    pub name: String,
    /// protocol version bound into the authorization domain separator
    pub version: String,
    pub creator: Addr,
    pub registry: Addr,
    pub fee_contract: Addr,
    pub membership_contract: Addr,
    /// bech32 prefix recovered signer addresses are rendered with
    pub addr_prefix: String,
    /// seconds between submission and the earliest possible sale start
    pub listing_delay: u64,
}

#[cw_serde]
pub struct Sale {
    pub id: u64,
    pub seller: Addr,
    pub nft_contract: Addr,
    pub token_id: String,
    pub price: Uint128,
    pub currency: Addr,
    /// unix seconds
    pub start: u64,
    pub end: u64,
    /// false once sold; withdrawn sales are deleted outright
    pub active: bool,
    pub is_fiat: bool,
    pub collection: String,
}

#[cw_serde]
pub struct ScheduleWindow {
    pub id: u64,
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: u64,
    pub hour: u64,
    pub minute: u64,
    pub active: bool,
}

pub const CONTRACT_INFO: Item<ContractInfo> = Item::new("contract_info");
/// 32-byte keccak domain separator, fixed at instantiation.
pub const DOMAIN_SEPARATOR: Item<Binary> = Item::new("domain_separator");
pub const PAUSED: Item<bool> = Item::new("paused");

pub const SALES_COUNT: Item<u64> = Item::new("sales_count");
pub const SCHEDULES_COUNT: Item<u64> = Item::new("schedules_count");

pub const SCHEDULES: Map<u64, ScheduleWindow> = Map::new("schedules");
/// Duration profiles, id -> seconds.
pub const DURATIONS: Map<u64, u64> = Map::new("durations");
/// Per-signer monotonic counters, the sole replay defense.
pub const NONCES: Map<&Addr, u64> = Map::new("nonces");

pub struct SaleIndexes<'a> {
    pub seller: MultiIndex<'a, Addr, Sale, u64>,
    pub collection: MultiIndex<'a, String, Sale, u64>,
}

impl<'a> IndexList<Sale> for SaleIndexes<'a> {
    fn get_indexes(&'_ self) -> Box<dyn Iterator<Item = &'_ dyn Index<Sale>> + '_> {
        let v: Vec<&dyn Index<Sale>> = vec![&self.seller, &self.collection];
        Box::new(v.into_iter())
    }
}

pub fn sales<'a>() -> IndexedMap<'a, u64, Sale, SaleIndexes<'a>> {
    let indexes = SaleIndexes {
        seller: MultiIndex::new(|_pk, sale| sale.seller.clone(), "sales", "sales__seller"),
        collection: MultiIndex::new(
            |_pk, sale| sale.collection.clone(),
            "sales",
            "sales__collection",
        ),
    };
    IndexedMap::new("sales", indexes)
}

pub fn increment_sales(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = SALES_COUNT.may_load(storage)?.unwrap_or_default() + 1;
    SALES_COUNT.save(storage, &id)?;
    Ok(id)
}

pub fn increment_schedules(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = SCHEDULES_COUNT.may_load(storage)?.unwrap_or_default() + 1;
    SCHEDULES_COUNT.save(storage, &id)?;
    Ok(id)
}
