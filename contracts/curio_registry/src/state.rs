use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

use curio_base::PaymentToken;

#[cw_serde]
pub struct ContractInfo {
    pub name: String,
    pub creator: Addr,
}

pub const CONTRACT_INFO: Item<ContractInfo> = Item::new("contract_info");

/// Role holder set, keyed by (role name, holder).
pub const ROLES: Map<(&str, &Addr), bool> = Map::new("roles");

/// Distinguished primary holder per role. Absent when the role has no
/// primary; never set to an address outside the holder set.
pub const PRIMARY: Map<&str, Addr> = Map::new("primary");

/// Capability bit gating privileged cross-component calls. Orthogonal to
/// role membership.
pub const DELEGATES: Map<&Addr, bool> = Map::new("delegates");

pub const PAYMENT_TOKENS: Map<&Addr, PaymentToken> = Map::new("payment_tokens");

/// The single default fiat-proxy settlement token.
pub const DEFAULT_FIAT: Item<Addr> = Item::new("default_fiat");
