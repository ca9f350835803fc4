use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};

/// Holders of this role may mutate registry, fee and sales configuration.
pub const ROLE_ADMIN: &str = "admin";
/// Holders of this role may submit signed user actions to the sales engine.
pub const ROLE_OPERATOR: &str = "operator";

/// Operation tags for flat service-fee charges.
pub const OP_LIST: &str = "list";
pub const OP_BUY: &str = "buy";
pub const OP_WITHDRAW: &str = "withdraw";
pub const OP_RENEW: &str = "renew";

/// Settlement currency registered in the access-control registry.
#[cw_serde]
pub struct PaymentToken {
    pub address: Addr,
    pub decimals: u8,
    /// designated stand-in for off-chain fiat settlement. Exactly one
    /// registered token carries this flag at a time.
    pub is_fiat: bool,
}

/// Queries answered by the registry contract. Other contracts embed the same
/// variants in their own QueryMsg, so this enum stays wire-compatible with
/// the registry's full message set.
#[cw_serde]
pub enum RegistryQueryMsg {
    HasRole { role: String, address: Addr },
    GetPrimaryAddress { role: String },
    HasDelegateRole { address: Addr },
    PaymentToken { address: Addr },
    DefaultFiatToken {},
}

#[cw_serde]
pub struct HasRoleResponse {
    pub has_role: bool,
}

#[cw_serde]
pub struct PrimaryAddressResponse {
    pub primary: Option<Addr>,
}

#[cw_serde]
pub struct HasDelegateRoleResponse {
    pub has_delegate_role: bool,
}

/// Settlement calls accepted by the fee engine from delegate-flagged
/// contracts. End users can never invoke these directly.
#[cw_serde]
pub enum FeeExecuteMsg {
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

/// External membership-tier collaborator, interface only.
#[cw_serde]
pub enum MembershipQueryMsg {
    GetMembership { address: Addr },
}

#[cw_serde]
pub struct MembershipResponse {
    /// 0 means no tier; any other value may carry fee overrides.
    pub tier_id: u64,
}
