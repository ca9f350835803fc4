use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;
use curio_base::{
    HasDelegateRoleResponse, HasRoleResponse, PaymentToken, PrimaryAddressResponse,
};

use crate::state::ContractInfo;

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    /// additional admin-role holders next to the instantiating creator
    pub admins: Vec<Addr>,
}

#[cw_serde]
pub enum ExecuteMsg {
    GrantRole {
        role: String,
        holder: Addr,
    },
    RevokeRole {
        role: String,
        holder: Addr,
    },
    SetPrimaryAddress {
        role: String,
        holder: Addr,
    },
    GrantDelegateRole {
        delegate: Addr,
    },
    RevokeDelegateRole {
        delegate: Addr,
    },
    RegisterPaymentToken {
        address: Addr,
        decimals: u8,
        is_fiat: bool,
    },
    RemovePaymentToken {
        address: Addr,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(HasRoleResponse)]
    HasRole { role: String, address: Addr },
    #[returns(PrimaryAddressResponse)]
    GetPrimaryAddress { role: String },
    #[returns(HasDelegateRoleResponse)]
    HasDelegateRole { address: Addr },
    #[returns(PaymentToken)]
    PaymentToken { address: Addr },
    #[returns(PaymentTokensResponse)]
    ListPaymentTokens {
        limit: Option<u8>,
        offset: Option<Addr>,
        order: Option<u8>,
    },
    #[returns(PaymentToken)]
    DefaultFiatToken {},
    #[returns(ContractInfo)]
    GetContractInfo {},
}

#[cw_serde]
pub struct PaymentTokensResponse {
    pub tokens: Vec<PaymentToken>,
}

#[cw_serde]
pub struct MigrateMsg {}
