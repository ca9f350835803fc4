use cosmwasm_std::{Addr, QuerierWrapper, StdResult};

use crate::msg::{
    HasDelegateRoleResponse, HasRoleResponse, MembershipQueryMsg, MembershipResponse,
    PaymentToken, RegistryQueryMsg,
};

/// Typed wrappers around the registry and membership collaborator queries,
/// shared by every contract that consults them.
pub fn query_has_role(
    querier: &QuerierWrapper,
    registry: &Addr,
    role: &str,
    address: &Addr,
) -> StdResult<bool> {
    let res: HasRoleResponse = querier.query_wasm_smart(
        registry,
        &RegistryQueryMsg::HasRole {
            role: role.to_string(),
            address: address.clone(),
        },
    )?;
    Ok(res.has_role)
}

pub fn query_has_delegate_role(
    querier: &QuerierWrapper,
    registry: &Addr,
    address: &Addr,
) -> StdResult<bool> {
    let res: HasDelegateRoleResponse = querier.query_wasm_smart(
        registry,
        &RegistryQueryMsg::HasDelegateRole {
            address: address.clone(),
        },
    )?;
    Ok(res.has_delegate_role)
}

pub fn query_payment_token(
    querier: &QuerierWrapper,
    registry: &Addr,
    address: &Addr,
) -> StdResult<PaymentToken> {
    querier.query_wasm_smart(
        registry,
        &RegistryQueryMsg::PaymentToken {
            address: address.clone(),
        },
    )
}

pub fn query_default_fiat_token(
    querier: &QuerierWrapper,
    registry: &Addr,
) -> StdResult<PaymentToken> {
    querier.query_wasm_smart(registry, &RegistryQueryMsg::DefaultFiatToken {})
}

pub fn query_membership(
    querier: &QuerierWrapper,
    membership: &Addr,
    address: &Addr,
) -> StdResult<u64> {
    let res: MembershipResponse = querier.query_wasm_smart(
        membership,
        &MembershipQueryMsg::GetMembership {
            address: address.clone(),
        },
    )?;
    Ok(res.tier_id)
}
