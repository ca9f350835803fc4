#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdError, StdResult,
};
use cw_storage_plus::Bound;

use curio_base::{
    HasDelegateRoleResponse, HasRoleResponse, PaymentToken, PrimaryAddressResponse, ROLE_ADMIN,
};

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, PaymentTokensResponse, QueryMsg};
use crate::state::{
    ContractInfo, CONTRACT_INFO, DEFAULT_FIAT, DELEGATES, PAYMENT_TOKENS, PRIMARY, ROLES,
};

// settings for pagination
const MAX_LIMIT: u8 = 100;
const DEFAULT_LIMIT: u8 = 20;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    CONTRACT_INFO.save(
        deps.storage,
        &ContractInfo {
            name: msg.name,
            creator: info.sender.clone(),
        },
    )?;

    // the creator bootstraps the admin role and becomes its primary holder
    ROLES.save(deps.storage, (ROLE_ADMIN, &info.sender), &true)?;
    PRIMARY.save(deps.storage, ROLE_ADMIN, &info.sender)?;
    for admin in msg.admins {
        let admin = deps.api.addr_validate(admin.as_str())?;
        ROLES.save(deps.storage, (ROLE_ADMIN, &admin), &true)?;
    }

    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    match msg {
        ExecuteMsg::GrantRole { role, holder } => try_grant_role(deps, role, holder),
        ExecuteMsg::RevokeRole { role, holder } => try_revoke_role(deps, role, holder),
        ExecuteMsg::SetPrimaryAddress { role, holder } => {
            try_set_primary_address(deps, role, holder)
        }
        ExecuteMsg::GrantDelegateRole { delegate } => try_set_delegate(deps, delegate, true),
        ExecuteMsg::RevokeDelegateRole { delegate } => try_set_delegate(deps, delegate, false),
        ExecuteMsg::RegisterPaymentToken {
            address,
            decimals,
            is_fiat,
        } => try_register_payment_token(deps, address, decimals, is_fiat),
        ExecuteMsg::RemovePaymentToken { address } => try_remove_payment_token(deps, address),
    }
}

/// Admin-equivalent callers are the contract creator and every holder of the
/// admin role.
fn check_admin(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    if contract_info.creator.eq(sender) {
        return Ok(());
    }
    if ROLES
        .may_load(deps.storage, (ROLE_ADMIN, sender))?
        .unwrap_or_default()
    {
        return Ok(());
    }
    Err(ContractError::Unauthorized {
        sender: sender.to_string(),
    })
}

pub fn try_grant_role(
    deps: DepsMut,
    role: String,
    holder: Addr,
) -> Result<Response, ContractError> {
    let holder = deps.api.addr_validate(holder.as_str())?;
    ROLES.save(deps.storage, (&role, &holder), &true)?;

    // first holder of a primary-less role becomes primary
    let mut primary = PRIMARY.may_load(deps.storage, &role)?;
    if primary.is_none() {
        PRIMARY.save(deps.storage, &role, &holder)?;
        primary = Some(holder.clone());
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "grant_role"),
        attr("role", role),
        attr("address", holder),
        attr("new_primary", primary_attr(primary)),
    ]))
}

pub fn try_revoke_role(
    deps: DepsMut,
    role: String,
    holder: Addr,
) -> Result<Response, ContractError> {
    if !ROLES
        .may_load(deps.storage, (&role, &holder))?
        .unwrap_or_default()
    {
        return Err(ContractError::RoleNotHeld {
            role,
            holder: holder.to_string(),
        });
    }
    ROLES.remove(deps.storage, (&role, &holder));

    // revoking the primary clears it, with no auto re-election
    let mut primary = PRIMARY.may_load(deps.storage, &role)?;
    if primary.as_ref() == Some(&holder) {
        PRIMARY.remove(deps.storage, &role);
        primary = None;
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "revoke_role"),
        attr("role", role),
        attr("address", holder),
        attr("new_primary", primary_attr(primary)),
    ]))
}

pub fn try_set_primary_address(
    deps: DepsMut,
    role: String,
    holder: Addr,
) -> Result<Response, ContractError> {
    if !ROLES
        .may_load(deps.storage, (&role, &holder))?
        .unwrap_or_default()
    {
        return Err(ContractError::RoleNotHeld {
            role,
            holder: holder.to_string(),
        });
    }
    PRIMARY.save(deps.storage, &role, &holder)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_primary_address"),
        attr("role", role),
        attr("address", holder.clone()),
        attr("new_primary", holder),
    ]))
}

pub fn try_set_delegate(
    deps: DepsMut,
    delegate: Addr,
    grant: bool,
) -> Result<Response, ContractError> {
    let delegate = deps.api.addr_validate(delegate.as_str())?;
    if grant {
        DELEGATES.save(deps.storage, &delegate, &true)?;
    } else {
        DELEGATES.remove(deps.storage, &delegate);
    }

    Ok(Response::new().add_attributes(vec![
        attr(
            "action",
            if grant {
                "grant_delegate_role"
            } else {
                "revoke_delegate_role"
            },
        ),
        attr("address", delegate),
    ]))
}

pub fn try_register_payment_token(
    deps: DepsMut,
    address: Addr,
    decimals: u8,
    is_fiat: bool,
) -> Result<Response, ContractError> {
    let address = deps.api.addr_validate(address.as_str())?;

    // re-registering the current default as a plain token would leave no
    // fiat-proxy behind
    if !is_fiat {
        if let Some(default) = DEFAULT_FIAT.may_load(deps.storage)? {
            if default.eq(&address) {
                return Err(ContractError::DefaultFiatTokenInUse {
                    address: address.to_string(),
                });
            }
        }
    }

    PAYMENT_TOKENS.save(
        deps.storage,
        &address,
        &PaymentToken {
            address: address.clone(),
            decimals,
            is_fiat,
        },
    )?;
    if is_fiat {
        // repoint the single default; the previous fiat-proxy stays
        // registered as an ordinary settlement token
        if let Some(previous) = DEFAULT_FIAT.may_load(deps.storage)? {
            if previous.ne(&address) {
                PAYMENT_TOKENS.update(deps.storage, &previous, |token| -> StdResult<_> {
                    let mut token = token.ok_or_else(|| {
                        StdError::generic_err("default fiat-proxy token is not registered")
                    })?;
                    token.is_fiat = false;
                    Ok(token)
                })?;
            }
        }
        DEFAULT_FIAT.save(deps.storage, &address)?;
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "register_payment_token"),
        attr("address", address),
        attr("decimals", decimals.to_string()),
        attr("is_fiat", is_fiat.to_string()),
    ]))
}

pub fn try_remove_payment_token(deps: DepsMut, address: Addr) -> Result<Response, ContractError> {
    if PAYMENT_TOKENS.may_load(deps.storage, &address)?.is_none() {
        return Err(ContractError::PaymentTokenNotFound {
            address: address.to_string(),
        });
    }
    if let Some(default) = DEFAULT_FIAT.may_load(deps.storage)? {
        if default.eq(&address) {
            return Err(ContractError::DefaultFiatTokenInUse {
                address: address.to_string(),
            });
        }
    }
    PAYMENT_TOKENS.remove(deps.storage, &address);

    Ok(Response::new().add_attributes(vec![
        attr("action", "remove_payment_token"),
        attr("address", address),
    ]))
}

fn primary_attr(primary: Option<Addr>) -> String {
    primary
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "none".to_string())
}

// ============================== Query Handlers ==============================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::HasRole { role, address } => to_json_binary(&HasRoleResponse {
            has_role: ROLES
                .may_load(deps.storage, (&role, &address))?
                .unwrap_or_default(),
        }),
        QueryMsg::GetPrimaryAddress { role } => to_json_binary(&PrimaryAddressResponse {
            primary: PRIMARY.may_load(deps.storage, &role)?,
        }),
        QueryMsg::HasDelegateRole { address } => to_json_binary(&HasDelegateRoleResponse {
            has_delegate_role: DELEGATES
                .may_load(deps.storage, &address)?
                .unwrap_or_default(),
        }),
        QueryMsg::PaymentToken { address } => to_json_binary(&query_payment_token(deps, address)?),
        QueryMsg::ListPaymentTokens {
            limit,
            offset,
            order,
        } => to_json_binary(&query_payment_tokens(deps, limit, offset, order)?),
        QueryMsg::DefaultFiatToken {} => to_json_binary(&query_default_fiat_token(deps)?),
        QueryMsg::GetContractInfo {} => to_json_binary(&CONTRACT_INFO.load(deps.storage)?),
    }
}

fn query_payment_token(deps: Deps, address: Addr) -> StdResult<PaymentToken> {
    PAYMENT_TOKENS
        .may_load(deps.storage, &address)?
        .ok_or_else(|| StdError::generic_err(format!("payment token {} not registered", address)))
}

fn query_payment_tokens(
    deps: Deps,
    limit: Option<u8>,
    offset: Option<Addr>,
    order: Option<u8>,
) -> StdResult<PaymentTokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let mut min: Option<Bound<&Addr>> = None;
    let mut max: Option<Bound<&Addr>> = None;
    let mut order_enum = Order::Ascending;
    if let Some(num) = order {
        if num == 2 {
            order_enum = Order::Descending;
        }
    }
    if let Some(offset) = offset.as_ref() {
        let bound = Some(Bound::exclusive(offset));
        match order_enum {
            Order::Ascending => min = bound,
            Order::Descending => max = bound,
        }
    }

    let tokens: StdResult<Vec<PaymentToken>> = PAYMENT_TOKENS
        .range(deps.storage, min, max, order_enum)
        .take(limit)
        .map(|item| item.map(|(_, token)| token))
        .collect();
    Ok(PaymentTokensResponse { tokens: tokens? })
}

fn query_default_fiat_token(deps: Deps) -> StdResult<PaymentToken> {
    let default = DEFAULT_FIAT
        .may_load(deps.storage)?
        .ok_or_else(|| StdError::generic_err("no default fiat-proxy token registered"))?;
    query_payment_token(deps, default)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(_deps: DepsMut, _env: Env, _msg: MigrateMsg) -> StdResult<Response> {
    Ok(Response::default())
}
