#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, to_json_binary, Addr, Attribute, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo,
    Order, Response, StdError, StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use cw_storage_plus::Bound;

use curio_base::{query_has_delegate_role, query_has_role, ROLE_ADMIN};

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, FeesResponse, InstantiateMsg, MigrateMsg, QueryMsg, ServiceFeeResponse};
use crate::state::{
    ContractInfo, FeeEntry, MembershipFeeTier, CONTRACT_INFO, FEES, MAX_FEE_BPS, MEMBERSHIP_FEES,
    SERVICE_FEES,
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
    let treasury = deps.api.addr_validate(msg.treasury.as_str())?;
    CONTRACT_INFO.save(
        deps.storage,
        &ContractInfo {
            name: msg.name,
            creator: info.sender,
            registry: deps.api.addr_validate(msg.registry.as_str())?,
            treasury,
        },
    )?;
    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddFee {
            name,
            percentage,
            recipient,
        } => try_add_fee(deps, info, name, percentage, recipient),
        ExecuteMsg::RemoveFee { name } => try_remove_fee(deps, info, name),
        ExecuteMsg::SetMembershipFees {
            membership_id,
            seller_fee,
            buyer_fee,
        } => try_set_membership_fees(deps, info, membership_id, seller_fee, buyer_fee),
        ExecuteMsg::SetServiceFee { operation, amount } => {
            try_set_service_fee(deps, info, operation, amount)
        }
        ExecuteMsg::UpdateTreasuryAddress { treasury } => {
            try_update_treasury(deps, info, treasury)
        }
        ExecuteMsg::SplitFees {
            amount,
            currency,
            seller,
            buyer,
            seller_membership,
            buyer_membership,
        } => try_split_fees(
            deps,
            info,
            amount,
            currency,
            seller,
            buyer,
            seller_membership,
            buyer_membership,
        ),
        ExecuteMsg::ChargeServiceFee { operation, payer } => {
            try_charge_service_fee(deps, info, operation, payer)
        }
    }
}

fn check_admin(deps: Deps, contract_info: &ContractInfo, sender: &Addr) -> Result<(), ContractError> {
    if contract_info.creator.eq(sender)
        || query_has_role(&deps.querier, &contract_info.registry, ROLE_ADMIN, sender)?
    {
        return Ok(());
    }
    Err(ContractError::Unauthorized {
        sender: sender.to_string(),
    })
}

/// Settlement entry points are reserved for registry-flagged delegate
/// components. The check runs on the transport-authenticated sender, so a
/// delegate-flagged signing key calling through some other contract is
/// rejected: the fee engine sees that contract, not the key.
fn check_delegate(
    deps: Deps,
    contract_info: &ContractInfo,
    sender: &Addr,
) -> Result<(), ContractError> {
    if query_has_delegate_role(&deps.querier, &contract_info.registry, sender)? {
        return Ok(());
    }
    Err(ContractError::Unauthorized {
        sender: sender.to_string(),
    })
}

pub fn try_add_fee(
    deps: DepsMut,
    info: MessageInfo,
    name: String,
    percentage: u64,
    recipient: Addr,
) -> Result<Response, ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_admin(deps.as_ref(), &contract_info, &info.sender)?;

    if percentage > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeePercentage { value: percentage });
    }
    if FEES.may_load(deps.storage, &name)?.is_some() {
        return Err(ContractError::DuplicateFee { name });
    }
    let total = total_fee_percentage(deps.as_ref())? + percentage;
    if total > MAX_FEE_BPS {
        return Err(ContractError::FeeOverflow { total });
    }

    let recipient = deps.api.addr_validate(recipient.as_str())?;
    FEES.save(
        deps.storage,
        &name,
        &FeeEntry {
            name: name.clone(),
            percentage,
            recipient: recipient.clone(),
        },
    )?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "add_fee"),
        attr("name", name),
        attr("percentage", percentage.to_string()),
        attr("recipient", recipient),
    ]))
}

pub fn try_remove_fee(
    deps: DepsMut,
    info: MessageInfo,
    name: String,
) -> Result<Response, ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_admin(deps.as_ref(), &contract_info, &info.sender)?;

    if FEES.may_load(deps.storage, &name)?.is_none() {
        return Err(ContractError::FeeNotFound { name });
    }
    FEES.remove(deps.storage, &name);

    Ok(Response::new().add_attributes(vec![attr("action", "remove_fee"), attr("name", name)]))
}

pub fn try_set_membership_fees(
    deps: DepsMut,
    info: MessageInfo,
    membership_id: u64,
    seller_fee: u64,
    buyer_fee: u64,
) -> Result<Response, ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_admin(deps.as_ref(), &contract_info, &info.sender)?;

    if seller_fee > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeePercentage { value: seller_fee });
    }
    if buyer_fee > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeePercentage { value: buyer_fee });
    }
    MEMBERSHIP_FEES.save(
        deps.storage,
        membership_id,
        &MembershipFeeTier {
            seller_fee,
            buyer_fee,
        },
    )?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_membership_fees"),
        attr("membership_id", membership_id.to_string()),
        attr("seller_fee", seller_fee.to_string()),
        attr("buyer_fee", buyer_fee.to_string()),
    ]))
}

pub fn try_set_service_fee(
    deps: DepsMut,
    info: MessageInfo,
    operation: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_admin(deps.as_ref(), &contract_info, &info.sender)?;

    SERVICE_FEES.save(deps.storage, &operation, &amount)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_service_fee"),
        attr("operation", operation),
        attr("amount", amount),
    ]))
}

pub fn try_update_treasury(
    deps: DepsMut,
    info: MessageInfo,
    treasury: Addr,
) -> Result<Response, ContractError> {
    let mut contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_admin(deps.as_ref(), &contract_info, &info.sender)?;

    // repoints the recipient only; fee-table percentages are untouched
    contract_info.treasury = deps.api.addr_validate(treasury.as_str())?;
    CONTRACT_INFO.save(deps.storage, &contract_info)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "update_treasury_address"),
        attr("treasury", contract_info.treasury),
    ]))
}

#[allow(clippy::too_many_arguments)]
pub fn try_split_fees(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
    currency: Addr,
    seller: Addr,
    buyer: Addr,
    seller_membership: u64,
    buyer_membership: u64,
) -> Result<Response, ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_delegate(deps.as_ref(), &contract_info, &info.sender)?;

    let mut msgs: Vec<CosmosMsg> = vec![];
    let mut attrs: Vec<Attribute> = vec![
        attr("action", "split_fees"),
        attr("amount", amount),
        attr("seller", seller.as_str()),
        attr("buyer", buyer.as_str()),
    ];
    let mut seller_amount = amount;

    // a configured non-zero tier overrides the whole generic table for the
    // seller side; tier 0 or an unset tier falls back to it
    let seller_tier = load_tier(deps.as_ref(), seller_membership)?;
    if let Some(tier) = seller_tier {
        let cut = amount.multiply_ratio(tier.seller_fee, MAX_FEE_BPS);
        if !cut.is_zero() {
            msgs.push(transfer_from(&currency, &buyer, &contract_info.treasury, cut)?);
            attrs.push(attr("membership_seller_fee", cut));
        }
        seller_amount = seller_amount.checked_sub(cut).map_err(StdError::from)?;
    } else {
        let fees = all_fees(deps.as_ref())?;
        for fee in fees {
            let share = amount.multiply_ratio(fee.percentage, MAX_FEE_BPS);
            if share.is_zero() {
                continue;
            }
            msgs.push(transfer_from(&currency, &buyer, &fee.recipient, share)?);
            attrs.push(attr(format!("fee_{}", fee.name), share));
            seller_amount = seller_amount.checked_sub(share).map_err(StdError::from)?;
        }
    }

    // buyer-side membership fee is a surcharge on top of the price
    if let Some(tier) = load_tier(deps.as_ref(), buyer_membership)? {
        let surcharge = amount.multiply_ratio(tier.buyer_fee, MAX_FEE_BPS);
        if !surcharge.is_zero() {
            msgs.push(transfer_from(
                &currency,
                &buyer,
                &contract_info.treasury,
                surcharge,
            )?);
            attrs.push(attr("membership_buyer_fee", surcharge));
        }
    }

    // the remainder, rounding dust included, is the seller's
    if !seller_amount.is_zero() {
        msgs.push(transfer_from(&currency, &buyer, &seller, seller_amount)?);
    }
    attrs.push(attr("seller_amount", seller_amount));

    Ok(Response::new().add_messages(msgs).add_attributes(attrs))
}

pub fn try_charge_service_fee(
    deps: DepsMut,
    info: MessageInfo,
    operation: String,
    payer: Addr,
) -> Result<Response, ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    check_delegate(deps.as_ref(), &contract_info, &info.sender)?;

    let amount = SERVICE_FEES
        .may_load(deps.storage, &operation)?
        .unwrap_or_default();

    let mut response = Response::new().add_attributes(vec![
        attr("action", "charge_service_fee"),
        attr("operation", operation),
        attr("payer", payer.as_str()),
        attr("amount", amount),
    ]);
    if !amount.is_zero() {
        let currency = default_fiat_currency(deps.as_ref(), &contract_info)?;
        response = response.add_message(transfer_from(
            &currency,
            &payer,
            &contract_info.treasury,
            amount,
        )?);
    }
    Ok(response)
}

/// Service fees are flat charges independent of the sale currency; they are
/// collected in the registry's default fiat-proxy token.
fn default_fiat_currency(deps: Deps, contract_info: &ContractInfo) -> StdResult<Addr> {
    let token = curio_base::query_default_fiat_token(&deps.querier, &contract_info.registry)?;
    Ok(token.address)
}

fn load_tier(deps: Deps, membership_id: u64) -> StdResult<Option<MembershipFeeTier>> {
    if membership_id == 0 {
        return Ok(None);
    }
    MEMBERSHIP_FEES.may_load(deps.storage, membership_id)
}

fn all_fees(deps: Deps) -> StdResult<Vec<FeeEntry>> {
    FEES.range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, fee)| fee))
        .collect()
}

fn total_fee_percentage(deps: Deps) -> StdResult<u64> {
    Ok(all_fees(deps)?.iter().map(|fee| fee.percentage).sum())
}

fn transfer_from(
    currency: &Addr,
    owner: &Addr,
    recipient: &Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: currency.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: owner.to_string(),
            recipient: recipient.to_string(),
            amount,
        })?,
        funds: vec![],
    }
    .into())
}

// ============================== Query Handlers ==============================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetFee { name } => to_json_binary(&query_fee(deps, name)?),
        QueryMsg::GetFees {
            limit,
            offset,
            order,
        } => to_json_binary(&query_fees(deps, limit, offset, order)?),
        QueryMsg::GetMembershipFees { membership_id } => to_json_binary(
            &MEMBERSHIP_FEES
                .may_load(deps.storage, membership_id)?
                .unwrap_or(MembershipFeeTier {
                    seller_fee: 0,
                    buyer_fee: 0,
                }),
        ),
        QueryMsg::ServiceFee { operation } => to_json_binary(&ServiceFeeResponse {
            amount: SERVICE_FEES
                .may_load(deps.storage, &operation)?
                .unwrap_or_default(),
        }),
        QueryMsg::GetContractInfo {} => to_json_binary(&CONTRACT_INFO.load(deps.storage)?),
    }
}

fn query_fee(deps: Deps, name: String) -> StdResult<FeeEntry> {
    FEES.may_load(deps.storage, &name)?
        .ok_or_else(|| StdError::generic_err(format!("no fee named {}", name)))
}

fn query_fees(
    deps: Deps,
    limit: Option<u8>,
    offset: Option<String>,
    order: Option<u8>,
) -> StdResult<FeesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let mut min: Option<Bound<&str>> = None;
    let mut max: Option<Bound<&str>> = None;
    let mut order_enum = Order::Ascending;
    if let Some(num) = order {
        if num == 2 {
            order_enum = Order::Descending;
        }
    }
    if let Some(offset) = offset.as_deref() {
        let bound = Some(Bound::exclusive(offset));
        match order_enum {
            Order::Ascending => min = bound,
            Order::Descending => max = bound,
        }
    }

    let fees: StdResult<Vec<FeeEntry>> = FEES
        .range(deps.storage, min, max, order_enum)
        .take(limit)
        .map(|item| item.map(|(_, fee)| fee))
        .collect();
    let fees = fees?;
    let total_percentage = total_fee_percentage(deps)?;
    Ok(FeesResponse {
        fees,
        total_percentage,
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(_deps: DepsMut, _env: Env, _msg: MigrateMsg) -> StdResult<Response> {
    Ok(Response::default())
}
