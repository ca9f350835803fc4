#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response, StdError,
    StdResult,
};
use cw_storage_plus::Bound;

use curio_base::{domain_separator, query_has_role, ROLE_ADMIN};

use crate::error::ContractError;
use crate::msg::{
    DurationEntry, DurationMsg, DurationsResponse, ExecuteMsg, InstantiateMsg, MigrateMsg,
    QueryMsg, SalesResponse, ScheduleMsg, SchedulesResponse, UpdateContractMsg,
};
use crate::sale::{try_buy, try_list, try_renew, try_withdraw};
use crate::state::{
    increment_schedules, sales, ContractInfo, Sale, ScheduleWindow, CONTRACT_INFO,
    DOMAIN_SEPARATOR, DURATIONS, NONCES, PAUSED, SCHEDULES,
};

// settings for pagination
const MAX_LIMIT: u8 = 100;
const DEFAULT_LIMIT: u8 = 20;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let contract_info = ContractInfo {
        name: msg.name,
        version: msg.version,
        creator: info.sender,
        registry: deps.api.addr_validate(msg.registry.as_str())?,
        fee_contract: deps.api.addr_validate(msg.fee_contract.as_str())?,
        membership_contract: deps.api.addr_validate(msg.membership_contract.as_str())?,
        addr_prefix: msg.addr_prefix,
        listing_delay: msg.listing_delay,
    };

    // fixed for the lifetime of the deployment; a migration to another chain
    // or address invalidates every outstanding signature
    let separator = domain_separator(
        &contract_info.name,
        &contract_info.version,
        &env.block.chain_id,
        &env.contract.address,
    );
    DOMAIN_SEPARATOR.save(deps.storage, &Binary::from(separator.as_slice()))?;

    CONTRACT_INFO.save(deps.storage, &contract_info)?;
    PAUSED.save(deps.storage, &false)?;

    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::List(msg) => try_list(deps, env, info, msg),
        ExecuteMsg::Buy { auth, sale_id } => try_buy(deps, env, info, auth, sale_id),
        ExecuteMsg::Withdraw { auth, sale_id } => try_withdraw(deps, env, info, auth, sale_id),
        ExecuteMsg::Renew { auth, sale_id } => try_renew(deps, env, info, auth, sale_id),
        ExecuteMsg::SetSchedules { schedules } => try_set_schedules(deps, info, schedules),
        ExecuteMsg::RemoveSchedules { ids } => try_remove_schedules(deps, info, ids),
        ExecuteMsg::SetDurations { durations } => try_set_durations(deps, info, durations),
        ExecuteMsg::SetListingDelay { seconds } => try_set_listing_delay(deps, info, seconds),
        ExecuteMsg::Pause {} => try_set_paused(deps, info, true),
        ExecuteMsg::Unpause {} => try_set_paused(deps, info, false),
        ExecuteMsg::UpdateInfo(msg) => try_update_info(deps, info, msg),
    }
}

/// Admin-equivalent callers are the contract creator and every holder of the
/// registry's admin role.
fn check_admin(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    if contract_info.creator.eq(sender) {
        return Ok(());
    }
    if query_has_role(&deps.querier, &contract_info.registry, ROLE_ADMIN, sender)? {
        return Ok(());
    }
    Err(ContractError::Unauthorized {
        sender: sender.to_string(),
    })
}

/// Replaces nothing and validates everything up front: one malformed row
/// rejects the whole batch, leaving the stored schedule untouched.
pub fn try_set_schedules(
    deps: DepsMut,
    info: MessageInfo,
    schedules: Vec<ScheduleMsg>,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    for row in schedules.iter() {
        let valid = (1..=7).contains(&row.day_of_week) && row.hour < 24 && row.minute < 60;
        if !valid {
            return Err(ContractError::InvalidSchedule {
                day: row.day_of_week,
                hour: row.hour,
                minute: row.minute,
            });
        }
    }

    let mut ids = Vec::with_capacity(schedules.len());
    for row in schedules {
        let id = increment_schedules(deps.storage)?;
        SCHEDULES.save(
            deps.storage,
            id,
            &ScheduleWindow {
                id,
                day_of_week: row.day_of_week,
                hour: row.hour,
                minute: row.minute,
                active: row.active,
            },
        )?;
        ids.push(id.to_string());
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_schedules"),
        attr("ids", ids.join(",")),
    ]))
}

pub fn try_remove_schedules(
    deps: DepsMut,
    info: MessageInfo,
    ids: Vec<u64>,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    for id in ids.iter() {
        if SCHEDULES.may_load(deps.storage, *id)?.is_none() {
            return Err(ContractError::ScheduleNotFound { id: *id });
        }
    }
    for id in ids.iter() {
        SCHEDULES.remove(deps.storage, *id);
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "remove_schedules"),
        attr("count", ids.len().to_string()),
    ]))
}

pub fn try_set_durations(
    deps: DepsMut,
    info: MessageInfo,
    durations: Vec<DurationMsg>,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    for row in durations.iter() {
        if row.seconds == 0 {
            return Err(ContractError::InvalidDuration {});
        }
    }
    for row in durations.iter() {
        DURATIONS.save(deps.storage, row.duration_id, &row.seconds)?;
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_durations"),
        attr("count", durations.len().to_string()),
    ]))
}

pub fn try_set_listing_delay(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    CONTRACT_INFO.update(deps.storage, |mut contract_info| -> StdResult<_> {
        contract_info.listing_delay = seconds;
        Ok(contract_info)
    })?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_listing_delay"),
        attr("seconds", seconds.to_string()),
    ]))
}

pub fn try_set_paused(
    deps: DepsMut,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    PAUSED.save(deps.storage, &paused)?;

    Ok(Response::new().add_attributes(vec![attr(
        "action",
        if paused { "pause" } else { "unpause" },
    )]))
}

pub fn try_update_info(
    deps: DepsMut,
    info: MessageInfo,
    msg: UpdateContractMsg,
) -> Result<Response, ContractError> {
    check_admin(deps.as_ref(), &info.sender)?;
    let contract_info =
        CONTRACT_INFO.update(deps.storage, |mut contract_info| -> StdResult<_> {
            if let Some(registry) = msg.registry {
                contract_info.registry = registry;
            }
            if let Some(fee_contract) = msg.fee_contract {
                contract_info.fee_contract = fee_contract;
            }
            if let Some(membership_contract) = msg.membership_contract {
                contract_info.membership_contract = membership_contract;
            }
            if let Some(creator) = msg.creator {
                contract_info.creator = creator;
            }
            Ok(contract_info)
        })?;

    Ok(Response::new()
        .add_attributes(vec![attr("action", "update_info")])
        .set_data(to_json_binary(&contract_info)?))
}

// ============================== Query Handlers ==============================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetSale { sale_id } => to_json_binary(&query_sale(deps, sale_id)?),
        QueryMsg::GetSales {
            limit,
            offset,
            order,
        } => to_json_binary(&query_sales(deps, limit, offset, order)?),
        QueryMsg::GetSalesBySeller {
            seller,
            limit,
            offset,
            order,
        } => to_json_binary(&query_sales_by_seller(deps, seller, limit, offset, order)?),
        QueryMsg::GetSalesByCollection {
            collection,
            limit,
            offset,
            order,
        } => to_json_binary(&query_sales_by_collection(
            deps, collection, limit, offset, order,
        )?),
        QueryMsg::GetSchedule { schedule_id } => {
            to_json_binary(&SCHEDULES.load(deps.storage, schedule_id)?)
        }
        QueryMsg::GetSchedules {} => to_json_binary(&query_schedules(deps, false)?),
        QueryMsg::GetActiveSchedules {} => to_json_binary(&query_schedules(deps, true)?),
        QueryMsg::GetDuration { duration_id } => {
            to_json_binary(&DURATIONS.load(deps.storage, duration_id)?)
        }
        QueryMsg::GetDurations {} => to_json_binary(&query_durations(deps)?),
        QueryMsg::GetNonce { address } => to_json_binary(
            &NONCES
                .may_load(deps.storage, &address)?
                .unwrap_or_default(),
        ),
        QueryMsg::GetDomainSeparator {} => {
            let separator = DOMAIN_SEPARATOR.load(deps.storage)?;
            to_json_binary(&hex::encode(separator.as_slice()))
        }
        QueryMsg::Paused {} => to_json_binary(&PAUSED.load(deps.storage)?),
        QueryMsg::GetContractInfo {} => to_json_binary(&CONTRACT_INFO.load(deps.storage)?),
    }
}

/// Dead records are not served: a sold id fails like an unknown one.
fn query_sale(deps: Deps, sale_id: u64) -> StdResult<Sale> {
    let sale = sales()
        .may_load(deps.storage, sale_id)?
        .ok_or_else(|| StdError::generic_err(format!("sale {} not found", sale_id)))?;
    if !sale.active {
        return Err(StdError::generic_err(format!(
            "sale {} is no longer active",
            sale_id
        )));
    }
    Ok(sale)
}

fn range_params(
    limit: Option<u8>,
    offset: Option<u64>,
    order: Option<u8>,
) -> (usize, Option<Bound<'static, u64>>, Option<Bound<'static, u64>>, Order) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let mut min = None;
    let mut max = None;
    let mut order_enum = Order::Ascending;
    if let Some(num) = order {
        if num == 2 {
            order_enum = Order::Descending;
        }
    }
    if let Some(offset) = offset {
        let bound = Some(Bound::exclusive(offset));
        match order_enum {
            Order::Ascending => min = bound,
            Order::Descending => max = bound,
        }
    }
    (limit, min, max, order_enum)
}

/// Listing queries only surface records still open for purchase.
fn query_sales(
    deps: Deps,
    limit: Option<u8>,
    offset: Option<u64>,
    order: Option<u8>,
) -> StdResult<SalesResponse> {
    let (limit, min, max, order_enum) = range_params(limit, offset, order);
    let sales: StdResult<Vec<Sale>> = sales()
        .range(deps.storage, min, max, order_enum)
        .filter(|item| matches!(item, Ok((_, sale)) if sale.active) || item.is_err())
        .take(limit)
        .map(|item| item.map(|(_, sale)| sale))
        .collect();
    Ok(SalesResponse { sales: sales? })
}

fn query_sales_by_seller(
    deps: Deps,
    seller: Addr,
    limit: Option<u8>,
    offset: Option<u64>,
    order: Option<u8>,
) -> StdResult<SalesResponse> {
    let (limit, min, max, order_enum) = range_params(limit, offset, order);
    let sales: StdResult<Vec<Sale>> = sales()
        .idx
        .seller
        .prefix(seller)
        .range(deps.storage, min, max, order_enum)
        .filter(|item| matches!(item, Ok((_, sale)) if sale.active) || item.is_err())
        .take(limit)
        .map(|item| item.map(|(_, sale)| sale))
        .collect();
    Ok(SalesResponse { sales: sales? })
}

fn query_sales_by_collection(
    deps: Deps,
    collection: String,
    limit: Option<u8>,
    offset: Option<u64>,
    order: Option<u8>,
) -> StdResult<SalesResponse> {
    let (limit, min, max, order_enum) = range_params(limit, offset, order);
    let sales: StdResult<Vec<Sale>> = sales()
        .idx
        .collection
        .prefix(collection)
        .range(deps.storage, min, max, order_enum)
        .filter(|item| matches!(item, Ok((_, sale)) if sale.active) || item.is_err())
        .take(limit)
        .map(|item| item.map(|(_, sale)| sale))
        .collect();
    Ok(SalesResponse { sales: sales? })
}

fn query_schedules(deps: Deps, active_only: bool) -> StdResult<SchedulesResponse> {
    let schedules: StdResult<Vec<ScheduleWindow>> = SCHEDULES
        .range(deps.storage, None, None, Order::Ascending)
        .filter(|item| matches!(item, Ok((_, window)) if window.active || !active_only) || item.is_err())
        .map(|item| item.map(|(_, window)| window))
        .collect();
    Ok(SchedulesResponse {
        schedules: schedules?,
    })
}

fn query_durations(deps: Deps) -> StdResult<DurationsResponse> {
    let durations: StdResult<Vec<DurationEntry>> = DURATIONS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            item.map(|(duration_id, seconds)| DurationEntry {
                duration_id,
                seconds,
            })
        })
        .collect();
    Ok(DurationsResponse {
        durations: durations?,
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(_deps: DepsMut, _env: Env, _msg: MigrateMsg) -> StdResult<Response> {
    Ok(Response::default())
}
