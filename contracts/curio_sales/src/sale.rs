use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, DepsMut, Env, MessageInfo, Order, Response, StdResult,
    Storage, WasmMsg,
};
use cw721::Cw721ExecuteMsg;

use curio_base::{
    auth_digest, query_default_fiat_token, query_has_delegate_role, query_has_role,
    query_membership, query_payment_token, struct_hash, word_addr, word_bool, word_str, word_u128,
    word_u64, AuthToken, FeeExecuteMsg, OP_BUY, OP_LIST, OP_RENEW, OP_WITHDRAW, ROLE_OPERATOR,
};

use crate::error::ContractError;
use crate::msg::ListMsg;
use crate::schedule::next_window_start;
use crate::state::{
    increment_sales, sales, ContractInfo, Sale, ScheduleWindow, CONTRACT_INFO, DOMAIN_SEPARATOR,
    DURATIONS, NONCES, PAUSED, SCHEDULES,
};

/// Common gate for every relayed action. Checks run in a fixed order and
/// nothing is written until all of them pass: pause flag, operator standing
/// of the transport sender, authorization expiry, nonce match, signature
/// recovery. Only then is the user's nonce advanced.
pub fn authorize_action(
    deps: &mut DepsMut,
    env: &Env,
    info: &MessageInfo,
    auth: &AuthToken,
    action: &str,
    fields: &[[u8; 32]],
) -> Result<ContractInfo, ContractError> {
    if PAUSED.load(deps.storage)? {
        return Err(ContractError::Paused {});
    }
    let contract_info = CONTRACT_INFO.load(deps.storage)?;
    let is_operator =
        query_has_role(&deps.querier, &contract_info.registry, ROLE_OPERATOR, &info.sender)?
            || query_has_delegate_role(&deps.querier, &contract_info.registry, &info.sender)?;
    if !is_operator {
        return Err(ContractError::Unauthorized {
            sender: info.sender.to_string(),
        });
    }
    if env.block.time.seconds() >= auth.expiry {
        return Err(ContractError::AuthorizationExpired {
            expiry: auth.expiry,
        });
    }
    let expected = NONCES.may_load(deps.storage, &auth.user)?.unwrap_or_default();
    if auth.nonce != expected {
        return Err(ContractError::NonceMismatch {
            expected,
            actual: auth.nonce,
        });
    }
    let separator = DOMAIN_SEPARATOR.load(deps.storage)?;
    let mut separator_bytes = [0u8; 32];
    separator_bytes.copy_from_slice(separator.as_slice());
    let digest = auth_digest(
        &separator_bytes,
        &struct_hash(action, auth.nonce, auth.expiry, fields),
    );
    auth.verify(deps.api, &digest, &contract_info.addr_prefix)?;
    NONCES.save(deps.storage, &auth.user, &(expected + 1))?;
    Ok(contract_info)
}

/// Start instant for a sale created no earlier than `earliest`: the next
/// active schedule window, or `earliest` itself when no window is active.
fn resolve_start(storage: &dyn Storage, earliest: u64) -> StdResult<u64> {
    let windows = SCHEDULES
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, window)| window))
        .collect::<StdResult<Vec<ScheduleWindow>>>()?;
    Ok(next_window_start(earliest, &windows).unwrap_or(earliest))
}

fn transfer_nft(nft_contract: &Addr, recipient: &Addr, token_id: &str) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: nft_contract.to_string(),
        msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
            recipient: recipient.to_string(),
            token_id: token_id.to_string(),
        })?,
        funds: vec![],
    }))
}

fn charge_service_fee(fee_contract: &Addr, operation: &str, payer: &Addr) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: fee_contract.to_string(),
        msg: to_json_binary(&FeeExecuteMsg::ChargeServiceFee {
            operation: operation.to_string(),
            payer: payer.clone(),
        })?,
        funds: vec![],
    }))
}

pub fn try_list(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ListMsg,
) -> Result<Response, ContractError> {
    if msg.price.is_zero() {
        return Err(ContractError::ZeroPrice {});
    }
    let registry = CONTRACT_INFO.load(deps.storage)?.registry;
    let currency = if msg.is_fiat {
        query_default_fiat_token(&deps.querier, &registry)?.address
    } else {
        let currency = msg.currency.clone().ok_or(ContractError::MissingCurrency {})?;
        query_payment_token(&deps.querier, &registry, &currency).map_err(|_| {
            ContractError::UnknownPaymentToken {
                address: currency.to_string(),
            }
        })?;
        currency
    };
    let duration = DURATIONS
        .may_load(deps.storage, msg.duration_id)?
        .ok_or(ContractError::DurationNotFound {
            id: msg.duration_id,
        })?;

    let currency_word = match &msg.currency {
        Some(addr) => word_addr(addr),
        None => word_str(""),
    };
    let fields = [
        word_addr(&msg.nft_contract),
        word_str(&msg.token_id),
        word_u128(msg.price),
        currency_word,
        word_bool(msg.is_fiat),
        word_u64(msg.duration_id),
        word_str(&msg.collection),
    ];
    let contract_info = authorize_action(&mut deps, &env, &info, &msg.auth, OP_LIST, &fields)?;

    let earliest = env.block.time.seconds() + contract_info.listing_delay;
    let start = resolve_start(deps.storage, earliest)?;
    let id = increment_sales(deps.storage)?;
    let sale = Sale {
        id,
        seller: msg.auth.user.clone(),
        nft_contract: msg.nft_contract.clone(),
        token_id: msg.token_id.clone(),
        price: msg.price,
        currency,
        start,
        end: start + duration,
        active: true,
        is_fiat: msg.is_fiat,
        collection: msg.collection,
    };
    sales().save(deps.storage, id, &sale)?;

    Ok(Response::new()
        .add_message(transfer_nft(
            &msg.nft_contract,
            &env.contract.address,
            &msg.token_id,
        )?)
        .add_message(charge_service_fee(
            &contract_info.fee_contract,
            OP_LIST,
            &msg.auth.user,
        )?)
        .add_attributes([
            ("action", "list"),
            ("sale_id", &id.to_string()),
            ("seller", msg.auth.user.as_str()),
            ("token_id", &msg.token_id),
            ("price", &msg.price.to_string()),
            ("start", &sale.start.to_string()),
            ("end", &sale.end.to_string()),
        ]))
}

pub fn try_buy(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    auth: AuthToken,
    sale_id: u64,
) -> Result<Response, ContractError> {
    let mut sale = sales()
        .may_load(deps.storage, sale_id)?
        .ok_or(ContractError::SaleNotFound { id: sale_id })?;
    if !sale.active {
        return Err(ContractError::SaleNotActive { id: sale_id });
    }
    let now = env.block.time.seconds();
    if now < sale.start {
        return Err(ContractError::SaleNotStarted { start: sale.start });
    }
    if now > sale.end {
        return Err(ContractError::SaleExpired { end: sale.end });
    }
    let contract_info =
        authorize_action(&mut deps, &env, &info, &auth, OP_BUY, &[word_u64(sale_id)])?;

    // the record is retired before any outbound message is appended
    sale.active = false;
    sales().save(deps.storage, sale_id, &sale)?;

    let seller_membership = query_membership(
        &deps.querier,
        &contract_info.membership_contract,
        &sale.seller,
    )?;
    let buyer_membership = query_membership(
        &deps.querier,
        &contract_info.membership_contract,
        &auth.user,
    )?;

    let split = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: contract_info.fee_contract.to_string(),
        msg: to_json_binary(&FeeExecuteMsg::SplitFees {
            amount: sale.price,
            currency: sale.currency.clone(),
            seller: sale.seller.clone(),
            buyer: auth.user.clone(),
            seller_membership,
            buyer_membership,
        })?,
        funds: vec![],
    });

    Ok(Response::new()
        .add_message(charge_service_fee(&contract_info.fee_contract, OP_BUY, &auth.user)?)
        .add_message(split)
        .add_message(transfer_nft(&sale.nft_contract, &auth.user, &sale.token_id)?)
        .add_attributes([
            ("action", "buy"),
            ("sale_id", &sale_id.to_string()),
            ("buyer", auth.user.as_str()),
            ("seller", sale.seller.as_str()),
            ("price", &sale.price.to_string()),
        ]))
}

pub fn try_withdraw(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    auth: AuthToken,
    sale_id: u64,
) -> Result<Response, ContractError> {
    let sale = sales()
        .may_load(deps.storage, sale_id)?
        .ok_or(ContractError::SaleNotFound { id: sale_id })?;
    if !sale.active {
        return Err(ContractError::SaleNotActive { id: sale_id });
    }
    if auth.user != sale.seller {
        return Err(ContractError::Unauthorized {
            sender: auth.user.to_string(),
        });
    }
    let contract_info =
        authorize_action(&mut deps, &env, &info, &auth, OP_WITHDRAW, &[word_u64(sale_id)])?;

    sales().remove(deps.storage, sale_id)?;

    Ok(Response::new()
        .add_message(charge_service_fee(
            &contract_info.fee_contract,
            OP_WITHDRAW,
            &sale.seller,
        )?)
        .add_message(transfer_nft(&sale.nft_contract, &sale.seller, &sale.token_id)?)
        .add_attributes([
            ("action", "withdraw"),
            ("sale_id", &sale_id.to_string()),
            ("seller", sale.seller.as_str()),
        ]))
}

pub fn try_renew(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    auth: AuthToken,
    sale_id: u64,
) -> Result<Response, ContractError> {
    let mut sale = sales()
        .may_load(deps.storage, sale_id)?
        .ok_or(ContractError::SaleNotFound { id: sale_id })?;
    if !sale.active {
        return Err(ContractError::SaleNotActive { id: sale_id });
    }
    let now = env.block.time.seconds();
    if now <= sale.end {
        return Err(ContractError::SaleStillActive { end: sale.end });
    }
    if auth.user != sale.seller {
        return Err(ContractError::Unauthorized {
            sender: auth.user.to_string(),
        });
    }
    let contract_info =
        authorize_action(&mut deps, &env, &info, &auth, OP_RENEW, &[word_u64(sale_id)])?;

    // the original run length is preserved across renewals; no listing
    // delay applies, custody never moved
    let duration = sale.end - sale.start;
    sale.start = resolve_start(deps.storage, now)?;
    sale.end = sale.start + duration;
    sales().save(deps.storage, sale_id, &sale)?;

    Ok(Response::new()
        .add_message(charge_service_fee(
            &contract_info.fee_contract,
            OP_RENEW,
            &sale.seller,
        )?)
        .add_attributes([
            ("action", "renew"),
            ("sale_id", &sale_id.to_string()),
            ("start", &sale.start.to_string()),
            ("end", &sale.end.to_string()),
        ]))
}
