//! Minimal stand-ins for the external collaborators: an NFT custody
//! contract and a membership-tier oracle. Only the surface the marketplace
//! touches is implemented.

/// Custody contract holding one owner per token. Approval bookkeeping is the
/// real custody contract's business; here any sender may move a token.
pub mod custody {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    };
    use cw_storage_plus::Map;

    pub const OWNERS: Map<&str, Addr> = Map::new("owners");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub tokens: Vec<(String, Addr)>,
    }

    /// Wire-compatible with the cw721 TransferNft variant the engine emits.
    #[cw_serde]
    pub enum ExecuteMsg {
        TransferNft { recipient: String, token_id: String },
    }

    #[cw_serde]
    pub enum QueryMsg {
        OwnerOf { token_id: String },
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        for (token_id, owner) in msg.tokens {
            OWNERS.save(deps.storage, &token_id, &owner)?;
        }
        Ok(Response::default())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        let ExecuteMsg::TransferNft {
            recipient,
            token_id,
        } = msg;
        OWNERS.save(deps.storage, &token_id, &Addr::unchecked(recipient))?;
        Ok(Response::default())
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        let QueryMsg::OwnerOf { token_id } = msg;
        to_json_binary(&OWNERS.load(deps.storage, &token_id)?)
    }
}

/// Membership oracle answering tier lookups from a fixed table.
pub mod membership {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult,
    };
    use cw_storage_plus::Map;

    use curio_base::{MembershipQueryMsg, MembershipResponse};

    pub const TIERS: Map<&Addr, u64> = Map::new("tiers");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub tiers: Vec<(Addr, u64)>,
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        for (address, tier_id) in msg.tiers {
            TIERS.save(deps.storage, &address, &tier_id)?;
        }
        Ok(Response::default())
    }

    pub fn execute(
        _deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: Empty,
    ) -> StdResult<Response> {
        Ok(Response::default())
    }

    pub fn query(deps: Deps, _env: Env, msg: MembershipQueryMsg) -> StdResult<Binary> {
        let MembershipQueryMsg::GetMembership { address } = msg;
        to_json_binary(&MembershipResponse {
            tier_id: TIERS.may_load(deps.storage, &address)?.unwrap_or_default(),
        })
    }
}
