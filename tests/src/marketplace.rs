use cosmwasm_std::{Addr, Binary, Empty, Timestamp, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20QueryMsg};
use cw_multi_test::{App, Contract, ContractWrapper, Executor};
use k256::ecdsa::SigningKey;

use curio_base::{
    auth_digest, pubkey_to_address, struct_hash, word_addr, word_bool, word_str, word_u128,
    word_u64, AuthToken, ROLE_OPERATOR,
};
use curio_fee_settlement::msg as fee_msg;
use curio_registry::msg as registry_msg;
use curio_sales::msg as sales_msg;
use curio_sales::ContractError as SalesError;

use crate::mocks;

const PREFIX: &str = "orai";
// Sunday 2020-09-13 12:26:40 UTC
const NOW: u64 = 1_600_000_000;
const EXPIRY: u64 = NOW + 100_000;
const LISTING_DELAY: u64 = 60;
const HOUR: u64 = 3_600;
const PRICE: u128 = 1_000;

fn registry_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        curio_registry::contract::execute,
        curio_registry::contract::instantiate,
        curio_registry::contract::query,
    ))
}

fn fee_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        curio_fee_settlement::contract::execute,
        curio_fee_settlement::contract::instantiate,
        curio_fee_settlement::contract::query,
    ))
}

fn sales_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        curio_sales::contract::execute,
        curio_sales::contract::instantiate,
        curio_sales::contract::query,
    ))
}

fn cw20_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

fn custody_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mocks::custody::execute,
        mocks::custody::instantiate,
        mocks::custody::query,
    ))
}

fn membership_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mocks::membership::execute,
        mocks::membership::instantiate,
        mocks::membership::query,
    ))
}

fn seller_key() -> SigningKey {
    SigningKey::from_slice(&[11u8; 32]).unwrap()
}

fn buyer_key() -> SigningKey {
    SigningKey::from_slice(&[22u8; 32]).unwrap()
}

fn signer_address(key: &SigningKey) -> Addr {
    let pubkey = key.verifying_key().to_encoded_point(false);
    pubkey_to_address(pubkey.as_bytes(), PREFIX).unwrap()
}

struct Suite {
    app: App,
    admin: Addr,
    relayer: Addr,
    treasury: Addr,
    seller: Addr,
    buyer: Addr,
    token: Addr,
    nft: Addr,
    fee: Addr,
    sales: Addr,
    separator: [u8; 32],
}

impl Suite {
    fn new() -> Self {
        let mut app = App::default();
        let admin = Addr::unchecked("creator");
        let relayer = Addr::unchecked("relayer");
        let treasury = Addr::unchecked("treasury");
        let seller = signer_address(&seller_key());
        let buyer = signer_address(&buyer_key());

        let registry_code = app.store_code(registry_contract());
        let fee_code = app.store_code(fee_contract());
        let sales_code = app.store_code(sales_contract());
        let cw20_code = app.store_code(cw20_contract());
        let custody_code = app.store_code(custody_contract());
        let membership_code = app.store_code(membership_contract());

        let registry = app
            .instantiate_contract(
                registry_code,
                admin.clone(),
                &registry_msg::InstantiateMsg {
                    name: "curio registry".to_string(),
                    admins: vec![],
                },
                &[],
                "registry",
                None,
            )
            .unwrap();
        let fee = app
            .instantiate_contract(
                fee_code,
                admin.clone(),
                &fee_msg::InstantiateMsg {
                    name: "curio fees".to_string(),
                    registry: registry.clone(),
                    treasury: treasury.clone(),
                },
                &[],
                "fees",
                None,
            )
            .unwrap();
        let membership = app
            .instantiate_contract(
                membership_code,
                admin.clone(),
                &mocks::membership::InstantiateMsg {
                    tiers: vec![(seller.clone(), 1)],
                },
                &[],
                "membership",
                None,
            )
            .unwrap();
        let token = app
            .instantiate_contract(
                cw20_code,
                admin.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: "Gold".to_string(),
                    symbol: "GOLD".to_string(),
                    decimals: 6,
                    initial_balances: vec![Cw20Coin {
                        address: buyer.to_string(),
                        amount: Uint128::new(1_000_000),
                    }],
                    mint: None,
                    marketing: None,
                },
                &[],
                "gold",
                None,
            )
            .unwrap();
        let nft = app
            .instantiate_contract(
                custody_code,
                admin.clone(),
                &mocks::custody::InstantiateMsg {
                    tokens: vec![("token_1".to_string(), seller.clone())],
                },
                &[],
                "custody",
                None,
            )
            .unwrap();
        let sales = app
            .instantiate_contract(
                sales_code,
                admin.clone(),
                &sales_msg::InstantiateMsg {
                    name: "curio sales".to_string(),
                    version: "1".to_string(),
                    registry: registry.clone(),
                    fee_contract: fee.clone(),
                    membership_contract: membership.clone(),
                    addr_prefix: PREFIX.to_string(),
                    listing_delay: LISTING_DELAY,
                },
                &[],
                "sales",
                None,
            )
            .unwrap();

        app.execute_contract(
            admin.clone(),
            registry.clone(),
            &registry_msg::ExecuteMsg::GrantRole {
                role: ROLE_OPERATOR.to_string(),
                holder: relayer.clone(),
            },
            &[],
        )
        .unwrap();
        // only the sales engine may order settlements
        app.execute_contract(
            admin.clone(),
            registry.clone(),
            &registry_msg::ExecuteMsg::GrantDelegateRole {
                delegate: sales.clone(),
            },
            &[],
        )
        .unwrap();
        app.execute_contract(
            admin.clone(),
            registry.clone(),
            &registry_msg::ExecuteMsg::RegisterPaymentToken {
                address: token.clone(),
                decimals: 6,
                is_fiat: false,
            },
            &[],
        )
        .unwrap();
        app.execute_contract(
            admin.clone(),
            fee.clone(),
            &fee_msg::ExecuteMsg::AddFee {
                name: "platform".to_string(),
                percentage: 250,
                recipient: treasury.clone(),
            },
            &[],
        )
        .unwrap();
        app.execute_contract(
            admin.clone(),
            sales.clone(),
            &sales_msg::ExecuteMsg::SetDurations {
                durations: vec![sales_msg::DurationMsg {
                    duration_id: 1,
                    seconds: HOUR,
                }],
            },
            &[],
        )
        .unwrap();
        // the fee engine pulls, so the buyer pre-approves it
        app.execute_contract(
            buyer.clone(),
            token.clone(),
            &cw20::Cw20ExecuteMsg::IncreaseAllowance {
                spender: fee.to_string(),
                amount: Uint128::new(1_000_000),
                expires: None,
            },
            &[],
        )
        .unwrap();

        let separator_hex: String = app
            .wrap()
            .query_wasm_smart(&sales, &sales_msg::QueryMsg::GetDomainSeparator {})
            .unwrap();
        let mut separator = [0u8; 32];
        separator.copy_from_slice(&hex::decode(separator_hex).unwrap());

        app.update_block(|block| block.time = Timestamp::from_seconds(NOW));

        Suite {
            app,
            admin,
            relayer,
            treasury,
            seller,
            buyer,
            token,
            nft,
            fee,
            sales,
            separator,
        }
    }

    fn sign(&self, key: &SigningKey, action: &str, nonce: u64, fields: &[[u8; 32]]) -> AuthToken {
        let digest = auth_digest(&self.separator, &struct_hash(action, nonce, EXPIRY, fields));
        let (signature, recovery) = key.sign_prehash_recoverable(&digest).unwrap();
        AuthToken {
            user: signer_address(key),
            nonce,
            expiry: EXPIRY,
            signature: Binary::from(signature.to_bytes().as_slice()),
            recovery_id: recovery.to_byte(),
        }
    }

    fn signed_list(&self, nonce: u64) -> sales_msg::ExecuteMsg {
        let fields = [
            word_addr(&self.nft),
            word_str("token_1"),
            word_u128(Uint128::new(PRICE)),
            word_addr(&self.token),
            word_bool(false),
            word_u64(1),
            word_str("vintage"),
        ];
        sales_msg::ExecuteMsg::List(sales_msg::ListMsg {
            auth: self.sign(&seller_key(), "list", nonce, &fields),
            nft_contract: self.nft.clone(),
            token_id: "token_1".to_string(),
            price: Uint128::new(PRICE),
            currency: Some(self.token.clone()),
            duration_id: 1,
            is_fiat: false,
            collection: "vintage".to_string(),
        })
    }

    fn signed_buy(&self, nonce: u64, sale_id: u64) -> sales_msg::ExecuteMsg {
        sales_msg::ExecuteMsg::Buy {
            auth: self.sign(&buyer_key(), "buy", nonce, &[word_u64(sale_id)]),
            sale_id,
        }
    }

    fn relay(&mut self, msg: &sales_msg::ExecuteMsg) -> anyhow::Result<()> {
        self.app
            .execute_contract(self.relayer.clone(), self.sales.clone(), msg, &[])
            .map(|_| ())
    }

    fn balance(&self, address: &Addr) -> u128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.token,
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }

    fn nft_owner(&self, token_id: &str) -> Addr {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.nft,
                &mocks::custody::QueryMsg::OwnerOf {
                    token_id: token_id.to_string(),
                },
            )
            .unwrap()
    }

    fn advance_to(&mut self, seconds: u64) {
        self.app
            .update_block(|block| block.time = Timestamp::from_seconds(seconds));
    }
}

#[test]
fn list_then_buy_settles_price_and_custody() {
    let mut suite = Suite::new();
    let list = suite.signed_list(0);
    suite.relay(&list).unwrap();
    // escrowed with the marketplace until sold
    assert_eq!(suite.nft_owner("token_1"), suite.sales);

    suite.advance_to(NOW + LISTING_DELAY);
    let buy = suite.signed_buy(0, 1);
    suite.relay(&buy).unwrap();

    // seller holds tier 1 but no override is configured, so the generic
    // 250 bps table applies: 25 to the treasury, the rest to the seller
    assert_eq!(suite.balance(&suite.treasury.clone()), 25);
    assert_eq!(suite.balance(&suite.seller.clone()), PRICE - 25);
    assert_eq!(suite.balance(&suite.buyer.clone()), 1_000_000 - PRICE);
    assert_eq!(suite.nft_owner("token_1"), suite.buyer);
}

#[test]
fn membership_override_replaces_the_fee_table() {
    let mut suite = Suite::new();
    suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.fee.clone(),
            &fee_msg::ExecuteMsg::SetMembershipFees {
                membership_id: 1,
                seller_fee: 500,
                buyer_fee: 0,
            },
            &[],
        )
        .unwrap();

    let list = suite.signed_list(0);
    suite.relay(&list).unwrap();
    suite.advance_to(NOW + LISTING_DELAY);
    let buy = suite.signed_buy(0, 1);
    suite.relay(&buy).unwrap();

    let seller_credit = suite.balance(&suite.seller.clone());
    assert_eq!(suite.balance(&suite.treasury.clone()), 50);
    assert_eq!(seller_credit, PRICE - 50);
    assert!(seller_credit > 0 && seller_credit < PRICE);
}

#[test]
fn replayed_buy_authorization_fails() {
    let mut suite = Suite::new();
    let list = suite.signed_list(0);
    suite.relay(&list).unwrap();
    suite.advance_to(NOW + LISTING_DELAY);

    // second copy of the same signed buy: the record is already retired and
    // even a fresh record could not revive the consumed nonce
    let buy = suite.signed_buy(0, 1);
    suite.relay(&buy).unwrap();
    let err = suite.relay(&buy).unwrap_err();
    assert!(matches!(
        err.downcast::<SalesError>().unwrap(),
        SalesError::SaleNotActive { id: 1 }
    ));

    let list = suite.signed_list(1);
    suite.relay(&list).unwrap();
    suite.advance_to(NOW + 2 * LISTING_DELAY);
    let stale_buy = suite.signed_buy(0, 2);
    let err = suite.relay(&stale_buy).unwrap_err();
    assert!(matches!(
        err.downcast::<SalesError>().unwrap(),
        SalesError::NonceMismatch {
            expected: 1,
            actual: 0
        }
    ));
}

#[test]
fn settlement_is_reserved_for_delegate_flagged_contracts() {
    let mut suite = Suite::new();
    let split = fee_msg::ExecuteMsg::SplitFees {
        amount: Uint128::new(PRICE),
        currency: suite.token.clone(),
        seller: suite.seller.clone(),
        buyer: suite.buyer.clone(),
        seller_membership: 0,
        buyer_membership: 0,
    };

    // the relayer is an operator yet carries no delegate flag
    let err = suite
        .app
        .execute_contract(suite.relayer.clone(), suite.fee.clone(), &split, &[])
        .unwrap_err();
    assert!(matches!(
        err.downcast::<curio_fee_settlement::ContractError>().unwrap(),
        curio_fee_settlement::ContractError::Unauthorized { .. }
    ));

    let err = suite
        .app
        .execute_contract(suite.buyer.clone(), suite.fee.clone(), &split, &[])
        .unwrap_err();
    assert!(matches!(
        err.downcast::<curio_fee_settlement::ContractError>().unwrap(),
        curio_fee_settlement::ContractError::Unauthorized { .. }
    ));

    // nothing moved
    assert_eq!(suite.balance(&suite.treasury.clone()), 0);
    assert_eq!(suite.balance(&suite.buyer.clone()), 1_000_000);
}

#[test]
fn withdraw_returns_custody_to_the_seller() {
    let mut suite = Suite::new();
    let list = suite.signed_list(0);
    suite.relay(&list).unwrap();
    assert_eq!(suite.nft_owner("token_1"), suite.sales);

    let withdraw = sales_msg::ExecuteMsg::Withdraw {
        auth: suite.sign(&seller_key(), "withdraw", 1, &[word_u64(1)]),
        sale_id: 1,
    };
    suite.relay(&withdraw).unwrap();
    assert_eq!(suite.nft_owner("token_1"), suite.seller);
    assert_eq!(suite.balance(&suite.buyer.clone()), 1_000_000);
}
