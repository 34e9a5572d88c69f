mod common;

use callkit_contracts::erc20;
use callkit_core::error::Error;
use callkit_core::types::TxOptions;
use common::{addr, addr_str, selector_of, target, MockProvider};
use ethers::abi::Token;
use ethers::types::U256;

#[tokio::test]
async fn balance_of_calls_token_and_decodes() {
    let provider = MockProvider::new().respond(
        "balanceOf(address)",
        &[Token::Uint(U256::from(1_000_000u64))],
    );
    let balance = erc20::get_balance_of(&provider, &addr_str(0x11), &addr_str(0x22))
        .await
        .unwrap();
    assert_eq!(balance, U256::from(1_000_000u64));

    let request = provider.last_request();
    assert_eq!(target(&request), addr(0x11));
    assert_eq!(selector_of(&request), "0x70a08231");
}

#[tokio::test]
async fn metadata_helpers_decode_strings_and_decimals() {
    let provider = MockProvider::new()
        .respond("name()", &[Token::String("Wrapped Ether".into())])
        .respond("symbol()", &[Token::String("WETH".into())])
        .respond("decimals()", &[Token::Uint(U256::from(18u64))])
        .respond("totalSupply()", &[Token::Uint(U256::exp10(24))]);
    let token = addr_str(0x33);

    assert_eq!(erc20::get_name(&provider, &token).await.unwrap(), "Wrapped Ether");
    assert_eq!(erc20::get_symbol(&provider, &token).await.unwrap(), "WETH");
    assert_eq!(erc20::get_decimals(&provider, &token).await.unwrap(), 18);
    assert_eq!(erc20::get_total_supply(&provider, &token).await.unwrap(), U256::exp10(24));
    assert_eq!(provider.requests().len(), 4);
}

#[tokio::test]
async fn allowance_encodes_owner_and_spender() {
    let provider = MockProvider::new().respond("allowance(address,address)", &[Token::Uint(U256::MAX)]);
    let allowance = erc20::get_allowance(&provider, &addr_str(0x01), &addr_str(0x02), &addr_str(0x03))
        .await
        .unwrap();
    assert_eq!(allowance, U256::MAX);

    let data = provider.last_request().data.unwrap();
    let call = erc20::Erc20Call::decode(&format!("0x{}", hex::encode(&data))).unwrap();
    assert_eq!(
        call,
        erc20::Erc20Call::Allowance {
            owner: addr(0x02),
            spender: addr(0x03)
        }
    );
}

#[tokio::test]
async fn missing_token_is_rejected_before_the_provider() {
    let provider = MockProvider::new();
    let err = erc20::get_balance_of(&provider, "", &addr_str(0x22)).await.unwrap_err();
    assert!(matches!(err, Error::MissingParameter(_)));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn empty_response_is_invalid_data() {
    let provider = MockProvider::new();
    let err = erc20::get_decimals(&provider, &addr_str(0x33)).await.unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[tokio::test]
async fn provider_errors_propagate() {
    let provider = MockProvider::failing("connection refused");
    let err = erc20::get_symbol(&provider, &addr_str(0x33)).await.unwrap_err();
    assert_eq!(err.to_string(), "Erro de RPC: connection refused");
}

#[tokio::test]
async fn transfer_sends_transaction_with_options() {
    let provider = MockProvider::new();
    let options = TxOptions {
        from: Some(addr(0x0f)),
        gas: Some(U256::from(60_000u64)),
        ..Default::default()
    };
    let hash = erc20::transfer(&provider, &addr_str(0x44), &addr_str(0x55), U256::from(7u64), &options)
        .await
        .unwrap();
    assert_eq!(hash, provider.tx_hash);

    let request = provider.last_request();
    assert_eq!(target(&request), addr(0x44));
    assert_eq!(request.from, Some(addr(0x0f)));
    assert_eq!(request.gas, Some(U256::from(60_000u64)));
    assert_eq!(selector_of(&request), "0xa9059cbb");
}

#[test]
fn result_decoders_reject_empty_data() {
    assert!(matches!(
        erc20::decode_uint256_result("balanceOf", "0x"),
        Err(Error::InvalidData(_))
    ));
    assert!(erc20::decode_bool_result(
        "transfer",
        "0x0000000000000000000000000000000000000000000000000000000000000001"
    )
    .unwrap());
}
