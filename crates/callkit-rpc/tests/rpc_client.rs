use callkit_contracts::{decoder, erc20};
use callkit_core::error::Error;
use callkit_core::traits::ContractProvider;
use callkit_rpc::{EthersRpcClient, RpcConfig};
use ethers::types::{TransactionRequest, H256, U256};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

async fn mount(server: &MockServer, rpc_method: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": rpc_method})))
        .respond_with(response)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> EthersRpcClient {
    EthersRpcClient::new(RpcConfig {
        endpoint: server.uri(),
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap()
}

fn word(value: u64) -> String {
    format!("0x{:064x}", value)
}

fn receipt_json(tx_hash: H256) -> Value {
    json!({
        "transactionHash": format!("{tx_hash:?}"),
        "transactionIndex": "0x0",
        "blockHash": format!("{:?}", H256::repeat_byte(0x22)),
        "blockNumber": "0x64",
        "from": "0x1111111111111111111111111111111111111111",
        "to": "0x2222222222222222222222222222222222222222",
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "contractAddress": null,
        "status": "0x1",
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "logs": [{
            "address": "0x3333333333333333333333333333333333333333",
            "topics": [
                TRANSFER_TOPIC,
                format!("0x{:0>64}", "1111111111111111111111111111111111111111"),
                format!("0x{:0>64}", "2222222222222222222222222222222222222222"),
            ],
            "data": word(250),
            "blockNumber": "0x64",
            "transactionHash": format!("{tx_hash:?}"),
            "logIndex": "0x0",
            "removed": false
        }]
    })
}

#[tokio::test]
async fn call_returns_raw_bytes_for_helpers() {
    let server = MockServer::start().await;
    mount(&server, "eth_call", rpc_result(json!(word(1_000)))).await;

    let balance = erc20::get_balance_of(
        &client(&server),
        "0x3333333333333333333333333333333333333333",
        "0x1111111111111111111111111111111111111111",
    )
    .await
    .unwrap();
    assert_eq!(balance, U256::from(1_000u64));
}

#[tokio::test]
async fn estimate_and_send() {
    let server = MockServer::start().await;
    mount(&server, "eth_estimateGas", rpc_result(json!("0x5208"))).await;
    mount(
        &server,
        "eth_sendTransaction",
        rpc_result(json!(format!("{:?}", H256::repeat_byte(0xab)))),
    )
    .await;

    let client = client(&server);
    let request = TransactionRequest::new().to(ethers::types::Address::repeat_byte(0x01));
    assert_eq!(client.estimate_gas(&request).await.unwrap(), U256::from(21_000u64));
    assert_eq!(client.send_transaction(&request).await.unwrap(), H256::repeat_byte(0xab));
}

#[tokio::test]
async fn receipts_are_cached() {
    let server = MockServer::start().await;
    let tx_hash = H256::repeat_byte(0x11);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_getTransactionReceipt"})))
        .respond_with(rpc_result(receipt_json(tx_hash)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get_transaction_receipt(tx_hash).await.unwrap().unwrap();
    let second = client.get_transaction_receipt(tx_hash).await.unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(client.cache_stats().total_entries, 1);

    client.clear_cache();
    assert_eq!(client.cache_stats().total_entries, 0);
}

#[tokio::test]
async fn expired_receipts_are_dropped() {
    let server = MockServer::start().await;
    let first = H256::repeat_byte(0x11);
    let second = H256::repeat_byte(0x12);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_getTransactionReceipt"})))
        .respond_with(rpc_result(receipt_json(first)))
        .expect(3)
        .mount(&server)
        .await;

    let client = EthersRpcClient::new(RpcConfig {
        endpoint: server.uri(),
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::ZERO,
        ..Default::default()
    })
    .unwrap();
    for tx_hash in [first, second, first] {
        client.get_transaction_receipt(tx_hash).await.unwrap().unwrap();
    }
    let stats = client.cache_stats();
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.expired_entries, 1);
}

#[tokio::test]
async fn missing_receipt_is_none_and_not_cached() {
    let server = MockServer::start().await;
    mount(&server, "eth_getTransactionReceipt", rpc_result(Value::Null)).await;

    let client = client(&server);
    assert!(client.get_transaction_receipt(H256::zero()).await.unwrap().is_none());
    assert_eq!(client.cache_stats().total_entries, 0);
}

#[tokio::test]
async fn transaction_logs_decode_through_client() {
    let server = MockServer::start().await;
    let tx_hash = H256::repeat_byte(0x11);
    mount(&server, "eth_getTransactionReceipt", rpc_result(receipt_json(tx_hash))).await;

    let decoded = decoder::decode_transaction_logs(&client(&server), &[tx_hash]).await.unwrap();
    assert_eq!(decoded.transfers.len(), 1);
    assert_eq!(decoded.transfers[0].value, U256::from(250u64));
    assert_eq!(decoded.transfers[0].transaction_hash, Some(tx_hash));
}

#[tokio::test]
async fn rpc_errors_are_reported() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eth_call",
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 3, "message": "execution reverted"}
        })),
    )
    .await;

    let err = client(&server)
        .call(&TransactionRequest::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RpcError(ref message) if message.contains("execution reverted")));
}

#[tokio::test]
async fn slow_node_times_out() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eth_blockNumber",
        rpc_result(json!("0x1")).set_delay(Duration::from_millis(500)),
    )
    .await;

    let client = EthersRpcClient::new(RpcConfig {
        endpoint: server.uri(),
        timeout: Duration::from_millis(50),
        ..Default::default()
    })
    .unwrap();
    assert!(matches!(client.get_block_number().await, Err(Error::TimeoutError(_))));
}
