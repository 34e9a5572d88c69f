mod common;

use callkit_contracts::decoder::{
    self, decode_logs, decode_receipts, TRANSFER_EVENT_SIGNATURE,
};
use common::{addr, MockProvider};
use ethers::abi::{encode, Token};
use ethers::types::{Bytes, Log, TransactionReceipt, H256, U256, U64};
use ethers::utils::keccak256;
use std::str::FromStr;

fn topic(signature: &str) -> H256 {
    H256::from(keccak256(signature))
}

fn transfer_log(token: u8, from: u8, to: u8, value: u64, index: u64) -> Log {
    Log {
        address: addr(token),
        topics: vec![
            topic("Transfer(address,address,uint256)"),
            H256::from(addr(from)),
            H256::from(addr(to)),
        ],
        data: Bytes::from(encode(&[Token::Uint(U256::from(value))])),
        block_number: Some(U64::from(100u64)),
        transaction_hash: Some(H256::repeat_byte(0x01)),
        log_index: Some(U256::from(index)),
        ..Default::default()
    }
}

fn mint_log(pair: u8, sender: u8) -> Log {
    Log {
        address: addr(pair),
        topics: vec![topic("Mint(address,uint256,uint256)"), H256::from(addr(sender))],
        data: Bytes::from(encode(&[
            Token::Uint(U256::from(10u64)),
            Token::Uint(U256::from(20u64)),
        ])),
        ..Default::default()
    }
}

fn pair_created_log(token0: u8, token1: u8, pair: u8, index: u64) -> Log {
    Log {
        address: addr(0xfa),
        topics: vec![
            topic("PairCreated(address,address,address,uint256)"),
            H256::from(addr(token0)),
            H256::from(addr(token1)),
        ],
        data: Bytes::from(encode(&[Token::Address(addr(pair)), Token::Uint(U256::from(index))])),
        ..Default::default()
    }
}

fn receipt(hash: u8, logs: Vec<Log>) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: H256::repeat_byte(hash),
        logs,
        ..Default::default()
    }
}

#[test]
fn logs_are_bucketed_by_event() {
    let logs = vec![
        transfer_log(0x10, 0x01, 0x02, 500, 0),
        mint_log(0x20, 0x03),
        pair_created_log(0x04, 0x05, 0x06, 7),
    ];
    let decoded = decode_logs(&logs);

    assert_eq!(decoded.len(), 3);
    let transfer = &decoded.transfers[0];
    assert_eq!(transfer.contract_address, addr(0x10));
    assert_eq!(transfer.from, addr(0x01));
    assert_eq!(transfer.to, addr(0x02));
    assert_eq!(transfer.value, U256::from(500u64));
    assert_eq!(transfer.block_number, Some(U64::from(100u64)));
    assert_eq!(transfer.log_index, Some(U256::zero()));

    let mint = &decoded.mints[0];
    assert_eq!(mint.sender, addr(0x03));
    assert_eq!((mint.amount0, mint.amount1), (U256::from(10u64), U256::from(20u64)));

    let created = &decoded.pair_created[0];
    assert_eq!(created.token0, addr(0x04));
    assert_eq!(created.token1, addr(0x05));
    assert_eq!(created.pair, addr(0x06));
    assert_eq!(created.pair_index, U256::from(7u64));
}

#[test]
fn unknown_and_malformed_logs_are_skipped() {
    let unknown = Log {
        topics: vec![topic("Swap(address,uint256,uint256,uint256,uint256,address)")],
        ..Default::default()
    };
    let no_topics = Log::default();
    let mut truncated = transfer_log(0x10, 0x01, 0x02, 1, 0);
    truncated.topics.truncate(1);

    let decoded = decode_logs(&[unknown, no_topics, truncated]);
    assert!(decoded.is_empty());
}

#[test]
fn receipts_preserve_input_order() {
    let receipts = vec![
        receipt(0x01, vec![transfer_log(0x10, 0x01, 0x02, 1, 0)]),
        receipt(0x02, vec![]),
        receipt(
            0x03,
            vec![
                transfer_log(0x11, 0x01, 0x02, 2, 0),
                transfer_log(0x12, 0x01, 0x02, 3, 1),
            ],
        ),
    ];
    let values: Vec<_> = decoder::decode_transfer_logs(&receipts)
        .into_iter()
        .map(|t| t.value.as_u64())
        .collect();
    assert_eq!(values, vec![1, 2, 3]);

    assert!(decoder::decode_mint_logs(&receipts).is_empty());
    assert!(decoder::decode_pair_created_logs(&receipts).is_empty());
    assert_eq!(decode_receipts(&receipts).transfers.len(), 3);
}

#[test]
fn transfer_topic_matches_constant() {
    assert_eq!(
        topic("Transfer(address,address,uint256)"),
        H256::from_str(TRANSFER_EVENT_SIGNATURE).unwrap()
    );
}

#[tokio::test]
async fn transaction_logs_fetch_receipts() {
    let provider = MockProvider::new()
        .with_receipt(receipt(0x01, vec![mint_log(0x20, 0x03)]))
        .with_receipt(receipt(0x02, vec![transfer_log(0x10, 0x01, 0x02, 9, 0)]));

    let decoded = decoder::decode_transaction_logs(
        &provider,
        &[H256::repeat_byte(0x01), H256::repeat_byte(0x09), H256::repeat_byte(0x02)],
    )
    .await
    .unwrap();
    assert_eq!(decoded.mints.len(), 1);
    assert_eq!(decoded.transfers.len(), 1);
}

#[tokio::test]
async fn transaction_logs_propagate_provider_errors() {
    let provider = MockProvider::failing("timeout");
    assert!(decoder::decode_transaction_logs(&provider, &[H256::zero()]).await.is_err());
}
