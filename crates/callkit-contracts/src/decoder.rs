//! Decodificação de logs de recibos para os eventos Transfer, Mint e PairCreated.

use std::collections::HashMap;

use callkit_core::error::Result;
use callkit_core::tokens::{take_address, take_uint};
use callkit_core::traits::ContractProvider;
use callkit_core::types::TransactionHash;
use ethereum_types::{Address, H256, U256, U64};
use ethers::abi::{AbiParser, Event, RawLog, Token};
use ethers::types::{Log, TransactionReceipt};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const TRANSFER_EVENT_SIGNATURE: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
pub const MINT_EVENT_SIGNATURE: &str =
    "0x4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f";
pub const PAIR_CREATED_EVENT_SIGNATURE: &str =
    "0x0d3648bd0f6ba80134a33ba9275ac585d9d315f0ad8355cddefde31afa28d0e9";

/// Eventos reconhecidos pelo decodificador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Transfer,
    Mint,
    PairCreated,
}

impl EventKind {
    pub fn signature(self) -> &'static str {
        match self {
            EventKind::Transfer => TRANSFER_EVENT_SIGNATURE,
            EventKind::Mint => MINT_EVENT_SIGNATURE,
            EventKind::PairCreated => PAIR_CREATED_EVENT_SIGNATURE,
        }
    }

    fn abi(self) -> &'static str {
        match self {
            EventKind::Transfer => {
                "event Transfer(address indexed from, address indexed to, uint256 value)"
            }
            EventKind::Mint => "event Mint(address indexed sender, uint256 amount0, uint256 amount1)",
            EventKind::PairCreated => {
                "event PairCreated(address indexed token0, address indexed token1, address pair, uint256 pairIndex)"
            }
        }
    }
}

/// Hash do evento pelo nome (`TRANSFER`, `MINT`, `PAIR_CREATED`, sem diferenciar caixa)
pub fn get_event_signature(event_type: &str) -> Option<&'static str> {
    match event_type.to_ascii_uppercase().as_str() {
        "TRANSFER" => Some(TRANSFER_EVENT_SIGNATURE),
        "MINT" => Some(MINT_EVENT_SIGNATURE),
        "PAIR_CREATED" => Some(PAIR_CREATED_EVENT_SIGNATURE),
        _ => None,
    }
}

fn build_event_map() -> HashMap<H256, (EventKind, Event)> {
    let mut map = HashMap::new();
    let mut parser = AbiParser::default();
    for kind in [EventKind::Transfer, EventKind::Mint, EventKind::PairCreated] {
        if let Ok(event) = parser.parse_event(kind.abi()) {
            map.insert(event.signature(), (kind, event));
        }
    }
    map
}

static EVENT_MAP: Lazy<HashMap<H256, (EventKind, Event)>> = Lazy::new(build_event_map);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLog {
    pub contract_address: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub block_number: Option<U64>,
    pub transaction_hash: Option<H256>,
    pub log_index: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintLog {
    pub contract_address: Address,
    pub sender: Address,
    pub amount0: U256,
    pub amount1: U256,
    pub block_number: Option<U64>,
    pub transaction_hash: Option<H256>,
    pub log_index: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCreatedLog {
    pub contract_address: Address,
    pub token0: Address,
    pub token1: Address,
    pub pair: Address,
    pub pair_index: U256,
    pub block_number: Option<U64>,
    pub transaction_hash: Option<H256>,
    pub log_index: Option<U256>,
}

/// Logs decodificados separados por tipo, na ordem de entrada
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedLogs {
    pub transfers: Vec<TransferLog>,
    pub mints: Vec<MintLog>,
    pub pair_created: Vec<PairCreatedLog>,
}

impl DecodedLogs {
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty() && self.mints.is_empty() && self.pair_created.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transfers.len() + self.mints.len() + self.pair_created.len()
    }

    fn push(&mut self, log: &Log) {
        let Some((kind, event)) = log.topics.first().and_then(|topic| EVENT_MAP.get(topic)) else {
            return;
        };
        let raw = RawLog {
            topics: log.topics.clone(),
            data: log.data.to_vec(),
        };
        // logs que não decodificam são ignorados
        let Ok(decoded) = event.parse_log(raw) else {
            return;
        };
        let mut params: HashMap<String, Token> = decoded
            .params
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect();
        let mut address = |name: &str| params.remove(name).map(take_address).and_then(|r| r.ok());

        match kind {
            EventKind::Transfer => {
                let (Some(from), Some(to)) = (address("from"), address("to")) else {
                    return;
                };
                let Some(value) = params.remove("value").and_then(|t| take_uint(t).ok()) else {
                    return;
                };
                self.transfers.push(TransferLog {
                    contract_address: log.address,
                    from,
                    to,
                    value,
                    block_number: log.block_number,
                    transaction_hash: log.transaction_hash,
                    log_index: log.log_index,
                });
            }
            EventKind::Mint => {
                let Some(sender) = address("sender") else {
                    return;
                };
                let amounts = (
                    params.remove("amount0").and_then(|t| take_uint(t).ok()),
                    params.remove("amount1").and_then(|t| take_uint(t).ok()),
                );
                let (Some(amount0), Some(amount1)) = amounts else {
                    return;
                };
                self.mints.push(MintLog {
                    contract_address: log.address,
                    sender,
                    amount0,
                    amount1,
                    block_number: log.block_number,
                    transaction_hash: log.transaction_hash,
                    log_index: log.log_index,
                });
            }
            EventKind::PairCreated => {
                let (Some(token0), Some(token1), Some(pair)) =
                    (address("token0"), address("token1"), address("pair"))
                else {
                    return;
                };
                let Some(pair_index) = params.remove("pairIndex").and_then(|t| take_uint(t).ok())
                else {
                    return;
                };
                self.pair_created.push(PairCreatedLog {
                    contract_address: log.address,
                    token0,
                    token1,
                    pair,
                    pair_index,
                    block_number: log.block_number,
                    transaction_hash: log.transaction_hash,
                    log_index: log.log_index,
                });
            }
        }
    }
}

/// Decodifica uma lista de logs
pub fn decode_logs(logs: &[Log]) -> DecodedLogs {
    let mut decoded = DecodedLogs::default();
    for log in logs {
        decoded.push(log);
    }
    decoded
}

/// Decodifica os logs de todos os recibos, preservando a ordem
pub fn decode_receipts(receipts: &[TransactionReceipt]) -> DecodedLogs {
    let mut decoded = DecodedLogs::default();
    for log in receipts.iter().flat_map(|receipt| receipt.logs.iter()) {
        decoded.push(log);
    }
    decoded
}

pub fn decode_transfer_logs(receipts: &[TransactionReceipt]) -> Vec<TransferLog> {
    decode_receipts(receipts).transfers
}

pub fn decode_mint_logs(receipts: &[TransactionReceipt]) -> Vec<MintLog> {
    decode_receipts(receipts).mints
}

pub fn decode_pair_created_logs(receipts: &[TransactionReceipt]) -> Vec<PairCreatedLog> {
    decode_receipts(receipts).pair_created
}

/// Busca os recibos pelo provedor e decodifica seus logs
///
/// Transações sem recibo (ainda não mineradas) são ignoradas.
pub async fn decode_transaction_logs<P>(provider: &P, tx_hashes: &[TransactionHash]) -> Result<DecodedLogs>
where
    P: ContractProvider + ?Sized,
{
    let mut receipts = Vec::with_capacity(tx_hashes.len());
    for tx_hash in tx_hashes {
        match provider.get_transaction_receipt(*tx_hash).await {
            Ok(Some(receipt)) => receipts.push(receipt),
            Ok(None) => debug!("Recibo ausente para {:?}", tx_hash),
            Err(e) => {
                error!("Erro ao obter recibo de {:?}: {}", tx_hash, e);
                return Err(e);
            }
        }
    }
    Ok(decode_receipts(&receipts))
}
