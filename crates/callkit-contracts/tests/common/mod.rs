#![allow(dead_code)]

use async_trait::async_trait;
use callkit_core::error::{Error, Result};
use callkit_core::traits::ContractProvider;
use callkit_core::types::TransactionHash;
use ethers::abi::{encode, Token};
use ethers::types::{Address, TransactionReceipt, TransactionRequest, H256, U256};
use ethers::utils::id;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Provedor em memória: responde `eth_call` pelo seletor e registra as requisições
#[derive(Default)]
pub struct MockProvider {
    responses: HashMap<[u8; 4], Vec<u8>>,
    receipts: HashMap<H256, TransactionReceipt>,
    failure: Option<String>,
    requests: Mutex<Vec<TransactionRequest>>,
    pub tx_hash: H256,
    pub gas: U256,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            tx_hash: H256::repeat_byte(0xab),
            gas: U256::from(21_000u64),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Retorno ABI para a função com a assinatura dada, ex.: `balanceOf(address)`
    pub fn respond(self, signature: &str, tokens: &[Token]) -> Self {
        self.respond_raw(signature, encode(tokens))
    }

    pub fn respond_raw(mut self, signature: &str, data: Vec<u8>) -> Self {
        self.responses.insert(id(signature), data);
        self
    }

    pub fn with_receipt(mut self, receipt: TransactionReceipt) -> Self {
        self.receipts.insert(receipt.transaction_hash, receipt);
        self
    }

    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> TransactionRequest {
        self.requests.lock().last().cloned().expect("nenhuma requisição registrada")
    }

    fn record(&self, request: &TransactionRequest) -> Result<()> {
        self.requests.lock().push(request.clone());
        match &self.failure {
            Some(message) => Err(Error::RpcError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContractProvider for MockProvider {
    async fn call(&self, request: &TransactionRequest) -> Result<Vec<u8>> {
        self.record(request)?;
        let data = request.data.as_ref().map(|d| d.to_vec()).unwrap_or_default();
        if data.len() < 4 {
            return Ok(vec![]);
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        Ok(self.responses.get(&selector).cloned().unwrap_or_default())
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TransactionHash> {
        self.record(request)?;
        Ok(self.tx_hash)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<U256> {
        self.record(request)?;
        Ok(self.gas)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>> {
        if let Some(message) = &self.failure {
            return Err(Error::RpcError(message.clone()));
        }
        Ok(self.receipts.get(&tx_hash).cloned())
    }
}

/// Destino da requisição como endereço
pub fn target(request: &TransactionRequest) -> Address {
    request
        .to
        .as_ref()
        .and_then(|to| to.as_address())
        .copied()
        .expect("requisição sem destino")
}

/// Seletor da call data em hex com `0x`
pub fn selector_of(request: &TransactionRequest) -> String {
    let data = request.data.as_ref().expect("requisição sem data");
    format!("0x{}", hex::encode(&data[..4]))
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn addr_str(byte: u8) -> String {
    format!("{:?}", Address::repeat_byte(byte))
}
