/*!
 * Callkit Types
 *
 * Tipos comuns usados em toda a workspace Callkit
 */

use ethereum_types::{Address, H256, U256};
use ethers::abi::Token;
use ethers::types::TransactionRequest;
use serde::{Deserialize, Serialize};

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Campos opcionais mesclados na requisição de `send`/`estimate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    pub from: Option<Address>,
    pub value: Option<U256>,
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
    pub nonce: Option<U256>,
}

impl TxOptions {
    /// Opções contendo apenas o valor em wei enviado junto da transação
    pub fn with_value(value: U256) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Aplica as opções sobre uma requisição já montada
    pub fn apply(&self, mut request: TransactionRequest) -> TransactionRequest {
        if let Some(from) = self.from {
            request = request.from(from);
        }
        if let Some(value) = self.value {
            request = request.value(value);
        }
        if let Some(gas) = self.gas {
            request = request.gas(gas);
        }
        if let Some(gas_price) = self.gas_price {
            request = request.gas_price(gas_price);
        }
        if let Some(nonce) = self.nonce {
            request = request.nonce(nonce);
        }
        request
    }
}

/// Chamada decodificada a partir de call data
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCall {
    pub name: String,
    pub selector: [u8; 4],
    pub params: Vec<(String, Token)>,
}

impl DecodedCall {
    /// Procura um parâmetro pelo nome declarado na ABI
    pub fn param(&self, name: &str) -> Option<&Token> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, token)| token)
    }
}

/// Evento decodificado a partir de data + topics
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub name: String,
    pub params: Vec<(String, Token)>,
}

impl DecodedEvent {
    /// Procura um parâmetro pelo nome declarado na ABI
    pub fn param(&self, name: &str) -> Option<&Token> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, token)| token)
    }
}
