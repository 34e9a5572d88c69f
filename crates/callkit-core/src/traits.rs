/*!
 * Callkit Traits
 *
 * Contrato mínimo que um provedor precisa cumprir para os helpers de contratos
 */

use async_trait::async_trait;
use ethers::types::{TransactionReceipt, TransactionRequest, U256};

use crate::error::Result;
use crate::types::TransactionHash;

/// Provedor com semântica JSON-RPC do Ethereum
///
/// Timeout e cancelamento ficam a cargo da implementação.
#[async_trait]
pub trait ContractProvider: Send + Sync {
    /// Executa uma chamada estática (`eth_call`) e retorna os bytes de resposta
    async fn call(&self, request: &TransactionRequest) -> Result<Vec<u8>>;

    /// Envia uma transação (`eth_sendTransaction`)
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TransactionHash>;

    /// Estima o gas de uma transação (`eth_estimateGas`)
    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<U256>;

    /// Obtém o recibo de uma transação, `None` se ainda não minerada
    async fn get_transaction_receipt(
        &self,
        tx_hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>>;
}
