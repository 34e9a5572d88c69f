/*!
 * Callkit RPC
 *
 * Provedor JSON-RPC baseado em `ethers` para os helpers de contratos
 */

use async_trait::async_trait;
use callkit_core::{error::Result, traits::ContractProvider, types::TransactionHash, Error};
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{TransactionReceipt, TransactionRequest, U256};
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuração do cliente RPC
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub use_cache: bool,
    pub cache_ttl: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            timeout: Duration::from_secs(30),
            use_cache: true,
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl RpcConfig {
    /// Lê `CALLKIT_RPC_URL` e `CALLKIT_RPC_TIMEOUT_MS`, mantendo o padrão no que faltar
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("CALLKIT_RPC_URL") {
            config.endpoint = endpoint;
        }
        if let Ok(timeout) = std::env::var("CALLKIT_RPC_TIMEOUT_MS") {
            let millis: u64 = timeout.parse().map_err(|_| {
                Error::ValidationError(format!("CALLKIT_RPC_TIMEOUT_MS inválido: {timeout}"))
            })?;
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

/// Cliente RPC HTTP para Ethereum
pub struct EthersRpcClient {
    provider: Provider<Http>,
    config: RpcConfig,
    receipts: Arc<RwLock<HashMap<TransactionHash, (TransactionReceipt, Instant)>>>,
}

fn rpc_error(method: &str, e: ProviderError) -> Error {
    Error::RpcError(format!("Falha em {method}: {e}"))
}

impl EthersRpcClient {
    /// Cria o cliente sem contatar o node
    pub fn new(config: RpcConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.endpoint.as_str())
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {e}")))?;
        Ok(Self {
            provider,
            config,
            receipts: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Cria o cliente e verifica a conexão consultando o número do bloco
    pub async fn connect(config: RpcConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.get_block_number().await.map_err(|e| {
            Error::RpcError(format!("Falha ao conectar ao node Ethereum: {e}"))
        })?;
        Ok(client)
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    async fn with_timeout<T, F>(&self, method: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, ProviderError>>,
    {
        debug!("{} via {}", method, self.config.endpoint);
        match tokio::time::timeout(self.config.timeout, fut).await {
            Ok(result) => result.map_err(|e| rpc_error(method, e)),
            Err(_) => {
                warn!("{} excedeu {:?}", method, self.config.timeout);
                Err(Error::TimeoutError(format!(
                    "{method} excedeu {:?}",
                    self.config.timeout
                )))
            }
        }
    }

    /// Obtém o número do bloco atual
    pub async fn get_block_number(&self) -> Result<u64> {
        let number = self
            .with_timeout("eth_blockNumber", self.provider.get_block_number())
            .await?;
        Ok(number.as_u64())
    }

    fn cached_receipt(&self, tx_hash: &TransactionHash) -> Option<TransactionReceipt> {
        if !self.config.use_cache {
            return None;
        }
        let cache = self.receipts.read();
        cache
            .get(tx_hash)
            .filter(|(_, stored)| stored.elapsed() < self.config.cache_ttl)
            .map(|(receipt, _)| receipt.clone())
    }

    /// Obtém o recibo de uma transação, consultando o cache primeiro
    ///
    /// Recibos ausentes não são guardados, para que a próxima consulta veja a transação minerada.
    /// Entradas expiradas são descartadas a cada busca no node.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>> {
        if let Some(receipt) = self.cached_receipt(&tx_hash) {
            return Ok(Some(receipt));
        }

        let receipt = self
            .with_timeout(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;

        if self.config.use_cache {
            let ttl = self.config.cache_ttl;
            let mut cache = self.receipts.write();
            cache.retain(|_, (_, stored)| stored.elapsed() < ttl);
            if let Some(receipt) = receipt.as_ref() {
                cache.insert(tx_hash, (receipt.clone(), Instant::now()));
            }
        }
        Ok(receipt)
    }

    /// Busca vários recibos em paralelo, na ordem dos hashes
    pub async fn get_transaction_receipts(
        &self,
        tx_hashes: &[TransactionHash],
    ) -> Result<Vec<Option<TransactionReceipt>>> {
        join_all(tx_hashes.iter().map(|hash| self.get_transaction_receipt(*hash)))
            .await
            .into_iter()
            .collect()
    }

    /// Limpa o cache
    pub fn clear_cache(&self) {
        let mut cache = self.receipts.write();
        cache.clear();
    }

    /// Obtém estatísticas do cache
    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.receipts.read();
        let expired = cache
            .values()
            .filter(|(_, stored)| stored.elapsed() >= self.config.cache_ttl)
            .count();
        CacheStats {
            total_entries: cache.len(),
            expired_entries: expired,
        }
    }
}

#[async_trait]
impl ContractProvider for EthersRpcClient {
    async fn call(&self, request: &TransactionRequest) -> Result<Vec<u8>> {
        let tx: TypedTransaction = request.clone().into();
        let out = self
            .with_timeout("eth_call", self.provider.call(&tx, None))
            .await?;
        Ok(out.to_vec())
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TransactionHash> {
        // eth_sendTransaction direto: a conta assina no node
        self.with_timeout(
            "eth_sendTransaction",
            self.provider
                .request::<_, TransactionHash>("eth_sendTransaction", [request]),
        )
        .await
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<U256> {
        let tx: TypedTransaction = request.clone().into();
        self.with_timeout("eth_estimateGas", self.provider.estimate_gas(&tx, None))
            .await
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TransactionHash,
    ) -> Result<Option<TransactionReceipt>> {
        EthersRpcClient::get_transaction_receipt(self, tx_hash).await
    }
}

/// Estatísticas do cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
}
