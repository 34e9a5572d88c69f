//! Idas e voltas ao provedor compartilhadas pelos módulos de contratos.

use callkit_core::error::{Error, Result};
use callkit_core::traits::ContractProvider;
use callkit_core::types::{TransactionHash, TxOptions};
use callkit_core::utils::format_address;
use callkit_core::AbiCodec;
use ethereum_types::{Address, U256};
use ethers::abi::Token;
use ethers::types::TransactionRequest;
use tracing::{debug, error};

fn request(codec: &AbiCodec, to: Address, function: &str, params: &[Token]) -> Result<TransactionRequest> {
    let data = codec.encode_function_bytes(function, params)?;
    Ok(TransactionRequest::new().to(to).data(data))
}

/// Executa `eth_call` e decodifica o retorno da função
pub(crate) async fn call_function<P>(
    provider: &P,
    codec: &AbiCodec,
    to: Address,
    function: &str,
    params: &[Token],
) -> Result<Vec<Token>>
where
    P: ContractProvider + ?Sized,
{
    let request = request(codec, to, function, params)?;
    debug!("eth_call {} em {}", function, format_address(&to));

    let response = provider.call(&request).await.map_err(|e| {
        error!("Erro ao chamar {} em {}: {}", function, format_address(&to), e);
        e
    })?;

    if response.is_empty() {
        return Err(Error::InvalidData(format!(
            "sem resposta da chamada {function} ao contrato"
        )));
    }

    codec.decode_function_result_bytes(function, &response)
}

/// Envia uma transação chamando a função, retornando o hash
pub(crate) async fn send_function<P>(
    provider: &P,
    codec: &AbiCodec,
    to: Address,
    function: &str,
    params: &[Token],
    options: &TxOptions,
) -> Result<TransactionHash>
where
    P: ContractProvider + ?Sized,
{
    let request = options.apply(request(codec, to, function, params)?);
    debug!("eth_sendTransaction {} em {}", function, format_address(&to));

    provider.send_transaction(&request).await.map_err(|e| {
        error!("Erro ao enviar {} para {}: {}", function, format_address(&to), e);
        e
    })
}

/// Estima o gas de uma chamada à função
pub(crate) async fn estimate_function<P>(
    provider: &P,
    codec: &AbiCodec,
    to: Address,
    function: &str,
    params: &[Token],
    options: &TxOptions,
) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let request = options.apply(request(codec, to, function, params)?);
    debug!("eth_estimateGas {} em {}", function, format_address(&to));

    provider.estimate_gas(&request).await.map_err(|e| {
        error!("Erro ao estimar gas de {} em {}: {}", function, format_address(&to), e);
        e
    })
}
