//! Consulta metadados de um token e a cotação WETH -> token no router Uniswap V2.
//!
//! Uso: `CALLKIT_RPC_URL=https://... cargo run -p callkit-rpc --example token_info -- <token>`

use anyhow::{Context, Result};
use callkit_contracts::erc20;
use callkit_contracts::uniswap::v2::{factory, router};
use callkit_core::utils::format_address;
use callkit_core::ContractAddresses;
use callkit_rpc::{EthersRpcClient, RpcConfig};
use ethers::types::U256;
use tracing::info;

const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let token = std::env::args()
        .nth(1)
        .context("informe o endereço do token")?;
    let client = EthersRpcClient::connect(RpcConfig::from_env()?).await?;
    let addresses = ContractAddresses::from_env()?;
    let factory_address = format_address(&addresses.factory);
    let router_address = format_address(&addresses.router);

    let symbol = erc20::get_symbol(&client, &token).await?;
    let decimals = erc20::get_decimals(&client, &token).await?;
    info!("{} ({} casas decimais)", symbol, decimals);

    let pair = factory::get_pair(&client, WETH, &token, Some(factory_address.as_str())).await?;
    if pair.is_zero() {
        info!("sem par WETH/{} na factory", symbol);
        return Ok(());
    }

    let one_ether = U256::exp10(18);
    let amounts = router::get_amounts_out(
        &client,
        one_ether,
        &[WETH, token.as_str()],
        Some(router_address.as_str()),
    )
    .await?;
    if let Some(out) = amounts.last() {
        info!("1 WETH -> {} unidades de {}", out, symbol);
    }
    Ok(())
}
