/*!
 * Callkit Config
 *
 * Endereços padrão dos contratos e resolução de endereços opcionais
 */

use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::parse_address;

/// Router Uniswap V2 na mainnet
pub const DEFAULT_UNISWAP_V2_ROUTER_ADDRESS: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";

/// Factory Uniswap V2 na mainnet
pub const DEFAULT_UNISWAP_V2_FACTORY_ADDRESS: &str = "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f";

/// Contrato agregador Informer
pub const DEFAULT_INFORMER_ADDRESS: &str = "0x6cc4d0b709ee830fc6c4e124120596ede74ad2fb";

/// Endereços padrão dos contratos usados quando o chamador não informa um
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// Router Uniswap V2
    pub router: Address,
    /// Factory Uniswap V2
    pub factory: Address,
    /// Contrato Informer
    pub informer: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            router: constant(DEFAULT_UNISWAP_V2_ROUTER_ADDRESS),
            factory: constant(DEFAULT_UNISWAP_V2_FACTORY_ADDRESS),
            informer: constant(DEFAULT_INFORMER_ADDRESS),
        }
    }
}

impl ContractAddresses {
    /// Carrega os padrões, sobrescrevendo com `CALLKIT_ROUTER_ADDRESS`,
    /// `CALLKIT_FACTORY_ADDRESS` e `CALLKIT_INFORMER_ADDRESS` quando definidas
    pub fn from_env() -> Result<Self> {
        let mut addresses = Self::default();
        if let Some(router) = env_address("CALLKIT_ROUTER_ADDRESS")? {
            addresses.router = router;
        }
        if let Some(factory) = env_address("CALLKIT_FACTORY_ADDRESS")? {
            addresses.factory = factory;
        }
        if let Some(informer) = env_address("CALLKIT_INFORMER_ADDRESS")? {
            addresses.informer = informer;
        }
        Ok(addresses)
    }
}

fn env_address(var: &str) -> Result<Option<Address>> {
    match std::env::var(var) {
        Ok(value) => parse_address(value.trim())
            .map(Some)
            .map_err(|_| Error::ValidationError(format!("{var} contém endereço inválido: {value}"))),
        Err(_) => Ok(None),
    }
}

// As constantes acima são endereços válidos conhecidos.
fn constant(address: &str) -> Address {
    Address::from_str(&address[2..]).unwrap_or_default()
}

/// Resolve um endereço opcional do chamador, caindo no padrão quando ausente
pub fn resolve_address(address: Option<&str>, default: &str) -> Result<Address> {
    parse_address(address.unwrap_or(default))
}
