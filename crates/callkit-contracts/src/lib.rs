/*!
 * Callkit Contracts
 *
 * Helpers nomeados para montar e interpretar call data de ERC20, Uniswap V2
 * (router, factory e par), do contrato Informer e de ABIs customizadas, além
 * do decodificador de logs Transfer, Mint e PairCreated.
 */

mod call;

pub mod custom;
pub mod decoder;
pub mod erc20;
pub mod informer;
pub mod uniswap;

// Re-exportações públicas
pub use custom::CustomAbi;
pub use decoder::{decode_logs, decode_receipts, DecodedLogs, EventKind};
pub use uniswap::v2::router::SwapCall;
