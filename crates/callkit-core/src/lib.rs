/*!
 * Callkit Core
 *
 * Tipos, codec ABI e utilitários compartilhados para a workspace Callkit
 */

pub mod codec;
pub mod config;
pub mod error;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod utils;

// Re-exportações públicas
pub use codec::AbiCodec;
pub use config::ContractAddresses;
pub use error::{Error, Result};
pub use traits::ContractProvider;
pub use types::*;
