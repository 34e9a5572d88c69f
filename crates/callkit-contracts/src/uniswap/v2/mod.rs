//! Contratos do Uniswap V2.

pub mod factory;
pub mod pair;
pub mod router;
