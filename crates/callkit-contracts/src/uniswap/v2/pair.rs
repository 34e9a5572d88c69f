//! Uniswap V2 Pair: leituras de estado do par e codificação das funções de liquidez.

use callkit_core::error::{Error, Result};
use callkit_core::tokens::{first, take_address, take_string, take_u8, take_uint, TokenReader};
use callkit_core::traits::ContractProvider;
use callkit_core::types::DecodedCall;
use callkit_core::utils::{parse_address, require_address};
use callkit_core::AbiCodec;
use ethereum_types::{Address, U256};
use ethers::abi::{Abi, Token};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::call::call_function;

const PAIR_ABI: &[&str] = &[
    "function name() external view returns (string)",
    "function symbol() external view returns (string)",
    "function decimals() external view returns (uint8)",
    "function totalSupply() external view returns (uint256)",
    "function balanceOf(address owner) external view returns (uint256)",
    "function token0() external view returns (address)",
    "function token1() external view returns (address)",
    "function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)",
    "function price0CumulativeLast() external view returns (uint256)",
    "function price1CumulativeLast() external view returns (uint256)",
    "function kLast() external view returns (uint256)",
    "function mint(address to) external returns (uint256 liquidity)",
    "function burn(address to) external returns (uint256 amount0, uint256 amount1)",
    "function swap(uint256 amount0Out, uint256 amount1Out, address to, bytes data) external",
    "function skim(address to) external",
    "function sync() external",
    "event Mint(address indexed sender, uint256 amount0, uint256 amount1)",
    "event Transfer(address indexed from, address indexed to, uint256 value)",
];

static CODEC: Lazy<AbiCodec> =
    Lazy::new(|| AbiCodec::from_human_readable(PAIR_ABI).expect("abi UniswapV2Pair"));

/// ABI do par Uniswap V2
pub fn abi() -> &'static Abi {
    CODEC.abi()
}

/// Reservas retornadas por `getReserves`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: U256,
    pub reserve1: U256,
    pub block_timestamp_last: u32,
}

impl Reserves {
    fn from_tokens(tokens: Vec<Token>) -> Result<Self> {
        let mut values = TokenReader::new(tokens, 3, "getReserves")?;
        let reserve0 = values.uint()?;
        let reserve1 = values.uint()?;
        let timestamp = values.uint()?;
        if timestamp > U256::from(u32::MAX) {
            return Err(Error::DecodeError(format!(
                "blockTimestampLast {timestamp} não cabe em uint32"
            )));
        }
        Ok(Self {
            reserve0,
            reserve1,
            block_timestamp_last: timestamp.as_u32(),
        })
    }
}

// Codificação

pub fn encode_name() -> Result<String> {
    CODEC.encode_function("name", &[])
}

pub fn encode_symbol() -> Result<String> {
    CODEC.encode_function("symbol", &[])
}

pub fn encode_decimals() -> Result<String> {
    CODEC.encode_function("decimals", &[])
}

pub fn encode_total_supply() -> Result<String> {
    CODEC.encode_function("totalSupply", &[])
}

pub fn encode_balance_of(owner: &str) -> Result<String> {
    let owner = parse_address(owner)?;
    CODEC.encode_function("balanceOf", &[Token::Address(owner)])
}

pub fn encode_token0() -> Result<String> {
    CODEC.encode_function("token0", &[])
}

pub fn encode_token1() -> Result<String> {
    CODEC.encode_function("token1", &[])
}

pub fn encode_get_reserves() -> Result<String> {
    CODEC.encode_function("getReserves", &[])
}

pub fn encode_price0_cumulative_last() -> Result<String> {
    CODEC.encode_function("price0CumulativeLast", &[])
}

pub fn encode_price1_cumulative_last() -> Result<String> {
    CODEC.encode_function("price1CumulativeLast", &[])
}

pub fn encode_k_last() -> Result<String> {
    CODEC.encode_function("kLast", &[])
}

pub fn encode_mint(to: &str) -> Result<String> {
    let to = parse_address(to)?;
    CODEC.encode_function("mint", &[Token::Address(to)])
}

pub fn encode_burn(to: &str) -> Result<String> {
    let to = parse_address(to)?;
    CODEC.encode_function("burn", &[Token::Address(to)])
}

pub fn encode_swap(amount0_out: U256, amount1_out: U256, to: &str, data: &[u8]) -> Result<String> {
    let to = parse_address(to)?;
    CODEC.encode_function(
        "swap",
        &[
            Token::Uint(amount0_out),
            Token::Uint(amount1_out),
            Token::Address(to),
            Token::Bytes(data.to_vec()),
        ],
    )
}

pub fn encode_skim(to: &str) -> Result<String> {
    let to = parse_address(to)?;
    CODEC.encode_function("skim", &[Token::Address(to)])
}

pub fn encode_sync() -> Result<String> {
    CODEC.encode_function("sync", &[])
}

// Decodificação

pub fn decode_call(data: &str) -> Result<DecodedCall> {
    CODEC.decode_function(data)
}

/// Chamada ao par com argumentos tipados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairCall {
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    BalanceOf { owner: Address },
    Token0,
    Token1,
    GetReserves,
    Price0CumulativeLast,
    Price1CumulativeLast,
    KLast,
    Mint { to: Address },
    Burn { to: Address },
    Swap { amount0_out: U256, amount1_out: U256, to: Address, data: Vec<u8> },
    Skim { to: Address },
    Sync,
}

impl PairCall {
    pub fn decode(data: &str) -> Result<Self> {
        let call = decode_call(data)?;
        let name = call.name;
        let mut args = TokenReader::new(
            call.params.into_iter().map(|(_, token)| token).collect(),
            0,
            name.as_str(),
        )?;

        Ok(match name.as_str() {
            "name" => PairCall::Name,
            "symbol" => PairCall::Symbol,
            "decimals" => PairCall::Decimals,
            "totalSupply" => PairCall::TotalSupply,
            "balanceOf" => PairCall::BalanceOf { owner: args.address()? },
            "token0" => PairCall::Token0,
            "token1" => PairCall::Token1,
            "getReserves" => PairCall::GetReserves,
            "price0CumulativeLast" => PairCall::Price0CumulativeLast,
            "price1CumulativeLast" => PairCall::Price1CumulativeLast,
            "kLast" => PairCall::KLast,
            "mint" => PairCall::Mint { to: args.address()? },
            "burn" => PairCall::Burn { to: args.address()? },
            "swap" => PairCall::Swap {
                amount0_out: args.uint()?,
                amount1_out: args.uint()?,
                to: args.address()?,
                data: args.bytes()?,
            },
            "skim" => PairCall::Skim { to: args.address()? },
            "sync" => PairCall::Sync,
            other => return Err(Error::NotFound(format!("função do par '{other}'"))),
        })
    }
}

pub fn decode_string_result(function: &str, data: &str) -> Result<String> {
    take_string(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_uint8_result(function: &str, data: &str) -> Result<u8> {
    take_u8(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_uint256_result(function: &str, data: &str) -> Result<U256> {
    take_uint(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_address_result(function: &str, data: &str) -> Result<Address> {
    take_address(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_reserves_result(data: &str) -> Result<Reserves> {
    Reserves::from_tokens(CODEC.decode_function_result("getReserves", data)?)
}

// Helpers via provedor

async fn call_pair<P>(provider: &P, pair: &str, function: &str, params: &[Token]) -> Result<Vec<Token>>
where
    P: ContractProvider + ?Sized,
{
    let pair = require_address("endereço do par", pair)?;
    call_function(provider, &CODEC, pair, function, params).await
}

pub async fn get_name<P>(provider: &P, pair: &str) -> Result<String>
where
    P: ContractProvider + ?Sized,
{
    take_string(first(call_pair(provider, pair, "name", &[]).await?)?)
}

pub async fn get_symbol<P>(provider: &P, pair: &str) -> Result<String>
where
    P: ContractProvider + ?Sized,
{
    take_string(first(call_pair(provider, pair, "symbol", &[]).await?)?)
}

pub async fn get_decimals<P>(provider: &P, pair: &str) -> Result<u8>
where
    P: ContractProvider + ?Sized,
{
    take_u8(first(call_pair(provider, pair, "decimals", &[]).await?)?)
}

pub async fn get_total_supply<P>(provider: &P, pair: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    take_uint(first(call_pair(provider, pair, "totalSupply", &[]).await?)?)
}

pub async fn get_balance_of<P>(provider: &P, pair: &str, owner: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let pair = require_address("endereço do par", pair)?;
    let owner = require_address("owner", owner)?;
    let out = call_function(provider, &CODEC, pair, "balanceOf", &[Token::Address(owner)]).await?;
    take_uint(first(out)?)
}

pub async fn get_token0<P>(provider: &P, pair: &str) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    take_address(first(call_pair(provider, pair, "token0", &[]).await?)?)
}

pub async fn get_token1<P>(provider: &P, pair: &str) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    take_address(first(call_pair(provider, pair, "token1", &[]).await?)?)
}

pub async fn get_reserves<P>(provider: &P, pair: &str) -> Result<Reserves>
where
    P: ContractProvider + ?Sized,
{
    Reserves::from_tokens(call_pair(provider, pair, "getReserves", &[]).await?)
}

pub async fn get_price0_cumulative_last<P>(provider: &P, pair: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    take_uint(first(call_pair(provider, pair, "price0CumulativeLast", &[]).await?)?)
}

pub async fn get_price1_cumulative_last<P>(provider: &P, pair: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    take_uint(first(call_pair(provider, pair, "price1CumulativeLast", &[]).await?)?)
}

pub async fn get_k_last<P>(provider: &P, pair: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    take_uint(first(call_pair(provider, pair, "kLast", &[]).await?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::encode;

    #[test]
    fn reserves_decode_from_return_data() {
        let data = encode(&[
            Token::Uint(U256::from(1_000u64)),
            Token::Uint(U256::from(2_000u64)),
            Token::Uint(U256::from(1_700_000_000u64)),
        ]);
        let reserves = decode_reserves_result(&format!("0x{}", hex::encode(data))).unwrap();
        assert_eq!(reserves.reserve0, U256::from(1_000u64));
        assert_eq!(reserves.reserve1, U256::from(2_000u64));
        assert_eq!(reserves.block_timestamp_last, 1_700_000_000);
    }

    #[test]
    fn swap_round_trips_through_typed_call() {
        let to = "0x1111111111111111111111111111111111111111";
        let data = encode_swap(U256::zero(), U256::from(9u64), to, &[0xde, 0xad]).unwrap();
        assert_eq!(
            PairCall::decode(&data).unwrap(),
            PairCall::Swap {
                amount0_out: U256::zero(),
                amount1_out: U256::from(9u64),
                to: Address::repeat_byte(0x11),
                data: vec![0xde, 0xad],
            }
        );
    }

    #[test]
    fn reserves_selector() {
        assert_eq!(encode_get_reserves().unwrap(), "0x0902f1ac");
    }
}
