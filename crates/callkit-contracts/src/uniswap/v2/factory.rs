//! Uniswap V2 Factory: criação e consulta de pares.

use callkit_core::config::{resolve_address, DEFAULT_UNISWAP_V2_FACTORY_ADDRESS};
use callkit_core::error::{Error, Result};
use callkit_core::tokens::{first, take_address, take_uint, TokenReader};
use callkit_core::traits::ContractProvider;
use callkit_core::types::DecodedCall;
use callkit_core::utils::parse_address;
use callkit_core::AbiCodec;
use ethereum_types::{Address, U256};
use ethers::abi::{Abi, Token};
use once_cell::sync::Lazy;

use crate::call::call_function;

const FACTORY_ABI: &[&str] = &[
    "function createPair(address tokenA, address tokenB) external returns (address pair)",
    "function getPair(address tokenA, address tokenB) external view returns (address pair)",
    "function allPairs(uint256 index) external view returns (address pair)",
    "function allPairsLength() external view returns (uint256)",
    "function feeTo() external view returns (address)",
    "function feeToSetter() external view returns (address)",
    "function setFeeTo(address _feeTo) external",
    "function setFeeToSetter(address _feeToSetter) external",
    "event PairCreated(address indexed token0, address indexed token1, address pair, uint256 pairIndex)",
];

static CODEC: Lazy<AbiCodec> =
    Lazy::new(|| AbiCodec::from_human_readable(FACTORY_ABI).expect("abi UniswapV2Factory"));

/// ABI da factory Uniswap V2
pub fn abi() -> &'static Abi {
    CODEC.abi()
}

pub fn encode_create_pair(token_a: &str, token_b: &str) -> Result<String> {
    let token_a = parse_address(token_a)?;
    let token_b = parse_address(token_b)?;
    CODEC.encode_function("createPair", &[Token::Address(token_a), Token::Address(token_b)])
}

pub fn encode_get_pair(token_a: &str, token_b: &str) -> Result<String> {
    let token_a = parse_address(token_a)?;
    let token_b = parse_address(token_b)?;
    CODEC.encode_function("getPair", &[Token::Address(token_a), Token::Address(token_b)])
}

pub fn encode_all_pairs(index: U256) -> Result<String> {
    CODEC.encode_function("allPairs", &[Token::Uint(index)])
}

pub fn encode_all_pairs_length() -> Result<String> {
    CODEC.encode_function("allPairsLength", &[])
}

pub fn encode_fee_to() -> Result<String> {
    CODEC.encode_function("feeTo", &[])
}

pub fn encode_fee_to_setter() -> Result<String> {
    CODEC.encode_function("feeToSetter", &[])
}

pub fn encode_set_fee_to(fee_to: &str) -> Result<String> {
    let fee_to = parse_address(fee_to)?;
    CODEC.encode_function("setFeeTo", &[Token::Address(fee_to)])
}

pub fn encode_set_fee_to_setter(fee_to_setter: &str) -> Result<String> {
    let fee_to_setter = parse_address(fee_to_setter)?;
    CODEC.encode_function("setFeeToSetter", &[Token::Address(fee_to_setter)])
}

pub fn decode_call(data: &str) -> Result<DecodedCall> {
    CODEC.decode_function(data)
}

/// Chamada à factory com argumentos tipados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryCall {
    CreatePair { token_a: Address, token_b: Address },
    GetPair { token_a: Address, token_b: Address },
    AllPairs { index: U256 },
    AllPairsLength,
    FeeTo,
    FeeToSetter,
    SetFeeTo { fee_to: Address },
    SetFeeToSetter { fee_to_setter: Address },
}

impl FactoryCall {
    pub fn decode(data: &str) -> Result<Self> {
        let call = decode_call(data)?;
        let name = call.name;
        let mut args = TokenReader::new(
            call.params.into_iter().map(|(_, token)| token).collect(),
            0,
            name.as_str(),
        )?;

        Ok(match name.as_str() {
            "createPair" => FactoryCall::CreatePair {
                token_a: args.address()?,
                token_b: args.address()?,
            },
            "getPair" => FactoryCall::GetPair {
                token_a: args.address()?,
                token_b: args.address()?,
            },
            "allPairs" => FactoryCall::AllPairs { index: args.uint()? },
            "allPairsLength" => FactoryCall::AllPairsLength,
            "feeTo" => FactoryCall::FeeTo,
            "feeToSetter" => FactoryCall::FeeToSetter,
            "setFeeTo" => FactoryCall::SetFeeTo { fee_to: args.address()? },
            "setFeeToSetter" => FactoryCall::SetFeeToSetter {
                fee_to_setter: args.address()?,
            },
            other => return Err(Error::NotFound(format!("função da factory '{other}'"))),
        })
    }
}

pub fn decode_address_result(function: &str, data: &str) -> Result<Address> {
    take_address(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_uint_result(function: &str, data: &str) -> Result<U256> {
    take_uint(first(CODEC.decode_function_result(function, data)?)?)
}

/// Endereço do par para dois tokens; zero quando o par não existe
pub async fn get_pair<P>(
    provider: &P,
    token_a: &str,
    token_b: &str,
    factory: Option<&str>,
) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    let factory = resolve_address(factory, DEFAULT_UNISWAP_V2_FACTORY_ADDRESS)?;
    let token_a = parse_address(token_a)?;
    let token_b = parse_address(token_b)?;
    let out = call_function(
        provider,
        &CODEC,
        factory,
        "getPair",
        &[Token::Address(token_a), Token::Address(token_b)],
    )
    .await?;
    take_address(first(out)?)
}

/// Par na posição `index` da lista global da factory
pub async fn get_all_pairs<P>(provider: &P, index: U256, factory: Option<&str>) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    let factory = resolve_address(factory, DEFAULT_UNISWAP_V2_FACTORY_ADDRESS)?;
    let out = call_function(provider, &CODEC, factory, "allPairs", &[Token::Uint(index)]).await?;
    take_address(first(out)?)
}

pub async fn get_all_pairs_length<P>(provider: &P, factory: Option<&str>) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let factory = resolve_address(factory, DEFAULT_UNISWAP_V2_FACTORY_ADDRESS)?;
    let out = call_function(provider, &CODEC, factory, "allPairsLength", &[]).await?;
    take_uint(first(out)?)
}

pub async fn get_fee_to<P>(provider: &P, factory: Option<&str>) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    let factory = resolve_address(factory, DEFAULT_UNISWAP_V2_FACTORY_ADDRESS)?;
    let out = call_function(provider, &CODEC, factory, "feeTo", &[]).await?;
    take_address(first(out)?)
}

pub async fn get_fee_to_setter<P>(provider: &P, factory: Option<&str>) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    let factory = resolve_address(factory, DEFAULT_UNISWAP_V2_FACTORY_ADDRESS)?;
    let out = call_function(provider, &CODEC, factory, "feeToSetter", &[]).await?;
    take_address(first(out)?)
}
