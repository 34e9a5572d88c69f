//! Informer: contrato agregador que devolve detalhes de pares e tokens numa só chamada.

use callkit_core::config::{resolve_address, DEFAULT_INFORMER_ADDRESS};
use callkit_core::error::{Error, Result};
use callkit_core::tokens::{first, take_address, take_uint, TokenReader};
use callkit_core::traits::ContractProvider;
use callkit_core::types::DecodedCall;
use callkit_core::utils::{parse_address, require_address};
use callkit_core::AbiCodec;
use ethereum_types::{Address, U256};
use ethers::abi::{Abi, Token};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::call::call_function;

const INFORMER_ABI: &str = include_str!("informer_abi.json");

static CODEC: Lazy<AbiCodec> =
    Lazy::new(|| AbiCodec::from_json(INFORMER_ABI).expect("abi Informer"));

/// ABI do Informer
pub fn abi() -> &'static Abi {
    CODEC.abi()
}

/// Metadados de um token retornados pelo Informer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDetails {
    pub token_address: Address,
    pub name: String,
    pub decimals: u8,
    pub symbol: String,
    pub total_supply: U256,
}

impl TokenDetails {
    fn from_tokens(tokens: Vec<Token>) -> Result<Self> {
        let mut fields = TokenReader::new(tokens, 5, "TokenDetails")?;
        Ok(Self {
            token_address: fields.address()?,
            name: fields.string()?,
            decimals: fields.u8()?,
            symbol: fields.string()?,
            total_supply: fields.uint()?,
        })
    }
}

/// Par com os detalhes dos dois tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDetails {
    pub pair_address: Address,
    pub name: String,
    pub decimals: u8,
    pub symbol: String,
    pub total_supply: U256,
    pub token0_details: TokenDetails,
    pub token1_details: TokenDetails,
}

/// Reservas do par com o bloco da leitura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformerReserves {
    pub reserve0: U256,
    pub reserve1: U256,
    pub block_number: U256,
}

// Retornos de struct chegam como uma única tupla; listas já achatadas passam direto
fn struct_fields(tokens: Vec<Token>) -> Vec<Token> {
    match <[Token; 1]>::try_from(tokens) {
        Ok([Token::Tuple(fields)]) => fields,
        Ok([other]) => vec![other],
        Err(tokens) => tokens,
    }
}

/// Monta `PairDetails` a partir do retorno decodificado de `getPairAndTokenDetails`
pub fn parse_pair_details(tokens: Vec<Token>) -> Result<PairDetails> {
    let mut fields = TokenReader::new(struct_fields(tokens), 7, "getPairAndTokenDetails")?;
    Ok(PairDetails {
        pair_address: fields.address()?,
        name: fields.string()?,
        decimals: fields.u8()?,
        symbol: fields.string()?,
        total_supply: fields.uint()?,
        token0_details: TokenDetails::from_tokens(fields.tuple()?)?,
        token1_details: TokenDetails::from_tokens(fields.tuple()?)?,
    })
}

/// Monta `InformerReserves` a partir do retorno decodificado de `getReserves`
pub fn parse_reserves(tokens: Vec<Token>) -> Result<InformerReserves> {
    let mut fields = TokenReader::new(struct_fields(tokens), 3, "getReserves")?;
    Ok(InformerReserves {
        reserve0: fields.uint()?,
        reserve1: fields.uint()?,
        block_number: fields.uint()?,
    })
}

// Codificação

pub fn encode_get_owner(contract: &str) -> Result<String> {
    let contract = parse_address(contract)?;
    CODEC.encode_function("getOwner", &[Token::Address(contract)])
}

pub fn encode_get_pair_and_token_details(pair: &str) -> Result<String> {
    let pair = parse_address(pair)?;
    CODEC.encode_function("getPairAndTokenDetails", &[Token::Address(pair)])
}

pub fn encode_get_reserves(pair: &str) -> Result<String> {
    let pair = parse_address(pair)?;
    CODEC.encode_function("getReserves", &[Token::Address(pair)])
}

pub fn encode_get_token_balance(token: &str, wallet: &str) -> Result<String> {
    let token = parse_address(token)?;
    let wallet = parse_address(wallet)?;
    CODEC.encode_function("getTokenBalance", &[Token::Address(token), Token::Address(wallet)])
}

pub fn encode_get_total_supply(token: &str) -> Result<String> {
    let token = parse_address(token)?;
    CODEC.encode_function("getTotalSupply", &[Token::Address(token)])
}

// Decodificação

pub fn decode_call(data: &str) -> Result<DecodedCall> {
    CODEC.decode_function(data)
}

pub fn decode_owner_result(data: &str) -> Result<Address> {
    take_address(first(CODEC.decode_function_result("getOwner", data)?)?)
}

pub fn decode_pair_and_token_details_result(data: &str) -> Result<PairDetails> {
    parse_pair_details(CODEC.decode_function_result("getPairAndTokenDetails", data)?)
}

pub fn decode_reserves_result(data: &str) -> Result<InformerReserves> {
    parse_reserves(CODEC.decode_function_result("getReserves", data)?)
}

pub fn decode_token_balance_result(data: &str) -> Result<U256> {
    take_uint(first(CODEC.decode_function_result("getTokenBalance", data)?)?)
}

pub fn decode_total_supply_result(data: &str) -> Result<U256> {
    take_uint(first(CODEC.decode_function_result("getTotalSupply", data)?)?)
}

// Helpers via provedor

/// Detalhes do par e dos dois tokens numa única chamada ao Informer
pub async fn get_pair_and_token_details<P>(
    provider: &P,
    pair: &str,
    informer: Option<&str>,
) -> Result<PairDetails>
where
    P: ContractProvider + ?Sized,
{
    let pair = require_address("endereço do par", pair)?;
    let informer = resolve_address(informer, DEFAULT_INFORMER_ADDRESS)?;

    let out = call_function(
        provider,
        &CODEC,
        informer,
        "getPairAndTokenDetails",
        &[Token::Address(pair)],
    )
    .await?;

    let details = parse_pair_details(out)?;
    if details.pair_address.is_zero() {
        error!("Informer retornou par vazio para {:?}", pair);
        return Err(Error::InvalidData("dados do par inválidos".to_string()));
    }
    Ok(details)
}

pub async fn get_owner<P>(provider: &P, contract: &str, informer: Option<&str>) -> Result<Address>
where
    P: ContractProvider + ?Sized,
{
    let contract = require_address("contrato", contract)?;
    let informer = resolve_address(informer, DEFAULT_INFORMER_ADDRESS)?;
    let out = call_function(provider, &CODEC, informer, "getOwner", &[Token::Address(contract)]).await?;
    take_address(first(out)?)
}

pub async fn get_reserves<P>(provider: &P, pair: &str, informer: Option<&str>) -> Result<InformerReserves>
where
    P: ContractProvider + ?Sized,
{
    let pair = require_address("endereço do par", pair)?;
    let informer = resolve_address(informer, DEFAULT_INFORMER_ADDRESS)?;
    let out = call_function(provider, &CODEC, informer, "getReserves", &[Token::Address(pair)]).await?;
    parse_reserves(out)
}

pub async fn get_token_balance<P>(
    provider: &P,
    token: &str,
    wallet: &str,
    informer: Option<&str>,
) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let wallet = require_address("carteira", wallet)?;
    let informer = resolve_address(informer, DEFAULT_INFORMER_ADDRESS)?;
    let out = call_function(
        provider,
        &CODEC,
        informer,
        "getTokenBalance",
        &[Token::Address(token), Token::Address(wallet)],
    )
    .await?;
    take_uint(first(out)?)
}

pub async fn get_total_supply<P>(provider: &P, token: &str, informer: Option<&str>) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let informer = resolve_address(informer, DEFAULT_INFORMER_ADDRESS)?;
    let out = call_function(provider, &CODEC, informer, "getTotalSupply", &[Token::Address(token)]).await?;
    take_uint(first(out)?)
}
