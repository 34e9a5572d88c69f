//! ERC20: tabela ABI, codificação/decodificação de chamadas e helpers via provedor.

use callkit_core::error::{Error, Result};
use callkit_core::tokens::{first, take_bool, take_string, take_u8, take_uint, TokenReader};
use callkit_core::traits::ContractProvider;
use callkit_core::types::{DecodedCall, TransactionHash, TxOptions};
use callkit_core::utils::{parse_address, require_address};
use callkit_core::AbiCodec;
use ethereum_types::{Address, U256};
use ethers::abi::{Abi, Token};
use once_cell::sync::Lazy;

use crate::call::{call_function, send_function};

const ERC20_ABI: &[&str] = &[
    "function balanceOf(address account) external view returns (uint256)",
    "function allowance(address owner, address spender) external view returns (uint256)",
    "function totalSupply() external view returns (uint256)",
    "function name() external view returns (string)",
    "function symbol() external view returns (string)",
    "function decimals() external view returns (uint8)",
    "function approve(address spender, uint256 amount) external returns (bool)",
    "function transfer(address to, uint256 amount) external returns (bool)",
    "function transferFrom(address from, address to, uint256 amount) external returns (bool)",
    "event Transfer(address indexed from, address indexed to, uint256 value)",
    "event Approval(address indexed owner, address indexed spender, uint256 value)",
];

static CODEC: Lazy<AbiCodec> =
    Lazy::new(|| AbiCodec::from_human_readable(ERC20_ABI).expect("abi ERC20"));

/// ABI ERC20 padrão
pub fn abi() -> &'static Abi {
    CODEC.abi()
}

// Codificação

pub fn encode_balance_of(account: &str) -> Result<String> {
    let account = parse_address(account)?;
    CODEC.encode_function("balanceOf", &[Token::Address(account)])
}

pub fn encode_allowance(owner: &str, spender: &str) -> Result<String> {
    let owner = parse_address(owner)?;
    let spender = parse_address(spender)?;
    CODEC.encode_function("allowance", &[Token::Address(owner), Token::Address(spender)])
}

pub fn encode_total_supply() -> Result<String> {
    CODEC.encode_function("totalSupply", &[])
}

pub fn encode_name() -> Result<String> {
    CODEC.encode_function("name", &[])
}

pub fn encode_symbol() -> Result<String> {
    CODEC.encode_function("symbol", &[])
}

pub fn encode_decimals() -> Result<String> {
    CODEC.encode_function("decimals", &[])
}

pub fn encode_approve(spender: &str, amount: U256) -> Result<String> {
    let spender = parse_address(spender)?;
    CODEC.encode_function("approve", &[Token::Address(spender), Token::Uint(amount)])
}

pub fn encode_transfer(to: &str, amount: U256) -> Result<String> {
    let to = parse_address(to)?;
    CODEC.encode_function("transfer", &[Token::Address(to), Token::Uint(amount)])
}

pub fn encode_transfer_from(from: &str, to: &str, amount: U256) -> Result<String> {
    let from = parse_address(from)?;
    let to = parse_address(to)?;
    CODEC.encode_function(
        "transferFrom",
        &[Token::Address(from), Token::Address(to), Token::Uint(amount)],
    )
}

// Decodificação

/// Decodifica call data de qualquer função ERC20
pub fn decode_call(data: &str) -> Result<DecodedCall> {
    CODEC.decode_function(data)
}

/// Chamada ERC20 decodificada com os argumentos tipados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Erc20Call {
    BalanceOf { account: Address },
    Allowance { owner: Address, spender: Address },
    TotalSupply,
    Name,
    Symbol,
    Decimals,
    Approve { spender: Address, amount: U256 },
    Transfer { to: Address, amount: U256 },
    TransferFrom { from: Address, to: Address, amount: U256 },
}

impl Erc20Call {
    pub fn decode(data: &str) -> Result<Self> {
        let call = decode_call(data)?;
        let name = call.name;
        let mut args = TokenReader::new(
            call.params.into_iter().map(|(_, token)| token).collect(),
            0,
            name.as_str(),
        )?;

        Ok(match name.as_str() {
            "balanceOf" => Erc20Call::BalanceOf { account: args.address()? },
            "allowance" => Erc20Call::Allowance {
                owner: args.address()?,
                spender: args.address()?,
            },
            "totalSupply" => Erc20Call::TotalSupply,
            "name" => Erc20Call::Name,
            "symbol" => Erc20Call::Symbol,
            "decimals" => Erc20Call::Decimals,
            "approve" => Erc20Call::Approve {
                spender: args.address()?,
                amount: args.uint()?,
            },
            "transfer" => Erc20Call::Transfer {
                to: args.address()?,
                amount: args.uint()?,
            },
            "transferFrom" => Erc20Call::TransferFrom {
                from: args.address()?,
                to: args.address()?,
                amount: args.uint()?,
            },
            other => return Err(Error::NotFound(format!("função ERC20 '{other}'"))),
        })
    }

    /// Nome da função na ABI
    pub fn function_name(&self) -> &'static str {
        match self {
            Erc20Call::BalanceOf { .. } => "balanceOf",
            Erc20Call::Allowance { .. } => "allowance",
            Erc20Call::TotalSupply => "totalSupply",
            Erc20Call::Name => "name",
            Erc20Call::Symbol => "symbol",
            Erc20Call::Decimals => "decimals",
            Erc20Call::Approve { .. } => "approve",
            Erc20Call::Transfer { .. } => "transfer",
            Erc20Call::TransferFrom { .. } => "transferFrom",
        }
    }
}

// Decodificação de retornos

pub fn decode_uint256_result(function: &str, data: &str) -> Result<U256> {
    take_uint(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_string_result(function: &str, data: &str) -> Result<String> {
    take_string(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_uint8_result(function: &str, data: &str) -> Result<u8> {
    take_u8(first(CODEC.decode_function_result(function, data)?)?)
}

pub fn decode_bool_result(function: &str, data: &str) -> Result<bool> {
    take_bool(first(CODEC.decode_function_result(function, data)?)?)
}

// Helpers via provedor

pub async fn get_balance_of<P>(provider: &P, token: &str, account: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let account = parse_address(account)?;
    let out = call_function(provider, &CODEC, token, "balanceOf", &[Token::Address(account)]).await?;
    take_uint(first(out)?)
}

pub async fn get_allowance<P>(provider: &P, token: &str, owner: &str, spender: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let owner = parse_address(owner)?;
    let spender = parse_address(spender)?;
    let out = call_function(
        provider,
        &CODEC,
        token,
        "allowance",
        &[Token::Address(owner), Token::Address(spender)],
    )
    .await?;
    take_uint(first(out)?)
}

pub async fn get_total_supply<P>(provider: &P, token: &str) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let out = call_function(provider, &CODEC, token, "totalSupply", &[]).await?;
    take_uint(first(out)?)
}

pub async fn get_name<P>(provider: &P, token: &str) -> Result<String>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let out = call_function(provider, &CODEC, token, "name", &[]).await?;
    take_string(first(out)?)
}

pub async fn get_symbol<P>(provider: &P, token: &str) -> Result<String>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let out = call_function(provider, &CODEC, token, "symbol", &[]).await?;
    take_string(first(out)?)
}

pub async fn get_decimals<P>(provider: &P, token: &str) -> Result<u8>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let out = call_function(provider, &CODEC, token, "decimals", &[]).await?;
    take_u8(first(out)?)
}

/// Envia `approve(spender, amount)` para o token
pub async fn approve<P>(
    provider: &P,
    token: &str,
    spender: &str,
    amount: U256,
    options: &TxOptions,
) -> Result<TransactionHash>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let spender = parse_address(spender)?;
    send_function(
        provider,
        &CODEC,
        token,
        "approve",
        &[Token::Address(spender), Token::Uint(amount)],
        options,
    )
    .await
}

/// Envia `transfer(to, amount)` para o token
pub async fn transfer<P>(
    provider: &P,
    token: &str,
    to: &str,
    amount: U256,
    options: &TxOptions,
) -> Result<TransactionHash>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let to = parse_address(to)?;
    send_function(
        provider,
        &CODEC,
        token,
        "transfer",
        &[Token::Address(to), Token::Uint(amount)],
        options,
    )
    .await
}

/// Envia `transferFrom(from, to, amount)` para o token
pub async fn transfer_from<P>(
    provider: &P,
    token: &str,
    from: &str,
    to: &str,
    amount: U256,
    options: &TxOptions,
) -> Result<TransactionHash>
where
    P: ContractProvider + ?Sized,
{
    let token = require_address("token", token)?;
    let from = parse_address(from)?;
    let to = parse_address(to)?;
    send_function(
        provider,
        &CODEC,
        token,
        "transferFrom",
        &[Token::Address(from), Token::Address(to), Token::Uint(amount)],
        options,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLDER: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    #[test]
    fn selectors_match_standard() {
        assert!(encode_total_supply().unwrap().starts_with("0x18160ddd"));
        assert!(encode_decimals().unwrap().starts_with("0x313ce567"));
        assert!(encode_name().unwrap().starts_with("0x06fdde03"));
        assert!(encode_symbol().unwrap().starts_with("0x95d89b41"));
        assert!(encode_balance_of(HOLDER).unwrap().starts_with("0x70a08231"));
        assert!(encode_allowance(HOLDER, HOLDER).unwrap().starts_with("0xdd62ed3e"));
        assert!(encode_approve(HOLDER, U256::one()).unwrap().starts_with("0x095ea7b3"));
        assert!(encode_transfer(HOLDER, U256::one()).unwrap().starts_with("0xa9059cbb"));
        assert!(encode_transfer_from(HOLDER, HOLDER, U256::one())
            .unwrap()
            .starts_with("0x23b872dd"));
    }

    #[test]
    fn invalid_address_reports_input() {
        let err = encode_balance_of("0xinvalid").unwrap_err();
        assert_eq!(err.to_string(), "Endereço inválido: 0xinvalid");
    }

    #[test]
    fn function_name_matches_decoded_call() {
        let data = encode_transfer(HOLDER, U256::from(7u64)).unwrap();
        let call = Erc20Call::decode(&data).unwrap();
        assert_eq!(call.function_name(), decode_call(&data).unwrap().name);
    }
}
