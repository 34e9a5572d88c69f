//! Uniswap V2 Router02: cotações e swaps envolvendo ETH.
//!
//! Os swaps expõem três modos sobre a mesma call data: chamada estática
//! (`call`), transação (`send`) e estimativa de gas (`estimate`).

use callkit_core::config::resolve_address;
use callkit_core::error::{Error, Result};
use callkit_core::tokens::{take_uint, take_uint_array, TokenReader};
use callkit_core::traits::ContractProvider;
use callkit_core::types::{DecodedCall, TransactionHash, TxOptions};
use callkit_core::utils::{decode_non_empty_hex, format_address, parse_address, parse_path, to_hex};
use callkit_core::AbiCodec;
use ethereum_types::{Address, U256};
use ethers::abi::{Abi, Token};
use ethers::types::TransactionRequest;
use once_cell::sync::Lazy;
use tracing::{debug, error};

use crate::call::{estimate_function, send_function};

pub use callkit_core::config::DEFAULT_UNISWAP_V2_ROUTER_ADDRESS;

const ROUTER_ABI: &[&str] = &[
    "function swapETHForExactTokens(uint256 amountOut, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts)",
    "function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts)",
    "function swapExactETHForTokensSupportingFeeOnTransferTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) external payable",
    "function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
    "function swapExactTokensForETHSupportingFeeOnTransferTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external",
    "function getAmountOut(uint256 amountIn, uint256 reserveIn, uint256 reserveOut) external pure returns (uint256 amountOut)",
    "function getAmountIn(uint256 amountOut, uint256 reserveIn, uint256 reserveOut) external pure returns (uint256 amountIn)",
    "function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts)",
    "function getAmountsIn(uint256 amountOut, address[] path) external view returns (uint256[] amounts)",
];

static CODEC: Lazy<AbiCodec> =
    Lazy::new(|| AbiCodec::from_human_readable(ROUTER_ABI).expect("abi UniswapV2Router02"));

/// ABI do router Uniswap V2
pub fn abi() -> &'static Abi {
    CODEC.abi()
}

fn router_address(router: Option<&str>) -> Result<Address> {
    resolve_address(router, DEFAULT_UNISWAP_V2_ROUTER_ADDRESS).map_err(|_| {
        Error::InvalidAddress(format!(
            "formato de endereço do router inválido: {}",
            router.unwrap_or_default()
        ))
    })
}

fn address_list<S: AsRef<str>>(path: &[S]) -> Result<Token> {
    let addresses = path
        .iter()
        .map(|address| parse_address(address.as_ref()).map(Token::Address))
        .collect::<Result<Vec<_>>>()?;
    Ok(Token::Array(addresses))
}

fn encode(function: &str, params: Result<Vec<Token>>) -> Result<String> {
    params
        .and_then(|params| CODEC.encode_function(function, &params))
        .map_err(|e| e.context(format!("Erro de codificação em {function}")))
}

fn eth_in_params<S: AsRef<str>>(amount: U256, path: &[S], to: &str, deadline: U256) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Uint(amount),
        address_list(path)?,
        Token::Address(parse_address(to)?),
        Token::Uint(deadline),
    ])
}

fn tokens_in_params<S: AsRef<str>>(
    amount_in: U256,
    amount_out_min: U256,
    path: &[S],
    to: &str,
    deadline: U256,
) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Uint(amount_in),
        Token::Uint(amount_out_min),
        address_list(path)?,
        Token::Address(parse_address(to)?),
        Token::Uint(deadline),
    ])
}

fn address_tokens(path: &[Address]) -> Token {
    Token::Array(path.iter().copied().map(Token::Address).collect())
}

// Codificação

pub fn encode_swap_eth_for_exact_tokens<S: AsRef<str>>(
    amount_out: U256,
    path: &[S],
    to: &str,
    deadline: U256,
) -> Result<String> {
    encode(
        "swapETHForExactTokens",
        eth_in_params(amount_out, path, to, deadline),
    )
}

pub fn encode_swap_exact_eth_for_tokens<S: AsRef<str>>(
    amount_out_min: U256,
    path: &[S],
    to: &str,
    deadline: U256,
) -> Result<String> {
    encode(
        "swapExactETHForTokens",
        eth_in_params(amount_out_min, path, to, deadline),
    )
}

pub fn encode_swap_exact_eth_for_tokens_supporting_fee_on_transfer_tokens<S: AsRef<str>>(
    amount_out_min: U256,
    path: &[S],
    to: &str,
    deadline: U256,
) -> Result<String> {
    encode(
        "swapExactETHForTokensSupportingFeeOnTransferTokens",
        eth_in_params(amount_out_min, path, to, deadline),
    )
}

pub fn encode_swap_exact_tokens_for_eth<S: AsRef<str>>(
    amount_in: U256,
    amount_out_min: U256,
    path: &[S],
    to: &str,
    deadline: U256,
) -> Result<String> {
    encode(
        "swapExactTokensForETH",
        tokens_in_params(amount_in, amount_out_min, path, to, deadline),
    )
}

pub fn encode_swap_exact_tokens_for_eth_supporting_fee_on_transfer_tokens<S: AsRef<str>>(
    amount_in: U256,
    amount_out_min: U256,
    path: &[S],
    to: &str,
    deadline: U256,
) -> Result<String> {
    encode(
        "swapExactTokensForETHSupportingFeeOnTransferTokens",
        tokens_in_params(amount_in, amount_out_min, path, to, deadline),
    )
}

pub fn encode_get_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<String> {
    encode(
        "getAmountOut",
        Ok(vec![
            Token::Uint(amount_in),
            Token::Uint(reserve_in),
            Token::Uint(reserve_out),
        ]),
    )
}

pub fn encode_get_amount_in(amount_out: U256, reserve_in: U256, reserve_out: U256) -> Result<String> {
    encode(
        "getAmountIn",
        Ok(vec![
            Token::Uint(amount_out),
            Token::Uint(reserve_in),
            Token::Uint(reserve_out),
        ]),
    )
}

pub fn encode_get_amounts_out<S: AsRef<str>>(amount_in: U256, path: &[S]) -> Result<String> {
    encode(
        "getAmountsOut",
        address_list(path).map(|path| vec![Token::Uint(amount_in), path]),
    )
}

pub fn encode_get_amounts_in<S: AsRef<str>>(amount_out: U256, path: &[S]) -> Result<String> {
    encode(
        "getAmountsIn",
        address_list(path).map(|path| vec![Token::Uint(amount_out), path]),
    )
}

// Decodificação

pub fn decode_call(data: &str) -> Result<DecodedCall> {
    CODEC.decode_function(data)
}

fn decode_amounts_bytes(function: &str, data: &[u8]) -> Result<Option<Vec<U256>>> {
    let Ok(abi) = CODEC.function(function) else {
        return Ok(None);
    };
    if abi.outputs.is_empty() {
        return Ok(None);
    }

    let decode = || -> Result<Vec<U256>> {
        let mut tokens = CODEC.decode_function_result_bytes(function, data)?;
        if tokens.len() != 1 {
            return tokens.into_iter().map(take_uint).collect();
        }
        match tokens.remove(0) {
            Token::Uint(value) => Ok(vec![value]),
            other => take_uint_array(other),
        }
    };
    decode()
        .map(Some)
        .map_err(|e| e.context(format!("Erro de decodificação em {function}")))
}

/// Decodifica o retorno de uma função do router
///
/// `None` para funções desconhecidas ou sem retorno; retornos escalares viram
/// um vetor de um elemento.
pub fn decode_amounts_result(function: &str, data: &str) -> Result<Option<Vec<U256>>> {
    match CODEC.function(function) {
        Ok(abi) if !abi.outputs.is_empty() => {}
        _ => return Ok(None),
    }
    let bytes = decode_non_empty_hex(data)
        .map_err(|e| e.context(format!("Erro de decodificação em {function}")))?;
    decode_amounts_bytes(function, &bytes)
}

/// Alias mantido para os retornos de swap
pub fn decode_swap_result(function: &str, data: &str) -> Result<Option<Vec<U256>>> {
    decode_amounts_result(function, data)
}

async fn call_router<P>(
    provider: &P,
    router: Address,
    function: &str,
    data: Vec<u8>,
) -> Result<Option<Vec<U256>>>
where
    P: ContractProvider + ?Sized,
{
    let request = TransactionRequest::new().to(router).data(data);
    debug!("eth_call {} em {}", function, format_address(&router));

    let response = provider.call(&request).await.map_err(|e| {
        error!("Erro ao chamar {} em {}: {}", function, format_address(&router), e);
        e
    })?;

    let abi = CODEC.function(function)?;
    if response.is_empty() && !abi.outputs.is_empty() {
        return Err(Error::InvalidData("sem resposta da chamada ao contrato".to_string()));
    }
    decode_amounts_bytes(function, &response)
}

fn single_amount(function: &str, amounts: Option<Vec<U256>>) -> Result<U256> {
    amounts
        .and_then(|amounts| amounts.into_iter().next())
        .ok_or_else(|| Error::InvalidData(format!("{function} não retornou valor")))
}

// Cotações

pub async fn get_amount_out<P>(
    provider: &P,
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    router: Option<&str>,
) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let quote = async {
        let router = router_address(router)?;
        let data = CODEC.encode_function_bytes(
            "getAmountOut",
            &[Token::Uint(amount_in), Token::Uint(reserve_in), Token::Uint(reserve_out)],
        )?;
        single_amount("getAmountOut", call_router(provider, router, "getAmountOut", data).await?)
    };
    quote.await.map_err(|e| e.context("falha em getAmountOut"))
}

pub async fn get_amount_in<P>(
    provider: &P,
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    router: Option<&str>,
) -> Result<U256>
where
    P: ContractProvider + ?Sized,
{
    let quote = async {
        let router = router_address(router)?;
        let data = CODEC.encode_function_bytes(
            "getAmountIn",
            &[Token::Uint(amount_out), Token::Uint(reserve_in), Token::Uint(reserve_out)],
        )?;
        single_amount("getAmountIn", call_router(provider, router, "getAmountIn", data).await?)
    };
    quote.await.map_err(|e| e.context("falha em getAmountIn"))
}

async fn quote_path<P, S>(
    provider: &P,
    function: &str,
    amount: U256,
    path: &[S],
    router: Option<&str>,
) -> Result<Vec<U256>>
where
    P: ContractProvider + ?Sized,
    S: AsRef<str>,
{
    let quote = async {
        let path = parse_path(path)?;
        let router = router_address(router)?;
        let data = CODEC.encode_function_bytes(function, &[Token::Uint(amount), address_tokens(&path)])?;
        Ok::<_, Error>(call_router(provider, router, function, data).await?.unwrap_or_default())
    };
    quote.await.map_err(|e| e.context(format!("falha em {function}")))
}

/// Quantidades de saída ao longo do caminho para uma entrada exata
pub async fn get_amounts_out<P, S>(
    provider: &P,
    amount_in: U256,
    path: &[S],
    router: Option<&str>,
) -> Result<Vec<U256>>
where
    P: ContractProvider + ?Sized,
    S: AsRef<str>,
{
    quote_path(provider, "getAmountsOut", amount_in, path, router).await
}

/// Quantidades de entrada ao longo do caminho para uma saída exata
pub async fn get_amounts_in<P, S>(
    provider: &P,
    amount_out: U256,
    path: &[S],
    router: Option<&str>,
) -> Result<Vec<U256>>
where
    P: ContractProvider + ?Sized,
    S: AsRef<str>,
{
    quote_path(provider, "getAmountsIn", amount_out, path, router).await
}

// Swaps

/// Swap do router com argumentos já validados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapCall {
    EthForExactTokens {
        amount_out: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    },
    ExactEthForTokens {
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    },
    ExactEthForTokensSupportingFeeOnTransferTokens {
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    },
    ExactTokensForEth {
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    },
    ExactTokensForEthSupportingFeeOnTransferTokens {
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    },
}

fn recipient(to: &str) -> Result<Address> {
    if to.trim().is_empty() {
        return Err(Error::MissingParameter("endereço do destinatário".to_string()));
    }
    parse_address(to).map_err(|_| Error::InvalidAddress(format!("destinatário inválido: {to}")))
}

/// Valida caminho, destinatário e router antes de qualquer codificação
pub fn validate_swap<S: AsRef<str>>(path: &[S], to: &str, router: Option<&str>) -> Result<()> {
    parse_path(path)?;
    recipient(to)?;
    router_address(router)?;
    Ok(())
}

impl SwapCall {
    pub fn eth_for_exact_tokens<S: AsRef<str>>(
        amount_out: U256,
        path: &[S],
        to: &str,
        deadline: U256,
    ) -> Result<Self> {
        Ok(SwapCall::EthForExactTokens {
            amount_out,
            path: parse_path(path)?,
            to: recipient(to)?,
            deadline,
        })
    }

    pub fn exact_eth_for_tokens<S: AsRef<str>>(
        amount_out_min: U256,
        path: &[S],
        to: &str,
        deadline: U256,
    ) -> Result<Self> {
        Ok(SwapCall::ExactEthForTokens {
            amount_out_min,
            path: parse_path(path)?,
            to: recipient(to)?,
            deadline,
        })
    }

    pub fn exact_eth_for_tokens_supporting_fee_on_transfer_tokens<S: AsRef<str>>(
        amount_out_min: U256,
        path: &[S],
        to: &str,
        deadline: U256,
    ) -> Result<Self> {
        Ok(SwapCall::ExactEthForTokensSupportingFeeOnTransferTokens {
            amount_out_min,
            path: parse_path(path)?,
            to: recipient(to)?,
            deadline,
        })
    }

    pub fn exact_tokens_for_eth<S: AsRef<str>>(
        amount_in: U256,
        amount_out_min: U256,
        path: &[S],
        to: &str,
        deadline: U256,
    ) -> Result<Self> {
        Ok(SwapCall::ExactTokensForEth {
            amount_in,
            amount_out_min,
            path: parse_path(path)?,
            to: recipient(to)?,
            deadline,
        })
    }

    pub fn exact_tokens_for_eth_supporting_fee_on_transfer_tokens<S: AsRef<str>>(
        amount_in: U256,
        amount_out_min: U256,
        path: &[S],
        to: &str,
        deadline: U256,
    ) -> Result<Self> {
        Ok(SwapCall::ExactTokensForEthSupportingFeeOnTransferTokens {
            amount_in,
            amount_out_min,
            path: parse_path(path)?,
            to: recipient(to)?,
            deadline,
        })
    }

    /// Nome da função no router
    pub fn function_name(&self) -> &'static str {
        match self {
            SwapCall::EthForExactTokens { .. } => "swapETHForExactTokens",
            SwapCall::ExactEthForTokens { .. } => "swapExactETHForTokens",
            SwapCall::ExactEthForTokensSupportingFeeOnTransferTokens { .. } => {
                "swapExactETHForTokensSupportingFeeOnTransferTokens"
            }
            SwapCall::ExactTokensForEth { .. } => "swapExactTokensForETH",
            SwapCall::ExactTokensForEthSupportingFeeOnTransferTokens { .. } => {
                "swapExactTokensForETHSupportingFeeOnTransferTokens"
            }
        }
    }

    /// Swaps que entram com ETH precisam de `value` na transação
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            SwapCall::EthForExactTokens { .. }
                | SwapCall::ExactEthForTokens { .. }
                | SwapCall::ExactEthForTokensSupportingFeeOnTransferTokens { .. }
        )
    }

    pub fn path(&self) -> &[Address] {
        match self {
            SwapCall::EthForExactTokens { path, .. }
            | SwapCall::ExactEthForTokens { path, .. }
            | SwapCall::ExactEthForTokensSupportingFeeOnTransferTokens { path, .. }
            | SwapCall::ExactTokensForEth { path, .. }
            | SwapCall::ExactTokensForEthSupportingFeeOnTransferTokens { path, .. } => path,
        }
    }

    fn tokens(&self) -> Vec<Token> {
        match self {
            SwapCall::EthForExactTokens { amount_out: amount, path, to, deadline }
            | SwapCall::ExactEthForTokens { amount_out_min: amount, path, to, deadline }
            | SwapCall::ExactEthForTokensSupportingFeeOnTransferTokens {
                amount_out_min: amount,
                path,
                to,
                deadline,
            } => vec![
                Token::Uint(*amount),
                address_tokens(path),
                Token::Address(*to),
                Token::Uint(*deadline),
            ],
            SwapCall::ExactTokensForEth { amount_in, amount_out_min, path, to, deadline }
            | SwapCall::ExactTokensForEthSupportingFeeOnTransferTokens {
                amount_in,
                amount_out_min,
                path,
                to,
                deadline,
            } => vec![
                Token::Uint(*amount_in),
                Token::Uint(*amount_out_min),
                address_tokens(path),
                Token::Address(*to),
                Token::Uint(*deadline),
            ],
        }
    }

    fn encode_bytes(&self) -> Result<Vec<u8>> {
        CODEC
            .encode_function_bytes(self.function_name(), &self.tokens())
            .map_err(|e| e.context(format!("Erro de codificação em {}", self.function_name())))
    }

    /// Call data do swap em hex
    pub fn encode(&self) -> Result<String> {
        self.encode_bytes().map(|data| to_hex(&data))
    }

    /// Reconstrói o swap a partir de call data do router
    pub fn decode(data: &str) -> Result<Self> {
        let call = decode_call(data)?;
        let name = call.name;
        let mut args = TokenReader::new(
            call.params.into_iter().map(|(_, token)| token).collect(),
            4,
            name.as_str(),
        )?;

        Ok(match name.as_str() {
            "swapETHForExactTokens" => SwapCall::EthForExactTokens {
                amount_out: args.uint()?,
                path: args.address_array()?,
                to: args.address()?,
                deadline: args.uint()?,
            },
            "swapExactETHForTokens" => SwapCall::ExactEthForTokens {
                amount_out_min: args.uint()?,
                path: args.address_array()?,
                to: args.address()?,
                deadline: args.uint()?,
            },
            "swapExactETHForTokensSupportingFeeOnTransferTokens" => {
                SwapCall::ExactEthForTokensSupportingFeeOnTransferTokens {
                    amount_out_min: args.uint()?,
                    path: args.address_array()?,
                    to: args.address()?,
                    deadline: args.uint()?,
                }
            }
            "swapExactTokensForETH" => SwapCall::ExactTokensForEth {
                amount_in: args.uint()?,
                amount_out_min: args.uint()?,
                path: args.address_array()?,
                to: args.address()?,
                deadline: args.uint()?,
            },
            "swapExactTokensForETHSupportingFeeOnTransferTokens" => {
                SwapCall::ExactTokensForEthSupportingFeeOnTransferTokens {
                    amount_in: args.uint()?,
                    amount_out_min: args.uint()?,
                    path: args.address_array()?,
                    to: args.address()?,
                    deadline: args.uint()?,
                }
            }
            other => return Err(Error::NotFound(format!("'{other}' não é um swap do router"))),
        })
    }

    /// Chamada estática: retorna as quantidades que o swap produziria
    ///
    /// `None` para as variantes com suporte a fee-on-transfer, que não têm retorno.
    pub async fn call<P>(&self, provider: &P, router: Option<&str>) -> Result<Option<Vec<U256>>>
    where
        P: ContractProvider + ?Sized,
    {
        let function = self.function_name();
        let run = async {
            let router = router_address(router)?;
            let data = self.encode_bytes()?;
            call_router(provider, router, function, data).await
        };
        run.await
            .map_err(|e| e.context(format!("falha na chamada {function}")))
    }

    /// Envia o swap como transação
    pub async fn send<P>(
        &self,
        provider: &P,
        router: Option<&str>,
        options: &TxOptions,
    ) -> Result<TransactionHash>
    where
        P: ContractProvider + ?Sized,
    {
        let function = self.function_name();
        let run = async {
            let router = router_address(router)?;
            if self.requires_value() && options.value.map_or(true, |value| value.is_zero()) {
                return Err(Error::ValidationError(
                    "valor em ETH deve ser informado para swaps com ETH".to_string(),
                ));
            }
            send_function(provider, &CODEC, router, function, &self.tokens(), options).await
        };
        run.await
            .map_err(|e| e.context(format!("falha na transação {function}")))
    }

    /// Estima o gas do swap
    pub async fn estimate<P>(
        &self,
        provider: &P,
        router: Option<&str>,
        options: &TxOptions,
    ) -> Result<U256>
    where
        P: ContractProvider + ?Sized,
    {
        let function = self.function_name();
        let run = async {
            let router = router_address(router)?;
            estimate_function(provider, &CODEC, router, function, &self.tokens(), options).await
        };
        run.await
            .map_err(|e| e.context(format!("falha na estimativa de gas {function}")))
    }
}
