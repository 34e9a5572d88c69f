/*!
 * Callkit Tokens
 *
 * Extração tipada de valores decodificados pelo codec
 */

use ethereum_types::{Address, U256};
use ethers::abi::Token;

use crate::error::{Error, Result};

fn unexpected(expected: &str, token: &Token) -> Error {
    Error::DecodeError(format!("esperado {expected}, recebido {token:?}"))
}

/// Primeiro valor de uma lista de retorno; lista vazia é resposta inválida
pub fn first(tokens: Vec<Token>) -> Result<Token> {
    tokens.into_iter().next().ok_or_else(|| {
        Error::InvalidData("formato de resposta inválido ou resposta vazia".to_string())
    })
}

pub fn take_uint(token: Token) -> Result<U256> {
    match token {
        Token::Uint(value) => Ok(value),
        other => Err(unexpected("uint", &other)),
    }
}

pub fn take_u8(token: Token) -> Result<u8> {
    let value = take_uint(token)?;
    if value > U256::from(u8::MAX) {
        return Err(Error::DecodeError(format!("valor {value} não cabe em uint8")));
    }
    Ok(value.as_u32() as u8)
}

pub fn take_address(token: Token) -> Result<Address> {
    match token {
        Token::Address(address) => Ok(address),
        other => Err(unexpected("address", &other)),
    }
}

pub fn take_string(token: Token) -> Result<String> {
    match token {
        Token::String(value) => Ok(value),
        other => Err(unexpected("string", &other)),
    }
}

pub fn take_bool(token: Token) -> Result<bool> {
    match token {
        Token::Bool(value) => Ok(value),
        other => Err(unexpected("bool", &other)),
    }
}

pub fn take_bytes(token: Token) -> Result<Vec<u8>> {
    match token {
        Token::Bytes(value) => Ok(value),
        other => Err(unexpected("bytes", &other)),
    }
}

pub fn take_tuple(token: Token) -> Result<Vec<Token>> {
    match token {
        Token::Tuple(values) => Ok(values),
        other => Err(unexpected("tuple", &other)),
    }
}

pub fn take_uint_array(token: Token) -> Result<Vec<U256>> {
    match token {
        Token::Array(values) | Token::FixedArray(values) => {
            values.into_iter().map(take_uint).collect()
        }
        other => Err(unexpected("uint256[]", &other)),
    }
}

pub fn take_address_array(token: Token) -> Result<Vec<Address>> {
    match token {
        Token::Array(values) | Token::FixedArray(values) => {
            values.into_iter().map(take_address).collect()
        }
        other => Err(unexpected("address[]", &other)),
    }
}

/// Lê os campos de uma lista posicional, checando o tamanho mínimo
pub struct TokenReader {
    tokens: std::vec::IntoIter<Token>,
    context: String,
}

impl TokenReader {
    pub fn new(tokens: Vec<Token>, expected: usize, context: impl Into<String>) -> Result<Self> {
        let context = context.into();
        if tokens.len() < expected {
            return Err(Error::DecodeError(format!(
                "{context}: esperados {expected} valores, recebidos {}",
                tokens.len()
            )));
        }
        Ok(Self {
            tokens: tokens.into_iter(),
            context,
        })
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.tokens
            .next()
            .ok_or_else(|| Error::DecodeError(format!("{}: valores insuficientes", self.context)))
    }

    pub fn uint(&mut self) -> Result<U256> {
        self.next_token().and_then(take_uint)
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.next_token().and_then(take_u8)
    }

    pub fn address(&mut self) -> Result<Address> {
        self.next_token().and_then(take_address)
    }

    pub fn string(&mut self) -> Result<String> {
        self.next_token().and_then(take_string)
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>> {
        self.next_token().and_then(take_bytes)
    }

    pub fn tuple(&mut self) -> Result<Vec<Token>> {
        self.next_token().and_then(take_tuple)
    }

    pub fn address_array(&mut self) -> Result<Vec<Address>> {
        self.next_token().and_then(take_address_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_rejects_overflow() {
        assert_eq!(take_u8(Token::Uint(U256::from(18u64))).unwrap(), 18);
        assert!(take_u8(Token::Uint(U256::from(256u64))).is_err());
    }

    #[test]
    fn first_of_empty_is_invalid_data() {
        assert!(matches!(first(vec![]), Err(Error::InvalidData(_))));
    }

    #[test]
    fn reader_checks_length_and_types() {
        assert!(TokenReader::new(vec![Token::Bool(true)], 2, "getReserves").is_err());

        let mut reader = TokenReader::new(
            vec![Token::Address(Address::zero()), Token::Uint(U256::one())],
            2,
            "teste",
        )
        .unwrap();
        assert_eq!(reader.address().unwrap(), Address::zero());
        assert!(reader.string().is_err());
    }
}
