/*!
 * Callkit Codec
 *
 * Fachada sobre `ethers::abi` com a interface usada pelos módulos de contratos:
 * codificar por nome, decodificar call data pelo seletor, decodificar retornos
 * e decodificar logs pelo topic0.
 */

use ethers::abi::{Abi, Function, RawLog, Token};
use ethers::types::H256;

use crate::error::{Error, Result};
use crate::types::{DecodedCall, DecodedEvent};
use crate::utils::{decode_hex, decode_non_empty_hex, to_hex};

/// Codec ABI associado a uma tabela estática de funções e eventos
#[derive(Debug, Clone)]
pub struct AbiCodec {
    abi: Abi,
}

impl AbiCodec {
    pub fn new(abi: Abi) -> Self {
        Self { abi }
    }

    /// Cria o codec a partir de assinaturas legíveis (`function foo(uint256) view returns (bool)`)
    pub fn from_human_readable(signatures: &[&str]) -> Result<Self> {
        let abi = ethers::abi::parse_abi(signatures)
            .map_err(|e| Error::ValidationError(format!("ABI legível inválida: {e}")))?;
        Ok(Self::new(abi))
    }

    /// Cria o codec a partir de uma ABI em JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let abi: Abi = serde_json::from_str(json)
            .map_err(|e| Error::ValidationError(format!("ABI JSON inválida: {e}")))?;
        Ok(Self::new(abi))
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Procura uma função pelo nome (a primeira em caso de sobrecarga)
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .function(name)
            .map_err(|_| Error::NotFound(format!("função '{name}' não encontrada na ABI")))
    }

    /// Codifica seletor + parâmetros como bytes
    pub fn encode_function_bytes(&self, name: &str, params: &[Token]) -> Result<Vec<u8>> {
        let function = self.function(name)?;
        function
            .encode_input(params)
            .map_err(|e| Error::EncodeError(format!("{name}: {e}")))
    }

    /// Codifica seletor + parâmetros como hex com prefixo `0x`
    pub fn encode_function(&self, name: &str, params: &[Token]) -> Result<String> {
        self.encode_function_bytes(name, params).map(|data| to_hex(&data))
    }

    /// Decodifica call data identificando a função pelo seletor
    pub fn decode_function(&self, data: &str) -> Result<DecodedCall> {
        let bytes = decode_hex(data)?;
        self.decode_function_bytes(&bytes)
    }

    pub fn decode_function_bytes(&self, data: &[u8]) -> Result<DecodedCall> {
        if data.len() < 4 {
            return Err(Error::InvalidData(
                "call data menor que um seletor de 4 bytes".to_string(),
            ));
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);

        let function = self
            .abi
            .functions()
            .find(|f| f.short_signature() == selector)
            .ok_or_else(|| {
                Error::NotFound(format!("seletor 0x{} não encontrado na ABI", hex::encode(selector)))
            })?;

        let tokens = function
            .decode_input(&data[4..])
            .map_err(|e| Error::DecodeError(format!("{}: {e}", function.name)))?;

        Ok(DecodedCall {
            name: function.name.clone(),
            selector,
            params: function
                .inputs
                .iter()
                .map(|p| p.name.clone())
                .zip(tokens)
                .collect(),
        })
    }

    /// Decodifica os valores de retorno de uma função
    pub fn decode_function_result(&self, name: &str, data: &str) -> Result<Vec<Token>> {
        let bytes = decode_non_empty_hex(data)?;
        self.decode_function_result_bytes(name, &bytes)
    }

    pub fn decode_function_result_bytes(&self, name: &str, data: &[u8]) -> Result<Vec<Token>> {
        let function = self.function(name)?;
        if data.is_empty() && !function.outputs.is_empty() {
            return Err(Error::InvalidData(format!("retorno vazio para {name}")));
        }
        function
            .decode_output(data)
            .map_err(|e| Error::DecodeError(format!("{name}: {e}")))
    }

    /// Decodifica um log procurando o evento cujo topic0 coincide
    pub fn decode_log(&self, data: &str, topics: &[H256]) -> Result<DecodedEvent> {
        let bytes = decode_hex(data)?;
        self.decode_log_bytes(bytes, topics)
    }

    pub fn decode_log_bytes(&self, data: Vec<u8>, topics: &[H256]) -> Result<DecodedEvent> {
        let topic0 = topics
            .first()
            .ok_or_else(|| Error::InvalidData("log sem topics".to_string()))?;
        let event = self
            .abi
            .events()
            .find(|e| !e.anonymous && e.signature() == *topic0)
            .ok_or_else(|| Error::NotFound(format!("evento com topic {topic0:?} não encontrado na ABI")))?;

        let decoded = event
            .parse_log(RawLog {
                topics: topics.to_vec(),
                data,
            })
            .map_err(|e| Error::DecodeError(format!("{}: {e}", event.name)))?;

        Ok(DecodedEvent {
            name: event.name.clone(),
            params: decoded
                .params
                .into_iter()
                .map(|p| (p.name, p.value))
                .collect(),
        })
    }
}
