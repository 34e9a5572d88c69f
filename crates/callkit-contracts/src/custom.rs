//! Codificação e decodificação para contratos com ABI fornecida pelo chamador.

use callkit_core::error::{Error, Result};
use callkit_core::types::{DecodedCall, DecodedEvent};
use callkit_core::utils::{decode_hex, to_hex};
use callkit_core::AbiCodec;
use ethers::abi::{Abi, Function, RawLog, StateMutability, Token};
use ethers::types::H256;

/// ABI arbitrária com as operações de codec
#[derive(Debug, Clone)]
pub struct CustomAbi {
    codec: AbiCodec,
}

impl From<Abi> for CustomAbi {
    fn from(abi: Abi) -> Self {
        Self {
            codec: AbiCodec::new(abi),
        }
    }
}

impl CustomAbi {
    /// Carrega uma ABI em JSON; o documento precisa ser um array de entradas
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::ValidationError(format!("ABI JSON inválida: {e}")))?;
        if !value.is_array() {
            return Err(Error::ValidationError("ABI deve ser um array".to_string()));
        }
        let abi: Abi = serde_json::from_value(value)
            .map_err(|e| Error::ValidationError(format!("ABI JSON inválida: {e}")))?;
        Ok(abi.into())
    }

    pub fn from_human_readable(signatures: &[&str]) -> Result<Self> {
        Ok(Self {
            codec: AbiCodec::from_human_readable(signatures)?,
        })
    }

    pub fn abi(&self) -> &Abi {
        self.codec.abi()
    }

    /// Descritor da função; `NotFound` quando a ABI não a declara
    pub fn function_abi(&self, name: &str) -> Result<&Function> {
        self.abi()
            .function(name)
            .map_err(|_| Error::NotFound(format!("função '{name}' não encontrada na ABI informada")))
    }

    pub fn encode_function(&self, name: &str, params: &[Token]) -> Result<String> {
        self.function_abi(name)?;
        self.codec
            .encode_function(name, params)
            .map_err(|e| e.context(format!("falha ao codificar a função '{name}'")))
    }

    pub fn decode_function(&self, data: &str) -> Result<DecodedCall> {
        self.codec
            .decode_function(data)
            .map_err(|e| e.context("falha ao decodificar call data"))
    }

    pub fn decode_function_result(&self, name: &str, data: &str) -> Result<Vec<Token>> {
        self.function_abi(name)?;
        self.codec
            .decode_function_result(name, data)
            .map_err(|e| e.context(format!("falha ao decodificar o retorno de '{name}'")))
    }

    /// Assinatura canônica, ex.: `transfer(address,uint256)`
    pub fn function_signature(&self, name: &str) -> Result<String> {
        let function = self.function_abi(name)?;
        let types = function
            .inputs
            .iter()
            .map(|param| param.kind.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Ok(format!("{}({})", function.name, types))
    }

    /// Seletor de 4 bytes em hex, ex.: `0xa9059cbb`
    pub fn function_selector(&self, name: &str) -> Result<String> {
        Ok(to_hex(&self.function_abi(name)?.short_signature()))
    }

    /// Argumentos do construtor codificados para anexar ao bytecode de deploy
    pub fn encode_constructor(&self, params: &[Token]) -> Result<String> {
        match &self.abi().constructor {
            None if params.is_empty() => Ok("0x".to_string()),
            None => Err(Error::ValidationError(
                "construtor ausente na ABI, mas parâmetros foram informados".to_string(),
            )),
            Some(constructor) => constructor
                .encode_input(Vec::new(), params)
                .map(|data| to_hex(&data))
                .map_err(|e| {
                    Error::EncodeError(e.to_string()).context("falha ao codificar o construtor")
                }),
        }
    }

    /// Decodifica um log como o evento `name`, independente do topic0
    pub fn decode_event(&self, name: &str, data: &str, topics: &[H256]) -> Result<DecodedEvent> {
        let event = self
            .abi()
            .event(name)
            .map_err(|_| Error::NotFound(format!("evento '{name}' não encontrado na ABI informada")))?;
        let context = || format!("falha ao decodificar o evento '{name}'");

        let data = decode_hex(data).map_err(|e| e.context(context()))?;
        let decoded = event
            .parse_log(RawLog {
                topics: topics.to_vec(),
                data,
            })
            .map_err(|e| Error::DecodeError(e.to_string()).context(context()))?;

        Ok(DecodedEvent {
            name: event.name.clone(),
            params: decoded
                .params
                .into_iter()
                .map(|p| (p.name, p.value))
                .collect(),
        })
    }

    /// Nomes das funções, em ordem alfabética
    pub fn function_names(&self) -> Vec<String> {
        self.abi().functions().map(|f| f.name.clone()).collect()
    }

    /// Nomes dos eventos, em ordem alfabética
    pub fn event_names(&self) -> Vec<String> {
        self.abi().events().map(|e| e.name.clone()).collect()
    }

    pub fn is_function_payable(&self, name: &str) -> Result<bool> {
        Ok(self.function_abi(name)?.state_mutability == StateMutability::Payable)
    }

    /// `view` ou `pure`
    pub fn is_function_read_only(&self, name: &str) -> Result<bool> {
        Ok(matches!(
            self.function_abi(name)?.state_mutability,
            StateMutability::View | StateMutability::Pure
        ))
    }
}
