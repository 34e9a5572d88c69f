use thiserror::Error;

/// Erros comuns da biblioteca Callkit
#[derive(Error, Debug)]
pub enum Error {
    /// Endereço fora do formato `0x` + 40 dígitos hexadecimais
    #[error("Endereço inválido: {0}")]
    InvalidAddress(String),

    /// Parâmetro obrigatório ausente
    #[error("Parâmetro obrigatório ausente: {0}")]
    MissingParameter(String),

    /// Dados hexadecimais vazios ou malformados
    #[error("Dados inválidos: {0}")]
    InvalidData(String),

    /// Função ou evento não encontrado na ABI
    #[error("Não encontrado: {0}")]
    NotFound(String),

    /// Erro de codificação de dados
    #[error("Erro de codificação: {0}")]
    EncodeError(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Erro de validação
    #[error("Erro de validação: {0}")]
    ValidationError(String),

    /// Erro de comunicação com o node Ethereum
    #[error("Erro de RPC: {0}")]
    RpcError(String),

    /// Erro de timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Erro original acrescido de contexto
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Envolve o erro com uma mensagem de contexto
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Erro mais interno, ignorando as camadas de contexto
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_inner_message() {
        let err = Error::InvalidAddress("0x12".into()).context("falha na chamada getPair");
        assert_eq!(
            err.to_string(),
            "falha na chamada getPair: Endereço inválido: 0x12"
        );
        assert!(matches!(err.root(), Error::InvalidAddress(_)));
    }
}
