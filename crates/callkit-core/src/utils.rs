/*!
 * Callkit Utils
 *
 * Validação de endereços e conversões hexadecimais usadas pelos helpers
 */

use ethereum_types::Address;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Verifica se a string segue exatamente o formato `0x` + 40 dígitos hexadecimais
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(digits) => digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Converte uma string para Address, rejeitando qualquer formato fora do estrito
pub fn parse_address(address: &str) -> Result<Address> {
    if !is_valid_address(address) {
        return Err(Error::InvalidAddress(address.to_string()));
    }
    Address::from_str(&address[2..]).map_err(|_| Error::InvalidAddress(address.to_string()))
}

/// Igual a `parse_address`, mas trata string vazia como parâmetro ausente
pub fn require_address(name: &str, address: &str) -> Result<Address> {
    if address.trim().is_empty() {
        return Err(Error::MissingParameter(name.to_string()));
    }
    parse_address(address).map_err(|_| Error::InvalidAddress(format!("{name} {address}")))
}

/// Valida um caminho de swap: pelo menos dois endereços, todos no formato estrito
pub fn parse_path<S: AsRef<str>>(path: &[S]) -> Result<Vec<Address>> {
    if path.len() < 2 {
        return Err(Error::ValidationError(
            "caminho válido com pelo menos 2 endereços é obrigatório".to_string(),
        ));
    }
    path.iter()
        .map(|address| {
            let address = address.as_ref();
            parse_address(address).map_err(|_| {
                Error::InvalidAddress(format!("endereço inválido no caminho: {address}"))
            })
        })
        .collect()
}

/// Formata bytes como string hexadecimal com prefixo `0x`
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Converte uma string hexadecimal (com ou sem `0x`) para bytes
pub fn decode_hex(data: &str) -> Result<Vec<u8>> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(digits).map_err(|e| Error::InvalidData(format!("hex malformado: {e}")))
}

/// Igual a `decode_hex`, mas rejeita dados vazios (`""` ou `"0x"`)
pub fn decode_non_empty_hex(data: &str) -> Result<Vec<u8>> {
    let bytes = decode_hex(data)?;
    if bytes.is_empty() {
        return Err(Error::InvalidData(
            "dados hexadecimais inválidos ou vazios".to_string(),
        ));
    }
    Ok(bytes)
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

    #[test]
    fn accepts_mixed_case_addresses() {
        assert!(is_valid_address(WETH));
        assert!(is_valid_address(&WETH.to_lowercase()));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_address("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        assert!(!is_valid_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc"));
        assert!(!is_valid_address("0xZ02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        assert!(!is_valid_address(""));
        assert!(matches!(parse_address("0x123"), Err(Error::InvalidAddress(a)) if a == "0x123"));
    }

    #[test]
    fn require_address_distinguishes_missing_from_invalid() {
        assert!(matches!(require_address("pair", ""), Err(Error::MissingParameter(_))));
        assert!(matches!(require_address("pair", "0xabc"), Err(Error::InvalidAddress(_))));
        assert!(require_address("pair", WETH).is_ok());
    }

    #[test]
    fn path_needs_two_valid_addresses() {
        assert!(matches!(parse_path(&[WETH]), Err(Error::ValidationError(_))));
        let err = parse_path(&[WETH, "0xnope"]).unwrap_err();
        assert!(err.to_string().contains("0xnope"));
        assert_eq!(parse_path(&[WETH, WETH]).unwrap().len(), 2);
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(to_hex(&[0x12, 0xab]), "0x12ab");
        assert_eq!(decode_hex("0x12ab").unwrap(), vec![0x12, 0xab]);
        assert_eq!(decode_hex("12ab").unwrap(), vec![0x12, 0xab]);
        assert!(decode_hex("0xzz").is_err());
        assert!(decode_non_empty_hex("0x").is_err());
    }
}
