use alloy::primitives::U256;
use serde_json::Value;

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("invalid quantity for `{field}`: {value}")]
pub struct InvalidQuantity {
    pub field: String,
    pub value: String,
}

/// Parse a transaction quantity. Accepts JSON numbers, `0x`-prefixed hex strings
/// and plain decimal strings, which is what wallets and client libraries send.
pub fn parse_quantity(field: &str, value: &Value) -> Result<U256, InvalidQuantity> {
    let invalid = || InvalidQuantity {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                if hex.is_empty() {
                    return Ok(U256::ZERO);
                }
                U256::from_str_radix(hex, 16).map_err(|_| invalid())
            } else if s.is_empty() {
                Err(invalid())
            } else {
                U256::from_str_radix(s, 10).map_err(|_| invalid())
            }
        }
        _ => Err(invalid()),
    }
}

pub fn parse_u64(field: &str, value: &Value) -> Result<u64, InvalidQuantity> {
    let quantity = parse_quantity(field, value)?;
    u64::try_from(quantity).map_err(|_| InvalidQuantity {
        field: field.to_string(),
        value: value.to_string(),
    })
}

pub fn parse_u128(field: &str, value: &Value) -> Result<u128, InvalidQuantity> {
    let quantity = parse_quantity(field, value)?;
    u128::try_from(quantity).map_err(|_| InvalidQuantity {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// True for a `0x`-prefixed, even-length hex string carrying at least one byte.
pub fn is_hex_payload(payload: &str) -> bool {
    match payload.strip_prefix("0x") {
        Some(body) => !body.is_empty() && hex::decode(body).is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantities_in_every_notation() {
        assert_eq!(parse_quantity("nonce", &json!("0x5")).unwrap(), U256::from(5));
        assert_eq!(parse_quantity("gas", &json!("300000")).unwrap(), U256::from(300_000));
        assert_eq!(parse_quantity("value", &json!(5000)).unwrap(), U256::from(5000));
        assert_eq!(parse_quantity("data", &json!("0x")).unwrap(), U256::ZERO);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_quantity("nonce", &json!("0xzz")).is_err());
        assert!(parse_quantity("nonce", &json!("")).is_err());
        assert!(parse_quantity("nonce", &json!(-1)).is_err());
        assert!(parse_quantity("nonce", &json!({"n": 1})).is_err());

        let err = parse_u64("gasLimit", &json!("0x10000000000000000")).unwrap_err();
        assert_eq!(err.field, "gasLimit");
    }

    #[test]
    fn hex_payloads() {
        assert!(is_hex_payload("0xdeadbeef"));
        assert!(!is_hex_payload("deadbeef"));
        assert!(!is_hex_payload("0x"));
        assert!(!is_hex_payload("0xabc"));
    }
}
