use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// Transaction object as received in `eth_sendTransaction` params.
///
/// Kept as a loose JSON object: callers send any mix of hex strings, decimal
/// strings and numbers, and the signing function decides what it accepts.
/// Recognized keys are `from`, `to`, `value`, `data`, `gas`/`gasLimit`,
/// `gasPrice`, `nonce` and `chainId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTransaction(Map<String, Value>);

impl RawTransaction {
    pub fn from_param(param: Option<&Value>) -> Result<Self, ProviderError> {
        match param {
            Some(Value::Object(fields)) => Ok(Self(fields.clone())),
            Some(other) => Err(ProviderError::InvalidTransaction(format!(
                "expected a transaction object, got {other}"
            ))),
            None => Err(ProviderError::InvalidTransaction(
                "missing transaction object".into(),
            )),
        }
    }

    /// Field lookup treating an explicit `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn from_address(&self) -> Option<&str> {
        self.get("from").and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Layer the caller's fields over resolved defaults. Any non-null field
    /// already on the transaction wins.
    pub fn with_defaults(self, nonce: Value, gas_price: Value) -> Self {
        let mut merged = Map::new();
        merged.insert("nonce".into(), nonce);
        merged.insert("gasPrice".into(), gas_price);
        for (key, value) in self.0 {
            if !value.is_null() || !merged.contains_key(&key) {
                merged.insert(key, value);
            }
        }
        Self(merged)
    }

    /// Move `gas` into `gasLimit`, the name signing libraries expect.
    /// The result never carries a `gas` key.
    pub fn normalize_gas(mut self) -> Self {
        if let Some(gas) = self.0.remove("gas") {
            if gas.is_string() || gas.is_number() {
                self.0.insert("gasLimit".into(), gas);
            }
        }
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
