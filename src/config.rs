use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::accounts::AccountsProvider;
use crate::error::{ConfigurationError, TransportError};
use crate::provider::SignerProvider;
use crate::signers::{KeyProvider, SigningCapability, TransactionSigner};
use crate::transport::{Transport, TransportFactory};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8545";

/// Construction-time configuration for a [`SignerProvider`].
///
/// Nothing is validated until [`ProviderConfig::build`]; after that the
/// configuration is frozen for the provider's lifetime.
#[derive(Clone)]
pub struct ProviderConfig {
    pub(crate) endpoint: String,
    pub(crate) signer: Option<SigningCapability>,
    pub(crate) accounts: Option<Arc<dyn AccountsProvider>>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) transport_factory: Option<TransportFactory>,
    pub(crate) auto_resolve_defaults: bool,
    pub(crate) chain_id: Option<u64>,
}

impl ProviderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            signer: None,
            accounts: None,
            timeout: None,
            transport_factory: None,
            auto_resolve_defaults: true,
            chain_id: None,
        }
    }

    pub fn from_settings(settings: ProviderSettings) -> Self {
        let mut config = Self::new(settings.endpoint)
            .auto_resolve_defaults(settings.auto_resolve_defaults)
            .timeout(Duration::from_millis(settings.timeout_ms));
        config.chain_id = settings.chain_id;
        config
    }

    pub fn signer(mut self, signer: SigningCapability) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn transaction_signer(self, signer: impl TransactionSigner + 'static) -> Self {
        self.signer(SigningCapability::direct(signer))
    }

    pub fn key_provider(self, provider: impl KeyProvider + 'static) -> Self {
        self.signer(SigningCapability::keyed(provider))
    }

    pub fn accounts(mut self, accounts: impl AccountsProvider + 'static) -> Self {
        self.accounts = Some(Arc::new(accounts));
        self
    }

    /// A zero duration means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn transport_factory(mut self, factory: TransportFactory) -> Self {
        self.transport_factory = Some(factory);
        self
    }

    /// Use an already constructed transport instead of the HTTP default.
    pub fn transport(self, transport: Arc<dyn Transport>) -> Self {
        let factory: TransportFactory =
            Arc::new(move |_endpoint: &str, _timeout: Option<Duration>| {
                Ok::<Arc<dyn Transport>, TransportError>(transport.clone())
            });
        self.transport_factory(factory)
    }

    /// Whether `nonce` and `gasPrice` are looked up before signing. On by default.
    pub fn auto_resolve_defaults(mut self, enabled: bool) -> Self {
        self.auto_resolve_defaults = enabled;
        self
    }

    /// Chain id for locally signed transactions that carry no `chainId`.
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn build(self) -> Result<SignerProvider, ConfigurationError> {
        SignerProvider::new(self)
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("signer", &self.signer)
            .field("accounts", &self.accounts.is_some())
            .field("timeout", &self.timeout)
            .field("transport_factory", &self.transport_factory.is_some())
            .field("auto_resolve_defaults", &self.auto_resolve_defaults)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Plain, serializable part of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub auto_resolve_defaults: bool,
    pub chain_id: Option<u64>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_ms: 0,
            auto_resolve_defaults: true,
            chain_id: None,
        }
    }
}

impl ProviderSettings {
    /// Reads `ETH_RPC_URL`, `SIGNER_PROVIDER_TIMEOUT_MS`, `SIGNER_PROVIDER_CHAIN_ID`
    /// and `SIGNER_PROVIDER_AUTO_RESOLVE`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let mut settings = Self::default();

        if let Some(endpoint) = lookup("ETH_RPC_URL") {
            settings.endpoint = endpoint;
        }
        if let Some(value) = lookup("SIGNER_PROVIDER_TIMEOUT_MS") {
            settings.timeout_ms = parse_setting("SIGNER_PROVIDER_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("SIGNER_PROVIDER_CHAIN_ID") {
            settings.chain_id = Some(parse_setting("SIGNER_PROVIDER_CHAIN_ID", &value)?);
        }
        if let Some(value) = lookup("SIGNER_PROVIDER_AUTO_RESOLVE") {
            settings.auto_resolve_defaults = parse_setting("SIGNER_PROVIDER_AUTO_RESOLVE", &value)?;
        }

        Ok(settings)
    }
}

fn parse_setting<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigurationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidSetting {
            name: name.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn settings_default_without_env() {
        assert_eq!(
            ProviderSettings::from_lookup(lookup(&[])).unwrap(),
            ProviderSettings::default()
        );
    }

    #[test]
    fn settings_from_env() {
        let settings = ProviderSettings::from_lookup(lookup(&[
            ("ETH_RPC_URL", "https://sepolia.example.org"),
            ("SIGNER_PROVIDER_TIMEOUT_MS", "2500"),
            ("SIGNER_PROVIDER_CHAIN_ID", "11155111"),
            ("SIGNER_PROVIDER_AUTO_RESOLVE", "false"),
        ]))
        .unwrap();
        assert_eq!(
            settings,
            ProviderSettings {
                endpoint: "https://sepolia.example.org".into(),
                timeout_ms: 2500,
                auto_resolve_defaults: false,
                chain_id: Some(11155111),
            }
        );
    }

    #[test]
    fn bad_setting_is_reported() {
        let err = ProviderSettings::from_lookup(lookup(&[("SIGNER_PROVIDER_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        match err {
            ConfigurationError::InvalidSetting { name, .. } => {
                assert_eq!(name, "SIGNER_PROVIDER_TIMEOUT_MS")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn settings_deserialize_camel_case() {
        let settings: ProviderSettings =
            serde_json::from_str(r#"{"endpoint": "http://node:8545", "timeoutMs": 100}"#).unwrap();
        assert_eq!(settings.timeout_ms, 100);
        assert!(settings.auto_resolve_defaults);

        let config = ProviderConfig::from_settings(settings);
        assert_eq!(config.timeout, Some(Duration::from_millis(100)));
        assert_eq!(config.endpoint, "http://node:8545");
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = ProviderConfig::new(DEFAULT_ENDPOINT).timeout(Duration::ZERO);
        assert_eq!(config.timeout, None);
    }
}
