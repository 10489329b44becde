// =============================================================================
// Application State
// =============================================================================
//
// Read-only after startup: the configuration and the provider chain.  The
// engine itself keeps no state, so handlers share this through `Arc` with no
// locking.
// =============================================================================

use crate::providers::{
    http_client, BarProvider, FallbackProvider, FinnhubClient, ProviderError, YahooClient,
};
use crate::runtime_config::RuntimeConfig;

/// State shared by every request handler via `Arc<AppState>`.
pub struct AppState {
    pub config: RuntimeConfig,
    pub provider: FallbackProvider,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: FallbackProvider) -> Self {
        Self { config, provider }
    }

    /// Build the provider chain described by `config`: Yahoo first (when
    /// enabled), then Finnhub (when an API key is present).
    pub fn from_config(config: RuntimeConfig) -> Result<Self, ProviderError> {
        let client = http_client()?;
        let mut providers: Vec<Box<dyn BarProvider>> = Vec::new();

        if config.server.enable_yahoo {
            providers.push(Box::new(YahooClient::new(
                client.clone(),
                config.server.yahoo_base_url.clone(),
            )));
        }
        if let Some(key) = &config.finnhub_api_key {
            providers.push(Box::new(FinnhubClient::new(
                client,
                config.server.finnhub_base_url.clone(),
                key.clone(),
            )));
        }

        Ok(Self::new(config, FallbackProvider::new(providers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_follows_config() {
        let mut config = RuntimeConfig::default();
        config.finnhub_api_key = Some("key".to_string());
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.provider.provider_names(), vec!["yahoo", "finnhub"]);
    }

    #[test]
    fn finnhub_skipped_without_key() {
        let mut config = RuntimeConfig::default();
        config.server.enable_yahoo = false;
        let state = AppState::from_config(config).unwrap();
        assert!(state.provider.provider_names().is_empty());
    }
}
