//! Deployment configuration.

use serde::{Deserialize, Serialize};

use degen_core::{LedgerError, LedgerResult};

/// Display metadata fixed at construction.
///
/// `decimals` is deliberately absent: it is the constant `degen_core::DECIMALS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "DegenToken".to_string(),
            symbol: "DGN".to_string(),
        }
    }
}

impl TokenConfig {
    pub const NAME_ENV: &'static str = "DEGEN_TOKEN_NAME";
    pub const SYMBOL_ENV: &'static str = "DEGEN_TOKEN_SYMBOL";

    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    /// Read `DEGEN_TOKEN_NAME` / `DEGEN_TOKEN_SYMBOL`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let name = lookup(Self::NAME_ENV).unwrap_or_else(|| {
            tracing::warn!("{} not set; using default {:?}", Self::NAME_ENV, defaults.name);
            defaults.name.clone()
        });
        let symbol = lookup(Self::SYMBOL_ENV).unwrap_or_else(|| {
            tracing::warn!("{} not set; using default {:?}", Self::SYMBOL_ENV, defaults.symbol);
            defaults.symbol.clone()
        });

        Self { name, symbol }
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::invalid_argument("token name cannot be empty"));
        }
        if self.symbol.trim().is_empty() {
            return Err(LedgerError::invalid_argument("token symbol cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_deployment() {
        let config = TokenConfig::default();
        assert_eq!(config.name, "DegenToken");
        assert_eq!(config.symbol, "DGN");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lookup_overrides_individual_fields() {
        let config = TokenConfig::from_lookup(|key| {
            (key == TokenConfig::SYMBOL_ENV).then(|| "RWD".to_string())
        });
        assert_eq!(config, TokenConfig::new("DegenToken", "RWD"));
    }

    #[test]
    fn blank_fields_fail_validation() {
        assert!(matches!(
            TokenConfig::new(" ", "DGN").validate(),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            TokenConfig::new("DegenToken", "").validate(),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let config: TokenConfig = serde_json::from_str(r#"{"name":"Arcade"}"#).unwrap();
        assert_eq!(config, TokenConfig::new("Arcade", "DGN"));
    }
}
