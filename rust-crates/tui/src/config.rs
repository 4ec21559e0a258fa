use quantum_abi::Network;

use crate::wallets;

/// Environment-driven configuration, mirroring the original deployment's
/// `.env` surface.
#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub alchemy_api_key: Option<String>,
    pub default_network: Network,
    pub house_balance: f64,
    pub house_fee: f64,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        let alchemy_api_key = std::env::var("ALCHEMY_API_KEY")
            .ok()
            .filter(|key| !key.is_empty() && key != "YOUR_ALCHEMY_API_KEY");
        let default_network = std::env::var("DEFAULT_NETWORK")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(Network::Amoy);
        let house_balance = std::env::var("HOUSE_BALANCE")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(economy::DEFAULT_HOUSE_FUNDING);
        let house_fee = std::env::var("HOUSE_FEE")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(economy::DEFAULT_HOUSE_FEE);

        Self {
            alchemy_api_key,
            default_network,
            house_balance,
            house_fee,
        }
    }

    /// Reports configuration problems without aborting; the game itself
    /// runs fine offline.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.alchemy_api_key.is_none() {
            problems.push(
                "ALCHEMY_API_KEY is not set; public RPC endpoints will be used".to_string(),
            );
        }

        if self.default_network.contract_address().is_none() {
            problems.push(format!(
                "{} is not set; contract calls are disabled",
                self.default_network.contract_env_var()
            ));
        }

        if let Ok(raw) = std::env::var("PRIVATE_KEY") {
            if !wallets::is_valid_private_key(&raw) {
                problems.push(
                    "PRIVATE_KEY must be 64 hex characters (optionally 0x-prefixed)"
                        .to_string(),
                );
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        // Only exercises the fallback path; the environment of the test
        // runner is left untouched.
        let config = EnvConfig {
            alchemy_api_key: None,
            default_network: Network::Amoy,
            house_balance: economy::DEFAULT_HOUSE_FUNDING,
            house_fee: economy::DEFAULT_HOUSE_FEE,
        };
        assert_eq!(config.house_balance, 100.0);
        assert_eq!(config.house_fee, 0.05);
        assert!(!config.validate().is_empty());
    }
}
