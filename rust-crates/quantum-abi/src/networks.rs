use alloy::primitives::{Address, B256, address, b256};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LOCAL_RPC_URL: &str = "http://localhost:8545/";

/// Networks the contract is deployed on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Network {
    Polygon,
    Amoy,
    Mumbai,
    Local,
}

/// Chainlink collaborators the deploy tooling wires into the contract:
/// VRF for field randomness, a MATIC/USD feed for the stats surface.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChainlinkConfig {
    pub vrf_coordinator: Address,
    pub link_token: Address,
    pub key_hash: B256,
    pub price_feed: Address,
}

impl Network {
    pub const fn chain_id(self) -> u64 {
        match self {
            Network::Polygon => 137,
            Network::Amoy => 80002,
            Network::Mumbai => 80001,
            Network::Local => 1337,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Network::Polygon => "polygon",
            Network::Amoy => "amoy",
            Network::Mumbai => "mumbai",
            Network::Local => "local",
        }
    }

    /// Environment variable holding the deployed contract address.
    pub const fn contract_env_var(self) -> &'static str {
        match self {
            Network::Polygon => "QUANTUM_GRID_CONTRACT_POLYGON",
            Network::Amoy => "QUANTUM_GRID_CONTRACT_AMOY",
            Network::Mumbai => "QUANTUM_GRID_CONTRACT_MUMBAI",
            Network::Local => "QUANTUM_GRID_CONTRACT_LOCAL",
        }
    }

    /// RPC endpoint, built from the Alchemy key where one applies.
    pub fn default_rpc_url(self, alchemy_api_key: Option<&str>) -> String {
        let key = alchemy_api_key.unwrap_or("demo");
        match self {
            Network::Polygon => {
                format!("https://polygon-mainnet.g.alchemy.com/v2/{key}")
            }
            Network::Amoy => format!("https://polygon-amoy.g.alchemy.com/v2/{key}"),
            Network::Mumbai => format!("https://polygon-mumbai.g.alchemy.com/v2/{key}"),
            Network::Local => DEFAULT_LOCAL_RPC_URL.to_string(),
        }
    }

    /// Contract address from the environment, when configured.
    pub fn contract_address(self) -> Option<Address> {
        let raw = std::env::var(self.contract_env_var()).ok()?;
        raw.parse().ok()
    }

    pub const fn chainlink(self) -> Option<ChainlinkConfig> {
        match self {
            Network::Amoy => Some(ChainlinkConfig {
                vrf_coordinator: address!("0x343300b5d84d444b2adc9116fef1bed02be49cf2"),
                link_token: address!("0x0fd9e8d3af1aaee056eb9e802c3a762a667b1904"),
                key_hash: b256!(
                    "0x816bedba8a50b294e5cbd47842baf240c2385f2eaf719edbd4f250a137a8c899"
                ),
                price_feed: address!("0x12162c0038089dd77ad5a6f25a148d6bd4e2d57f"),
            }),
            Network::Mumbai => Some(ChainlinkConfig {
                vrf_coordinator: address!("0x7a1bac17ccc5b313516c5e16fb241f5d4c5c4c4c"),
                link_token: address!("0x326c977e6efc84e512bb9c30f76e30c160ed06fb"),
                key_hash: b256!(
                    "0x4b09e658ed251bcafeebbc69400383d49f344ace09b9576fe248bb02c003fe9f"
                ),
                price_feed: address!("0xd0d5e3db44de05e9f294bb0a3ceeeb2a3c2c4c4c"),
            }),
            Network::Polygon => Some(ChainlinkConfig {
                vrf_coordinator: address!("0xae975071be8f8ee67addbc1a82488f1c24858067"),
                link_token: address!("0x53e0bca35ec356bd5dddfebbd1fc0fd03fabad39"),
                key_hash: b256!(
                    "0xcc294a196eeeb44da2888d17c0625cc88d70d9760a69d58d853ba6581a9ab0cd"
                ),
                price_feed: address!("0xab594600376ec9fd91f8e885dadf0ce036862de0"),
            }),
            Network::Local => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "polygon" | "mainnet" => Ok(Network::Polygon),
            "amoy" => Ok(Network::Amoy),
            "mumbai" => Ok(Network::Mumbai),
            "local" | "localhost" => Ok(Network::Local),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_match_the_deployment_targets() {
        assert_eq!(Network::Polygon.chain_id(), 137);
        assert_eq!(Network::Amoy.chain_id(), 80002);
        assert_eq!(Network::Mumbai.chain_id(), 80001);
        assert_eq!(Network::Local.chain_id(), 1337);
    }

    #[test]
    fn only_the_local_network_lacks_chainlink() {
        assert!(Network::Local.chainlink().is_none());
        for network in [Network::Polygon, Network::Amoy, Network::Mumbai] {
            assert!(network.chainlink().is_some());
        }
    }

    #[test]
    fn network_parsing_accepts_aliases() {
        assert_eq!("amoy".parse::<Network>(), Ok(Network::Amoy));
        assert_eq!("localhost".parse::<Network>(), Ok(Network::Local));
        assert_eq!("MAINNET".parse::<Network>(), Ok(Network::Polygon));
        assert!("sepolia".parse::<Network>().is_err());
    }
}
