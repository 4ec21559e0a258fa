use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
};

pub const DEPLOYMENTS_ROOT: &str = ".deployments";
const DEPLOYMENTS_FILE: &str = "deployments.json";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeploymentEnv {
    Amoy,
    Polygon,
    Local,
}

impl DeploymentEnv {
    pub fn dir_name(self) -> &'static str {
        match self {
            DeploymentEnv::Amoy => "amoy",
            DeploymentEnv::Polygon => "polygon",
            DeploymentEnv::Local => "local",
        }
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentEnv::Amoy => "Polygon Amoy",
            DeploymentEnv::Polygon => "Polygon Mainnet",
            DeploymentEnv::Local => "Local",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub deployed_at: String,
    pub contract_address: String,
    pub bytecode_hash: String,
    pub network_url: String,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub house_funding_matic: Option<String>,
    #[serde(default)]
    pub vrf_coordinator: Option<String>,
    #[serde(default)]
    pub link_token: Option<String>,
    #[serde(default)]
    pub key_hash: Option<String>,
    #[serde(default)]
    pub price_feed: Option<String>,
}

impl DeploymentRecord {
    pub fn is_compatible_with_hash(&self, hash: &str) -> bool {
        self.bytecode_hash == hash
    }
}

#[derive(Debug)]
pub struct DeploymentStore {
    path: PathBuf,
}

impl DeploymentStore {
    pub fn new(env: DeploymentEnv) -> Result<Self> {
        let path = ensure_store(env)?;
        Ok(Self { path })
    }

    pub fn load(&self) -> Result<Vec<DeploymentRecord>> {
        read_records(&self.path)
    }

    pub fn append(&self, record: DeploymentRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        write_records(&self.path, &records)
    }

    /// Most recent record for this environment.
    pub fn latest(&self) -> Result<Option<DeploymentRecord>> {
        Ok(self.load()?.pop())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn record_deployment(
    env: DeploymentEnv,
    contract_address: impl AsRef<str>,
    bytecode_hash: impl AsRef<str>,
    network_url: impl AsRef<str>,
    chain_id: u64,
) -> Result<()> {
    let store = DeploymentStore::new(env)?;
    let record = DeploymentRecord {
        deployed_at: Utc::now().to_rfc3339(),
        contract_address: contract_address.as_ref().to_string(),
        bytecode_hash: bytecode_hash.as_ref().to_string(),
        network_url: network_url.as_ref().to_string(),
        chain_id: Some(chain_id),
        house_funding_matic: None,
        vrf_coordinator: None,
        link_token: None,
        key_hash: None,
        price_feed: None,
    };
    store.append(record)
}

pub fn compute_bytecode_hash(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| {
        format!(
            "Failed to read contract bytecode for hashing: {}",
            path.display()
        )
    })?;
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn ensure_structure() -> Result<()> {
    for env in [
        DeploymentEnv::Amoy,
        DeploymentEnv::Polygon,
        DeploymentEnv::Local,
    ] {
        let _ = ensure_store(env)?;
    }
    Ok(())
}

fn ensure_store(env: DeploymentEnv) -> Result<PathBuf> {
    let root = Path::new(DEPLOYMENTS_ROOT);
    if !root.exists() {
        fs::create_dir_all(root).context("Failed to create .deployments directory")?;
    }

    let env_dir = root.join(env.dir_name());
    if !env_dir.exists() {
        fs::create_dir_all(&env_dir).with_context(|| {
            format!("Failed to create .deployments/{} directory", env.dir_name())
        })?;
    }

    let file_path = env_dir.join(DEPLOYMENTS_FILE);
    if !file_path.exists() {
        let mut file = fs::File::create(&file_path).with_context(|| {
            format!(
                "Failed to create deployment record file for {} at {:?}",
                env, file_path
            )
        })?;
        file.write_all(b"[]").with_context(|| {
            format!("Failed to initialize deployment record file for {}", env)
        })?;
    }

    Ok(file_path)
}

fn read_records(path: impl AsRef<Path>) -> Result<Vec<DeploymentRecord>> {
    let data = fs::read(path.as_ref()).context("Failed to read deployment records")?;
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let records = serde_json::from_slice::<Vec<DeploymentRecord>>(&data)
        .context("Failed to parse deployment records JSON")?;
    Ok(records)
}

fn write_records(path: impl AsRef<Path>, records: &[DeploymentRecord]) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(records).context("Failed to serialize deployment records")?;
    fs::write(path.as_ref(), json).context("Failed to write deployment records")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(hash: &str) -> DeploymentRecord {
        DeploymentRecord {
            deployed_at: Utc::now().to_rfc3339(),
            contract_address: "0x0000000000000000000000000000000000000001".into(),
            bytecode_hash: hash.into(),
            network_url: "http://localhost:8545/".into(),
            chain_id: Some(1337),
            house_funding_matic: Some("2".into()),
            vrf_coordinator: None,
            link_token: None,
            key_hash: None,
            price_feed: None,
        }
    }

    #[test]
    fn records_round_trip_through_json() {
        let record = sample_record("abc123");
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: DeploymentRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.bytecode_hash, "abc123");
        assert_eq!(decoded.chain_id, Some(1337));
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let legacy = r#"{
            "deployed_at": "2024-01-01T00:00:00Z",
            "contract_address": "0x0000000000000000000000000000000000000002",
            "bytecode_hash": "ff",
            "network_url": "http://localhost:8545/"
        }"#;
        let decoded: DeploymentRecord = serde_json::from_str(legacy).unwrap();
        assert!(decoded.vrf_coordinator.is_none());
        assert!(decoded.chain_id.is_none());
    }

    #[test]
    fn hash_compatibility_is_exact() {
        let record = sample_record("deadbeef");
        assert!(record.is_compatible_with_hash("deadbeef"));
        assert!(!record.is_compatible_with_hash("deadbeee"));
    }
}
