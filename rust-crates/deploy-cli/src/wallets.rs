use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result, anyhow};
use eth_keystore::decrypt_key;
use rpassword::prompt_password;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug)]
pub struct WalletDescriptor {
    pub name: String,
    pub path: PathBuf,
}

impl WalletDescriptor {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }
}

pub fn default_wallet_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".quantum-grid").join("wallets"))
}

pub fn resolve_wallet_dir(dir: Option<&str>) -> Result<PathBuf> {
    match dir {
        Some(raw) => {
            let expanded = shellexpand::tilde(raw);
            Ok(PathBuf::from(expanded.into_owned()))
        }
        None => default_wallet_dir(),
    }
}

pub fn list_wallets(dir: &Path) -> Result<Vec<WalletDescriptor>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut wallets = Vec::new();
    for entry in fs::read_dir(dir).context("Failed to read wallet directory")? {
        let entry = entry.context("Failed to read wallet entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("json") | Some("wallet")
        ) {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| anyhow!("Invalid wallet filename {:?}", path))?
            .to_owned();
        wallets.push(WalletDescriptor::new(name, path));
    }
    wallets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(wallets)
}

pub fn find_wallet(dir: &Path, name: &str) -> Result<WalletDescriptor> {
    let wallets = list_wallets(dir)?;
    wallets
        .into_iter()
        .find(|w| w.name == name)
        .ok_or_else(|| anyhow!("Wallet '{name}' not found in {}", dir.to_string_lossy()))
}

pub fn unlock_wallet(descriptor: &WalletDescriptor) -> Result<PrivateKeySigner> {
    let prompt = format!("Enter password for wallet '{}': ", descriptor.name);
    let password = prompt_password(prompt).context("Failed to read wallet password")?;

    let secret = decrypt_key(&descriptor.path, password.as_bytes())
        .map_err(|_| anyhow!("Invalid password for wallet '{}'", descriptor.name))?;

    PrivateKeySigner::from_slice(&secret)
        .map_err(|_| anyhow!("Wallet '{}' contained unsupported key material", descriptor.name))
}

/// Raw private keys come from the environment in the MetaMask export
/// format: 64 hex chars, with or without the 0x prefix.
pub fn is_valid_private_key(raw: &str) -> bool {
    let hex_part = raw.strip_prefix("0x").unwrap_or(raw);
    hex_part.len() == 64 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn signer_from_env() -> Result<Option<PrivateKeySigner>> {
    let Ok(raw) = std::env::var("PRIVATE_KEY") else {
        return Ok(None);
    };
    if !is_valid_private_key(&raw) {
        return Err(anyhow!(
            "PRIVATE_KEY must be 64 hex characters (optionally 0x-prefixed)"
        ));
    }
    let signer = raw
        .parse::<PrivateKeySigner>()
        .map_err(|e| anyhow!("PRIVATE_KEY did not parse as a secp256k1 key: {e}"))?;
    Ok(Some(signer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_format_check_matches_both_prefixes() {
        let bare = "a".repeat(64);
        let prefixed = format!("0x{bare}");
        assert!(is_valid_private_key(&bare));
        assert!(is_valid_private_key(&prefixed));
        assert!(!is_valid_private_key(&bare[..63]));
        assert!(!is_valid_private_key(&format!("0x{}", "g".repeat(64))));
    }
}
