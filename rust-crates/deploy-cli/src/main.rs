mod wallets;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{
        Address,
        utils::{format_ether, format_units, parse_ether},
    },
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::{ArgGroup, Parser};
use deployments::{DeploymentEnv, DeploymentRecord, DeploymentStore};
use quantum_abi::{LinkToken, Network, QuantumGridClient};
use std::path::Path;

use crate::wallets::{find_wallet, resolve_wallet_dir, signer_from_env, unlock_wallet};

const DEFAULT_HOUSE_FUNDING_MATIC: &str = "2";
const DEFAULT_LINK_AMOUNT: &str = "1";
const QUANTUM_GRID_BIN_CANDIDATES: [&str; 2] = [
    "./contracts/out/QuantumGrid.bin",
    "./contracts/artifacts/QuantumGrid.bin",
];

#[derive(Parser, Debug)]
#[command(
    name = "quantum-deploy",
    about = "Deploy QuantumGrid or perform operator utilities (fund-link, fund-house, stats)",
    version,
    group(
        ArgGroup::new("network")
            .args(["amoy", "polygon", "local"])
            .required(true)
    )
)]
struct Args {
    /// Target the Polygon Amoy testnet
    #[arg(long)]
    amoy: bool,

    /// Target Polygon mainnet
    #[arg(long)]
    polygon: bool,

    /// Target a local node
    #[arg(long)]
    local: bool,

    /// Override RPC URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Keystore wallet name (falls back to the PRIVATE_KEY environment variable)
    #[arg(long)]
    wallet: Option<String>,

    /// Override keystore directory (defaults to ~/.quantum-grid/wallets)
    #[arg(long)]
    wallet_dir: Option<String>,

    /// Which action to perform (defaults to deploy)
    #[arg(short, long, value_enum, default_value = "deploy")]
    action: Action,

    /// Contract address override (defaults to the stored deployment record)
    #[arg(long)]
    contract: Option<String>,

    /// House funding in MATIC applied right after deployment (deploy / fund-house)
    #[arg(long)]
    house_funding: Option<String>,

    /// LINK amount transferred by fund-link
    #[arg(long)]
    link_amount: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Action {
    Deploy,
    FundLink,
    FundHouse,
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    deployments::ensure_structure().context("initializing deployment directories")?;

    let (env, network) = if args.polygon {
        (DeploymentEnv::Polygon, Network::Polygon)
    } else if args.amoy {
        (DeploymentEnv::Amoy, Network::Amoy)
    } else {
        (DeploymentEnv::Local, Network::Local)
    };

    let alchemy_api_key = std::env::var("ALCHEMY_API_KEY").ok();
    let rpc_url = args
        .rpc_url
        .clone()
        .unwrap_or_else(|| network.default_rpc_url(alchemy_api_key.as_deref()));

    let signer = resolve_signer(&args).context("resolving deployment signer")?;
    let operator = signer.address();
    let provider = connect(&rpc_url, signer).context("connecting to provider")?;

    let chain_id = provider
        .get_chain_id()
        .await
        .context("fetching chain id")?;
    println!(
        "Network: {} (chain id {chain_id}), operator {operator}",
        network
    );
    if chain_id != network.chain_id() {
        println!(
            "Warning: RPC reports chain id {chain_id}, expected {} for {}",
            network.chain_id(),
            network
        );
    }

    let store = DeploymentStore::new(env).context("opening deployment store")?;

    match args.action {
        Action::Deploy => deploy(&args, env, network, &rpc_url, &provider, &store).await,
        Action::FundLink => fund_link(&args, network, &provider, &store, operator).await,
        Action::FundHouse => fund_house(&args, &provider, &store).await,
        Action::Stats => print_stats(&args, &provider, &store).await,
    }
}

fn resolve_signer(args: &Args) -> Result<PrivateKeySigner> {
    if let Some(name) = args.wallet.as_deref() {
        let dir = resolve_wallet_dir(args.wallet_dir.as_deref())?;
        let descriptor = find_wallet(&dir, name)?;
        return unlock_wallet(&descriptor);
    }
    signer_from_env()?.ok_or_else(|| {
        anyhow!("no signer available: pass --wallet <name> or set PRIVATE_KEY")
    })
}

fn connect(rpc_url: &str, signer: PrivateKeySigner) -> Result<DynProvider> {
    let url = rpc_url.parse::<url::Url>().context("parsing RPC URL")?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url);
    Ok(provider.erased())
}

async fn deploy(
    args: &Args,
    env: DeploymentEnv,
    network: Network,
    rpc_url: &str,
    provider: &DynProvider,
    store: &DeploymentStore,
) -> Result<()> {
    let bin_path =
        choose_binary(&QUANTUM_GRID_BIN_CANDIDATES).context("locating contract bytecode")?;
    let bytecode_hash =
        deployments::compute_bytecode_hash(bin_path).context("hashing contract bytecode")?;
    let bytecode = read_bytecode(bin_path).context("reading contract bytecode")?;

    if let Some(previous) = store.latest()? {
        if previous.is_compatible_with_hash(&bytecode_hash) {
            println!(
                "Note: identical bytecode already deployed at {} on {}",
                previous.contract_address, env
            );
        }
    }

    println!("Deploying QuantumGrid to {env}...");
    let deploy_tx = TransactionRequest::default().with_deploy_code(bytecode);
    let receipt = provider
        .send_transaction(deploy_tx)
        .await
        .context("submitting deployment transaction")?
        .get_receipt()
        .await
        .context("waiting for deployment receipt")?;
    let contract_address = receipt
        .contract_address
        .ok_or_else(|| anyhow!("deployment receipt carries no contract address"))?;
    println!("QuantumGrid deployed to: {contract_address}");

    let client = QuantumGridClient::new(contract_address, provider.clone());
    let funding = args
        .house_funding
        .as_deref()
        .unwrap_or(DEFAULT_HOUSE_FUNDING_MATIC);
    let funding_wei = parse_ether(funding).context("parsing house funding amount")?;
    println!("Funding house with {funding} MATIC...");
    client
        .fund_house(funding_wei)
        .await
        .context("funding the house")?;

    report_stats(&client).await?;

    let chainlink = network.chainlink();
    let record = DeploymentRecord {
        deployed_at: Utc::now().to_rfc3339(),
        contract_address: contract_address.to_string(),
        bytecode_hash,
        network_url: rpc_url.to_string(),
        chain_id: Some(network.chain_id()),
        house_funding_matic: Some(funding.to_string()),
        vrf_coordinator: chainlink.map(|c| c.vrf_coordinator.to_string()),
        link_token: chainlink.map(|c| c.link_token.to_string()),
        key_hash: chainlink.map(|c| c.key_hash.to_string()),
        price_feed: chainlink.map(|c| c.price_feed.to_string()),
    };
    store.append(record).context("recording deployment")?;
    println!("Deployment metadata written to {}", store.path().display());

    println!("\nNext steps:");
    println!(
        "1. Export the contract address: {}={contract_address}",
        network.contract_env_var()
    );
    if chainlink.is_some() {
        println!("2. Fund the contract with LINK for VRF: quantum-deploy --{} --action fund-link", network.label());
    }
    Ok(())
}

async fn fund_link(
    args: &Args,
    network: Network,
    provider: &DynProvider,
    store: &DeploymentStore,
    operator: Address,
) -> Result<()> {
    let contract_address = resolve_contract_address(args, store)?;
    let chainlink = network
        .chainlink()
        .ok_or_else(|| anyhow!("no LINK token configured for {network}"))?;
    println!("LINK token: {}", chainlink.link_token);

    let link = LinkToken::new(chainlink.link_token, provider.clone());
    let balance = link
        .balanceOf(operator)
        .call()
        .await
        .context("fetching LINK balance")?;
    println!("Operator LINK balance: {}", format_ether(balance));

    if balance.is_zero() {
        println!("No LINK tokens available. Faucets:");
        println!("  - https://faucet.polygon.technology/");
        println!("  - https://faucets.chain.link/");
        bail!("operator holds no LINK");
    }

    let amount = args.link_amount.as_deref().unwrap_or(DEFAULT_LINK_AMOUNT);
    let amount_wei = parse_ether(amount).context("parsing LINK amount")?;
    if balance < amount_wei {
        bail!(
            "insufficient LINK: required {}, available {}",
            format_ether(amount_wei),
            format_ether(balance)
        );
    }

    println!("Transferring {amount} LINK to {contract_address}...");
    link.transfer(contract_address, amount_wei)
        .send()
        .await
        .context("submitting LINK transfer")?
        .watch()
        .await
        .context("waiting for LINK transfer")?;

    let contract_balance = link
        .balanceOf(contract_address)
        .call()
        .await
        .context("verifying contract LINK balance")?;
    println!(
        "Contract LINK balance: {} — ready for VRF requests",
        format_ether(contract_balance)
    );
    Ok(())
}

async fn fund_house(
    args: &Args,
    provider: &DynProvider,
    store: &DeploymentStore,
) -> Result<()> {
    let contract_address = resolve_contract_address(args, store)?;
    let client = QuantumGridClient::new(contract_address, provider.clone());
    let funding = args
        .house_funding
        .as_deref()
        .unwrap_or(DEFAULT_HOUSE_FUNDING_MATIC);
    let funding_wei = parse_ether(funding).context("parsing house funding amount")?;
    client
        .fund_house(funding_wei)
        .await
        .context("funding the house")?;
    println!("House funded with {funding} MATIC on {contract_address}");
    report_stats(&client).await
}

async fn print_stats(
    args: &Args,
    provider: &DynProvider,
    store: &DeploymentStore,
) -> Result<()> {
    let contract_address = resolve_contract_address(args, store)?;
    let client = QuantumGridClient::new(contract_address, provider.clone());
    println!("QuantumGrid at {contract_address}");
    report_stats(&client).await
}

async fn report_stats(client: &QuantumGridClient) -> Result<()> {
    let stats = client.stats().await.context("fetching contract stats")?;
    println!("Contract stats:");
    println!(
        "  House balance:       {} MATIC",
        format_ether(stats.house_balance)
    );
    println!("  Total games played:  {}", stats.total_games_played);
    println!(
        "  Total winnings paid: {} MATIC",
        format_ether(stats.total_winnings_paid)
    );
    println!("  House fee:           {} bps", stats.house_fee_bps);
    println!("  Min bet:             {} MATIC", format_ether(stats.min_bet));
    println!("  Max bet:             {} MATIC", format_ether(stats.max_bet));
    println!(
        "  MATIC price:         {} USD",
        format_units(stats.matic_price, 8).unwrap_or_else(|_| "n/a".into())
    );
    Ok(())
}

fn resolve_contract_address(args: &Args, store: &DeploymentStore) -> Result<Address> {
    if let Some(raw) = args.contract.as_deref() {
        return raw
            .parse()
            .map_err(|e| anyhow!("parsing contract address: {e}"));
    }
    let record = store
        .latest()?
        .ok_or_else(|| anyhow!("no deployments recorded for this environment"))?;
    record
        .contract_address
        .parse()
        .map_err(|e| anyhow!("parsing stored contract address: {e}"))
}

fn choose_binary<'a>(paths: &'a [&str]) -> Result<&'a str> {
    paths
        .iter()
        .find(|p| Path::new(p).exists())
        .copied()
        .ok_or_else(|| anyhow!("Contract bytecode not found. Tried {:?}", paths))
}

/// Build artifacts store bytecode as hex text, optionally 0x-prefixed.
fn read_bytecode(path: &str) -> Result<Vec<u8>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading bytecode file {path}"))?;
    let trimmed = raw.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(hex_part).context("decoding bytecode hex")
}
