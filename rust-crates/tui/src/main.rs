use color_eyre::eyre::{Result, eyre};
use engine::GameVariant;
use quantum_abi::Network;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

mod client;
mod config;
mod ui;
mod wallets;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: quantum-grid [--classic] [--amoy | --polygon | --local] [--rpc-url <url>]\n\
         [--wallet <name>] [--wallet-dir <path>] [--bet <matic>] [--offline]\n\
         \n\
         Flags:\n\
           --classic           Play the classic variant (plain probabilities and scoring)\n\
           --amoy              Use the Polygon Amoy testnet\n\
           --polygon           Use Polygon mainnet\n\
           --local             Use a local node (default RPC {})\n\
           --rpc-url <url>     Override the RPC URL for the selected network\n\
           --wallet <name>     Keystore wallet to sign bets with\n\
           --wallet-dir <path> Override keystore directory (defaults to ~/.quantum-grid/wallets)\n\
           --bet <matic>       Starting bet amount (default 1)\n\
           --offline           Play without any wallet or contract access",
        quantum_abi::DEFAULT_LOCAL_RPC_URL,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<client::AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut variant = GameVariant::Enhanced;
    let mut network: Option<Network> = None;
    let mut custom_url: Option<String> = None;
    let mut wallet_dir: Option<String> = None;
    let mut wallet_name: Option<String> = None;
    let mut bet: Option<f64> = None;
    let mut offline = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--classic" => variant = GameVariant::Classic,
            "--amoy" => {
                if network.is_some() {
                    return Err(eyre!(
                        "Multiple network flags provided; choose one of --amoy/--polygon/--local"
                    ));
                }
                network = Some(Network::Amoy);
            }
            "--polygon" => {
                if network.is_some() {
                    return Err(eyre!(
                        "Multiple network flags provided; choose one of --amoy/--polygon/--local"
                    ));
                }
                network = Some(Network::Polygon);
            }
            "--local" => {
                if network.is_some() {
                    return Err(eyre!(
                        "Multiple network flags provided; choose one of --amoy/--polygon/--local"
                    ));
                }
                network = Some(Network::Local);
            }
            "--rpc-url" => {
                let url = args
                    .next()
                    .ok_or_else(|| eyre!("--rpc-url requires a URL argument"))?;
                if custom_url.is_some() {
                    return Err(eyre!("--rpc-url may only be specified once"));
                }
                custom_url = Some(url);
            }
            "--wallet-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--wallet-dir requires a path argument"))?;
                if wallet_dir.is_some() {
                    return Err(eyre!("--wallet-dir may only be specified once"));
                }
                wallet_dir = Some(dir);
            }
            "--wallet" => {
                let name = args
                    .next()
                    .ok_or_else(|| eyre!("--wallet requires a wallet name"))?;
                if wallet_name.is_some() {
                    return Err(eyre!("--wallet may only be specified once"));
                }
                wallet_name = Some(name);
            }
            "--bet" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--bet requires an amount in MATIC"))?;
                let amount: f64 = raw
                    .parse()
                    .map_err(|_| eyre!("--bet amount did not parse: {raw}"))?;
                if amount < 0.0 {
                    return Err(eyre!("--bet amount must not be negative"));
                }
                bet = Some(amount);
            }
            "--offline" => offline = true,
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let env = config::EnvConfig::from_env();
    let network = network.unwrap_or(env.default_network);
    let rpc_url = custom_url
        .unwrap_or_else(|| network.default_rpc_url(env.alchemy_api_key.as_deref()));

    let wallet = if offline {
        None
    } else if let Some(name) = wallet_name {
        let dir = wallets::resolve_wallet_dir(wallet_dir.as_deref())?;
        Some(client::WalletSource::Keystore { name, dir })
    } else if std::env::var("PRIVATE_KEY").is_ok() {
        Some(client::WalletSource::Env)
    } else {
        None
    };

    Ok(client::AppConfig {
        variant,
        network,
        rpc_url,
        wallet,
        bet: bet.unwrap_or(1.0),
        offline,
        env,
    })
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = std::env::var("HOME")
        .map(|home| format!("{home}/.quantum-grid/logs"))
        .unwrap_or_else(|_| ".quantum-grid-logs".to_string());
    let file_appender = rolling::daily(log_dir, "quantum-grid.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // The terminal owns stdout, so logs go to a rolling file instead.
    let _guard = init_tracing();
    tracing::info!("starting quantum-grid client");
    let app_config = parse_cli_args()?;
    client::run_app(app_config).await
}
