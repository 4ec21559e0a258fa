use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, U256, utils::{format_ether, parse_ether}},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result, anyhow};
use clap::{ArgGroup, Parser};
use quantum_abi::{Network, QuantumGrid, QuantumGridClient};

#[derive(Parser, Debug)]
#[command(
    name = "testnet-bank",
    about = "Distribute testnet rewards to QuantumGrid players from the leaderboards",
    version,
    group(
        ArgGroup::new("network")
            .args(["amoy", "polygon", "local"])
            .required(true)
    )
)]
struct Args {
    /// QuantumGrid contract address
    contract: String,

    /// Action to perform
    #[arg(value_enum, default_value = "stats")]
    action: Action,

    /// Player address (achievements action only)
    player: Option<String>,

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
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Action {
    Stats,
    Daily,
    Weekly,
    Achievements,
}

/// Reward schedule, all amounts in MATIC.
struct RewardSchedule {
    daily_top_player: U256,
    daily_top10: U256,
    daily_top50: U256,
    weekly_first: U256,
    weekly_second: U256,
    weekly_third: U256,
    weekly_top10: U256,
    weekly_top50: U256,
    quantum_master: U256,
    win_streak_10: U256,
    win_streak_25: U256,
    win_streak_50: U256,
}

impl RewardSchedule {
    fn standard() -> Result<Self> {
        Ok(Self {
            daily_top_player: parse_ether("1.0")?,
            daily_top10: parse_ether("0.5")?,
            daily_top50: parse_ether("0.1")?,
            weekly_first: parse_ether("5.0")?,
            weekly_second: parse_ether("3.0")?,
            weekly_third: parse_ether("2.0")?,
            weekly_top10: parse_ether("1.0")?,
            weekly_top50: parse_ether("0.5")?,
            quantum_master: parse_ether("2.0")?,
            win_streak_10: parse_ether("1.0")?,
            win_streak_25: parse_ether("2.5")?,
            win_streak_50: parse_ether("5.0")?,
        })
    }
}

struct Reward {
    player: Address,
    amount: U256,
    reason: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let network = if args.polygon {
        Network::Polygon
    } else if args.amoy {
        Network::Amoy
    } else {
        Network::Local
    };

    let contract_address: Address = args
        .contract
        .parse()
        .map_err(|e| anyhow!("parsing contract address: {e}"))?;

    let signer = bank_signer()?;
    let bank_address = signer.address();
    let alchemy_api_key = std::env::var("ALCHEMY_API_KEY").ok();
    let rpc_url = args
        .rpc_url
        .clone()
        .unwrap_or_else(|| network.default_rpc_url(alchemy_api_key.as_deref()));
    let provider = connect(&rpc_url, signer)?;

    println!("Testnet Bank for QuantumGrid");
    println!("Contract: {contract_address}");
    println!("Bank signer: {bank_address}");

    let client = QuantumGridClient::new(contract_address, provider.clone());
    let schedule = RewardSchedule::standard()?;

    match args.action {
        Action::Stats => bank_stats(&provider, &client, bank_address).await,
        Action::Daily => distribute_daily(&provider, &client, &schedule).await,
        Action::Weekly => distribute_weekly(&provider, &client, &schedule).await,
        Action::Achievements => {
            let raw = args
                .player
                .as_deref()
                .ok_or_else(|| anyhow!("achievements action requires a player address"))?;
            let player: Address = raw
                .parse()
                .map_err(|e| anyhow!("parsing player address: {e}"))?;
            check_achievements(&provider, &client, &schedule, player).await
        }
    }
}

fn bank_signer() -> Result<PrivateKeySigner> {
    let raw = std::env::var("PRIVATE_KEY")
        .context("PRIVATE_KEY environment variable is required for the bank signer")?;
    raw.parse::<PrivateKeySigner>()
        .map_err(|e| anyhow!("PRIVATE_KEY did not parse as a secp256k1 key: {e}"))
}

fn connect(rpc_url: &str, signer: PrivateKeySigner) -> Result<DynProvider> {
    let url = rpc_url.parse::<url::Url>().context("parsing RPC URL")?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url);
    Ok(provider.erased())
}

async fn bank_stats(
    provider: &DynProvider,
    client: &QuantumGridClient,
    bank_address: Address,
) -> Result<()> {
    let bank_balance = provider
        .get_balance(bank_address)
        .await
        .context("fetching bank balance")?;
    let stats = client.stats().await.context("fetching contract stats")?;

    println!("Testnet Bank statistics:");
    println!("  Bank balance:           {} MATIC", format_ether(bank_balance));
    println!(
        "  Contract house balance: {} MATIC",
        format_ether(stats.house_balance)
    );
    println!("  Total games played:     {}", stats.total_games_played);
    println!(
        "  Total winnings paid:    {} MATIC",
        format_ether(stats.total_winnings_paid)
    );
    Ok(())
}

async fn distribute_daily(
    provider: &DynProvider,
    client: &QuantumGridClient,
    schedule: &RewardSchedule,
) -> Result<()> {
    println!("Distributing daily rewards...");
    let leaderboard = client
        .daily_leaderboard()
        .await
        .context("fetching daily leaderboard")?;
    println!("Daily leaderboard has {} entries", leaderboard.len());
    if leaderboard.is_empty() {
        println!("No players in the daily leaderboard");
        return Ok(());
    }

    let mut rewards = Vec::new();
    push_tiered(
        &mut rewards,
        &leaderboard,
        0..1,
        schedule.daily_top_player,
        "Daily Top Player",
    );
    push_tiered(
        &mut rewards,
        &leaderboard,
        1..10,
        schedule.daily_top10,
        "Daily Top 10",
    );
    push_tiered(
        &mut rewards,
        &leaderboard,
        10..50,
        schedule.daily_top50,
        "Daily Top 50",
    );

    distribute(provider, rewards).await
}

async fn distribute_weekly(
    provider: &DynProvider,
    client: &QuantumGridClient,
    schedule: &RewardSchedule,
) -> Result<()> {
    println!("Distributing weekly tournament rewards...");
    let leaderboard = client
        .weekly_leaderboard()
        .await
        .context("fetching weekly leaderboard")?;
    println!("Weekly leaderboard has {} entries", leaderboard.len());
    if leaderboard.is_empty() {
        println!("No players in the weekly leaderboard");
        return Ok(());
    }

    let mut rewards = Vec::new();
    push_tiered(
        &mut rewards,
        &leaderboard,
        0..1,
        schedule.weekly_first,
        "Weekly Tournament 1st Place",
    );
    push_tiered(
        &mut rewards,
        &leaderboard,
        1..2,
        schedule.weekly_second,
        "Weekly Tournament 2nd Place",
    );
    push_tiered(
        &mut rewards,
        &leaderboard,
        2..3,
        schedule.weekly_third,
        "Weekly Tournament 3rd Place",
    );
    push_tiered(
        &mut rewards,
        &leaderboard,
        3..10,
        schedule.weekly_top10,
        "Weekly Tournament Top 10",
    );
    push_tiered(
        &mut rewards,
        &leaderboard,
        10..50,
        schedule.weekly_top50,
        "Weekly Tournament Top 50",
    );

    distribute(provider, rewards).await
}

fn push_tiered(
    rewards: &mut Vec<Reward>,
    leaderboard: &[QuantumGrid::LeaderboardEntry],
    positions: std::ops::Range<usize>,
    amount: U256,
    reason: &str,
) {
    for (position, entry) in leaderboard
        .iter()
        .enumerate()
        .skip(positions.start)
        .take(positions.len())
    {
        println!(
            "  #{}: {} — {} MATIC ({reason})",
            position + 1,
            entry.player,
            format_ether(amount)
        );
        rewards.push(Reward {
            player: entry.player,
            amount,
            reason: reason.to_string(),
        });
    }
}

async fn check_achievements(
    provider: &DynProvider,
    client: &QuantumGridClient,
    schedule: &RewardSchedule,
    player: Address,
) -> Result<()> {
    println!("Checking achievements for {player}...");
    let stats = client
        .player_stats(player)
        .await
        .context("fetching player stats")?;

    let mut rewards = Vec::new();
    if stats.bestScore > U256::from(5000u64) {
        println!(
            "  Quantum Master: {} MATIC",
            format_ether(schedule.quantum_master)
        );
        rewards.push(Reward {
            player,
            amount: schedule.quantum_master,
            reason: "Quantum Master Achievement".to_string(),
        });
    }

    // Only the highest streak tier pays.
    let streak = stats.winStreak;
    let streak_reward = if streak >= U256::from(50u64) {
        Some((schedule.win_streak_50, "50 Win Streak Achievement"))
    } else if streak >= U256::from(25u64) {
        Some((schedule.win_streak_25, "25 Win Streak Achievement"))
    } else if streak >= U256::from(10u64) {
        Some((schedule.win_streak_10, "10 Win Streak Achievement"))
    } else {
        None
    };
    if let Some((amount, reason)) = streak_reward {
        println!("  {reason}: {} MATIC", format_ether(amount));
        rewards.push(Reward {
            player,
            amount,
            reason: reason.to_string(),
        });
    }

    if rewards.is_empty() {
        println!("No achievements unlocked");
        return Ok(());
    }
    distribute(provider, rewards).await
}

async fn distribute(provider: &DynProvider, rewards: Vec<Reward>) -> Result<()> {
    if rewards.is_empty() {
        println!("No rewards to distribute");
        return Ok(());
    }

    println!("Distributing {} rewards...", rewards.len());
    let mut total = U256::ZERO;
    for reward in &rewards {
        let tx = TransactionRequest::default()
            .with_to(reward.player)
            .with_value(reward.amount);
        let sent = provider.send_transaction(tx).await;
        let receipt = match sent {
            Ok(pending) => pending.get_receipt().await,
            Err(err) => {
                tracing::warn!(player = %reward.player, %err, "reward transfer failed");
                println!("  FAILED {} ({}): {err}", reward.player, reward.reason);
                continue;
            }
        };
        match receipt {
            Ok(_) => {
                total += reward.amount;
                println!(
                    "  Sent {} MATIC to {} ({})",
                    format_ether(reward.amount),
                    reward.player,
                    reward.reason
                );
            }
            Err(err) => {
                tracing::warn!(player = %reward.player, %err, "reward confirmation failed");
                println!("  FAILED {} ({}): {err}", reward.player, reward.reason);
            }
        }
    }
    println!("Total distributed: {} MATIC", format_ether(total));
    Ok(())
}
