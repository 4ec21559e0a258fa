use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::{Signer, local::PrivateKeySigner},
};
use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use economy::HouseLedger;
use engine::{
    Difficulty, GameSession, GameVariant, Hint, PlayerStats, Pos, PowerUpEffect,
    PowerUpKind, RevealOutcome, SessionState, adjust_difficulty, apply_power_up,
    generate_hint, spawn_power_up,
};
use quantum_abi::{FieldPos, Network, QuantumGridClient, game_commitment_hash};
use rand::Rng;
use std::path::PathBuf;

use crate::config::EnvConfig;
use crate::{ui, wallets};

const HINT_LOG_DEPTH: usize = 4;
const HISTORY_DEPTH: usize = 10;

#[derive(Clone, Debug)]
pub enum WalletSource {
    Keystore { name: String, dir: PathBuf },
    Env,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub variant: GameVariant,
    pub network: Network,
    pub rpc_url: String,
    pub wallet: Option<WalletSource>,
    pub bet: f64,
    pub offline: bool,
    pub env: EnvConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    Won,
    Lost,
    CashedOut,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost,
    CashedOut,
}

impl GameResult {
    pub fn label(self) -> &'static str {
        match self {
            GameResult::Won => "won",
            GameResult::Lost => "lost",
            GameResult::CashedOut => "cashed out",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameRecord {
    pub result: GameResult,
    pub score: u32,
    pub bet: f64,
    pub winnings: f64,
    pub timestamp_ms: i64,
}

/// How one cell should be drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CellView {
    Hidden { probability_pct: Option<u8> },
    Flagged,
    Safe { probability_pct: u8 },
    Field,
}

#[derive(Clone, Debug)]
pub struct LeaderboardRow {
    pub player: String,
    pub score: u64,
    pub timestamp: String,
}

#[derive(Clone, Debug, Default)]
pub struct LeaderboardView {
    pub daily: Vec<LeaderboardRow>,
    pub weekly: Vec<LeaderboardRow>,
    pub all_time: Vec<LeaderboardRow>,
}

/// Immutable view the UI renders from.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub phase: Phase,
    pub variant: GameVariant,
    pub difficulty: Difficulty,
    pub grid: Vec<Vec<CellView>>,
    pub cursor: Pos,
    pub quantum_mode: bool,
    pub moves: u32,
    pub score: u32,
    pub field_count: u16,
    pub safe_cells_left: u16,
    pub bet_amount: f64,
    pub total_winnings: f64,
    pub current_winnings: f64,
    pub can_cash_out: bool,
    pub wallet_address: Option<String>,
    pub contract_address: Option<String>,
    pub house_balance: f64,
    pub games_played: usize,
    pub player_stats: PlayerStats,
    pub power_ups: Vec<PowerUpKind>,
    pub hints: Vec<Hint>,
    pub history: Vec<GameRecord>,
    pub leaderboards: Option<LeaderboardView>,
    pub status: String,
    pub errors: Vec<String>,
}

struct ChainAccount {
    signer: PrivateKeySigner,
    client: Option<QuantumGridClient>,
}

pub struct AppController {
    config: AppConfig,
    economy: HouseLedger,
    stats: PlayerStats,
    stats_path: Option<PathBuf>,
    difficulty: Difficulty,
    session: Option<GameSession>,
    cursor: Pos,
    quantum_mode: bool,
    bet_amount: f64,
    total_winnings: f64,
    history: Vec<GameRecord>,
    power_ups: Vec<PowerUpKind>,
    hints: Vec<Hint>,
    chain: Option<ChainAccount>,
    leaderboards: Option<LeaderboardView>,
    status: String,
    errors: Vec<String>,
}

impl AppController {
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut errors = config.env.validate();

        let mut economy = HouseLedger::new(config.env.house_fee);
        economy.fund_house(config.env.house_balance);

        let stats_path = stats_path();
        let stats = stats_path
            .as_ref()
            .and_then(|path| load_stats(path))
            .unwrap_or_default();

        let chain = match build_chain(&config) {
            Ok(chain) => chain,
            Err(err) => {
                errors.push(format!("wallet setup failed: {err}"));
                None
            }
        };

        let bet_amount = config.bet;
        Ok(Self {
            config,
            economy,
            stats,
            stats_path,
            difficulty: Difficulty::Medium,
            session: None,
            cursor: (0, 0),
            quantum_mode: false,
            bet_amount,
            total_winnings: 0.0,
            history: Vec::new(),
            power_ups: Vec::new(),
            hints: Vec::new(),
            chain,
            leaderboards: None,
            status: String::from("Welcome to Quantum Grid"),
            errors,
        })
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn push_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        tracing::error!(%error);
        self.errors.push(error);
        if self.errors.len() > 4 {
            self.errors.remove(0);
        }
    }

    fn wallet_connected(&self) -> bool {
        self.chain.is_some()
    }

    pub fn phase(&self) -> Phase {
        match self.session.as_ref().map(GameSession::state) {
            None => Phase::Menu,
            Some(SessionState::Playing) => Phase::Playing,
            Some(SessionState::Won) => Phase::Won,
            Some(SessionState::Lost) => Phase::Lost,
            Some(SessionState::CashedOut) => Phase::CashedOut,
        }
    }

    pub fn cycle_difficulty(&mut self, forward: bool) {
        if self.phase() != Phase::Menu {
            return;
        }
        self.difficulty = if forward {
            self.difficulty.step_up()
        } else {
            self.difficulty.step_down()
        };
        self.set_status(format!("Difficulty: {}", self.difficulty));
    }

    pub fn set_bet(&mut self, amount: f64) {
        self.bet_amount = amount.max(0.0);
        self.set_status(format!("Bet set to {:.1} MATIC", self.bet_amount));
    }

    pub async fn start_game(&mut self) -> Result<()> {
        if self.wallet_connected() && self.bet_amount > 0.0 {
            if let Err(err) = self.economy.process_bet(self.bet_amount) {
                self.push_error(format!("Bet failed: {err}"));
                return Ok(());
            }

            let message = match self.config.variant {
                GameVariant::Classic => format!(
                    "Starting Quantum Grid game with bet: {} MATIC",
                    self.bet_amount
                ),
                GameVariant::Enhanced => format!(
                    "Starting Enhanced Quantum Grid game with bet: {} MATIC",
                    self.bet_amount
                ),
            };
            if !self.sign_message(&message).await {
                return Ok(());
            }
        }

        let mut rng = rand::rng();
        let session = GameSession::new(self.difficulty, self.config.variant, &mut rng);
        self.cursor = (session.grid_size() / 2, session.grid_size() / 2);
        self.session = Some(session);
        self.power_ups.clear();
        self.hints.clear();

        // One possible drop straight away, as the enhanced game does.
        if self.config.variant == GameVariant::Enhanced {
            if let Some(session) = self.session.as_ref() {
                if let Some(kind) = spawn_power_up(session, &mut rng) {
                    self.power_ups.push(kind);
                }
            }
        }

        self.set_status(format!(
            "Game on: {} ({}x{}, {} fields)",
            self.difficulty,
            self.session.as_ref().map_or(0, |s| s.grid_size()),
            self.session.as_ref().map_or(0, |s| s.grid_size()),
            self.session.as_ref().map_or(0, |s| s.field_count()),
        ));
        Ok(())
    }

    /// Signs a proof-of-intent message. Returns false (and surfaces the
    /// error) when the signature was refused; the action is then aborted.
    async fn sign_message(&mut self, message: &str) -> bool {
        let Some(chain) = self.chain.as_ref() else {
            return true;
        };
        match chain.signer.sign_message(message.as_bytes()).await {
            Ok(signature) => {
                tracing::info!(
                    signed = message,
                    signature = %hex::encode(signature.as_bytes()),
                    "message signed"
                );
                true
            }
            Err(err) => {
                self.push_error(format!("Failed to sign: {err}"));
                false
            }
        }
    }

    pub fn move_cursor(&mut self, dr: i8, dc: i8) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let size = session.grid_size();
        let row = self.cursor.0 as i16 + i16::from(dr);
        let col = self.cursor.1 as i16 + i16::from(dc);
        self.cursor = (
            row.clamp(0, i16::from(size) - 1) as u8,
            col.clamp(0, i16::from(size) - 1) as u8,
        );
    }

    pub async fn reveal_at_cursor(&mut self) -> Result<()> {
        if self.phase() != Phase::Playing {
            return Ok(());
        }
        let cursor = self.cursor;
        let outcome = {
            let Some(session) = self.session.as_mut() else {
                return Ok(());
            };
            match session.reveal(cursor) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.push_error(err.to_string());
                    return Ok(());
                }
            }
        };

        match outcome {
            RevealOutcome::NoChange => {}
            RevealOutcome::Safe { points } => {
                self.after_safe_reveal(points);
            }
            RevealOutcome::FieldHit => {
                self.finish_game(GameResult::Lost).await?;
            }
            RevealOutcome::Won { .. } => {
                self.finish_game(GameResult::Won).await?;
            }
        }
        Ok(())
    }

    fn after_safe_reveal(&mut self, points: u32) {
        let mut rng = rand::rng();
        let (hint, power_up, status) = {
            let session = self.session.as_ref().expect("session active");
            let hint = generate_hint(session, self.cursor, &mut rng);
            let power_up = if self.config.variant == GameVariant::Enhanced {
                spawn_power_up(session, &mut rng)
            } else {
                None
            };
            let status = format!(
                "+{points} points ({} safe cells left)",
                session.safe_cells_left()
            );
            (hint, power_up, status)
        };

        if let Some(hint) = hint {
            self.hints.push(hint);
            if self.hints.len() > HINT_LOG_DEPTH {
                self.hints.remove(0);
            }
        }
        if let Some(kind) = power_up {
            self.set_status(format!("Power-up acquired: {}", kind.name()));
            self.power_ups.push(kind);
        } else {
            self.set_status(status);
        }
    }

    pub fn toggle_flag_at_cursor(&mut self) {
        if self.phase() != Phase::Playing {
            return;
        }
        let cursor = self.cursor;
        if let Some(session) = self.session.as_mut() {
            if let Err(err) = session.toggle_flag(cursor) {
                let message = err.to_string();
                self.push_error(message);
            }
        }
    }

    pub fn toggle_quantum_mode(&mut self) {
        self.quantum_mode = !self.quantum_mode;
        self.set_status(if self.quantum_mode {
            "Quantum mode ON"
        } else {
            "Quantum mode OFF"
        });
    }

    pub async fn use_power_up(&mut self, index: usize) -> Result<()> {
        if self.phase() != Phase::Playing || index >= self.power_ups.len() {
            return Ok(());
        }
        let kind = self.power_ups.remove(index);
        let mut rng = rand::rng();
        let effect = {
            let session = self.session.as_ref().expect("session active");
            apply_power_up(kind, session, &mut rng)
        };

        match effect {
            PowerUpEffect::ScannedCells(readings) => {
                let fields = readings.iter().filter(|r| r.is_field).count();
                self.set_status(format!(
                    "Scanner: {fields} fields among {} adjacent cells",
                    readings.len()
                ));
            }
            PowerUpEffect::DetectedFields(fields) => {
                self.set_status(format!("Detector: {} quantum fields marked", fields.len()));
                if let Some(session) = self.session.as_mut() {
                    for pos in fields {
                        if !session.is_flagged(pos) && !session.is_revealed(pos) {
                            let _ = session.toggle_flag(pos);
                        }
                    }
                }
            }
            PowerUpEffect::TimeExtension(seconds) => {
                self.set_status(format!("Time extended by {seconds} seconds"));
            }
            PowerUpEffect::RevealedSafe(Some(pos)) => {
                self.cursor = pos;
                self.set_status(format!("Safe reveal at ({}, {})", pos.0, pos.1));
                self.reveal_at_cursor().await?;
            }
            PowerUpEffect::RevealedSafe(None) => {
                self.set_status("No safe cells left to reveal");
            }
            PowerUpEffect::ScoreBoost(multiplier) => {
                if let Some(session) = self.session.as_mut() {
                    session.add_score_boost();
                }
                self.set_status(format!("Score multiplier boosted by {multiplier}x"));
            }
        }
        Ok(())
    }

    pub fn request_hint(&mut self) {
        if self.phase() != Phase::Playing {
            return;
        }
        let mut rng = rand::rng();
        let hint = {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            let candidates = session.hintable_cells();
            if candidates.is_empty() {
                None
            } else {
                let target = candidates[rng.random_range(0..candidates.len())];
                generate_hint(session, target, &mut rng)
            }
        };
        match hint {
            Some(hint) => {
                self.set_status(format!(
                    "Hint ({}, {}): {}",
                    hint.target.0,
                    hint.target.1,
                    hint.message()
                ));
                self.hints.push(hint);
                if self.hints.len() > HINT_LOG_DEPTH {
                    self.hints.remove(0);
                }
            }
            None => self.set_status("The quantum analyzer stays silent"),
        }
    }

    pub fn current_winnings(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(0.0, |s| s.current_winnings(self.bet_amount))
    }

    pub async fn cash_out(&mut self) -> Result<()> {
        let bet = self.bet_amount;
        let can_cash_out = self
            .session
            .as_ref()
            .is_some_and(|s| s.can_cash_out(bet));
        if !can_cash_out {
            return Ok(());
        }

        let gross = self.current_winnings();
        let winnings = if self.wallet_connected() {
            let settled = self.economy.apply_house_edge(gross);
            if let Err(err) = self.economy.process_win(settled) {
                self.push_error(format!("Cash-out failed: {err}"));
                return Ok(());
            }
            let message = match self.config.variant {
                GameVariant::Classic => {
                    format!("Cashing out {settled:.4} MATIC from Quantum Grid")
                }
                GameVariant::Enhanced => {
                    format!("Cashing out {settled:.4} MATIC from Enhanced Quantum Grid")
                }
            };
            if !self.sign_message(&message).await {
                return Ok(());
            }
            settled
        } else {
            gross
        };

        if let Some(session) = self.session.as_mut() {
            let _ = session.cash_out(bet);
        }
        self.total_winnings += winnings;
        self.set_status(format!("Cashed out {winnings:.4} MATIC"));
        self.record_game(GameResult::CashedOut, winnings);
        self.submit_result_to_contract().await;
        Ok(())
    }

    async fn finish_game(&mut self, result: GameResult) -> Result<()> {
        let (score, winnings) = {
            let session = self.session.as_ref().expect("session finished");
            let winnings = match result {
                GameResult::Won => session.current_winnings(self.bet_amount),
                _ => 0.0,
            };
            (session.score(), winnings)
        };

        let timestamp = Utc::now().timestamp_millis();
        match result {
            GameResult::Won => {
                self.total_winnings += winnings;
                self.stats.record_win(score, winnings, timestamp);
                self.set_status(format!(
                    "Quantum Master! Score {score}, winnings {winnings:.4} MATIC"
                ));
            }
            GameResult::Lost => {
                self.stats.record_loss(score, timestamp);
                if self.wallet_connected() && self.bet_amount > 0.0 {
                    let fee = self.economy.process_loss(self.bet_amount);
                    tracing::info!(fee, "house keeps its cut of the lost bet");
                }
                self.set_status(format!("Quantum collapse! Final score {score}"));
            }
            GameResult::CashedOut => unreachable!("cash-out is recorded separately"),
        }

        self.persist_stats();
        self.record_game(result, winnings);
        self.maybe_adjust_difficulty();
        self.submit_result_to_contract().await;
        Ok(())
    }

    fn record_game(&mut self, result: GameResult, winnings: f64) {
        let score = self.session.as_ref().map_or(0, GameSession::score);
        self.history.push(GameRecord {
            result,
            score,
            bet: self.bet_amount,
            winnings,
            timestamp_ms: Utc::now().timestamp_millis(),
        });
        if self.history.len() > HISTORY_DEPTH {
            self.history.remove(0);
        }
    }

    fn maybe_adjust_difficulty(&mut self) {
        let adjusted = adjust_difficulty(self.difficulty, &self.stats);
        if adjusted != self.difficulty {
            self.set_status(format!(
                "Difficulty adjusted: {} -> {adjusted}",
                self.difficulty
            ));
            self.difficulty = adjusted;
        }
    }

    /// Pushes the finished game to the contract when one is configured.
    /// The signature step is decorative; this is the only on-chain record.
    async fn submit_result_to_contract(&mut self) {
        let Some(client) = self.chain.as_ref().and_then(|c| c.client.clone()) else {
            return;
        };
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let size = session.grid_size();
        let mut grid = vec![vec![0u8; size as usize]; size as usize];
        let mut fields = Vec::new();
        for &(row, col) in session.layout().field_cells() {
            grid[row as usize][col as usize] = 1;
            fields.push(FieldPos { row, col });
        }
        let hash = game_commitment_hash(
            &grid,
            &fields,
            session.difficulty().contract_tier(),
            Utc::now().timestamp_millis(),
        );

        let result = client
            .submit_game_result(
                u64::from(session.score()),
                u64::from(session.revealed_count()),
                session.revealed_positions(),
                hash,
            )
            .await;
        match result {
            Ok(tx_hash) => self.set_status(format!("Result submitted: {tx_hash}")),
            Err(err) => self.push_error(format!("Result submission failed: {err}")),
        }
    }

    pub async fn claim_winnings(&mut self) -> Result<()> {
        let Some(client) = self.chain.as_ref().and_then(|c| c.client.clone()) else {
            self.push_error("No contract configured for claiming");
            return Ok(());
        };
        match client.claim_winnings().await {
            Ok(tx_hash) => self.set_status(format!("Winnings claimed: {tx_hash}")),
            Err(err) => self.push_error(format!("Claim failed: {err}")),
        }
        Ok(())
    }

    pub async fn fetch_leaderboards(&mut self) -> Result<()> {
        let Some(client) = self.chain.as_ref().and_then(|c| c.client.clone()) else {
            self.push_error("No contract configured for leaderboards");
            return Ok(());
        };
        self.set_status("Fetching leaderboards...");

        let daily = client.daily_leaderboard().await;
        let weekly = client.weekly_leaderboard().await;
        let all_time = client.all_time_leaderboard().await;
        match (daily, weekly, all_time) {
            (Ok(daily), Ok(weekly), Ok(all_time)) => {
                self.leaderboards = Some(LeaderboardView {
                    daily: daily.iter().map(leaderboard_row).collect(),
                    weekly: weekly.iter().map(leaderboard_row).collect(),
                    all_time: all_time.iter().map(leaderboard_row).collect(),
                });
                self.set_status("Leaderboards updated");
            }
            _ => self.push_error("Leaderboard fetch failed"),
        }
        Ok(())
    }

    pub fn reset_to_menu(&mut self) {
        self.session = None;
        self.power_ups.clear();
        self.hints.clear();
        self.set_status("Back to the menu");
    }

    fn persist_stats(&mut self) {
        let Some(path) = self.stats_path.clone() else {
            return;
        };
        if let Err(err) = save_stats(&path, &self.stats) {
            self.push_error(format!("Could not persist player stats: {err}"));
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let phase = self.phase();
        let grid = self.render_grid();
        let session = self.session.as_ref();
        AppSnapshot {
            phase,
            variant: self.config.variant,
            difficulty: self.difficulty,
            grid,
            cursor: self.cursor,
            quantum_mode: self.quantum_mode,
            moves: session.map_or(0, GameSession::moves),
            score: session.map_or(0, GameSession::score),
            field_count: session.map_or_else(
                || self.difficulty.config().quantum_fields,
                GameSession::field_count,
            ),
            safe_cells_left: session.map_or(0, GameSession::safe_cells_left),
            bet_amount: self.bet_amount,
            total_winnings: self.total_winnings,
            current_winnings: self.current_winnings(),
            can_cash_out: session.is_some_and(|s| s.can_cash_out(self.bet_amount)),
            wallet_address: self
                .chain
                .as_ref()
                .map(|c| c.signer.address().to_string()),
            contract_address: self
                .chain
                .as_ref()
                .and_then(|c| c.client.as_ref())
                .map(|c| c.address().to_string()),
            house_balance: self.economy.house_balance(),
            games_played: self.history.len(),
            player_stats: self.stats.clone(),
            power_ups: self.power_ups.clone(),
            hints: self.hints.clone(),
            history: self.history.clone(),
            leaderboards: self.leaderboards.clone(),
            status: self.status.clone(),
            errors: self.errors.clone(),
        }
    }

    fn render_grid(&self) -> Vec<Vec<CellView>> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let size = session.grid_size();
        let game_over = session.state().is_finished();
        let mut rows = Vec::with_capacity(size as usize);
        for row in 0..size {
            let mut cells = Vec::with_capacity(size as usize);
            for col in 0..size {
                let pos = (row, col);
                let probability = session.probability(pos);
                let pct = (probability * 100.0).round() as u8;
                let view = if session.is_revealed(pos) {
                    if session.layout().contains_field(pos) {
                        CellView::Field
                    } else {
                        CellView::Safe {
                            probability_pct: pct,
                        }
                    }
                } else if game_over && session.layout().contains_field(pos) {
                    CellView::Field
                } else if session.is_flagged(pos) {
                    CellView::Flagged
                } else {
                    let hint = (self.quantum_mode && probability > 0.3).then_some(pct);
                    CellView::Hidden {
                        probability_pct: hint,
                    }
                };
                cells.push(view);
            }
            rows.push(cells);
        }
        rows
    }
}

fn leaderboard_row(entry: &quantum_abi::QuantumGrid::LeaderboardEntry) -> LeaderboardRow {
    let timestamp = u64::try_from(entry.timestamp).unwrap_or(0);
    let rendered = chrono::DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    LeaderboardRow {
        player: entry.player.to_string(),
        score: u64::try_from(entry.score).unwrap_or(u64::MAX),
        timestamp: rendered,
    }
}

fn build_chain(config: &AppConfig) -> Result<Option<ChainAccount>> {
    if config.offline {
        return Ok(None);
    }
    let Some(source) = config.wallet.as_ref() else {
        return Ok(None);
    };

    let signer = match source {
        WalletSource::Keystore { name, dir } => {
            let descriptor = wallets::find_wallet(dir, name)?;
            wallets::unlock_wallet(&descriptor)?
        }
        WalletSource::Env => wallets::signer_from_env()?,
    };

    let client = match config.network.contract_address() {
        Some(address) => {
            let url = config
                .rpc_url
                .parse::<url::Url>()
                .wrap_err("parsing RPC URL")?;
            let provider: DynProvider = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(url)
                .erased();
            Some(QuantumGridClient::new(address, provider))
        }
        None => None,
    };

    Ok(Some(ChainAccount { signer, client }))
}

fn stats_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(
        PathBuf::from(home)
            .join(".quantum-grid")
            .join("stats.json"),
    )
}

fn load_stats(path: &PathBuf) -> Option<PlayerStats> {
    let data = std::fs::read(path).ok()?;
    serde_json::from_slice(&data).ok()
}

fn save_stats(path: &PathBuf, stats: &PlayerStats) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).wrap_err("creating stats directory")?;
    }
    let json = serde_json::to_vec_pretty(stats).wrap_err("serializing player stats")?;
    std::fs::write(path, json).wrap_err("writing player stats")?;
    Ok(())
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut controller = AppController::new(config)?;
    let mut ui_state = ui::UiState::default();

    tracing::info!("Starting UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(
    controller: &mut AppController,
    ui_state: &mut ui::UiState,
) -> Result<()> {
    let mut snapshot = controller.snapshot();
    ui::draw(ui_state, &snapshot)?;
    loop {
        match ui::next_event(ui_state, &snapshot)? {
            ui::UserEvent::Quit => break,
            ui::UserEvent::Redraw => {
                ui::draw(ui_state, &snapshot)?;
                continue;
            }
            ui::UserEvent::CycleDifficulty { forward } => {
                controller.cycle_difficulty(forward)
            }
            ui::UserEvent::SetBet(amount) => controller.set_bet(amount),
            ui::UserEvent::StartGame => controller.start_game().await?,
            ui::UserEvent::MoveCursor { dr, dc } => controller.move_cursor(dr, dc),
            ui::UserEvent::Reveal => controller.reveal_at_cursor().await?,
            ui::UserEvent::ToggleFlag => controller.toggle_flag_at_cursor(),
            ui::UserEvent::ToggleQuantumMode => controller.toggle_quantum_mode(),
            ui::UserEvent::UsePowerUp(index) => controller.use_power_up(index).await?,
            ui::UserEvent::RequestHint => controller.request_hint(),
            ui::UserEvent::CashOut => controller.cash_out().await?,
            ui::UserEvent::ClaimWinnings => controller.claim_winnings().await?,
            ui::UserEvent::FetchLeaderboards => controller.fetch_leaderboards().await?,
            ui::UserEvent::BackToMenu => controller.reset_to_menu(),
        }
        snapshot = controller.snapshot();
        ui::draw(ui_state, &snapshot)?;
    }
    Ok(())
}
