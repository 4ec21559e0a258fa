use crate::client::{AppSnapshot, CellView, GameRecord, Phase};
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use engine::GameVariant;
use itertools::Itertools;
use ratatui::{prelude::*, widgets::*};
use std::io::stdout;
use unicode_width::UnicodeWidthStr;

const CELL_WIDTH: usize = 4;

pub enum UserEvent {
    Quit,
    Redraw,
    CycleDifficulty { forward: bool },
    SetBet(f64),
    StartGame,
    MoveCursor { dr: i8, dc: i8 },
    Reveal,
    ToggleFlag,
    ToggleQuantumMode,
    UsePowerUp(usize),
    RequestHint,
    CashOut,
    ClaimWinnings,
    FetchLeaderboards,
    BackToMenu,
}

#[derive(Debug, Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    BetModal(BetState),
    PowerUpModal(PowerUpState),
    LeaderboardModal(LeaderboardTab),
    QuitModal,
}

/// Bet edited in tenths of a MATIC so digit entry stays integral.
#[derive(Clone, Copy, Debug, Default)]
struct BetState {
    tenths: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct PowerUpState {
    idx: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum LeaderboardTab {
    #[default]
    Daily,
    Weekly,
    AllTime,
}

impl LeaderboardTab {
    fn next(self) -> Self {
        match self {
            LeaderboardTab::Daily => LeaderboardTab::Weekly,
            LeaderboardTab::Weekly => LeaderboardTab::AllTime,
            LeaderboardTab::AllTime => LeaderboardTab::Daily,
        }
    }

    fn title(self) -> &'static str {
        match self {
            LeaderboardTab::Daily => "Daily Leaderboard",
            LeaderboardTab::Weekly => "Weekly Leaderboard",
            LeaderboardTab::AllTime => "All-Time Leaderboard",
        }
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub fn next_event(state: &mut UiState, snap: &AppSnapshot) -> Result<UserEvent> {
    loop {
        if let Event::Key(k) = event::read()? {
            if k.kind != KeyEventKind::Press {
                continue;
            }
            // Modal handling first
            match &mut state.mode {
                Mode::BetModal(bs) => match k.code {
                    KeyCode::Esc => {
                        state.mode = Mode::Normal;
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Enter => {
                        let amount = bs.tenths as f64 / 10.0;
                        state.mode = Mode::Normal;
                        return Ok(UserEvent::SetBet(amount));
                    }
                    KeyCode::Up | KeyCode::Char('+') => {
                        bs.tenths = bs.tenths.saturating_add(1);
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Down | KeyCode::Char('-') => {
                        bs.tenths = bs.tenths.saturating_sub(1);
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Backspace => {
                        bs.tenths /= 10;
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        let d = u64::from(c.to_digit(10).unwrap_or(0));
                        bs.tenths = bs.tenths.saturating_mul(10).saturating_add(d);
                        return Ok(UserEvent::Redraw);
                    }
                    _ => {}
                },
                Mode::PowerUpModal(ps) => match k.code {
                    KeyCode::Esc => {
                        state.mode = Mode::Normal;
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        ps.idx = ps.idx.saturating_sub(1);
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        let max = snap.power_ups.len().saturating_sub(1);
                        ps.idx = (ps.idx + 1).min(max);
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Enter => {
                        let idx = ps.idx;
                        state.mode = Mode::Normal;
                        if snap.power_ups.is_empty() {
                            return Ok(UserEvent::Redraw);
                        }
                        return Ok(UserEvent::UsePowerUp(idx));
                    }
                    _ => {}
                },
                Mode::LeaderboardModal(tab) => match k.code {
                    KeyCode::Esc | KeyCode::Char('o') => {
                        state.mode = Mode::Normal;
                        return Ok(UserEvent::Redraw);
                    }
                    KeyCode::Tab | KeyCode::Right | KeyCode::Left => {
                        *tab = tab.next();
                        return Ok(UserEvent::Redraw);
                    }
                    _ => {}
                },
                Mode::QuitModal => match k.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        return Ok(UserEvent::Quit);
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        state.mode = Mode::Normal;
                        return Ok(UserEvent::Redraw);
                    }
                    _ => {}
                },
                Mode::Normal => {}
            }
            if !matches!(state.mode, Mode::Normal) {
                continue;
            }

            let in_menu = snap.phase == Phase::Menu;
            let playing = snap.phase == Phase::Playing;
            let finished = matches!(snap.phase, Phase::Won | Phase::Lost | Phase::CashedOut);

            return Ok(match k.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    state.mode = Mode::QuitModal;
                    UserEvent::Redraw
                }
                KeyCode::Left | KeyCode::Char('h') if in_menu => {
                    UserEvent::CycleDifficulty { forward: false }
                }
                KeyCode::Right | KeyCode::Char('l') if in_menu => {
                    UserEvent::CycleDifficulty { forward: true }
                }
                KeyCode::Up | KeyCode::Char('k') if playing => {
                    UserEvent::MoveCursor { dr: -1, dc: 0 }
                }
                KeyCode::Down | KeyCode::Char('j') if playing => {
                    UserEvent::MoveCursor { dr: 1, dc: 0 }
                }
                KeyCode::Left | KeyCode::Char('h') if playing => {
                    UserEvent::MoveCursor { dr: 0, dc: -1 }
                }
                KeyCode::Right | KeyCode::Char('l') if playing => {
                    UserEvent::MoveCursor { dr: 0, dc: 1 }
                }
                KeyCode::Enter | KeyCode::Char(' ') if in_menu => UserEvent::StartGame,
                KeyCode::Enter | KeyCode::Char(' ') if playing => UserEvent::Reveal,
                KeyCode::Char('n') if finished => UserEvent::StartGame,
                KeyCode::Char('r') if finished || playing => UserEvent::BackToMenu,
                KeyCode::Char('f') if playing => UserEvent::ToggleFlag,
                KeyCode::Char('m') => UserEvent::ToggleQuantumMode,
                KeyCode::Char('b') if in_menu => {
                    state.mode = Mode::BetModal(BetState {
                        tenths: (snap.bet_amount * 10.0).round() as u64,
                    });
                    UserEvent::Redraw
                }
                KeyCode::Char('p') if playing && snap.variant == GameVariant::Enhanced => {
                    state.mode = Mode::PowerUpModal(PowerUpState::default());
                    UserEvent::Redraw
                }
                KeyCode::Char('i') if playing => UserEvent::RequestHint,
                KeyCode::Char('c') if playing => UserEvent::CashOut,
                KeyCode::Char('w') => UserEvent::ClaimWinnings,
                KeyCode::Char('o') => {
                    state.mode = Mode::LeaderboardModal(LeaderboardTab::default());
                    UserEvent::FetchLeaderboards
                }
                _ => continue,
            });
        }
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let grid_height = (snap.grid.len() as u16).max(6) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),           // header: wallet + game overview
            Constraint::Length(5),           // stats
            Constraint::Length(grid_height), // the grid itself
            Constraint::Length(8),           // power-ups / hints / history
            Constraint::Min(6),              // status/errors + help
        ])
        .split(f.area());

    draw_header(f, chunks[0], snap);
    draw_stats(f, chunks[1], snap);
    draw_grid(f, chunks[2], snap);
    draw_lower(f, chunks[3], snap);
    draw_bottom(f, chunks[4], snap);
    draw_modals(f, state, snap);
}

fn draw_header(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let wallet = snap
        .wallet_address
        .as_deref()
        .unwrap_or("not connected");
    let contract = snap.contract_address.as_deref().unwrap_or("none");
    let variant = match snap.variant {
        GameVariant::Classic => "classic",
        GameVariant::Enhanced => "enhanced",
    };
    let lines = vec![
        Line::from(format!(
            "Wallet: {wallet} | Contract: {contract}"
        )),
        Line::from(format!(
            "Variant: {variant} | Difficulty: {} | Phase: {}",
            snap.difficulty,
            phase_label(snap.phase)
        )),
    ];
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Quantum Grid"));
    f.render_widget(widget, area);
}

fn draw_stats(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let lines = vec![
        Line::from(format!(
            "Moves: {} | Score: {} | Fields: {} | Safe cells left: {}",
            snap.moves, snap.score, snap.field_count, snap.safe_cells_left
        )),
        Line::from(format!(
            "Bet: {:.1} MATIC | Current: {:.4} | Total: {:.4} | House: {:.2} | Games: {}",
            snap.bet_amount,
            snap.current_winnings,
            snap.total_winnings,
            snap.house_balance,
            snap.games_played
        )),
        Line::from(format!(
            "Lifetime: {} played | best {} | streak {} (longest {}) | {:.4} MATIC won",
            snap.player_stats.total_games_played,
            snap.player_stats.best_score,
            snap.player_stats.win_streak,
            snap.player_stats.longest_win_streak,
            snap.player_stats.total_winnings
        )),
    ];
    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    f.render_widget(widget, area);
}

fn cell_label(view: &CellView) -> String {
    match view {
        CellView::Hidden {
            probability_pct: Some(pct),
        } => format!("{pct}%"),
        CellView::Hidden {
            probability_pct: None,
        } => "·".to_string(),
        CellView::Flagged => "⚑".to_string(),
        CellView::Safe { probability_pct } => format!("{probability_pct}"),
        CellView::Field => "✦".to_string(),
    }
}

fn cell_style(view: &CellView, selected: bool) -> Style {
    let style = match view {
        CellView::Hidden { probability_pct } => {
            if probability_pct.is_some() {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        }
        CellView::Flagged => Style::default().fg(Color::Yellow),
        CellView::Safe { .. } => Style::default().fg(Color::Green),
        CellView::Field => Style::default().fg(Color::Red),
    };
    if selected {
        style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        style
    }
}

fn draw_grid(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let block = Block::default().borders(Borders::ALL).title("Grid");
    if snap.grid.is_empty() {
        let menu = Paragraph::new(vec![
            Line::from("Reveal every safe cell while avoiding quantum fields."),
            Line::from("Left/right pick a difficulty, b sets the bet, Enter starts."),
            Line::from("Toggle quantum mode (m) to overlay probability estimates."),
        ])
        .block(block);
        f.render_widget(menu, area);
        return;
    }

    let mut lines = Vec::with_capacity(snap.grid.len());
    for (row_idx, row) in snap.grid.iter().enumerate() {
        let mut spans = Vec::with_capacity(row.len());
        for (col_idx, view) in row.iter().enumerate() {
            let selected = snap.phase == Phase::Playing
                && snap.cursor == (row_idx as u8, col_idx as u8);
            let label = cell_label(view);
            let pad = CELL_WIDTH.saturating_sub(label.width());
            let left = pad / 2;
            let right = pad - left;
            let padded = format!("{}{label}{}", " ".repeat(left), " ".repeat(right));
            spans.push(Span::styled(padded, cell_style(view, selected)));
        }
        lines.push(Line::from(spans));
    }
    let widget = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn draw_lower(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut left_lines = Vec::new();
    if snap.power_ups.is_empty() {
        left_lines.push(Line::styled(
            "No power-ups held",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        let held = snap.power_ups.iter().map(|p| p.name()).join(", ");
        left_lines.push(Line::from(held));
    }
    left_lines.push(Line::from(""));
    for hint in snap.hints.iter().rev() {
        left_lines.push(Line::from(format!(
            "({}, {}) {:.0}%: {}",
            hint.target.0,
            hint.target.1,
            hint.confidence * 100.0,
            hint.message()
        )));
    }
    let left = Paragraph::new(left_lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Power-ups & Hints"),
    );
    f.render_widget(left, halves[0]);

    let mut right_lines = Vec::new();
    if snap.history.is_empty() {
        right_lines.push(Line::from("None"));
    } else {
        for record in snap.history.iter().rev() {
            right_lines.push(Line::from(format_record(record)));
        }
    }
    let right = Paragraph::new(right_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Previous Games"),
    );
    f.render_widget(right, halves[1]);
}

fn format_record(record: &GameRecord) -> String {
    format!(
        "{}: score {} | bet {:.1} | winnings {:.4}",
        record.result.label(),
        record.score,
        record.bet,
        record.winnings
    )
}

fn draw_bottom(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let status_widget = if snap.errors.is_empty() {
        Paragraph::new(snap.status.as_str())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(Color::Green))
    } else {
        let lines: Vec<Line> = snap.errors.iter().map(|e| Line::from(e.clone())).collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Errors"))
            .style(Style::default().fg(Color::Red))
    };
    f.render_widget(status_widget, chunks[0]);

    let help = match snap.phase {
        Phase::Menu => {
            "←/→ difficulty | b bet | Enter start | o leaderboards | w claim | m quantum mode | q quit"
        }
        Phase::Playing => {
            "arrows move | Enter reveal | f flag | c cash out | p power-ups | i hint | m quantum mode | r menu | q quit"
        }
        _ => "n play again | r menu | o leaderboards | w claim | q quit",
    };
    let help_widget =
        Paragraph::new(help).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help_widget, chunks[1]);
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Menu => "menu",
        Phase::Playing => "playing",
        Phase::Won => "won — Quantum Master!",
        Phase::Lost => "lost — quantum collapse",
        Phase::CashedOut => "cashed out",
    }
}

fn draw_modals(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    match &state.mode {
        Mode::BetModal(bs) => {
            let area = centered_rect(40, 30, f.area());
            let block = Block::default().borders(Borders::ALL).title("Set Bet");
            let p = Paragraph::new(format!(
                "Bet: {:.1} MATIC\nEnter=confirm Esc=cancel +/- or digits to edit",
                bs.tenths as f64 / 10.0
            ));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::PowerUpModal(ps) => {
            let area = centered_rect(60, 50, f.area());
            let block = Block::default().borders(Borders::ALL).title("Power-ups");
            let mut lines = Vec::new();
            if snap.power_ups.is_empty() {
                lines.push(Line::from("Nothing in the quantum toolbox"));
            } else {
                for (idx, kind) in snap.power_ups.iter().enumerate() {
                    let marker = if idx == ps.idx { "> " } else { "  " };
                    let text = format!("{marker}{}: {}", kind.name(), kind.description());
                    if idx == ps.idx {
                        lines.push(Line::styled(
                            text,
                            Style::default().fg(Color::Yellow),
                        ));
                    } else {
                        lines.push(Line::from(text));
                    }
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Enter=use Esc=cancel"));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(Paragraph::new(lines), block.inner(area));
        }
        Mode::LeaderboardModal(tab) => {
            let area = centered_rect(70, 70, f.area());
            let block = Block::default().borders(Borders::ALL).title(tab.title());
            let mut lines = Vec::new();
            match snap.leaderboards.as_ref() {
                None => lines.push(Line::from("No leaderboard data (contract offline?)")),
                Some(boards) => {
                    let rows = match tab {
                        LeaderboardTab::Daily => &boards.daily,
                        LeaderboardTab::Weekly => &boards.weekly,
                        LeaderboardTab::AllTime => &boards.all_time,
                    };
                    if rows.is_empty() {
                        lines.push(Line::from("No entries yet"));
                    }
                    for (idx, row) in rows.iter().enumerate() {
                        lines.push(Line::from(format!(
                            "{:>3}. {} — {} ({})",
                            idx + 1,
                            row.player,
                            row.score,
                            row.timestamp
                        )));
                    }
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Tab=next board Esc=close"));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(Paragraph::new(lines), block.inner(area));
        }
        Mode::QuitModal => {
            let area = centered_rect(30, 20, f.area());
            let block = Block::default().borders(Borders::ALL).title("Quit?");
            let p = Paragraph::new("Leave the quantum grid? (y/n)");
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal => {}
    }
}

/// Centered sub-rectangle sized as a percentage of `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
