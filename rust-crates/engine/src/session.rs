use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Difficulty, FieldLayout, GameError, Pos, ProbabilityMatrix, ProbabilityModel, Result,
    score,
};

/// Which rendition of the game is being played. Classic pairs the plain
/// probability model with base scoring; Enhanced adds the heuristic model,
/// enhanced scoring, combos, and power-up boosts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVariant {
    Classic,
    Enhanced,
}

impl GameVariant {
    pub const fn probability_model(self) -> ProbabilityModel {
        match self {
            GameVariant::Classic => ProbabilityModel::Classic,
            GameVariant::Enhanced => ProbabilityModel::Advanced,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Playing,
    Won,
    Lost,
    CashedOut,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Cell was already revealed or flagged; nothing happened.
    NoChange,
    Safe { points: u32 },
    FieldHit,
    Won { points: u32 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

/// One game in progress: the immutable layout plus the mutable reveal/flag
/// sets, score, and terminal state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    variant: GameVariant,
    difficulty: Difficulty,
    layout: FieldLayout,
    probabilities: ProbabilityMatrix,
    revealed: BTreeSet<Pos>,
    flagged: BTreeSet<Pos>,
    moves: u32,
    score: u32,
    boost_count: u32,
    state: SessionState,
    triggered_field: Option<Pos>,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, variant: GameVariant, rng: &mut impl Rng) -> Self {
        let layout = FieldLayout::generate(&difficulty.config(), rng);
        Self::from_layout(difficulty, variant, layout)
    }

    pub fn from_layout(
        difficulty: Difficulty,
        variant: GameVariant,
        layout: FieldLayout,
    ) -> Self {
        let probabilities = ProbabilityMatrix::for_model(variant.probability_model(), &layout);
        Self {
            variant,
            difficulty,
            layout,
            probabilities,
            revealed: BTreeSet::new(),
            flagged: BTreeSet::new(),
            moves: 0,
            score: 0,
            boost_count: 0,
            state: SessionState::Playing,
            triggered_field: None,
        }
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn grid_size(&self) -> u8 {
        self.layout.size()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn revealed_count(&self) -> u16 {
        self.revealed.len() as u16
    }

    pub fn flagged_count(&self) -> u16 {
        self.flagged.len() as u16
    }

    pub fn total_safe_cells(&self) -> u16 {
        self.layout.safe_cell_count()
    }

    pub fn safe_cells_left(&self) -> u16 {
        self.total_safe_cells() - self.revealed_count()
    }

    pub fn field_count(&self) -> u16 {
        self.layout.field_count()
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn probability(&self, pos: Pos) -> f64 {
        self.probabilities.value(pos)
    }

    pub fn is_revealed(&self, pos: Pos) -> bool {
        self.revealed.contains(&pos)
    }

    pub fn is_flagged(&self, pos: Pos) -> bool {
        self.flagged.contains(&pos)
    }

    pub fn triggered_field(&self) -> Option<Pos> {
        self.triggered_field
    }

    pub fn adjacent_field_count(&self, pos: Pos) -> u8 {
        self.layout.adjacent_field_count(pos)
    }

    /// Active score-boost power-ups held by the player.
    pub fn boost_count(&self) -> u32 {
        self.boost_count
    }

    pub fn add_score_boost(&mut self) {
        self.boost_count += 1;
    }

    pub fn remove_score_boost(&mut self) {
        self.boost_count = self.boost_count.saturating_sub(1);
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.layout.validate(pos)?;
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if self.revealed.contains(&pos) || self.flagged.contains(&pos) {
            return Ok(RevealOutcome::NoChange);
        }

        self.revealed.insert(pos);
        self.moves += 1;

        if self.layout.contains_field(pos) {
            self.triggered_field = Some(pos);
            self.score = self.score.saturating_sub(score::FIELD_PENALTY);
            self.state = SessionState::Lost;
            return Ok(RevealOutcome::FieldHit);
        }

        let base = score::base_points(self.probability(pos));
        let points = match self.variant {
            GameVariant::Classic => base,
            GameVariant::Enhanced => score::enhanced_points(
                base,
                self.revealed_count(),
                self.total_safe_cells(),
                self.boost_count,
                self.difficulty,
            ),
        };
        self.score += points;

        if self.revealed_count() == self.total_safe_cells() {
            self.score += score::WIN_BONUS;
            self.state = SessionState::Won;
            Ok(RevealOutcome::Won { points })
        } else {
            Ok(RevealOutcome::Safe { points })
        }
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let pos = self.layout.validate(pos)?;
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if self.revealed.contains(&pos) {
            return Ok(FlagOutcome::NoChange);
        }

        if self.flagged.remove(&pos) {
            Ok(FlagOutcome::Unflagged)
        } else {
            self.flagged.insert(pos);
            Ok(FlagOutcome::Flagged)
        }
    }

    /// Winnings the current score would pay out against `bet`.
    pub fn current_winnings(&self, bet: f64) -> f64 {
        let combo_enabled = self.variant == GameVariant::Enhanced;
        score::winnings(
            bet,
            self.score,
            self.revealed_count(),
            self.total_safe_cells(),
            self.difficulty,
            self.boost_count,
            combo_enabled,
        )
    }

    pub fn can_cash_out(&self, bet: f64) -> bool {
        self.state == SessionState::Playing
            && self.revealed_count() > 0
            && self.current_winnings(bet) > 0.0
    }

    /// Banks the current winnings and ends the game.
    pub fn cash_out(&mut self, bet: f64) -> Result<f64> {
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if !self.can_cash_out(bet) {
            return Err(GameError::NothingToCashOut);
        }
        self.state = SessionState::CashedOut;
        Ok(self.current_winnings(bet))
    }

    /// Revealed cells as flat indices, the encoding `submitGameResult`
    /// expects.
    pub fn revealed_positions(&self) -> Vec<u32> {
        let size = self.grid_size();
        self.revealed
            .iter()
            .map(|&pos| crate::flat_index(pos, size))
            .collect()
    }

    /// Safe cells the player has not opened yet.
    pub fn safe_unrevealed(&self) -> Vec<Pos> {
        let size = self.grid_size();
        let mut cells = Vec::new();
        for row in 0..size {
            for col in 0..size {
                let pos = (row, col);
                if !self.layout.contains_field(pos) && !self.revealed.contains(&pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// Unrevealed, unflagged cells; hint targets are drawn from these.
    pub fn hintable_cells(&self) -> Vec<Pos> {
        let size = self.grid_size();
        let mut cells = Vec::new();
        for row in 0..size {
            for col in 0..size {
                let pos = (row, col);
                if !self.revealed.contains(&pos) && !self.flagged.contains(&pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: u8, fields: &[Pos], variant: GameVariant) -> GameSession {
        let layout = FieldLayout::from_cells(size, fields).unwrap();
        GameSession::from_layout(Difficulty::Medium, variant, layout)
    }

    #[test]
    fn revealing_a_field_always_loses() {
        let mut game = session(3, &[(1, 1)], GameVariant::Classic);

        let outcome = game.reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::FieldHit);
        assert_eq!(game.state(), SessionState::Lost);
        assert_eq!(game.triggered_field(), Some((1, 1)));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn field_penalty_comes_out_of_an_existing_score() {
        let mut game = session(3, &[(2, 2)], GameVariant::Classic);
        game.reveal((0, 0)).unwrap();
        let before = game.score();

        game.reveal((2, 2)).unwrap();

        assert_eq!(game.score(), before.saturating_sub(100));
    }

    #[test]
    fn revealing_every_safe_cell_wins_with_bonus() {
        let mut game = session(2, &[(0, 0)], GameVariant::Classic);

        assert_eq!(
            game.reveal((0, 1)).unwrap(),
            RevealOutcome::Safe {
                points: game.score()
            }
        );
        game.reveal((1, 0)).unwrap();
        let outcome = game.reveal((1, 1)).unwrap();

        assert!(matches!(outcome, RevealOutcome::Won { .. }));
        assert_eq!(game.state(), SessionState::Won);
        assert!(game.score() > score::WIN_BONUS);
    }

    #[test]
    fn reveal_after_game_over_is_an_error() {
        let mut game = session(3, &[(0, 0)], GameVariant::Classic);
        game.reveal((0, 0)).unwrap();

        assert_eq!(game.reveal((1, 1)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn flagged_cells_cannot_be_revealed() {
        let mut game = session(3, &[(0, 0)], GameVariant::Classic);
        game.toggle_flag((1, 1)).unwrap();

        assert_eq!(game.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn flags_toggle_and_skip_revealed_cells() {
        let mut game = session(3, &[(0, 0)], GameVariant::Classic);
        game.reveal((2, 2)).unwrap();

        assert_eq!(game.toggle_flag((2, 2)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::Unflagged);
    }

    #[test]
    fn cash_out_requires_progress() {
        let mut game = session(3, &[(0, 0)], GameVariant::Classic);
        assert!(!game.can_cash_out(1.0));
        assert_eq!(game.cash_out(1.0), Err(GameError::NothingToCashOut));

        game.reveal((1, 1)).unwrap();
        assert!(game.can_cash_out(1.0));
        let winnings = game.cash_out(1.0).unwrap();
        assert!(winnings > 0.0);
        assert_eq!(game.state(), SessionState::CashedOut);
        assert_eq!(game.cash_out(1.0), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn enhanced_variant_outscores_classic_on_the_same_board() {
        let fields = [(0, 0), (3, 3)];
        let mut classic = session(4, &fields, GameVariant::Classic);
        let mut enhanced = session(4, &fields, GameVariant::Enhanced);

        classic.reveal((1, 2)).unwrap();
        enhanced.reveal((1, 2)).unwrap();

        assert!(enhanced.score() > classic.score());
    }

    #[test]
    fn revealed_positions_use_flat_indices() {
        let mut game = session(4, &[(0, 0)], GameVariant::Classic);
        game.reveal((1, 2)).unwrap();
        game.reveal((0, 1)).unwrap();

        assert_eq!(game.revealed_positions(), vec![1, 6]);
    }

    #[test]
    fn out_of_bounds_reveal_is_rejected() {
        let mut game = session(3, &[(0, 0)], GameVariant::Classic);
        assert_eq!(game.reveal((3, 0)), Err(GameError::InvalidCell));
        assert_eq!(game.toggle_flag((0, 3)), Err(GameError::InvalidCell));
    }
}
