use crate::Difficulty;

/// Flat bonus for clearing every safe cell.
pub const WIN_BONUS: u32 = 1000;

/// Score penalty for revealing a quantum field.
pub const FIELD_PENALTY: u32 = 100;

const PROGRESS_BONUS_SCALE: f64 = 500.0;
const SCORE_BOOST_FACTOR: f64 = 1.5;

/// Base points for a safe reveal: riskier-looking cells that turn out safe
/// are worth less than confident picks, floor of 50.
pub fn base_points(probability: f64) -> u32 {
    (100.0 * (1.0 - probability) + 50.0).round() as u32
}

/// Streak bonus keyed off the number of revealed cells so far.
pub fn combo_bonus(revealed: u16) -> u32 {
    if revealed >= 10 {
        200
    } else if revealed >= 5 {
        100
    } else if revealed >= 3 {
        50
    } else {
        0
    }
}

/// Enhanced per-reveal score: base points plus a progress bonus, scaled by
/// difficulty and any held score boosts, plus the combo bonus.
pub fn enhanced_points(
    base: u32,
    revealed: u16,
    total_safe: u16,
    boost_count: u32,
    difficulty: Difficulty,
) -> u32 {
    let mut score = f64::from(base);
    score += f64::from(revealed) / f64::from(total_safe.max(1)) * PROGRESS_BONUS_SCALE;
    score *= 1.0 + difficulty.config().field_probability * 2.0;
    score *= SCORE_BOOST_FACTOR.powi(boost_count as i32);
    score += f64::from(combo_bonus(revealed));
    score.round() as u32
}

/// Winnings multiplier product; every factor has a floor so early cash-outs
/// stay worth something.
pub fn winnings(
    bet: f64,
    score: u32,
    revealed: u16,
    total_safe: u16,
    difficulty: Difficulty,
    boost_count: u32,
    combo_enabled: bool,
) -> f64 {
    if revealed == 0 {
        return 0.0;
    }

    let score_multiplier = (f64::from(score) / 1000.0).max(0.1);
    let progress_multiplier = (f64::from(revealed) / f64::from(total_safe.max(1))).max(0.1);
    let difficulty_multiplier = difficulty.config().field_probability + 0.5;
    let power_up_multiplier = SCORE_BOOST_FACTOR.powi(boost_count as i32);
    let combo_multiplier = if combo_enabled && revealed >= 10 {
        1.2
    } else {
        1.0
    };

    let total = score_multiplier
        * progress_multiplier
        * difficulty_multiplier
        * power_up_multiplier
        * combo_multiplier;
    (bet * total).max(0.0)
}
