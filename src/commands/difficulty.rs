//! The FE2 round-difficulty calculator. Pure arithmetic, nothing to do with
//! the music machinery; it lives here because the community asked for it.

use std::fmt;

use crate::types::{Context, Error};
use crate::util::check_reply;

pub struct DifficultyInput {
    /// The listed rating, `1.0..=5.99`.
    pub current: f64,
    /// Surviving players, or the survivor fraction when `total` is absent.
    pub survivors: f64,
    pub total: Option<u32>,
    pub boosts_2x: u32,
    pub boosts_1x: u32,
}

#[derive(Debug, PartialEq)]
pub enum PlayerRequirement {
    Players(u32),
    Impossible(&'static str),
}

impl fmt::Display for PlayerRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Players(count) => write!(f, "{count}"),
            Self::Impossible(reason) => write!(f, "IMPOSSIBLE | {reason}"),
        }
    }
}

pub struct DifficultyReport {
    pub minimum: f64,
    pub maximum: f64,
    pub probable: f64,
    pub to_hold: PlayerRequirement,
    pub to_raise: PlayerRequirement,
}

/// Per-tier difficulty drop applied between rounds before boosts and
/// survivor percentage are added back.
fn tier_drop(base: u32) -> Option<f64> {
    match base {
        1 => Some(0.4),
        2 => Some(0.5),
        3 => Some(0.6),
        4 => Some(0.65),
        5 => Some(1.5),
        _ => None,
    }
}

pub fn calculate(input: &DifficultyInput) -> Result<DifficultyReport, String> {
    let base = input.current.floor();
    if !(1.0..=5.0).contains(&base) {
        return Err("difficulty rating must be between 1.0 and 5.99".to_string());
    }
    let base = base as u32;
    let drop = tier_drop(base).expect("base checked to be 1..=5");

    // Boost "stacks": a 2x boost is worth two, five stacks maximum.
    if 2 * input.boosts_2x + input.boosts_1x > 5 {
        return Err("amount of boosts is greater than the maximum of 5 stacks".to_string());
    }

    let boost = input.boosts_2x as f64 + input.boosts_1x as f64 * 0.5;

    let percentage = match input.total {
        Some(0) => return Err("total amount of players cannot be zero".to_string()),
        Some(total) => (input.survivors / total as f64 * 100.0).round() / 100.0,
        None => input.survivors,
    };
    if percentage > 1.0 {
        return Err("players survived greater than players total".to_string());
    }
    if percentage < 0.0 {
        return Err("survivor count cannot be negative".to_string());
    }

    let shift = |survived: f64| input.current - drop + boost + survived;
    let minimum = shift(0.0);
    let maximum = shift(1.0);
    let probable = shift(percentage);

    let (to_hold, to_raise) = match input.total {
        None => (
            PlayerRequirement::Impossible("total amount of players not given"),
            PlayerRequirement::Impossible("total amount of players not given"),
        ),
        Some(total) => {
            let per_player = 1.0 / total as f64;

            let holding_gap = base as f64 - minimum;
            let to_hold = {
                let needed = (holding_gap / per_player).ceil();
                if needed > total as f64 {
                    PlayerRequirement::Impossible("round will drop in difficulty")
                } else {
                    PlayerRequirement::Players(needed.max(0.0) as u32)
                }
            };

            let to_raise = if base == 5 {
                PlayerRequirement::Impossible("max difficulty reached")
            } else {
                let raising_gap = (base + 1) as f64 - minimum;
                let needed = (raising_gap / per_player).ceil();
                if needed > total as f64 {
                    PlayerRequirement::Impossible(
                        "round will stay at or drop below current difficulty",
                    )
                } else {
                    PlayerRequirement::Players(needed.max(0.0) as u32)
                }
            };

            (to_hold, to_raise)
        }
    };

    Ok(DifficultyReport {
        minimum,
        maximum,
        probable,
        to_hold,
        to_raise,
    })
}

/// Calculates the minimum, maximum and probable intensities of the next FE2 round.
///
/// Pass the survivor fraction directly by leaving out the total.
#[poise::command(slash_command, prefix_command, aliases("diff", "calc", "fe2"))]
pub async fn calculate_difficulty(
    ctx: Context<'_>,
    #[description = "The listed difficulty rating, 1.0-5.99"] current_difficulty: f64,
    #[description = "Surviving players, or the survivor fraction if no total is given"]
    survivors: f64,
    #[description = "Total players in the round, 1-16"] players_total: Option<u32>,
    #[description = "Boosts with 2x intensity boosting, 0-2"] intensity_2x: Option<u32>,
    #[description = "Boosts with 1x intensity boosting, 0-5"] intensity_1x: Option<u32>,
) -> Result<(), Error> {
    let input = DifficultyInput {
        current: current_difficulty,
        survivors,
        total: players_total,
        boosts_2x: intensity_2x.unwrap_or(0),
        boosts_1x: intensity_1x.unwrap_or(0),
    };

    match calculate(&input) {
        Ok(report) => {
            check_reply(
                ctx.say(format!(
                    "*Minimum Difficulty: {:.2}*\n*Maximum Difficulty: {:.2}*\n\
                     **Probable Difficulty:** `{:.2}`\n\
                     __Players needed to survive to keep difficulty:__ `{}`\n\
                     __Players needed to survive to increase difficulty:__ `{}`",
                    report.minimum, report.maximum, report.probable, report.to_hold, report.to_raise
                ))
                .await,
            );
        }
        Err(reason) => {
            check_reply(
                ctx.say(format!(
                    "One or more arguments are invalid. Please try again | {reason}"
                ))
                .await,
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(current: f64, survivors: f64, total: Option<u32>, b2: u32, b1: u32) -> DifficultyInput {
        DifficultyInput {
            current,
            survivors,
            total,
            boosts_2x: b2,
            boosts_1x: b1,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn midround_without_boosts() {
        let report = calculate(&input(3.4, 8.0, Some(16), 0, 0)).unwrap();

        assert!(close(report.minimum, 2.8));
        assert!(close(report.maximum, 3.8));
        assert!(close(report.probable, 3.3));
        assert_eq!(report.to_hold, PlayerRequirement::Players(4));
        assert_eq!(
            report.to_raise,
            PlayerRequirement::Impossible("round will stay at or drop below current difficulty")
        );
    }

    #[test]
    fn boosts_raise_the_floor() {
        let no_boost = calculate(&input(2.0, 0.5, None, 0, 0)).unwrap();
        let boosted = calculate(&input(2.0, 0.5, None, 1, 1)).unwrap();

        assert!(close(boosted.minimum - no_boost.minimum, 1.5));
        assert!(close(boosted.probable - no_boost.probable, 1.5));
    }

    #[test]
    fn fraction_mode_skips_player_requirements() {
        let report = calculate(&input(4.2, 0.75, None, 0, 0)).unwrap();

        assert!(close(report.probable, 4.2 - 0.65 + 0.75));
        assert_eq!(
            report.to_hold,
            PlayerRequirement::Impossible("total amount of players not given")
        );
    }

    #[test]
    fn max_tier_cannot_raise() {
        let report = calculate(&input(5.5, 16.0, Some(16), 0, 0)).unwrap();
        assert_eq!(
            report.to_raise,
            PlayerRequirement::Impossible("max difficulty reached")
        );
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(calculate(&input(0.5, 1.0, Some(2), 0, 0)).is_err());
        assert!(calculate(&input(6.2, 1.0, Some(2), 0, 0)).is_err());
        assert!(calculate(&input(3.0, 5.0, Some(4), 0, 0)).is_err());
        assert!(calculate(&input(3.0, 2.0, Some(4), 2, 2)).is_err());
        assert!(calculate(&input(3.0, 2.0, Some(0), 0, 0)).is_err());
    }
}
