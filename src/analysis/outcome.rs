use serde::Serialize;

/// Result of a match from the user's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::Win
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "W"),
            Outcome::Loss => write!(f, "L"),
            Outcome::Draw => write!(f, "D"),
        }
    }
}

/// Percentage of `wins` over `played`, 0 when nothing was played.
pub fn win_rate(wins: u32, played: u32) -> f64 {
    if played == 0 {
        0.0
    } else {
        wins as f64 / played as f64 * 100.0
    }
}

pub fn average(total: u32, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Longest win and loss runs over a chronological sequence.
///
/// An outcome change resets the opposite counter; a draw resets both.
pub fn longest_streaks<I>(outcomes: I) -> (u32, u32)
where
    I: IntoIterator<Item = Outcome>,
{
    let mut longest_win = 0u32;
    let mut longest_loss = 0u32;
    let mut wins = 0u32;
    let mut losses = 0u32;

    for outcome in outcomes {
        match outcome {
            Outcome::Win => {
                wins += 1;
                losses = 0;
                longest_win = longest_win.max(wins);
            }
            Outcome::Loss => {
                losses += 1;
                wins = 0;
                longest_loss = longest_loss.max(losses);
            }
            Outcome::Draw => {
                wins = 0;
                losses = 0;
            }
        }
    }

    (longest_win, longest_loss)
}

/// Signed run ending at the most recent outcome: positive for wins,
/// negative for losses, 0 when the latest match was a draw.
pub fn current_streak(chronological: &[Outcome]) -> i32 {
    let Some(&latest) = chronological.last() else {
        return 0;
    };
    if latest == Outcome::Draw {
        return 0;
    }

    let run = chronological
        .iter()
        .rev()
        .take_while(|&&o| o == latest)
        .count() as i32;

    if latest == Outcome::Win {
        run
    } else {
        -run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::{Draw, Loss, Win};

    #[test]
    fn test_longest_streaks_reset_on_change() {
        assert_eq!(longest_streaks([Win, Win, Loss, Win, Win, Win]), (3, 1));
    }

    #[test]
    fn test_draw_breaks_both_runs() {
        assert_eq!(longest_streaks([Win, Win, Draw, Win, Loss, Draw, Loss]), (2, 1));
    }

    #[test]
    fn test_current_streak_sign() {
        assert_eq!(current_streak(&[Loss, Win, Win, Win]), 3);
        assert_eq!(current_streak(&[Win, Loss, Loss]), -2);
        assert_eq!(current_streak(&[Win, Draw]), 0);
        assert_eq!(current_streak(&[Draw, Win]), 1);
        assert_eq!(current_streak(&[]), 0);
    }

    #[test]
    fn test_win_rate_bounds() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate(1, 2), 50.0);
        assert_eq!(win_rate(3, 3), 100.0);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(66.666), 66.7);
        assert_eq!(round_one_decimal(80.0), 80.0);
    }
}
