//! Password strength heuristic.

use std::fmt;

/// Coarse password strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    /// Two or fewer criteria met.
    Weak,
    /// Three or four criteria met.
    Moderate,
    /// All five criteria met.
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
        })
    }
}

/// Minimum length counted as one criterion.
pub const MIN_LENGTH: usize = 8;

/// Number of criteria `password` satisfies: length of at least
/// [`MIN_LENGTH`] characters, a digit, an uppercase letter, a lowercase
/// letter, and a symbol (anything neither alphanumeric nor whitespace).
pub fn criteria_met(password: &str) -> usize {
    let checks = [
        password.chars().count() >= MIN_LENGTH,
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(char::is_uppercase),
        password.chars().any(char::is_lowercase),
        password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    ];
    checks.iter().filter(|&&met| met).count()
}

/// Scores `password`.
pub fn score_password(password: &str) -> Strength {
    match criteria_met(password) {
        0..=2 => Strength::Weak,
        3..=4 => Strength::Moderate,
        _ => Strength::Strong,
    }
}
