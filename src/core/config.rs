//! Rule configuration.
//!
//! A game is configured once at startup with a [`RuleConfig`]. The
//! variant fixes the seat count and the variant-dependent defaults;
//! every other knob is set with a `with_*` builder method.
//!
//! ```
//! use riichi_engine::core::{RuleConfig, Variant};
//!
//! let config = RuleConfig::new(Variant::ThreePlayer)
//!     .with_seed(7)
//!     .with_red_fives(false);
//! assert_eq!(config.player_count(), 3);
//! assert_eq!(config.starting_points, 35_000);
//! ```

use serde::{Deserialize, Serialize};

/// Table variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    FourPlayer,
    ThreePlayer,
}

impl Variant {
    #[must_use]
    pub const fn player_count(self) -> usize {
        match self {
            Variant::FourPlayer => 4,
            Variant::ThreePlayer => 3,
        }
    }

    #[must_use]
    pub const fn is_three_player(self) -> bool {
        matches!(self, Variant::ThreePlayer)
    }
}

/// Match length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchLength {
    /// East round only.
    Tonpuu,
    /// East and South rounds.
    #[default]
    Hanchan,
}

impl MatchLength {
    /// Number of round winds played before sudden death.
    #[must_use]
    pub const fn winds(self) -> usize {
        match self {
            MatchLength::Tonpuu => 1,
            MatchLength::Hanchan => 2,
        }
    }
}

/// Complete rule configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub variant: Variant,
    pub starting_points: i32,
    /// Points a player needs to end the match once the last regular
    /// kyoku is over.
    pub target_points: i32,
    pub match_length: MatchLength,
    pub red_fives: bool,
    /// Allow kyuushu kyuuhai on the first uninterrupted draw.
    pub kyuushu_allowed: bool,
    /// Abort the kyoku when three players ron the same discard.
    pub triple_ron_abort: bool,
    /// Extend into the next wind while nobody has reached `target_points`.
    pub sudden_death: bool,
    /// Call window timeout, reported to the host with each timer token.
    pub call_timeout_ms: u64,
    pub seed: u64,
}

impl RuleConfig {
    /// Defaults for the variant: 25000/30000 for four players,
    /// 35000/40000 for three.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        let (starting_points, target_points) = match variant {
            Variant::FourPlayer => (25_000, 30_000),
            Variant::ThreePlayer => (35_000, 40_000),
        };
        Self {
            variant,
            starting_points,
            target_points,
            match_length: MatchLength::Hanchan,
            red_fives: true,
            kyuushu_allowed: true,
            triple_ron_abort: false,
            sudden_death: true,
            call_timeout_ms: 10_000,
            seed: 0,
        }
    }

    #[must_use]
    pub fn four_player() -> Self {
        Self::new(Variant::FourPlayer)
    }

    #[must_use]
    pub fn three_player() -> Self {
        Self::new(Variant::ThreePlayer)
    }

    #[must_use]
    pub const fn player_count(&self) -> usize {
        self.variant.player_count()
    }

    #[must_use]
    pub fn with_starting_points(mut self, points: i32) -> Self {
        self.starting_points = points;
        self
    }

    #[must_use]
    pub fn with_target_points(mut self, points: i32) -> Self {
        self.target_points = points;
        self
    }

    #[must_use]
    pub fn with_match_length(mut self, length: MatchLength) -> Self {
        self.match_length = length;
        self
    }

    #[must_use]
    pub fn with_red_fives(mut self, enabled: bool) -> Self {
        self.red_fives = enabled;
        self
    }

    #[must_use]
    pub fn with_kyuushu(mut self, allowed: bool) -> Self {
        self.kyuushu_allowed = allowed;
        self
    }

    #[must_use]
    pub fn with_triple_ron_abort(mut self, enabled: bool) -> Self {
        self.triple_ron_abort = enabled;
        self
    }

    #[must_use]
    pub fn with_sudden_death(mut self, enabled: bool) -> Self {
        self.sudden_death = enabled;
        self
    }

    #[must_use]
    pub fn with_call_timeout_ms(mut self, ms: u64) -> Self {
        self.call_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::four_player()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_defaults() {
        let four = RuleConfig::four_player();
        assert_eq!(four.player_count(), 4);
        assert_eq!(four.starting_points, 25_000);
        assert_eq!(four.target_points, 30_000);
        assert!(!four.triple_ron_abort);

        let three = RuleConfig::three_player();
        assert_eq!(three.player_count(), 3);
        assert_eq!(three.starting_points, 35_000);
        assert_eq!(three.target_points, 40_000);
    }

    #[test]
    fn test_builder() {
        let config = RuleConfig::default()
            .with_seed(42)
            .with_match_length(MatchLength::Tonpuu)
            .with_triple_ron_abort(true)
            .with_kyuushu(false);
        assert_eq!(config.seed, 42);
        assert_eq!(config.match_length.winds(), 1);
        assert!(config.triple_ron_abort);
        assert!(!config.kyuushu_allowed);
    }
}
