//! Rarity-weighted random level selection.
//!
//! A rating tier is drawn from a fixed table that heavily favours the
//! lowest tiers, then clamped onto the 1-20 level range.

use crate::class_data::MAX_LEVEL;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

/// Rating given to sheets whose level was chosen by the player.
pub const UNRATED: &str = "UNDEFINED";

/// Rating tiers, lowest first.
pub const RATINGS: [&str; 33] = [
    "0", "1/8", "1/4", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14",
    "15", "16", "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30",
];

/// Un-normalized draw weight for each entry of [`RATINGS`].
pub const RATING_WEIGHTS: [f64; 33] = [
    57.9887, 23.1955, 11.5977, 2.8994, 1.2886, 0.8284, 0.5272, 0.3222, 0.2521, 0.2000, 0.1487,
    0.1160, 0.0983, 0.0805, 0.0690, 0.0580, 0.0504, 0.0446, 0.0387, 0.0322, 0.0290, 0.0264,
    0.0232, 0.0176, 0.0141, 0.0116, 0.0094, 0.0077, 0.0064, 0.0055, 0.0048, 0.0043, 0.0037,
];

/// Map a rating label to a level. Fractional tiers and "0" become level 1,
/// tiers above 20 become level 20.
pub fn level_for_rating(rating: &str) -> u8 {
    match rating.parse::<u32>() {
        Ok(tier) => tier.clamp(1, MAX_LEVEL as u32) as u8,
        Err(_) => 1,
    }
}

/// Draw a `(rating, level)` pair.
pub fn sample_level<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, u8) {
    let index = match WeightedIndex::new(RATING_WEIGHTS) {
        Ok(weights) => weights.sample(rng),
        // The weight table is a positive constant.
        Err(_) => 0,
    };
    let rating = RATINGS[index];
    let level = level_for_rating(rating);
    debug!(rating, level, "sampled rarity level");
    (rating, level)
}
