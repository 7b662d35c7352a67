//! Spell catalog records and per-slot spell selection.

use crate::class_data::SlotTable;
use crate::error::GenerateError;
use crate::sampling::chance;
use crate::subclass::SchoolPreference;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// Level string used by the catalog for cantrips.
pub const CANTRIP: &str = "cantrip";

/// Number of spell ranks, cantrips included.
pub const RANKS: usize = 10;

/// A spell as supplied by the spell catalog.
///
/// Only `name`, `level`, `school` and `classes` drive selection; the rest
/// is carried through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    /// "cantrip" or "1" through "9".
    pub level: String,
    pub school: String,
    /// Lower-cased names of the classes that may learn the spell.
    pub classes: Vec<String>,
    #[serde(default)]
    pub casting_time: String,
    #[serde(default)]
    pub components: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub higher_levels: Option<String>,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub ritual: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "type")]
    pub spell_type: String,
}

impl Spell {
    /// Slot rank of the spell: 0 for cantrips, otherwise its level.
    pub fn rank(&self) -> Option<usize> {
        if self.level.eq_ignore_ascii_case(CANTRIP) {
            return Some(0);
        }
        match self.level.trim().parse::<usize>() {
            Ok(level) if (1..RANKS).contains(&level) => Some(level),
            _ => None,
        }
    }

    pub fn is_available_to(&self, class_name: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.eq_ignore_ascii_case(class_name))
    }

    pub fn is_school(&self, school: &str) -> bool {
        self.school.eq_ignore_ascii_case(school)
    }
}

/// Chosen spell names, bucketed by rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSelection {
    ranks: [Vec<String>; RANKS],
}

impl SpellSelection {
    pub fn cantrips(&self) -> &[String] {
        &self.ranks[0]
    }

    /// Spells of one rank; empty for ranks past 9.
    pub fn rank(&self, rank: usize) -> &[String] {
        self.ranks.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bucket sizes, comparable with a [`SlotTable`].
    pub fn counts(&self) -> SlotTable {
        std::array::from_fn(|i| self.ranks[i].len() as u8)
    }

    pub fn total(&self) -> usize {
        self.ranks.iter().map(Vec::len).sum()
    }

    /// `(rank, names)` for every non-empty bucket.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.ranks
            .iter()
            .enumerate()
            .filter(|(_, names)| !names.is_empty())
            .map(|(rank, names)| (rank, names.as_slice()))
    }
}

/// Knobs for [`select_spells`].
#[derive(Debug, Clone, Copy)]
pub struct SpellPicking {
    /// Chance that a pick is restricted to the preferred school.
    pub school_chance: f64,
    /// Upper bound on coin flips per bucket before giving up.
    pub max_attempts: usize,
}

/// Fill every bucket of `slots` with distinct spells the class can learn.
///
/// With a preferred school, each pick first flips a coin to look either
/// inside or outside that school, and re-flips when that side is empty.
/// Fails fast when a rank does not have enough distinct eligible spells.
pub fn select_spells<R: Rng + ?Sized>(
    class_name: &str,
    preference: &SchoolPreference,
    slots: &SlotTable,
    catalog: &[Spell],
    picking: SpellPicking,
    rng: &mut R,
) -> Result<SpellSelection, GenerateError> {
    let mut selection = SpellSelection::default();

    for (rank, &required) in slots.iter().enumerate() {
        let required = required as usize;
        if required == 0 {
            continue;
        }

        let eligible: Vec<&Spell> = catalog
            .iter()
            .filter(|s| s.rank() == Some(rank) && s.is_available_to(class_name))
            .collect();
        let available = eligible
            .iter()
            .map(|s| s.name.as_str())
            .collect::<HashSet<_>>()
            .len();
        if available < required {
            return Err(GenerateError::SpellPoolExhausted {
                class: class_name.to_string(),
                rank,
                required,
                available,
            });
        }

        selection.ranks[rank] = fill_bucket(
            class_name, rank, required, &eligible, preference, picking, rng,
        )?;
    }

    debug!(class = class_name, counts = ?selection.counts(), "selected spells");
    Ok(selection)
}

fn fill_bucket<R: Rng + ?Sized>(
    class_name: &str,
    rank: usize,
    required: usize,
    eligible: &[&Spell],
    preference: &SchoolPreference,
    picking: SpellPicking,
    rng: &mut R,
) -> Result<Vec<String>, GenerateError> {
    let mut bucket: Vec<String> = Vec::with_capacity(required);
    let mut attempts = 0;

    while bucket.len() < required {
        let pool: Vec<&Spell> = eligible
            .iter()
            .copied()
            .filter(|s| !bucket.contains(&s.name))
            .collect();

        let pick = match preference {
            SchoolPreference::Random => pool.choose(rng).copied(),
            SchoolPreference::School(school) => {
                attempts += 1;
                if attempts > picking.max_attempts {
                    return Err(GenerateError::SpellSelectionStalled {
                        class: class_name.to_string(),
                        rank,
                        attempts: picking.max_attempts,
                    });
                }
                let in_school = chance(rng, picking.school_chance);
                let side: Vec<&Spell> = pool
                    .iter()
                    .copied()
                    .filter(|s| s.is_school(school) == in_school)
                    .collect();
                if side.is_empty() {
                    trace!(rank, in_school, "no spells on this side of the school, re-flipping");
                    continue;
                }
                side.choose(rng).copied()
            }
        };

        match pick {
            Some(spell) => bucket.push(spell.name.clone()),
            None => {
                return Err(GenerateError::SpellPoolExhausted {
                    class: class_name.to_string(),
                    rank,
                    required,
                    available: bucket.len(),
                })
            }
        }
    }

    Ok(bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_spells, spell};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const PICKING: SpellPicking = SpellPicking {
        school_chance: 0.5,
        max_attempts: 10_000,
    };

    fn school(name: &str) -> SchoolPreference {
        SchoolPreference::School(name.to_string())
    }

    #[test]
    fn test_rank_parsing() {
        assert_eq!(spell("A", "cantrip", "evocation", &["wizard"]).rank(), Some(0));
        assert_eq!(spell("B", "3", "evocation", &["wizard"]).rank(), Some(3));
        assert_eq!(spell("C", "10", "evocation", &["wizard"]).rank(), None);
        assert_eq!(spell("D", "x", "evocation", &["wizard"]).rank(), None);
    }

    #[test]
    fn test_fills_slots_with_distinct_eligible_spells() {
        let catalog = sample_spells();
        let slots = [3, 2, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..100 {
            let selection =
                select_spells("Wizard", &SchoolPreference::Random, &slots, &catalog, PICKING, &mut rng)
                    .unwrap();
            assert_eq!(selection.counts(), slots);

            for (rank, names) in selection.iter() {
                let unique: HashSet<_> = names.iter().collect();
                assert_eq!(unique.len(), names.len(), "duplicate in rank {rank}");
                for name in names {
                    let spell = catalog.iter().find(|s| &s.name == name).unwrap();
                    assert_eq!(spell.rank(), Some(rank));
                    assert!(spell.is_available_to("wizard"));
                }
            }
        }
    }

    #[test]
    fn test_school_preference_still_fills() {
        let catalog = sample_spells();
        let slots = [3, 4, 2, 0, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        for _ in 0..100 {
            let selection =
                select_spells("Wizard", &school("Evocation"), &slots, &catalog, PICKING, &mut rng)
                    .unwrap();
            assert_eq!(selection.counts(), slots);
        }
    }

    #[test]
    fn test_school_preference_biases_picks() {
        // Two evocation cantrips among six: unbiased would pick one a third
        // of the time, the half-and-half coin makes it a half.
        let catalog: Vec<Spell> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let school = if i < 2 { "evocation" } else { "illusion" };
                spell(name, "cantrip", school, &["wizard"])
            })
            .collect();
        let slots = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut evocation = 0;
        for _ in 0..4000 {
            let selection =
                select_spells("Wizard", &school("Evocation"), &slots, &catalog, PICKING, &mut rng)
                    .unwrap();
            if ["a", "b"].contains(&selection.cantrips()[0].as_str()) {
                evocation += 1;
            }
        }
        let share = evocation as f64 / 4000.0;
        assert!((share - 0.5).abs() < 0.05, "evocation share {share}");
    }

    #[test]
    fn test_empty_school_side_reflips() {
        // No abjuration spells at all: every pick must come from the
        // "not abjuration" side without falling back or stalling.
        let catalog = sample_spells();
        let slots = [2, 2, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let selection =
            select_spells("Wizard", &school("Abjuration"), &slots, &catalog, PICKING, &mut rng)
                .unwrap();
        assert_eq!(selection.counts(), slots);
    }

    #[test]
    fn test_pool_exhausted_fails_fast() {
        let catalog = sample_spells();
        let slots = [0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        let result =
            select_spells("Artificer", &school("Evocation"), &slots, &catalog, PICKING, &mut rng);
        match result {
            Err(GenerateError::SpellPoolExhausted {
                class,
                rank,
                required,
                available,
            }) => {
                assert_eq!(class, "Artificer");
                assert_eq!(rank, 9);
                assert_eq!(required, 1);
                assert_eq!(available, 0);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_only_eligible_classes() {
        let catalog = vec![
            spell("Sacred Flame", "cantrip", "evocation", &["cleric"]),
            spell("Fire Bolt", "cantrip", "evocation", &["wizard", "sorcerer"]),
        ];
        let slots = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(26);
        let selection =
            select_spells("Cleric", &SchoolPreference::Random, &slots, &catalog, PICKING, &mut rng)
                .unwrap();
        assert_eq!(selection.cantrips(), ["Sacred Flame".to_string()]);

        let slots = [2, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(select_spells(
            "Cleric",
            &SchoolPreference::Random,
            &slots,
            &catalog,
            PICKING,
            &mut rng
        )
        .is_err());
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let catalog = sample_spells();
        let slots = [3, 4, 2, 0, 0, 0, 0, 0, 0, 0];
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            select_spells("Wizard", &school("Illusion"), &slots, &catalog, PICKING, &mut rng)
                .unwrap()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_attempt_bound() {
        let catalog = sample_spells();
        let slots = [3, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let picking = SpellPicking {
            school_chance: 0.5,
            max_attempts: 0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(27);
        let result = select_spells("Wizard", &school("Evocation"), &slots, &catalog, picking, &mut rng);
        assert!(matches!(
            result,
            Err(GenerateError::SpellSelectionStalled { rank: 0, .. })
        ));
    }
}
