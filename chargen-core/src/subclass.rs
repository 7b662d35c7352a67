//! Subclass table and alignment-weighted subclass selection.

use crate::class_data::RulesError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::debug;

/// Standard deviation of the alignment weighting.
pub const DEFAULT_ALIGNMENT_SCALE: f64 = 0.5;

/// School sentinel meaning "no preference".
pub const RANDOM_SCHOOL: &str = "Random";

/// A subclass definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subclass {
    pub name: String,
    /// Matching coordinate in [-1, 1].
    pub alignment: f64,
    #[serde(default)]
    pub spell_school: Option<String>,
    #[serde(default)]
    pub caster: bool,
    /// Manual follow-up for the player, e.g. "Roll origin".
    #[serde(default)]
    pub notice: Option<String>,
}

/// Which spells a caster subclass leans toward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchoolPreference {
    Random,
    School(String),
}

impl Subclass {
    pub fn school_preference(&self) -> SchoolPreference {
        match self.spell_school.as_deref() {
            None | Some(RANDOM_SCHOOL) => SchoolPreference::Random,
            Some(school) => SchoolPreference::School(school.to_string()),
        }
    }
}

/// Subclasses keyed by class name, in table order.
#[derive(Debug, Clone, Default)]
pub struct SubclassTable {
    by_class: HashMap<String, Vec<Subclass>>,
}

impl SubclassTable {
    /// Parse and validate a JSON object mapping class name to subclasses.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let by_class: HashMap<String, Vec<Subclass>> = serde_json::from_str(json)?;
        for (class, subclasses) in &by_class {
            if subclasses.is_empty() {
                return Err(RulesError::EmptySubclasses(class.clone()));
            }
            if let Some(bad) = subclasses
                .iter()
                .find(|s| !(-1.0..=1.0).contains(&s.alignment))
            {
                return Err(RulesError::AlignmentOutOfRange {
                    class: class.clone(),
                    subclass: bad.name.clone(),
                    alignment: bad.alignment,
                });
            }
        }
        Ok(Self { by_class })
    }

    pub fn get(&self, class_name: &str) -> Option<&[Subclass]> {
        self.by_class.get(class_name).map(Vec::as_slice)
    }
}

/// Relative draw weights for `candidates` around `target`.
///
/// Proportional to the normal density, computed relative to the closest
/// candidate so the nearest one has weight 1. Weights never drop to zero,
/// however far a candidate sits from the target.
pub fn alignment_weights(target: f64, candidates: &[Subclass], scale: f64) -> Vec<f64> {
    let exponents: Vec<f64> = candidates
        .iter()
        .map(|s| {
            let z = (s.alignment - target) / scale;
            -0.5 * z * z
        })
        .collect();
    let peak = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    exponents
        .into_iter()
        .map(|e| (e - peak).exp().max(f64::MIN_POSITIVE))
        .collect()
}

/// Draw one subclass, favouring those whose alignment is near `target`.
///
/// Returns `None` for an empty candidate list or a non-finite target.
pub fn select_subclass<'a, R: Rng + ?Sized>(
    target: f64,
    candidates: &'a [Subclass],
    scale: f64,
    rng: &mut R,
) -> Option<&'a Subclass> {
    if candidates.is_empty() || !target.is_finite() {
        return None;
    }
    let weights = alignment_weights(target, candidates, scale);
    let index = WeightedIndex::new(&weights).ok()?;
    let chosen = &candidates[index.sample(rng)];
    debug!(target, subclass = %chosen.name, "selected subclass");
    Some(chosen)
}
