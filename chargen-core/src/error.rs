//! Errors surfaced by character generation.

use crate::class_data::RulesError;
use thiserror::Error;

/// Errors from a single generation request.
///
/// Every variant is fatal for the request: no partially filled sheet is
/// ever returned.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The class has no entry in the class rules table.
    #[error("No class rules for class {0:?}")]
    UnknownClass(String),

    /// The class has no entry in the subclass table.
    #[error("No subclasses defined for class {0:?}")]
    MissingSubclasses(String),

    /// A required catalog was supplied empty.
    #[error("The {0} catalog is empty")]
    EmptyCatalog(&'static str),

    /// Not enough distinct spells to fill a bucket.
    #[error(
        "Spell pool exhausted for {class} at rank {rank}: need {required}, {available} eligible"
    )]
    SpellPoolExhausted {
        class: String,
        rank: usize,
        required: usize,
        available: usize,
    },

    /// The school coin kept landing on an empty side.
    #[error("Gave up picking {class} spells at rank {rank} after {attempts} attempts")]
    SpellSelectionStalled {
        class: String,
        rank: usize,
        attempts: usize,
    },

    /// No catalog item matches the class proficiencies for a slot.
    #[error("No {slot} in the equipment catalog matches proficiencies {proficiencies:?}")]
    EquipmentPoolExhausted {
        slot: &'static str,
        proficiencies: Vec<String>,
    },

    #[error("Level {0} is outside 1-20")]
    InvalidLevel(u8),

    #[error("Alignment {0} is not a finite number")]
    InvalidAlignment(f64),

    #[error("Rules error: {0}")]
    Rules(#[from] RulesError),
}
