//! Per-class rules: proficiencies, hit dice, spell slot tables, and the
//! subclass table.
//!
//! Both tables are declarative JSON. The built-in copies live in `data/`
//! and are parsed and validated once, when a [`Ruleset`] is built.

use crate::dice::DieType;
use crate::equipment::ItemType;
use crate::subclass::{Subclass, SubclassTable};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub const BUILTIN_CLASSES: &str = include_str!("../data/classes.json");
pub const BUILTIN_SUBCLASSES: &str = include_str!("../data/subclasses.json");

/// Highest supported character level.
pub const MAX_LEVEL: u8 = 20;

/// Spell slots by rank: index 0 is cantrips, 1-9 are spell levels.
pub type SlotTable = [u8; 10];

/// Errors from parsing or validating rules tables.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Class {class} has invalid hit die d{sides}")]
    InvalidHitDie { class: String, sides: u32 },

    #[error("Class {class} has a slot table for level {level}, outside 1-20")]
    InvalidSlotLevel { class: String, level: u8 },

    #[error("Class {0} is defined twice")]
    DuplicateClass(String),

    #[error("Class {0} has an empty subclass list")]
    EmptySubclasses(String),

    #[error("Subclass {class}/{subclass} has alignment {alignment}, outside [-1, 1]")]
    AlignmentOutOfRange {
        class: String,
        subclass: String,
        alignment: f64,
    },
}

#[derive(Debug, Deserialize)]
struct ClassRulesRecord {
    name: String,
    hit_die: u32,
    #[serde(default)]
    cantrips: bool,
    #[serde(default)]
    weapon_proficiencies: Vec<ItemType>,
    #[serde(default)]
    armor_proficiencies: Vec<ItemType>,
    #[serde(default)]
    spell_slots: BTreeMap<u8, SlotTable>,
}

/// Fixed rules for one class.
#[derive(Debug, Clone)]
pub struct ClassRules {
    pub name: String,
    pub hit_die: DieType,
    /// Whether the class learns cantrips at all.
    pub cantrips: bool,
    pub weapon_proficiencies: Vec<ItemType>,
    pub armor_proficiencies: Vec<ItemType>,
    spell_slots: BTreeMap<u8, SlotTable>,
}

impl ClassRules {
    /// Slot table at `level`. Levels without an entry have no slots.
    pub fn slots_at(&self, level: u8) -> SlotTable {
        self.spell_slots.get(&level).copied().unwrap_or([0; 10])
    }

    fn from_record(record: ClassRulesRecord) -> Result<Self, RulesError> {
        let hit_die =
            DieType::from_sides(record.hit_die).ok_or_else(|| RulesError::InvalidHitDie {
                class: record.name.clone(),
                sides: record.hit_die,
            })?;

        if let Some(&level) = record
            .spell_slots
            .keys()
            .find(|&&level| level == 0 || level > MAX_LEVEL)
        {
            return Err(RulesError::InvalidSlotLevel {
                class: record.name,
                level,
            });
        }

        Ok(Self {
            name: record.name,
            hit_die,
            cantrips: record.cantrips,
            weapon_proficiencies: record.weapon_proficiencies,
            armor_proficiencies: record.armor_proficiencies,
            spell_slots: record.spell_slots,
        })
    }
}

/// Class rules keyed by class name.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassRules>,
}

impl ClassRegistry {
    /// Parse and validate a JSON array of class rules.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let records: Vec<ClassRulesRecord> = serde_json::from_str(json)?;
        let mut classes = HashMap::with_capacity(records.len());
        for record in records {
            let rules = ClassRules::from_record(record)?;
            if classes.contains_key(&rules.name) {
                return Err(RulesError::DuplicateClass(rules.name));
            }
            classes.insert(rules.name.clone(), rules);
        }
        Ok(Self { classes })
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassRules> {
        self.classes.get(class_name)
    }

    /// Supported class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Everything the generator knows about classes beyond the class catalog.
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub classes: ClassRegistry,
    pub subclasses: SubclassTable,
}

impl Ruleset {
    /// The tables shipped with the crate.
    pub fn builtin() -> Result<Self, RulesError> {
        Self::from_json(BUILTIN_CLASSES, BUILTIN_SUBCLASSES)
    }

    pub fn from_json(classes: &str, subclasses: &str) -> Result<Self, RulesError> {
        Ok(Self {
            classes: ClassRegistry::from_json(classes)?,
            subclasses: SubclassTable::from_json(subclasses)?,
        })
    }

    pub fn class(&self, class_name: &str) -> Option<&ClassRules> {
        self.classes.get(class_name)
    }

    pub fn subclasses(&self, class_name: &str) -> Option<&[Subclass]> {
        self.subclasses.get(class_name)
    }
}
