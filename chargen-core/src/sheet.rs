//! The generated character sheet and its derived statistics.

use crate::abilities::{Ability, AbilityScores, ROLL_ORDER};
use crate::catalog::{Class, Feat, Race};
use crate::dice::{DicePool, DieType};
use crate::equipment::Loadout;
use crate::spells::SpellSelection;
use crate::subclass::Subclass;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{Builder, Uuid};

/// Unique identifier for a generated sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetId(pub Uuid);

impl SheetId {
    /// A random v4 id drawn from `rng`, so seeded runs repeat exactly.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete generated character.
///
/// Only the rolled and chosen values are stored. Effective scores,
/// modifiers and hit points are computed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub level: u8,
    /// Rarity label the level came from, or "UNDEFINED" for a fixed level.
    pub rating: String,
    pub name: String,
    pub race: Race,
    pub class: Class,
    pub subclass: Subclass,
    /// Present exactly when the subclass is a caster.
    pub spells: Option<SpellSelection>,
    pub loadout: Loadout,
    /// Base rolls before racial bonuses.
    pub scores: AbilityScores,
    pub feat: Feat,
    pub hit_die: DieType,
}

impl Sheet {
    /// Effective score: base roll plus racial bonus, unclamped.
    ///
    /// Catalog bonuses are free-form, so the sum may leave the 1-30 range;
    /// the sheet reports it as is.
    pub fn score(&self, ability: Ability) -> i16 {
        i16::from(self.scores.get(ability)) + i16::from(self.race.bonuses.get(ability))
    }

    pub fn modifier(&self, ability: Ability) -> i16 {
        (self.score(ability) - 10).div_euclid(2)
    }

    pub fn proficiency_bonus(&self) -> u8 {
        2 + (self.level.max(1) - 1) / 4
    }

    pub fn passive_perception(&self) -> i16 {
        10 + self.modifier(Ability::Wisdom)
    }

    pub fn is_caster(&self) -> bool {
        self.spells.is_some()
    }

    /// Hit point maximum taking the fixed average for every level after
    /// the first. Never below the character's level.
    pub fn max_hit_points(&self) -> u32 {
        let con = i32::from(self.modifier(Ability::Constitution));
        let first = self.hit_die.sides() as i32 + con;
        let per_level = self.hit_die.average() as i32 + con;
        let total = first + per_level * (i32::from(self.level) - 1);
        total.max(i32::from(self.level)) as u32
    }

    /// Hit point maximum rolling the hit die for every level after the first.
    pub fn roll_hit_points<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let con = i32::from(self.modifier(Ability::Constitution));
        let later_levels = u32::from(self.level.max(1) - 1);
        let rolled = DicePool::new(later_levels, self.hit_die).roll_with_rng(rng).total;
        let total = self.hit_die.sides() as i32 + con + rolled as i32 + con * later_levels as i32;
        total.max(i32::from(self.level)) as u32
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(
            f,
            "Level {} {} {} ({}), rating {}",
            self.level, self.race.name, self.class.name, self.subclass.name, self.rating
        )?;
        writeln!(
            f,
            "HP {}  Hit die {}  Proficiency +{}  Passive perception {}",
            self.max_hit_points(),
            self.hit_die,
            self.proficiency_bonus(),
            self.passive_perception()
        )?;

        for ability in ROLL_ORDER {
            writeln!(
                f,
                "  {} {:>2} ({:+})",
                ability.abbreviation(),
                self.score(ability),
                self.modifier(ability)
            )?;
        }

        writeln!(f, "Equipment:")?;
        for item in self.loadout.items() {
            let detail = item
                .damage
                .as_deref()
                .or(item.armor_class.as_deref())
                .unwrap_or("");
            writeln!(f, "  {} [{}] {} ({})", item.name, item.item_type, detail, item.cost)?;
        }

        writeln!(f, "Feat: {}", self.feat.name)?;

        if let Some(spells) = &self.spells {
            writeln!(f, "Spells:")?;
            for (rank, names) in spells.iter().filter(|(_, names)| !names.is_empty()) {
                let label = if rank == 0 {
                    "Cantrips".to_string()
                } else {
                    format!("Level {rank}")
                };
                writeln!(f, "  {label}: {}", names.join(", "))?;
            }
        }

        if let Some(notice) = &self.subclass.notice {
            writeln!(f, "Note: {notice}")?;
        }
        Ok(())
    }
}
