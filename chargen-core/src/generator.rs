//! Character assembly.
//!
//! [`Generator`] ties the individual selectors together into one
//! [`Sheet`]. It holds only read-only rules and configuration, so a single
//! generator can serve any number of requests.

use crate::abilities::generate_ability_scores;
use crate::catalog::Catalogs;
use crate::class_data::{Ruleset, MAX_LEVEL};
use crate::equipment::select_equipment;
use crate::error::GenerateError;
use crate::rarity::{sample_level, UNRATED};
use crate::sheet::{Sheet, SheetId};
use crate::spells::{select_spells, SpellPicking, SpellSelection};
use crate::subclass::{select_subclass, DEFAULT_ALIGNMENT_SCALE};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

/// Tunable probabilities and limits for generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Standard deviation of the alignment bell curve.
    pub alignment_scale: f64,

    /// Chance of carrying a shield when proficient.
    pub shield_chance: f64,

    /// Chance that a spell pick looks inside the preferred school.
    pub school_chance: f64,

    /// Coin flips allowed per spell rank before giving up.
    pub max_spell_attempts: usize,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self {
            alignment_scale: DEFAULT_ALIGNMENT_SCALE,
            shield_chance: 0.5,
            school_chance: 0.5,
            max_spell_attempts: 10_000,
        }
    }

    /// Set the alignment standard deviation. Non-positive values are ignored.
    pub fn with_alignment_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.alignment_scale = scale;
        } else {
            warn!(scale, "ignoring invalid alignment scale");
        }
        self
    }

    pub fn with_shield_chance(mut self, chance: f64) -> Self {
        self.shield_chance = clamp_probability(chance);
        self
    }

    pub fn with_school_chance(mut self, chance: f64) -> Self {
        self.school_chance = clamp_probability(chance);
        self
    }

    pub fn with_max_spell_attempts(mut self, attempts: usize) -> Self {
        self.max_spell_attempts = attempts;
        self
    }

    fn spell_picking(&self) -> SpellPicking {
        SpellPicking {
            school_chance: self.school_chance,
            max_attempts: self.max_spell_attempts,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Builds character sheets from catalogs.
#[derive(Debug, Clone)]
pub struct Generator {
    ruleset: Ruleset,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(ruleset: Ruleset, config: GeneratorConfig) -> Self {
        Self { ruleset, config }
    }

    /// A generator over the embedded rules tables with default settings.
    pub fn builtin() -> Result<Self, GenerateError> {
        Ok(Self::new(Ruleset::builtin()?, GeneratorConfig::default()))
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one character at `level`.
    ///
    /// `rating` is recorded on the sheet as given; pass [`UNRATED`] for a
    /// level that was not drawn from the rarity table.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        catalogs: &Catalogs,
        level: u8,
        rating: &str,
        alignment: f64,
        rng: &mut R,
    ) -> Result<Sheet, GenerateError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(GenerateError::InvalidLevel(level));
        }
        if !alignment.is_finite() {
            return Err(GenerateError::InvalidAlignment(alignment));
        }

        let class = catalogs
            .classes
            .choose(rng)
            .ok_or(GenerateError::EmptyCatalog("classes"))?;
        let race = catalogs
            .races
            .choose(rng)
            .ok_or(GenerateError::EmptyCatalog("races"))?;
        let first = catalogs
            .first_names
            .choose(rng)
            .ok_or(GenerateError::EmptyCatalog("first names"))?;
        let middle = catalogs
            .middle_names
            .choose(rng)
            .ok_or(GenerateError::EmptyCatalog("middle names"))?;

        let rules = self
            .ruleset
            .class(&class.name)
            .ok_or_else(|| GenerateError::UnknownClass(class.name.clone()))?;
        let candidates = self
            .ruleset
            .subclasses(&class.name)
            .filter(|list| !list.is_empty())
            .ok_or_else(|| GenerateError::MissingSubclasses(class.name.clone()))?;

        let scores = generate_ability_scores(class.priorities, rng);
        let loadout = select_equipment(
            &rules.armor_proficiencies,
            &rules.weapon_proficiencies,
            &catalogs.equipment,
            self.config.shield_chance,
            rng,
        )?;

        let subclass = select_subclass(alignment, candidates, self.config.alignment_scale, rng)
            .ok_or_else(|| GenerateError::MissingSubclasses(class.name.clone()))?;

        let spells = if subclass.caster {
            let mut slots = rules.slots_at(level);
            if !rules.cantrips {
                slots[0] = 0;
            }
            Some(select_spells(
                &class.name,
                &subclass.school_preference(),
                &slots,
                &catalogs.spells,
                self.config.spell_picking(),
                rng,
            )?)
        } else {
            None
        };

        let feat = catalogs
            .feats
            .choose(rng)
            .ok_or(GenerateError::EmptyCatalog("feats"))?;

        let sheet = Sheet {
            id: SheetId::from_rng(rng),
            level,
            rating: rating.to_string(),
            name: format!("{first} {middle}"),
            race: race.clone(),
            class: class.clone(),
            subclass: subclass.clone(),
            spells,
            loadout,
            scores,
            feat: feat.clone(),
            hit_die: rules.hit_die,
        };

        info!(
            id = %sheet.id,
            name = %sheet.name,
            level,
            class = %sheet.class.name,
            subclass = %sheet.subclass.name,
            spells = sheet.spells.as_ref().map_or(0, SpellSelection::total),
            "generated character"
        );
        Ok(sheet)
    }

    /// Generate at a level drawn from the rarity table.
    pub fn generate_random_level<R: Rng + ?Sized>(
        &self,
        catalogs: &Catalogs,
        alignment: f64,
        rng: &mut R,
    ) -> Result<Sheet, GenerateError> {
        let (rating, level) = sample_level(rng);
        self.generate(catalogs, level, rating, alignment, rng)
    }
}

/// Generate one character with the built-in rules and default settings.
///
/// The embedded rules tables are parsed and validated on every call. To
/// make many sheets, build a [`Generator`] once and call
/// [`Generator::generate`] on it instead.
pub fn generate<R: Rng + ?Sized>(
    catalogs: &Catalogs,
    level: u8,
    rating: &str,
    alignment: f64,
    rng: &mut R,
) -> Result<Sheet, GenerateError> {
    Generator::builtin()?.generate(catalogs, level, rating, alignment, rng)
}

/// Generate one character at a fixed level, rated [`UNRATED`].
pub fn generate_at_level<R: Rng + ?Sized>(
    catalogs: &Catalogs,
    level: u8,
    alignment: f64,
    rng: &mut R,
) -> Result<Sheet, GenerateError> {
    generate(catalogs, level, UNRATED, alignment, rng)
}
