//! Random tabletop character generator.
//!
//! This crate provides:
//! - Weighted and constrained selection of class, subclass, spells and gear
//! - Priority-aware ability score rolling
//! - Rarity-weighted level sampling
//! - Declarative class rules and subclass tables
//! - Async loaders for the JSON reference catalogs
//!
//! # Quick Start
//!
//! ```ignore
//! use chargen_core::{Catalogs, Generator};
//! use rand::SeedableRng;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalogs = Catalogs::load_dir("data").await?;
//!     let generator = Generator::builtin()?;
//!
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!     let sheet = generator.generate_random_level(&catalogs, 0.0, &mut rng)?;
//!     println!("{sheet}");
//!     Ok(())
//! }
//! ```

pub mod abilities;
pub mod catalog;
pub mod class_data;
pub mod dice;
pub mod equipment;
pub mod error;
pub mod generator;
pub mod rarity;
pub mod sampling;
pub mod sheet;
pub mod spells;
pub mod subclass;
pub mod testing;

// Primary public API
pub use abilities::{Ability, AbilityBonuses, AbilityPriorities, AbilityScores};
pub use catalog::{Catalogs, CatalogError, Class, Feat, Race, Trait};
pub use class_data::{ClassRules, Ruleset, RulesError};
pub use equipment::{Item, ItemType, Loadout};
pub use error::GenerateError;
pub use generator::{generate, generate_at_level, Generator, GeneratorConfig};
pub use rarity::{sample_level, UNRATED};
pub use sheet::{Sheet, SheetId};
pub use spells::{Spell, SpellSelection};
pub use subclass::{SchoolPreference, Subclass};
