//! Catalog records and loaders for the JSON reference files.
//!
//! The engine itself only needs the in-memory [`Catalogs`]; the `load_*`
//! functions read the on-disk formats the catalogs are distributed in.

use crate::abilities::{Ability, AbilityBonuses, AbilityPriorities};
use crate::equipment::{Item, ItemType};
use crate::spells::Spell;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

pub const RACES_FILE: &str = "races.json";
pub const CLASSES_FILE: &str = "classes.json";
pub const SPELLS_FILE: &str = "spells.json";
pub const FEATS_FILE: &str = "feats.json";
pub const FIRST_NAMES_FILE: &str = "first-names.json";
pub const MIDDLE_NAMES_FILE: &str = "middle-names.json";
pub const EQUIPMENT_FILE: &str = "equipment.json";

/// Errors from reading catalog files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} in {entry:?}: {value:?}")]
    InvalidField {
        entry: String,
        field: &'static str,
        value: String,
    },

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<CatalogError>,
    },
}

// ============================================================================
// Records
// ============================================================================

/// A named racial trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub text: Vec<String>,
}

/// A playable race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    pub source: String,
    pub size: String,
    pub speed: u32,
    pub traits: Vec<Trait>,
    pub bonuses: AbilityBonuses,
    /// Number of extra ability bonuses the player picks by hand.
    pub choose: u8,
}

/// A class as listed in the class catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Abilities the class wants its best rolls in.
    pub priorities: AbilityPriorities,
}

/// A feat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feat {
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub text: Vec<String>,
}

/// Every catalog the generator draws from.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub races: Vec<Race>,
    pub classes: Vec<Class>,
    pub spells: Vec<Spell>,
    pub feats: Vec<Feat>,
    pub first_names: Vec<String>,
    pub middle_names: Vec<String>,
    pub equipment: Vec<Item>,
}

impl Catalogs {
    /// Load all seven catalog files from `dir`.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let catalogs = Self {
            races: load_races(dir.join(RACES_FILE)).await?,
            classes: load_classes(dir.join(CLASSES_FILE)).await?,
            spells: load_spells(dir.join(SPELLS_FILE)).await?,
            feats: load_feats(dir.join(FEATS_FILE)).await?,
            first_names: load_names(dir.join(FIRST_NAMES_FILE)).await?,
            middle_names: load_names(dir.join(MIDDLE_NAMES_FILE)).await?,
            equipment: load_equipment(dir.join(EQUIPMENT_FILE)).await?,
        };
        debug!(
            dir = %dir.display(),
            races = catalogs.races.len(),
            classes = catalogs.classes.len(),
            spells = catalogs.spells.len(),
            feats = catalogs.feats.len(),
            items = catalogs.equipment.len(),
            "loaded catalogs"
        );
        Ok(catalogs)
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
struct RaceCompendium {
    compendium: RaceList,
}

#[derive(Deserialize)]
struct RaceList {
    #[serde(deserialize_with = "one_or_many")]
    race: Vec<RaceRecord>,
}

#[derive(Deserialize)]
struct RaceRecord {
    name: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    size: String,
    speed: NumberOrText,
    #[serde(default, rename = "trait", deserialize_with = "one_or_many")]
    traits: Vec<Trait>,
    #[serde(default)]
    ability: String,
}

/// Parse racial ability text such as `"Str 2, Cha 1"` or `"Choose 2"`.
pub fn parse_ability_bonuses(
    race: &str,
    text: &str,
) -> Result<(AbilityBonuses, u8), CatalogError> {
    let mut bonuses = AbilityBonuses::default();
    let mut choose = 0;
    let invalid = |part: &str| CatalogError::InvalidField {
        entry: race.to_string(),
        field: "ability",
        value: part.to_string(),
    };

    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, amount) = part.split_once(' ').ok_or_else(|| invalid(part))?;
        if key.eq_ignore_ascii_case("choose") {
            choose = amount.trim().parse().map_err(|_| invalid(part))?;
        } else {
            let ability = Ability::parse(key).ok_or_else(|| invalid(part))?;
            let amount: i8 = amount.trim().parse().map_err(|_| invalid(part))?;
            bonuses.set(ability, amount);
        }
    }

    Ok((bonuses, choose))
}

/// Parse a race compendium (`{"compendium": {"race": [...]}}`).
pub fn parse_races(json: &str) -> Result<Vec<Race>, CatalogError> {
    let compendium: RaceCompendium = serde_json::from_str(json)?;
    compendium
        .compendium
        .race
        .into_iter()
        .map(|record| {
            let speed = match record.speed {
                NumberOrText::Number(n) => n,
                NumberOrText::Text(text) => {
                    text.trim()
                        .parse()
                        .map_err(|_| CatalogError::InvalidField {
                            entry: record.name.clone(),
                            field: "speed",
                            value: text.clone(),
                        })?
                }
            };
            let (bonuses, choose) = parse_ability_bonuses(&record.name, &record.ability)?;
            Ok(Race {
                name: record.name,
                source: record.source,
                size: record.size,
                speed,
                traits: record.traits,
                bonuses,
                choose,
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct ClassRecord {
    name: String,
    #[serde(default)]
    proficiency: String,
}

/// Parse the class catalog; `proficiency` lists the prioritized abilities.
pub fn parse_classes(json: &str) -> Result<Vec<Class>, CatalogError> {
    let records: Vec<ClassRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|record| {
            let abilities = record
                .proficiency
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| {
                    Ability::parse(p).ok_or_else(|| CatalogError::InvalidField {
                        entry: record.name.clone(),
                        field: "proficiency",
                        value: p.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Class {
                priorities: AbilityPriorities::of(&abilities),
                name: record.name,
            })
        })
        .collect()
}

pub fn parse_spells(json: &str) -> Result<Vec<Spell>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_feats(json: &str) -> Result<Vec<Feat>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_names(json: &str) -> Result<Vec<String>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Deserialize)]
struct EquipmentFile {
    #[serde(rename = "Equipment")]
    equipment: EquipmentSections,
}

#[derive(Deserialize)]
struct EquipmentSections {
    #[serde(rename = "Armor")]
    armor: ArmorSection,
    #[serde(rename = "Weapons")]
    weapons: WeaponSection,
}

#[derive(Deserialize)]
struct ArmorSection {
    #[serde(rename = "Armor List")]
    list: BTreeMap<String, Table<ArmorColumns>>,
}

#[derive(Deserialize)]
struct WeaponSection {
    #[serde(rename = "Weapons List")]
    list: BTreeMap<String, Table<WeaponColumns>>,
}

#[derive(Deserialize)]
struct Table<T> {
    table: T,
}

#[derive(Deserialize)]
struct ArmorColumns {
    #[serde(rename = "Armor")]
    names: Vec<String>,
    #[serde(rename = "Cost")]
    costs: Vec<String>,
    #[serde(rename = "Armor Class (AC)")]
    armor_class: Vec<String>,
}

#[derive(Deserialize)]
struct WeaponColumns {
    #[serde(rename = "Name")]
    names: Vec<String>,
    #[serde(rename = "Cost")]
    costs: Vec<String>,
    #[serde(rename = "Damage")]
    damage: Vec<String>,
}

fn check_columns(category: &str, lengths: [usize; 3]) -> Result<(), CatalogError> {
    if lengths.iter().all(|&n| n == lengths[0]) {
        Ok(())
    } else {
        Err(CatalogError::InvalidField {
            entry: category.to_string(),
            field: "table",
            value: format!("column lengths {lengths:?}"),
        })
    }
}

fn category(name: &str, wanted: fn(&ItemType) -> bool) -> Option<ItemType> {
    let item_type = ItemType::from_name(name).filter(wanted);
    if item_type.is_none() {
        warn!(category = name, "skipping unknown equipment category");
    }
    item_type
}

/// Parse the column-oriented equipment tables, plus the standard shield.
pub fn parse_equipment(json: &str) -> Result<Vec<Item>, CatalogError> {
    let file: EquipmentFile = serde_json::from_str(json)?;
    let mut items = Vec::new();

    for (name, Table { table }) in file.equipment.armor.list {
        let Some(item_type) = category(&name, ItemType::is_body_armor) else {
            continue;
        };
        check_columns(
            &name,
            [table.names.len(), table.costs.len(), table.armor_class.len()],
        )?;
        for ((item, cost), ac) in table.names.into_iter().zip(table.costs).zip(table.armor_class) {
            items.push(Item {
                name: item,
                cost,
                damage: None,
                armor_class: Some(ac),
                item_type,
            });
        }
    }

    for (name, Table { table }) in file.equipment.weapons.list {
        let Some(item_type) = category(&name, ItemType::is_weapon) else {
            continue;
        };
        check_columns(
            &name,
            [table.names.len(), table.costs.len(), table.damage.len()],
        )?;
        for ((item, cost), damage) in table.names.into_iter().zip(table.costs).zip(table.damage) {
            items.push(Item {
                name: item,
                cost,
                damage: Some(damage),
                armor_class: None,
                item_type,
            });
        }
    }

    items.push(Item::standard_shield());
    Ok(items)
}

// ============================================================================
// Loading
// ============================================================================

async fn load_with<T>(
    path: PathBuf,
    parse: fn(&str) -> Result<T, CatalogError>,
) -> Result<T, CatalogError> {
    let wrap = |source: CatalogError| CatalogError::File {
        path: path.clone(),
        source: Box::new(source),
    };
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| wrap(e.into()))?;
    parse(&content).map_err(wrap)
}

pub async fn load_races(path: impl AsRef<Path>) -> Result<Vec<Race>, CatalogError> {
    load_with(path.as_ref().to_path_buf(), parse_races).await
}

pub async fn load_classes(path: impl AsRef<Path>) -> Result<Vec<Class>, CatalogError> {
    load_with(path.as_ref().to_path_buf(), parse_classes).await
}

pub async fn load_spells(path: impl AsRef<Path>) -> Result<Vec<Spell>, CatalogError> {
    load_with(path.as_ref().to_path_buf(), parse_spells).await
}

pub async fn load_feats(path: impl AsRef<Path>) -> Result<Vec<Feat>, CatalogError> {
    load_with(path.as_ref().to_path_buf(), parse_feats).await
}

pub async fn load_names(path: impl AsRef<Path>) -> Result<Vec<String>, CatalogError> {
    load_with(path.as_ref().to_path_buf(), parse_names).await
}

pub async fn load_equipment(path: impl AsRef<Path>) -> Result<Vec<Item>, CatalogError> {
    load_with(path.as_ref().to_path_buf(), parse_equipment).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ability_bonuses() {
        let (bonuses, choose) = parse_ability_bonuses("Half-Elf", "Cha 2, Choose 2").unwrap();
        assert_eq!(bonuses.charisma, 2);
        assert_eq!(bonuses.strength, 0);
        assert_eq!(choose, 2);

        let (bonuses, choose) = parse_ability_bonuses("Dwarf", "Con 2, Str 2").unwrap();
        assert_eq!(bonuses.get(Ability::Constitution), 2);
        assert_eq!(bonuses.get(Ability::Strength), 2);
        assert_eq!(choose, 0);

        let (bonuses, _) = parse_ability_bonuses("Human", "").unwrap();
        assert_eq!(bonuses, AbilityBonuses::default());

        assert!(parse_ability_bonuses("Odd", "Luck 3").is_err());
        assert!(parse_ability_bonuses("Odd", "Str two").is_err());
    }

    #[test]
    fn test_parse_races() {
        let json = r#"{"compendium": {"race": [
            {"name": "Dwarf (Hill)", "source": "PHB", "size": "M", "speed": "25",
             "ability": "Con 2, Wis 1",
             "trait": [{"name": "Darkvision", "text": "You can see in the dark."},
                       {"name": "Dwarven Toughness", "text": ["Your HP max", "increases by 1."]}]},
            {"name": "Tabaxi", "source": "VGM", "size": "M", "speed": 30,
             "ability": "Dex 2, Cha 1", "trait": {"name": "Feline Agility", "text": "Sprint."}}
        ]}}"#;
        let races = parse_races(json).unwrap();
        assert_eq!(races.len(), 2);
        assert_eq!(races[0].speed, 25);
        assert_eq!(races[0].bonuses.wisdom, 1);
        assert_eq!(races[0].traits[0].text, vec!["You can see in the dark."]);
        assert_eq!(races[0].traits[1].text.len(), 2);
        assert_eq!(races[1].speed, 30);
        assert_eq!(races[1].traits.len(), 1);
    }

    #[test]
    fn test_parse_races_bad_speed() {
        let json = r#"{"compendium": {"race": [{"name": "Odd", "speed": "fast"}]}}"#;
        assert!(matches!(
            parse_races(json),
            Err(CatalogError::InvalidField { field: "speed", .. })
        ));
    }

    #[test]
    fn test_parse_classes() {
        let json = r#"[{"name": "Wizard", "proficiency": "Intelligence, Wisdom"},
                       {"name": "Warrior", "proficiency": "Strength, Constitution"}]"#;
        let classes = parse_classes(json).unwrap();
        assert!(classes[0].priorities.intelligence);
        assert!(classes[0].priorities.wisdom);
        assert!(!classes[0].priorities.strength);
        assert_eq!(
            classes[1].priorities.to_roll_order(),
            [true, false, true, false, false, false]
        );

        let bad = r#"[{"name": "Odd", "proficiency": "Luck"}]"#;
        assert!(parse_classes(bad).is_err());
    }

    #[test]
    fn test_parse_spells() {
        let json = r#"[{"casting_time": "1 action", "classes": ["sorcerer", "wizard"],
            "components": {"material": false, "raw": "V, S", "somatic": true, "verbal": true},
            "description": "A mote of fire.", "duration": "Instantaneous", "level": "cantrip",
            "name": "Fire Bolt", "range": "120 feet", "ritual": false, "school": "evocation",
            "tags": ["sorcerer", "wizard"], "type": "Evocation cantrip"}]"#;
        let spells = parse_spells(json).unwrap();
        assert_eq!(spells[0].name, "Fire Bolt");
        assert_eq!(spells[0].rank(), Some(0));
        assert!(spells[0].higher_levels.is_none());
        assert_eq!(spells[0].spell_type, "Evocation cantrip");
    }

    #[test]
    fn test_parse_equipment() {
        let json = r#"{"Equipment": {
            "Armor": {"Armor List": {
                "Light Armor": {"table": {"Armor": ["Padded", "Leather"], "Cost": ["5 gp", "10 gp"],
                    "Armor Class (AC)": ["11 + Dex modifier", "11 + Dex modifier"]}},
                "Heavy Armor": {"table": {"Armor": ["Plate"], "Cost": ["1,500 gp"],
                    "Armor Class (AC)": ["18"]}}
            }},
            "Weapons": {"Weapons List": {
                "Simple Melee Weapons": {"table": {"Name": ["Club"], "Cost": ["1 sp"],
                    "Damage": ["1d4 bludgeoning"]}},
                "Martial Ranged Weapons": {"table": {"Name": ["Longbow"], "Cost": ["50 gp"],
                    "Damage": ["1d8 piercing"]}}
            }}
        }}"#;
        let items = parse_equipment(json).unwrap();
        assert_eq!(items.len(), 6);
        let plate = items.iter().find(|i| i.name == "Plate").unwrap();
        assert_eq!(plate.item_type, ItemType::HeavyArmor);
        assert_eq!(plate.armor_class.as_deref(), Some("18"));
        let bow = items.iter().find(|i| i.name == "Longbow").unwrap();
        assert_eq!(bow.item_type, ItemType::MartialRanged);
        assert_eq!(bow.damage.as_deref(), Some("1d8 piercing"));
        assert_eq!(items.last(), Some(&Item::standard_shield()));
    }

    #[test]
    fn test_parse_equipment_ragged_columns() {
        let json = r#"{"Equipment": {
            "Armor": {"Armor List": {
                "Light Armor": {"table": {"Armor": ["Padded"], "Cost": [],
                    "Armor Class (AC)": ["11"]}}}},
            "Weapons": {"Weapons List": {}}
        }}"#;
        assert!(matches!(
            parse_equipment(json),
            Err(CatalogError::InvalidField { field: "table", .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_names(dir.path().join("nope.json")).await.unwrap_err();
        match err {
            CatalogError::File { path, source } => {
                assert!(path.ends_with("nope.json"));
                assert!(matches!(*source, CatalogError::Io(_)));
            }
            other => panic!("expected file error, got {other:?}"),
        }
    }
}
