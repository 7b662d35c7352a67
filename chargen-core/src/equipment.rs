//! Equipment catalog records and proficiency-constrained loadout selection.

use crate::error::GenerateError;
use crate::sampling::chance;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Equipment category, matching the catalog's type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "Light Armor")]
    LightArmor,
    #[serde(rename = "Medium Armor")]
    MediumArmor,
    #[serde(rename = "Heavy Armor")]
    HeavyArmor,
    #[serde(rename = "Shield")]
    Shield,
    #[serde(rename = "Simple Melee Weapons")]
    SimpleMelee,
    #[serde(rename = "Simple Ranged Weapons")]
    SimpleRanged,
    #[serde(rename = "Martial Melee Weapons")]
    MartialMelee,
    #[serde(rename = "Martial Ranged Weapons")]
    MartialRanged,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::LightArmor => "Light Armor",
            ItemType::MediumArmor => "Medium Armor",
            ItemType::HeavyArmor => "Heavy Armor",
            ItemType::Shield => "Shield",
            ItemType::SimpleMelee => "Simple Melee Weapons",
            ItemType::SimpleRanged => "Simple Ranged Weapons",
            ItemType::MartialMelee => "Martial Melee Weapons",
            ItemType::MartialRanged => "Martial Ranged Weapons",
        }
    }

    pub fn from_name(name: &str) -> Option<ItemType> {
        Self::all().into_iter().find(|t| t.name() == name)
    }

    pub fn all() -> [ItemType; 8] {
        [
            ItemType::LightArmor,
            ItemType::MediumArmor,
            ItemType::HeavyArmor,
            ItemType::Shield,
            ItemType::SimpleMelee,
            ItemType::SimpleRanged,
            ItemType::MartialMelee,
            ItemType::MartialRanged,
        ]
    }

    /// Body armor, i.e. armor that is not a shield.
    pub fn is_body_armor(&self) -> bool {
        matches!(
            self,
            ItemType::LightArmor | ItemType::MediumArmor | ItemType::HeavyArmor
        )
    }

    pub fn is_weapon(&self) -> bool {
        matches!(
            self,
            ItemType::SimpleMelee
                | ItemType::SimpleRanged
                | ItemType::MartialMelee
                | ItemType::MartialRanged
        )
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A piece of armor, a shield or a weapon from the equipment catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub cost: String,
    #[serde(default)]
    pub damage: Option<String>,
    /// Armor class for armor, the bonus for shields.
    #[serde(default)]
    pub armor_class: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

impl Item {
    /// The standard shield, used when the catalog does not list one.
    pub fn standard_shield() -> Self {
        Self {
            name: "Shield".to_string(),
            cost: "10 gp".to_string(),
            damage: None,
            armor_class: Some("2".to_string()),
            item_type: ItemType::Shield,
        }
    }
}

/// The equipment handed to a generated character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub armor: Option<Item>,
    pub weapon: Item,
    pub shield: Option<Item>,
}

impl Loadout {
    /// All carried items, armor first.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.armor
            .iter()
            .chain(std::iter::once(&self.weapon))
            .chain(self.shield.iter())
    }
}

fn exhausted(slot: &'static str, proficiencies: &[ItemType]) -> GenerateError {
    GenerateError::EquipmentPoolExhausted {
        slot,
        proficiencies: proficiencies.iter().map(|p| p.name().to_string()).collect(),
    }
}

/// Pick armor, a weapon and maybe a shield the class can use.
///
/// Armor is absent when the class has no armor proficiency. A shield is
/// only rolled for when the class is proficient with shields.
pub fn select_equipment<R: Rng + ?Sized>(
    armor_proficiencies: &[ItemType],
    weapon_proficiencies: &[ItemType],
    catalog: &[Item],
    shield_chance: f64,
    rng: &mut R,
) -> Result<Loadout, GenerateError> {
    let armor = if armor_proficiencies.is_empty() {
        None
    } else {
        let pool: Vec<&Item> = catalog
            .iter()
            .filter(|item| {
                item.item_type != ItemType::Shield
                    && armor_proficiencies.contains(&item.item_type)
            })
            .collect();
        let chosen = pool
            .choose(rng)
            .ok_or_else(|| exhausted("armor", armor_proficiencies))?;
        Some((*chosen).clone())
    };

    let weapons: Vec<&Item> = catalog
        .iter()
        .filter(|item| weapon_proficiencies.contains(&item.item_type))
        .collect();
    let weapon = weapons
        .choose(rng)
        .map(|item| (*item).clone())
        .ok_or_else(|| exhausted("weapon", weapon_proficiencies))?;

    let shield = if armor_proficiencies.contains(&ItemType::Shield) && chance(rng, shield_chance)
    {
        let shields: Vec<&Item> = catalog
            .iter()
            .filter(|item| item.item_type == ItemType::Shield)
            .collect();
        Some(
            shields
                .choose(rng)
                .map(|item| (*item).clone())
                .unwrap_or_else(Item::standard_shield),
        )
    } else {
        None
    };

    debug!(
        armor = armor.as_ref().map(|a| a.name.as_str()),
        weapon = %weapon.name,
        shield = shield.is_some(),
        "selected equipment"
    );

    Ok(Loadout {
        armor,
        weapon,
        shield,
    })
}
