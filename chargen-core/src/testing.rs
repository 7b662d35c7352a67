//! Small fixture catalogs and assertion helpers.
//!
//! The fixtures are also what the `chargen` binary falls back to when no
//! catalog directory is configured, so every caster class has enough
//! spells at every rank to fill a level 20 slot table.

use crate::abilities::{Ability, AbilityBonuses, AbilityPriorities};
use crate::catalog::{Catalogs, Class, Feat, Race, Trait};
use crate::class_data::{Ruleset, MAX_LEVEL};
use crate::equipment::{Item, ItemType};
use crate::sheet::Sheet;
use crate::spells::Spell;
use std::collections::BTreeMap;

/// Lower-cased names of every class with a slot table.
const CASTER_CLASSES: [&str; 10] = [
    "bard", "cleric", "druid", "paladin", "ranger", "rogue", "sorcerer", "warlock", "warrior",
    "wizard",
];

// Abjuration stays absent; spell tests need one school with no entries.
const SPELLS: [(&str, &str, &str); 84] = [
    ("Fire Bolt", "cantrip", "Evocation"),
    ("Light", "cantrip", "Evocation"),
    ("Mage Hand", "cantrip", "Conjuration"),
    ("Minor Illusion", "cantrip", "Illusion"),
    ("Prestidigitation", "cantrip", "Transmutation"),
    ("Chill Touch", "cantrip", "Necromancy"),
    ("Friends", "cantrip", "Enchantment"),
    ("True Strike", "cantrip", "Divination"),
    ("Magic Missile", "1", "Evocation"),
    ("Burning Hands", "1", "Evocation"),
    ("Charm Person", "1", "Enchantment"),
    ("Sleep", "1", "Enchantment"),
    ("Color Spray", "1", "Illusion"),
    ("Silent Image", "1", "Illusion"),
    ("Find Familiar", "1", "Conjuration"),
    ("Detect Magic", "1", "Divination"),
    ("Feather Fall", "1", "Transmutation"),
    ("Ray of Sickness", "1", "Necromancy"),
    ("Scorching Ray", "2", "Evocation"),
    ("Shatter", "2", "Evocation"),
    ("Invisibility", "2", "Illusion"),
    ("Mirror Image", "2", "Illusion"),
    ("Misty Step", "2", "Conjuration"),
    ("Hold Person", "2", "Enchantment"),
    ("See Invisibility", "2", "Divination"),
    ("Enlarge/Reduce", "2", "Transmutation"),
    ("Fireball", "3", "Evocation"),
    ("Lightning Bolt", "3", "Evocation"),
    ("Fly", "3", "Transmutation"),
    ("Haste", "3", "Transmutation"),
    ("Hypnotic Pattern", "3", "Illusion"),
    ("Animate Dead", "3", "Necromancy"),
    ("Clairvoyance", "3", "Divination"),
    ("Sleet Storm", "3", "Conjuration"),
    ("Ice Storm", "4", "Evocation"),
    ("Wall of Fire", "4", "Evocation"),
    ("Greater Invisibility", "4", "Illusion"),
    ("Polymorph", "4", "Transmutation"),
    ("Blight", "4", "Necromancy"),
    ("Confusion", "4", "Enchantment"),
    ("Arcane Eye", "4", "Divination"),
    ("Conjure Minor Elementals", "4", "Conjuration"),
    ("Cone of Cold", "5", "Evocation"),
    ("Flame Strike", "5", "Evocation"),
    ("Cloudkill", "5", "Conjuration"),
    ("Dominate Person", "5", "Enchantment"),
    ("Scrying", "5", "Divination"),
    ("Seeming", "5", "Illusion"),
    ("Telekinesis", "5", "Transmutation"),
    ("Contagion", "5", "Necromancy"),
    ("Chain Lightning", "6", "Evocation"),
    ("Sunbeam", "6", "Evocation"),
    ("Disintegrate", "6", "Transmutation"),
    ("Circle of Death", "6", "Necromancy"),
    ("Mass Suggestion", "6", "Enchantment"),
    ("True Seeing", "6", "Divination"),
    ("Programmed Illusion", "6", "Illusion"),
    ("Conjure Fey", "6", "Conjuration"),
    ("Delayed Blast Fireball", "7", "Evocation"),
    ("Prismatic Spray", "7", "Evocation"),
    ("Fire Storm", "7", "Evocation"),
    ("Finger of Death", "7", "Necromancy"),
    ("Teleport", "7", "Conjuration"),
    ("Plane Shift", "7", "Conjuration"),
    ("Reverse Gravity", "7", "Transmutation"),
    ("Mirage Arcane", "7", "Illusion"),
    ("Sunburst", "8", "Evocation"),
    ("Earthquake", "8", "Evocation"),
    ("Dominate Monster", "8", "Enchantment"),
    ("Feeblemind", "8", "Enchantment"),
    ("Maze", "8", "Conjuration"),
    ("Incendiary Cloud", "8", "Conjuration"),
    ("Clone", "8", "Necromancy"),
    ("Demiplane", "8", "Conjuration"),
    ("Meteor Swarm", "9", "Evocation"),
    ("Power Word Kill", "9", "Enchantment"),
    ("Time Stop", "9", "Transmutation"),
    ("Wish", "9", "Conjuration"),
    ("Weird", "9", "Illusion"),
    ("Foresight", "9", "Divination"),
    ("Gate", "9", "Conjuration"),
    ("True Polymorph", "9", "Transmutation"),
    ("Mass Heal", "9", "Evocation"),
    ("Astral Projection", "9", "Necromancy"),
];

/// A bare spell record with only the fields selection looks at.
pub fn spell(name: &str, level: &str, school: &str, classes: &[&str]) -> Spell {
    let classes: Vec<String> = classes.iter().map(|c| c.to_lowercase()).collect();
    Spell {
        name: name.to_string(),
        level: level.to_string(),
        school: school.to_string(),
        classes: classes.clone(),
        casting_time: "1 action".to_string(),
        components: BTreeMap::new(),
        description: String::new(),
        duration: "Instantaneous".to_string(),
        higher_levels: None,
        range: "60 feet".to_string(),
        ritual: false,
        tags: classes,
        spell_type: if level == "cantrip" {
            format!("{school} cantrip")
        } else {
            format!("{level}-level {}", school.to_lowercase())
        },
    }
}

/// Eight or more spells per rank, each learnable by every caster class.
pub fn sample_spells() -> Vec<Spell> {
    SPELLS
        .iter()
        .map(|(name, level, school)| spell(name, level, school, &CASTER_CLASSES))
        .collect()
}

fn armor(name: &str, cost: &str, ac: &str, item_type: ItemType) -> Item {
    Item {
        name: name.to_string(),
        cost: cost.to_string(),
        damage: None,
        armor_class: Some(ac.to_string()),
        item_type,
    }
}

fn weapon(name: &str, cost: &str, damage: &str, item_type: ItemType) -> Item {
    Item {
        name: name.to_string(),
        cost: cost.to_string(),
        damage: Some(damage.to_string()),
        armor_class: None,
        item_type,
    }
}

/// A few items of every armor and weapon category, plus the standard shield.
pub fn sample_equipment() -> Vec<Item> {
    use ItemType::*;
    vec![
        armor("Padded", "5 gp", "11 + Dex modifier", LightArmor),
        armor("Leather", "10 gp", "11 + Dex modifier", LightArmor),
        armor("Studded leather", "45 gp", "12 + Dex modifier", LightArmor),
        armor("Hide", "10 gp", "12 + Dex modifier (max 2)", MediumArmor),
        armor("Chain shirt", "50 gp", "13 + Dex modifier (max 2)", MediumArmor),
        armor("Breastplate", "400 gp", "14 + Dex modifier (max 2)", MediumArmor),
        armor("Ring mail", "30 gp", "14", HeavyArmor),
        armor("Chain mail", "75 gp", "16", HeavyArmor),
        armor("Plate", "1,500 gp", "18", HeavyArmor),
        weapon("Club", "1 sp", "1d4 bludgeoning", SimpleMelee),
        weapon("Dagger", "2 gp", "1d4 piercing", SimpleMelee),
        weapon("Quarterstaff", "2 sp", "1d6 bludgeoning", SimpleMelee),
        weapon("Light crossbow", "25 gp", "1d8 piercing", SimpleRanged),
        weapon("Shortbow", "25 gp", "1d6 piercing", SimpleRanged),
        weapon("Sling", "1 sp", "1d4 bludgeoning", SimpleRanged),
        weapon("Longsword", "15 gp", "1d8 slashing", MartialMelee),
        weapon("Battleaxe", "10 gp", "1d8 slashing", MartialMelee),
        weapon("Rapier", "25 gp", "1d8 piercing", MartialMelee),
        weapon("Longbow", "50 gp", "1d8 piercing", MartialRanged),
        weapon("Hand crossbow", "75 gp", "1d6 piercing", MartialRanged),
        Item::standard_shield(),
    ]
}

fn race(name: &str, speed: u32, bonuses: &[(Ability, i8)], choose: u8, traits: &[(&str, &str)]) -> Race {
    let mut table = AbilityBonuses::default();
    for &(ability, amount) in bonuses {
        table.set(ability, amount);
    }
    Race {
        name: name.to_string(),
        source: "PHB".to_string(),
        size: if name.contains("Halfling") { "S" } else { "M" }.to_string(),
        speed,
        traits: traits
            .iter()
            .map(|(name, text)| Trait {
                name: name.to_string(),
                text: vec![text.to_string()],
            })
            .collect(),
        bonuses: table,
        choose,
    }
}

pub fn sample_races() -> Vec<Race> {
    use Ability::*;
    vec![
        race("Human", 30, &[(Strength, 1), (Dexterity, 1), (Constitution, 1),
            (Intelligence, 1), (Wisdom, 1), (Charisma, 1)], 0, &[]),
        race("Dwarf (Hill)", 25, &[(Constitution, 2), (Wisdom, 1)], 0, &[
            ("Darkvision", "You can see in dim light within 60 feet of you as if it were bright light."),
            ("Dwarven Toughness", "Your hit point maximum increases by 1 for every level."),
        ]),
        race("Elf (High)", 30, &[(Dexterity, 2), (Intelligence, 1)], 0, &[
            ("Fey Ancestry", "You have advantage on saving throws against being charmed."),
        ]),
        race("Halfling (Lightfoot)", 25, &[(Dexterity, 2), (Charisma, 1)], 0, &[
            ("Lucky", "You can reroll a 1 on an attack roll, ability check, or saving throw."),
        ]),
        race("Half-Elf", 30, &[(Charisma, 2)], 2, &[
            ("Skill Versatility", "You gain proficiency in two skills of your choice."),
        ]),
        race("Tiefling", 30, &[(Intelligence, 1), (Charisma, 2)], 0, &[
            ("Hellish Resistance", "You have resistance to fire damage."),
        ]),
    ]
}

pub fn class(name: &str, priorities: &[Ability]) -> Class {
    Class {
        name: name.to_string(),
        priorities: AbilityPriorities::of(priorities),
    }
}

/// One entry per class in the built-in rules tables.
pub fn sample_classes() -> Vec<Class> {
    use Ability::*;
    vec![
        class("Barbarian", &[Strength, Constitution]),
        class("Bard", &[Dexterity, Charisma]),
        class("Cleric", &[Wisdom, Charisma]),
        class("Druid", &[Intelligence, Wisdom]),
        class("Monk", &[Strength, Dexterity]),
        class("Paladin", &[Wisdom, Charisma]),
        class("Ranger", &[Strength, Dexterity]),
        class("Rogue", &[Dexterity, Intelligence]),
        class("Sorcerer", &[Constitution, Charisma]),
        class("Warlock", &[Wisdom, Charisma]),
        class("Warrior", &[Strength, Constitution]),
        class("Wizard", &[Intelligence, Wisdom]),
    ]
}

pub fn sample_feats() -> Vec<Feat> {
    [
        ("Alert", "You gain a +5 bonus to initiative and can't be surprised while conscious."),
        ("Lucky", "You have 3 luck points to reroll an attack roll, ability check, or saving throw."),
        ("Tough", "Your hit point maximum increases by an amount equal to twice your level."),
        ("War Caster", "You have advantage on Constitution saving throws to maintain concentration."),
        ("Sentinel", "Creatures you hit with opportunity attacks have their speed reduced to 0."),
        ("Mobile", "Your speed increases by 10 feet."),
    ]
    .iter()
    .map(|(name, text)| Feat {
        name: name.to_string(),
        text: vec![text.to_string()],
    })
    .collect()
}

pub fn sample_first_names() -> Vec<String> {
    ["Arlen", "Brienne", "Cass", "Dorian", "Elowen", "Fenwick", "Greta", "Hollis"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn sample_middle_names() -> Vec<String> {
    ["Ash", "Briar", "Cole", "Dale", "Ember", "Flint", "Grey", "Hale"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Every fixture catalog bundled together.
pub fn sample_catalogs() -> Catalogs {
    Catalogs {
        races: sample_races(),
        classes: sample_classes(),
        spells: sample_spells(),
        feats: sample_feats(),
        first_names: sample_first_names(),
        middle_names: sample_middle_names(),
        equipment: sample_equipment(),
    }
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert the structural invariants every generated sheet must satisfy.
pub fn assert_valid_sheet(sheet: &Sheet, ruleset: &Ruleset) {
    assert!(
        (1..=MAX_LEVEL).contains(&sheet.level),
        "level {} out of range",
        sheet.level
    );

    let rules = ruleset
        .class(&sheet.class.name)
        .unwrap_or_else(|| panic!("no rules for class {}", sheet.class.name));
    assert_eq!(sheet.hit_die, rules.hit_die, "hit die of {}", sheet.class.name);

    let subclasses = ruleset.subclasses(&sheet.class.name).unwrap_or_default();
    assert!(
        subclasses.contains(&sheet.subclass),
        "{} is not a {} subclass",
        sheet.subclass.name,
        sheet.class.name
    );

    match &sheet.spells {
        Some(selection) => {
            assert!(sheet.subclass.caster, "non-caster {} has spells", sheet.subclass.name);
            let mut expected = rules.slots_at(sheet.level);
            if !rules.cantrips {
                expected[0] = 0;
            }
            assert_eq!(selection.counts(), expected, "slot counts for {}", sheet.class.name);
        }
        None => assert!(!sheet.subclass.caster, "caster {} has no spells", sheet.subclass.name),
    }

    for score in sheet.scores.to_roll_order() {
        assert!((3..=18).contains(&score), "ability roll {score} out of range");
    }

    match &sheet.loadout.armor {
        Some(armor) => {
            assert!(armor.item_type.is_body_armor());
            assert!(rules.armor_proficiencies.contains(&armor.item_type));
        }
        None => assert!(
            !rules.armor_proficiencies.iter().any(ItemType::is_body_armor),
            "{} can wear armor but has none",
            sheet.class.name
        ),
    }
    assert!(rules.weapon_proficiencies.contains(&sheet.loadout.weapon.item_type));
    if sheet.loadout.shield.is_some() {
        assert!(rules.armor_proficiencies.contains(&ItemType::Shield));
    }

    assert!(sheet.max_hit_points() >= u32::from(sheet.level));
    assert!(sheet.name.contains(' '), "name {:?} lacks a middle name", sheet.name);
}
