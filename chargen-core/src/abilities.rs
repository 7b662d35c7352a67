//! Ability scores and the priority-driven ability roll.

use crate::dice::DicePool;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Slot order used by the ability roll. Wisdom comes before Intelligence.
pub const ROLL_ORDER: [Ability; 6] = [
    Ability::Strength,
    Ability::Dexterity,
    Ability::Constitution,
    Ability::Wisdom,
    Ability::Intelligence,
    Ability::Charisma,
];

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Parse a full name ("Strength") or abbreviation ("Str"), any case.
    pub fn parse(s: &str) -> Option<Ability> {
        match s.trim().to_lowercase().as_str() {
            "strength" | "str" => Some(Ability::Strength),
            "dexterity" | "dex" => Some(Ability::Dexterity),
            "constitution" | "con" => Some(Ability::Constitution),
            "intelligence" | "int" => Some(Ability::Intelligence),
            "wisdom" | "wis" => Some(Ability::Wisdom),
            "charisma" | "cha" => Some(Ability::Charisma),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Rolled base scores, one per ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Build from six values laid out in [`ROLL_ORDER`].
    pub fn from_roll_order(values: [u8; 6]) -> Self {
        Self {
            strength: values[0],
            dexterity: values[1],
            constitution: values[2],
            wisdom: values[3],
            intelligence: values[4],
            charisma: values[5],
        }
    }

    /// The six values laid out in [`ROLL_ORDER`].
    pub fn to_roll_order(&self) -> [u8; 6] {
        ROLL_ORDER.map(|ability| self.get(ability))
    }
}

/// Signed per-ability adjustments, e.g. racial bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBonuses {
    #[serde(default)]
    pub strength: i8,
    #[serde(default)]
    pub dexterity: i8,
    #[serde(default)]
    pub constitution: i8,
    #[serde(default)]
    pub intelligence: i8,
    #[serde(default)]
    pub wisdom: i8,
    #[serde(default)]
    pub charisma: i8,
}

impl AbilityBonuses {
    pub fn get(&self, ability: Ability) -> i8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }
}

/// Which abilities a class wants its best rolls in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityPriorities {
    pub strength: bool,
    pub dexterity: bool,
    pub constitution: bool,
    pub intelligence: bool,
    pub wisdom: bool,
    pub charisma: bool,
}

impl AbilityPriorities {
    pub fn of(abilities: &[Ability]) -> Self {
        let mut priorities = Self::default();
        for ability in abilities {
            match ability {
                Ability::Strength => priorities.strength = true,
                Ability::Dexterity => priorities.dexterity = true,
                Ability::Constitution => priorities.constitution = true,
                Ability::Intelligence => priorities.intelligence = true,
                Ability::Wisdom => priorities.wisdom = true,
                Ability::Charisma => priorities.charisma = true,
            }
        }
        priorities
    }

    pub fn get(&self, ability: Ability) -> bool {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// The six flags laid out in [`ROLL_ORDER`].
    pub fn to_roll_order(&self) -> [bool; 6] {
        ROLL_ORDER.map(|ability| self.get(ability))
    }
}

/// Roll six raw values with "4d6 keep highest 3".
pub fn roll_raw_scores<R: Rng + ?Sized>(rng: &mut R) -> [u8; 6] {
    let pool = DicePool::ability_roll();
    std::array::from_fn(|_| pool.roll_with_rng(rng).total as u8)
}

/// Move the best rolls into the prioritized slots.
///
/// With `k` prioritized slots, the top `min(k, 2)` rolls are handed out
/// (first occurrence wins on equal values). A priority slot already
/// holding one of those keeps it; the others take them in slot order.
/// Further priority slots take the best value among slots not yet
/// claimed. Every move is a swap, so the result is always a permutation
/// of `rolls`.
pub fn assign_by_priority(rolls: [u8; 6], priorities: [bool; 6]) -> [u8; 6] {
    let mut scores = rolls;
    let wanted = priorities.iter().filter(|&&p| p).count().min(2);
    if wanted == 0 {
        return scores;
    }

    let top = first_max_index(&rolls, |_| true);
    let runner_up = first_max_index(&rolls, |i| i != top);
    let sources = [top, runner_up];
    let delivered = &sources[..wanted];

    let mut claimed = [false; 6];
    for &source in delivered {
        claimed[source] = priorities[source];
    }
    let mut pending: Vec<usize> = delivered
        .iter()
        .copied()
        .filter(|&source| !priorities[source])
        .collect();

    let kept = claimed;
    for slot in (0..6).filter(|&i| priorities[i] && !kept[i]) {
        if !pending.is_empty() {
            let source = pending.remove(0);
            scores.swap(slot, source);
        } else {
            let best = first_max_index(&scores, |i| !claimed[i]);
            if scores[best] > scores[slot] {
                scores.swap(slot, best);
            }
        }
        claimed[slot] = true;
    }

    scores
}

/// Index of the first largest value among the indices `keep` accepts.
fn first_max_index(values: &[u8; 6], keep: impl Fn(usize) -> bool) -> usize {
    let mut best: Option<usize> = None;
    for i in (0..values.len()).filter(|&i| keep(i)) {
        match best {
            Some(b) if values[i] <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best.unwrap_or(0)
}

/// Roll six scores and reassign them according to class priorities.
pub fn generate_ability_scores<R: Rng + ?Sized>(
    priorities: AbilityPriorities,
    rng: &mut R,
) -> AbilityScores {
    let rolls = roll_raw_scores(rng);
    let assigned = assign_by_priority(rolls, priorities.to_roll_order());
    debug!(?rolls, ?assigned, "rolled ability scores");
    AbilityScores::from_roll_order(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sorted(values: [u8; 6]) -> [u8; 6] {
        let mut values = values;
        values.sort();
        values
    }

    #[test]
    fn test_no_priorities_is_identity() {
        let rolls = [12, 8, 17, 10, 15, 9];
        assert_eq!(assign_by_priority(rolls, [false; 6]), rolls);
    }

    #[test]
    fn test_two_priorities_get_top_rolls() {
        // Strength and Constitution prioritized.
        let rolls = [10, 12, 14, 8, 9, 15];
        let assigned = assign_by_priority(rolls, [true, false, true, false, false, false]);
        assert_eq!(assigned, [15, 12, 14, 8, 9, 10]);
    }

    #[test]
    fn test_priority_slot_keeps_its_top_roll() {
        // Dexterity already holds the runner-up; Charisma takes the max.
        let rolls = [18, 16, 9, 10, 11, 12];
        let assigned = assign_by_priority(rolls, [false, true, false, false, false, true]);
        assert_eq!(assigned, [12, 16, 9, 10, 11, 18]);
    }

    #[test]
    fn test_first_occurrence_wins_ties() {
        // Two 16s: the first one is the runner-up source.
        let rolls = [9, 16, 18, 16, 10, 11];
        let assigned = assign_by_priority(rolls, [true, false, false, false, true, false]);
        assert_eq!(assigned, [18, 10, 9, 16, 16, 11]);
        assert_eq!(sorted(assigned), sorted(rolls));
    }

    #[test]
    fn test_single_priority_takes_the_highest_roll() {
        // Strength holds a 14 that ties for runner-up; the 18 still moves in.
        let rolls = [14, 10, 18, 14, 14, 14];
        let assigned = assign_by_priority(rolls, [true, false, false, false, false, false]);
        assert_eq!(assigned[0], 18);
        assert_eq!(sorted(assigned), sorted(rolls));

        // A lone priority already holding the runner-up swaps for the top.
        let rolls = [9, 16, 18, 10, 11, 12];
        let assigned = assign_by_priority(rolls, [false, true, false, false, false, false]);
        assert_eq!(assigned, [9, 18, 16, 10, 11, 12]);
    }

    #[test]
    fn test_priority_slots_hold_the_top_rolls_for_every_flag_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        for mask in 1u8..64 {
            let flags: [bool; 6] = std::array::from_fn(|i| mask & (1 << i) != 0);
            let wanted = flags.iter().filter(|&&f| f).count().min(2);
            for _ in 0..500 {
                let rolls = roll_raw_scores(&mut rng);
                let assigned = assign_by_priority(rolls, flags);

                let mut best = sorted(rolls);
                best.reverse();
                let mut held: Vec<u8> = (0..6).filter(|&i| flags[i]).map(|i| assigned[i]).collect();
                held.sort_by(|a, b| b.cmp(a));
                assert_eq!(
                    &held[..wanted],
                    &best[..wanted],
                    "mask {mask:06b} rolls {rolls:?} out {assigned:?}"
                );
            }
        }
    }

    #[test]
    fn test_later_slot_holding_top_roll_keeps_it() {
        // Constitution already has the 18; Strength gets the 15.
        let rolls = [10, 12, 18, 8, 9, 15];
        let assigned = assign_by_priority(rolls, [true, false, true, false, false, false]);
        assert_eq!(assigned, [15, 12, 18, 8, 9, 10]);
    }

    #[test]
    fn test_all_equal_rolls() {
        let rolls = [11; 6];
        assert_eq!(assign_by_priority(rolls, [true; 6]), rolls);
    }

    #[test]
    fn test_extra_priorities_take_best_remaining() {
        let rolls = [8, 9, 10, 11, 12, 13];
        let assigned = assign_by_priority(rolls, [true, true, true, false, false, false]);
        assert_eq!(&assigned[..3], &[13, 12, 11]);
        assert_eq!(sorted(assigned), sorted(rolls));
    }

    #[test]
    fn test_permutation_invariant_for_every_flag_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for mask in 0u8..64 {
            let flags: [bool; 6] = std::array::from_fn(|i| mask & (1 << i) != 0);
            for _ in 0..50 {
                let rolls = roll_raw_scores(&mut rng);
                let assigned = assign_by_priority(rolls, flags);
                assert_eq!(sorted(assigned), sorted(rolls), "mask {mask:06b}");
            }
        }
    }

    #[test]
    fn test_two_priorities_hold_the_two_highest() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            let rolls = roll_raw_scores(&mut rng);
            let assigned = assign_by_priority(rolls, [false, true, false, true, false, false]);
            let desc = {
                let mut v = sorted(rolls);
                v.reverse();
                v
            };
            let mut got = [assigned[1], assigned[3]];
            got.sort_by(|a, b| b.cmp(a));
            assert_eq!(got, [desc[0], desc[1]]);
        }
    }

    #[test]
    fn test_generate_maps_roll_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let scores = generate_ability_scores(
            AbilityPriorities::of(&[Ability::Intelligence, Ability::Wisdom]),
            &mut rng,
        );
        let values = scores.to_roll_order();
        for value in values {
            assert!((3..=18).contains(&value));
        }
        let mut best = values;
        best.sort_by(|a, b| b.cmp(a));
        let mut casters = [scores.intelligence, scores.wisdom];
        casters.sort_by(|a, b| b.cmp(a));
        assert_eq!(casters, [best[0], best[1]]);
    }

    #[test]
    fn test_parse_ability() {
        assert_eq!(Ability::parse("Str"), Some(Ability::Strength));
        assert_eq!(Ability::parse("wisdom"), Some(Ability::Wisdom));
        assert_eq!(Ability::parse("Choose"), None);
    }
}
