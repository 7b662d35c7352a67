//! Dice rolling.
//!
//! Only what the generator rolls: pools of one die type, optionally keeping
//! the highest few, such as `4d6kh3` for an ability score or `4d8` for hit
//! points gained over several levels.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard D&D die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            _ => None,
        }
    }

    /// Roll a single die of this type.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.sides())
    }

    /// Rounded-up average of one die, as used for fixed hit point gains.
    pub fn average(&self) -> u32 {
        self.sides() / 2 + 1
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// `count` dice of one type, summing either all of them or the highest few.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    pub count: u32,
    pub die_type: DieType,
    /// Keep only this many of the highest dice.
    pub keep_highest: Option<u32>,
}

impl DicePool {
    pub fn new(count: u32, die_type: DieType) -> Self {
        Self {
            count,
            die_type,
            keep_highest: None,
        }
    }

    /// Roll four d6 and keep the highest three.
    pub fn ability_roll() -> Self {
        Self {
            keep_highest: Some(3),
            ..Self::new(4, DieType::D6)
        }
    }

    pub fn roll_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> RollResult {
        let rolls: Vec<u32> = (0..self.count).map(|_| self.die_type.roll(rng)).collect();

        let mut kept = rolls.clone();
        if let Some(n) = self.keep_highest {
            kept.sort_by(|a, b| b.cmp(a));
            kept.truncate(n as usize);
        }

        RollResult {
            total: kept.iter().sum(),
            rolls,
            kept,
        }
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die_type)?;
        if let Some(n) = self.keep_highest {
            write!(f, "kh{n}")?;
        }
        Ok(())
    }
}

/// Result of rolling a [`DicePool`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub rolls: Vec<u32>,
    pub kept: Vec<u32>,
    pub total: u32,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} = {}", self.kept, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ability_roll_notation() {
        assert_eq!(DicePool::ability_roll().to_string(), "4d6kh3");
        assert_eq!(DicePool::new(3, DieType::D10).to_string(), "3d10");
    }

    #[test]
    fn test_keep_highest_drops_lowest() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pool = DicePool::ability_roll();
        for _ in 0..200 {
            let result = pool.roll_with_rng(&mut rng);
            assert_eq!(result.rolls.len(), 4);
            assert_eq!(result.kept.len(), 3);

            let mut sorted = result.rolls.clone();
            sorted.sort();
            let expected: u32 = sorted[1..].iter().sum();
            assert_eq!(result.total, expected);
            assert!((3..=18).contains(&result.total));
        }
    }

    #[test]
    fn test_plain_pool_keeps_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let pool = DicePool::new(5, DieType::D8);
        for _ in 0..100 {
            let result = pool.roll_with_rng(&mut rng);
            assert_eq!(result.kept, result.rolls);
            assert!((5..=40).contains(&result.total));
        }
        assert_eq!(DicePool::new(0, DieType::D8).roll_with_rng(&mut rng).total, 0);
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let pool = DicePool::new(2, DieType::D6);
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(pool.roll_with_rng(&mut a), pool.roll_with_rng(&mut b));
        }
    }

    #[test]
    fn test_die_sides_round_trip() {
        for die in [DieType::D4, DieType::D6, DieType::D8, DieType::D10, DieType::D12, DieType::D20] {
            assert_eq!(DieType::from_sides(die.sides()), Some(die));
        }
        assert_eq!(DieType::from_sides(7), None);
    }

    #[test]
    fn test_die_average() {
        assert_eq!(DieType::D6.average(), 4);
        assert_eq!(DieType::D8.average(), 5);
        assert_eq!(DieType::D10.average(), 6);
        assert_eq!(DieType::D12.average(), 7);
    }
}
