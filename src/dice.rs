use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Outcome of rolling two six-sided dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    pub die1: u8,
    pub die2: u8,
}

impl DiceRoll {
    pub const fn total(self) -> u8 {
        self.die1 + self.die2
    }

    pub const fn is_doubles(self) -> bool {
        self.die1 == self.die2
    }
}

#[derive(Debug, Clone)]
enum Source {
    Seeded(ChaCha8Rng),
    Scripted { rolls: Vec<DiceRoll>, at: usize },
}

/// Two-die roller. Seeded for reproducible games; scripted when a test
/// needs to assert an exact sequence of moves.
///
/// ```
/// use monopoly_rs::dice::Dice;
///
/// let mut a = Dice::seeded(42);
/// let mut b = Dice::seeded(42);
/// assert_eq!(a.roll(), b.roll());
/// ```
#[derive(Debug, Clone)]
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn seeded(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    /// Roll a fixed sequence, cycling when it runs out. Panics on an
    /// empty script or a die outside 1-6.
    pub fn scripted(rolls: &[(u8, u8)]) -> Self {
        assert!(!rolls.is_empty(), "a dice script needs at least one roll");
        let rolls = rolls
            .iter()
            .map(|&(die1, die2)| {
                assert!((1..=6).contains(&die1) && (1..=6).contains(&die2), "die out of range");
                DiceRoll { die1, die2 }
            })
            .collect();
        Self { source: Source::Scripted { rolls, at: 0 } }
    }

    pub fn roll(&mut self) -> DiceRoll {
        match &mut self.source {
            Source::Seeded(rng) => {
                DiceRoll { die1: rng.random_range(1..=6), die2: rng.random_range(1..=6) }
            }
            Source::Scripted { rolls, at } => {
                let roll = rolls[*at];
                *at = (*at + 1) % rolls.len();
                roll
            }
        }
    }
}
