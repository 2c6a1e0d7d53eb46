use rand::seq::SliceRandom;
use rand::Rng;

/// Which site class a "move to nearest" card targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearestKind {
    Railroad,
    Utility,
}

/// Typed card effects. Parameters ride on the variant instead of being
/// re-parsed from card text downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEffect {
    /// Relocate to a fixed position, crediting Go salary on a wrap.
    MoveTo { position: u8 },
    /// Relocate forward to the nearest railroad or utility.
    MoveToNearest(NearestKind),
    /// Move by a signed number of spaces; only forward moves credit Go.
    MoveBy { spaces: i8 },
    /// Pay the bank; the amount feeds the free-parking pot.
    PayBank { amount: u64 },
    CollectFromBank { amount: u64 },
    PayEachPlayer { amount: u64 },
    CollectFromEachPlayer { amount: u64 },
    GoToJail,
    GrantJailCard,
    /// Assessed per structure across everything the player owns.
    Repairs { per_house: u64, per_hotel: u64 },
}

/// A drawable card: display text plus its typed effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub text: &'static str,
    pub effect: CardEffect,
}

/// A finite deck drawn cyclically: the cursor wraps and cards are reused.
/// Shuffled once per game; see [`CardDeck::draw`] for the wrap behavior.
#[derive(Debug, Clone)]
pub struct CardDeck {
    cards: Vec<Card>,
    cursor: usize,
}

impl CardDeck {
    /// The standard Chance deck.
    pub fn chance() -> Self {
        Self {
            cards: vec![
                Card {
                    text: "Advance to Go (Collect $200)",
                    effect: CardEffect::MoveTo { position: 0 },
                },
                Card {
                    text: "Advance to Illinois Avenue",
                    effect: CardEffect::MoveTo { position: 24 },
                },
                Card {
                    text: "Advance to St. Charles Place",
                    effect: CardEffect::MoveTo { position: 11 },
                },
                Card {
                    text: "Advance to the nearest Utility",
                    effect: CardEffect::MoveToNearest(NearestKind::Utility),
                },
                Card {
                    text: "Advance to the nearest Railroad",
                    effect: CardEffect::MoveToNearest(NearestKind::Railroad),
                },
                Card {
                    text: "Advance to the nearest Railroad",
                    effect: CardEffect::MoveToNearest(NearestKind::Railroad),
                },
                Card {
                    text: "Bank pays you dividend of $50",
                    effect: CardEffect::CollectFromBank { amount: 50 },
                },
                Card { text: "Get Out of Jail Free", effect: CardEffect::GrantJailCard },
                Card { text: "Go back 3 spaces", effect: CardEffect::MoveBy { spaces: -3 } },
                Card { text: "Go directly to Jail", effect: CardEffect::GoToJail },
                Card {
                    text: "Make general repairs on all your property: $25 per house, $100 per hotel",
                    effect: CardEffect::Repairs { per_house: 25, per_hotel: 100 },
                },
                Card { text: "Pay poor tax of $15", effect: CardEffect::PayBank { amount: 15 } },
                Card {
                    text: "Take a trip to Reading Railroad",
                    effect: CardEffect::MoveTo { position: 5 },
                },
                Card {
                    text: "Take a walk on the Boardwalk",
                    effect: CardEffect::MoveTo { position: 39 },
                },
                Card {
                    text: "You have been elected Chairman of the Board: pay each player $50",
                    effect: CardEffect::PayEachPlayer { amount: 50 },
                },
                Card {
                    text: "Your building loan matures: collect $150",
                    effect: CardEffect::CollectFromBank { amount: 150 },
                },
            ],
            cursor: 0,
        }
    }

    /// The standard Community Chest deck.
    pub fn community_chest() -> Self {
        Self {
            cards: vec![
                Card {
                    text: "Advance to Go (Collect $200)",
                    effect: CardEffect::MoveTo { position: 0 },
                },
                Card {
                    text: "Bank error in your favor: collect $200",
                    effect: CardEffect::CollectFromBank { amount: 200 },
                },
                Card { text: "Doctor's fees: pay $50", effect: CardEffect::PayBank { amount: 50 } },
                Card {
                    text: "From sale of stock you get $50",
                    effect: CardEffect::CollectFromBank { amount: 50 },
                },
                Card { text: "Get Out of Jail Free", effect: CardEffect::GrantJailCard },
                Card { text: "Go directly to Jail", effect: CardEffect::GoToJail },
                Card {
                    text: "Holiday fund matures: collect $100",
                    effect: CardEffect::CollectFromBank { amount: 100 },
                },
                Card {
                    text: "Income tax refund: collect $20",
                    effect: CardEffect::CollectFromBank { amount: 20 },
                },
                Card {
                    text: "It is your birthday: collect $10 from every player",
                    effect: CardEffect::CollectFromEachPlayer { amount: 10 },
                },
                Card {
                    text: "Life insurance matures: collect $100",
                    effect: CardEffect::CollectFromBank { amount: 100 },
                },
                Card {
                    text: "Pay hospital fees of $100",
                    effect: CardEffect::PayBank { amount: 100 },
                },
                Card { text: "Pay school fees of $50", effect: CardEffect::PayBank { amount: 50 } },
                Card {
                    text: "Receive $25 consultancy fee",
                    effect: CardEffect::CollectFromBank { amount: 25 },
                },
                Card {
                    text: "You are assessed for street repairs: $40 per house, $115 per hotel",
                    effect: CardEffect::Repairs { per_house: 40, per_hotel: 115 },
                },
                Card {
                    text: "You have won second prize in a beauty contest: collect $10",
                    effect: CardEffect::CollectFromBank { amount: 10 },
                },
                Card {
                    text: "You inherit $100",
                    effect: CardEffect::CollectFromBank { amount: 100 },
                },
            ],
            cursor: 0,
        }
    }

    /// A deck with a fixed card order, for variants and tests.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        assert!(!cards.is_empty(), "a deck needs at least one card");
        Self { cards, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using the provided RNG; resets the cursor.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.cursor = 0;
    }

    /// Draw the card at the cursor and advance it cyclically. Returns the
    /// card and whether the cursor wrapped back to the top of the deck
    /// (callers reshuffle at that point if their policy asks for it).
    pub fn draw(&mut self) -> (Card, bool) {
        let card = self.cards[self.cursor];
        self.cursor = (self.cursor + 1) % self.cards.len();
        (card, self.cursor == 0)
    }
}
