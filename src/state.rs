use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::auction::AuctionState;
use crate::board::{
    Board, PropertyClass, Space, SpaceKind, BOARD_SIZE, GO_SALARY, JAIL_POSITION,
};
use crate::cards::{Card, CardDeck};
use crate::dice::DiceRoll;
use crate::log::{Actor, EventLog};

/// Cash every player starts with.
pub const STARTING_CASH: u64 = 1500;

/// Policy knobs for rule points the reference rules leave open. Defaults
/// match the house rules of the original game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub starting_cash: u64,
    /// Landing on Free Parking collects the accumulated pot.
    pub free_parking_payout: bool,
    /// Reshuffle a deck when its cursor wraps instead of replaying it in order.
    pub reshuffle_on_exhaust: bool,
    /// Require houses to be spread evenly across a color group.
    pub enforce_even_building: bool,
    /// Safety bound on auction length, in full rounds of the remaining bidders.
    pub auction_round_cap: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cash: STARTING_CASH,
            free_parking_payout: true,
            reshuffle_on_exhaust: false,
            enforce_even_building: false,
            auction_round_cap: 20,
        }
    }
}

/// Whether the session is still being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Ended,
}

/// Marker for the sub-decision the turn machine is suspended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    None,
    JailDecision,
    BuyDecision,
    Auction,
    CardEffect,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) name: String,
    pub(crate) cash: u64,
    pub(crate) position: u8,
    pub(crate) owned: Vec<u8>,
    pub(crate) in_jail: bool,
    pub(crate) jail_turns: u8,
    pub(crate) jail_cards: u8,
    pub(crate) bankrupt: bool,
}

impl Player {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cash(&self) -> u64 {
        self.cash
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// Board positions of everything this player owns.
    pub fn owned(&self) -> &[u8] {
        &self.owned
    }

    pub fn in_jail(&self) -> bool {
        self.in_jail
    }

    /// Failed escape rolls so far this jail stay (0-2).
    pub fn jail_turns(&self) -> u8 {
        self.jail_turns
    }

    pub fn jail_cards(&self) -> u8 {
        self.jail_cards
    }

    pub fn is_bankrupt(&self) -> bool {
        self.bankrupt
    }
}

/// A purchasable site: fixed catalog fields plus mutable ownership state.
#[derive(Debug, Clone)]
pub struct Property {
    pub(crate) name: &'static str,
    pub(crate) position: u8,
    pub(crate) class: PropertyClass,
    pub(crate) price: u64,
    pub(crate) rent: &'static [u64],
    pub(crate) house_cost: u64,
    pub(crate) mortgage_value: u64,
    pub(crate) owner: Option<usize>,
    pub(crate) houses: u8,
    pub(crate) has_hotel: bool,
    pub(crate) mortgaged: bool,
}

impl Property {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn class(&self) -> PropertyClass {
        self.class
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn house_cost(&self) -> u64 {
        self.house_cost
    }

    /// Hotel upgrade cost. The standard board prices it at the house cost.
    pub fn hotel_cost(&self) -> u64 {
        self.house_cost
    }

    pub fn mortgage_value(&self) -> u64 {
        self.mortgage_value
    }

    pub fn rent_table(&self) -> &'static [u64] {
        self.rent
    }

    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    pub fn houses(&self) -> u8 {
        self.houses
    }

    pub fn has_hotel(&self) -> bool {
        self.has_hotel
    }

    pub fn is_mortgaged(&self) -> bool {
        self.mortgaged
    }

    pub fn is_street(&self) -> bool {
        matches!(self.class, PropertyClass::Street(_))
    }
}

/// The aggregate session state. Owned by a single control flow (the turn
/// controller); every mutation goes through the ledger/auction/turn code
/// and is logged before the next suspension point.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) board: &'static Board,
    pub(crate) players: Vec<Player>,
    pub(crate) properties: Vec<Property>,
    pub(crate) chance: CardDeck,
    pub(crate) community_chest: CardDeck,
    pub(crate) deck_rng: ChaCha8Rng,
    pub(crate) current_player: usize,
    pub(crate) last_roll: Option<DiceRoll>,
    pub(crate) doubles_count: u8,
    pub(crate) phase: GamePhase,
    pub(crate) winner: Option<usize>,
    pub(crate) free_parking_pot: u64,
    pub(crate) turn_number: u32,
    pub(crate) pending: PendingAction,
    pub(crate) auction: Option<AuctionState>,
    pub(crate) log: EventLog,
}

impl GameState {
    /// A fresh game with `num_players` seats named `P1..` and default config.
    /// Both decks are shuffled from `seed`.
    pub fn new(num_players: usize, seed: u64) -> Self {
        Self::with_config(num_players, GameConfig::default(), seed)
    }

    pub fn with_config(num_players: usize, config: GameConfig, seed: u64) -> Self {
        assert!(num_players >= 2, "a game needs at least two players");
        let board = Board::standard();
        let players = (1..=num_players)
            .map(|i| Player {
                name: format!("P{i}"),
                cash: config.starting_cash,
                position: 0,
                owned: Vec::new(),
                in_jail: false,
                jail_turns: 0,
                jail_cards: 0,
                bankrupt: false,
            })
            .collect();
        let properties = board
            .site_positions()
            .map(|pos| {
                let space = board.space(pos);
                match space.kind {
                    SpaceKind::Site { class, price, rent, house_cost, mortgage } => Property {
                        name: space.name,
                        position: pos,
                        class,
                        price,
                        rent,
                        house_cost,
                        mortgage_value: mortgage,
                        owner: None,
                        houses: 0,
                        has_hotel: false,
                        mortgaged: false,
                    },
                    _ => unreachable!("site_positions yields only sites"),
                }
            })
            .collect();

        let mut deck_rng = ChaCha8Rng::seed_from_u64(seed);
        let mut chance = CardDeck::chance();
        let mut community_chest = CardDeck::community_chest();
        chance.shuffle_with(&mut deck_rng);
        community_chest.shuffle_with(&mut deck_rng);

        let mut state = Self {
            config,
            board,
            players,
            properties,
            chance,
            community_chest,
            deck_rng,
            current_player: 0,
            last_roll: None,
            doubles_count: 0,
            phase: GamePhase::Playing,
            winner: None,
            free_parking_pot: 0,
            turn_number: 1,
            pending: PendingAction::None,
            auction: None,
            log: EventLog::new(),
        };
        state.log_system("Game started".into());
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &'static Board {
        self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, idx: usize) -> &Player {
        &self.players[idx]
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn last_roll(&self) -> Option<DiceRoll> {
        self.last_roll
    }

    pub fn doubles_count(&self) -> u8 {
        self.doubles_count
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn free_parking_pot(&self) -> u64 {
        self.free_parking_pot
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn pending(&self) -> PendingAction {
        self.pending
    }

    /// The auction in progress, if any.
    pub fn auction(&self) -> Option<&AuctionState> {
        self.auction.as_ref()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    pub fn space(&self, position: u8) -> &Space {
        self.board.space(position)
    }

    pub fn property_at(&self, position: u8) -> Option<&Property> {
        self.properties.iter().find(|p| p.position == position)
    }

    pub(crate) fn property_at_mut(&mut self, position: u8) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.position == position)
    }

    /// Indices of every non-bankrupt player, in table order.
    pub fn active_players(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.bankrupt)
            .map(|(i, _)| i)
            .collect()
    }

    /// Advance a player by `spaces` forward, crediting Go salary when the
    /// move crosses or lands on Go. Bankrupt players must never move.
    pub(crate) fn move_by(&mut self, idx: usize, spaces: u8, collect_go: bool) {
        assert!(!self.players[idx].bankrupt, "cannot move a bankrupt player");
        let from = self.players[idx].position;
        let passed_go = collect_go && spaces > 0 && from as u16 + spaces as u16 >= BOARD_SIZE as u16;
        self.players[idx].position = (from + spaces) % BOARD_SIZE;
        if passed_go {
            self.credit(idx, GO_SALARY);
            self.log_player(idx, format!("passed Go and collected ${GO_SALARY}"));
        }
    }

    /// Move a player backward by `spaces`, never crediting Go.
    pub(crate) fn move_back(&mut self, idx: usize, spaces: u8) {
        assert!(!self.players[idx].bankrupt, "cannot move a bankrupt player");
        let from = self.players[idx].position;
        self.players[idx].position = (from + BOARD_SIZE - spaces % BOARD_SIZE) % BOARD_SIZE;
    }

    /// Relocate a player directly. Credits Go salary only when asked, the
    /// destination precedes the current position (the token wraps past Go),
    /// and the destination is not Jail.
    pub(crate) fn move_to(&mut self, idx: usize, position: u8, collect_go: bool) {
        assert!(!self.players[idx].bankrupt, "cannot move a bankrupt player");
        let from = self.players[idx].position;
        let passed_go = collect_go && position < from && position != JAIL_POSITION;
        self.players[idx].position = position;
        if passed_go {
            self.credit(idx, GO_SALARY);
            self.log_player(idx, format!("passed Go and collected ${GO_SALARY}"));
        }
    }

    /// Draw from the Chance deck, honoring the reshuffle policy at the wrap.
    pub(crate) fn draw_chance(&mut self) -> Card {
        let (card, wrapped) = self.chance.draw();
        if wrapped && self.config.reshuffle_on_exhaust {
            self.chance.shuffle_with(&mut self.deck_rng);
        }
        card
    }

    pub(crate) fn draw_community_chest(&mut self) -> Card {
        let (card, wrapped) = self.community_chest.draw();
        if wrapped && self.config.reshuffle_on_exhaust {
            self.community_chest.shuffle_with(&mut self.deck_rng);
        }
        card
    }

    pub(crate) fn log_player(&mut self, idx: usize, message: String) {
        let turn = self.turn_number;
        let named = format!("{}: {}", self.players[idx].name, message);
        self.log.push(turn, Actor::Player(idx), named);
    }

    pub(crate) fn log_system(&mut self, message: String) {
        let turn = self.turn_number;
        self.log.push(turn, Actor::System, message);
    }

    /// End the session if a single solvent player remains.
    pub(crate) fn check_winner(&mut self) {
        let active = self.active_players();
        if active.len() == 1 && self.phase == GamePhase::Playing {
            let idx = active[0];
            self.phase = GamePhase::Ended;
            self.winner = Some(idx);
            self.log_player(idx, "won the game".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_seats_players_with_starting_cash() {
        let state = GameState::new(3, 1);
        assert_eq!(state.players().len(), 3);
        for p in state.players() {
            assert_eq!(p.cash(), STARTING_CASH);
            assert_eq!(p.position(), 0);
            assert!(!p.is_bankrupt());
        }
        assert_eq!(state.properties().len(), 28);
        assert_eq!(state.turn_number(), 1);
    }

    #[test]
    fn same_seed_shuffles_decks_identically() {
        let mut a = GameState::new(2, 77);
        let mut b = GameState::new(2, 77);
        for _ in 0..16 {
            assert_eq!(a.draw_chance(), b.draw_chance());
        }
    }

    #[test]
    fn move_by_credits_go_on_wrap() {
        let mut state = GameState::new(2, 1);
        state.players[0].position = 38;
        state.move_by(0, 4, true);
        assert_eq!(state.player(0).position(), 2);
        assert_eq!(state.player(0).cash(), STARTING_CASH + GO_SALARY);
    }

    #[test]
    fn move_by_landing_exactly_on_go_credits() {
        let mut state = GameState::new(2, 1);
        state.players[0].position = 35;
        state.move_by(0, 5, true);
        assert_eq!(state.player(0).position(), 0);
        assert_eq!(state.player(0).cash(), STARTING_CASH + GO_SALARY);
    }

    #[test]
    fn move_to_credits_only_on_wrap_and_not_to_jail() {
        let mut state = GameState::new(2, 1);
        state.players[0].position = 30;
        state.move_to(0, 5, true);
        assert_eq!(state.player(0).cash(), STARTING_CASH + GO_SALARY);

        state.players[1].position = 30;
        state.move_to(1, JAIL_POSITION, true);
        assert_eq!(state.player(1).cash(), STARTING_CASH);
    }

    #[test]
    fn move_back_never_credits_go() {
        let mut state = GameState::new(2, 1);
        state.players[0].position = 2;
        state.move_back(0, 3);
        assert_eq!(state.player(0).position(), 39);
        assert_eq!(state.player(0).cash(), STARTING_CASH);
    }

    #[test]
    fn check_winner_ends_game_with_single_survivor() {
        let mut state = GameState::new(3, 1);
        state.players[0].bankrupt = true;
        state.players[2].bankrupt = true;
        state.check_winner();
        assert_eq!(state.phase(), GamePhase::Ended);
        assert_eq!(state.winner(), Some(1));
    }

    #[test]
    #[should_panic(expected = "bankrupt")]
    fn moving_a_bankrupt_player_panics() {
        let mut state = GameState::new(2, 1);
        state.players[0].bankrupt = true;
        state.move_by(0, 5, true);
    }
}
