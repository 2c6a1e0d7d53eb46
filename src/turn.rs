//! The turn state machine: roll, move, resolve the landing, run any
//! pending sub-decision, offer a build, end the turn.
//!
//! The controller is the single writer of [`GameState`]. It suspends only
//! to ask a [`crate::decision::DecisionProvider`] for a choice, one call
//! at a time; every ledger mutation lands in the event log before the
//! next suspension point. Provider failures never stall a turn: each
//! suspension degrades to a deterministic fallback (see
//! [`crate::decision::resolve`]).

use tracing::debug;

use crate::auction::run_auction;
use crate::board::SpaceKind;
use crate::cards::{Card, CardEffect, NearestKind};
use crate::decision::{self, Action, DecisionKind, DecisionRequest, Resolved, Snapshot};
use crate::dice::Dice;
use crate::ledger::LedgerError;
use crate::providers::ProviderTable;
use crate::state::{GameState, GamePhase, PendingAction};

/// Drives the game. Owns the dice and the per-seat providers; the
/// [`GameState`] is passed in explicitly so tests can run many instances
/// side by side.
pub struct TurnController {
    dice: Dice,
    providers: ProviderTable,
}

impl TurnController {
    pub fn new(dice: Dice, providers: ProviderTable) -> Self {
        Self { dice, providers }
    }

    pub fn providers_mut(&mut self) -> &mut ProviderTable {
        &mut self.providers
    }

    /// Play one complete turn for the current player, including any
    /// doubles re-rolls, then advance to the next non-bankrupt player.
    /// A no-op once the game has ended.
    pub fn play_turn(&mut self, state: &mut GameState) {
        if state.phase() == GamePhase::Ended {
            return;
        }
        let idx = state.current_player();
        assert!(!state.player(idx).is_bankrupt(), "current player must be solvent");

        if state.player(idx).in_jail() {
            state.pending = PendingAction::JailDecision;
            self.jail_turn(state, idx);
            self.end_turn(state);
            return;
        }

        loop {
            let roll = self.dice.roll();
            state.last_roll = Some(roll);
            state.doubles_count = if roll.is_doubles() { state.doubles_count + 1 } else { 0 };
            state.log_player(
                idx,
                format!(
                    "rolled {} + {} = {}{}",
                    roll.die1,
                    roll.die2,
                    roll.total(),
                    if roll.is_doubles() { " (doubles)" } else { "" }
                ),
            );

            if state.doubles_count() >= 3 {
                state.log_player(idx, "rolled doubles three times and goes to Jail".into());
                state.send_to_jail(idx);
                break;
            }

            state.move_by(idx, roll.total(), true);
            self.resolve_landing(state, idx, roll.total());

            let repeat = roll.is_doubles()
                && state.phase() == GamePhase::Playing
                && !state.player(idx).is_bankrupt()
                && !state.player(idx).in_jail();
            if !repeat {
                break;
            }
            debug!(player = idx, "doubles grant another roll");
        }

        self.end_turn(state);
    }

    /// Play turns until a winner emerges or `max_turns` have gone by.
    pub fn play_to_completion(&mut self, state: &mut GameState, max_turns: u32) -> Option<usize> {
        for _ in 0..max_turns {
            if state.phase() == GamePhase::Ended {
                break;
            }
            self.play_turn(state);
        }
        state.winner()
    }

    fn jail_turn(&mut self, state: &mut GameState, idx: usize) {
        let mut options = vec![Action::Roll];
        if state.player(idx).cash() >= crate::board::JAIL_FINE {
            options.push(Action::PayFine);
        }
        if state.player(idx).jail_cards() > 0 {
            options.push(Action::UseCard);
        }
        let request = DecisionRequest::new(
            DecisionKind::Jail { attempt: state.player(idx).jail_turns() + 1 },
            options,
        );
        let resolved = self.ask(state, idx, &request);
        state.log_player(idx, format!("chose to {} ({})", resolved.action, resolved.reasoning));

        match resolved.action {
            Action::PayFine => {
                if state.pay_jail_fine(idx).is_ok() {
                    self.roll_and_move(state, idx);
                }
            }
            Action::UseCard => {
                if state.use_jail_card(idx).is_ok() {
                    self.roll_and_move(state, idx);
                }
            }
            _ => {
                let roll = self.dice.roll();
                state.last_roll = Some(roll);
                state.log_player(
                    idx,
                    format!(
                        "rolled {} + {}{}",
                        roll.die1,
                        roll.die2,
                        if roll.is_doubles() { " (doubles, free)" } else { "" }
                    ),
                );
                if roll.is_doubles() {
                    state.release_from_jail(idx);
                    state.move_by(idx, roll.total(), true);
                    self.resolve_landing(state, idx, roll.total());
                } else if state.player(idx).jail_turns() >= 2 {
                    // Third failed attempt: the fine comes due.
                    match state.pay_jail_fine(idx) {
                        Ok(()) => {
                            state.move_by(idx, roll.total(), true);
                            self.resolve_landing(state, idx, roll.total());
                        }
                        Err(_) => state.settle_bankruptcy(idx, None),
                    }
                } else {
                    state.players[idx].jail_turns += 1;
                }
            }
        }
    }

    /// Shared exit path for paying or carding out of jail.
    fn roll_and_move(&mut self, state: &mut GameState, idx: usize) {
        let roll = self.dice.roll();
        state.last_roll = Some(roll);
        state.log_player(idx, format!("rolled {} + {} = {}", roll.die1, roll.die2, roll.total()));
        state.move_by(idx, roll.total(), true);
        self.resolve_landing(state, idx, roll.total());
    }

    fn resolve_landing(&mut self, state: &mut GameState, idx: usize, dice_total: u8) {
        let position = state.player(idx).position();
        let space = *state.space(position);
        state.log_player(idx, format!("landed on {}", space.name));

        match space.kind {
            SpaceKind::Site { .. } => self.resolve_site(state, idx, position, dice_total),
            SpaceKind::Chance => {
                let card = state.draw_chance();
                self.apply_card(state, idx, card);
            }
            SpaceKind::CommunityChest => {
                let card = state.draw_community_chest();
                self.apply_card(state, idx, card);
            }
            SpaceKind::Tax { amount } => match state.pay(idx, amount) {
                Ok(()) => {
                    state.free_parking_pot += amount;
                    state.log_player(idx, format!("paid ${amount} in taxes"));
                }
                Err(_) => {
                    state.log_player(idx, format!("cannot pay ${amount} in taxes"));
                    state.settle_bankruptcy(idx, None);
                }
            },
            SpaceKind::GoToJail => state.send_to_jail(idx),
            SpaceKind::FreeParking => {
                let pot = state.free_parking_pot();
                if state.config().free_parking_payout && pot > 0 {
                    state.free_parking_pot = 0;
                    state.credit(idx, pot);
                    state.log_player(idx, format!("collected ${pot} from Free Parking"));
                }
            }
            SpaceKind::Go | SpaceKind::Jail => {}
        }

        if state.phase() == GamePhase::Playing && !state.player(idx).is_bankrupt() {
            self.build_phase(state, idx);
        }
    }

    fn resolve_site(&mut self, state: &mut GameState, idx: usize, position: u8, dice_total: u8) {
        let (owner, mortgaged, price) = {
            let prop = state.property_at(position).expect("site spaces have properties");
            (prop.owner(), prop.is_mortgaged(), prop.price())
        };
        match owner {
            None => {
                if state.player(idx).cash() >= price {
                    state.pending = PendingAction::BuyDecision;
                    let request = DecisionRequest::new(
                        DecisionKind::BuyOrAuction { position, price },
                        vec![Action::Buy, Action::Auction],
                    );
                    let resolved = self.ask(state, idx, &request);
                    state.log_player(
                        idx,
                        format!("decided to {} ({})", resolved.action, resolved.reasoning),
                    );
                    state.pending = PendingAction::None;
                    match resolved.action {
                        Action::Buy => match state.purchase_property(idx, position) {
                            Ok(()) => {}
                            // Affordability was checked at landing time and
                            // nothing has debited the player since.
                            Err(err) => unreachable!("vetted purchase failed: {err}"),
                        },
                        _ => {
                            run_auction(state, &mut self.providers, position);
                        }
                    }
                } else {
                    // Unaffordable at landing time: straight to auction.
                    run_auction(state, &mut self.providers, position);
                }
            }
            Some(owner) if owner != idx && !mortgaged => {
                let rent = state.rent_for(position, dice_total);
                match state.transfer(idx, owner, rent) {
                    Ok(()) => {
                        let owner_name = state.player(owner).name().to_string();
                        state.log_player(idx, format!("paid ${rent} rent to {owner_name}"));
                    }
                    Err(LedgerError::InsufficientFunds { .. }) => {
                        state.log_player(idx, format!("cannot afford ${rent} rent"));
                        state.settle_bankruptcy(idx, Some(owner));
                    }
                    Err(err) => unreachable!("rent transfer rejected: {err}"),
                }
            }
            Some(_) => {}
        }
    }

    fn apply_card(&mut self, state: &mut GameState, idx: usize, card: Card) {
        state.pending = PendingAction::CardEffect;
        state.log_player(idx, format!("drew: \"{}\"", card.text));

        match card.effect {
            CardEffect::MoveTo { position } => state.move_to(idx, position, true),
            CardEffect::MoveToNearest(kind) => {
                let class = match kind {
                    NearestKind::Railroad => crate::board::PropertyClass::Railroad,
                    NearestKind::Utility => crate::board::PropertyClass::Utility,
                };
                let from = state.player(idx).position();
                let target = state.board().nearest_of_class(from, class);
                state.move_to(idx, target, true);
            }
            CardEffect::MoveBy { spaces } => {
                if spaces >= 0 {
                    state.move_by(idx, spaces as u8, true);
                } else {
                    state.move_back(idx, spaces.unsigned_abs());
                }
            }
            CardEffect::PayBank { amount } => match state.pay(idx, amount) {
                Ok(()) => state.free_parking_pot += amount,
                Err(_) => {
                    state.log_player(idx, format!("cannot pay ${amount}"));
                    state.settle_bankruptcy(idx, None);
                }
            },
            CardEffect::CollectFromBank { amount } => state.credit(idx, amount),
            CardEffect::PayEachPlayer { amount } => {
                let others: Vec<usize> =
                    state.active_players().into_iter().filter(|&p| p != idx).collect();
                for other in others {
                    if state.transfer(idx, other, amount).is_err() {
                        state.log_player(idx, format!("cannot pay ${amount} owed"));
                        state.settle_bankruptcy(idx, Some(other));
                        break;
                    }
                }
            }
            CardEffect::CollectFromEachPlayer { amount } => {
                let others: Vec<usize> =
                    state.active_players().into_iter().filter(|&p| p != idx).collect();
                for other in others {
                    if state.transfer(other, idx, amount).is_err() {
                        let name = state.player(other).name().to_string();
                        state.log_system(format!("{name} cannot pay ${amount} owed"));
                        state.settle_bankruptcy(other, Some(idx));
                    }
                }
            }
            CardEffect::GoToJail => state.send_to_jail(idx),
            CardEffect::GrantJailCard => {
                state.players[idx].jail_cards += 1;
                state.log_player(idx, "received a Get Out of Jail Free card".into());
            }
            CardEffect::Repairs { per_house, per_hotel } => {
                let due = state.repairs_due(idx, per_house, per_hotel);
                if due > 0 {
                    match state.pay(idx, due) {
                        Ok(()) => state.log_player(idx, format!("paid ${due} for repairs")),
                        Err(_) => {
                            state.log_player(idx, format!("cannot pay ${due} for repairs"));
                            state.settle_bankruptcy(idx, None);
                        }
                    }
                }
            }
        }
        if state.pending == PendingAction::CardEffect {
            state.pending = PendingAction::None;
        }
    }

    /// One optional house per turn, chosen explicitly.
    fn build_phase(&mut self, state: &mut GameState, idx: usize) {
        let candidates = state.buildable_positions(idx);
        if candidates.is_empty() {
            return;
        }
        let mut options = vec![Action::Skip];
        options.extend(candidates.iter().map(|&p| Action::Build(p)));
        let request =
            DecisionRequest::new(DecisionKind::Build { candidates: candidates.clone() }, options);
        let resolved = self.ask(state, idx, &request);
        if let Action::Build(position) = resolved.action {
            if candidates.contains(&position) {
                match state.build_house(idx, position) {
                    Ok(()) => {}
                    Err(err) => {
                        state.log_player(idx, format!("build rejected: {err}"));
                    }
                }
            }
        }
    }

    /// Capture a snapshot, ask the seat's provider, vet the answer.
    fn ask(&mut self, state: &mut GameState, idx: usize, request: &DecisionRequest) -> Resolved {
        let snapshot = Snapshot::capture(state, idx);
        let resolved = decision::resolve(self.providers.decide(idx, &snapshot, request), request);
        if resolved.degraded {
            state.log_player(idx, format!("decision degraded: {}", resolved.reasoning));
        }
        resolved
    }

    fn end_turn(&mut self, state: &mut GameState) {
        if state.phase() == GamePhase::Ended {
            return;
        }
        let n = state.players().len();
        let mut next = state.current_player();
        loop {
            next = (next + 1) % n;
            if !state.player(next).is_bankrupt() {
                break;
            }
        }
        state.current_player = next;
        state.doubles_count = 0;
        state.pending = PendingAction::None;
        state.turn_number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Decision, DecisionError, DecisionProvider};

    /// Answers every request with a fixed action.
    struct Always(Action);

    impl DecisionProvider for Always {
        fn decide(
            &mut self,
            _snapshot: &Snapshot,
            _request: &DecisionRequest,
        ) -> Result<Decision, DecisionError> {
            Ok(Decision { action: self.0, reasoning: "fixed".into(), confidence: 1.0 })
        }
    }

    fn controller_with(actions: Vec<Action>, dice_seed: u64) -> TurnController {
        let mut providers = ProviderTable::for_seats(actions.len());
        for (seat, action) in actions.into_iter().enumerate() {
            providers.set(seat, Some(Box::new(Always(action))));
        }
        TurnController::new(Dice::seeded(dice_seed), providers)
    }

    #[test]
    fn turn_advances_past_bankrupt_players() {
        let mut state = GameState::new(3, 1);
        let mut controller = controller_with(vec![Action::Auction; 3], 1);
        state.players[1].bankrupt = true;
        controller.end_turn(&mut state);
        assert_eq!(state.current_player(), 2);
    }

    #[test]
    fn ended_game_is_a_noop() {
        let mut state = GameState::new(2, 1);
        state.players[1].bankrupt = true;
        state.check_winner();
        let turn = state.turn_number();
        let mut controller = controller_with(vec![Action::Auction; 2], 1);
        controller.play_turn(&mut state);
        assert_eq!(state.turn_number(), turn);
    }

    #[test]
    fn turn_counter_increments_each_turn() {
        let mut state = GameState::new(2, 3);
        let mut controller = controller_with(vec![Action::Auction; 2], 3);
        let before = state.turn_number();
        controller.play_turn(&mut state);
        assert_eq!(state.turn_number(), before + 1);
    }

    fn scripted_controller(actions: Vec<Action>, rolls: &[(u8, u8)]) -> TurnController {
        let mut providers = ProviderTable::for_seats(actions.len());
        for (seat, action) in actions.into_iter().enumerate() {
            providers.set(seat, Some(Box::new(Always(action))));
        }
        TurnController::new(Dice::scripted(rolls), providers)
    }

    #[test]
    fn unpayable_rent_bankrupts_to_the_owner() {
        let mut state = GameState::new(2, 1);
        state.purchase_property(1, 3).unwrap();
        state.players[0].cash = 2; // Baltic base rent is 4
        let mut controller =
            scripted_controller(vec![Action::Auction, Action::Auction], &[(1, 2)]);

        controller.play_turn(&mut state);

        assert!(state.player(0).is_bankrupt());
        assert_eq!(state.player(1).cash(), 1500 - 60 + 2, "creditor receives remaining cash");
        assert_eq!(state.winner(), Some(1));
    }

    #[test]
    fn unpayable_tax_bankrupts_to_the_bank() {
        let mut state = GameState::new(3, 1);
        state.purchase_property(0, 1).unwrap();
        state.players[0].cash = 50; // Income Tax is 200
        let mut controller = scripted_controller(vec![Action::Auction; 3], &[(1, 3)]);

        controller.play_turn(&mut state);

        assert!(state.player(0).is_bankrupt());
        assert_eq!(state.property_at(1).unwrap().owner(), None, "holdings revert to the bank");
        assert_eq!(state.free_parking_pot(), 0);
    }

    #[test]
    fn jail_pay_path_rolls_and_moves() {
        let mut state = GameState::new(2, 1);
        state.send_to_jail(0);
        let mut controller =
            scripted_controller(vec![Action::PayFine, Action::Auction], &[(2, 3)]);

        controller.play_turn(&mut state);

        let p0 = state.player(0);
        assert!(!p0.in_jail());
        assert_eq!(p0.position(), 15, "moved from jail by the roll");
        // $50 fine, then the landing's buy decision: Always(PayFine) is
        // illegal there and the first legal option (buy) is substituted.
        assert_eq!(p0.cash(), 1500 - 50 - 200);
        assert_eq!(state.property_at(15).unwrap().owner(), Some(0));
        assert_eq!(state.current_player(), 1, "jail turns never re-roll");
    }

    #[test]
    fn jail_card_path_spends_the_card() {
        let mut state = GameState::new(2, 1);
        state.players[0].jail_cards = 1;
        state.send_to_jail(0);
        let mut controller =
            scripted_controller(vec![Action::UseCard, Action::Auction], &[(2, 3)]);

        controller.play_turn(&mut state);

        assert!(!state.player(0).in_jail());
        assert_eq!(state.player(0).jail_cards(), 0);
        assert_eq!(state.player(0).position(), 15);
    }

    #[test]
    fn jail_roll_doubles_escapes_for_free() {
        let mut state = GameState::new(2, 1);
        state.send_to_jail(0);
        let mut controller = scripted_controller(vec![Action::Roll, Action::Auction], &[(4, 4)]);

        controller.play_turn(&mut state);

        let p0 = state.player(0);
        assert!(!p0.in_jail());
        assert_eq!(p0.position(), 18);
        assert_eq!(state.current_player(), 1, "doubles from jail do not grant a re-roll");
    }

    #[test]
    fn jail_roll_failure_counts_attempts_then_charges_the_fine() {
        let mut state = GameState::new(2, 1);
        state.send_to_jail(0);
        let mut controller =
            scripted_controller(vec![Action::Roll, Action::Auction], &[(1, 5)]);

        // Two failed attempts stay put.
        controller.play_turn(&mut state);
        assert!(state.player(0).in_jail());
        assert_eq!(state.player(0).jail_turns(), 1);
        controller.play_turn(&mut state);
        controller.play_turn(&mut state);
        assert_eq!(state.player(0).jail_turns(), 2);

        // Third failure: the fine comes due and the player moves to
        // St. James Place, where the illegal Always(Roll) answer to the
        // buy decision substitutes to a purchase.
        controller.play_turn(&mut state);
        controller.play_turn(&mut state);
        let p0 = state.player(0);
        assert!(!p0.in_jail());
        assert_eq!(p0.position(), 16);
        assert_eq!(p0.cash(), 1500 - 50 - 180);
    }

    #[test]
    fn third_jail_failure_without_fine_money_is_bankruptcy() {
        let mut state = GameState::new(2, 1);
        state.send_to_jail(0);
        state.players[0].jail_turns = 2;
        state.players[0].cash = 10;
        let mut controller =
            scripted_controller(vec![Action::Roll, Action::Auction], &[(2, 5)]);

        controller.play_turn(&mut state);

        assert!(state.player(0).is_bankrupt());
        assert_eq!(state.winner(), Some(1));
    }

    mod cards {
        use super::*;
        use crate::cards::{Card, CardDeck, CardEffect, NearestKind};
        use crate::state::STARTING_CASH;

        /// A game whose chance deck is a single known card, with the
        /// current player parked one step short of a Chance space.
        fn game_with_chance_card(effect: CardEffect) -> GameState {
            let mut state = GameState::new(3, 1);
            state.chance = CardDeck::from_cards(vec![Card { text: "test card", effect }]);
            state.players[0].position = 4; // space 7 is Chance
            state
        }

        fn play_one(state: &mut GameState) {
            // (1,2) moves the player from 4 onto Chance at 7.
            scripted_controller(vec![Action::Auction; 3], &[(1, 2)]).play_turn(state);
        }

        #[test]
        fn move_to_card_relocates_and_credits_on_wrap() {
            let mut state = game_with_chance_card(CardEffect::MoveTo { position: 0 });
            play_one(&mut state);
            assert_eq!(state.player(0).position(), 0);
            assert_eq!(state.player(0).cash(), STARTING_CASH + 200);
        }

        #[test]
        fn move_to_nearest_railroad_wraps_forward() {
            let mut state =
                game_with_chance_card(CardEffect::MoveToNearest(NearestKind::Railroad));
            play_one(&mut state);
            assert_eq!(state.player(0).position(), 15);
            assert_eq!(state.player(0).cash(), STARTING_CASH, "no wrap, no salary");
        }

        #[test]
        fn move_back_card_does_not_credit_go() {
            let mut state = game_with_chance_card(CardEffect::MoveBy { spaces: -3 });
            play_one(&mut state);
            assert_eq!(state.player(0).position(), 4);
            assert_eq!(state.player(0).cash(), STARTING_CASH);
        }

        #[test]
        fn pay_bank_card_feeds_the_pot() {
            let mut state = game_with_chance_card(CardEffect::PayBank { amount: 15 });
            play_one(&mut state);
            assert_eq!(state.player(0).cash(), STARTING_CASH - 15);
            assert_eq!(state.free_parking_pot(), 15);
        }

        #[test]
        fn unpayable_card_debt_is_bankruptcy_to_the_bank() {
            let mut state = game_with_chance_card(CardEffect::PayBank { amount: 15 });
            state.players[0].cash = 5;
            play_one(&mut state);
            assert!(state.player(0).is_bankrupt());
            assert_eq!(state.free_parking_pot(), 0);
        }

        #[test]
        fn pay_each_player_transfers_to_every_opponent() {
            let mut state = game_with_chance_card(CardEffect::PayEachPlayer { amount: 50 });
            play_one(&mut state);
            assert_eq!(state.player(0).cash(), STARTING_CASH - 100);
            assert_eq!(state.player(1).cash(), STARTING_CASH + 50);
            assert_eq!(state.player(2).cash(), STARTING_CASH + 50);
        }

        #[test]
        fn collect_from_each_player_bankrupts_a_short_payer() {
            let mut state =
                game_with_chance_card(CardEffect::CollectFromEachPlayer { amount: 50 });
            state.players[2].cash = 20;
            play_one(&mut state);
            assert_eq!(state.player(0).cash(), STARTING_CASH + 50 + 20);
            assert!(state.player(2).is_bankrupt());
        }

        #[test]
        fn go_to_jail_card_jails_without_salary() {
            let mut state = game_with_chance_card(CardEffect::GoToJail);
            play_one(&mut state);
            assert!(state.player(0).in_jail());
            assert_eq!(state.player(0).position(), 10);
            assert_eq!(state.player(0).cash(), STARTING_CASH);
        }

        #[test]
        fn jail_card_grant_increments_the_count() {
            let mut state = game_with_chance_card(CardEffect::GrantJailCard);
            play_one(&mut state);
            assert_eq!(state.player(0).jail_cards(), 1);
        }

        #[test]
        fn repairs_card_charges_per_structure() {
            let mut state =
                game_with_chance_card(CardEffect::Repairs { per_house: 25, per_hotel: 100 });
            state.purchase_property(0, 1).unwrap();
            state.purchase_property(0, 3).unwrap();
            state.build_house(0, 1).unwrap();
            state.build_house(0, 3).unwrap();
            let before = state.player(0).cash();
            play_one(&mut state);
            assert_eq!(state.player(0).cash(), before - 50);
        }

        #[test]
        fn card_landing_does_not_recursively_resolve_the_destination() {
            // Boardwalk is unowned; a card relocation must not trigger a
            // buy decision there.
            let mut state = game_with_chance_card(CardEffect::MoveTo { position: 39 });
            play_one(&mut state);
            assert_eq!(state.player(0).position(), 39);
            assert_eq!(state.property_at(39).unwrap().owner(), None);
            assert_eq!(state.player(0).cash(), STARTING_CASH);
        }
    }

    #[test]
    fn free_parking_payout_can_be_disabled() {
        use crate::state::GameConfig;
        let config = GameConfig { free_parking_payout: false, ..GameConfig::default() };
        let mut state = GameState::with_config(2, config, 1);
        state.free_parking_pot = 300;
        state.players[0].position = 12;
        // (3,5) moves 8 from 12 onto Free Parking at 20.
        let mut controller =
            scripted_controller(vec![Action::Auction, Action::Auction], &[(3, 5)]);

        controller.play_turn(&mut state);

        assert_eq!(state.player(0).position(), 20);
        assert_eq!(state.free_parking_pot(), 300, "pot stays put under the official rule");
        assert_eq!(state.player(0).cash(), 1500);
    }

    #[test]
    fn build_phase_builds_the_chosen_house() {
        let mut state = GameState::new(2, 1);
        state.purchase_property(0, 1).unwrap();
        state.purchase_property(0, 3).unwrap();
        state.players[0].position = 16; // space 20 Free Parking: a quiet landing
        let mut controller =
            scripted_controller(vec![Action::Build(3), Action::Auction], &[(1, 3)]);

        controller.play_turn(&mut state);

        assert_eq!(state.property_at(3).unwrap().houses(), 1);
        assert_eq!(state.property_at(1).unwrap().houses(), 0);
    }

    #[test]
    fn build_phase_skip_builds_nothing() {
        let mut state = GameState::new(2, 1);
        state.purchase_property(0, 1).unwrap();
        state.purchase_property(0, 3).unwrap();
        state.players[0].position = 16;
        let mut controller =
            scripted_controller(vec![Action::Skip, Action::Auction], &[(1, 3)]);

        controller.play_turn(&mut state);

        assert_eq!(state.property_at(1).unwrap().houses(), 0);
        assert_eq!(state.property_at(3).unwrap().houses(), 0);
    }
}
