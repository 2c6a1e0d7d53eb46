//! The bidding protocol for a property a player declined or could not
//! afford. Runs to termination within one turn-machine suspension.

use tracing::debug;

use crate::decision::{self, Action, DecisionKind, DecisionRequest, Snapshot};
use crate::providers::ProviderTable;
use crate::state::{GameState, PendingAction};

/// Live bidding state for one property.
#[derive(Debug, Clone)]
pub struct AuctionState {
    pub(crate) position: u8,
    pub(crate) current_bid: u64,
    pub(crate) highest_bidder: Option<usize>,
    pub(crate) participants: Vec<usize>,
    pub(crate) bidder_cursor: usize,
}

impl AuctionState {
    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn current_bid(&self) -> u64 {
        self.current_bid
    }

    pub fn highest_bidder(&self) -> Option<usize> {
        self.highest_bidder
    }

    pub fn participants(&self) -> &[usize] {
        &self.participants
    }
}

/// How an auction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionOutcome {
    /// `winner` paid exactly `bid` and owns the property.
    Sold { winner: usize, bid: u64 },
    /// Nobody bid; the property stays with the bank.
    NoSale,
}

/// Bid increments offered over the current high bid.
const BID_INCREMENTS: [u64; 4] = [10, 25, 50, 100];

/// Run a full auction for the property at `position`. Every non-bankrupt
/// player participates; each is asked in turn to pass or bid through
/// their provider. Invalid bids (at or below the current high, or beyond
/// the bidder's cash) are rejected and treated as a pass. Bounded by
/// `auction_round_cap` full rounds as a safety net against bidding loops.
pub fn run_auction(
    state: &mut GameState,
    providers: &mut ProviderTable,
    position: u8,
) -> AuctionOutcome {
    let participants = state.active_players();
    let property_name = match state.property_at(position) {
        Some(p) => p.name(),
        None => return AuctionOutcome::NoSale,
    };
    let price = state.property_at(position).map(|p| p.price()).unwrap_or(0);

    state.auction = Some(AuctionState {
        position,
        current_bid: 0,
        highest_bidder: None,
        participants,
        bidder_cursor: 0,
    });
    state.pending = PendingAction::Auction;
    state.log_system(format!("Auction started for {property_name}"));

    let max_steps = state.config.auction_round_cap
        * state.auction.as_ref().map(|a| a.participants.len()).unwrap_or(1);
    let mut steps = 0;

    while steps < max_steps {
        let (bidder, current_bid) = {
            let auction = state.auction.as_ref().expect("auction in progress");
            if auction.participants.len() <= 1 && auction.highest_bidder.is_some() {
                break;
            }
            if auction.participants.is_empty() {
                break;
            }
            (auction.participants[auction.bidder_cursor], auction.current_bid)
        };

        let options = bid_options(state, bidder, current_bid, price);
        let request = DecisionRequest::new(
            DecisionKind::AuctionBid { position, current_bid },
            options,
        );
        let snapshot = Snapshot::capture(state, bidder);
        let resolved = decision::resolve(providers.decide(bidder, &snapshot, &request), &request);
        if resolved.degraded {
            state.log_player(bidder, format!("auction decision degraded: {}", resolved.reasoning));
        }

        match resolved.action {
            Action::Bid(amount) if amount > current_bid && amount <= state.player(bidder).cash() => {
                let auction = state.auction.as_mut().expect("auction in progress");
                auction.current_bid = amount;
                auction.highest_bidder = Some(bidder);
                auction.bidder_cursor = (auction.bidder_cursor + 1) % auction.participants.len();
                state.log_player(bidder, format!("bid ${amount}"));
            }
            Action::Bid(amount) => {
                // In-grammar but out-of-protocol; counts as a pass.
                debug!(bidder, amount, current_bid, "rejecting invalid bid");
                remove_bidder(state, bidder);
            }
            _ => {
                remove_bidder(state, bidder);
            }
        }
        steps += 1;
    }

    finish_auction(state)
}

fn bid_options(state: &GameState, bidder: usize, current_bid: u64, price: u64) -> Vec<Action> {
    let max_bid = state.player(bidder).cash().min(price * 2);
    let mut options = vec![Action::Pass];
    for inc in BID_INCREMENTS {
        let bid = current_bid + inc;
        if bid <= max_bid {
            options.push(Action::Bid(bid));
        }
    }
    options
}

fn remove_bidder(state: &mut GameState, bidder: usize) {
    let auction = state.auction.as_mut().expect("auction in progress");
    if let Some(at) = auction.participants.iter().position(|&p| p == bidder) {
        auction.participants.remove(at);
        if !auction.participants.is_empty() {
            auction.bidder_cursor %= auction.participants.len();
        }
    }
    state.log_player(bidder, "passed on the auction".into());
}

fn finish_auction(state: &mut GameState) -> AuctionOutcome {
    let auction = state.auction.take().expect("auction in progress");
    state.pending = PendingAction::None;
    match auction.highest_bidder {
        Some(winner) => {
            // The bid was validated against the winner's cash when placed,
            // and nothing else touched cash since.
            state
                .award_auction(winner, auction.position, auction.current_bid)
                .expect("winning bid must be payable");
            AuctionOutcome::Sold { winner, bid: auction.current_bid }
        }
        None => {
            state.log_system("Auction ended with no bids".into());
            AuctionOutcome::NoSale
        }
    }
}
