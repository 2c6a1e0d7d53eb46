//! The decision-provider contract: the closed action vocabulary, the
//! request/response shapes exchanged with whoever chooses the next move,
//! and the controller-side resolution that keeps a misbehaving provider
//! from ever stalling or corrupting a turn.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::state::GameState;

/// Confidence recorded on decisions the engine substituted itself.
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// One legal move, with typed payloads where the token carries a
/// parameter (`bid_50`, `build_12`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Roll,
    PayFine,
    UseCard,
    Buy,
    Auction,
    Pass,
    Skip,
    Bid(u64),
    Build(u8),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Roll => write!(f, "roll"),
            Action::PayFine => write!(f, "pay"),
            Action::UseCard => write!(f, "useCard"),
            Action::Buy => write!(f, "buy"),
            Action::Auction => write!(f, "auction"),
            Action::Pass => write!(f, "pass"),
            Action::Skip => write!(f, "skip"),
            Action::Bid(amount) => write!(f, "bid_{amount}"),
            Action::Build(position) => write!(f, "build_{position}"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionParseError {
    #[error("unknown action token: '{0}'")]
    Unknown(String),
    #[error("bad numeric suffix in '{0}'")]
    BadSuffix(String),
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Some(amount) = t.strip_prefix("bid_") {
            return amount
                .parse::<u64>()
                .map(Action::Bid)
                .map_err(|_| ActionParseError::BadSuffix(s.to_string()));
        }
        if let Some(position) = t.strip_prefix("build_") {
            return position
                .parse::<u8>()
                .map(Action::Build)
                .map_err(|_| ActionParseError::BadSuffix(s.to_string()));
        }
        match t {
            "roll" => Ok(Action::Roll),
            "pay" => Ok(Action::PayFine),
            "useCard" => Ok(Action::UseCard),
            "buy" => Ok(Action::Buy),
            "auction" => Ok(Action::Auction),
            "pass" => Ok(Action::Pass),
            "skip" => Ok(Action::Skip),
            _ => Err(ActionParseError::Unknown(s.to_string())),
        }
    }
}

/// The kind of choice being requested, with the context a provider needs
/// to reason about it. Each kind names its own conservative fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionKind {
    /// Escape attempt while jailed; `attempt` counts from 1 to 3.
    Jail { attempt: u8 },
    /// Landed on an affordable unowned property: keep it or send it to auction.
    BuyOrAuction { position: u8, price: u64 },
    /// A bidding turn inside an auction.
    AuctionBid { position: u8, current_bid: u64 },
    /// End-of-turn building opportunity over the given street positions.
    Build { candidates: Vec<u8> },
}

impl DecisionKind {
    pub fn label(&self) -> &'static str {
        match self {
            DecisionKind::Jail { .. } => "jail",
            DecisionKind::BuyOrAuction { .. } => "buyOrAuction",
            DecisionKind::AuctionBid { .. } => "auctionBid",
            DecisionKind::Build { .. } => "build",
        }
    }

    /// The deterministic default applied when a provider fails or times
    /// out. Always a member of the legal option set for its kind.
    pub fn fallback(&self) -> Action {
        match self {
            DecisionKind::Jail { .. } => Action::Roll,
            DecisionKind::BuyOrAuction { .. } => Action::Auction,
            DecisionKind::AuctionBid { .. } => Action::Pass,
            DecisionKind::Build { .. } => Action::Skip,
        }
    }
}

/// A request put to a provider: the kind plus the closed, ordered set of
/// legal options.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub kind: DecisionKind,
    pub options: Vec<Action>,
}

impl DecisionRequest {
    pub fn new(kind: DecisionKind, options: Vec<Action>) -> Self {
        debug_assert!(!options.is_empty(), "a decision needs at least one option");
        Self { kind, options }
    }

    /// Whether an action is acceptable for this request. Bid amounts are
    /// not pinned to the offered increments: any `bid_<n>` is admissible
    /// here and range-checked by the auction coordinator, which treats a
    /// bad amount as a pass.
    pub fn is_legal(&self, action: Action) -> bool {
        match action {
            Action::Bid(_) => self.options.iter().any(|o| matches!(o, Action::Bid(_))),
            other => self.options.contains(&other),
        }
    }

    pub fn option_tokens(&self) -> Vec<String> {
        self.options.iter().map(|o| o.to_string()).collect()
    }
}

/// A provider's answer.
#[derive(Debug, Clone)]
pub struct Decision {
    pub action: Action,
    pub reasoning: String,
    pub confidence: f64,
}

/// Failure modes of a decision call. All of them resolve to the kind's
/// fallback at the controller; none are fatal.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DecisionError {
    #[error("decision timed out after {0:?}")]
    Timeout(Duration),
    #[error("no provider attached to seat {0}")]
    NoProvider(usize),
    #[error("provider transport failed: {0}")]
    Transport(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("provider worker is gone")]
    WorkerGone,
}

/// Chooses actions for one seat. Implementations may answer inline (a
/// heuristic) or bridge to something slow and fallible; the turn machine
/// never trusts either further than [`resolve`] allows.
pub trait DecisionProvider: Send {
    fn decide(
        &mut self,
        snapshot: &Snapshot,
        request: &DecisionRequest,
    ) -> Result<Decision, DecisionError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "provider"
    }
}

/// A decision after controller-side vetting: always legal, flagged when
/// the engine had to step in.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub action: Action,
    pub reasoning: String,
    pub confidence: f64,
    pub degraded: bool,
}

/// Vet a provider outcome against the request. Errors and timeouts become
/// the kind's deterministic fallback; an action outside the legal set is
/// replaced with the first legal option and the reasoning annotated.
pub fn resolve(
    outcome: Result<Decision, DecisionError>,
    request: &DecisionRequest,
) -> Resolved {
    match outcome {
        Ok(decision) if request.is_legal(decision.action) => Resolved {
            action: decision.action,
            reasoning: decision.reasoning,
            confidence: decision.confidence,
            degraded: false,
        },
        Ok(decision) => {
            let substitute = request.options[0];
            warn!(
                kind = request.kind.label(),
                offered = %decision.action,
                substitute = %substitute,
                "provider chose an illegal action"
            );
            Resolved {
                action: substitute,
                reasoning: format!("{} (substituted first legal option)", decision.reasoning),
                confidence: decision.confidence,
                degraded: true,
            }
        }
        Err(err) => {
            let fallback = request.kind.fallback();
            warn!(
                kind = request.kind.label(),
                fallback = %fallback,
                error = %err,
                "provider failed; applying fallback"
            );
            Resolved {
                action: fallback,
                reasoning: format!("fallback after provider failure: {err}"),
                confidence: FALLBACK_CONFIDENCE,
                degraded: true,
            }
        }
    }
}

/// Serializable view of the game handed to providers. Mirrors what the
/// turn machine knows, trimmed to what a decision needs.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub turn: u32,
    pub seat: usize,
    pub name: String,
    pub cash: u64,
    pub position: u8,
    pub space_name: &'static str,
    pub in_jail: bool,
    pub jail_cards: u8,
    pub last_roll: Option<(u8, u8)>,
    pub free_parking_pot: u64,
    pub holdings: Vec<HoldingView>,
    pub opponents: Vec<OpponentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldingView {
    pub name: &'static str,
    pub position: u8,
    pub houses: u8,
    pub has_hotel: bool,
    pub mortgaged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentView {
    pub name: String,
    pub cash: u64,
    pub property_count: usize,
}

impl Snapshot {
    /// Capture the view for one seat.
    pub fn capture(state: &GameState, seat: usize) -> Self {
        let player = state.player(seat);
        let holdings = state
            .properties()
            .iter()
            .filter(|p| p.owner() == Some(seat))
            .map(|p| HoldingView {
                name: p.name(),
                position: p.position(),
                houses: p.houses(),
                has_hotel: p.has_hotel(),
                mortgaged: p.is_mortgaged(),
            })
            .collect();
        let opponents = state
            .players()
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != seat && !p.is_bankrupt())
            .map(|(i, p)| OpponentView {
                name: p.name().to_string(),
                cash: p.cash(),
                property_count: state
                    .properties()
                    .iter()
                    .filter(|prop| prop.owner() == Some(i))
                    .count(),
            })
            .collect();
        Self {
            turn: state.turn_number(),
            seat,
            name: player.name().to_string(),
            cash: player.cash(),
            position: player.position(),
            space_name: state.space(player.position()).name,
            in_jail: player.in_jail(),
            jail_cards: player.jail_cards(),
            last_roll: state.last_roll().map(|r| (r.die1, r.die2)),
            free_parking_pot: state.free_parking_pot(),
            holdings,
            opponents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tokens_round_trip() {
        for action in [
            Action::Roll,
            Action::PayFine,
            Action::UseCard,
            Action::Buy,
            Action::Auction,
            Action::Pass,
            Action::Skip,
            Action::Bid(125),
            Action::Build(19),
        ] {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn bad_tokens_are_rejected() {
        assert!(matches!("flip".parse::<Action>(), Err(ActionParseError::Unknown(_))));
        assert!(matches!("bid_lots".parse::<Action>(), Err(ActionParseError::BadSuffix(_))));
        assert!(matches!("build_".parse::<Action>(), Err(ActionParseError::BadSuffix(_))));
    }

    #[test]
    fn resolve_keeps_legal_choice() {
        let request = DecisionRequest::new(
            DecisionKind::BuyOrAuction { position: 1, price: 60 },
            vec![Action::Buy, Action::Auction],
        );
        let resolved = resolve(
            Ok(Decision { action: Action::Buy, reasoning: "cheap".into(), confidence: 0.8 }),
            &request,
        );
        assert_eq!(resolved.action, Action::Buy);
        assert!(!resolved.degraded);
    }

    #[test]
    fn resolve_substitutes_first_option_for_illegal_choice() {
        let request = DecisionRequest::new(
            DecisionKind::BuyOrAuction { position: 1, price: 60 },
            vec![Action::Buy, Action::Auction],
        );
        let resolved = resolve(
            Ok(Decision { action: Action::Roll, reasoning: "confused".into(), confidence: 0.9 }),
            &request,
        );
        assert_eq!(resolved.action, Action::Buy);
        assert!(resolved.degraded);
        assert!(resolved.reasoning.contains("substituted"));
    }

    #[test]
    fn resolve_applies_kind_fallback_on_error() {
        let request = DecisionRequest::new(
            DecisionKind::BuyOrAuction { position: 1, price: 60 },
            vec![Action::Buy, Action::Auction],
        );
        let resolved =
            resolve(Err(DecisionError::Timeout(Duration::from_millis(50))), &request);
        assert_eq!(resolved.action, Action::Auction);
        assert!(resolved.degraded);
        assert_eq!(resolved.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn any_bid_amount_is_request_legal_when_bidding_is_open() {
        let request = DecisionRequest::new(
            DecisionKind::AuctionBid { position: 5, current_bid: 40 },
            vec![Action::Pass, Action::Bid(50), Action::Bid(65)],
        );
        assert!(request.is_legal(Action::Bid(9999)));
        assert!(!request.is_legal(Action::Buy));
    }
}
