//! The remote-agent boundary: prompt construction, the transport trait a
//! collaborator implements, and tolerant parsing of free-form replies.
//!
//! The engine never does HTTP itself. A [`ChatTransport`] is handed the
//! model id and a two-message prompt and returns whatever text the agent
//! produced; this module digs the first balanced JSON object out of that
//! text and validates it against the request's option set. Anything
//! malformed is a provider failure, which the turn machine resolves to
//! its deterministic fallback.

use serde::{Deserialize, Serialize};

use crate::decision::{
    Action, Decision, DecisionError, DecisionKind, DecisionProvider, DecisionRequest, Snapshot,
};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    #[error("remote call failed: {0}")]
    Failed(String),
    #[error("remote call returned status {0}")]
    Status(u16),
}

/// Message roles in the two-message prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The request shape shipped to the collaborator-owned HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Carries a [`ChatRequest`] to a remote agent and returns its raw text.
pub trait ChatTransport: Send {
    fn complete(&mut self, request: &ChatRequest) -> Result<String, TransportError>;
}

/// Raw decision shape expected somewhere in the reply text.
#[derive(Debug, Clone, Deserialize)]
struct RawDecision {
    action: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// A [`DecisionProvider`] backed by a remote agent behind a transport.
/// Wrap it in a [`crate::providers::TimedProvider`] to bound its latency.
pub struct RemoteProvider<T> {
    transport: T,
    model: String,
}

impl<T: ChatTransport> RemoteProvider<T> {
    pub fn new(transport: T, model: impl Into<String>) -> Self {
        Self { transport, model: model.into() }
    }
}

impl<T: ChatTransport> DecisionProvider for RemoteProvider<T> {
    fn decide(
        &mut self,
        snapshot: &Snapshot,
        request: &DecisionRequest,
    ) -> Result<Decision, DecisionError> {
        let chat = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: Role::System, content: system_prompt() },
                ChatMessage { role: Role::User, content: decision_prompt(snapshot, request) },
            ],
        };
        let reply = self
            .transport
            .complete(&chat)
            .map_err(|e| DecisionError::Transport(e.to_string()))?;
        parse_decision(&reply)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Parse a free-form agent reply into a [`Decision`].
pub fn parse_decision(reply: &str) -> Result<Decision, DecisionError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| DecisionError::Malformed("no JSON object in reply".into()))?;
    let raw: RawDecision =
        serde_json::from_str(json).map_err(|e| DecisionError::Malformed(e.to_string()))?;
    let action: Action = raw
        .action
        .parse()
        .map_err(|e| DecisionError::Malformed(format!("bad action token: {e}")))?;
    Ok(Decision {
        action,
        reasoning: raw.reasoning,
        confidence: raw.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
    })
}

/// Locate the first balanced `{...}` block in free-form text, skipping
/// braces inside JSON string literals.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn system_prompt() -> String {
    "You are an expert Monopoly player. Analyze the game state and make the \
strongest strategic choice available.\n\n\
RULES SUMMARY:\n\
- Goal: be the last solvent player\n\
- Properties earn rent from opponents; full color groups double base rent\n\
- Houses and hotels on full color groups multiply rent\n\
- Jail: pay $50, use a card, or try to roll doubles (three attempts)\n\
- Bankruptcy is terminal\n\n\
Respond with a single JSON object containing your decision."
        .to_string()
}

fn decision_prompt(snapshot: &Snapshot, request: &DecisionRequest) -> String {
    let holdings = if snapshot.holdings.is_empty() {
        "None".to_string()
    } else {
        snapshot
            .holdings
            .iter()
            .map(|h| {
                format!(
                    "{} ({}H{}{})",
                    h.name,
                    h.houses,
                    if h.has_hotel { "+Hotel" } else { "" },
                    if h.mortgaged { ", mortgaged" } else { "" }
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    let opponents = snapshot
        .opponents
        .iter()
        .map(|o| format!("{}: ${}, {} properties", o.name, o.cash, o.property_count))
        .collect::<Vec<_>>()
        .join("; ");
    let last_roll = match snapshot.last_roll {
        Some((d1, d2)) => format!("{} + {} = {}", d1, d2, d1 + d2),
        None => "not rolled yet".to_string(),
    };

    format!(
        "CURRENT GAME STATE:\n\
- Turn: {turn}\n\
- Your name: {name}\n\
- Your cash: ${cash}\n\
- Your position: {space} (space {position})\n\
- Your properties: {holdings}\n\
- Jail cards: {jail_cards}\n\
- In jail: {in_jail}\n\
- Last roll: {last_roll}\n\
- Opponents: {opponents}\n\
- Free Parking pot: ${pot}\n\n\
DECISION REQUIRED: {decision}\n\
AVAILABLE OPTIONS: {options}\n\n\
Respond with a JSON object:\n\
{{\n  \"action\": \"one of the available options\",\n  \"reasoning\": \"brief explanation\",\n  \"confidence\": 0.0 to 1.0\n}}",
        turn = snapshot.turn,
        name = snapshot.name,
        cash = snapshot.cash,
        space = snapshot.space_name,
        position = snapshot.position,
        holdings = holdings,
        jail_cards = snapshot.jail_cards,
        in_jail = snapshot.in_jail,
        last_roll = last_roll,
        opponents = opponents,
        pot = snapshot.free_parking_pot,
        decision = describe_kind(&request.kind),
        options = request.option_tokens().join(", "),
    )
}

fn describe_kind(kind: &DecisionKind) -> String {
    match kind {
        DecisionKind::Jail { attempt } => format!(
            "You are in jail (attempt {attempt} of 3). Roll for doubles, pay the $50 fine, \
or use a Get Out of Jail Free card."
        ),
        DecisionKind::BuyOrAuction { position, price } => format!(
            "You landed on the unowned property at space {position}. Buy it for ${price} \
or send it to auction."
        ),
        DecisionKind::AuctionBid { position, current_bid } => format!(
            "Auction for the property at space {position}. Current bid: ${current_bid}. \
Bid higher or pass."
        ),
        DecisionKind::Build { candidates } => format!(
            "You may build one house. Buildable positions: {}. Choose build_<position> or skip.",
            candidates.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
        ),
    }
}
