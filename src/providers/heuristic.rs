use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::decision::{
    Action, Decision, DecisionError, DecisionKind, DecisionProvider, DecisionRequest, Snapshot,
};

/// Local deterministic-fallback policy: cheap rules of thumb with a
/// seedable RNG, used when no remote decider is attached or as the inner
/// provider behind a deadline wrapper in tests.
pub struct HeuristicProvider {
    rng: StdRng,
}

impl HeuristicProvider {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for HeuristicProvider {
    fn default() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self { rng: StdRng::from_seed(seed) }
    }
}

impl DecisionProvider for HeuristicProvider {
    fn decide(
        &mut self,
        snapshot: &Snapshot,
        request: &DecisionRequest,
    ) -> Result<Decision, DecisionError> {
        let decision = match &request.kind {
            DecisionKind::Jail { .. } => self.jail(snapshot, request),
            DecisionKind::BuyOrAuction { price, .. } => self.buy_or_auction(snapshot, *price),
            DecisionKind::AuctionBid { current_bid, .. } => {
                self.auction_bid(snapshot, request, *current_bid)
            }
            DecisionKind::Build { candidates } => self.build(candidates),
        };
        Ok(decision)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

impl HeuristicProvider {
    fn jail(&mut self, snapshot: &Snapshot, request: &DecisionRequest) -> Decision {
        if request.options.contains(&Action::UseCard) {
            return Decision {
                action: Action::UseCard,
                reasoning: "holding a jail card; a free exit beats cash or luck".into(),
                confidence: 0.9,
            };
        }
        if request.options.contains(&Action::PayFine) && snapshot.cash >= 200 && self.rng.random_bool(0.5)
        {
            return Decision {
                action: Action::PayFine,
                reasoning: "cash to spare; paying out avoids wasted turns".into(),
                confidence: 0.6,
            };
        }
        Decision {
            action: Action::Roll,
            reasoning: "trying for doubles".into(),
            confidence: 0.5,
        }
    }

    fn buy_or_auction(&mut self, snapshot: &Snapshot, price: u64) -> Decision {
        let comfortable = snapshot.cash >= price * 2;
        if comfortable || self.rng.random_bool(0.7) {
            Decision {
                action: Action::Buy,
                reasoning: "price is covered comfortably".into(),
                confidence: if comfortable { 0.8 } else { 0.5 },
            }
        } else {
            Decision {
                action: Action::Auction,
                reasoning: "keeping cash in reserve".into(),
                confidence: 0.5,
            }
        }
    }

    fn auction_bid(
        &mut self,
        snapshot: &Snapshot,
        request: &DecisionRequest,
        current_bid: u64,
    ) -> Decision {
        let offered: Vec<u64> = request
            .options
            .iter()
            .filter_map(|o| match o {
                Action::Bid(n) => Some(*n),
                _ => None,
            })
            .collect();
        let affordable: Vec<u64> = offered.iter().copied().filter(|&n| n <= snapshot.cash).collect();
        if !affordable.is_empty() && self.rng.random_bool(0.6) {
            let pick = affordable[self.rng.random_range(0..affordable.len())];
            return Decision {
                action: Action::Bid(pick),
                reasoning: format!("raising over ${current_bid}"),
                confidence: 0.5,
            };
        }
        Decision {
            action: Action::Pass,
            reasoning: "price has run past its value".into(),
            confidence: 0.6,
        }
    }

    fn build(&mut self, candidates: &[u8]) -> Decision {
        if !candidates.is_empty() && self.rng.random_bool(0.5) {
            return Decision {
                action: Action::Build(candidates[0]),
                reasoning: "developing the monopoly".into(),
                confidence: 0.6,
            };
        }
        Decision { action: Action::Skip, reasoning: "holding cash".into(), confidence: 0.5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameState;

    fn snapshot(cash: u64) -> Snapshot {
        let mut state = GameState::new(2, 1);
        state.players[0].cash = cash;
        Snapshot::capture(&state, 0)
    }

    #[test]
    fn jail_card_is_always_preferred() {
        let mut provider = HeuristicProvider::seeded(1);
        let request = DecisionRequest::new(
            DecisionKind::Jail { attempt: 1 },
            vec![Action::Roll, Action::PayFine, Action::UseCard],
        );
        let d = provider.decide(&snapshot(500), &request).unwrap();
        assert_eq!(d.action, Action::UseCard);
    }

    #[test]
    fn jail_without_options_rolls() {
        let mut provider = HeuristicProvider::seeded(1);
        let request =
            DecisionRequest::new(DecisionKind::Jail { attempt: 2 }, vec![Action::Roll]);
        let d = provider.decide(&snapshot(10), &request).unwrap();
        assert_eq!(d.action, Action::Roll);
    }

    #[test]
    fn bids_never_exceed_cash() {
        let mut provider = HeuristicProvider::seeded(9);
        let request = DecisionRequest::new(
            DecisionKind::AuctionBid { position: 5, current_bid: 40 },
            vec![Action::Pass, Action::Bid(50), Action::Bid(65), Action::Bid(90)],
        );
        for _ in 0..50 {
            let d = provider.decide(&snapshot(60), &request).unwrap();
            if let Action::Bid(n) = d.action {
                assert!(n <= 60);
            }
        }
    }

    #[test]
    fn build_choice_stays_in_candidate_set() {
        let mut provider = HeuristicProvider::seeded(4);
        let request = DecisionRequest::new(
            DecisionKind::Build { candidates: vec![16, 18] },
            vec![Action::Skip, Action::Build(16), Action::Build(18)],
        );
        for _ in 0..20 {
            let d = provider.decide(&snapshot(800), &request).unwrap();
            assert!(matches!(d.action, Action::Skip | Action::Build(16)));
        }
    }

    #[test]
    fn seeded_provider_is_reproducible() {
        let request = DecisionRequest::new(
            DecisionKind::BuyOrAuction { position: 1, price: 60 },
            vec![Action::Buy, Action::Auction],
        );
        let mut a = HeuristicProvider::seeded(33);
        let mut b = HeuristicProvider::seeded(33);
        for _ in 0..20 {
            let da = a.decide(&snapshot(300), &request).unwrap();
            let db = b.decide(&snapshot(300), &request).unwrap();
            assert_eq!(da.action, db.action);
        }
    }
}
