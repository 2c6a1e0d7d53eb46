//! Transaction primitives over player cash and property ownership.
//!
//! Every operation here either fully applies or fully rejects: all
//! preconditions are checked before the first mutation, and each applied
//! mutation appends its event-log entry before control returns to the
//! turn machine. This is the only code that touches cash or ownership.

use tracing::warn;

use crate::board::{ColorGroup, PropertyClass, JAIL_FINE, JAIL_POSITION};
use crate::state::GameState;

/// Rejection reasons for ledger operations. A rejection leaves the state
/// untouched; the caller decides what happens next (auction, bankruptcy,
/// or nothing).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("no property at position {0}")]
    NotAProperty(u8),
    #[error("property at {0} is already owned")]
    AlreadyOwned(u8),
    #[error("player does not own the property at {0}")]
    NotOwner(u8),
    #[error("building requires owning the full {0} group")]
    NoMonopoly(ColorGroup),
    #[error("only streets can carry structures")]
    NotAStreet,
    #[error("house limit reached at position {0}")]
    HouseLimit(u8),
    #[error("hotel upgrade requires exactly four houses")]
    HotelPrerequisite,
    #[error("structure already present: hotel")]
    HotelPresent,
    #[error("no structure to sell at position {0}")]
    NothingToSell(u8),
    #[error("houses must be spread evenly across the group")]
    UnevenBuild,
    #[error("property at {0} is mortgaged")]
    Mortgaged(u8),
    #[error("property at {0} is not mortgaged")]
    NotMortgaged(u8),
    #[error("cannot mortgage a developed property")]
    Developed,
    #[error("no get-out-of-jail card held")]
    NoJailCard,
}

impl GameState {
    /// Credit a player from the bank. The bank never runs dry.
    pub fn credit(&mut self, idx: usize, amount: u64) {
        self.players[idx].cash += amount;
    }

    /// Debit a player iff they can afford it.
    pub fn pay(&mut self, idx: usize, amount: u64) -> Result<(), LedgerError> {
        let cash = self.players[idx].cash;
        if cash < amount {
            return Err(LedgerError::InsufficientFunds { needed: amount, available: cash });
        }
        self.players[idx].cash = cash - amount;
        Ok(())
    }

    /// Move cash between two players atomically.
    pub fn transfer(&mut self, from: usize, to: usize, amount: u64) -> Result<(), LedgerError> {
        self.pay(from, amount)?;
        self.players[to].cash += amount;
        Ok(())
    }

    /// Buy an unowned property at list price.
    pub fn purchase_property(&mut self, idx: usize, position: u8) -> Result<(), LedgerError> {
        let (price, name) = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner.is_some() {
                return Err(LedgerError::AlreadyOwned(position));
            }
            (prop.price, prop.name)
        };
        self.pay(idx, price)?;
        let prop = self.property_at_mut(position).expect("checked above");
        prop.owner = Some(idx);
        self.players[idx].owned.push(position);
        self.log_player(idx, format!("bought {name} for ${price}"));
        Ok(())
    }

    /// Assign a property to an auction winner at the winning bid.
    pub(crate) fn award_auction(
        &mut self,
        idx: usize,
        position: u8,
        bid: u64,
    ) -> Result<(), LedgerError> {
        let name = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner.is_some() {
                return Err(LedgerError::AlreadyOwned(position));
            }
            prop.name
        };
        self.pay(idx, bid)?;
        let prop = self.property_at_mut(position).expect("checked above");
        prop.owner = Some(idx);
        self.players[idx].owned.push(position);
        self.log_player(idx, format!("won the auction for {name} at ${bid}"));
        Ok(())
    }

    /// Whether a player owns every street in a color group.
    pub fn has_monopoly(&self, idx: usize, group: ColorGroup) -> bool {
        self.board
            .group_positions(group)
            .iter()
            .all(|&pos| self.property_at(pos).map(|p| p.owner == Some(idx)).unwrap_or(false))
    }

    /// Add one house. Requires ownership, a full color group, room under
    /// the four-house cap, no hotel, and affordability. With the
    /// even-building policy enabled, the target must sit at the group's
    /// minimum house count.
    pub fn build_house(&mut self, idx: usize, position: u8) -> Result<(), LedgerError> {
        let (group, cost, name) = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner != Some(idx) {
                return Err(LedgerError::NotOwner(position));
            }
            let group = match prop.class {
                PropertyClass::Street(g) => g,
                _ => return Err(LedgerError::NotAStreet),
            };
            if prop.has_hotel {
                return Err(LedgerError::HotelPresent);
            }
            if prop.houses >= 4 {
                return Err(LedgerError::HouseLimit(position));
            }
            (group, prop.house_cost, prop.name)
        };
        if !self.has_monopoly(idx, group) {
            return Err(LedgerError::NoMonopoly(group));
        }
        if self.config.enforce_even_building {
            let target_houses = self.property_at(position).expect("checked above").houses;
            if target_houses > self.group_house_min(group) {
                return Err(LedgerError::UnevenBuild);
            }
        }
        self.pay(idx, cost)?;
        let prop = self.property_at_mut(position).expect("checked above");
        prop.houses += 1;
        let count = prop.houses;
        self.log_player(idx, format!("built a house on {name} ({count} total)"));
        Ok(())
    }

    /// Upgrade four houses to a hotel.
    pub fn build_hotel(&mut self, idx: usize, position: u8) -> Result<(), LedgerError> {
        let (cost, name) = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner != Some(idx) {
                return Err(LedgerError::NotOwner(position));
            }
            if !prop.is_street() {
                return Err(LedgerError::NotAStreet);
            }
            if prop.has_hotel {
                return Err(LedgerError::HotelPresent);
            }
            if prop.houses != 4 {
                return Err(LedgerError::HotelPrerequisite);
            }
            (prop.house_cost, prop.name)
        };
        self.pay(idx, cost)?;
        let prop = self.property_at_mut(position).expect("checked above");
        prop.houses = 0;
        prop.has_hotel = true;
        self.log_player(idx, format!("built a hotel on {name}"));
        Ok(())
    }

    /// Sell one structure back for half its cost. Selling a hotel reverts
    /// the property to four houses.
    pub fn sell_house(&mut self, idx: usize, position: u8) -> Result<(), LedgerError> {
        let (refund, had_hotel, name) = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner != Some(idx) {
                return Err(LedgerError::NotOwner(position));
            }
            if !prop.has_hotel && prop.houses == 0 {
                return Err(LedgerError::NothingToSell(position));
            }
            (prop.house_cost / 2, prop.has_hotel, prop.name)
        };
        let prop = self.property_at_mut(position).expect("checked above");
        if had_hotel {
            prop.has_hotel = false;
            prop.houses = 4;
        } else {
            prop.houses -= 1;
        }
        self.players[idx].cash += refund;
        self.log_player(idx, format!("sold a structure on {name} for ${refund}"));
        Ok(())
    }

    /// Mortgage an undeveloped property for its mortgage value.
    pub fn mortgage(&mut self, idx: usize, position: u8) -> Result<(), LedgerError> {
        let (value, name) = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner != Some(idx) {
                return Err(LedgerError::NotOwner(position));
            }
            if prop.mortgaged {
                return Err(LedgerError::Mortgaged(position));
            }
            if prop.houses > 0 || prop.has_hotel {
                return Err(LedgerError::Developed);
            }
            (prop.mortgage_value, prop.name)
        };
        self.property_at_mut(position).expect("checked above").mortgaged = true;
        self.players[idx].cash += value;
        self.log_player(idx, format!("mortgaged {name} for ${value}"));
        Ok(())
    }

    /// Lift a mortgage for the mortgage value plus 10% interest.
    pub fn unmortgage(&mut self, idx: usize, position: u8) -> Result<(), LedgerError> {
        let (cost, name) = {
            let prop = self
                .property_at(position)
                .ok_or(LedgerError::NotAProperty(position))?;
            if prop.owner != Some(idx) {
                return Err(LedgerError::NotOwner(position));
            }
            if !prop.mortgaged {
                return Err(LedgerError::NotMortgaged(position));
            }
            (prop.mortgage_value * 11 / 10, prop.name)
        };
        self.pay(idx, cost)?;
        self.property_at_mut(position).expect("checked above").mortgaged = false;
        self.log_player(idx, format!("unmortgaged {name} for ${cost}"));
        Ok(())
    }

    /// Rent owed for landing on a property, given the dice total of the
    /// landing roll. Mortgaged and unowned properties earn nothing.
    pub fn rent_for(&self, position: u8, dice_total: u8) -> u64 {
        let prop = match self.property_at(position) {
            Some(p) => p,
            None => return 0,
        };
        let owner = match prop.owner {
            Some(o) => o,
            None => return 0,
        };
        if prop.mortgaged {
            return 0;
        }
        match prop.class {
            PropertyClass::Railroad => {
                let owned = self
                    .properties
                    .iter()
                    .filter(|p| p.class == PropertyClass::Railroad && p.owner == Some(owner))
                    .count();
                owned
                    .checked_sub(1)
                    .and_then(|i| prop.rent.get(i))
                    .copied()
                    .unwrap_or(25)
            }
            PropertyClass::Utility => {
                let owned = self
                    .properties
                    .iter()
                    .filter(|p| p.class == PropertyClass::Utility && p.owner == Some(owner))
                    .count();
                let multiplier = if owned == 2 { 10 } else { 4 };
                dice_total as u64 * multiplier
            }
            PropertyClass::Street(group) => {
                if prop.has_hotel {
                    return prop.rent[5];
                }
                if prop.houses > 0 {
                    return prop.rent[prop.houses as usize];
                }
                if self.has_monopoly(owner, group) {
                    prop.rent[0] * 2
                } else {
                    prop.rent[0]
                }
            }
        }
    }

    /// Total repairs assessment across everything a player owns.
    pub fn repairs_due(&self, idx: usize, per_house: u64, per_hotel: u64) -> u64 {
        self.properties
            .iter()
            .filter(|p| p.owner == Some(idx))
            .map(|p| if p.has_hotel { per_hotel } else { p.houses as u64 * per_house })
            .sum()
    }

    /// Streets the player could put a house on right now, honoring the
    /// even-building policy when it is enabled.
    pub fn buildable_positions(&self, idx: usize) -> Vec<u8> {
        self.properties
            .iter()
            .filter(|p| {
                p.owner == Some(idx)
                    && !p.has_hotel
                    && p.houses < 4
                    && self.players[idx].cash >= p.house_cost
                    && match p.class {
                        PropertyClass::Street(g) => {
                            self.has_monopoly(idx, g)
                                && (!self.config.enforce_even_building
                                    || p.houses <= self.group_house_min(g))
                        }
                        _ => false,
                    }
            })
            .map(|p| p.position)
            .collect()
    }

    fn group_house_min(&self, group: ColorGroup) -> u8 {
        self.board
            .group_positions(group)
            .iter()
            .filter_map(|&pos| self.property_at(pos))
            .map(|p| if p.has_hotel { 5 } else { p.houses })
            .min()
            .unwrap_or(0)
    }

    pub(crate) fn send_to_jail(&mut self, idx: usize) {
        let p = &mut self.players[idx];
        p.position = JAIL_POSITION;
        p.in_jail = true;
        p.jail_turns = 0;
        self.doubles_count = 0;
        self.log_player(idx, "was sent to Jail".into());
    }

    pub(crate) fn release_from_jail(&mut self, idx: usize) {
        let p = &mut self.players[idx];
        p.in_jail = false;
        p.jail_turns = 0;
        self.log_player(idx, "was released from Jail".into());
    }

    /// Pay the fixed fine and leave jail.
    pub fn pay_jail_fine(&mut self, idx: usize) -> Result<(), LedgerError> {
        self.pay(idx, JAIL_FINE)?;
        self.release_from_jail(idx);
        self.log_player(idx, format!("paid ${JAIL_FINE} to get out of Jail"));
        Ok(())
    }

    /// Spend a get-out-of-jail card and leave jail.
    pub fn use_jail_card(&mut self, idx: usize) -> Result<(), LedgerError> {
        if self.players[idx].jail_cards == 0 {
            return Err(LedgerError::NoJailCard);
        }
        self.players[idx].jail_cards -= 1;
        self.release_from_jail(idx);
        self.log_player(idx, "used a Get Out of Jail Free card".into());
        Ok(())
    }

    /// Remove a player from the game. With a creditor, every property and
    /// the remaining cash transfer as-is (structures and mortgage flags
    /// untouched); without one, properties revert to the bank with
    /// structures and mortgages cleared. Terminal: a bankrupt player is
    /// skipped by turn advancement forever.
    pub fn settle_bankruptcy(&mut self, idx: usize, creditor: Option<usize>) {
        let cash = self.players[idx].cash;
        let owned = std::mem::take(&mut self.players[idx].owned);
        self.players[idx].cash = 0;
        self.players[idx].bankrupt = true;

        match creditor {
            Some(to) => {
                for &pos in &owned {
                    if let Some(prop) = self.property_at_mut(pos) {
                        prop.owner = Some(to);
                    }
                }
                self.players[to].owned.extend_from_slice(&owned);
                self.players[to].cash += cash;
            }
            None => {
                for &pos in &owned {
                    if let Some(prop) = self.property_at_mut(pos) {
                        prop.owner = None;
                        prop.houses = 0;
                        prop.has_hotel = false;
                        prop.mortgaged = false;
                    }
                }
            }
        }
        warn!(player = idx, ?creditor, "player went bankrupt");
        self.log_player(idx, "declared bankruptcy".into());
        self.check_winner();
    }
}
