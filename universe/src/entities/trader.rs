//! Traders, the player's own trader, and corporations.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::{Owner, Ship, TraderId};

/// Mutable fields of a trader, also its persisted form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderState {
    pub name: String,
    pub rank: Option<String>,
    pub xp: i32,
    pub align: i32,
    pub corporation: Option<u32>,
    /// Number of the ship the trader was last seen in.
    pub ship: Option<u32>,
    pub first_observed: Option<DateTime<Utc>>,
    pub last_observed: Option<DateTime<Utc>>,
    pub ship_destroyed: bool,
}

/// A trader observed in the game.
#[derive(Debug)]
pub struct Trader {
    id: TraderId,
    state: Mutex<TraderState>,
}

impl Trader {
    pub fn new(id: TraderId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::from_state(
            id,
            TraderState {
                name: name.into(),
                first_observed: Some(now),
                last_observed: Some(now),
                ..Default::default()
            },
        )
    }

    pub fn from_state(id: TraderId, state: TraderState) -> Self {
        Self {
            id,
            state: Mutex::new(state),
        }
    }

    pub fn id(&self) -> TraderId {
        self.id
    }

    /// Overwrite every mutable field, as when loading a saved model.
    pub fn restore(&self, state: TraderState) {
        *self.state.lock() = state;
    }

    pub fn as_owner(&self) -> Owner {
        Owner::Trader(self.id)
    }

    pub fn state(&self) -> TraderState {
        self.state.lock().clone()
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.state.lock().name = name.to_string();
    }

    pub fn rank(&self) -> Option<String> {
        self.state.lock().rank.clone()
    }

    pub fn set_rank(&self, rank: &str) {
        self.state.lock().rank = Some(rank.to_string());
    }

    pub fn xp(&self) -> i32 {
        self.state.lock().xp
    }

    /// Returns the previous value if it changed.
    pub fn set_xp(&self, xp: i32) -> Option<i32> {
        let mut state = self.state.lock();
        (state.xp != xp).then(|| std::mem::replace(&mut state.xp, xp))
    }

    pub fn align(&self) -> i32 {
        self.state.lock().align
    }

    /// Returns the previous value if it changed.
    pub fn set_align(&self, align: i32) -> Option<i32> {
        let mut state = self.state.lock();
        (state.align != align).then(|| std::mem::replace(&mut state.align, align))
    }

    pub fn corporation(&self) -> Option<u32> {
        self.state.lock().corporation
    }

    pub fn set_corporation(&self, corporation: Option<u32>) {
        self.state.lock().corporation = corporation;
    }

    pub fn ship(&self) -> Option<u32> {
        self.state.lock().ship
    }

    pub fn set_ship(&self, number: Option<u32>) {
        self.state.lock().ship = number;
    }

    pub fn set_ship_destroyed(&self, destroyed: bool) {
        self.state.lock().ship_destroyed = destroyed;
    }

    pub fn observe(&self) {
        let now = Utc::now();
        let mut state = self.state.lock();
        state.first_observed.get_or_insert(now);
        state.last_observed = Some(now);
    }

    /// Federation protection applies below 1000 experience at non-negative
    /// alignment.
    pub fn is_fed_safe(&self) -> bool {
        let state = self.state.lock();
        state.xp < 1000 && state.align >= 0
    }
}

/// Self-only attributes of the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YouState {
    pub turns: i32,
    pub credits: i64,
    pub bank_balance: i64,
    pub last_sector: Option<u32>,
    pub times_blown_up: u32,
}

/// The player: a trader with a current ship and a few extra attributes.
/// Location is the sector of that ship.
#[derive(Debug)]
pub struct You {
    trader: Trader,
    state: Mutex<YouState>,
    ship: RwLock<Arc<Ship>>,
}

impl Default for You {
    fn default() -> Self {
        Self::new()
    }
}

impl You {
    pub fn new() -> Self {
        Self::from_parts(
            TraderState::default(),
            YouState::default(),
            Arc::new(Ship::new()),
        )
    }

    pub fn from_parts(trader: TraderState, state: YouState, ship: Arc<Ship>) -> Self {
        ship.set_owner(Owner::Trader(TraderId::YOU));
        Self {
            trader: Trader::from_state(TraderId::YOU, trader),
            state: Mutex::new(state),
            ship: RwLock::new(ship),
        }
    }

    /// Overwrite the player's state and ship, as when loading a saved model.
    pub fn restore(&self, trader: TraderState, state: YouState, ship: Arc<Ship>) {
        self.trader.restore(trader);
        *self.state.lock() = state;
        self.replace_ship(ship);
    }

    pub fn trader(&self) -> &Trader {
        &self.trader
    }

    pub fn state(&self) -> YouState {
        self.state.lock().clone()
    }

    pub fn ship(&self) -> Arc<Ship> {
        self.ship.read().clone()
    }

    /// Install a new ship, returning the one it replaces.
    pub fn replace_ship(&self, ship: Arc<Ship>) -> Arc<Ship> {
        ship.set_owner(Owner::Trader(TraderId::YOU));
        std::mem::replace(&mut *self.ship.write(), ship)
    }

    pub fn sector(&self) -> Option<u32> {
        self.ship().sector()
    }

    /// Move to `sector`. Returns the previous sector if this was a move.
    pub fn set_sector(&self, sector: u32) -> Option<Option<u32>> {
        let previous = self.ship().set_sector(sector)?;
        self.state.lock().last_sector = previous;
        Some(previous)
    }

    pub fn turns(&self) -> i32 {
        self.state.lock().turns
    }

    /// Returns the previous value if it changed.
    pub fn set_turns(&self, turns: i32) -> Option<i32> {
        let mut state = self.state.lock();
        (state.turns != turns).then(|| std::mem::replace(&mut state.turns, turns))
    }

    pub fn credits(&self) -> i64 {
        self.state.lock().credits
    }

    /// Returns the previous value if it changed.
    pub fn set_credits(&self, credits: i64) -> Option<i64> {
        let mut state = self.state.lock();
        (state.credits != credits).then(|| std::mem::replace(&mut state.credits, credits))
    }

    pub fn bank_balance(&self) -> i64 {
        self.state.lock().bank_balance
    }

    pub fn set_bank_balance(&self, balance: i64) {
        self.state.lock().bank_balance = balance;
    }

    pub fn last_sector(&self) -> Option<u32> {
        self.state.lock().last_sector
    }

    pub fn times_blown_up(&self) -> u32 {
        self.state.lock().times_blown_up
    }

    pub fn set_times_blown_up(&self, times: u32) {
        self.state.lock().times_blown_up = times;
    }
}

/// Mutable fields of a corporation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorporationState {
    pub name: Option<String>,
    pub members: BTreeSet<TraderId>,
}

#[derive(Debug)]
pub struct Corporation {
    number: u32,
    state: Mutex<CorporationState>,
}

impl Corporation {
    pub fn new(number: u32) -> Self {
        Self::from_state(number, CorporationState::default())
    }

    pub fn from_state(number: u32, state: CorporationState) -> Self {
        Self {
            number,
            state: Mutex::new(state),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn as_owner(&self) -> Owner {
        Owner::Corporation(self.number)
    }

    pub fn state(&self) -> CorporationState {
        self.state.lock().clone()
    }

    pub fn name(&self) -> Option<String> {
        self.state.lock().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.state.lock().name = Some(name.to_string());
    }

    pub fn members(&self) -> BTreeSet<TraderId> {
        self.state.lock().members.clone()
    }

    pub fn add_member(&self, trader: TraderId) -> bool {
        self.state.lock().members.insert(trader)
    }

    pub fn remove_member(&self, trader: TraderId) -> bool {
        self.state.lock().members.remove(&trader)
    }
}
