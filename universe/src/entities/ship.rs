//! Ships, their optional inspection details, and interned ship types.

use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::Owner;
use crate::mechanics::{Cargo, ScannerKind, Ternary};

/// Known specifications of a ship type. `None` means not yet observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipTypeSpecs {
    pub turns_per_warp: Option<i32>,
    pub initial_holds: Option<i32>,
    pub max_holds: Option<i32>,
    pub fighters: Option<i32>,
    pub shields: Option<i32>,
    pub fighter_wave: Option<i32>,
    pub transport_range: Option<i32>,
    /// Only ever raised.
    pub transwarp_level: Option<u8>,
    pub photons: Option<i32>,
    pub price: Option<i64>,
    pub combat_scan: Ternary,
    pub planet_scan: Ternary,
    pub interdictor: Ternary,
    pub landable: Ternary,
}

/// A ship model, shared by every ship of that type.
#[derive(Debug)]
pub struct ShipType {
    name: String,
    specs: Mutex<ShipTypeSpecs>,
}

impl ShipType {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_specs(name, ShipTypeSpecs::default())
    }

    pub fn with_specs(name: impl Into<String>, specs: ShipTypeSpecs) -> Self {
        Self {
            name: name.into(),
            specs: Mutex::new(specs),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specs(&self) -> ShipTypeSpecs {
        self.specs.lock().clone()
    }

    pub fn turns_per_warp(&self) -> Option<i32> {
        self.specs.lock().turns_per_warp
    }

    pub fn set_turns_per_warp(&self, turns: i32) {
        self.specs.lock().turns_per_warp = Some(turns);
    }

    pub fn raise_transwarp_level(&self, level: u8) {
        let mut specs = self.specs.lock();
        if specs.transwarp_level.map_or(true, |known| known < level) {
            specs.transwarp_level = Some(level);
        }
    }

    /// Apply several spec changes at once.
    pub fn update_specs(&self, update: impl FnOnce(&mut ShipTypeSpecs)) {
        update(&mut self.specs.lock());
    }
}

/// Equipment and cargo of a ship, known only once it has been inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipDetails {
    pub holds: i32,
    /// Highest transwarp drive seen (0 none, 1 or 2).
    pub transwarp: u8,
    pub long_range_scan: ScannerKind,
    pub planet_scan: bool,
    pub psychic_probe: bool,
    pub photons: i32,
    pub beacons: i32,
    pub probes: i32,
    pub armids: i32,
    pub limpets: i32,
    pub disruptors: i32,
    pub genesis_torpedoes: i32,
    pub atomics: i32,
    pub cloaks: i32,
    pub corbomite: i32,
    pub interdictor_on: bool,
    pub password: Option<String>,
    pub cargo: [i32; 4],
}

impl ShipDetails {
    pub fn cargo(&self, cargo: Cargo) -> i32 {
        self.cargo[cargo.index()]
    }

    pub fn empty_holds(&self) -> i32 {
        self.holds - self.cargo.iter().sum::<i32>()
    }
}

/// Mutable fields of a ship.
#[derive(Debug, Clone, Default)]
pub struct ShipState {
    pub ship_type: Option<Arc<ShipType>>,
    pub sector: Option<u32>,
    pub name: Option<String>,
    pub build_date: Option<NaiveDateTime>,
    pub fighters: i32,
    pub shields: i32,
    pub owner: Option<Owner>,
    pub number: Option<u32>,
    pub details: Option<ShipDetails>,
}

/// Persisted form of a ship; the type is stored by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub ship_type: Option<String>,
    pub sector: Option<u32>,
    pub name: Option<String>,
    pub build_date: Option<NaiveDateTime>,
    pub fighters: i32,
    pub shields: i32,
    pub owner: Option<Owner>,
    pub number: Option<u32>,
    pub details: Option<ShipDetails>,
}

/// A ship. Replaced rather than mutated when its type or build date turn out
/// to differ from what was recorded.
#[derive(Debug, Default)]
pub struct Ship {
    state: Mutex<ShipState>,
}

impl Ship {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ShipState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> ShipState {
        self.state.lock().clone()
    }

    pub fn record(&self) -> ShipRecord {
        let state = self.state.lock();
        ShipRecord {
            ship_type: state.ship_type.as_ref().map(|t| t.name().to_string()),
            sector: state.sector,
            name: state.name.clone(),
            build_date: state.build_date,
            fighters: state.fighters,
            shields: state.shields,
            owner: state.owner,
            number: state.number,
            details: state.details.clone(),
        }
    }

    pub fn ship_type(&self) -> Option<Arc<ShipType>> {
        self.state.lock().ship_type.clone()
    }

    pub fn set_ship_type(&self, ship_type: Arc<ShipType>) {
        self.state.lock().ship_type = Some(ship_type);
    }

    pub fn sector(&self) -> Option<u32> {
        self.state.lock().sector
    }

    /// Returns the previous sector if this call moved the ship.
    pub fn set_sector(&self, sector: u32) -> Option<Option<u32>> {
        let mut state = self.state.lock();
        if state.sector == Some(sector) {
            return None;
        }
        Some(state.sector.replace(sector))
    }

    pub fn name(&self) -> Option<String> {
        self.state.lock().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.state.lock().name = Some(name.to_string());
    }

    pub fn owner(&self) -> Option<Owner> {
        self.state.lock().owner
    }

    pub fn set_owner(&self, owner: Owner) {
        self.state.lock().owner = Some(owner);
    }

    pub fn number(&self) -> Option<u32> {
        self.state.lock().number
    }

    pub fn set_number(&self, number: u32) {
        self.state.lock().number = Some(number);
    }

    pub fn fighters(&self) -> i32 {
        self.state.lock().fighters
    }

    /// Returns the previous count if it changed.
    pub fn set_fighters(&self, fighters: i32) -> Option<i32> {
        let mut state = self.state.lock();
        (state.fighters != fighters).then(|| std::mem::replace(&mut state.fighters, fighters))
    }

    pub fn shields(&self) -> i32 {
        self.state.lock().shields
    }

    /// Returns the previous value if it changed.
    pub fn set_shields(&self, shields: i32) -> Option<i32> {
        let mut state = self.state.lock();
        (state.shields != shields).then(|| std::mem::replace(&mut state.shields, shields))
    }

    /// Details block; `None` means the ship was never inspected.
    pub fn details(&self) -> Option<ShipDetails> {
        self.state.lock().details.clone()
    }

    /// Mutate the details block, creating it on first use.
    pub fn with_details<R>(&self, f: impl FnOnce(&mut ShipDetails) -> R) -> R {
        let mut state = self.state.lock();
        f(state.details.get_or_insert_with(ShipDetails::default))
    }

    /// Forget the inspection data ahead of a fresh info display. Identity
    /// fields such as the build date are kept.
    pub fn reset_details(&self) {
        self.state.lock().details = None;
    }

    pub fn build_date(&self) -> Option<NaiveDateTime> {
        self.state.lock().build_date
    }

    pub fn set_build_date(&self, date: NaiveDateTime) {
        self.state.lock().build_date = Some(date);
    }

    pub fn holds(&self) -> i32 {
        self.state.lock().details.as_ref().map_or(0, |d| d.holds)
    }

    /// Returns the previous value if it changed.
    pub fn set_holds(&self, holds: i32) -> Option<i32> {
        self.with_details(|d| (d.holds != holds).then(|| std::mem::replace(&mut d.holds, holds)))
    }

    pub fn cargo(&self, cargo: Cargo) -> i32 {
        self.state
            .lock()
            .details
            .as_ref()
            .map_or(0, |d| d.cargo(cargo))
    }

    /// Returns the previous quantity if it changed.
    pub fn set_cargo(&self, cargo: Cargo, quantity: i32) -> Option<i32> {
        self.with_details(|d| {
            let slot = &mut d.cargo[cargo.index()];
            (*slot != quantity).then(|| std::mem::replace(slot, quantity))
        })
    }

    /// Transwarp capability only ratchets upward.
    pub fn raise_transwarp(&self, level: u8) {
        self.with_details(|d| d.transwarp = d.transwarp.max(level));
    }

    pub fn transwarp(&self) -> u8 {
        self.state.lock().details.as_ref().map_or(0, |d| d.transwarp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_created_lazily() {
        let ship = Ship::new();
        assert!(ship.details().is_none());
        assert_eq!(ship.cargo(Cargo::FuelOre), 0);

        assert_eq!(ship.set_cargo(Cargo::FuelOre, 30), Some(0));
        assert_eq!(ship.set_cargo(Cargo::FuelOre, 30), None);
        assert!(ship.details().is_some());

        ship.reset_details();
        assert!(ship.details().is_none());
    }

    #[test]
    fn test_empty_holds() {
        let ship = Ship::new();
        ship.set_holds(75);
        ship.set_cargo(Cargo::FuelOre, 20);
        ship.set_cargo(Cargo::Colonists, 5);
        assert_eq!(ship.details().unwrap().empty_holds(), 50);
    }

    #[test]
    fn test_transwarp_ratchets() {
        let ship = Ship::new();
        ship.raise_transwarp(2);
        ship.raise_transwarp(1);
        assert_eq!(ship.transwarp(), 2);

        let merchant = ShipType::new("Merchant Freighter");
        merchant.raise_transwarp_level(1);
        merchant.raise_transwarp_level(0);
        assert_eq!(merchant.specs().transwarp_level, Some(1));
    }

    #[test]
    fn test_sector_moves() {
        let ship = Ship::new();
        assert_eq!(ship.set_sector(10), Some(None));
        assert_eq!(ship.set_sector(10), None);
        assert_eq!(ship.set_sector(11), Some(Some(10)));
    }

    #[test]
    fn test_record_uses_type_name() {
        let ship = Ship::new();
        ship.set_ship_type(Arc::new(ShipType::new("Scout Marauder")));
        ship.set_number(7);
        let record = ship.record();
        assert_eq!(record.ship_type.as_deref(), Some("Scout Marauder"));
        assert_eq!(record.number, Some(7));
    }
}
