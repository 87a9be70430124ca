//! The universe store - the fixed sector array plus every index hanging off
//! it.
//!
//! There is no global lock. Each sector, port, ship and trader guards its own
//! fields; the indexes each sit behind their own lock. Adding a warp touches
//! two sectors one after the other, so the inbound edge may become visible a
//! moment after the outbound one.

mod sector;
mod snapshot;

pub use sector::*;
pub use snapshot::*;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::entities::{Corporation, ModelId, Port, Ship, ShipType, Trader, TraderId, You};
use crate::error::{Result, UniverseError};
use crate::game_stats::GameStats;
use crate::mechanics::PortStatus;
use crate::notify::{Listeners, StateChange};

/// Sectors at or below this number are Federation space.
pub const FED_SPACE_MAX: u32 = 10;

/// Trader names are indexed by this many leading characters, since some
/// displays truncate them.
pub const TRADER_KEY_LEN: usize = 6;

/// Universe-wide scalars.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UniverseScalars {
    pub hub_sector: Option<u32>,
    /// Sectors holding a class 0 port.
    pub zero_sectors: Vec<u32>,
    /// Start of the latest bulk port report.
    pub last_cim_ports: Option<DateTime<Utc>>,
    pub last_log: Option<DateTime<Utc>>,
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct TraderBook {
    traders: Vec<Arc<Trader>>,
    by_key: HashMap<String, Arc<Trader>>,
}

fn trader_key(name: &str) -> String {
    name.chars().take(TRADER_KEY_LEN).collect()
}

/// The world model for one game.
#[derive(Debug)]
pub struct Universe {
    id: RwLock<ModelId>,
    sectors: OnceLock<Box<[Sector]>>,
    stats: GameStats,
    you: You,
    traders: RwLock<TraderBook>,
    ships: RwLock<HashMap<u32, Arc<Ship>>>,
    ship_types: RwLock<HashMap<String, Arc<ShipType>>>,
    corporations: RwLock<BTreeMap<u32, Arc<Corporation>>>,
    scalars: RwLock<UniverseScalars>,
    changes: Listeners<StateChange>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// Create an empty model whose size is not yet known.
    pub fn new() -> Self {
        Self::with_parts(ModelId::new(), GameStats::new(), You::new())
    }

    pub(crate) fn with_parts(id: ModelId, stats: GameStats, you: You) -> Self {
        Self {
            id: RwLock::new(id),
            sectors: OnceLock::new(),
            stats,
            you,
            traders: RwLock::new(TraderBook::default()),
            ships: RwLock::new(HashMap::new()),
            ship_types: RwLock::new(HashMap::new()),
            corporations: RwLock::new(BTreeMap::new()),
            scalars: RwLock::new(UniverseScalars::default()),
            changes: Listeners::new(),
        }
    }

    /// Identity of this model; adopted from the snapshot on load.
    pub fn id(&self) -> ModelId {
        *self.id.read()
    }

    /// State change listeners.
    pub fn changes(&self) -> &Listeners<StateChange> {
        &self.changes
    }

    pub fn publish(&self, change: StateChange) {
        self.changes.emit(&change);
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn you(&self) -> &You {
        &self.you
    }

    // sectors

    pub fn is_initialized(&self) -> bool {
        self.sectors.get().is_some()
    }

    /// Allocate `size` sectors. Only the first call has any effect; returns
    /// true if this call allocated.
    pub fn initialize(&self, size: u32) -> bool {
        let mut allocated = false;
        self.sectors.get_or_init(|| {
            allocated = true;
            (1..=size).map(Sector::new).collect()
        });
        if allocated {
            info!(sectors = size, model = %self.id(), "universe initialized");
            self.publish(StateChange::DatabaseInitialized { sectors: size });
        }
        allocated
    }

    pub(crate) fn initialize_from(&self, sectors: Vec<Sector>) -> bool {
        self.sectors.set(sectors.into_boxed_slice()).is_ok()
    }

    /// Number of sectors, 0 before initialization.
    pub fn size(&self) -> u32 {
        self.sectors.get().map_or(0, |s| s.len() as u32)
    }

    /// All sectors, ordered by number. Empty before initialization.
    pub fn sectors(&self) -> &[Sector] {
        self.sectors.get().map(|s| &s[..]).unwrap_or(&[])
    }

    /// Look up a sector by its 1-based number.
    pub fn sector(&self, number: u32) -> Result<&Sector> {
        let sectors = self.sectors.get().ok_or(UniverseError::NotInitialized)?;
        number
            .checked_sub(1)
            .and_then(|i| sectors.get(i as usize))
            .ok_or(UniverseError::OutOfRange {
                sector: number,
                size: sectors.len() as u32,
            })
    }

    /// Add one outbound edge and its inbound mirror. Returns true if the edge
    /// is new, in which case one `WarpsDiscovered` notification is sent.
    pub fn add_outbound_warp(&self, from: u32, to: u32) -> Result<bool> {
        Ok(!self.add_outbound_warps(&[(from, to)])?.is_empty())
    }

    /// Add several edges, sending a single notification listing the new ones.
    /// All sector numbers are validated before anything is changed.
    pub fn add_outbound_warps(&self, warps: &[(u32, u32)]) -> Result<Vec<(u32, u32)>> {
        for (from, to) in warps {
            self.sector(*from)?;
            self.sector(*to)?;
        }
        let mut discovered = Vec::new();
        for &(from, to) in warps {
            if self.sector(from)?.push_warp_out(to) {
                self.sector(to)?.push_warp_in(from);
                discovered.push((from, to));
            }
        }
        if !discovered.is_empty() {
            debug!(count = discovered.len(), "warps discovered");
            self.publish(StateChange::WarpsDiscovered {
                warps: discovered.clone(),
            });
        }
        Ok(discovered)
    }

    /// Replace a sector's outbound warps with a complete set reported by the
    /// game. Marks the sector explored and fully mapped and keeps inbound
    /// lists in step. Returns the edges that were new.
    ///
    /// Repeating the same set is a no-op and sends nothing.
    pub fn set_outbound_warps(&self, from: u32, warps: &[u32]) -> Result<Vec<(u32, u32)>> {
        let sector = self.sector(from)?;
        for to in warps {
            self.sector(*to)?;
        }
        let replacement = sector.replace_warps_out(warps);
        for to in &replacement.dropped {
            self.sector(*to)?.remove_warp_in(from);
        }
        for to in sector.warps_out() {
            self.sector(to)?.push_warp_in(from);
        }

        let discovered: Vec<(u32, u32)> = replacement.added.iter().map(|to| (from, *to)).collect();
        if !discovered.is_empty() {
            self.publish(StateChange::WarpsDiscovered {
                warps: discovered.clone(),
            });
        } else if replacement.changed {
            self.publish(StateChange::SectorUpdated { sector: from });
        }
        Ok(discovered)
    }

    /// Mark a sector explored, notifying only when the flag changes.
    pub fn mark_explored(&self, number: u32) -> Result<bool> {
        let changed = self.sector(number)?.set_explored(true);
        if changed {
            self.publish(StateChange::SectorUpdated { sector: number });
        }
        Ok(changed)
    }

    /// Set or clear the avoid flag, notifying only when it changes.
    pub fn set_avoided(&self, number: u32, avoided: bool) -> Result<bool> {
        let changed = self.sector(number)?.set_avoided(avoided);
        if changed {
            self.publish(StateChange::SectorUpdated { sector: number });
        }
        Ok(changed)
    }

    /// Clear every avoid. Returns the sectors that were avoided.
    pub fn clear_avoids(&self) -> Vec<u32> {
        let cleared: Vec<u32> = self
            .sectors()
            .iter()
            .filter(|s| s.set_avoided(false))
            .map(Sector::number)
            .collect();
        for sector in &cleared {
            self.publish(StateChange::SectorUpdated { sector: *sector });
        }
        cleared
    }

    pub fn is_fed_space(&self, number: u32) -> bool {
        number <= FED_SPACE_MAX || self.hub_sector() == Some(number)
    }

    // ports

    pub fn port(&self, sector: u32) -> Result<Option<Arc<Port>>> {
        Ok(self.sector(sector)?.port())
    }

    /// The port in `sector`, created if none is recorded. A newly created
    /// port sends `SectorUpdated`.
    pub fn ensure_port(&self, sector: u32) -> Result<Arc<Port>> {
        let (port, created) = self.sector(sector)?.port_or_insert();
        if created {
            debug!(sector, "port discovered");
            self.publish(StateChange::SectorUpdated { sector });
        }
        Ok(port)
    }

    /// Change a port's status, notifying if it actually changed.
    pub fn set_port_status(&self, sector: u32, status: PortStatus) -> Result<bool> {
        let Some(port) = self.port(sector)? else {
            return Ok(false);
        };
        match port.set_status(status) {
            Some(previous) => {
                self.publish(StateChange::PortStatusChanged {
                    sector,
                    previous,
                    current: status,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mark as blocked every trading port in `from..to`. Ports known to be
    /// class 0, destroyed or under construction are skipped. Returns how
    /// many ports changed status.
    pub fn block_ports_between(&self, from: u32, to: u32) -> Result<usize> {
        let mut blocked = 0;
        for number in from..to {
            let Some(port) = self.port(number)? else {
                continue;
            };
            if port.trading_class().is_some_and(|c| c.number() == 0) {
                continue;
            }
            if matches!(
                port.status(),
                Some(PortStatus::Destroyed | PortStatus::UnderConstruction)
            ) {
                continue;
            }
            if self.set_port_status(number, PortStatus::Blocked)? {
                blocked += 1;
            }
        }
        Ok(blocked)
    }

    /// Record the hub: converts the sector's port to the hub kind, keeping its
    /// reports. Notifies `HubDiscovered` the first time.
    pub fn mark_hub(&self, sector: u32) -> Result<Arc<Port>> {
        let port = self.ensure_port(sector)?;
        port.convert_to_hub();
        let previous = self.scalars.write().hub_sector.replace(sector);
        if previous != Some(sector) {
            info!(sector, "hub discovered");
            self.publish(StateChange::HubDiscovered { sector });
        }
        Ok(port)
    }

    pub fn hub_sector(&self) -> Option<u32> {
        self.scalars.read().hub_sector
    }

    pub fn add_zero_sector(&self, sector: u32) -> Result<bool> {
        self.sector(sector)?;
        let mut scalars = self.scalars.write();
        if scalars.zero_sectors.contains(&sector) {
            return Ok(false);
        }
        scalars.zero_sectors.push(sector);
        Ok(true)
    }

    pub fn zero_sectors(&self) -> Vec<u32> {
        self.scalars.read().zero_sectors.clone()
    }

    pub fn last_cim_ports(&self) -> Option<DateTime<Utc>> {
        self.scalars.read().last_cim_ports
    }

    pub fn set_last_cim_ports(&self, at: DateTime<Utc>) {
        self.scalars.write().last_cim_ports = Some(at);
    }

    pub fn last_log(&self) -> Option<DateTime<Utc>> {
        self.scalars.read().last_log
    }

    pub fn set_last_log(&self, at: DateTime<Utc>) {
        self.scalars.write().last_log = Some(at);
    }

    pub fn note(&self, name: &str) -> Option<String> {
        self.scalars.read().notes.get(name).cloned()
    }

    pub fn set_note(&self, name: &str, note: &str) {
        self.scalars
            .write()
            .notes
            .insert(name.to_string(), note.to_string());
    }

    pub fn remove_note(&self, name: &str) -> Option<String> {
        self.scalars.write().notes.remove(name)
    }

    pub fn scalars(&self) -> UniverseScalars {
        self.scalars.read().clone()
    }

    // traders

    /// Find a trader by name, creating one if needed. Names are matched on
    /// their first six characters; a longer spelling replaces a shorter one.
    pub fn trader_named(&self, name: &str) -> Arc<Trader> {
        let key = trader_key(name);
        let mut book = self.traders.write();
        if let Some(trader) = book.by_key.get(&key) {
            if name.len() > trader.name().len() {
                trader.set_name(name);
            }
            trader.observe();
            return trader.clone();
        }
        let id = TraderId(book.traders.iter().map(|t| t.id().0).max().unwrap_or(0) + 1);
        let trader = Arc::new(Trader::new(id, name));
        book.traders.push(trader.clone());
        book.by_key.insert(key, trader.clone());
        trader
    }

    /// Look a trader up by at least the first six characters of their name.
    /// Only returns a trader whose full name begins with `name`.
    pub fn trader(&self, name: &str) -> Option<Arc<Trader>> {
        let book = self.traders.read();
        book.by_key
            .get(&trader_key(name))
            .filter(|t| t.name().starts_with(name))
            .cloned()
    }

    pub fn trader_by_id(&self, id: TraderId) -> Option<Arc<Trader>> {
        self.traders
            .read()
            .traders
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    pub fn traders(&self) -> Vec<Arc<Trader>> {
        self.traders.read().traders.clone()
    }

    pub(crate) fn restore_trader(&self, trader: Arc<Trader>) {
        let mut book = self.traders.write();
        book.by_key.insert(trader_key(&trader.name()), trader.clone());
        book.traders.push(trader);
    }

    // ship types and ships

    /// The shared ship type with this name, created on first use.
    pub fn ship_type_named(&self, name: &str) -> Arc<ShipType> {
        self.ship_types
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(ShipType::new(name)))
            .clone()
    }

    pub fn ship_type(&self, name: &str) -> Option<Arc<ShipType>> {
        self.ship_types.read().get(name).cloned()
    }

    pub fn ship_types(&self) -> Vec<Arc<ShipType>> {
        self.ship_types.read().values().cloned().collect()
    }

    pub(crate) fn restore_ship_type(&self, ship_type: Arc<ShipType>) {
        self.ship_types
            .write()
            .insert(ship_type.name().to_string(), ship_type);
    }

    pub fn ship(&self, number: u32) -> Option<Arc<Ship>> {
        self.ships.read().get(&number).cloned()
    }

    /// Index a ship under its number. Ships without a number are not indexed.
    pub fn register_ship(&self, ship: Arc<Ship>) -> bool {
        let Some(number) = ship.number() else {
            return false;
        };
        self.ships.write().insert(number, ship);
        true
    }

    /// Release a ship number.
    pub fn remove_ship(&self, number: u32) -> Option<Arc<Ship>> {
        self.ships.write().remove(&number)
    }

    pub fn ships(&self) -> Vec<Arc<Ship>> {
        self.ships.read().values().cloned().collect()
    }

    /// Swap the player's ship for a structurally new one, releasing the old
    /// ship's number.
    pub fn replace_your_ship(&self, ship: Arc<Ship>) -> Arc<Ship> {
        let old = self.you.replace_ship(ship);
        if let Some(number) = old.number() {
            self.remove_ship(number);
        }
        old
    }

    // corporations

    pub fn corporation_numbered(&self, number: u32) -> Arc<Corporation> {
        self.corporations
            .write()
            .entry(number)
            .or_insert_with(|| Arc::new(Corporation::new(number)))
            .clone()
    }

    pub fn corporation(&self, number: u32) -> Option<Arc<Corporation>> {
        self.corporations.read().get(&number).cloned()
    }

    pub fn corporations(&self) -> Vec<Arc<Corporation>> {
        self.corporations.read().values().cloned().collect()
    }

    pub(crate) fn restore_corporation(&self, corporation: Arc<Corporation>) {
        self.corporations
            .write()
            .insert(corporation.number(), corporation);
    }

    pub(crate) fn restore_scalars(&self, scalars: UniverseScalars) {
        *self.scalars.write() = scalars;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    fn recording(universe: &Universe) -> Arc<Mutex<Vec<StateChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        universe
            .changes()
            .subscribe(move |change| sink.lock().push(change.clone()));
        seen
    }

    #[test]
    fn test_initialize_once() {
        let universe = Universe::new();
        assert!(!universe.is_initialized());
        assert!(matches!(
            universe.sector(1),
            Err(UniverseError::NotInitialized)
        ));

        assert!(universe.initialize(5));
        assert!(!universe.initialize(50));
        assert_eq!(universe.size(), 5);
        assert_eq!(universe.sector(5).unwrap().number(), 5);
    }

    #[test]
    fn test_sector_out_of_range() {
        let universe = Universe::new();
        universe.initialize(5);
        assert!(matches!(
            universe.sector(0),
            Err(UniverseError::OutOfRange { sector: 0, size: 5 })
        ));
        assert!(matches!(
            universe.sector(6),
            Err(UniverseError::OutOfRange { sector: 6, size: 5 })
        ));
    }

    #[test]
    fn test_add_warp_mirrors_inbound() {
        let universe = Universe::new();
        universe.initialize(5);
        let seen = recording(&universe);

        assert!(universe.add_outbound_warp(1, 2).unwrap());
        assert!(!universe.add_outbound_warp(1, 2).unwrap());
        assert!(universe.sector(2).unwrap().has_warp_from(1));
        assert_eq!(
            *seen.lock(),
            vec![StateChange::WarpsDiscovered {
                warps: vec![(1, 2)]
            }]
        );
    }

    #[test]
    fn test_add_warps_validates_first() {
        let universe = Universe::new();
        universe.initialize(5);
        assert!(universe.add_outbound_warps(&[(1, 2), (2, 9)]).is_err());
        assert!(!universe.sector(1).unwrap().has_warp_to(2));
    }

    #[test]
    fn test_set_outbound_warps_idempotent() {
        let universe = Universe::new();
        universe.initialize(10);
        let seen = recording(&universe);

        let discovered = universe.set_outbound_warps(3, &[7, 4]).unwrap();
        assert_eq!(discovered, vec![(3, 4), (3, 7)]);
        assert_eq!(seen.lock().len(), 1);

        let again = universe.set_outbound_warps(3, &[4, 7]).unwrap();
        assert!(again.is_empty());
        assert_eq!(seen.lock().len(), 1);

        let sector = universe.sector(3).unwrap();
        assert!(sector.is_explored());
        assert!(sector.is_fully_mapped());
        assert!(universe.sector(7).unwrap().has_warp_from(3));
    }

    #[test]
    fn test_set_outbound_warps_drops_stale_inbound() {
        let universe = Universe::new();
        universe.initialize(10);
        universe.add_outbound_warp(3, 5).unwrap();
        universe.set_outbound_warps(3, &[4]).unwrap();
        assert!(!universe.sector(5).unwrap().has_warp_from(3));
        assert!(universe.sector(4).unwrap().has_warp_from(3));
    }

    #[test]
    fn test_fully_mapped_sector_ignores_new_edges() {
        let universe = Universe::new();
        universe.initialize(10);
        universe.set_outbound_warps(1, &[2]).unwrap();
        assert!(!universe.add_outbound_warp(1, 3).unwrap());
        assert_eq!(universe.sector(1).unwrap().warps_out(), vec![2]);
    }

    #[test]
    fn test_avoids() {
        let universe = Universe::new();
        universe.initialize(10);
        let seen = recording(&universe);

        assert!(universe.set_avoided(4, true).unwrap());
        assert!(!universe.set_avoided(4, true).unwrap());
        universe.set_avoided(6, true).unwrap();
        assert_eq!(universe.clear_avoids(), vec![4, 6]);
        assert_eq!(seen.lock().len(), 4);
    }

    #[test]
    fn test_port_status_notifications() {
        let universe = Universe::new();
        universe.initialize(10);
        let seen = recording(&universe);

        universe.ensure_port(8).unwrap();
        universe.ensure_port(8).unwrap();
        assert!(universe.set_port_status(8, PortStatus::Available).unwrap());
        assert!(!universe.set_port_status(8, PortStatus::Available).unwrap());
        assert!(!universe.set_port_status(9, PortStatus::Available).unwrap());

        assert_eq!(
            *seen.lock(),
            vec![
                StateChange::SectorUpdated { sector: 8 },
                StateChange::PortStatusChanged {
                    sector: 8,
                    previous: None,
                    current: PortStatus::Available,
                },
            ]
        );
    }

    #[test]
    fn test_block_ports_between() {
        let universe = Universe::new();
        universe.initialize(10);
        for sector in [2, 4, 6] {
            universe.ensure_port(sector).unwrap();
        }
        universe
            .port(4)
            .unwrap()
            .unwrap()
            .set_trading_class(crate::TradingClass::new(0).unwrap());

        assert_eq!(universe.block_ports_between(1, 6).unwrap(), 1);
        assert_eq!(
            universe.port(2).unwrap().unwrap().status(),
            Some(PortStatus::Blocked)
        );
        assert_eq!(universe.port(4).unwrap().unwrap().status(), None);
        assert_eq!(universe.port(6).unwrap().unwrap().status(), None);
    }

    #[test]
    fn test_block_ports_between_keeps_inactive_ports() {
        let universe = Universe::new();
        universe.initialize(10);
        for sector in [2, 3, 4] {
            universe.ensure_port(sector).unwrap();
        }
        universe.set_port_status(2, PortStatus::Destroyed).unwrap();
        universe
            .set_port_status(3, PortStatus::UnderConstruction)
            .unwrap();
        let seen = recording(&universe);

        assert_eq!(universe.block_ports_between(1, 5).unwrap(), 1);
        assert_eq!(
            universe.port(2).unwrap().unwrap().status(),
            Some(PortStatus::Destroyed)
        );
        assert_eq!(
            universe.port(3).unwrap().unwrap().status(),
            Some(PortStatus::UnderConstruction)
        );
        assert_eq!(
            universe.port(4).unwrap().unwrap().status(),
            Some(PortStatus::Blocked)
        );
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_mark_hub_keeps_trading_class() {
        let universe = Universe::new();
        universe.initialize(100);
        let sss = crate::TradingClass::new(7).unwrap();
        universe.ensure_port(55).unwrap().set_trading_class(sss);

        let port = universe.mark_hub(55).unwrap();
        assert!(port.is_hub());
        assert_eq!(port.trading_class(), Some(sss));
        assert_eq!(port.port_class(), Some(crate::TradingClass::HUB));
        assert!(port.sells(crate::Product::Organics));
    }

    #[test]
    fn test_mark_hub() {
        let universe = Universe::new();
        universe.initialize(100);
        let port = universe.ensure_port(55).unwrap();
        port.set_name("Stargate Alpha I");
        let seen = recording(&universe);

        universe.mark_hub(55).unwrap();
        universe.mark_hub(55).unwrap();
        assert!(universe.port(55).unwrap().unwrap().is_hub());
        assert_eq!(universe.hub_sector(), Some(55));
        assert!(universe.is_fed_space(55));
        assert!(universe.is_fed_space(10));
        assert!(!universe.is_fed_space(11));
        assert_eq!(*seen.lock(), vec![StateChange::HubDiscovered { sector: 55 }]);
    }

    #[test]
    fn test_trader_prefix_index() {
        let universe = Universe::new();
        let short = universe.trader_named("Stinky");
        let long = universe.trader_named("StinkyDiver");
        assert!(Arc::ptr_eq(&short, &long));
        assert_eq!(long.name(), "StinkyDiver");

        assert!(universe.trader("Stinky").is_some());
        assert!(universe.trader("StinkyDiv").is_some());
        assert!(universe.trader("StinkyFace").is_none());
        assert_eq!(universe.traders().len(), 1);
        assert_eq!(universe.trader_by_id(long.id()).unwrap().name(), "StinkyDiver");
    }

    #[test]
    fn test_ship_types_are_interned() {
        let universe = Universe::new();
        let a = universe.ship_type_named("Imperial StarShip");
        let b = universe.ship_type_named("Imperial StarShip");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(universe.ship_type("Scout Marauder").is_none());
    }

    #[test]
    fn test_replace_your_ship_releases_number() {
        let universe = Universe::new();
        let ship = universe.you().ship();
        ship.set_number(12);
        universe.register_ship(ship);
        assert!(universe.ship(12).is_some());

        universe.replace_your_ship(Arc::new(Ship::new()));
        assert!(universe.ship(12).is_none());
    }

    #[test]
    fn test_zero_sectors() {
        let universe = Universe::new();
        universe.initialize(10);
        assert!(universe.add_zero_sector(1).unwrap());
        assert!(!universe.add_zero_sector(1).unwrap());
        assert_eq!(universe.zero_sectors(), vec![1]);
    }

    proptest! {
        #[test]
        fn inbound_closure_holds(edges in prop::collection::vec((1u32..=30, 1u32..=30), 0..120)) {
            let universe = Universe::new();
            universe.initialize(30);
            for (from, to) in &edges {
                universe.add_outbound_warp(*from, *to).unwrap();
            }
            for sector in universe.sectors() {
                for to in sector.warps_out() {
                    prop_assert!(universe.sector(to).unwrap().has_warp_from(sector.number()));
                }
                prop_assert!(sector.known_warp_count() <= MAX_WARPS);
            }
        }
    }
}
