//! Whole-model snapshots, serialized as JSON.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Sector, SectorRecord, Universe, UniverseScalars};
use crate::entities::{
    Corporation, CorporationState, ModelId, Port, PortState, Ship, ShipRecord, ShipState, ShipType,
    ShipTypeSpecs, Trader, TraderId, TraderState, YouState,
};
use crate::error::{Result, UniverseError};
use crate::notify::StateChange;

/// Everything needed to rebuild a [`Universe`]. Inbound warps and lookup
/// indexes are derived and not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub model: ModelId,
    pub saved_at: DateTime<Utc>,
    pub size: u32,
    /// One record per sector, in sector order.
    pub sectors: Vec<SectorRecord>,
    pub ports: Vec<(u32, PortState)>,
    pub traders: Vec<(TraderId, TraderState)>,
    pub you: TraderState,
    pub you_state: YouState,
    pub your_ship: ShipRecord,
    pub ships: Vec<ShipRecord>,
    pub ship_types: Vec<(String, ShipTypeSpecs)>,
    pub corporations: Vec<(u32, CorporationState)>,
    pub scalars: UniverseScalars,
    pub stats: BTreeMap<String, String>,
}

impl ModelSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Universe {
    /// Capture the current state. Each entity is copied under its own lock, so
    /// a snapshot taken while the model is being updated is consistent per
    /// entity only.
    pub fn snapshot(&self) -> ModelSnapshot {
        let sectors = self.sectors();
        let you = self.you();
        let mut ship_types: Vec<(String, ShipTypeSpecs)> = self
            .ship_types()
            .iter()
            .map(|t| (t.name().to_string(), t.specs()))
            .collect();
        ship_types.sort_by(|a, b| a.0.cmp(&b.0));
        let mut ships: Vec<ShipRecord> = self.ships().iter().map(|s| s.record()).collect();
        ships.sort_by_key(|s| s.number);

        ModelSnapshot {
            model: self.id(),
            saved_at: Utc::now(),
            size: self.size(),
            sectors: sectors.iter().map(Sector::record).collect(),
            ports: sectors
                .iter()
                .filter_map(|s| s.port().map(|p| (s.number(), p.state())))
                .collect(),
            traders: self
                .traders()
                .iter()
                .map(|t| (t.id(), t.state()))
                .collect(),
            you: you.trader().state(),
            you_state: you.state(),
            your_ship: you.ship().record(),
            ships,
            ship_types,
            corporations: self
                .corporations()
                .iter()
                .map(|c| (c.number(), c.state()))
                .collect(),
            scalars: self.scalars(),
            stats: self.stats().entries(),
        }
    }

    /// Load a snapshot into a model that has not been initialized. Returns
    /// false, changing nothing, if the model already has a size.
    ///
    /// Inbound warps are rebuilt from the outbound lists. Listeners receive a
    /// single `DatabaseLoaded`.
    pub fn load_snapshot(&self, snapshot: ModelSnapshot) -> Result<bool> {
        if self.is_initialized() {
            return Ok(false);
        }
        let size = snapshot.size;
        if snapshot.sectors.len() != size as usize {
            return Err(UniverseError::OutOfRange {
                sector: snapshot.sectors.len() as u32,
                size,
            });
        }
        let in_range = |sector: u32| {
            if (1..=size).contains(&sector) {
                Ok(())
            } else {
                Err(UniverseError::OutOfRange { sector, size })
            }
        };
        for record in &snapshot.sectors {
            for to in &record.warps_out {
                in_range(*to)?;
            }
        }
        for (sector, _) in &snapshot.ports {
            in_range(*sector)?;
        }

        let sectors: Vec<Sector> = snapshot
            .sectors
            .into_iter()
            .zip(1..)
            .map(|(record, number)| Sector::from_record(number, record))
            .collect();
        if !self.initialize_from(sectors) {
            return Ok(false);
        }
        for sector in self.sectors() {
            for to in sector.warps_out() {
                self.sector(to)?.push_warp_in(sector.number());
            }
        }
        for (number, state) in snapshot.ports {
            self.sector(number)?
                .install_port(Arc::new(Port::from_state(number, state)));
        }

        for (name, specs) in snapshot.ship_types {
            self.restore_ship_type(Arc::new(ShipType::with_specs(name, specs)));
        }
        let mut ships = HashMap::new();
        for record in snapshot.ships {
            let ship = Arc::new(self.ship_from_record(record));
            if let Some(number) = ship.number() {
                ships.insert(number, ship.clone());
            }
            self.register_ship(ship);
        }
        let your_ship = match snapshot.your_ship.number.and_then(|n| ships.get(&n)) {
            Some(ship) => ship.clone(),
            None => Arc::new(self.ship_from_record(snapshot.your_ship)),
        };
        self.you()
            .restore(snapshot.you, snapshot.you_state, your_ship);

        for (id, state) in snapshot.traders {
            self.restore_trader(Arc::new(Trader::from_state(id, state)));
        }
        for (number, state) in snapshot.corporations {
            self.restore_corporation(Arc::new(Corporation::from_state(number, state)));
        }
        self.restore_scalars(snapshot.scalars);
        self.stats().restore(snapshot.stats);
        *self.id.write() = snapshot.model;

        info!(sectors = size, model = %snapshot.model, saved_at = %snapshot.saved_at, "universe loaded");
        self.publish(StateChange::DatabaseLoaded { sectors: size });
        Ok(true)
    }

    fn ship_from_record(&self, record: ShipRecord) -> Ship {
        Ship::from_state(ShipState {
            ship_type: record.ship_type.map(|name| self.ship_type_named(&name)),
            sector: record.sector,
            name: record.name,
            build_date: record.build_date,
            fighters: record.fighters,
            shields: record.shields,
            owner: record.owner,
            number: record.number,
            details: record.details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::{Cargo, PortStatus};
    use parking_lot::Mutex;

    fn populated() -> Universe {
        let universe = Universe::new();
        universe.initialize(20);
        universe.add_outbound_warps(&[(1, 2), (2, 3), (3, 1)]).unwrap();
        universe.set_outbound_warps(7, &[8, 9]).unwrap();
        universe.set_avoided(9, true).unwrap();

        let port = universe.ensure_port(3).unwrap();
        port.set_name("Aldebaran");
        port.apply_report([-2510, 1200, 300], [100, 60, 10]);
        universe.set_port_status(3, PortStatus::Available).unwrap();
        universe.mark_hub(5).unwrap();

        let trader = universe.trader_named("Rook");
        trader.set_xp(400);
        universe.corporation_numbered(4).add_member(trader.id());

        let ship = universe.you().ship();
        ship.set_number(12);
        ship.set_ship_type(universe.ship_type_named("Merchant Cruiser"));
        ship.set_cargo(Cargo::Organics, 15);
        universe.register_ship(ship);
        universe.you().set_sector(3);
        universe.you().set_credits(5000);
        universe
    }

    #[test]
    fn test_snapshot_round_trip() {
        let original = populated();
        let json = original.snapshot().to_json().unwrap();

        let loaded = Universe::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        loaded
            .changes()
            .subscribe(move |change: &StateChange| sink.lock().push(change.key()));

        let model = original.id();
        assert!(loaded
            .load_snapshot(ModelSnapshot::from_json(&json).unwrap())
            .unwrap());
        assert_eq!(*seen.lock(), vec![crate::notify::ChangeKey::DatabaseLoaded]);

        assert_eq!(loaded.id(), model);
        assert_eq!(loaded.size(), 20);
        assert_eq!(loaded.sector(3).unwrap().warps_in(), vec![2]);
        assert_eq!(loaded.sector(8).unwrap().warps_in(), vec![7]);
        assert!(loaded.sector(7).unwrap().is_fully_mapped());
        assert!(loaded.sector(9).unwrap().is_avoided());

        let port = loaded.port(3).unwrap().unwrap();
        assert_eq!(port.name().as_deref(), Some("Aldebaran"));
        assert_eq!(port.capacities()[0], -2510);
        assert_eq!(port.status(), Some(PortStatus::Available));
        assert_eq!(loaded.hub_sector(), Some(5));
        assert!(loaded.port(5).unwrap().unwrap().is_hub());

        assert_eq!(loaded.trader("Rook").unwrap().xp(), 400);
        assert_eq!(loaded.corporation(4).unwrap().members().len(), 1);

        let ship = loaded.you().ship();
        assert!(Arc::ptr_eq(&ship, &loaded.ship(12).unwrap()));
        assert_eq!(ship.cargo(Cargo::Organics), 15);
        assert_eq!(ship.ship_type().unwrap().name(), "Merchant Cruiser");
        assert_eq!(loaded.you().sector(), Some(3));
        assert_eq!(loaded.you().credits(), 5000);
    }

    #[test]
    fn test_load_into_initialized_model_is_refused() {
        let snapshot = populated().snapshot();
        let other = Universe::new();
        other.initialize(5);
        assert!(!other.load_snapshot(snapshot).unwrap());
        assert_eq!(other.size(), 5);
    }

    #[test]
    fn test_load_rejects_bad_warps() {
        let mut snapshot = populated().snapshot();
        snapshot.sectors[0].warps_out.push(99);
        let loaded = Universe::new();
        assert!(matches!(
            loaded.load_snapshot(snapshot),
            Err(UniverseError::OutOfRange { sector: 99, .. })
        ));
        assert!(!loaded.is_initialized());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ModelSnapshot::from_json("{\"size\":"),
            Err(UniverseError::Snapshot(_))
        ));
    }
}
