//! Sectors: the nodes of the warp graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};

use crate::entities::{Owner, Port};
use crate::mechanics::FighterMode;

/// Outbound warp count at which a sector is known to be complete.
pub const MAX_WARPS: usize = 6;

/// Result of a density scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityReading {
    pub density: i32,
    /// Outbound warp count reported by the scan.
    pub warps: u32,
    pub navhaz: i32,
    pub anomaly: bool,
    pub scanned_at: DateTime<Utc>,
}

/// Fighters deployed in a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FighterPresence {
    pub count: i32,
    pub owner: Option<Owner>,
    pub mode: FighterMode,
    /// When the current deployment was first seen; `None` when empty.
    pub placed_at: Option<DateTime<Utc>>,
}

/// Mines deployed in a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinePresence {
    pub count: i32,
    pub owner: Option<Owner>,
}

/// Last recorded hit on sector fighters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterHit {
    pub by: String,
    pub at: DateTime<Utc>,
}

/// Authoritative, persisted fields of a sector. Inbound warps are derived
/// and rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub warps_out: Vec<u32>,
    pub explored: bool,
    pub fully_mapped: bool,
    pub avoided: bool,
    pub nebula: Option<String>,
    pub density: Option<DensityReading>,
    pub holo_date: Option<DateTime<Utc>>,
    pub fighters: FighterPresence,
    pub fighter_hit: Option<FighterHit>,
    pub armids: Option<MinePresence>,
    pub limpets: Option<MinePresence>,
    pub beacon: Option<String>,
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct SectorState {
    record: SectorRecord,
    warps_out_sorted: bool,
    warps_in: Vec<u32>,
    warps_in_sorted: bool,
    port: Option<Arc<Port>>,
}

/// Outcome of replacing a sector's outbound list.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct WarpReplacement {
    pub added: Vec<u32>,
    pub dropped: Vec<u32>,
    pub changed: bool,
}

/// A sector. Identity is its number; all other fields sit behind one lock.
#[derive(Debug)]
pub struct Sector {
    number: u32,
    state: RwLock<SectorState>,
}

impl Sector {
    pub fn new(number: u32) -> Self {
        Self::from_record(number, SectorRecord::default())
    }

    pub fn from_record(number: u32, record: SectorRecord) -> Self {
        Self {
            number,
            state: RwLock::new(SectorState {
                record,
                warps_in_sorted: true,
                ..Default::default()
            }),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Copy of the persisted fields, with outbound warps sorted.
    pub fn record(&self) -> SectorRecord {
        let mut record = self.state.read().record.clone();
        record.warps_out.sort_unstable();
        record
    }

    /// Outbound warps in ascending order.
    pub fn warps_out(&self) -> Vec<u32> {
        let state = self.state.upgradable_read();
        if state.warps_out_sorted {
            return state.record.warps_out.clone();
        }
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.record.warps_out.sort_unstable();
        state.warps_out_sorted = true;
        state.record.warps_out.clone()
    }

    /// Inbound warps in ascending order.
    pub fn warps_in(&self) -> Vec<u32> {
        let state = self.state.upgradable_read();
        if state.warps_in_sorted {
            return state.warps_in.clone();
        }
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.warps_in.sort_unstable();
        state.warps_in_sorted = true;
        state.warps_in.clone()
    }

    /// Outbound warps in insertion order, without sorting.
    pub(crate) fn warps_out_unordered(&self) -> Vec<u32> {
        self.state.read().record.warps_out.clone()
    }

    pub fn has_warp_to(&self, sector: u32) -> bool {
        self.state.read().record.warps_out.contains(&sector)
    }

    pub fn has_warp_from(&self, sector: u32) -> bool {
        self.state.read().warps_in.contains(&sector)
    }

    pub fn known_warp_count(&self) -> usize {
        self.state.read().record.warps_out.len()
    }

    /// Best estimate of the outbound warp count, including density scans.
    pub fn warp_count(&self) -> usize {
        let state = self.state.read();
        let scanned = state.record.density.map_or(0, |d| d.warps as usize);
        scanned.max(state.record.warps_out.len())
    }

    /// Append an outbound edge. Returns false when the sector is fully mapped
    /// or already has the edge.
    pub(crate) fn push_warp_out(&self, to: u32) -> bool {
        let mut state = self.state.write();
        let record = &mut state.record;
        if record.fully_mapped || record.warps_out.contains(&to) {
            return false;
        }
        let in_order = record.warps_out.last().map_or(true, |last| *last < to);
        record.warps_out.push(to);
        let count = record.warps_out.len();
        let scanned = record.density.map(|d| d.warps as usize);
        if count == MAX_WARPS || scanned == Some(count) {
            record.fully_mapped = true;
        }
        if !in_order {
            state.warps_out_sorted = false;
        }
        true
    }

    pub(crate) fn push_warp_in(&self, from: u32) {
        let mut state = self.state.write();
        if state.warps_in.contains(&from) {
            return;
        }
        if state.warps_in.last().is_some_and(|last| *last > from) {
            state.warps_in_sorted = false;
        }
        state.warps_in.push(from);
    }

    pub(crate) fn remove_warp_in(&self, from: u32) {
        self.state.write().warps_in.retain(|s| *s != from);
    }

    /// Replace the outbound list with a complete, authoritative set and mark
    /// the sector explored and fully mapped.
    pub(crate) fn replace_warps_out(&self, warps: &[u32]) -> WarpReplacement {
        let mut incoming: Vec<u32> = warps.to_vec();
        incoming.sort_unstable();
        incoming.dedup();

        let mut state = self.state.write();
        let record = &mut state.record;
        let added: Vec<u32> = incoming
            .iter()
            .filter(|w| !record.warps_out.contains(w))
            .copied()
            .collect();
        let dropped: Vec<u32> = record
            .warps_out
            .iter()
            .filter(|w| !incoming.contains(w))
            .copied()
            .collect();
        let changed = !added.is_empty()
            || !dropped.is_empty()
            || !record.explored
            || !record.fully_mapped;

        record.warps_out = incoming;
        record.explored = true;
        record.fully_mapped = true;
        state.warps_out_sorted = true;

        WarpReplacement {
            added,
            dropped,
            changed,
        }
    }

    pub fn is_explored(&self) -> bool {
        self.state.read().record.explored
    }

    /// Returns true if the flag changed.
    pub fn set_explored(&self, explored: bool) -> bool {
        let mut state = self.state.write();
        let changed = state.record.explored != explored;
        state.record.explored = explored;
        changed
    }

    pub fn is_fully_mapped(&self) -> bool {
        self.state.read().record.fully_mapped
    }

    pub fn is_avoided(&self) -> bool {
        self.state.read().record.avoided
    }

    /// Returns true if the flag changed.
    pub fn set_avoided(&self, avoided: bool) -> bool {
        let mut state = self.state.write();
        let changed = state.record.avoided != avoided;
        state.record.avoided = avoided;
        changed
    }

    pub fn nebula(&self) -> Option<String> {
        self.state.read().record.nebula.clone()
    }

    pub fn set_nebula(&self, name: &str) {
        self.state.write().record.nebula = Some(name.to_string());
    }

    pub fn port(&self) -> Option<Arc<Port>> {
        self.state.read().port.clone()
    }

    pub fn has_port(&self) -> bool {
        self.state.read().port.is_some()
    }

    /// Returns the existing port, or installs a new one. The flag is true if
    /// the port was created by this call.
    pub(crate) fn port_or_insert(&self) -> (Arc<Port>, bool) {
        let mut state = self.state.write();
        if let Some(port) = &state.port {
            return (port.clone(), false);
        }
        let port = Arc::new(Port::new(self.number));
        state.port = Some(port.clone());
        (port, true)
    }

    pub(crate) fn install_port(&self, port: Arc<Port>) {
        self.state.write().port = Some(port);
    }

    pub fn density(&self) -> Option<DensityReading> {
        self.state.read().record.density
    }

    /// Record a density scan. A scan confirming the known warp count marks the
    /// sector fully mapped.
    pub fn set_density(&self, density: i32, warps: u32, navhaz: i32, anomaly: bool) {
        let mut state = self.state.write();
        let record = &mut state.record;
        record.density = Some(DensityReading {
            density,
            warps,
            navhaz,
            anomaly,
            scanned_at: Utc::now(),
        });
        if warps as usize == record.warps_out.len() {
            record.fully_mapped = true;
        }
    }

    pub fn holo_date(&self) -> Option<DateTime<Utc>> {
        self.state.read().record.holo_date
    }

    pub fn set_holo_date(&self, at: DateTime<Utc>) {
        self.state.write().record.holo_date = Some(at);
    }

    /// The later of the density and holo scan times.
    pub fn scan_date(&self) -> Option<DateTime<Utc>> {
        let state = self.state.read();
        let density = state.record.density.map(|d| d.scanned_at);
        density.max(state.record.holo_date)
    }

    pub fn fighters(&self) -> FighterPresence {
        self.state.read().record.fighters
    }

    /// Record fighters. Unchanged reports keep their original timestamp.
    /// Returns true if anything changed.
    pub fn set_fighters(&self, count: i32, owner: Option<Owner>, mode: FighterMode) -> bool {
        let mut state = self.state.write();
        let current = &mut state.record.fighters;
        if current.count == count && current.owner == owner && current.mode == mode {
            return false;
        }
        *current = FighterPresence {
            count,
            owner,
            mode,
            placed_at: (count != 0).then(Utc::now),
        };
        true
    }

    pub fn fighter_hit(&self) -> Option<FighterHit> {
        self.state.read().record.fighter_hit.clone()
    }

    pub fn set_fighter_hit(&self, by: &str, at: DateTime<Utc>) {
        self.state.write().record.fighter_hit = Some(FighterHit {
            by: by.to_string(),
            at,
        });
    }

    pub fn armids(&self) -> Option<MinePresence> {
        self.state.read().record.armids
    }

    pub fn set_armids(&self, count: i32, owner: Option<Owner>) {
        self.state.write().record.armids = Some(MinePresence { count, owner });
    }

    pub fn limpets(&self) -> Option<MinePresence> {
        self.state.read().record.limpets
    }

    pub fn set_limpets(&self, count: i32, owner: Option<Owner>) {
        self.state.write().record.limpets = Some(MinePresence { count, owner });
    }

    pub fn beacon(&self) -> Option<String> {
        self.state.read().record.beacon.clone()
    }

    pub fn set_beacon(&self, message: &str) {
        self.state.write().record.beacon = Some(message.to_string());
    }

    pub fn note(&self, name: &str) -> Option<String> {
        self.state.read().record.notes.get(name).cloned()
    }

    pub fn set_note(&self, name: &str, note: &str) {
        self.state
            .write()
            .record
            .notes
            .insert(name.to_string(), note.to_string());
    }

    pub fn remove_note(&self, name: &str) -> Option<String> {
        self.state.write().record.notes.remove(name)
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warps_sorted_on_read() {
        let sector = Sector::new(1);
        assert!(sector.push_warp_out(9));
        assert!(sector.push_warp_out(3));
        assert!(!sector.push_warp_out(3));
        assert_eq!(sector.warps_out_unordered(), vec![9, 3]);
        assert_eq!(sector.warps_out(), vec![3, 9]);
    }

    #[test]
    fn test_fully_mapped_at_six() {
        let sector = Sector::new(1);
        for to in 2..=7 {
            assert!(sector.push_warp_out(to));
        }
        assert!(sector.is_fully_mapped());
        assert!(!sector.push_warp_out(8));
        assert_eq!(sector.known_warp_count(), MAX_WARPS);
    }

    #[test]
    fn test_fully_mapped_from_density() {
        let sector = Sector::new(1);
        sector.set_density(100, 2, 0, false);
        assert!(!sector.is_fully_mapped());
        sector.push_warp_out(4);
        assert!(!sector.is_fully_mapped());
        sector.push_warp_out(5);
        assert!(sector.is_fully_mapped());
        assert_eq!(sector.warp_count(), 2);
    }

    #[test]
    fn test_density_confirming_known_warps() {
        let sector = Sector::new(1);
        sector.push_warp_out(4);
        sector.set_density(0, 1, 0, true);
        assert!(sector.is_fully_mapped());
        assert!(sector.density().unwrap().anomaly);
        assert!(sector.scan_date().is_some());
    }

    #[test]
    fn test_replace_warps_out() {
        let sector = Sector::new(1);
        sector.push_warp_out(2);
        sector.push_warp_out(3);

        let first = sector.replace_warps_out(&[4, 2]);
        assert_eq!(first.added, vec![4]);
        assert_eq!(first.dropped, vec![3]);
        assert!(first.changed);
        assert!(sector.is_explored());
        assert!(sector.is_fully_mapped());

        let second = sector.replace_warps_out(&[2, 4]);
        assert!(!second.changed);
        assert_eq!(sector.warps_out(), vec![2, 4]);
    }

    #[test]
    fn test_fighters_unchanged_keep_timestamp() {
        let sector = Sector::new(20);
        assert!(sector.set_fighters(50, Some(Owner::Unknown), FighterMode::Defensive));
        let placed = sector.fighters().placed_at;
        assert!(placed.is_some());
        assert!(!sector.set_fighters(50, Some(Owner::Unknown), FighterMode::Defensive));
        assert_eq!(sector.fighters().placed_at, placed);

        assert!(sector.set_fighters(0, None, FighterMode::Unknown));
        assert!(sector.fighters().placed_at.is_none());
    }

    #[test]
    fn test_notes() {
        let sector = Sector::new(2);
        sector.set_note("bubble", "entrance");
        assert_eq!(sector.note("bubble").as_deref(), Some("entrance"));
        assert_eq!(sector.remove_note("bubble").as_deref(), Some("entrance"));
        assert!(sector.note("bubble").is_none());
    }
}
