//! Game statistics, the key/value settings the game prints on request.
//!
//! Values are kept as the raw text the game sent. The typed accessors parse
//! on demand and yield `None` for missing or malformed values.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, UniverseError};

/// The stat that identifies a game epoch. A different value means the game
/// was reset.
pub const START_DAY: &str = "Start Day";

/// Parse an integer that may carry thousands separators, like `-1,250,000`.
pub fn parse_thousands(text: &str) -> Option<i64> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

/// Parse an `M/D/YY` date. Two-digit years are placed in the century that
/// starts at `pivot_year`, so game dates land in the future. Four-digit
/// years are taken as written.
pub fn parse_short_date(text: &str, pivot_year: i32) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() <= 2 {
        let base = pivot_year - pivot_year.rem_euclid(100);
        year += base;
        if year < pivot_year {
            year += 100;
        }
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn plain(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn before_space(value: &str) -> Option<i64> {
    value.split_whitespace().next()?.parse().ok()
}

fn before_percent(value: &str) -> Option<i64> {
    value.split('%').next()?.trim().parse().ok()
}

fn thousands_before_space(value: &str) -> Option<i64> {
    parse_thousands(value.split_whitespace().next()?)
}

fn flag(value: &str) -> Option<bool> {
    Some(value.trim().eq_ignore_ascii_case("true"))
}

macro_rules! stat_accessors {
    ($ty:ty, $parse:ident; $($(#[$doc:meta])* $name:ident => $key:literal),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> Option<$ty> {
                self.entries.read().get($key).and_then(|v| $parse(v))
            }
        )*
    };
}

/// The stats map for one game.
#[derive(Debug, Default)]
pub struct GameStats {
    entries: RwLock<BTreeMap<String, String>>,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }

    /// Merge a freshly downloaded stats listing.
    ///
    /// If a start day is already recorded and the listing reports a different
    /// one (or none), nothing is applied and an integrity error is returned.
    pub fn merge(&self, update: BTreeMap<String, String>) -> Result<()> {
        let mut entries = self.entries.write();
        if let Some(recorded) = entries.get(START_DAY) {
            let reported = update.get(START_DAY);
            if reported != Some(recorded) {
                return Err(UniverseError::Integrity {
                    key: START_DAY.to_string(),
                    recorded: recorded.clone(),
                    reported: reported.cloned(),
                });
            }
        }
        debug!(count = update.len(), "merging game stats");
        entries.extend(update);
        Ok(())
    }

    pub(crate) fn restore(&self, entries: BTreeMap<String, String>) {
        *self.entries.write() = entries;
    }

    /// Day the current game epoch began, read with the current year as the
    /// century pivot.
    pub fn start_day(&self) -> Option<NaiveDate> {
        self.start_day_from(Utc::now().year())
    }

    pub fn start_day_from(&self, pivot_year: i32) -> Option<NaiveDate> {
        parse_short_date(&self.get(START_DAY)?, pivot_year)
    }

    stat_accessors! { i64, plain;
        sectors => "Sectors",
        max_course_length => "Max Course Length",
        major_version => "Major Version",
        minor_version => "Minor Version",
        initial_fighters => "Initial Fighters",
        initial_credits => "Initial Credits",
        initial_holds => "Initial Holds",
        max_corp_members => "Max Corp Members",
        /// Maximum number of traders.
        users => "Users",
        aliens => "Aliens",
        ships => "Ships",
        ports => "Ports",
        planets => "Planets",
    }

    stat_accessors! { i64, before_space;
        /// Days since the game started.
        game_age => "Game Age",
        turn_base => "Turn Base",
        /// Inactivity timeout in seconds.
        inactivity_timeout => "Inactive Time",
        /// Photon duration in seconds.
        photon_duration => "Photon Missile Duration",
        clear_bust_days => "Clear Bust Days",
    }

    stat_accessors! { i64, before_percent;
        cloak_fail_percent => "Cloak Fail Percent",
        steal_factor => "Steal Factor",
        rob_factor => "Rob Factor",
    }

    stat_accessors! { i64, thousands_before_space;
        max_bank_credits => "Max Bank Credits",
        genesis_torpedo_cost => "Genesis Torpedo",
        armid_cost => "Armid Mine",
        limpet_cost => "Limpet Mine",
        beacon_cost => "Beacon",
        transwarp1_cost => "Type I TWarp",
        transwarp2_cost => "Type II TWarp",
        psychic_probe_cost => "Psychic Probe",
        planet_scanner_cost => "Planet Scanner",
        atomic_cost => "Atomic Detonator",
        corbomite_cost => "Corbomite",
        ether_probe_cost => "Ether Probe",
        photon_cost => "Photon Missile",
        cloak_cost => "Cloaking Device",
        disruptor_cost => "Mine Disruptor",
        holo_scanner_cost => "Holographic Scanner",
        density_scanner_cost => "Density Scanner",
    }

    stat_accessors! { bool, flag;
        gold_enabled => "Gold Enabled",
        mbbs_compatible => "MBBS Compatibility",
        closed_game => "Closed Game",
        show_stardock => "Show Stardock",
        internal_aliens => "Internal Aliens",
        internal_ferrengi => "Internal Ferrengi",
    }
}
