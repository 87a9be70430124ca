//! The info screen and the quick stats line.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};
use universe::{ScannerKind, Ship, ShipState, ShipType, TraderId};

use super::Reconciler;
use crate::error::{ReconcileError, Result, ScanError};
use crate::fragment::Equipment;
use crate::scan;

const ANSI_RESET: &str = "\x1b[0m";

/// The model name from the ship info line. The manufacturer and the model
/// are separated by a color reset, and the ported and kills counts follow.
fn ship_type_name(text: &str) -> Result<String> {
    let text = text.find("Ported").map_or(text, |i| &text[..i]);
    let name = text
        .rfind(ANSI_RESET)
        .map(|i| scan::strip_ansi(&text[i + ANSI_RESET.len()..]).trim().to_string())
        .filter(|name| !name.is_empty());
    match name {
        Some(name) => Ok(name),
        None => Ok(scan::after_label(text)?),
    }
}

impl Reconciler {
    /// `Trader Name    : Lieutenant Rook`. A fresh info screen follows, so
    /// the ship details are cleared.
    pub(super) fn info_trader_name(&mut self, text: &str) -> Result<()> {
        let (rank, name) = self.ranks.resolve(&scan::after_label(text)?);
        let trader = self.you().trader();
        trader.set_name(&name);
        if let Some(rank) = rank {
            trader.set_rank(&rank);
        }
        self.you().ship().reset_details();
        Ok(())
    }

    pub(super) fn info_xp_align(&mut self, text: &str) -> Result<()> {
        let numbers = scan::find_integers(text)?;
        let &[xp, align, ..] = numbers.as_slice() else {
            return Err(ScanError::Malformed {
                what: "experience and alignment",
                text: text.to_string(),
            }
            .into());
        };
        self.set_xp(super::narrow(xp)?);
        self.set_align(super::narrow(align)?);
        Ok(())
    }

    pub(super) fn info_times_blown_up(&mut self, text: &str) -> Result<()> {
        let times = u32::try_from(scan::last_integer(text)?).map_err(|_| ScanError::Malformed {
            what: "times blown up",
            text: text.to_string(),
        })?;
        self.you().set_times_blown_up(times);
        Ok(())
    }

    /// `Corp           # 5, The Firm`
    pub(super) fn info_corp(&mut self, text: &str) -> Result<()> {
        let number = super::positive_number(text)?;
        let plain = scan::strip_ansi(text);
        let name = plain
            .split_once(", ")
            .map(|(_, name)| name.trim())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ScanError::Malformed {
                what: "corporation",
                text: plain.clone(),
            })?;
        self.join_corporation(number);
        if let Some(corporation) = self.universe.corporation(number) {
            corporation.set_name(name);
        }
        Ok(())
    }

    pub(super) fn join_corporation(&mut self, number: u32) {
        let trader = self.you().trader();
        let previous = trader.corporation();
        if previous == Some(number) {
            return;
        }
        if let Some(old) = previous.and_then(|n| self.universe.corporation(n)) {
            old.remove_member(TraderId::YOU);
        }
        self.universe
            .corporation_numbered(number)
            .add_member(TraderId::YOU);
        trader.set_corporation(Some(number));
        debug!(corporation = number, "joined corporation");
    }

    pub(super) fn info_ship_name(&mut self, text: &str) -> Result<()> {
        self.you().ship().set_name(&scan::after_label(text)?);
        Ok(())
    }

    /// A different type means a different ship.
    pub(super) fn info_ship_type(&mut self, text: &str) -> Result<()> {
        let ship_type = self.universe.ship_type_named(&ship_type_name(text)?);
        let ship = self.you().ship();
        match ship.ship_type() {
            None => ship.set_ship_type(ship_type),
            Some(current) if current.name() == ship_type.name() => {}
            Some(_) => self.replace_ship(Some(ship_type), None),
        }
        Ok(())
    }

    /// A different build date means a different ship of the same type.
    pub(super) fn info_ship_date(&mut self, text: &str) -> Result<()> {
        let built = scan::parse_long_date(&scan::after_label(text)?)?;
        let ship = self.you().ship();
        match ship.build_date() {
            None => ship.set_build_date(built),
            Some(current) if current == built => {}
            Some(_) => self.replace_ship(ship.ship_type(), Some(built)),
        }
        Ok(())
    }

    /// Swap in a new ship, keeping the name and location of the old one.
    fn replace_ship(&self, ship_type: Option<Arc<ShipType>>, build_date: Option<NaiveDateTime>) {
        let old = self.you().ship();
        let ship = Arc::new(Ship::from_state(ShipState {
            ship_type,
            sector: old.sector(),
            name: old.name(),
            build_date,
            ..ShipState::default()
        }));
        let old = self.universe.replace_your_ship(ship);
        info!(old_number = ?old.number(), "ship replaced");
    }

    pub(super) fn info_turns_per_warp(&mut self, text: &str) -> Result<()> {
        let turns = super::narrow(scan::last_integer(text)?)?;
        self.you()
            .ship()
            .ship_type()
            .ok_or(ReconcileError::MissingContext("ship type"))?
            .set_turns_per_warp(turns);
        Ok(())
    }

    pub(super) fn set_equipment(&mut self, equipment: Equipment, count: i32) {
        self.ship_flags(|d| equipment.set(d, count));
    }

    /// `LongRange Scan : Holographic Scanner`
    pub(super) fn info_long_range_scanner(&mut self, text: &str) {
        let scanner = if scan::strip_ansi(text).contains("Holo") {
            ScannerKind::Holographic
        } else {
            ScannerKind::Density
        };
        self.ship_flags(|d| d.long_range_scan = scanner);
    }

    /// A ship with either drive type can be fitted with both.
    pub(super) fn info_transwarp(&mut self, level: u8) {
        let ship = self.you().ship();
        ship.raise_transwarp(level);
        if let Some(ship_type) = ship.ship_type() {
            ship_type.raise_transwarp_level(level);
        }
    }

    /// `LRS D`, `LRS H` or `LRS N`.
    pub(super) fn quick_long_range_scanner(&mut self, text: &str) {
        let scanner = match scan::last_char(text) {
            Some('H') => ScannerKind::Holographic,
            Some('D') => ScannerKind::Density,
            Some('N') => ScannerKind::None,
            _ => return,
        };
        self.ship_flags(|d| d.long_range_scan = scanner);
    }

    /// `TWarp 2`, or `TWarp No` for a ship without a drive.
    pub(super) fn quick_transwarp(&mut self, text: &str) -> Result<()> {
        let Some(&level) = scan::find_integers(text)?.first() else {
            return Ok(());
        };
        let level = u8::try_from(level).map_err(|_| ScanError::Malformed {
            what: "transwarp type",
            text: text.to_string(),
        })?;
        self.info_transwarp(level);
        Ok(())
    }

    pub(super) fn quick_ship_number(&mut self, text: &str) -> Result<()> {
        let number = super::positive_number(text)?;
        let ship = self.you().ship();
        if ship.number() != Some(number) {
            if let Some(old) = ship.number() {
                self.universe.remove_ship(old);
            }
            ship.set_number(number);
        }
        self.universe.register_ship(ship);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::fragment::FragmentKind;
    use universe::{Cargo, ChangeKey};

    #[test]
    fn test_ship_type_name() {
        let text = "Ship Info      : \x1b[0mCorellian \x1b[0mMerchant Cruiser \x1b[35mPorted=\x1b[1;33m12 \x1b[0;35mKills=\x1b[1;33m0";
        assert_eq!(ship_type_name(text).unwrap(), "Merchant Cruiser");
        assert_eq!(
            ship_type_name("Ship Info      : Scout Marauder").unwrap(),
            "Scout Marauder"
        );
    }

    #[test]
    fn test_trader_name_resolves_rank() {
        let mut h = Harness::new(100);
        h.universe().you().ship().set_cargo(Cargo::FuelOre, 5);
        h.feed(
            FragmentKind::InfoTraderName,
            "Trader Name    : Lieutenant J.G. Derpy McStupid",
        )
        .unwrap();
        let you = h.universe().you();
        assert_eq!(you.trader().name(), "Derpy McStupid");
        assert_eq!(you.trader().rank().as_deref(), Some("Lieutenant J.G."));
        assert!(you.ship().details().is_none());
    }

    #[test]
    fn test_xp_align_and_corp() {
        let mut h = Harness::new(100);
        h.feed(
            FragmentKind::InfoXpAlign,
            "Rank and Exp   : 1,000 points, Alignment=-250",
        )
        .unwrap();
        assert_eq!(h.universe().you().trader().xp(), 1000);
        assert_eq!(h.universe().you().trader().align(), -250);
        assert_eq!(h.change_keys(), vec![ChangeKey::YouXp, ChangeKey::YouAlign]);

        h.feed(FragmentKind::InfoCorp, "Corp           # 5, The Firm").unwrap();
        assert_eq!(h.universe().you().trader().corporation(), Some(5));
        let corp = h.universe().corporation(5).unwrap();
        assert_eq!(corp.name().as_deref(), Some("The Firm"));
        assert!(corp.members().contains(&TraderId::YOU));

        h.feed(FragmentKind::QuickCorp, "Corp 7").unwrap();
        assert!(!corp.members().contains(&TraderId::YOU));
        assert_eq!(h.universe().you().trader().corporation(), Some(7));
    }

    #[test]
    fn test_new_type_replaces_ship() {
        let mut h = Harness::new(100);
        h.universe().you().set_sector(12);
        h.feed(FragmentKind::InfoShipName, "Ship Name      : Rocinante").unwrap();
        h.feed(FragmentKind::QuickShipNumber, "Ship 4").unwrap();
        h.feed(FragmentKind::InfoShipType, "Ship Info      : \x1b[0mCorellian \x1b[0mMerchant Cruiser \x1b[35mPorted=1")
            .unwrap();
        let first = h.universe().you().ship();
        assert_eq!(first.ship_type().unwrap().name(), "Merchant Cruiser");
        assert!(h.universe().ship(4).is_some());

        h.feed(FragmentKind::InfoShipType, "Ship Info      : \x1b[0mCorellian \x1b[0mMerchant Cruiser \x1b[35mPorted=2")
            .unwrap();
        assert!(Arc::ptr_eq(&first, &h.universe().you().ship()));

        h.feed(FragmentKind::InfoShipType, "Ship Info      : \x1b[0mAlbino \x1b[0mScout Marauder \x1b[35mPorted=0")
            .unwrap();
        let ship = h.universe().you().ship();
        assert!(!Arc::ptr_eq(&first, &ship));
        assert_eq!(ship.ship_type().unwrap().name(), "Scout Marauder");
        assert_eq!(ship.name().as_deref(), Some("Rocinante"));
        assert_eq!(ship.sector(), Some(12));
        assert!(ship.number().is_none());
        assert!(h.universe().ship(4).is_none());
    }

    #[test]
    fn test_new_build_date_replaces_ship() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::InfoShipDate, "Date Built     : 11:59:59 PM Mon Dec 31, 2040")
            .unwrap();
        let first = h.universe().you().ship();
        assert!(first.build_date().is_some());

        h.feed(FragmentKind::InfoShipDate, "Date Built     : 11:59:59 PM Mon Dec 31, 2040")
            .unwrap();
        assert!(Arc::ptr_eq(&first, &h.universe().you().ship()));

        h.feed(FragmentKind::InfoShipDate, "Date Built     : 01:00:00 AM Tue Jan 01, 2041")
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &h.universe().you().ship()));
    }

    #[test]
    fn test_turns_per_warp_needs_type() {
        let mut h = Harness::new(100);
        assert!(matches!(
            h.feed(FragmentKind::InfoTurnsPerWarp, "Turns to Warp  : 3"),
            Err(ReconcileError::MissingContext("ship type"))
        ));
        h.feed(FragmentKind::InfoShipType, "Ship Info      : \x1b[0mCorellian \x1b[0mMerchant Cruiser \x1b[35mPorted=1")
            .unwrap();
        h.feed(FragmentKind::InfoTurnsPerWarp, "Turns to Warp  : 3").unwrap();
        assert_eq!(
            h.universe()
                .ship_type("Merchant Cruiser")
                .unwrap()
                .turns_per_warp(),
            Some(3)
        );
    }

    #[test]
    fn test_equipment_and_scanners() {
        let mut h = Harness::new(100);
        h.feed(
            FragmentKind::InfoEquipment(Equipment::Armids),
            "Mine Max  : 50  Armid Mines  T1: 10",
        )
        .unwrap();
        h.feed(FragmentKind::QuickEquipment(Equipment::Photons), "Phot 3")
            .unwrap();
        h.feed(FragmentKind::InfoLongRangeScanner, "LongRange Scan : Holographic Scanner")
            .unwrap();
        h.feed(FragmentKind::InfoTranswarp(2), "  (Type 2 Jump): 5 hops")
            .unwrap();
        h.feed(FragmentKind::QuickTranswarp, "TWarp No").unwrap();

        let details = h.universe().you().ship().details().unwrap();
        assert_eq!(details.armids, 10);
        assert_eq!(details.photons, 3);
        assert_eq!(details.long_range_scan, ScannerKind::Holographic);
        assert_eq!(details.transwarp, 2);

        h.feed(FragmentKind::QuickLongRangeScanner, "LRS D").unwrap();
        h.feed(FragmentKind::QuickTranswarp, "TWarp 1").unwrap();
        let details = h.universe().you().ship().details().unwrap();
        assert_eq!(details.long_range_scan, ScannerKind::Density);
        assert_eq!(details.transwarp, 2);
    }

    #[test]
    fn test_times_blown_up() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::InfoTimesBlownUp, "Times Blown Up : 3").unwrap();
        assert_eq!(h.universe().you().times_blown_up(), 3);
    }
}
