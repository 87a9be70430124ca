//! Sector displays, bulk computer reports and movement.

use chrono::Utc;
use tracing::{debug, info, warn};
use universe::{Cargo, FighterMode, Owner, PortStatus, StateChange, TraderId, TradingClass};

use super::{narrow, Reconciler};
use crate::context::MoveIntent;
use crate::error::{Result, ScanError};
use crate::events::AutomationEvent;
use crate::fragment::FighterOwnerClass;
use crate::scan;

/// Fuel ore burned per transwarp hop.
const ORE_PER_HOP: i32 = 3;

/// One line of the bulk port report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CimPort {
    sector: i64,
    selling: [bool; 3],
    levels: [i32; 3],
    percents: [i32; 3],
}

/// Parse ` 123 - 2510 100%   1200  60% - 300  10%`. A `-` before a level,
/// standalone or attached, marks a product the port buys.
fn parse_cim_port(text: &str) -> Result<CimPort> {
    let malformed = || ScanError::Malformed {
        what: "port listing",
        text: text.to_string(),
    };
    let plain = scan::strip_ansi(text);
    let mut tokens = plain.split_whitespace();
    let sector = tokens
        .next()
        .and_then(scan::parse_thousands)
        .ok_or_else(malformed)?;

    let mut line = CimPort {
        sector,
        selling: [true; 3],
        levels: [0; 3],
        percents: [0; 3],
    };
    let (mut level_count, mut percent_count) = (0, 0);
    let mut buying = false;
    for token in tokens {
        if token == "-" {
            buying = true;
        } else if let Some(percent) = token.strip_suffix('%') {
            let slot = line.percents.get_mut(percent_count).ok_or_else(malformed)?;
            *slot = percent.parse().map_err(|_| malformed())?;
            percent_count += 1;
        } else {
            let buys = buying || token.starts_with('-');
            let level = scan::parse_thousands(token.trim_start_matches('-'))
                .and_then(|l| i32::try_from(l).ok())
                .ok_or_else(malformed)?;
            let i = level_count;
            *line.levels.get_mut(i).ok_or_else(malformed)? = if buys { -level } else { level };
            line.selling[i] = !buys;
            level_count += 1;
            buying = false;
        }
    }
    if level_count != 3 || percent_count != 3 {
        return Err(malformed().into());
    }
    Ok(line)
}

impl Reconciler {
    /// A bulk report line. Ports missing between this line and the previous
    /// one are blocked; a sector at or below the previous one starts a new
    /// listing.
    pub(super) fn cim_port_line(&mut self, text: &str) -> Result<()> {
        let line = parse_cim_port(text)?;
        let sector = self.sector_number(line.sector)?;

        let last = self.context.last_cim_port;
        let blocked = if last == 0 || sector <= last {
            self.universe.set_last_cim_ports(Utc::now());
            self.universe.block_ports_between(1, sector)?
        } else {
            self.universe.block_ports_between(last + 1, sector)?
        };
        if blocked > 0 {
            debug!(blocked, before = sector, "ports missing from listing");
        }
        self.context.last_cim_port = sector;

        self.universe.mark_explored(sector)?;
        let port = self.universe.ensure_port(sector)?;
        port.set_trading_class(TradingClass::from_selling(line.selling));
        self.apply_port_report(sector, &port, line.levels, line.percents)
    }

    pub(super) fn cim_sector_line(&mut self, text: &str) -> Result<()> {
        let numbers = self.sector_numbers(text)?;
        let Some((&sector, warps)) = numbers.split_first() else {
            return Err(ScanError::NoInteger(text.to_string()).into());
        };
        self.universe.set_outbound_warps(sector, warps)?;
        Ok(())
    }

    /// Every hop of a plotted course is a known warp.
    pub(super) fn course_plot(&mut self, text: &str) -> Result<()> {
        let course = self.sector_numbers(text)?;
        let hops: Vec<(u32, u32)> = course.windows(2).map(|w| (w[0], w[1])).collect();
        self.universe.add_outbound_warps(&hops)?;
        self.emit(AutomationEvent::CoursePlot { course });
        Ok(())
    }

    pub(super) fn density_scan(&mut self, text: &str) -> Result<()> {
        let numbers = scan::find_integers(text)?;
        let &[sector, density, warps, navhaz, ..] = numbers.as_slice() else {
            return Err(ScanError::Malformed {
                what: "density scan",
                text: text.to_string(),
            }
            .into());
        };
        let sector = self.sector_number(sector)?;
        let warps = u32::try_from(warps).map_err(|_| ScanError::Malformed {
            what: "warp count",
            text: text.to_string(),
        })?;
        let plain = scan::strip_ansi(text);
        let anomaly = plain.trim_end().ends_with("Yes") || scan::last_char(text) == Some('Y');
        self.universe
            .sector(sector)?
            .set_density(narrow(density)?, warps, narrow(navhaz)?, anomaly);
        self.publish(StateChange::SectorUpdated { sector });
        Ok(())
    }

    pub(super) fn probe_entering_sector(&mut self, text: &str) -> Result<()> {
        let sector = self.sector_number(scan::find_integer(text)?)?;
        self.context.sector = Some(sector);
        Ok(())
    }

    /// Start of a sector display. Completes a pending move that targeted
    /// this sector.
    pub(super) fn sector_header(&mut self, text: &str) -> Result<()> {
        let sector = self.sector_number(scan::find_integer(text)?)?;
        self.context.sector = Some(sector);
        self.universe.mark_explored(sector)?;
        self.universe.sector(sector)?.set_holo_date(Utc::now());

        if let Some(intent) = self.context.move_intent.take() {
            if intent.target() == sector {
                self.complete_move(intent);
            } else {
                warn!(target = intent.target(), arrived = sector, "move ended elsewhere");
            }
        }
        Ok(())
    }

    fn complete_move(&mut self, intent: MoveIntent) {
        self.set_ship_sector(intent.target());
        let turns = self.you().turns();
        match intent {
            MoveIntent::Bwarp { .. } => self.set_turns(turns - 1),
            MoveIntent::Warp { .. } | MoveIntent::Twarp { .. } => {
                let per_warp = self
                    .you()
                    .ship()
                    .ship_type()
                    .and_then(|t| t.turns_per_warp());
                if let Some(per_warp) = per_warp {
                    self.set_turns(turns - per_warp);
                }
            }
        }
        if let MoveIntent::Twarp { distance, .. } = intent {
            let ore = self.you().ship().cargo(Cargo::FuelOre);
            let burned = i32::try_from(distance)
                .unwrap_or(i32::MAX)
                .saturating_mul(ORE_PER_HOP);
            self.set_cargo(Cargo::FuelOre, ore.saturating_sub(burned).max(0));
        }
    }

    pub(super) fn nebula_name(&mut self, text: &str) -> Result<()> {
        let sector = self.current_sector()?;
        let name = scan::after_label(text)?;
        let name = name.trim_end_matches('.').trim();
        self.universe.sector(sector)?.set_nebula(name);
        Ok(())
    }

    /// `Ports   : Aldebaran, Class 3`. Class 9 is the hub and class 0 a
    /// special sector.
    pub(super) fn sector_port(&mut self, text: &str) -> Result<()> {
        let sector = self.current_sector()?;
        let value = scan::after_label(text)?;
        let malformed = || ScanError::Malformed {
            what: "port",
            text: value.clone(),
        };
        let (name, class) = value.rsplit_once(", Class").ok_or_else(malformed)?;
        let class = class
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| TradingClass::new(d as u8))
            .ok_or_else(malformed)?;

        let port = if class.is_hub() {
            self.universe.mark_hub(sector)?
        } else {
            let port = self.universe.ensure_port(sector)?;
            port.set_trading_class(class);
            if class.number() == 0 && self.universe.add_zero_sector(sector)? {
                info!(sector, "class 0 port found");
            }
            port
        };
        if port.set_name(name.trim()) {
            self.publish(StateChange::SectorUpdated { sector });
        }
        Ok(())
    }

    pub(super) fn port_status(&mut self, status: PortStatus) -> Result<()> {
        let sector = self.current_sector()?;
        self.universe.ensure_port(sector)?;
        self.universe.set_port_status(sector, status)?;
        Ok(())
    }

    /// `Fighters: 1,000 (yours) [Defensive]`. The mode letter opens the last
    /// bracket.
    pub(super) fn sector_fighters(&mut self, owner: FighterOwnerClass, text: &str) -> Result<()> {
        let sector = self.current_sector()?;
        let numbers = scan::find_integers(text)?;
        let count = numbers
            .first()
            .copied()
            .ok_or_else(|| ScanError::NoInteger(text.to_string()))?;

        let plain = scan::strip_ansi(text);
        let plain = plain.trim_end();
        let code = plain
            .rsplit_once('[')
            .and_then(|(_, mode)| mode.chars().next())
            .or_else(|| plain.chars().last());
        let mode = code.map_or(FighterMode::Unknown, FighterMode::from_code);

        let owner = match owner {
            FighterOwnerClass::Yours => Owner::Trader(TraderId::YOU),
            FighterOwnerClass::YourCorp => self
                .you()
                .trader()
                .corporation()
                .map_or(Owner::Unknown, Owner::Corporation),
            FighterOwnerClass::Other => Owner::Unknown,
            FighterOwnerClass::Corp => match numbers.get(1) {
                Some(&number) => u32::try_from(number).map_or(Owner::Unknown, Owner::Corporation),
                None => Owner::Unknown,
            },
            FighterOwnerClass::Pirate => Owner::SpacePirates,
        };

        if self
            .universe
            .sector(sector)?
            .set_fighters(narrow(count)?, Some(owner), mode)
        {
            self.publish(StateChange::SectorUpdated { sector });
        }
        Ok(())
    }

    pub(super) fn sector_warps(&mut self, text: &str) -> Result<()> {
        let sector = self.current_sector()?;
        let warps = self.sector_numbers(text)?;
        self.universe.set_outbound_warps(sector, &warps)?;
        Ok(())
    }

    pub(super) fn warp_target(&mut self, text: &str) -> Result<()> {
        let target = self.sector_number(scan::find_integer(text)?)?;
        self.context.move_intent = Some(MoveIntent::Warp { target });
        Ok(())
    }

    /// The move prompt echoes what was typed after the last `]` or `?`,
    /// backspaces included. An empty entry is no move.
    pub(super) fn mkey_warp_target(&mut self, text: &str) -> Result<()> {
        let plain = scan::strip_ansi(text);
        let typed = plain
            .rfind([']', '?'])
            .map_or(plain.as_str(), |i| &plain[i + 1..]);
        let typed = scan::strip_backspaces(typed);
        let typed = typed.trim();
        if typed.is_empty() {
            return Ok(());
        }
        let target = self.sector_number(scan::find_integer(typed)?)?;
        self.context.move_intent = Some(MoveIntent::Warp { target });
        Ok(())
    }

    /// `Sector 1234 is 5 hops away`
    pub(super) fn transwarp_target(&mut self, text: &str) -> Result<()> {
        let numbers = scan::find_integers(text)?;
        let &[target, distance, ..] = numbers.as_slice() else {
            return Err(ScanError::Malformed {
                what: "transwarp plot",
                text: text.to_string(),
            }
            .into());
        };
        let target = self.sector_number(target)?;
        let distance = u32::try_from(distance).map_err(|_| ScanError::Malformed {
            what: "hop count",
            text: text.to_string(),
        })?;
        self.context.move_intent = Some(MoveIntent::Bwarp { target, distance });
        Ok(())
    }

    /// The drive engaged, so the pending plot is a real transwarp.
    pub(super) fn transwarp_engaged(&mut self) {
        if let Some(MoveIntent::Bwarp { target, distance }) = self.context.move_intent {
            self.context.move_intent = Some(MoveIntent::Twarp { target, distance });
        }
    }

    /// `No route within 25 warps from sector 1 to sector 2`
    pub(super) fn no_route_prompt(&mut self, text: &str) -> Result<()> {
        let numbers = scan::find_integers(text)?;
        let &[_, from, to, ..] = numbers.as_slice() else {
            return Err(ScanError::Malformed {
                what: "no route",
                text: text.to_string(),
            }
            .into());
        };
        let from = self.sector_number(from)?;
        let to = self.sector_number(to)?;
        self.emit(AutomationEvent::NoRoutePrompt { from, to });
        Ok(())
    }

    /// Every integer of `text` as a checked sector number.
    fn sector_numbers(&self, text: &str) -> Result<Vec<u32>> {
        scan::find_integers(text)?
            .into_iter()
            .map(|n| self.sector_number(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::error::ReconcileError;
    use crate::fragment::FragmentKind;
    use std::sync::Arc;
    use universe::{ChangeKey, Port, Product};

    fn port(h: &Harness, sector: u32) -> Arc<Port> {
        h.universe().port(sector).unwrap().unwrap()
    }

    #[test]
    fn test_parse_cim_port() {
        let line = parse_cim_port(" 123 - 2510 100%   1,200  60% - 300  10%").unwrap();
        assert_eq!(line.sector, 123);
        assert_eq!(line.selling, [false, true, false]);
        assert_eq!(line.levels, [-2510, 1200, -300]);
        assert_eq!(line.percents, [100, 60, 10]);

        let attached = parse_cim_port("  7 -2510 100%  0   0%  50  5%").unwrap();
        assert_eq!(attached.selling, [false, true, true]);
        assert_eq!(attached.levels, [-2510, 0, 50]);

        assert!(parse_cim_port(" 7 100 10% 200").is_err());
        assert!(parse_cim_port("").is_err());
    }

    #[test]
    fn test_cim_listing_blocks_missing_ports() {
        let mut h = Harness::new(100);
        for sector in [2, 5, 9] {
            h.universe().ensure_port(sector).unwrap();
        }
        h.universe()
            .ensure_port(4)
            .unwrap()
            .set_trading_class(TradingClass::new(0).unwrap());

        h.feed(FragmentKind::CimPortLine, "   3 - 2510 100%   1200  60% - 300  10%")
            .unwrap();
        assert!(h.universe().last_cim_ports().is_some());
        assert_eq!(
            h.universe().port(2).unwrap().unwrap().status(),
            Some(PortStatus::Blocked)
        );

        h.feed(FragmentKind::CimPortLine, "   9   100  10%    200  20%   300  30%")
            .unwrap();
        assert_eq!(port(&h, 3).status(), Some(PortStatus::Available));
        assert_eq!(port(&h, 4).status(), None);
        assert_eq!(port(&h, 5).status(), Some(PortStatus::Blocked));
        assert_eq!(port(&h, 9).status(), Some(PortStatus::Available));
        assert_eq!(port(&h, 9).trading_class().map(|c| c.number()), Some(7));
        assert_eq!(port(&h, 3).trading_class().map(|c| c.number()), Some(2));
        assert_eq!(port(&h, 3).level(Product::FuelOre), -2510);
        assert!(h.universe().sector(3).unwrap().is_explored());

        // a lower sector starts the next listing
        h.feed(FragmentKind::CimPortLine, "   3 - 2510 100%   1200  60% - 300  10%")
            .unwrap();
        assert_eq!(h.reconciler.context().last_cim_port, 3);
        assert_eq!(port(&h, 2).status(), Some(PortStatus::Blocked));
    }

    #[test]
    fn test_cim_listing_leaves_destroyed_ports() {
        let mut h = Harness::new(100);
        h.universe().ensure_port(2).unwrap();
        h.universe()
            .set_port_status(2, PortStatus::Destroyed)
            .unwrap();
        h.take_changes();

        h.feed(FragmentKind::CimPortLine, "   3 - 2510 100%   1200  60% - 300  10%")
            .unwrap();
        assert_eq!(port(&h, 2).status(), Some(PortStatus::Destroyed));
        assert!(!h.take_changes().iter().any(|change| matches!(
            change,
            StateChange::PortStatusChanged { sector: 2, .. }
        )));
    }

    #[test]
    fn test_cim_line_reports_upgrade() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::CimPortLine, "  12 - 2510 100%   1200  60% - 300  10%")
            .unwrap();
        assert!(h.take_events().is_empty());

        h.feed(FragmentKind::CimPortLine, "  12 - 2600 100%   1200  60% - 300  10%")
            .unwrap();
        assert_eq!(
            h.take_events(),
            vec![AutomationEvent::PortUpgraded {
                sector: 12,
                product: Product::FuelOre,
                increase: 90,
            }]
        );
    }

    #[test]
    fn test_cim_sector_line_replaces_warps() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::CimSectorLine, "  10    11    12    13").unwrap();
        let sector = h.universe().sector(10).unwrap();
        assert_eq!(sector.warps_out(), vec![11, 12, 13]);
        assert!(sector.is_explored());
        assert!(h.universe().sector(12).unwrap().has_warp_from(10));

        h.take_changes();
        h.feed(FragmentKind::CimSectorLine, "  10    11    12    13").unwrap();
        assert!(h.take_changes().is_empty());
    }

    #[test]
    fn test_course_plot() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::CoursePlot, "1 > 2 > (4) > 5").unwrap();
        assert!(h.universe().sector(2).unwrap().has_warp_to(4));
        assert!(h.universe().sector(5).unwrap().has_warp_from(4));
        assert_eq!(h.change_keys(), vec![ChangeKey::WarpsDiscovered]);
        assert_eq!(
            h.take_events(),
            vec![AutomationEvent::CoursePlot {
                course: vec![1, 2, 4, 5]
            }]
        );
    }

    #[test]
    fn test_density_scan() {
        let mut h = Harness::new(2000);
        h.feed(
            FragmentKind::DensityScan,
            "Sector  ( 1234) ==>    100  Warps : 3    NavHaz :     0%    Anom : Yes",
        )
        .unwrap();
        let density = h.universe().sector(1234).unwrap().density().unwrap();
        assert_eq!(density.density, 100);
        assert_eq!(density.warps, 3);
        assert_eq!(density.navhaz, 0);
        assert!(density.anomaly);

        h.feed(
            FragmentKind::DensityScan,
            "Sector  ( 1235) ==>      0  Warps : 2    NavHaz :     5%    Anom : No",
        )
        .unwrap();
        assert!(!h.universe().sector(1235).unwrap().density().unwrap().anomaly);
    }

    #[test]
    fn test_warp_completes_on_matching_header() {
        let mut h = Harness::new(100);
        h.universe()
            .ship_type_named("Merchant Cruiser")
            .set_turns_per_warp(3);
        h.universe()
            .you()
            .ship()
            .set_ship_type(h.universe().ship_type_named("Merchant Cruiser"));
        h.universe().you().set_turns(100);
        h.universe().you().set_sector(1);

        h.feed(FragmentKind::WarpTarget, "Warping to Sector 2").unwrap();
        h.feed(FragmentKind::SectorHeader, "Sector  : 2 in The Federation.")
            .unwrap();
        assert_eq!(h.universe().you().sector(), Some(2));
        assert_eq!(h.universe().you().turns(), 97);
        assert_eq!(h.reconciler.context().move_intent, None);

        // a header elsewhere abandons the move
        h.feed(FragmentKind::WarpTarget, "Warping to Sector 3").unwrap();
        h.feed(FragmentKind::SectorHeader, "Sector  : 4 in uncharted space.")
            .unwrap();
        assert_eq!(h.universe().you().sector(), Some(2));
        assert_eq!(h.reconciler.context().move_intent, None);
    }

    #[test]
    fn test_transwarp_burns_ore() {
        let mut h = Harness::new(100);
        h.universe().you().set_turns(50);
        h.universe().you().ship().set_cargo(Cargo::FuelOre, 40);

        h.feed(FragmentKind::TranswarpTarget, "Sector 40 is 5 hops away").unwrap();
        h.feed(FragmentKind::TranswarpEngaged, "TransWarp Drive Engaged!").unwrap();
        h.feed(FragmentKind::SectorHeader, "Sector  : 40 in uncharted space.")
            .unwrap();
        assert_eq!(h.universe().you().sector(), Some(40));
        assert_eq!(h.universe().you().ship().cargo(Cargo::FuelOre), 25);
        // turns per warp unknown
        assert_eq!(h.universe().you().turns(), 50);
    }

    #[test]
    fn test_blind_warp_costs_one_turn() {
        let mut h = Harness::new(100);
        h.universe().you().set_turns(50);
        h.feed(FragmentKind::TranswarpTarget, "Sector 40 is 5 hops away").unwrap();
        h.feed(FragmentKind::SectorHeader, "Sector  : 40 in uncharted space.")
            .unwrap();
        assert_eq!(h.universe().you().turns(), 49);
    }

    #[test]
    fn test_cancelled_warp() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::WarpTarget, "Warping to Sector 2").unwrap();
        h.feed(FragmentKind::CancelWarp, "").unwrap();
        h.feed(FragmentKind::SectorHeader, "Sector  : 2 in The Federation.")
            .unwrap();
        assert_eq!(h.universe().you().sector(), None);
    }

    #[test]
    fn test_mkey_target_with_backspaces() {
        let mut h = Harness::new(100);
        h.feed(
            FragmentKind::MkeyWarpTarget,
            "<Move> Warp to Sector [1]: 1\x08 \x0872",
        )
        .unwrap();
        assert_eq!(
            h.reconciler.context().move_intent,
            Some(MoveIntent::Warp { target: 72 })
        );

        h.reconciler.reset();
        h.feed(FragmentKind::MkeyWarpTarget, "To which sector? ").unwrap();
        assert_eq!(h.reconciler.context().move_intent, None);
    }

    #[test]
    fn test_sector_display() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::SectorHeader, "Sector  : 10 in uncharted space.")
            .unwrap();
        h.feed(FragmentKind::NebulaName, "Nebulae : The Crab.").unwrap();
        h.feed(FragmentKind::SectorPort, "Ports   : Aldebaran, Class 3 (SBB)")
            .unwrap();
        h.feed(
            FragmentKind::SectorFighters(FighterOwnerClass::Corp),
            "Fighters: 1,000 (belong to Corp#5, The Firm) [Offensive]",
        )
        .unwrap();
        h.feed(FragmentKind::SectorWarps, "Warps to Sector(s) :  2 - (3) - 4")
            .unwrap();

        let sector = h.universe().sector(10).unwrap();
        assert_eq!(sector.nebula().as_deref(), Some("The Crab"));
        assert!(sector.holo_date().is_some());
        let port = sector.port().unwrap();
        assert_eq!(port.name().as_deref(), Some("Aldebaran"));
        assert_eq!(port.trading_class().map(|c| c.number()), Some(3));
        let fighters = sector.fighters();
        assert_eq!(fighters.count, 1000);
        assert_eq!(fighters.owner, Some(Owner::Corporation(5)));
        assert_eq!(fighters.mode, FighterMode::Offensive);
        assert_eq!(sector.warps_out(), vec![2, 3, 4]);
    }

    #[test]
    fn test_hub_and_zero_ports() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::SectorHeader, "Sector  : 1 in The Federation.")
            .unwrap();
        h.feed(FragmentKind::SectorPort, "Ports   : Sol, Class 0 (Special)")
            .unwrap();
        assert_eq!(h.universe().zero_sectors(), vec![1]);

        h.feed(FragmentKind::SectorHeader, "Sector  : 55 in The Federation.")
            .unwrap();
        h.feed(
            FragmentKind::SectorPort,
            "Ports   : Stargate Alpha I, Class 9 (Special)",
        )
        .unwrap();
        assert_eq!(h.universe().hub_sector(), Some(55));
        assert!(h.universe().port(55).unwrap().unwrap().is_hub());
        assert!(h.change_keys().contains(&ChangeKey::HubDiscovered));
    }

    #[test]
    fn test_hub_keeps_class_from_cim() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::CimPortLine, "  55   100  10%    200  20%   300  30%")
            .unwrap();
        h.feed(FragmentKind::SectorHeader, "Sector  : 55 in The Federation.")
            .unwrap();
        h.feed(
            FragmentKind::SectorPort,
            "Ports   : Stargate Alpha I, Class 9 (Special)",
        )
        .unwrap();
        let hub = port(&h, 55);
        assert!(hub.is_hub());
        assert_eq!(hub.trading_class().map(|c| c.number()), Some(7));
        assert_eq!(hub.port_class().map(|c| c.number()), Some(9));
        assert!(hub.sells(Product::Equipment));
    }

    #[test]
    fn test_fighter_owners() {
        let mut h = Harness::new(100);
        h.universe().you().trader().set_corporation(Some(8));
        h.feed(FragmentKind::SectorHeader, "Sector  : 6 in uncharted space.")
            .unwrap();

        let cases = [
            (FighterOwnerClass::Yours, "Fighters: 10 (yours) [Toll]", Owner::Trader(TraderId::YOU)),
            (FighterOwnerClass::YourCorp, "Fighters: 11 (belong to your Corp) [Defensive]", Owner::Corporation(8)),
            (FighterOwnerClass::Other, "Fighters: 12 (belong to Rook) [Defensive]", Owner::Unknown),
            (FighterOwnerClass::Pirate, "Fighters: 13 (Space Pirates) [Offensive]", Owner::SpacePirates),
        ];
        for (class, text, owner) in cases {
            h.feed(FragmentKind::SectorFighters(class), text).unwrap();
            assert_eq!(h.universe().sector(6).unwrap().fighters().owner, Some(owner));
        }
        assert_eq!(
            h.universe().sector(6).unwrap().fighters().mode,
            FighterMode::Offensive
        );

        h.take_changes();
        h.feed(
            FragmentKind::SectorFighters(FighterOwnerClass::Pirate),
            "Fighters: 13 (Space Pirates) [Offensive]",
        )
        .unwrap();
        assert!(h.take_changes().is_empty());
    }

    #[test]
    fn test_port_destroyed_creates_port() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::SectorHeader, "Sector  : 6 in uncharted space.")
            .unwrap();
        h.feed(FragmentKind::PortDestroyed, "Ports   : <=-DANGER-=> Destroyed")
            .unwrap();
        assert_eq!(
            h.universe().port(6).unwrap().unwrap().status(),
            Some(PortStatus::Destroyed)
        );
    }

    #[test]
    fn test_probe_events_carry_sector() {
        let mut h = Harness::new(100);
        h.feed(FragmentKind::ProbeEnteringSector, "Probe entering sector : 17")
            .unwrap();
        h.feed(FragmentKind::ProbeSelfDestructs, "Probe Self Destructs").unwrap();
        assert_eq!(
            h.take_events(),
            vec![AutomationEvent::ProbeSelfDestructs { sector: Some(17) }]
        );
    }

    #[test]
    fn test_no_route() {
        let mut h = Harness::new(100);
        h.feed(
            FragmentKind::NoRoutePrompt,
            "No route within 25 warps from sector 1 to sector 2",
        )
        .unwrap();
        assert_eq!(
            h.take_events(),
            vec![AutomationEvent::NoRoutePrompt { from: 1, to: 2 }]
        );
        assert!(matches!(
            h.feed(FragmentKind::NoRoutePrompt, "No route within 25 warps from sector 1 to sector 200"),
            Err(ReconcileError::Universe(_))
        ));
    }
}
