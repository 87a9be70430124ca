//! Trade dialogues and port commerce reports.

use std::sync::Arc;

use tracing::{info, warn};
use universe::{Cargo, Port, PortStatus, Product, TradingClass};

use super::{narrow, Reconciler};
use crate::context::{PortReportDraft, TradeNegotiation};
use crate::error::{ReconcileError, Result, ScanError};
use crate::events::AutomationEvent;
use crate::scan;

/// One product line of a commerce report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReportLine {
    product: Product,
    selling: bool,
    /// Negative while the port buys.
    level: i32,
    percent: i32,
}

/// Parse `Fuel Ore   Selling   2510    100`.
fn parse_report_line(text: &str) -> Result<ReportLine> {
    let malformed = || ScanError::Malformed {
        what: "port report line",
        text: text.to_string(),
    };
    let plain = scan::strip_ansi(text);
    let tokens: Vec<&str> = plain.split_whitespace().collect();
    let product = tokens
        .first()
        .and_then(|t| t.chars().next())
        .and_then(Product::from_initial)
        .ok_or_else(malformed)?;
    let selling = match tokens.iter().find(|t| **t == "Selling" || **t == "Buying") {
        Some(&"Selling") => true,
        Some(_) => false,
        None => return Err(malformed().into()),
    };
    let [.., level, percent] = tokens.as_slice() else {
        return Err(malformed().into());
    };
    let level = scan::parse_thousands(level)
        .and_then(|l| i32::try_from(l).ok())
        .ok_or_else(malformed)?;
    let percent = percent
        .trim_end_matches('%')
        .parse()
        .map_err(|_| malformed())?;
    Ok(ReportLine {
        product,
        selling,
        level: if selling { level } else { -level },
        percent,
    })
}

impl Reconciler {
    pub(super) fn start_trading(&mut self, planet: bool) {
        self.context.trade.planet = planet;
        self.emit(if planet {
            AutomationEvent::PlanetTrading
        } else {
            AutomationEvent::ShipTrading
        });
    }

    /// `How many holds of Fuel Ore do you want to buy [20]?` opens a new
    /// negotiation for one product.
    pub(super) fn trade_init_prompt(&mut self, text: &str) {
        let plain = scan::strip_ansi(text);
        let product = Product::ALL.into_iter().find(|p| plain.contains(p.name()));
        let buying = plain.contains(" buy");
        if product.is_none() {
            warn!(text = %plain.escape_debug(), "no product at trade prompt");
        }
        self.context.trade = TradeNegotiation {
            product,
            buying,
            planet: self.context.trade.planet,
            ..TradeNegotiation::default()
        };
        self.emit(AutomationEvent::TradeInitPrompt { product, buying });
    }

    pub(super) fn trade_units(&mut self, text: &str) -> Result<()> {
        let units = narrow(scan::last_integer(text)?)?;
        self.context.trade.units = units;
        self.emit(AutomationEvent::TradingUnits { units });
        Ok(())
    }

    pub(super) fn trade_offer_prompt(&mut self, text: &str) -> Result<()> {
        let offer = scan::find_integer(text)?;
        self.context.trade.last_offer = Some(offer);
        self.emit(AutomationEvent::TradeOfferPrompt { offer });
        Ok(())
    }

    /// Apply the agreed units to the ship's holds. Planet trades leave the
    /// ship alone.
    pub(super) fn trade_accepted(&mut self) {
        let trade = &self.context.trade;
        if let (false, Some(product)) = (trade.planet, trade.product) {
            let cargo = Cargo::from(product);
            let held = self.you().ship().cargo(cargo);
            let delta = if trade.buying { trade.units } else { -trade.units };
            self.set_cargo(cargo, held.saturating_add(delta).max(0));
        }
        self.emit(AutomationEvent::TradeAccepted);
    }

    /// Credits shown during a trade. Raised every time, changed or not.
    pub(super) fn credits(&mut self, text: &str) -> Result<()> {
        let credits = scan::find_integer(text)?;
        self.set_credits(credits);
        self.emit(AutomationEvent::Credits { credits });
        Ok(())
    }

    pub(super) fn port_credits(&mut self, text: &str) -> Result<()> {
        let credits = scan::last_integer(text)?;
        let sector = self
            .you()
            .sector()
            .ok_or(ReconcileError::MissingContext("ship sector"))?;
        self.universe.ensure_port(sector)?.set_credits(credits);
        Ok(())
    }

    /// `What sector is the port in? [1234] 567`. An empty answer means the
    /// current sector.
    pub(super) fn port_in_arbitrary_sector(&mut self, text: &str) -> Result<()> {
        let plain = scan::strip_ansi(text);
        let typed = plain.rsplit_once(']').map_or("", |(_, typed)| typed);
        let typed = scan::strip_backspaces(typed);
        let sector = match typed.trim() {
            "" => self
                .you()
                .sector()
                .ok_or(ReconcileError::MissingContext("ship sector"))?,
            typed => self.sector_number(scan::find_integer(typed)?)?,
        };
        self.begin_port_report(sector)
    }

    pub(super) fn port_in_current_sector(&mut self) -> Result<()> {
        let sector = self
            .you()
            .sector()
            .ok_or(ReconcileError::MissingContext("ship sector"))?;
        self.begin_port_report(sector)
    }

    fn begin_port_report(&mut self, sector: u32) -> Result<()> {
        self.universe.ensure_port(sector)?;
        self.context.port = Some(sector);
        self.context.report = PortReportDraft::default();
        Ok(())
    }

    fn report_port(&self) -> Result<(u32, Arc<Port>)> {
        let sector = self
            .context
            .port
            .ok_or(ReconcileError::MissingContext("port report"))?;
        Ok((sector, self.universe.ensure_port(sector)?))
    }

    /// `Commerce report for Aldebaran: 12:00:00 PM Sat Jan 01, 2028`
    pub(super) fn port_report_header(&mut self, text: &str) -> Result<()> {
        let (_, port) = self.report_port()?;
        let plain = scan::strip_ansi(text);
        let name = plain
            .split_once("Commerce report for ")
            .map(|(_, rest)| rest.split_once(": ").map_or(rest, |(name, _)| name))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ScanError::Malformed {
                what: "port report header",
                text: plain.clone(),
            })?;
        port.set_name(name);
        Ok(())
    }

    /// Lines arrive in product order; the equipment line completes the
    /// report.
    pub(super) fn port_report_line(&mut self, text: &str) -> Result<()> {
        let (sector, port) = self.report_port()?;
        let line = parse_report_line(text)?;
        let i = line.product.index();
        let draft = &mut self.context.report;
        draft.selling[i] = line.selling;
        draft.levels[i] = line.level;
        draft.percents[i] = line.percent;

        if line.product == Product::Equipment {
            let draft = self.context.report;
            port.set_trading_class(TradingClass::from_selling(draft.selling));
            self.apply_port_report(sector, &port, draft.levels, draft.percents)?;
        }
        Ok(())
    }

    /// Store a full report, raise an event per capacity upgrade and mark the
    /// port available.
    pub(super) fn apply_port_report(
        &mut self,
        sector: u32,
        port: &Port,
        levels: [i32; 3],
        percents: [i32; 3],
    ) -> Result<()> {
        for upgrade in port.apply_report(levels, percents) {
            info!(sector, product = %upgrade.product, increase = upgrade.increase, "port upgraded");
            self.emit(AutomationEvent::PortUpgraded {
                sector,
                product: upgrade.product,
                increase: upgrade.increase,
            });
        }
        self.universe.set_port_status(sector, PortStatus::Available)?;
        Ok(())
    }
}
