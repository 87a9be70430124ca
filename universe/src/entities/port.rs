//! Ports and their inferred trading data.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::mechanics::{
    can_cross_trade, can_triple_trade, infer_capacity, PortStatus, Product, TradingClass,
};

/// Port discriminant. The hub differs from other ports only in the class it
/// reports; it still carries the trading class of the goods it deals in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    Standard { class: Option<TradingClass> },
    Hub { class: Option<TradingClass> },
}

impl PortKind {
    fn class(self) -> Option<TradingClass> {
        match self {
            PortKind::Standard { class } | PortKind::Hub { class } => class,
        }
    }
}

impl Default for PortKind {
    fn default() -> Self {
        PortKind::Standard { class: None }
    }
}

/// Capacity growth detected while applying a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityUpgrade {
    pub product: Product,
    /// Increase in capacity magnitude.
    pub increase: i32,
}

/// Mutable fields of a port, also its persisted form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortState {
    pub kind: PortKind,
    pub name: Option<String>,
    pub status: Option<PortStatus>,
    pub status_date: Option<DateTime<Utc>>,
    /// Signed quantities on hand; negative while the port buys.
    pub levels: [i32; 3],
    pub percents: [i32; 3],
    /// Signed like `levels`; magnitudes never decrease.
    pub capacities: [i32; 3],
    pub report_date: Option<DateTime<Utc>>,
    pub credits: Option<i64>,
    pub credits_date: Option<DateTime<Utc>>,
    pub bust_date: Option<DateTime<Utc>>,
    pub mcic: [i32; 3],
}

/// A port, attached to exactly one sector for its whole life.
#[derive(Debug)]
pub struct Port {
    sector: u32,
    state: Mutex<PortState>,
}

impl Port {
    /// Create an unidentified port in `sector`.
    pub fn new(sector: u32) -> Self {
        Self::from_state(sector, PortState::default())
    }

    pub fn from_state(sector: u32, state: PortState) -> Self {
        Self {
            sector,
            state: Mutex::new(state),
        }
    }

    /// Copy of all fields, read under one lock.
    pub fn state(&self) -> PortState {
        self.state.lock().clone()
    }

    pub fn sector(&self) -> u32 {
        self.sector
    }

    pub fn kind(&self) -> PortKind {
        self.state.lock().kind
    }

    pub fn is_hub(&self) -> bool {
        matches!(self.kind(), PortKind::Hub { .. })
    }

    pub fn name(&self) -> Option<String> {
        self.state.lock().name.clone()
    }

    /// Names are write-once. Returns true if the name was recorded.
    pub fn set_name(&self, name: &str) -> bool {
        let mut state = self.state.lock();
        if state.name.is_some() {
            return false;
        }
        state.name = Some(name.to_string());
        true
    }

    pub fn status(&self) -> Option<PortStatus> {
        self.state.lock().status
    }

    pub fn status_date(&self) -> Option<DateTime<Utc>> {
        self.state.lock().status_date
    }

    /// Returns the previous status if this call changed it.
    pub(crate) fn set_status(&self, status: PortStatus) -> Option<Option<PortStatus>> {
        let mut state = self.state.lock();
        if state.status == Some(status) {
            return None;
        }
        let previous = state.status.replace(status);
        state.status_date = Some(Utc::now());
        Some(previous)
    }

    /// The known trading class, i.e. which products the port buys and sells.
    pub fn trading_class(&self) -> Option<TradingClass> {
        self.kind().class()
    }

    /// The class the game reports for this port: always 9 for the hub.
    pub fn port_class(&self) -> Option<TradingClass> {
        match self.kind() {
            PortKind::Standard { class } => class,
            PortKind::Hub { .. } => Some(TradingClass::HUB),
        }
    }

    /// Trading class is write-once. Returns true if it was recorded.
    ///
    /// The hub class is refused here; hubs are declared through
    /// [`Universe::mark_hub`](crate::Universe::mark_hub).
    pub fn set_trading_class(&self, class: TradingClass) -> bool {
        if class.is_hub() {
            return false;
        }
        let mut state = self.state.lock();
        match state.kind {
            PortKind::Standard { class: None } => {
                state.kind = PortKind::Standard { class: Some(class) };
                true
            }
            PortKind::Hub { class: None } => {
                state.kind = PortKind::Hub { class: Some(class) };
                true
            }
            _ => false,
        }
    }

    /// Switch the discriminant to hub, keeping the trading class and every
    /// recorded report.
    pub(crate) fn convert_to_hub(&self) -> bool {
        let mut state = self.state.lock();
        match state.kind {
            PortKind::Hub { .. } => false,
            PortKind::Standard { class } => {
                state.kind = PortKind::Hub { class };
                true
            }
        }
    }

    pub fn levels(&self) -> [i32; 3] {
        self.state.lock().levels
    }

    pub fn percents(&self) -> [i32; 3] {
        self.state.lock().percents
    }

    pub fn capacities(&self) -> [i32; 3] {
        self.state.lock().capacities
    }

    pub fn level(&self, product: Product) -> i32 {
        self.levels()[product.index()]
    }

    pub fn percent(&self, product: Product) -> i32 {
        self.percents()[product.index()]
    }

    pub fn capacity(&self, product: Product) -> i32 {
        self.capacities()[product.index()]
    }

    pub fn report_date(&self) -> Option<DateTime<Utc>> {
        self.state.lock().report_date
    }

    /// Record a full commerce report and fold it into the capacity estimates,
    /// all in one critical section.
    ///
    /// Returns an entry for each product whose capacity grew past a value that
    /// was already known.
    pub fn apply_report(&self, levels: [i32; 3], percents: [i32; 3]) -> Vec<CapacityUpgrade> {
        let mut state = self.state.lock();
        state.levels = levels;
        state.percents = percents;
        state.report_date = Some(Utc::now());

        let mut upgrades = Vec::new();
        for product in Product::ALL {
            let i = product.index();
            let known = state.capacities[i];
            let Some(capacity) = infer_capacity(levels[i], percents[i], known) else {
                continue;
            };
            state.capacities[i] = capacity;
            if known != 0 {
                upgrades.push(CapacityUpgrade {
                    product,
                    increase: (capacity.unsigned_abs() - known.unsigned_abs()) as i32,
                });
            }
        }
        upgrades
    }

    pub fn credits(&self) -> Option<i64> {
        self.state.lock().credits
    }

    pub fn credits_date(&self) -> Option<DateTime<Utc>> {
        self.state.lock().credits_date
    }

    pub fn set_credits(&self, credits: i64) {
        let mut state = self.state.lock();
        state.credits = Some(credits);
        state.credits_date = Some(Utc::now());
    }

    pub fn bust_date(&self) -> Option<DateTime<Utc>> {
        self.state.lock().bust_date
    }

    pub fn set_busted(&self, at: DateTime<Utc>) {
        self.state.lock().bust_date = Some(at);
    }

    pub fn clear_bust(&self) {
        self.state.lock().bust_date = None;
    }

    /// Maximum credits-per-item the port was seen to accept.
    pub fn mcic(&self, product: Product) -> i32 {
        self.state.lock().mcic[product.index()]
    }

    pub fn set_mcic(&self, product: Product, value: i32) {
        self.state.lock().mcic[product.index()] = value;
    }

    pub fn sells(&self, product: Product) -> bool {
        self.trading_class().is_some_and(|c| c.sells(product))
    }

    pub fn buys(&self, product: Product) -> bool {
        self.trading_class().is_some_and(|c| c.buys(product))
    }

    /// Buy/sell pattern like `BBS`, or `???` while the class is unknown.
    pub fn product_string(&self) -> String {
        self.trading_class()
            .and_then(TradingClass::pattern)
            .unwrap_or_else(|| "???".to_string())
    }

    pub fn can_cross_trade(&self, other: &Port, p1: Product, p2: Product) -> bool {
        match (self.trading_class(), other.trading_class()) {
            (Some(a), Some(b)) => can_cross_trade(a, b, p1, p2),
            _ => false,
        }
    }

    pub fn can_triple_trade(&self, other: &Port) -> bool {
        match (self.trading_class(), other.trading_class()) {
            (Some(a), Some(b)) => can_triple_trade(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = self
            .port_class()
            .map(|c| c.number().to_string())
            .unwrap_or_else(|| "?".to_string());
        match self.name() {
            Some(name) => write!(f, "{}, Class {}", name, class),
            None => write!(f, "Unidentified Class {}", class),
        }
    }
}
