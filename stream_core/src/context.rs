//! Context carried from one fragment to the next.

use std::collections::BTreeMap;

use universe::Product;

use crate::events::MajorPrompt;

/// A move the game has announced but not yet completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    Warp { target: u32 },
    /// A transwarp plot, assumed to be a blind warp until the drive engages.
    Bwarp { target: u32, distance: u32 },
    Twarp { target: u32, distance: u32 },
}

impl MoveIntent {
    pub fn target(self) -> u32 {
        match self {
            MoveIntent::Warp { target }
            | MoveIntent::Bwarp { target, .. }
            | MoveIntent::Twarp { target, .. } => target,
        }
    }
}

/// One trade dialogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeNegotiation {
    pub product: Option<Product>,
    pub buying: bool,
    pub units: i32,
    pub final_offer: bool,
    /// Trading from a planet rather than the ship's holds.
    pub planet: bool,
    pub last_offer: Option<i64>,
}

/// Product lines of a port report, collected until the last line arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortReportDraft {
    pub selling: [bool; 3],
    pub levels: [i32; 3],
    pub percents: [i32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub prompt: Option<MajorPrompt>,
    pub move_intent: Option<MoveIntent>,
    pub trade: TradeNegotiation,
    /// Sector whose display is being parsed.
    pub sector: Option<u32>,
    /// Sector of the port whose report is being parsed.
    pub port: Option<u32>,
    pub report: PortReportDraft,
    /// Last sector seen in the current bulk port report.
    pub last_cim_port: u32,
    /// Stats collected since the listing began.
    pub stats: BTreeMap<String, String>,
    /// Set once the stats listing has been asked for at the game menu.
    pub stats_requested: bool,
}

impl ParseContext {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
