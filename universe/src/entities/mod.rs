//! Entity definitions for the universe: ports, ships, traders and
//! corporations, and the owner abstraction tying them together.

mod port;
mod ship;
mod trader;

pub use port::*;
pub use ship::*;
pub use trader::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of one open universe model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub Uuid);

impl ModelId {
    /// Create a new random model ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of a trader within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraderId(pub u32);

impl TraderId {
    /// The player this model belongs to.
    pub const YOU: TraderId = TraderId(0);

    pub fn is_you(self) -> bool {
        self == Self::YOU
    }
}

impl std::fmt::Display for TraderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trader#{}", self.0)
    }
}

/// Owner of fighters, mines or a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Trader(TraderId),
    Corporation(u32),
    Alien,
    Federation,
    SpacePirates,
    RogueMercenaries,
    Abandoned,
    Unknown,
}

impl Owner {
    /// True for the fixed, non-player owners.
    pub fn is_special(self) -> bool {
        !matches!(self, Owner::Trader(_) | Owner::Corporation(_))
    }

    pub fn is_you(self) -> bool {
        matches!(self, Owner::Trader(id) if id.is_you())
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Trader(id) => write!(f, "{}", id),
            Owner::Corporation(number) => write!(f, "corp#{}", number),
            Owner::Alien => write!(f, "Alien"),
            Owner::Federation => write!(f, "The Federation"),
            Owner::SpacePirates => write!(f, "Space Pirates"),
            Owner::RogueMercenaries => write!(f, "Rogue Mercenaries"),
            Owner::Abandoned => write!(f, "Abandoned"),
            Owner::Unknown => write!(f, "Unknown"),
        }
    }
}
