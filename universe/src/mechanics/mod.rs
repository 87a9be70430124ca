//! Game mechanics: commodities, cargo slots, fighter modes and the rules
//! used to decode port reports.

mod trading;

pub use trading::*;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UniverseError};

/// The three commodities traded at ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Product {
    FuelOre,
    Organics,
    Equipment,
}

impl Product {
    /// All products in report order.
    pub const ALL: [Product; 3] = [Product::FuelOre, Product::Organics, Product::Equipment];

    /// Position of this product in per-product arrays.
    pub fn index(self) -> usize {
        match self {
            Product::FuelOre => 0,
            Product::Organics => 1,
            Product::Equipment => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(UniverseError::InvalidProduct(index))
    }

    /// Decode the initial letter the game uses for a product (`F`, `O`, `E`).
    pub fn from_initial(initial: char) -> Option<Self> {
        match initial.to_ascii_uppercase() {
            'F' => Some(Product::FuelOre),
            'O' => Some(Product::Organics),
            'E' => Some(Product::Equipment),
            _ => None,
        }
    }

    /// Bit for this product in a selling mask. Fuel ore is the low bit.
    pub fn bit(self) -> u8 {
        1 << self.index()
    }

    pub fn name(self) -> &'static str {
        match self {
            Product::FuelOre => "Fuel Ore",
            Product::Organics => "Organics",
            Product::Equipment => "Equipment",
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Cargo hold contents. Colonists occupy holds but are never port-traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cargo {
    FuelOre,
    Organics,
    Equipment,
    Colonists,
}

impl Cargo {
    pub const ALL: [Cargo; 4] = [
        Cargo::FuelOre,
        Cargo::Organics,
        Cargo::Equipment,
        Cargo::Colonists,
    ];

    pub fn index(self) -> usize {
        match self {
            Cargo::FuelOre => 0,
            Cargo::Organics => 1,
            Cargo::Equipment => 2,
            Cargo::Colonists => 3,
        }
    }
}

impl From<Product> for Cargo {
    fn from(product: Product) -> Self {
        match product {
            Product::FuelOre => Cargo::FuelOre,
            Product::Organics => Cargo::Organics,
            Product::Equipment => Cargo::Equipment,
        }
    }
}

/// Deployment mode of sector fighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FighterMode {
    Defensive,
    Offensive,
    Toll,
    #[default]
    Unknown,
}

impl FighterMode {
    /// Decode the mode letter shown after a fighter count.
    pub fn from_code(code: char) -> Self {
        match code {
            'D' => FighterMode::Defensive,
            'O' => FighterMode::Offensive,
            'T' => FighterMode::Toll,
            _ => FighterMode::Unknown,
        }
    }
}

/// Trading availability of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortStatus {
    Available,
    UnderConstruction,
    Destroyed,
    /// Missing from the latest bulk report, so temporarily untradeable.
    Blocked,
}

/// Three-valued flag for ship type capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Ternary {
    Yes,
    No,
    #[default]
    Unknown,
}

impl From<bool> for Ternary {
    fn from(value: bool) -> Self {
        if value {
            Ternary::Yes
        } else {
            Ternary::No
        }
    }
}

/// Long range scanner fitted to a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScannerKind {
    #[default]
    None,
    Density,
    Holographic,
}

/// Chat channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    FedComm,
    SubspaceRadio,
    PrivateHail,
}

impl MessageKind {
    /// Decode the channel letter of a compact chat line (`F`, `R`, `P`).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'F' => Some(MessageKind::FedComm),
            'R' => Some(MessageKind::SubspaceRadio),
            'P' => Some(MessageKind::PrivateHail),
            _ => None,
        }
    }
}
