//! Port trading classes and capacity reconstruction.
//!
//! Classes 1 through 8 are fully determined by which of the three products a
//! port sells. Class 0 is the special class of Sol-type sectors and class 9 is
//! the universe hub; neither can be derived from a buy/sell pattern.

use serde::{Deserialize, Serialize};

use super::Product;

/// Selling mask for classes 1..=8, indexed by `class - 1`.
const CLASS_TO_MASK: [u8; 8] = [4, 2, 1, 3, 5, 6, 7, 0];

/// Class for each selling mask.
const MASK_TO_CLASS: [u8; 8] = [8, 3, 2, 4, 1, 5, 6, 7];

/// Trading class reserved for the universe hub.
pub const HUB_CLASS: u8 = 9;

/// A port trading class in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradingClass(u8);

impl TradingClass {
    /// The hub class.
    pub const HUB: TradingClass = TradingClass(HUB_CLASS);

    /// Create a class from an explicit class digit.
    pub fn new(class: u8) -> Option<Self> {
        (class <= HUB_CLASS).then_some(Self(class))
    }

    /// Decode a selling mask. Bit `i` set means product `i` is sold.
    pub fn from_selling_mask(mask: u8) -> Self {
        Self(MASK_TO_CLASS[(mask & 0b111) as usize])
    }

    /// Decode per-product selling flags in report order.
    pub fn from_selling(selling: [bool; 3]) -> Self {
        let mask = Product::ALL
            .iter()
            .zip(selling)
            .filter(|(_, sells)| *sells)
            .fold(0, |mask, (product, _)| mask | product.bit());
        Self::from_selling_mask(mask)
    }

    /// Decode indicator characters, where `' '` or `'S'` marks a product the
    /// port sells and anything else (`'-'`, `'B'`) one it buys.
    pub fn from_indicators(indicators: [char; 3]) -> Self {
        Self::from_selling(indicators.map(|c| c == ' ' || c == 'S'))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_hub(self) -> bool {
        self.0 == HUB_CLASS
    }

    /// Selling mask for the derivable classes 1..=8.
    pub fn selling_mask(self) -> Option<u8> {
        match self.0 {
            1..=8 => Some(CLASS_TO_MASK[(self.0 - 1) as usize]),
            _ => None,
        }
    }

    pub fn sells(self, product: Product) -> bool {
        self.selling_mask()
            .is_some_and(|mask| mask & product.bit() != 0)
    }

    pub fn buys(self, product: Product) -> bool {
        self.selling_mask()
            .is_some_and(|mask| mask & product.bit() == 0)
    }

    /// Buy/sell pattern such as `BSB`, for the derivable classes.
    pub fn pattern(self) -> Option<String> {
        self.selling_mask().map(|_| {
            Product::ALL
                .iter()
                .map(|p| if self.sells(*p) { 'S' } else { 'B' })
                .collect()
        })
    }
}

impl std::fmt::Display for TradingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Class {}", self.0)
    }
}

/// True if a pair of ports can trade two products back and forth: each port
/// sells exactly one of the two and buys the other.
pub fn can_cross_trade(a: TradingClass, b: TradingClass, p1: Product, p2: Product) -> bool {
    if p1 == p2 {
        return false;
    }
    let (Some(ma), Some(mb)) = (a.selling_mask(), b.selling_mask()) else {
        return false;
    };
    let mask = p1.bit() | p2.bit();
    let (sa, sb) = (ma & mask, mb & mask);
    sa != 0 && sb != 0 && (sa ^ sb) == mask
}

/// True if a pair of ports have complementary patterns across all three
/// products.
pub fn can_triple_trade(a: TradingClass, b: TradingClass) -> bool {
    match (a.selling_mask(), b.selling_mask()) {
        (Some(ma), Some(mb)) => ma != 0 && mb != 0 && (ma ^ mb) == 0b111,
        _ => false,
    }
}

/// Reconstruct a port's product capacity from one observation.
///
/// `level` is the signed quantity on hand (negative while the port buys),
/// `percent` the displayed fill percentage and `known` the capacity recorded
/// so far (0 if none). Returns the capacity to store, or `None` when the
/// recorded value must stay.
///
/// The outward rounding to a multiple of ten mirrors how the game truncates
/// when it renders percentages, and must be kept exactly as is.
pub fn infer_capacity(level: i32, percent: i32, known: i32) -> Option<i32> {
    if level == 0 || !(0..=100).contains(&percent) {
        return None;
    }

    let candidate = if percent == 100 {
        level
    } else if known != 0 && displayed_percent(level, known) == percent {
        return None;
    } else {
        let raw = level * 100 / (percent + 1);
        if level > 0 {
            raw + 10 - raw % 10
        } else {
            raw - (10 + raw % 10)
        }
    };

    (candidate.unsigned_abs() > known.unsigned_abs()).then_some(candidate)
}

/// Percentage the game would show for `level` against `capacity`.
fn displayed_percent(level: i32, capacity: i32) -> i32 {
    let capacity = i64::from(capacity.unsigned_abs());
    if capacity == 0 {
        return 0;
    }
    (i64::from(level.unsigned_abs()) * 100 / capacity) as i32
}
