//! Splitting a displayed "rank name" into its rank title and trader name.

use std::collections::BTreeSet;

const BUILTIN_RANKS: &[&str] = &[
    "Private",
    "Private 1st Class",
    "Lance Corporal",
    "Corporal",
    "Sergeant",
    "Staff Sergeant",
    "Gunnery Sergeant",
    "1st Sergeant",
    "Sergeant Major",
    "Warrant Officer",
    "Chief Warrant Officer",
    "Ensign",
    "Lieutenant J.G.",
    "Lieutenant",
    "Lieutenant Commander",
    "Commander",
    "Captain",
    "Commodore",
    "Rear Admiral",
    "Vice Admiral",
    "Admiral",
    "Fleet Admiral",
    "Nuisance 3rd Class",
    "Nuisance 2nd Class",
    "Nuisance 1st Class",
    "Menace 3rd Class",
    "Menace 2nd Class",
    "Menace 1st Class",
    "Smuggler 3rd Class",
    "Smuggler 2nd Class",
    "Smuggler 1st Class",
    "Smuggler Savant",
    "Robber",
    "Terrorist",
    "Pirate",
    "Infamous Pirate",
    "Notorious Pirate",
    "Dread Pirate",
    "Galactic Scourge",
    "Enemy of the State",
    "Enemy of the People",
    "Enemy of Humankind",
    "Heinous Overlord",
    "Prime Evil",
    "Servant",
    "Capitalist",
    "Trader",
    "Entrepreneur",
    "Merchant Apprentice",
    "Merchant",
    "Executive Merchant",
    "Merchant Baron",
    "Merchant Prince",
    "Grand Merchant",
    "Financier",
    "Tycoon",
    "Mogul",
    "Supreme Mogul",
];

/// Known rank titles.
#[derive(Debug, Clone)]
pub struct RankResolver {
    ranks: BTreeSet<String>,
}

impl Default for RankResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RankResolver {
    pub fn new() -> Self {
        Self {
            ranks: BUILTIN_RANKS.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn with_extra(extra: &[String]) -> Self {
        let mut resolver = Self::new();
        for rank in extra {
            resolver.add_rank(rank);
        }
        resolver
    }

    pub fn add_rank(&mut self, rank: &str) -> bool {
        self.ranks.insert(rank.to_string())
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Split `rank_name` into `(rank, name)`. The longest known rank that
    /// prefixes the text and is followed by a space wins; without one the
    /// whole text is the name.
    pub fn resolve(&self, rank_name: &str) -> (Option<String>, String) {
        let rank_name = rank_name.trim();
        let rank = self
            .ranks
            .iter()
            .filter(|rank| {
                rank_name
                    .strip_prefix(rank.as_str())
                    .is_some_and(|rest| rest.starts_with(' '))
            })
            .max_by_key(|rank| rank.len());
        match rank {
            Some(rank) => (
                Some(rank.clone()),
                rank_name[rank.len() + 1..].trim().to_string(),
            ),
            None => (None, rank_name.to_string()),
        }
    }
}
