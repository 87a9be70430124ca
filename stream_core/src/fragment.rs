//! The fragment vocabulary shared with the tokenizer.
//!
//! Each kind names one pattern the tokenizer recognizes in game output. The
//! examples in the variant docs show the visible text of a fragment with
//! its color codes removed.

use universe::{Cargo, ShipDetails};

/// Countable equipment shown on the info screen and the quick stats line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equipment {
    Photons,
    Beacons,
    Probes,
    Armids,
    Limpets,
    Disruptors,
    GenesisTorpedoes,
    Atomics,
    Cloaks,
    Corbomite,
}

impl Equipment {
    pub fn set(self, details: &mut ShipDetails, count: i32) {
        let slot = match self {
            Equipment::Photons => &mut details.photons,
            Equipment::Beacons => &mut details.beacons,
            Equipment::Probes => &mut details.probes,
            Equipment::Armids => &mut details.armids,
            Equipment::Limpets => &mut details.limpets,
            Equipment::Disruptors => &mut details.disruptors,
            Equipment::GenesisTorpedoes => &mut details.genesis_torpedoes,
            Equipment::Atomics => &mut details.atomics,
            Equipment::Cloaks => &mut details.cloaks,
            Equipment::Corbomite => &mut details.corbomite,
        };
        *slot = count;
    }

    pub fn get(self, details: &ShipDetails) -> i32 {
        match self {
            Equipment::Photons => details.photons,
            Equipment::Beacons => details.beacons,
            Equipment::Probes => details.probes,
            Equipment::Armids => details.armids,
            Equipment::Limpets => details.limpets,
            Equipment::Disruptors => details.disruptors,
            Equipment::GenesisTorpedoes => details.genesis_torpedoes,
            Equipment::Atomics => details.atomics,
            Equipment::Cloaks => details.cloaks,
            Equipment::Corbomite => details.corbomite,
        }
    }
}

/// Whose fighters a sector display lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FighterOwnerClass {
    Yours,
    YourCorp,
    /// Another trader, not named in the display.
    Other,
    /// A corporation; the display carries its number.
    Corp,
    Pirate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    // login
    PausePrompt,
    NamePrompt,
    PasswordPrompt,
    InvalidPassword,
    AnsiPrompt,
    /// Starts with the letter of the game chosen at the menu.
    GameSelected,
    GamePrompt,
    /// `Sectors=5000`, one per line of the stats listing.
    GameStat,
    EndStats,
    CreateTraderPrompt,
    UseAliasPrompt,
    ShowLogPrompt,
    IncludeTimestampPrompt,
    DeathDelayLockout,
    PermanentLockout,
    AccessModeLockout,
    /// `You have 248 turns this game.`
    LoginTurns,
    InactivityWarning,

    // major prompts
    /// `Command [TL=00:12:34]:[1234] (?=Help)? :`
    CommandPrompt,
    /// `Computer command [TL=00:12:34]:[1234] (?=Help)?`
    ComputerPrompt,
    PlanetPrompt,
    CitadelPrompt,
    StardockPrompt,
    LeavingMajorPrompt,

    // avoids
    AvoidSet,
    AvoidCleared,
    AllAvoidsCleared,
    /// A line of the avoided sector list.
    AvoidsList,
    ClearAvoidsPrompt,

    // bulk reports
    CimPrompt,
    /// ` 123 - 2510 100%   1200  60% - 300  10%`
    CimPortLine,
    /// ` 123    45   678  9012`
    CimSectorLine,
    /// `1 > 2 > (4) > 5`
    CoursePlot,
    /// `Sector  ( 1234) ==>    100  Warps : 3    NavHaz :     0%    Anom : No`
    DensityScan,

    // probes
    ProbeEnteringSector,
    ProbeSelfDestructs,
    ProbeDestroyed,

    // sector display
    /// `Sector  : 1234 in uncharted space.`
    SectorHeader,
    /// `Nebulae : The Crab.`
    NebulaName,
    /// `Ports   : Aldebaran, Class 3`
    SectorPort,
    PortUnderConstruction,
    PortDestroyed,
    /// `Fighters: 1,000 (yours) [Defensive]`
    SectorFighters(FighterOwnerClass),
    /// `Warps to Sector(s) :  2 - (3) - 4`
    SectorWarps,

    // movement
    /// `Warping to Sector 1234`
    WarpTarget,
    /// The move prompt with the typed target, backspaces included.
    MkeyWarpTarget,
    /// `Sector 1234 is 5 hops away`
    TranswarpTarget,
    TranswarpEngaged,
    CancelWarp,
    CancelTranswarp,
    Interdicted,
    /// `No route within 25 warps from sector 1 to sector 2`
    NoRoutePrompt,

    // trading
    PlanetTrading,
    ShipTrading,
    /// `How many holds of Fuel Ore do you want to buy`
    TradeInitPrompt,
    /// `Agreed, 20 units.`
    TradeUnits,
    FinalOffer,
    /// `Your offer [1,234] ?`
    TradeOfferPrompt,
    TradeAccepted,
    TradeRejected,
    /// `You have 12,345 credits and 20 empty cargo holds.`
    Credits,
    /// `Your Psychic Probe reports the offer is 93.12% of best price`
    PsychicProbeReport,
    /// Credits held by the port in the current sector.
    PortCredits,

    // port reports
    /// `What sector is the port in? [1234] 567`
    PortInArbitrarySector,
    PortInCurrentSector,
    /// `Commerce report for Aldebaran: ...`
    PortReportHeader,
    /// `Fuel Ore   Selling   2510    100`
    PortReportLine,

    // info screen
    InfoTraderName,
    /// `Rank and Exp   : 1,000 points, Alignment=-250`
    InfoXpAlign,
    InfoTimesBlownUp,
    /// `Corp           # 5, The Firm`
    InfoCorp,
    InfoShipName,
    /// Manufacturer and model, then the ported and kills counts.
    InfoShipType,
    InfoShipDate,
    InfoTurns,
    InfoTurnsPerWarp,
    InfoHolds,
    InfoCargo(Cargo),
    InfoFighters,
    InfoShields,
    InfoEquipment(Equipment),
    InfoCredits,
    InfoPsychicProbe,
    InfoPlanetScanner,
    InfoLongRangeScanner,
    /// Type 1 (`1`) or type 2 (`2`) transwarp range line.
    InfoTranswarp(u8),
    InfoInterdictor,

    // quick stats
    QuickTurns,
    QuickCredits,
    QuickFighters,
    QuickShields,
    QuickHolds,
    QuickCargo(Cargo),
    QuickEquipment(Equipment),
    QuickPsychicProbe,
    QuickPlanetScanner,
    QuickLongRangeScanner,
    QuickTranswarp,
    QuickAlign,
    QuickXp,
    QuickCorp,
    QuickShipNumber,
    QuickSector,

    // communications
    /// Compact chat line: `F Rook hello`.
    CommCompact,
    /// `Incoming transmission from Rook on Federation comm-link:` and the message.
    CommLong,
    /// `Rook is hailing you!`
    HailHeader,
}
