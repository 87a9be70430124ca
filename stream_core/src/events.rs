//! Automation events, the named signals the reconciler raises for scripts
//! and other automation.

use serde::{Deserialize, Serialize};
use universe::{Listeners, MessageKind, Product, TraderId};

/// The major game prompts. The current one decides how an ambiguous
/// follow-up fragment is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorPrompt {
    Command,
    Computer,
    Planet,
    Citadel,
    CitadelComputer,
    Stardock,
}

/// Serialized with the variant name as `event` so script hosts can
/// dispatch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AutomationEvent {
    // login
    PausePrompt,
    NamePrompt,
    PasswordPrompt,
    InvalidPassword,
    GamePrompt,
    /// The game selected does not match the model. Parsing is redirected
    /// until the right game is entered.
    WrongGame {
        selected: char,
        expected: char,
    },
    CreateTraderPrompt,
    UseAliasPrompt,
    ShowLogPrompt,
    DeathDelayLockout {
        /// Wait reported by the game, usually in hours.
        wait: Option<i64>,
    },
    PermanentLockout,
    AccessModeLockout,
    InactivityWarning,

    // prompts
    /// A major prompt. `clock` is the game time in seconds since midnight and
    /// `sector` the current sector, when the prompt shows them.
    Prompt {
        prompt: MajorPrompt,
        clock: Option<u32>,
        sector: Option<u32>,
    },
    ClearAvoidsPrompt,
    CimPrompt,
    CoursePlot {
        course: Vec<u32>,
    },
    NoRoutePrompt {
        from: u32,
        to: u32,
    },
    Interdicted,

    // trading
    PlanetTrading,
    ShipTrading,
    TradeInitPrompt {
        product: Option<Product>,
        buying: bool,
    },
    TradingUnits {
        units: i32,
    },
    FinalOffer,
    TradeOfferPrompt {
        offer: i64,
    },
    TradeAccepted,
    TradeRejected,
    Credits {
        credits: i64,
    },
    PsychicProbeReport {
        percent: f64,
    },
    PortUpgraded {
        sector: u32,
        product: Product,
        increase: i32,
    },

    // probes
    ProbeSelfDestructs {
        sector: Option<u32>,
    },
    ProbeDestroyed {
        sector: Option<u32>,
    },

    ChatMessage {
        kind: MessageKind,
        sender: TraderId,
        name: String,
        message: String,
    },

    /// Parsing stopped after an integrity fault.
    SessionHalted {
        reason: String,
    },
}

impl AutomationEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            AutomationEvent::PausePrompt => "pause_prompt",
            AutomationEvent::NamePrompt => "name_prompt",
            AutomationEvent::PasswordPrompt => "password_prompt",
            AutomationEvent::InvalidPassword => "invalid_password",
            AutomationEvent::GamePrompt => "game_prompt",
            AutomationEvent::WrongGame { .. } => "wrong_game",
            AutomationEvent::CreateTraderPrompt => "create_trader_prompt",
            AutomationEvent::UseAliasPrompt => "use_alias_prompt",
            AutomationEvent::ShowLogPrompt => "show_log_prompt",
            AutomationEvent::DeathDelayLockout { .. } => "death_delay_lockout",
            AutomationEvent::PermanentLockout => "permanent_lockout",
            AutomationEvent::AccessModeLockout => "access_mode_lockout",
            AutomationEvent::InactivityWarning => "inactivity_warning",
            AutomationEvent::Prompt { .. } => "prompt",
            AutomationEvent::ClearAvoidsPrompt => "clear_avoids_prompt",
            AutomationEvent::CimPrompt => "cim_prompt",
            AutomationEvent::CoursePlot { .. } => "course_plot",
            AutomationEvent::NoRoutePrompt { .. } => "no_route_prompt",
            AutomationEvent::Interdicted => "interdicted",
            AutomationEvent::PlanetTrading => "planet_trading",
            AutomationEvent::ShipTrading => "ship_trading",
            AutomationEvent::TradeInitPrompt { .. } => "trade_init_prompt",
            AutomationEvent::TradingUnits { .. } => "trading_units",
            AutomationEvent::FinalOffer => "final_offer",
            AutomationEvent::TradeOfferPrompt { .. } => "trade_offer_prompt",
            AutomationEvent::TradeAccepted => "trade_accepted",
            AutomationEvent::TradeRejected => "trade_rejected",
            AutomationEvent::Credits { .. } => "credits",
            AutomationEvent::PsychicProbeReport { .. } => "psychic_probe_report",
            AutomationEvent::PortUpgraded { .. } => "port_upgraded",
            AutomationEvent::ProbeSelfDestructs { .. } => "probe_self_destructs",
            AutomationEvent::ProbeDestroyed { .. } => "probe_destroyed",
            AutomationEvent::ChatMessage { .. } => "chat_message",
            AutomationEvent::SessionHalted { .. } => "session_halted",
        }
    }
}

/// Listeners for automation events.
pub type EventBus = Listeners<AutomationEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_tagged() {
        let event = AutomationEvent::TradeInitPrompt {
            product: Some(Product::Equipment),
            buying: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "TradeInitPrompt");
        assert_eq!(json["product"], "Equipment");
        assert_eq!(json["buying"], true);

        let unit = serde_json::to_string(&AutomationEvent::FinalOffer).unwrap();
        assert_eq!(unit, r#"{"event":"FinalOffer"}"#);
        assert_eq!(event.name(), "trade_init_prompt");
    }
}
