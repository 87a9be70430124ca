//! Reconciler - applies tokenized game output to the universe model.
//!
//! The reconciler runs on a single thread and sees one fragment at a time:
//! 1. **Scan**: pull typed values out of the fragment text
//! 2. **Correlate**: combine them with context left by earlier fragments
//! 3. **Apply**: write the change to the universe only if it differs
//! 4. **Notify**: publish state changes and raise automation events
//!
//! A fragment that cannot be scanned is logged and dropped. An integrity
//! fault halts the reconciler for the rest of the model session.

mod comms;
mod info;
mod sector;
mod session;
mod trade;

use std::sync::Arc;

use tracing::{debug, error, warn};
use universe::{Cargo, StateChange, Universe, You};

use crate::config::ReconcilerConfig;
use crate::context::ParseContext;
use crate::error::{ReconcileError, Result, ScanError};
use crate::events::{AutomationEvent, EventBus};
use crate::fragment::FragmentKind;
use crate::ranks::RankResolver;
use crate::scan;

/// Outbound writes to the game connection.
pub trait Transport: Send {
    fn write(&mut self, text: &str) -> std::io::Result<()>;
}

/// States the reconciler can send the tokenizer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    Initial,
    CorrectGame,
    /// Ignore game data until the right game is entered.
    WrongGame,
}

/// Control surface of the tokenizer feeding the reconciler.
pub trait TokenizerControl: Send {
    fn redirect(&mut self, state: TokenizerState);
}

/// Applies fragments to one universe model.
pub struct Reconciler {
    universe: Arc<Universe>,
    config: ReconcilerConfig,
    ranks: RankResolver,
    context: ParseContext,
    events: Arc<EventBus>,
    transport: Option<Box<dyn Transport>>,
    tokenizer: Option<Box<dyn TokenizerControl>>,
    halted: bool,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("model", &self.universe.id())
            .field("config", &self.config)
            .field("context", &self.context)
            .field("halted", &self.halted)
            .finish()
    }
}

impl Reconciler {
    pub fn new(universe: Arc<Universe>, config: ReconcilerConfig) -> Self {
        Self {
            universe,
            ranks: RankResolver::with_extra(&config.extra_ranks),
            config,
            context: ParseContext::default(),
            events: Arc::new(EventBus::new()),
            transport: None,
            tokenizer: None,
            halted: false,
        }
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl TokenizerControl + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    pub fn universe(&self) -> &Arc<Universe> {
        &self.universe
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Automation event listeners.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn ranks_mut(&mut self) -> &mut RankResolver {
        &mut self.ranks
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Forget everything carried between fragments, as after reconnecting,
    /// and send the tokenizer back to its initial state. A halted reconciler
    /// stays halted.
    pub fn reset(&mut self) {
        self.context.reset();
        self.redirect(TokenizerState::Initial);
    }

    /// Apply the fragment `source[offset..offset + len]`.
    ///
    /// Errors other than [`ReconcileError::is_fatal`] ones drop the fragment
    /// and leave the reconciler ready for the next.
    pub fn handle(
        &mut self,
        kind: FragmentKind,
        source: &str,
        offset: usize,
        len: usize,
    ) -> Result<()> {
        if self.halted {
            return Err(ReconcileError::Halted);
        }
        let result = scan::fragment(source, offset, len)
            .map_err(ReconcileError::from)
            .and_then(|text| {
                if self.config.debug_fragments {
                    debug!(?kind, text = %text.escape_debug(), "fragment");
                }
                self.apply(kind, text)
            });
        if let Err(err) = &result {
            if err.is_fatal() {
                self.halt(err);
            } else {
                warn!(?kind, error = %err, "fragment dropped");
            }
        }
        result
    }

    fn apply(&mut self, kind: FragmentKind, text: &str) -> Result<()> {
        use FragmentKind as K;
        match kind {
            K::PausePrompt => self.emit(AutomationEvent::PausePrompt),
            K::NamePrompt => self.emit(AutomationEvent::NamePrompt),
            K::PasswordPrompt => self.emit(AutomationEvent::PasswordPrompt),
            K::InvalidPassword => self.emit(AutomationEvent::InvalidPassword),
            K::AnsiPrompt | K::IncludeTimestampPrompt => self.answer_yes(),
            K::GameSelected => self.game_selected(text)?,
            K::GamePrompt => self.game_prompt(),
            K::GameStat => self.game_stat(text)?,
            K::EndStats => self.end_stats()?,
            K::CreateTraderPrompt => self.emit(AutomationEvent::CreateTraderPrompt),
            K::UseAliasPrompt => self.emit(AutomationEvent::UseAliasPrompt),
            K::ShowLogPrompt => self.emit(AutomationEvent::ShowLogPrompt),
            K::DeathDelayLockout => self.emit(AutomationEvent::DeathDelayLockout {
                wait: scan::find_integer(text).ok(),
            }),
            K::PermanentLockout => self.emit(AutomationEvent::PermanentLockout),
            K::AccessModeLockout => self.emit(AutomationEvent::AccessModeLockout),
            K::LoginTurns => self.set_turns(narrow(scan::find_integer(text)?)?),
            K::InactivityWarning => self.emit(AutomationEvent::InactivityWarning),

            K::CommandPrompt => self.command_prompt(text)?,
            K::ComputerPrompt => self.computer_prompt(text)?,
            K::PlanetPrompt | K::CitadelPrompt | K::StardockPrompt => self.major_prompt(kind),
            K::LeavingMajorPrompt => self.context.prompt = None,

            K::AvoidSet => self.avoid(text, true)?,
            K::AvoidCleared => self.avoid(text, false)?,
            K::AllAvoidsCleared => {
                self.universe.clear_avoids();
            }
            K::AvoidsList => self.avoids_list(text)?,
            K::ClearAvoidsPrompt => self.emit(AutomationEvent::ClearAvoidsPrompt),

            K::CimPrompt => self.emit(AutomationEvent::CimPrompt),
            K::CimPortLine => self.cim_port_line(text)?,
            K::CimSectorLine => self.cim_sector_line(text)?,
            K::CoursePlot => self.course_plot(text)?,
            K::DensityScan => self.density_scan(text)?,

            K::ProbeEnteringSector => self.probe_entering_sector(text)?,
            K::ProbeSelfDestructs => self.emit(AutomationEvent::ProbeSelfDestructs {
                sector: self.context.sector,
            }),
            K::ProbeDestroyed => self.emit(AutomationEvent::ProbeDestroyed {
                sector: self.context.sector,
            }),

            K::SectorHeader => self.sector_header(text)?,
            K::NebulaName => self.nebula_name(text)?,
            K::SectorPort => self.sector_port(text)?,
            K::PortUnderConstruction => {
                self.port_status(universe::PortStatus::UnderConstruction)?
            }
            K::PortDestroyed => self.port_status(universe::PortStatus::Destroyed)?,
            K::SectorFighters(owner) => self.sector_fighters(owner, text)?,
            K::SectorWarps => self.sector_warps(text)?,

            K::WarpTarget => self.warp_target(text)?,
            K::MkeyWarpTarget => self.mkey_warp_target(text)?,
            K::TranswarpTarget => self.transwarp_target(text)?,
            K::TranswarpEngaged => self.transwarp_engaged(),
            K::CancelWarp | K::CancelTranswarp => self.context.move_intent = None,
            K::Interdicted => {
                self.context.move_intent = None;
                self.emit(AutomationEvent::Interdicted);
            }
            K::NoRoutePrompt => self.no_route_prompt(text)?,

            K::PlanetTrading => self.start_trading(true),
            K::ShipTrading => self.start_trading(false),
            K::TradeInitPrompt => self.trade_init_prompt(text),
            K::TradeUnits => self.trade_units(text)?,
            K::FinalOffer => {
                self.context.trade.final_offer = true;
                self.emit(AutomationEvent::FinalOffer);
            }
            K::TradeOfferPrompt => self.trade_offer_prompt(text)?,
            K::TradeAccepted => self.trade_accepted(),
            K::TradeRejected => self.emit(AutomationEvent::TradeRejected),
            K::Credits => self.credits(text)?,
            K::PsychicProbeReport => self.emit(AutomationEvent::PsychicProbeReport {
                percent: scan::find_decimal(text)?,
            }),
            K::PortCredits => self.port_credits(text)?,

            K::PortInArbitrarySector => self.port_in_arbitrary_sector(text)?,
            K::PortInCurrentSector => self.port_in_current_sector()?,
            K::PortReportHeader => self.port_report_header(text)?,
            K::PortReportLine => self.port_report_line(text)?,

            K::InfoTraderName => self.info_trader_name(text)?,
            K::InfoXpAlign => self.info_xp_align(text)?,
            K::InfoTimesBlownUp => self.info_times_blown_up(text)?,
            K::InfoCorp => self.info_corp(text)?,
            K::InfoShipName => self.info_ship_name(text)?,
            K::InfoShipType => self.info_ship_type(text)?,
            K::InfoShipDate => self.info_ship_date(text)?,
            K::InfoTurns => self.set_turns(narrow(scan::last_integer(text)?)?),
            K::InfoTurnsPerWarp => self.info_turns_per_warp(text)?,
            K::InfoHolds => self.set_holds(narrow(scan::last_integer(text)?)?),
            K::InfoCargo(cargo) => self.set_cargo(cargo, narrow(scan::last_integer(text)?)?),
            K::InfoFighters => self.set_fighters(narrow(scan::last_integer(text)?)?),
            K::InfoShields => self.set_shields(narrow(scan::last_integer(text)?)?),
            K::InfoEquipment(equipment) => {
                self.set_equipment(equipment, narrow(scan::last_integer(text)?)?)
            }
            K::InfoCredits => self.set_credits(scan::last_integer(text)?),
            K::InfoPsychicProbe => self.ship_flags(|d| d.psychic_probe = true),
            K::InfoPlanetScanner => self.ship_flags(|d| d.planet_scan = true),
            K::InfoLongRangeScanner => self.info_long_range_scanner(text),
            K::InfoTranswarp(level) => self.info_transwarp(level),
            K::InfoInterdictor => {
                let on = scan::last_char(text) == Some('Y');
                self.ship_flags(|d| d.interdictor_on = on);
            }

            K::QuickTurns => self.set_turns(narrow(scan::find_integer(text)?)?),
            K::QuickCredits => self.set_credits(scan::find_integer(text)?),
            K::QuickFighters => self.set_fighters(narrow(scan::find_integer(text)?)?),
            K::QuickShields => self.set_shields(narrow(scan::find_integer(text)?)?),
            K::QuickHolds => self.set_holds(narrow(scan::find_integer(text)?)?),
            K::QuickCargo(cargo) => self.set_cargo(cargo, narrow(scan::find_integer(text)?)?),
            K::QuickEquipment(equipment) => {
                self.set_equipment(equipment, narrow(scan::find_integer(text)?)?)
            }
            K::QuickPsychicProbe => {
                let yes = scan::last_char(text) == Some('Y');
                self.ship_flags(|d| d.psychic_probe = yes);
            }
            K::QuickPlanetScanner => {
                let yes = scan::last_char(text) == Some('Y');
                self.ship_flags(|d| d.planet_scan = yes);
            }
            K::QuickLongRangeScanner => self.quick_long_range_scanner(text),
            K::QuickTranswarp => self.quick_transwarp(text)?,
            K::QuickAlign => self.set_align(narrow(scan::find_integer(text)?)?),
            K::QuickXp => self.set_xp(narrow(scan::find_integer(text)?)?),
            K::QuickCorp => self.join_corporation(positive_number(text)?),
            K::QuickShipNumber => self.quick_ship_number(text)?,
            K::QuickSector => {
                let sector = self.sector_number(scan::find_integer(text)?)?;
                self.set_ship_sector(sector);
            }

            K::CommCompact => self.comm_compact(text)?,
            K::CommLong => self.comm_long(text)?,
            K::HailHeader => self.hail_header(text)?,
        }
        Ok(())
    }

    fn halt(&mut self, err: &ReconcileError) {
        error!(error = %err, model = %self.universe.id(), "integrity fault, parsing halted");
        self.halted = true;
        self.redirect(TokenizerState::WrongGame);
        self.emit(AutomationEvent::SessionHalted {
            reason: err.to_string(),
        });
    }

    // collaborators

    fn emit(&self, event: AutomationEvent) {
        debug!(event = event.name(), "automation event");
        self.events.emit(&event);
    }

    fn write(&mut self, text: &str) {
        if let Some(transport) = self.transport.as_mut() {
            if let Err(err) = transport.write(text) {
                warn!(error = %err, "write to game failed");
            }
        }
    }

    fn redirect(&mut self, state: TokenizerState) {
        if let Some(tokenizer) = self.tokenizer.as_mut() {
            tokenizer.redirect(state);
        }
    }

    // shared helpers

    fn you(&self) -> &You {
        self.universe.you()
    }

    fn publish(&self, change: StateChange) {
        self.universe.publish(change);
    }

    /// A scanned sector number, checked against the universe size.
    fn sector_number(&self, value: i64) -> Result<u32> {
        let number = u32::try_from(value).map_err(|_| ScanError::Malformed {
            what: "sector number",
            text: value.to_string(),
        })?;
        self.universe.sector(number)?;
        Ok(number)
    }

    fn current_sector(&self) -> Result<u32> {
        self.context
            .sector
            .ok_or(ReconcileError::MissingContext("sector display"))
    }

    fn set_ship_sector(&self, sector: u32) {
        if let Some(previous) = self.you().set_sector(sector) {
            self.publish(StateChange::ShipSector {
                previous,
                current: sector,
            });
        }
    }

    fn set_turns(&self, turns: i32) {
        if let Some(previous) = self.you().set_turns(turns) {
            self.publish(StateChange::YouTurns {
                previous,
                current: turns,
            });
        }
    }

    fn set_credits(&self, credits: i64) {
        if let Some(previous) = self.you().set_credits(credits) {
            self.publish(StateChange::YouCredits {
                previous,
                current: credits,
            });
        }
    }

    fn set_xp(&self, xp: i32) {
        if let Some(previous) = self.you().trader().set_xp(xp) {
            self.publish(StateChange::YouXp {
                previous,
                current: xp,
            });
        }
    }

    fn set_align(&self, align: i32) {
        if let Some(previous) = self.you().trader().set_align(align) {
            self.publish(StateChange::YouAlign {
                previous,
                current: align,
            });
        }
    }

    fn set_cargo(&self, cargo: Cargo, quantity: i32) {
        if let Some(previous) = self.you().ship().set_cargo(cargo, quantity) {
            self.publish(StateChange::ShipCargo {
                cargo,
                previous,
                current: quantity,
            });
        }
    }

    fn set_holds(&self, holds: i32) {
        if let Some(previous) = self.you().ship().set_holds(holds) {
            self.publish(StateChange::ShipHolds {
                previous,
                current: holds,
            });
        }
    }

    fn set_fighters(&self, fighters: i32) {
        if let Some(previous) = self.you().ship().set_fighters(fighters) {
            self.publish(StateChange::ShipFighters {
                previous,
                current: fighters,
            });
        }
    }

    fn set_shields(&self, shields: i32) {
        if let Some(previous) = self.you().ship().set_shields(shields) {
            self.publish(StateChange::ShipShields {
                previous,
                current: shields,
            });
        }
    }

    fn ship_flags(&self, update: impl FnOnce(&mut universe::ShipDetails)) {
        self.you().ship().with_details(update);
    }
}

/// The first integer of `text`, which must not be negative.
fn positive_number(text: &str) -> Result<u32> {
    let value = scan::find_integer(text)?;
    u32::try_from(value).map_err(|_| {
        ReconcileError::from(ScanError::Malformed {
            what: "number",
            text: text.to_string(),
        })
    })
}

/// Narrow a scanned value to a count field.
fn narrow(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        ReconcileError::from(ScanError::Malformed {
            what: "count",
            text: value.to_string(),
        })
    })
}
