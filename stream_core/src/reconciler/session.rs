//! Login, game statistics, major prompts and avoids.

use tracing::{info, warn};

use super::{Reconciler, TokenizerState};
use crate::error::{ReconcileError, Result, ScanError};
use crate::events::{AutomationEvent, MajorPrompt};
use crate::fragment::FragmentKind;
use crate::scan;

impl Reconciler {
    pub(super) fn answer_yes(&mut self) {
        if self.config.auto_answer_prompts {
            self.write("Y");
        }
    }

    pub(super) fn game_selected(&mut self, text: &str) -> Result<()> {
        let plain = scan::strip_ansi(text);
        let selected = plain
            .trim_start()
            .chars()
            .next()
            .ok_or_else(|| ScanError::NoPrintable(plain.clone()))?;
        if self.config.is_game(selected) {
            info!(game = %selected, "entered correct game");
            self.redirect(TokenizerState::CorrectGame);
        } else {
            let expected = self.config.game_letter;
            warn!(game = %selected, expected = %expected, "entered wrong game");
            self.redirect(TokenizerState::WrongGame);
            self.emit(AutomationEvent::WrongGame { selected, expected });
        }
        Ok(())
    }

    /// Request the stats listing the first time the game menu is seen.
    pub(super) fn game_prompt(&mut self) {
        if !self.context.stats_requested && self.config.auto_answer_prompts {
            self.context.stats_requested = true;
            self.write("*\r\n");
        } else {
            self.emit(AutomationEvent::GamePrompt);
        }
    }

    pub(super) fn game_stat(&mut self, text: &str) -> Result<()> {
        let line = scan::strip_ansi(text);
        let line = line.trim_start_matches(['\r', '\n']);
        let (key, value) = line.split_once('=').ok_or_else(|| ScanError::Malformed {
            what: "game stat",
            text: line.to_string(),
        })?;
        self.context
            .stats
            .insert(key.trim().to_string(), value.trim_end().to_string());
        Ok(())
    }

    /// Merge the collected stats and size the universe if this is the first
    /// listing.
    pub(super) fn end_stats(&mut self) -> Result<()> {
        let collected = std::mem::take(&mut self.context.stats);
        self.universe.stats().merge(collected)?;
        if !self.universe.is_initialized() {
            let size = self
                .universe
                .stats()
                .sectors()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(ReconcileError::MissingContext("sector count"))?;
            self.universe.initialize(size);
        }
        self.redirect(TokenizerState::CorrectGame);
        Ok(())
    }

    /// `[hours, minutes, seconds, sector]` from a timed prompt.
    fn timed_prompt(&self, text: &str) -> Result<(u32, u32)> {
        let numbers = scan::find_integers(text)?;
        let &[hours, minutes, seconds, sector] = numbers.as_slice() else {
            return Err(ScanError::Malformed {
                what: "prompt",
                text: text.to_string(),
            }
            .into());
        };
        let clock = hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds))
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(|| ScanError::Malformed {
                what: "prompt clock",
                text: text.to_string(),
            })?;
        Ok((clock, self.sector_number(sector)?))
    }

    pub(super) fn command_prompt(&mut self, text: &str) -> Result<()> {
        let (clock, sector) = self.timed_prompt(text)?;
        self.set_ship_sector(sector);
        self.enter_prompt(MajorPrompt::Command, Some(clock), Some(sector));
        Ok(())
    }

    /// The computer prompt reached from a citadel is the citadel computer.
    pub(super) fn computer_prompt(&mut self, text: &str) -> Result<()> {
        let (clock, sector) = self.timed_prompt(text)?;
        self.set_ship_sector(sector);
        let prompt = match self.context.prompt {
            Some(MajorPrompt::Citadel | MajorPrompt::CitadelComputer) => {
                MajorPrompt::CitadelComputer
            }
            _ => MajorPrompt::Computer,
        };
        self.enter_prompt(prompt, Some(clock), Some(sector));
        Ok(())
    }

    pub(super) fn major_prompt(&mut self, kind: FragmentKind) {
        let prompt = match kind {
            FragmentKind::PlanetPrompt => MajorPrompt::Planet,
            FragmentKind::CitadelPrompt => MajorPrompt::Citadel,
            _ => MajorPrompt::Stardock,
        };
        self.enter_prompt(prompt, None, None);
    }

    fn enter_prompt(&mut self, prompt: MajorPrompt, clock: Option<u32>, sector: Option<u32>) {
        self.context.prompt = Some(prompt);
        self.emit(AutomationEvent::Prompt {
            prompt,
            clock,
            sector,
        });
    }

    pub(super) fn avoid(&mut self, text: &str, avoided: bool) -> Result<()> {
        let sector = self.sector_number(scan::find_integer(text)?)?;
        self.universe.set_avoided(sector, avoided)?;
        Ok(())
    }

    pub(super) fn avoids_list(&mut self, text: &str) -> Result<()> {
        let sectors = scan::find_integers(text)?
            .into_iter()
            .map(|n| self.sector_number(n))
            .collect::<Result<Vec<_>>>()?;
        for sector in sectors {
            self.universe.set_avoided(sector, true)?;
        }
        Ok(())
    }
}
