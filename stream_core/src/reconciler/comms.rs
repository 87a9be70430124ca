//! Chat messages and hails.

use tracing::debug;
use universe::MessageKind;

use super::Reconciler;
use crate::error::{Result, ScanError};
use crate::events::AutomationEvent;
use crate::scan;

impl Reconciler {
    /// Compact form: the channel letter, the sender, then the message, each
    /// in its own color run.
    pub(super) fn comm_compact(&mut self, text: &str) -> Result<()> {
        let printables = scan::find_printables(text);
        let malformed = || ScanError::Malformed {
            what: "chat message",
            text: text.to_string(),
        };
        let [channel, sender, .., message] = printables.as_slice() else {
            return Err(malformed().into());
        };
        let kind = channel
            .chars()
            .next()
            .and_then(MessageKind::from_code)
            .ok_or_else(malformed)?;
        self.chat(kind, sender.trim(), message);
        Ok(())
    }

    /// Long form. Federation comm and private hails split into four runs,
    /// a private hail having a bare `:` as the third; radio messages also
    /// carry a channel number.
    pub(super) fn comm_long(&mut self, text: &str) -> Result<()> {
        let printables = scan::find_printables(text);
        let [_, sender, rest @ .., message] = printables.as_slice() else {
            return Err(ScanError::Malformed {
                what: "transmission",
                text: text.to_string(),
            }
            .into());
        };
        let kind = match rest {
            [colon] if colon.trim() == ":" => MessageKind::PrivateHail,
            [_] => MessageKind::FedComm,
            _ => MessageKind::SubspaceRadio,
        };
        self.chat(kind, sender.trim(), message);
        Ok(())
    }

    /// `Rook is hailing you!` always shows the full name, so record it.
    pub(super) fn hail_header(&mut self, text: &str) -> Result<()> {
        let run = scan::find_printable(text)?;
        let name = run.trim();
        let name = name.strip_suffix("is hailing you!").unwrap_or(name).trim();
        if name.is_empty() {
            return Err(ScanError::NoPrintable(text.to_string()).into());
        }
        self.universe.trader_named(name);
        Ok(())
    }

    fn chat(&self, kind: MessageKind, sender: &str, message: &str) {
        let trader = self.universe.trader_named(sender);
        debug!(?kind, sender = %trader.name(), "chat message");
        self.emit(AutomationEvent::ChatMessage {
            kind,
            sender: trader.id(),
            name: trader.name(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::error::ReconcileError;
    use crate::fragment::FragmentKind;

    fn chat(h: &Harness) -> (MessageKind, String, String) {
        match h.take_events().pop() {
            Some(AutomationEvent::ChatMessage {
                kind,
                name,
                message,
                ..
            }) => (kind, name, message),
            other => panic!("expected a chat message, got {other:?}"),
        }
    }

    #[test]
    fn test_compact_message() {
        let mut h = Harness::new(10);
        h.feed(
            FragmentKind::CommCompact,
            "\x1b[K\x1b[36mR \x1b[1;36mRook\x1b[33mhello there",
        )
        .unwrap();
        assert_eq!(
            chat(&h),
            (MessageKind::SubspaceRadio, "Rook".into(), "hello there".into())
        );
        assert!(h.universe().trader("Rook").is_some());

        assert!(matches!(
            h.feed(FragmentKind::CommCompact, "\x1b[36mX \x1b[1;36mRook\x1b[33mhi"),
            Err(ReconcileError::Scan(_))
        ));
    }

    #[test]
    fn test_long_messages() {
        let mut h = Harness::new(10);
        h.feed(
            FragmentKind::CommLong,
            "\x1b[32mIncoming transmission from \x1b[1;36mRook\x1b[0;32m on Federation comm-link:\r\x1b[0m\n\x1b[1;33mfed talk",
        )
        .unwrap();
        assert_eq!(
            chat(&h),
            (MessageKind::FedComm, "Rook".into(), "fed talk".into())
        );

        h.feed(
            FragmentKind::CommLong,
            "\x1b[32mIncoming transmission from \x1b[1;36mRook\x1b[0;32m:\r\x1b[0m\n\x1b[1;33mpsst",
        )
        .unwrap();
        assert_eq!(chat(&h).0, MessageKind::PrivateHail);

        h.feed(
            FragmentKind::CommLong,
            "\x1b[32mIncoming transmission from \x1b[1;36mRook\x1b[0;32m on channel \x1b[1;36m0\x1b[0;32m:\r\x1b[0m\n\x1b[1;33mradio",
        )
        .unwrap();
        assert_eq!(chat(&h).0, MessageKind::SubspaceRadio);
        assert_eq!(h.universe().traders().len(), 1);
    }

    #[test]
    fn test_hail_records_full_name() {
        let mut h = Harness::new(10);
        h.feed(FragmentKind::CommCompact, "\x1b[36mP \x1b[1;36mRookie\x1b[33mhi")
            .unwrap();
        h.feed(
            FragmentKind::HailHeader,
            "\x1b[K\x1b[1A\x1b[1;36mRookie Smith\x1b[0;32m is hailing you!",
        )
        .unwrap();
        let traders = h.universe().traders();
        assert_eq!(traders.len(), 1);
        assert_eq!(traders[0].name(), "Rookie Smith");
    }
}
