use std::io::Write;

use crate::game::GameEvent;

const BELL: &[u8] = b"\x07";

/// Fire-and-forget beep through the terminal bell.
///
/// Write failures are ignored: a missing or muted bell never stops the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Beeper {
    enabled: bool,
}

impl Beeper {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Rings once if any event in the batch asks for a beep.
    pub fn play<W: Write>(&self, events: &[GameEvent], out: &mut W) {
        if events.iter().any(GameEvent::wants_beep) {
            self.beep(out);
        }
    }

    pub fn beep<W: Write>(&self, out: &mut W) {
        if !self.enabled {
            return;
        }

        let _ = out.write_all(BELL).and_then(|()| out.flush());
    }
}
