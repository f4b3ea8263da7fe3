use std::io::Write;

use tiltclock_core::{HapticPattern, Haptics};

/// Haptics for a terminal: one BEL per "on" segment of the pattern.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn bells(&self, pattern: &HapticPattern) -> Vec<u8> {
        if self.enabled {
            vec![0x07; pattern.pulses()]
        } else {
            Vec::new()
        }
    }
}

impl Haptics for TerminalBell {
    fn vibrate(&self, pattern: &HapticPattern) {
        let bells = self.bells(pattern);
        if bells.is_empty() {
            return;
        }
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(&bells).and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "bell write failed");
        }
    }
}
