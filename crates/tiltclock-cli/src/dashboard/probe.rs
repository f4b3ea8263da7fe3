use tiltclock_core::OrientationProbe;

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: u32 = 2;

/// Orientation signals for a terminal: the window size in square units,
/// a rotation angle the user cycles by hand, and an optional pinned type
/// standing in for a primary orientation API.
#[derive(Debug, Clone)]
pub struct TerminalProbe {
    pinned: Option<String>,
    angle: i32,
    size: (u16, u16),
}

impl TerminalProbe {
    pub fn new(pinned: Option<String>, angle: i32) -> Self {
        let size = crossterm::terminal::size().unwrap_or((80, 24));
        Self::sized(pinned, angle, size)
    }

    /// A probe for a terminal of `size` columns and rows.
    pub fn sized(pinned: Option<String>, angle: i32, size: (u16, u16)) -> Self {
        Self {
            pinned,
            angle,
            size,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Next angle in the cycle 0 → 90 → 180 → -90 → 0.
    pub fn rotate(&mut self) {
        self.angle = match self.angle {
            0 => 90,
            90 => 180,
            180 => -90,
            _ => 0,
        };
    }
}

impl OrientationProbe for TerminalProbe {
    fn primary(&self) -> Option<String> {
        self.pinned.clone()
    }

    fn window_size(&self) -> (u32, u32) {
        let (cols, rows) = self.size;
        (u32::from(cols), u32::from(rows) * CELL_ASPECT)
    }

    fn rotation_angle(&self) -> i32 {
        self.angle
    }
}
