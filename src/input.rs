//! Input snapshot handed to each tick, plus out-of-band commands.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

/// Which intents are held at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl InputSnapshot {
    pub fn set(&mut self, intent: Intent, held: bool) {
        match intent {
            Intent::Left => self.left = held,
            Intent::Right => self.right = held,
            Intent::Up => self.up = held,
            Intent::Down => self.down = held,
            Intent::Fire => self.fire = held,
        }
    }

    pub fn with(mut self, intent: Intent) -> Self {
        self.set(intent, true);
        self
    }

    /// Map a touch point on a `width`×`height` surface to intents: the
    /// horizontal half picks left/right, the vertical half picks up/down.
    pub fn from_touch(x: f32, y: f32, width: f32, height: f32) -> Self {
        let horizontal = if x < width / 2.0 { Intent::Left } else { Intent::Right };
        let vertical = if y < height / 2.0 { Intent::Up } else { Intent::Down };
        Self::default().with(horizontal).with(vertical)
    }

    /// Union of two snapshots (keyboard and touch held together).
    pub fn merge(self, other: InputSnapshot) -> Self {
        Self {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
            fire: self.fire || other.fire,
        }
    }
}

/// Session-level requests that are not part of per-tick movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Restart,
    /// Forfeit the running game.
    EndGame,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_quadrants() {
        let t = InputSnapshot::from_touch(10.0, 10.0, 100.0, 100.0);
        assert!(t.left && t.up && !t.right && !t.down && !t.fire);
        let t = InputSnapshot::from_touch(90.0, 90.0, 100.0, 100.0);
        assert!(t.right && t.down && !t.left && !t.up);
        // Exactly on the centre line goes right/down.
        let t = InputSnapshot::from_touch(50.0, 50.0, 100.0, 100.0);
        assert!(t.right && t.down);
    }

    #[test]
    fn merge_is_a_union() {
        let a = InputSnapshot::default().with(Intent::Left);
        let b = InputSnapshot::default().with(Intent::Fire);
        let m = a.merge(b);
        assert!(m.left && m.fire && !m.right);
    }
}
