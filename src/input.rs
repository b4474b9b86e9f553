use std::time::{Duration, Instant};

use crate::grid::Dir;

/// A press or autorepeat keeps its direction held for this long. Terminals
/// report no key-release, so holding is inferred from event recency; the
/// window must outlast the gap between autorepeat events.
const HOLD_WINDOW: Duration = Duration::from_millis(160);

/// When several directions are held at once, the first held entry in this
/// order wins. One direction per tick, never a diagonal.
pub const PRECEDENCE: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

/// Currently-held movement directions, fed by key events and sampled by the
/// movement scheduler once per player tick.
pub struct HeldDirections {
    last_seen: [Option<Instant>; 4],
}

impl HeldDirections {
    pub fn new() -> HeldDirections {
        HeldDirections {
            last_seen: [None; 4],
        }
    }

    pub fn press(&mut self, dir: Dir) {
        self.press_at(dir, Instant::now());
    }

    pub fn active(&self) -> Option<Dir> {
        self.active_at(Instant::now())
    }

    fn press_at(&mut self, dir: Dir, now: Instant) {
        self.last_seen[index(dir)] = Some(now);
    }

    fn active_at(&self, now: Instant) -> Option<Dir> {
        PRECEDENCE.into_iter().find(|dir| {
            self.last_seen[index(*dir)]
                .is_some_and(|seen| now.duration_since(seen) <= HOLD_WINDOW)
        })
    }
}

fn index(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_held_initially() {
        assert_eq!(HeldDirections::new().active(), None);
    }

    #[test]
    fn precedence_picks_one_direction() {
        let now = Instant::now();
        let mut held = HeldDirections::new();
        held.press_at(Dir::Right, now);
        held.press_at(Dir::Down, now);
        assert_eq!(held.active_at(now), Some(Dir::Down));
        held.press_at(Dir::Up, now);
        assert_eq!(held.active_at(now), Some(Dir::Up));
    }

    #[test]
    fn hold_expires_without_fresh_events() {
        let now = Instant::now();
        let mut held = HeldDirections::new();
        held.press_at(Dir::Left, now);
        assert_eq!(held.active_at(now + HOLD_WINDOW), Some(Dir::Left));
        assert_eq!(
            held.active_at(now + HOLD_WINDOW + Duration::from_millis(1)),
            None
        );
    }

    #[test]
    fn repeat_refreshes_the_hold() {
        let now = Instant::now();
        let mut held = HeldDirections::new();
        held.press_at(Dir::Right, now);
        held.press_at(Dir::Right, now + Duration::from_millis(100));
        assert_eq!(
            held.active_at(now + Duration::from_millis(200)),
            Some(Dir::Right)
        );
    }
}
