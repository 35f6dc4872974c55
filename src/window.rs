// This library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this library.  If not, see <http://www.gnu.org/licenses/>.
//! Scroll/window controller.
//!
//! Decides, once per tick, which 8-cell slice of the display buffer is
//! visible, and animates the slide over to the date view and back.  Holds
//! no buffer data, so a 1 Hz rebuild mid-scroll never disturbs it.

use crate::buffer::{BUFFER_CELLS, WINDOW_CELLS};

/// Main scheduling period.  Scroll stepping and edit-blink both pace off
/// this; the source variants disagreed (200 vs 250 ms), so it is one
/// configuration constant here.
pub const TICK_MS: u16 = 200;

/// How long the date view holds before sliding back.
pub const DATE_HOLD_MS: u16 = 3000;

const HOLD_TICKS: u8 = (DATE_HOLD_MS / TICK_MS) as u8;

/// Leftmost cell of the date view.
const DATE_LEFT: u8 = (BUFFER_CELLS - WINDOW_CELLS) as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ShowingTime,
    ScrollingToDate,
    HoldingDate,
    ScrollingToTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    left: u8,
    phase: Phase,
    hold_remaining: u8,
}

impl Window {
    pub const fn new() -> Self {
        Window {
            left: 0,
            phase: Phase::ShowingTime,
            hold_remaining: 0,
        }
    }

    /// Back to the resting time view.  Called whenever the settings menu
    /// is entered or left.
    pub fn reset(&mut self) {
        *self = Window::new();
    }

    pub fn left(&self) -> u8 {
        self.left
    }

    pub fn right(&self) -> u8 {
        self.left + (WINDOW_CELLS as u8 - 1)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// "Show date" button edge.  Ignored unless resting; a press mid-
    /// animation does not retrigger.
    pub fn show_date(&mut self) {
        if self.phase == Phase::ShowingTime {
            self.phase = Phase::ScrollingToDate;
        }
    }

    /// Advance the animation by one tick.
    pub fn tick(&mut self) {
        match self.phase {
            Phase::ShowingTime => {}
            Phase::ScrollingToDate => {
                self.left += 1;
                if self.left >= DATE_LEFT {
                    self.left = DATE_LEFT;
                    self.phase = Phase::HoldingDate;
                    self.hold_remaining = HOLD_TICKS;
                }
            }
            Phase::HoldingDate => {
                self.hold_remaining = self.hold_remaining.saturating_sub(1);
                if self.hold_remaining == 0 {
                    self.phase = Phase::ScrollingToTime;
                }
            }
            Phase::ScrollingToTime => {
                self.left = self.left.saturating_sub(1);
                if self.left == 0 {
                    self.phase = Phase::ShowingTime;
                    self.hold_remaining = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rests_at_the_time_view() {
        let mut w = Window::new();
        assert_eq!((w.left(), w.right()), (0, 7));
        for _ in 0..100 {
            w.tick();
        }
        assert_eq!(w.phase(), Phase::ShowingTime);
        assert_eq!(w.left(), 0);
    }

    #[test]
    fn scrolls_one_cell_per_tick() {
        let mut w = Window::new();
        w.show_date();
        for n in 1u8..=12 {
            w.tick();
            assert_eq!(w.left(), n.min(10), "tick {}", n);
        }
        assert_eq!(w.phase(), Phase::HoldingDate);
    }

    #[test]
    fn full_round_trip_tick_count() {
        let hold = (DATE_HOLD_MS / TICK_MS) as u16;
        let mut w = Window::new();
        w.show_date();
        // 10 ticks out.
        for _ in 0..10 {
            w.tick();
        }
        assert_eq!((w.left(), w.phase()), (10, Phase::HoldingDate));
        // Held for the configured duration; decrementing begins on the
        // tick after the hold expires.
        for _ in 0..hold {
            assert_ne!(w.phase(), Phase::ShowingTime);
            assert_eq!(w.left(), 10);
            w.tick();
        }
        for n in (0..10u8).rev() {
            w.tick();
            assert_eq!(w.left(), n);
        }
        assert_eq!(w.phase(), Phase::ShowingTime);
        assert_eq!((w.left(), w.right()), (0, 7));
    }

    #[test]
    fn show_date_ignored_mid_animation() {
        let mut w = Window::new();
        w.show_date();
        w.tick();
        let mid = w;
        w.show_date(); // no retrigger
        assert_eq!(w, mid);
    }

    #[test]
    fn reset_from_anywhere() {
        let mut w = Window::new();
        w.show_date();
        for _ in 0..7 {
            w.tick();
        }
        w.reset();
        assert_eq!(w, Window::new());
    }
}
