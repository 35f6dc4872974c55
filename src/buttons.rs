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
//! Three-button input: set/select, minus, plus.
//!
//! The pins are active low with pull-ups.  The main loop samples them
//! continuously inside the tick busy-wait; press edges latch here and are
//! consumed once per tick, so a short press between ticks is never lost.

/// Edges seen since the last [`Buttons::take`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEvents {
    pub select: bool,
    pub minus: bool,
    pub plus: bool,
}

impl ButtonEvents {
    pub const NONE: ButtonEvents = ButtonEvents {
        select: false,
        minus: false,
        plus: false,
    };
}

pub struct Buttons {
    // true = currently pressed, per button.
    held: [bool; 3],
    latched: [bool; 3],
}

impl Buttons {
    pub const fn new() -> Self {
        Buttons {
            held: [false; 3],
            latched: [false; 3],
        }
    }

    /// Feed one debounced sample per button, `true` meaning the pin reads
    /// low (pressed).  Latches the falling/active edge.
    pub fn sample(&mut self, select: bool, minus: bool, plus: bool) {
        for (i, pressed) in [select, minus, plus].into_iter().enumerate() {
            if pressed && !self.held[i] {
                self.latched[i] = true;
            }
            self.held[i] = pressed;
        }
    }

    /// Hand over and clear the latched edges.
    pub fn take(&mut self) -> ButtonEvents {
        let ev = ButtonEvents {
            select: self.latched[0],
            minus: self.latched[1],
            plus: self.latched[2],
        };
        self.latched = [false; 3];
        ev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_latches_until_taken() {
        let mut b = Buttons::new();
        b.sample(false, false, false);
        assert_eq!(b.take(), ButtonEvents::NONE);

        b.sample(true, false, false);
        b.sample(true, false, false); // still held, no second edge
        b.sample(false, false, true);
        let ev = b.take();
        assert!(ev.select && ev.plus && !ev.minus);
        assert_eq!(b.take(), ButtonEvents::NONE);
    }

    #[test]
    fn hold_produces_one_edge() {
        let mut b = Buttons::new();
        for _ in 0..50 {
            b.sample(false, true, false);
        }
        assert!(b.take().minus);
        assert_eq!(b.take(), ButtonEvents::NONE);
        // Release and press again: a fresh edge.
        b.sample(false, false, false);
        b.sample(false, true, false);
        assert!(b.take().minus);
    }

    #[test]
    fn edge_between_ticks_survives_to_the_next_take() {
        let mut b = Buttons::new();
        b.sample(false, false, true);
        b.sample(false, false, false); // released before the tick ends
        assert!(b.take().plus);
    }
}
