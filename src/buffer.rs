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
//! The 18-character display buffer.
//!
//! Canonical "what should be shown" text, wider than the physical
//! 8-character window that slides over it.  Layout:
//!
//! ```txt
//! cell   0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16 17
//!       [hour][min ][sec ]     I       [mon ][date][year]    d
//! ```
//!
//! `I` is the AM/PM-or-alarm indicator, `d` the day-of-week digit.

use crate::settings::{AlarmMode, AlarmSetting};
use crate::time::{self, ClockTime};

pub const BUFFER_CELLS: usize = 18;
pub const WINDOW_CELLS: usize = 8;

/// One character cell: an ASCII glyph plus a decimal-point flag.
///
/// The original packed the decimal point into the glyph's high bit; here
/// that encoding only exists at the display-driver boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: u8,
    pub dot: bool,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: b' ',
        dot: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBuffer {
    cells: [Cell; BUFFER_CELLS],
}

// Indicator cell, the seconds' right-hand neighbour.
const INDICATOR: usize = 7;
const MONTH: usize = 10;
const DATE: usize = 12;
const YEAR: usize = 14;
const DOW: usize = 17;

impl DisplayBuffer {
    /// Build the whole buffer from scratch.  Every one of the 18 cells is
    /// written on every call; nothing ever goes stale across a rebuild.
    pub fn rebuild(t: &ClockTime, dow: u8, twelve_hour: bool, alarm: &AlarmSetting) -> Self {
        let mut b = DisplayBuffer {
            cells: [Cell::BLANK; BUFFER_CELLS],
        };

        if twelve_hour {
            // Tens digit is a space, not a zero, below 10 o'clock.
            b.two_digits(0, time::to_12_hour(t.hours), true, true);
        } else {
            b.two_digits(0, t.hours, true, false);
        }
        b.two_digits(2, t.minutes, true, false);
        b.two_digits(4, t.seconds, false, false);

        // One glyph, two meanings: A/P carries the half of day in 12-hour
        // mode, the dot carries "alarm armed" in either mode.
        b.cells[INDICATOR] = Cell {
            glyph: if twelve_hour {
                if time::is_pm(t.hours) {
                    b'P'
                } else {
                    b'A'
                }
            } else {
                b' '
            },
            dot: alarm.mode != AlarmMode::Off,
        };

        b.two_digits(MONTH, t.month, true, false);
        b.two_digits(DATE, t.date, true, false);
        b.two_digits(YEAR, t.year, false, false);
        // Day-of-week as the bare 1-7 value; this display has no letter
        // pairs for weekday names.
        b.cells[DOW] = Cell {
            glyph: b'0' + dow.clamp(1, 7),
            dot: false,
        };
        b
    }

    pub fn cells(&self) -> &[Cell; BUFFER_CELLS] {
        &self.cells
    }

    /// The 8-cell slice starting at `left` (clamped to the buffer).
    pub fn window(&self, left: u8) -> &[Cell] {
        let left = (left as usize).min(BUFFER_CELLS - WINDOW_CELLS);
        &self.cells[left..left + WINDOW_CELLS]
    }

    /// Menu-string overlay: overwrite cells starting at `start` for one
    /// render pass.  Does not touch the semantic source values.
    pub fn overlay(&mut self, start: usize, text: &[u8]) {
        for (i, &ch) in text.iter().enumerate() {
            if let Some(cell) = self.cells.get_mut(start + i) {
                *cell = Cell {
                    glyph: ch,
                    dot: false,
                };
            }
        }
    }

    /// Blink-blanking: blank `first..=last` for one render pass.
    pub fn blank(&mut self, first: usize, last: usize) {
        for idx in first..=last.min(BUFFER_CELLS - 1) {
            self.cells[idx] = Cell::BLANK;
        }
    }

    pub fn set(&mut self, idx: usize, glyph: u8, dot: bool) {
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = Cell { glyph, dot };
        }
    }

    /// Write `value` as two decimal digits at `idx`, decimal point on the
    /// ones digit when `dot`.  `blank_tens` renders a space instead of a
    /// leading zero (12-hour mode).  Values over 99 are taken modulo 100
    /// rather than trusted.
    pub fn two_digits(&mut self, idx: usize, value: u8, dot: bool, blank_tens: bool) {
        let value = value % 100;
        let tens = value / 10;
        self.cells[idx] = Cell {
            glyph: if tens == 0 && blank_tens {
                b' '
            } else {
                b'0' + tens
            },
            dot: false,
        };
        self.cells[idx + 1] = Cell {
            glyph: b'0' + value % 10,
            dot,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn t(hours: u8, minutes: u8, seconds: u8) -> ClockTime {
        ClockTime {
            seconds,
            minutes,
            hours,
            date: 28,
            month: 8,
            year: 26,
        }
    }

    fn alarm(mode: AlarmMode) -> AlarmSetting {
        AlarmSetting {
            hour: 6,
            minute: 30,
            mode,
        }
    }

    fn glyphs(b: &DisplayBuffer) -> [u8; BUFFER_CELLS] {
        core::array::from_fn(|i| b.cells()[i].glyph)
    }

    #[test]
    fn afternoon_twelve_hour_scenario() {
        // 13:05:00 in 12-hour mode shows " 1" "05" with dots on the ones
        // digits of hours and minutes.
        let b = DisplayBuffer::rebuild(&t(13, 5, 0), 6, true, &alarm(AlarmMode::Off));
        let c = b.cells();
        assert_eq!((c[0].glyph, c[1].glyph), (b' ', b'1'));
        assert!(!c[0].dot && c[1].dot);
        assert_eq!((c[2].glyph, c[3].glyph), (b'0', b'5'));
        assert!(c[3].dot);
        assert_eq!(c[7].glyph, b'P');
    }

    #[test]
    fn tens_blank_iff_twelve_hour_and_single_digit() {
        for h in 0u8..24 {
            let b12 = DisplayBuffer::rebuild(&t(h, 0, 0), 1, true, &alarm(AlarmMode::Off));
            let b24 = DisplayBuffer::rebuild(&t(h, 0, 0), 1, false, &alarm(AlarmMode::Off));
            let shown = crate::time::to_12_hour(h);
            assert_eq!(b12.cells()[0].glyph == b' ', shown < 10, "hour {}", h);
            assert_ne!(b24.cells()[0].glyph, b' ', "hour {}", h);
        }
    }

    #[test]
    fn midnight_maps_to_twelve() {
        let b = DisplayBuffer::rebuild(&t(0, 0, 0), 1, true, &alarm(AlarmMode::Off));
        assert_eq!((b.cells()[0].glyph, b.cells()[1].glyph), (b'1', b'2'));
        assert_eq!(b.cells()[7].glyph, b'A');
    }

    #[test]
    fn indicator_cell_duality() {
        // Glyph tracks AM/PM (12-hour only); dot tracks alarm armed in
        // both modes, independently.
        let armed = alarm(AlarmMode::EveryDay);
        let off = alarm(AlarmMode::Off);
        let am = DisplayBuffer::rebuild(&t(9, 0, 0), 1, true, &armed);
        assert_eq!(am.cells()[7].glyph, b'A');
        assert!(am.cells()[7].dot);
        let pm = DisplayBuffer::rebuild(&t(21, 0, 0), 1, true, &off);
        assert_eq!(pm.cells()[7].glyph, b'P');
        assert!(!pm.cells()[7].dot);
        let h24 = DisplayBuffer::rebuild(&t(21, 0, 0), 1, false, &armed);
        assert_eq!(h24.cells()[7].glyph, b' ');
        assert!(h24.cells()[7].dot);
    }

    #[test]
    fn date_half_layout() {
        let b = DisplayBuffer::rebuild(&t(12, 0, 0), 6, false, &alarm(AlarmMode::Off));
        let g = glyphs(&b);
        assert_eq!(&g[10..16], b"082826");
        assert!(b.cells()[11].dot && b.cells()[13].dot);
        assert!(!b.cells()[15].dot);
        assert_eq!(g[16], b' ');
        assert_eq!(g[17], b'6');
    }

    #[test]
    fn rebuild_writes_every_cell() {
        // Two rebuilds with nothing in common may not share stale cells.
        let mut b = DisplayBuffer::rebuild(&t(11, 11, 11), 2, false, &alarm(AlarmMode::Off));
        b.overlay(0, b"DEFAULTS");
        b.blank(10, 17);
        let fresh = DisplayBuffer::rebuild(&t(11, 11, 11), 2, false, &alarm(AlarmMode::Off));
        let again = DisplayBuffer::rebuild(&t(11, 11, 11), 2, false, &alarm(AlarmMode::Off));
        assert_eq!(fresh, again);
        assert_ne!(b, fresh); // overlay/blank are per-pass only
    }

    #[test]
    fn window_slices_and_clamps() {
        let b = DisplayBuffer::rebuild(&t(23, 59, 58), 7, false, &alarm(AlarmMode::Off));
        assert_eq!(b.window(0), &b.cells()[0..8]);
        assert_eq!(b.window(10), &b.cells()[10..18]);
        // Out-of-range lefts clamp instead of panicking.
        assert_eq!(b.window(200), &b.cells()[10..18]);
    }

    #[test]
    fn settings_defaults_render() {
        // Smoke test with the shipped defaults.
        let s = Settings::default();
        let b = DisplayBuffer::rebuild(&t(7, 8, 9), 3, s.twelve_hour, &s.alarm);
        assert_eq!(b.cells()[1].glyph, b'7');
    }
}
