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
//! MAX7219 segment driver for the bubble display.
//!
//! Bit-banged three-wire interface (din/clk/load) over `embedded-hal`
//! output pins, one framebuffer row per digit register, `DEVICES` chained
//! chips.  One chip drives all 8 characters of the stock display; the
//! chain support is for the long-display variant.

use embedded_hal::digital::OutputPin;

use crate::segment;

/// Digits per device, fixed by the chip.
pub const DIGITS: usize = 8;

const REG_DECODE_MODE: u8 = 0x09;
const REG_INTENSITY: u8 = 0x0a;
const REG_SCAN_LIMIT: u8 = 0x0b;
const REG_SHUTDOWN: u8 = 0x0c;
const REG_DISPLAY_TEST: u8 = 0x0f;

pub struct Max7219<DIN, CLK, LOAD, const DEVICES: usize> {
    din: DIN,
    clk: CLK,
    load: LOAD,
    frame: [[u8; DIGITS]; DEVICES],
}

impl<DIN, CLK, LOAD, const DEVICES: usize> Max7219<DIN, CLK, LOAD, DEVICES>
where
    DIN: OutputPin,
    CLK: OutputPin,
    LOAD: OutputPin,
{
    pub fn new(din: DIN, clk: CLK, load: LOAD) -> Self {
        Max7219 {
            din,
            clk,
            load,
            frame: [[0; DIGITS]; DEVICES],
        }
    }

    /// Chip setup: raw segment mode, all digits scanned, mid brightness,
    /// out of shutdown, test mode off.  Then a blank frame.
    pub fn init(&mut self) {
        self.write_all(REG_DISPLAY_TEST, 0x00);
        self.write_all(REG_DECODE_MODE, 0x00);
        self.write_all(REG_SCAN_LIMIT, (DIGITS - 1) as u8);
        self.write_all(REG_INTENSITY, 0x08);
        self.write_all(REG_SHUTDOWN, 0x01);
        self.frame = [[0; DIGITS]; DEVICES];
        self.flush();
    }

    /// Stage one character.  `glyph` is ASCII; the font lookup and the
    /// dot-in-bit-7 packing happen here, at the wire boundary.
    /// Out-of-range device or position is this driver's concern: ignored.
    pub fn set_digit(&mut self, device: usize, pos: usize, glyph: u8, dot: bool) {
        if device < DEVICES && pos < DIGITS {
            self.frame[device][pos] = segment::encode(glyph, dot);
        }
    }

    /// Push the staged frame out, one digit register across the whole
    /// chain per load pulse.
    pub fn flush(&mut self) {
        for digit in 0..DIGITS {
            let _ = self.load.set_low();
            // Farthest device first; its data shifts through the others.
            for device in (0..DEVICES).rev() {
                self.shift16(digit as u8 + 1, self.frame[device][digit]);
            }
            let _ = self.load.set_high();
        }
    }

    fn write_all(&mut self, reg: u8, data: u8) {
        let _ = self.load.set_low();
        for _ in 0..DEVICES {
            self.shift16(reg, data);
        }
        let _ = self.load.set_high();
    }

    fn shift16(&mut self, reg: u8, data: u8) {
        let word = (reg as u16) << 8 | data as u16;
        for bit in (0..16).rev() {
            let _ = self.clk.set_low();
            if word >> bit & 1 != 0 {
                let _ = self.din.set_high();
            } else {
                let _ = self.din.set_low();
            }
            let _ = self.clk.set_high();
        }
    }
}
