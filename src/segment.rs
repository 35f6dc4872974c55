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
//! ASCII to seven-segment patterns.
//!
//! Driver wire format: bit 6 down to bit 0 are segments A-G, bit 7 is the
//! decimal point.  This is the only place the old "add 128 for the dot"
//! encoding survives.

/// Decimal-point bit in the wire format.
pub const DP: u8 = 0x80;

const DIGITS: [u8; 10] = [
    0b111_1110, // 0
    0b011_0000, // 1
    0b110_1101, // 2
    0b111_1001, // 3
    0b011_0011, // 4
    0b101_1011, // 5
    0b101_1111, // 6
    0b111_0000, // 7
    0b111_1111, // 8
    0b111_1011, // 9
];

/// Segment pattern for an ASCII character.  Letters are the usual
/// seven-segment approximations; anything unknown renders blank.
pub fn glyph(c: u8) -> u8 {
    match c.to_ascii_uppercase() {
        b'0'..=b'9' => DIGITS[(c - b'0') as usize],
        b'A' => 0b111_0111,
        b'B' => 0b001_1111,
        b'C' => 0b100_1110,
        b'D' => 0b011_1101,
        b'E' => 0b100_1111,
        b'F' => 0b100_0111,
        b'G' => 0b101_1110,
        b'H' => 0b011_0111,
        b'I' => 0b011_0000,
        b'J' => 0b011_1100,
        b'L' => 0b000_1110,
        b'M' => 0b101_0100, // crude; the display has no good M
        b'N' => 0b001_0101,
        b'O' => 0b111_1110,
        b'P' => 0b110_0111,
        b'R' => 0b000_0101,
        b'S' => 0b101_1011,
        b'T' => 0b000_1111,
        b'U' => 0b011_1110,
        b'Y' => 0b011_1011,
        b'-' => 0b000_0001,
        _ => 0,
    }
}

/// Full wire byte: segments plus the dot flag.
pub fn encode(c: u8, dot: bool) -> u8 {
    glyph(c) | if dot { DP } else { 0 }
}
