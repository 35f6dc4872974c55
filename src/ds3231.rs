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
//! DS3231 RTC interface.
//!
//! Registers 0x00-0x06 hold seconds, minutes, hours, day, date, month and
//! year in BCD.  Each group is moved in a single bus transaction (register
//! pointer, then sequential bytes); nothing here ever interleaves.

#[cfg(target_arch = "avr")]
use arduino_hal::prelude::*;

use crate::time::ClockTime;

// 104 is the DS3231 RTC device address
const RTC_ADDRESS: u8 = 104;

const REG_TIME: u8 = 0x00;
const REG_CONTROL: u8 = 0x0e;
const REG_STATUS: u8 = 0x0f;

// EOSC=0 keeps the oscillator running on battery, BBSQW=1 keeps the
// square wave up on battery, INTCN=0 + RS=00 select the 1 Hz output that
// clocks the main loop.
const CONTROL_1HZ: u8 = 0b0100_0000;

// Oscillator-stop flag in the status register.
const STATUS_OSF: u8 = 0x80;

pub fn bcd_decode(v: u8) -> u8 {
    (v >> 4) * 10 + (v & 0x0f)
}

pub fn bcd_encode(v: u8) -> u8 {
    (v / 10) << 4 | v % 10
}

/// Decode the seven clock registers into decimal time plus day-of-week.
/// The seconds high bit is reserved and the hours register carries the
/// 12/24 control bits; both are masked off before conversion.
pub fn decode_registers(buf: &[u8; 7]) -> (ClockTime, u8) {
    let t = ClockTime {
        seconds: bcd_decode(buf[0] & 0x7f),
        minutes: bcd_decode(buf[1]),
        hours: bcd_decode(buf[2] & 0x3f),
        date: bcd_decode(buf[4]),
        month: bcd_decode(buf[5] & 0x1f),
        year: bcd_decode(buf[6]),
    };
    (t, buf[3] & 0x07)
}

/// Register pointer plus the seven clock registers, ready to write as one
/// transaction.  Hours always go out in 24-hour form.
pub fn encode_registers(t: &ClockTime, dow: u8) -> [u8; 8] {
    [
        REG_TIME,
        bcd_encode(t.seconds),
        bcd_encode(t.minutes),
        bcd_encode(t.hours),
        dow.clamp(1, 7),
        bcd_encode(t.date),
        bcd_encode(t.month),
        bcd_encode(t.year),
    ]
}

/// Mandatory startup configuration: select the 1 Hz square wave and make
/// sure the oscillator keeps running on battery, then clear the
/// oscillator-stop flag so a past power loss doesn't read as a current
/// fault.
#[cfg(target_arch = "avr")]
pub fn init(i2c: &mut arduino_hal::I2c) -> Result<(), arduino_hal::i2c::Error> {
    i2c.write(RTC_ADDRESS, &[REG_CONTROL, CONTROL_1HZ])?;
    let mut status = [0u8];
    i2c.write_read(RTC_ADDRESS, &[REG_STATUS], &mut status)?;
    i2c.write(RTC_ADDRESS, &[REG_STATUS, status[0] & !STATUS_OSF])?;
    Ok(())
}

/// Read the full time and date from the RTC in one transaction.
#[cfg(target_arch = "avr")]
pub fn read_clock(
    i2c: &mut arduino_hal::I2c,
) -> Result<(ClockTime, u8), arduino_hal::i2c::Error> {
    let mut buf = [0u8; 7];
    i2c.write_read(RTC_ADDRESS, &[REG_TIME], &mut buf)?;
    Ok(decode_registers(&buf))
}

/// Write the full time and date to the RTC in one transaction.
#[cfg(target_arch = "avr")]
pub fn write_clock(
    i2c: &mut arduino_hal::I2c,
    t: &ClockTime,
    dow: u8,
) -> Result<(), arduino_hal::i2c::Error> {
    i2c.write(RTC_ADDRESS, &encode_registers(t, dow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcd_round_trips() {
        for v in 0u8..100 {
            assert_eq!(bcd_decode(bcd_encode(v)), v);
        }
        assert_eq!(bcd_encode(59), 0x59);
        assert_eq!(bcd_decode(0x23), 23);
    }

    #[test]
    fn reserved_bits_are_masked_on_read() {
        // Seconds high bit and the hours 12/24 control bit set.
        let (t, dow) = decode_registers(&[0x80 | 0x30, 0x45, 0x40 | 0x23, 0x06, 0x28, 0x08, 0x26]);
        assert_eq!(t.seconds, 30);
        assert_eq!(t.minutes, 45);
        assert_eq!(t.hours, 23);
        assert_eq!(dow, 6);
        assert_eq!((t.date, t.month, t.year), (28, 8, 26));
    }

    #[test]
    fn register_image_round_trips() {
        let t = ClockTime {
            seconds: 59,
            minutes: 8,
            hours: 20,
            date: 31,
            month: 12,
            year: 99,
        };
        let image = encode_registers(&t, 3);
        assert_eq!(image[0], 0x00); // register pointer first
        let mut regs = [0u8; 7];
        regs.copy_from_slice(&image[1..]);
        assert_eq!(decode_registers(&regs), (t, 3));
    }

    #[test]
    fn dow_is_clamped_into_the_register_range() {
        let t = ClockTime::new();
        assert_eq!(encode_registers(&t, 0)[4], 1);
        assert_eq!(encode_registers(&t, 9)[4], 7);
    }
}
