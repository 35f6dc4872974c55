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
//! EEPROM settings.
//!
//! DST rule, 12/24-hour mode and alarm are read from the onboard EEPROM
//! once at startup and written back only when a setting editor commits.
//!
//! Layout, one byte per value:
//!
//! | offset | value            | range |
//! |--------|------------------|-------|
//! | 0      | DST start month  | 1-12  |
//! | 1      | DST start week   | 1-4   |
//! | 2      | DST end month    | 1-12  |
//! | 3      | DST end week     | 1-4   |
//! | 4      | 12-hour mode     | 0-1   |
//! | 5      | DST enabled      | 0-1   |
//! | 6      | alarm hour       | 0-23  |
//! | 7      | alarm minute     | 0-59  |
//! | 8      | alarm mode       | 0-3   |

use crate::dst::DstRule;

pub const EEPROM_LEN: usize = 9;

/// What days the alarm fires on.  Stepped through in this order by the
/// alarm editor, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlarmMode {
    Off = 0,
    Weekends = 1,
    Weekdays = 2,
    EveryDay = 3,
}

impl AlarmMode {
    pub fn from_byte(v: u8) -> Self {
        match v {
            1 => AlarmMode::Weekends,
            2 => AlarmMode::Weekdays,
            3 => AlarmMode::EveryDay,
            _ => AlarmMode::Off,
        }
    }

    pub fn next(self) -> Self {
        match self {
            AlarmMode::Off => AlarmMode::Weekends,
            AlarmMode::Weekends => AlarmMode::Weekdays,
            AlarmMode::Weekdays => AlarmMode::EveryDay,
            AlarmMode::EveryDay => AlarmMode::EveryDay,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            AlarmMode::Off => AlarmMode::Off,
            AlarmMode::Weekends => AlarmMode::Off,
            AlarmMode::Weekdays => AlarmMode::Weekends,
            AlarmMode::EveryDay => AlarmMode::Weekdays,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSetting {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    pub mode: AlarmMode,
}

/// Working copy of everything persisted, loaded once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub dst: DstRule,
    pub twelve_hour: bool,
    pub alarm: AlarmSetting,
}

// Factory defaults: US DST rule, 12-hour display, alarm parked at 6:00.
const DST_DEFAULT: DstRule = DstRule {
    start_month: 3,
    start_week: 2,
    end_month: 11,
    end_week: 1,
    enabled: true,
};

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dst: DST_DEFAULT,
            twelve_hour: true,
            alarm: AlarmSetting {
                hour: 6,
                minute: 0,
                mode: AlarmMode::Off,
            },
        }
    }
}

impl Settings {
    /// Decode a raw EEPROM image.  A fresh part reads all-0xFF (and a
    /// corrupted one anything at all), so every field falls back to its
    /// default when out of range rather than being trusted.
    pub fn from_bytes(vals: &[u8; EEPROM_LEN]) -> Self {
        let d = Settings::default();
        Settings {
            dst: DstRule {
                start_month: match vals[0] {
                    v @ 1..=12 => v,
                    _ => d.dst.start_month,
                },
                start_week: match vals[1] {
                    v @ 1..=4 => v,
                    _ => d.dst.start_week,
                },
                end_month: match vals[2] {
                    v @ 1..=12 => v,
                    _ => d.dst.end_month,
                },
                end_week: match vals[3] {
                    v @ 1..=4 => v,
                    _ => d.dst.end_week,
                },
                enabled: match vals[5] {
                    0 => false,
                    1 => true,
                    _ => d.dst.enabled,
                },
            },
            twelve_hour: match vals[4] {
                0 => false,
                1 => true,
                _ => d.twelve_hour,
            },
            alarm: AlarmSetting {
                hour: match vals[6] {
                    v @ 0..=23 => v,
                    _ => d.alarm.hour,
                },
                minute: match vals[7] {
                    v @ 0..=59 => v,
                    _ => d.alarm.minute,
                },
                mode: match vals[8] {
                    v @ 0..=3 => AlarmMode::from_byte(v),
                    _ => d.alarm.mode,
                },
            },
        }
    }

    pub fn to_bytes(&self) -> [u8; EEPROM_LEN] {
        [
            self.dst.start_month,
            self.dst.start_week,
            self.dst.end_month,
            self.dst.end_week,
            self.twelve_hour as u8,
            self.dst.enabled as u8,
            self.alarm.hour,
            self.alarm.minute,
            self.alarm.mode as u8,
        ]
    }

    /// Read the stored settings, or defaults if the EEPROM is unreadable.
    #[cfg(target_arch = "avr")]
    #[must_use]
    pub fn new(eeprom: &arduino_hal::Eeprom) -> Self {
        let mut vals = [0xff; EEPROM_LEN];
        if eeprom.read(0, &mut vals).is_err() {
            return Settings::default();
        }
        Settings::from_bytes(&vals)
    }

    /// Write everything back.
    ///
    /// EEPROM has a limited number of write cycles in its life.  Use this
    /// function sparingly -- good for human operated buttons, not so good
    /// for automation.
    #[cfg(target_arch = "avr")]
    pub fn save(&self, eeprom: &mut arduino_hal::Eeprom) {
        for (offset, value) in self.to_bytes().into_iter().enumerate() {
            eeprom.write_byte(offset as u16, value);
        }
    }
}
