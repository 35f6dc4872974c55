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
//! Wall-clock time as cached from the RTC.

/// Decimal time and calendar date, one field per RTC register.
///
/// The RTC owns the truth; this is the main loop's cached copy, refreshed
/// on every 1 Hz tick and replaced wholesale when a setting editor commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// 0-59
    pub seconds: u8,
    /// 0-59
    pub minutes: u8,
    /// 0-23, always 24-hour form; 12-hour is a display concern only.
    pub hours: u8,
    /// 1-31
    pub date: u8,
    /// 1-12
    pub month: u8,
    /// 0-99, offset from 2000
    pub year: u8,
}

impl ClockTime {
    pub const fn new() -> Self {
        ClockTime {
            seconds: 0,
            minutes: 0,
            hours: 0,
            date: 1,
            month: 1,
            year: 0,
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::new()
    }
}

/// Hour on a 12-hour dial: 0 becomes 12, 13-23 drop back to 1-11.
pub fn to_12_hour(hour: u8) -> u8 {
    match hour {
        0 => 12,
        1..=12 => hour,
        _ => hour - 12,
    }
}

/// P from noon on, A before it.  One source variant had this inverted;
/// the conventional mapping is used here.
pub fn is_pm(hour: u8) -> bool {
    hour >= 12
}
