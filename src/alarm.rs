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
//! When to sound the alarm.

use crate::settings::{AlarmMode, AlarmSetting};
use crate::time::ClockTime;

/// True for the whole minute the alarm matches, on a day its mode covers.
/// `dow` is 1-7 with 1 = Sunday.  The caller turns this into beeping.
pub fn should_sound(alarm: &AlarmSetting, t: &ClockTime, dow: u8) -> bool {
    let day_ok = match alarm.mode {
        AlarmMode::Off => false,
        AlarmMode::Weekends => dow == 1 || dow == 7,
        AlarmMode::Weekdays => (2..=6).contains(&dow),
        AlarmMode::EveryDay => true,
    };
    day_ok && t.hours == alarm.hour && t.minutes == alarm.minute
}
