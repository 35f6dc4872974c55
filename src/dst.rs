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
//! Daylight-saving adjustment and day-of-week derivation.
//!
//! The RTC stores standard time; everything shown on the display goes
//! through [`adjust`] first.  The rule is "Nth Sunday of a month" on both
//! ends, switching at 02:00, which covers the US and EU conventions the
//! clock is normally configured for.

use crate::time::ClockTime;

/// When daylight saving starts and ends.  Persisted in EEPROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstRule {
    /// 1-12
    pub start_month: u8,
    /// Which Sunday of the start month, 1-4.
    pub start_week: u8,
    /// 1-12
    pub end_month: u8,
    /// Which Sunday of the end month, 1-4.
    pub end_week: u8,
    pub enabled: bool,
}

/// Day of week for 2000-2099, 1 = Sunday.  Sakamoto's congruence with the
/// century folded in.  Tolerates out-of-range months by clamping; garbage
/// in gives a wrong weekday, never a crash.
pub fn day_of_week(date: u8, month: u8, year: u8) -> u8 {
    const T: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month = month.clamp(1, 12);
    let mut y = 2000 + year.min(99) as u16;
    // Treat Jan/Feb as months 13/14 of the previous year.
    if month < 3 {
        y -= 1;
    }
    let sum = y + y / 4 - y / 100 + y / 400 + T[month as usize - 1] + date as u16;
    (sum % 7) as u8 + 1
}

/// Calendar date of the Nth Sunday of the given month, N clamped to 1-4.
pub fn nth_sunday(week: u8, month: u8, year: u8) -> u8 {
    let first = day_of_week(1, month, year);
    let first_sunday = 1 + (8 - first) % 7;
    first_sunday + 7 * (week.clamp(1, 4) - 1)
}

fn days_in_month(month: u8, year: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            // 2000-2099: every fourth year is a leap year.
            if year % 4 == 0 {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Whether standard time `t` falls inside the daylight-saving interval.
///
/// Boundaries are at 02:00 standard time on the configured Sundays.  A
/// start month after the end month wraps the interval over new year
/// (southern hemisphere rules).
pub fn in_dst(rule: &DstRule, t: &ClockTime) -> bool {
    if !rule.enabled {
        return false;
    }
    let start = (
        rule.start_month,
        nth_sunday(rule.start_week, rule.start_month, t.year),
        2u8,
    );
    let end = (
        rule.end_month,
        nth_sunday(rule.end_week, rule.end_month, t.year),
        2u8,
    );
    let now = (t.month, t.date, t.hours);
    if rule.start_month <= rule.end_month {
        now >= start && now < end
    } else {
        now >= start || now < end
    }
}

/// DST-shifted time plus derived day-of-week.
///
/// The +1 hour shift rolls date, month and year forward across midnight so
/// the date view stays consistent with the shifted hour.
pub fn adjust(rule: &DstRule, raw: &ClockTime) -> (ClockTime, u8) {
    let mut t = *raw;
    if in_dst(rule, raw) {
        t.hours += 1;
        if t.hours > 23 {
            t.hours = 0;
            t.date += 1;
            if t.date > days_in_month(t.month, t.year) {
                t.date = 1;
                t.month += 1;
                if t.month > 12 {
                    t.month = 1;
                    t.year = (t.year + 1) % 100;
                }
            }
        }
    }
    let dow = day_of_week(t.date, t.month, t.year);
    (t, dow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(month: u8, date: u8, hours: u8, year: u8) -> ClockTime {
        ClockTime {
            seconds: 0,
            minutes: 0,
            hours,
            date,
            month,
            year,
        }
    }

    // US rule: second Sunday of March to first Sunday of November.
    const US: DstRule = DstRule {
        start_month: 3,
        start_week: 2,
        end_month: 11,
        end_week: 1,
        enabled: true,
    };

    #[test]
    fn known_weekdays() {
        assert_eq!(day_of_week(1, 1, 0), 7); // 2000-01-01 was a Saturday
        assert_eq!(day_of_week(28, 8, 26), 6); // 2026-08-28 is a Friday
        assert_eq!(day_of_week(15, 3, 26), 1); // 2026-03-15 is a Sunday
    }

    #[test]
    fn nth_sunday_2026() {
        assert_eq!(nth_sunday(1, 3, 26), 1);
        assert_eq!(nth_sunday(2, 3, 26), 8); // DST starts 2026-03-08
        assert_eq!(nth_sunday(1, 11, 26), 1); // and ends 2026-11-01
    }

    #[test]
    fn dst_boundaries() {
        assert!(!in_dst(&US, &at(3, 8, 1, 26)));
        assert!(in_dst(&US, &at(3, 8, 2, 26)));
        assert!(in_dst(&US, &at(7, 1, 12, 26)));
        assert!(in_dst(&US, &at(11, 1, 1, 26)));
        assert!(!in_dst(&US, &at(11, 1, 2, 26)));
        assert!(!in_dst(&US, &at(12, 25, 12, 26)));
    }

    #[test]
    fn disabled_rule_never_shifts() {
        let mut rule = US;
        rule.enabled = false;
        let (t, _) = adjust(&rule, &at(7, 1, 12, 26));
        assert_eq!(t.hours, 12);
    }

    #[test]
    fn shift_rolls_over_midnight() {
        let (t, dow) = adjust(&US, &at(6, 30, 23, 26));
        assert_eq!((t.hours, t.date, t.month), (0, 1, 7));
        assert_eq!(dow, day_of_week(1, 7, 26));
    }

    #[test]
    fn shift_rolls_over_new_year() {
        let southern = DstRule {
            start_month: 10,
            start_week: 1,
            end_month: 4,
            end_week: 1,
            enabled: true,
        };
        let (t, _) = adjust(&southern, &at(12, 31, 23, 26));
        assert_eq!((t.hours, t.date, t.month, t.year), (0, 1, 1, 27));
    }

    #[test]
    fn garbage_inputs_do_not_panic() {
        // Cold-start EEPROM garbage can reach this arithmetic; tolerated,
        // not corrected.
        let junk = DstRule {
            start_month: 0,
            start_week: 0,
            end_month: 255,
            end_week: 255,
            enabled: true,
        };
        let _ = adjust(&junk, &at(0, 0, 0, 255));
        let _ = day_of_week(255, 0, 255);
        let _ = nth_sunday(255, 0, 255);
    }
}
