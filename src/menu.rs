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
//! Button-driven settings menu.
//!
//! Entered from the clock view on a set-button press; the scroll
//! controller is suspended until this returns.  A flat list of entries is
//! browsed with +/-, select enters the chosen editor.  Every editor is
//! the same machine over a different field list: a cursor, clamped +/-
//! mutation of the field under it, blink to mark focus, and select
//! walking the fields until the last one commits.
//!
//! The engine is pure: it mutates working copies and reports what to
//! persist as a [`Commit`]; the main loop owns the actual RTC and EEPROM
//! traffic.  There is no abort path, only forward progress to commit.

use crate::buffer::DisplayBuffer;
use crate::buttons::ButtonEvents;
use crate::settings::Settings;
use crate::time::ClockTime;

/// Selectable menu entries, in browse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Time,
    Date,
    Alarm,
    Mode,
    Dst,
    Defaults,
    Done,
}

impl Item {
    fn next(self) -> Self {
        match self {
            Item::Time => Item::Date,
            Item::Date => Item::Alarm,
            Item::Alarm => Item::Mode,
            Item::Mode => Item::Dst,
            Item::Dst => Item::Defaults,
            Item::Defaults | Item::Done => Item::Done,
        }
    }

    fn prev(self) -> Self {
        match self {
            Item::Time | Item::Date => Item::Time,
            Item::Alarm => Item::Date,
            Item::Mode => Item::Alarm,
            Item::Dst => Item::Mode,
            Item::Defaults => Item::Dst,
            Item::Done => Item::Defaults,
        }
    }

    fn label(self) -> &'static [u8; 8] {
        match self {
            Item::Time => b"SET TIME",
            Item::Date => b"SET DATE",
            Item::Alarm => b"ALARM   ",
            Item::Mode => b"12-24   ",
            Item::Dst => b"DST     ",
            Item::Defaults => b"DEFAULTS",
            Item::Done => b"DONE    ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Selecting,
    EditTime { cursor: u8 },
    EditDate { cursor: u8 },
    EditAlarm { cursor: u8 },
    EditDst { cursor: u8 },
    EditMode,
}

/// What the main loop should persist when the menu exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Write the working clock and day-of-week to the RTC, all registers
    /// in one transaction.
    Clock,
    /// Save the working settings to EEPROM.
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Busy,
    /// Leave the menu; back to the scroll controller, not the menu list.
    Exit(Option<Commit>),
}

// Buffer cell ranges (inclusive) per editor field, for blink-blanking.
const TIME_FIELDS: [(usize, usize); 3] = [(0, 1), (2, 3), (4, 5)];
const DATE_FIELDS: [(usize, usize); 4] = [(10, 11), (12, 13), (14, 15), (17, 17)];
const ALARM_FIELDS: [(usize, usize); 3] = [(0, 1), (2, 3), (5, 5)];
const DST_FIELDS: [(usize, usize); 5] = [(0, 1), (2, 2), (4, 5), (6, 6), (7, 7)];

pub struct Menu {
    item: Item,
    state: State,
    blink_hidden: bool,
    /// Working copy of the DST-shifted time as the user sees it.
    pub clock: ClockTime,
    /// Working day-of-week, 1-7.  Editable on its own; not re-derived
    /// until the next natural recomputation after commit.
    pub dow: u8,
    /// Working copy of the persisted settings.
    pub settings: Settings,
    // Hours the displayed time was ahead of the RTC at entry (0 or 1).
    dst_shift: u8,
}

/// Clamped step; no wraparound at either bound.
fn bump(v: u8, min: u8, max: u8, up: bool) -> u8 {
    if up {
        if v < max {
            v + 1
        } else {
            v
        }
    } else if v > min {
        v - 1
    } else {
        v
    }
}

impl Menu {
    pub fn enter(clock: ClockTime, dow: u8, settings: Settings, dst_shift: u8) -> Self {
        Menu {
            item: Item::Time,
            state: State::Selecting,
            blink_hidden: false,
            clock,
            dow,
            settings,
            dst_shift,
        }
    }

    /// One scheduler tick: toggle the blink phase, apply this tick's
    /// button edges, and report whether the menu is done.
    pub fn step(&mut self, ev: ButtonEvents) -> Step {
        self.blink_hidden = !self.blink_hidden;
        match self.state {
            State::Selecting => self.select_entry(ev),
            State::EditTime { cursor } => self.edit_time(cursor, ev),
            State::EditDate { cursor } => self.edit_date(cursor, ev),
            State::EditAlarm { cursor } => self.edit_alarm(cursor, ev),
            State::EditDst { cursor } => self.edit_dst(cursor, ev),
            State::EditMode => self.edit_mode(ev),
        }
    }

    fn select_entry(&mut self, ev: ButtonEvents) -> Step {
        if ev.plus {
            self.item = self.item.next();
        } else if ev.minus {
            self.item = self.item.prev();
        }
        if ev.select {
            match self.item {
                Item::Time => self.state = State::EditTime { cursor: 0 },
                Item::Date => self.state = State::EditDate { cursor: 0 },
                Item::Alarm => self.state = State::EditAlarm { cursor: 0 },
                Item::Mode => self.state = State::EditMode,
                Item::Dst => self.state = State::EditDst { cursor: 0 },
                Item::Defaults => {
                    self.settings = Settings::default();
                    return Step::Exit(Some(Commit::Settings));
                }
                Item::Done => return Step::Exit(None),
            }
        }
        Step::Busy
    }

    /// Commit whatever the clock editors produced.  The user saw and
    /// edited DST-shifted time; the RTC stores standard time, so the
    /// shift captured at entry comes back off here.
    fn commit_clock(&mut self) -> Step {
        self.clock.hours = (self.clock.hours + 24 - self.dst_shift) % 24;
        Step::Exit(Some(Commit::Clock))
    }

    fn edit_time(&mut self, cursor: u8, ev: ButtonEvents) -> Step {
        if ev.plus || ev.minus {
            let c = &mut self.clock;
            match cursor {
                0 => c.hours = bump(c.hours, 0, 23, ev.plus),
                1 => c.minutes = bump(c.minutes, 0, 59, ev.plus),
                _ => c.seconds = bump(c.seconds, 0, 59, ev.plus),
            }
        }
        if ev.select {
            if cursor < 2 {
                self.state = State::EditTime { cursor: cursor + 1 };
            } else {
                return self.commit_clock();
            }
        }
        Step::Busy
    }

    fn edit_date(&mut self, cursor: u8, ev: ButtonEvents) -> Step {
        if ev.plus || ev.minus {
            let c = &mut self.clock;
            match cursor {
                0 => c.month = bump(c.month, 1, 12, ev.plus),
                1 => c.date = bump(c.date, 1, 31, ev.plus),
                2 => c.year = bump(c.year, 0, 99, ev.plus),
                _ => self.dow = bump(self.dow, 1, 7, ev.plus),
            }
        }
        if ev.select {
            if cursor < 3 {
                self.state = State::EditDate { cursor: cursor + 1 };
            } else {
                return self.commit_clock();
            }
        }
        Step::Busy
    }

    fn edit_alarm(&mut self, cursor: u8, ev: ButtonEvents) -> Step {
        if ev.plus || ev.minus {
            let a = &mut self.settings.alarm;
            match cursor {
                0 => a.hour = bump(a.hour, 0, 23, ev.plus),
                1 => a.minute = bump(a.minute, 0, 59, ev.plus),
                // Discrete mode list, stepped not incremented.
                _ => {
                    a.mode = if ev.plus { a.mode.next() } else { a.mode.prev() };
                }
            }
        }
        if ev.select {
            if cursor < 2 {
                self.state = State::EditAlarm { cursor: cursor + 1 };
            } else {
                return Step::Exit(Some(Commit::Settings));
            }
        }
        Step::Busy
    }

    fn edit_dst(&mut self, cursor: u8, ev: ButtonEvents) -> Step {
        if ev.plus || ev.minus {
            let d = &mut self.settings.dst;
            match cursor {
                0 => d.start_month = bump(d.start_month, 1, 12, ev.plus),
                1 => d.start_week = bump(d.start_week, 1, 4, ev.plus),
                2 => d.end_month = bump(d.end_month, 1, 12, ev.plus),
                3 => d.end_week = bump(d.end_week, 1, 4, ev.plus),
                // Single-bit field: toggled, never stepped past a bound.
                _ => d.enabled = !d.enabled,
            }
        }
        if ev.select {
            if cursor < 4 {
                self.state = State::EditDst { cursor: cursor + 1 };
            } else {
                return Step::Exit(Some(Commit::Settings));
            }
        }
        Step::Busy
    }

    fn edit_mode(&mut self, ev: ButtonEvents) -> Step {
        if ev.plus || ev.minus {
            self.settings.twelve_hour = !self.settings.twelve_hour;
        }
        if ev.select {
            return Step::Exit(Some(Commit::Settings));
        }
        Step::Busy
    }

    /// Build this tick's display: the rebuilt buffer with the menu
    /// overlay or blink-blanking applied, plus the window position to
    /// show (the date editor looks at the date half).
    pub fn render(&self) -> (DisplayBuffer, u8) {
        let mut b = DisplayBuffer::rebuild(
            &self.clock,
            self.dow,
            self.settings.twelve_hour,
            &self.settings.alarm,
        );
        let mut left = 0;
        match self.state {
            State::Selecting => b.overlay(0, self.item.label()),
            State::EditTime { cursor } => {
                self.blink(&mut b, TIME_FIELDS[cursor as usize]);
            }
            State::EditDate { cursor } => {
                left = 10;
                self.blink(&mut b, DATE_FIELDS[cursor as usize]);
            }
            State::EditAlarm { cursor } => {
                let a = &self.settings.alarm;
                b.blank(0, 7);
                b.two_digits(0, a.hour, true, false);
                b.two_digits(2, a.minute, true, false);
                b.set(5, b'0' + a.mode as u8, false);
                b.set(7, b'A', a.mode != crate::settings::AlarmMode::Off);
                self.blink(&mut b, ALARM_FIELDS[cursor as usize]);
            }
            State::EditDst { cursor } => {
                let d = &self.settings.dst;
                b.blank(0, 7);
                b.two_digits(0, d.start_month, true, false);
                b.set(2, b'0' + d.start_week, false);
                b.two_digits(4, d.end_month, true, false);
                b.set(6, b'0' + d.end_week, false);
                b.set(7, b'0' + d.enabled as u8, false);
                self.blink(&mut b, DST_FIELDS[cursor as usize]);
            }
            State::EditMode => {
                b.blank(0, 7);
                b.overlay(0, if self.settings.twelve_hour { b"12" } else { b"24" });
                self.blink(&mut b, (0, 1));
            }
        }
        (b, left)
    }

    fn blink(&self, b: &mut DisplayBuffer, field: (usize, usize)) {
        if self.blink_hidden {
            b.blank(field.0, field.1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BUFFER_CELLS;
    use crate::settings::AlarmMode;

    const NONE: ButtonEvents = ButtonEvents::NONE;
    const PLUS: ButtonEvents = ButtonEvents {
        select: false,
        minus: false,
        plus: true,
    };
    const MINUS: ButtonEvents = ButtonEvents {
        select: false,
        minus: true,
        plus: false,
    };
    const SELECT: ButtonEvents = ButtonEvents {
        select: true,
        minus: false,
        plus: false,
    };

    fn menu_at(hours: u8, minutes: u8, seconds: u8) -> Menu {
        let clock = ClockTime {
            seconds,
            minutes,
            hours,
            date: 28,
            month: 8,
            year: 26,
        };
        Menu::enter(clock, 6, Settings::default(), 0)
    }

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut m = menu_at(12, 0, 0);
        assert_eq!(m.step(MINUS), Step::Busy);
        assert_eq!(m.item, Item::Time); // no-op at the first entry
        for _ in 0..10 {
            m.step(PLUS);
        }
        assert_eq!(m.item, Item::Done); // clamped at the last
    }

    #[test]
    fn done_exits_without_commit() {
        let mut m = menu_at(12, 0, 0);
        for _ in 0..6 {
            m.step(PLUS);
        }
        assert_eq!(m.step(SELECT), Step::Exit(None));
    }

    #[test]
    fn defaults_entry_resets_and_saves() {
        let mut m = menu_at(12, 0, 0);
        m.settings.twelve_hour = false;
        for _ in 0..5 {
            m.step(PLUS);
        }
        assert_eq!(m.item, Item::Defaults);
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Settings)));
        assert_eq!(m.settings, Settings::default());
    }

    #[test]
    fn time_editor_clamps_fields() {
        let mut m = menu_at(0, 59, 30);
        m.step(SELECT); // enter the time editor, cursor on hours
        m.step(MINUS);
        assert_eq!(m.clock.hours, 0); // decrement at 0 is a no-op
        m.step(SELECT); // minutes
        m.step(PLUS);
        assert_eq!(m.clock.minutes, 59); // increment at 59 is a no-op
        m.step(MINUS);
        assert_eq!(m.clock.minutes, 58);
    }

    #[test]
    fn time_editor_commits_on_last_field() {
        let mut m = menu_at(10, 20, 30);
        m.step(SELECT);
        m.step(SELECT);
        m.step(SELECT); // cursor on seconds
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Clock)));
        assert_eq!(m.clock.hours, 10);
    }

    #[test]
    fn commit_subtracts_the_dst_shift_seen_at_entry() {
        // Raw hour 1 shifted to displayed hour 2; the user edits the
        // display up to 3; the RTC must be written with 2.
        let clock = ClockTime {
            seconds: 0,
            minutes: 0,
            hours: 2,
            date: 15,
            month: 6,
            year: 26,
        };
        let mut m = Menu::enter(clock, 2, Settings::default(), 1);
        m.step(SELECT); // time editor
        m.step(PLUS); // hour 2 -> 3
        assert_eq!(m.clock.hours, 3);
        m.step(SELECT);
        m.step(SELECT);
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Clock)));
        assert_eq!(m.clock.hours, 2);
    }

    #[test]
    fn no_shift_commit_is_identity() {
        let mut m = menu_at(0, 0, 0);
        m.step(SELECT);
        m.step(SELECT);
        m.step(SELECT);
        m.step(SELECT);
        assert_eq!(m.clock.hours, 0);
    }

    #[test]
    fn date_editor_edits_dow_independently() {
        let mut m = menu_at(12, 0, 0);
        m.step(PLUS); // Date
        m.step(SELECT);
        m.step(SELECT);
        m.step(SELECT);
        m.step(SELECT); // cursor on day-of-week
        m.step(PLUS);
        assert_eq!(m.dow, 7);
        m.step(PLUS);
        assert_eq!(m.dow, 7); // clamped
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Clock)));
    }

    #[test]
    fn alarm_mode_walks_the_list_and_clamps() {
        let mut m = menu_at(12, 0, 0);
        m.step(PLUS);
        m.step(PLUS); // Alarm
        m.step(SELECT);
        m.step(SELECT);
        m.step(SELECT); // cursor on mode
        let modes: [AlarmMode; 4] = [
            AlarmMode::Weekends,
            AlarmMode::Weekdays,
            AlarmMode::EveryDay,
            AlarmMode::EveryDay, // clamped
        ];
        for want in modes {
            m.step(PLUS);
            assert_eq!(m.settings.alarm.mode, want);
        }
        m.step(MINUS);
        assert_eq!(m.settings.alarm.mode, AlarmMode::Weekdays);
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Settings)));
    }

    #[test]
    fn dst_enable_toggles_both_ways() {
        let mut m = menu_at(12, 0, 0);
        for _ in 0..4 {
            m.step(PLUS);
        }
        assert_eq!(m.item, Item::Dst);
        m.step(SELECT);
        for _ in 0..4 {
            m.step(SELECT); // walk to the enable bit
        }
        m.step(PLUS);
        assert!(!m.settings.dst.enabled);
        m.step(MINUS);
        assert!(m.settings.dst.enabled);
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Settings)));
    }

    #[test]
    fn mode_editor_toggles_and_commits() {
        let mut m = menu_at(12, 0, 0);
        for _ in 0..3 {
            m.step(PLUS);
        }
        assert_eq!(m.item, Item::Mode);
        m.step(SELECT);
        m.step(PLUS);
        assert!(!m.settings.twelve_hour);
        assert_eq!(m.step(SELECT), Step::Exit(Some(Commit::Settings)));
    }

    #[test]
    fn blink_touches_only_the_focused_field() {
        let mut m = menu_at(13, 5, 0);
        m.step(SELECT); // time editor, hours focused
        m.step(SELECT); // minutes focused (cells 2-3)
        m.step(NONE);
        let (a, _) = m.render();
        m.step(NONE);
        let (b, _) = m.render();
        // One render pass has the field blanked, the other shows it.
        assert_ne!(a.cells()[2..=3], b.cells()[2..=3]);
        for i in (0..BUFFER_CELLS).filter(|i| !(2..=3).contains(i)) {
            assert_eq!(a.cells()[i], b.cells()[i], "cell {}", i);
        }
    }

    #[test]
    fn date_editor_looks_at_the_date_half() {
        let mut m = menu_at(12, 0, 0);
        m.step(PLUS);
        m.step(SELECT);
        let (_, left) = m.render();
        assert_eq!(left, 10);
        let (_, left) = menu_at(12, 0, 0).render();
        assert_eq!(left, 0);
    }

    #[test]
    fn selecting_shows_the_entry_label() {
        let m = menu_at(12, 0, 0);
        let (b, _) = m.render();
        let shown: [u8; 8] = core::array::from_fn(|i| b.cells()[i].glyph);
        assert_eq!(&shown, b"SET TIME");
    }
}
