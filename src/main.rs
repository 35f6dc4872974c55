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
//! Bubble-display clock firmware.
//!
//! Target: ATmega168 at 16 MHz, DS3231 RTC on the two-wire bus, an eight
//! character seven-segment bubble display behind a MAX7219, three buttons
//! (set, -, +) and a piezo buzzer.
//!
//! One cooperative loop does everything, paced by a busy-wait tick of
//! [`window::TICK_MS`].  The RTC's 1 Hz square wave raises a flag in an
//! interrupt handler; the loop re-reads the clock when it sees it,
//! applies the DST rule, and rebuilds the display buffer wholesale.  The
//! rest of the tick goes to the scroll/window animation or, after a set
//! press, to the settings menu.

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(not(target_arch = "avr"), allow(dead_code))]

mod alarm;
mod buffer;
mod buttons;
mod ds3231;
mod dst;
mod max7219;
mod menu;
mod segment;
mod settings;
mod time;
mod window;

#[cfg(target_arch = "avr")]
mod timer;

#[cfg(all(target_arch = "avr", feature = "panic-serial"))]
mod panic;
#[cfg(all(target_arch = "avr", not(feature = "panic-serial")))]
use panic_halt as _;

#[cfg(target_arch = "avr")]
mod firmware {
    use embedded_hal::digital::OutputPin;

    use crate::alarm;
    use crate::buffer::DisplayBuffer;
    use crate::buttons::Buttons;
    use crate::ds3231;
    use crate::dst;
    use crate::max7219::Max7219;
    use crate::menu::{Commit, Menu, Step};
    use crate::settings::Settings;
    use crate::time::ClockTime;
    use crate::timer;
    use crate::window::{Window, TICK_MS};

    enum Ui {
        Clock,
        Menu(Menu),
    }

    /// Slice the visible window out of the buffer and push it to the
    /// driver, leftmost visible cell to the highest-numbered digit.
    fn push_window<DIN, CLK, LOAD>(
        display: &mut Max7219<DIN, CLK, LOAD, 1>,
        buf: &DisplayBuffer,
        left: u8,
    ) where
        DIN: OutputPin,
        CLK: OutputPin,
        LOAD: OutputPin,
    {
        for (i, cell) in buf.window(left).iter().enumerate() {
            display.set_digit(0, 7 - i, cell.glyph, cell.dot);
        }
        display.flush();
    }

    #[arduino_hal::entry]
    fn main() -> ! {
        let dp = arduino_hal::Peripherals::take().unwrap();
        let pins = arduino_hal::pins!(dp);
        let mut serial = arduino_hal::default_serial!(dp, pins, 19200);

        let mut i2c = arduino_hal::I2c::new(
            dp.TWI,
            pins.a4.into_pull_up_input(),
            pins.a5.into_pull_up_input(),
            50000,
        );

        let mut eeprom = arduino_hal::Eeprom::new(dp.EEPROM);
        let mut settings = Settings::new(&eeprom);

        let mut display: Max7219<_, _, _, 1> = Max7219::new(
            pins.d11.into_output(),
            pins.d13.into_output(),
            pins.d10.into_output(),
        );
        display.init();

        // Buttons, active low.
        let btn_plus = pins.d5.into_pull_up_input();
        let btn_minus = pins.d6.into_pull_up_input();
        let btn_select = pins.d7.into_pull_up_input();

        let mut buzzer = pins.d9.into_output();

        // RTC square wave into INT0.
        let _rtc_sqw = pins.d2.into_pull_up_input();
        timer::init_tc0(dp.TC0);
        timer::init_int0(&dp.EXINT);

        if ds3231::init(&mut i2c).is_err() {
            ufmt::uwriteln!(&mut serial, "rtc init failed\r").ok();
        }
        let mut raw = match ds3231::read_clock(&mut i2c) {
            Ok((t, _)) => t,
            Err(_) => {
                ufmt::uwriteln!(&mut serial, "rtc read failed\r").ok();
                ClockTime::new()
            }
        };

        // SAFETY: interrupt handlers only touch Mutex'd cells.
        unsafe { avr_device::interrupt::enable() };

        ufmt::uwriteln!(&mut serial, "bubbleclock up\r").ok();

        let mut buttons = Buttons::new();
        let mut win = Window::new();
        let mut ui = Ui::Clock;

        loop {
            let tick_start = timer::millis();

            // Any pending 1 Hz tick refreshes the cached time first, so
            // a menu commit later this tick can't interleave with it on
            // the bus.  Failures keep the old cache and get one log line.
            if timer::take_tick() {
                match ds3231::read_clock(&mut i2c) {
                    Ok((t, _)) => raw = t,
                    Err(_) => {
                        ufmt::uwriteln!(&mut serial, "rtc read failed\r").ok();
                    }
                }
            }
            let (shown, dow) = dst::adjust(&settings.dst, &raw);

            let ev = buttons.take();
            let mut enter_menu = false;
            let mut exit_menu = false;

            match &mut ui {
                Ui::Clock => {
                    if ev.select {
                        enter_menu = true;
                    } else {
                        if ev.plus {
                            win.show_date();
                        }
                        win.tick();
                        let buf = DisplayBuffer::rebuild(
                            &shown,
                            dow,
                            settings.twelve_hour,
                            &settings.alarm,
                        );
                        push_window(&mut display, &buf, win.left());

                        // Beep on odd seconds for the matching minute.
                        if alarm::should_sound(&settings.alarm, &shown, dow)
                            && shown.seconds & 1 == 1
                        {
                            buzzer.set_high();
                        } else {
                            buzzer.set_low();
                        }
                    }
                }
                Ui::Menu(menu) => match menu.step(ev) {
                    Step::Busy => {
                        let (buf, left) = menu.render();
                        push_window(&mut display, &buf, left);
                    }
                    Step::Exit(commit) => {
                        match commit {
                            Some(Commit::Clock) => {
                                if ds3231::write_clock(&mut i2c, &menu.clock, menu.dow).is_err() {
                                    ufmt::uwriteln!(&mut serial, "rtc write failed\r").ok();
                                }
                                raw = menu.clock;
                                ufmt::uwriteln!(&mut serial, "clock set\r").ok();
                            }
                            Some(Commit::Settings) => {
                                settings = menu.settings;
                                settings.save(&mut eeprom);
                                ufmt::uwriteln!(&mut serial, "settings saved\r").ok();
                            }
                            None => {}
                        }
                        exit_menu = true;
                    }
                },
            }

            if enter_menu {
                win.reset();
                buzzer.set_low();
                let dst_shift = (shown.hours + 24 - raw.hours) % 24;
                ui = Ui::Menu(Menu::enter(shown, dow, settings, dst_shift));
            }
            if exit_menu {
                win.reset();
                ui = Ui::Clock;
            }

            // This busy-wait is the scheduler: it paces scroll and blink
            // while sampling the buttons often enough that presses land
            // between ticks without being lost.
            loop {
                buttons.sample(btn_select.is_low(), btn_minus.is_low(), btn_plus.is_low());
                if timer::millis().wrapping_sub(tick_start) >= TICK_MS {
                    break;
                }
                arduino_hal::delay_ms(2);
            }
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
