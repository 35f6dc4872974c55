//! Tick sources: a millisecond counter and the RTC's 1 Hz flag.
//!
//! Timer/Counter 0 provides `millis()` for pacing the scroll/blink loop,
//! following the walkthrough at <https://blog.rahix.de/005-avr-hal-millis/>.
//! INT0 catches the RTC's 1 Hz square wave; its handler only sets a flag
//! and never touches the two-wire bus, so it can't collide with the main
//! loop's own bus traffic.

use avr_device::interrupt::Mutex;
use core::cell;

// Possible Values:
//
// ╔═══════════╦══════════════╦═══════════════════╗
// ║ PRESCALER ║ TIMER_COUNTS ║ Overflow Interval ║
// ╠═══════════╬══════════════╬═══════════════════╣
// ║        64 ║          250 ║              1 ms ║
// ║       256 ║          125 ║              2 ms ║
// ║       256 ║          250 ║              4 ms ║
// ║      1024 ║          125 ║              8 ms ║
// ║      1024 ║          250 ║             16 ms ║
// ╚═══════════╩══════════════╩═══════════════════╝
const PRESCALER: u32 = 64;
const TIMER_COUNTS: u32 = 250;

const MILLIS_INCREMENT: u16 = (PRESCALER * TIMER_COUNTS / 16000) as _;

static MILLIS_COUNTER: Mutex<cell::Cell<u16>> = Mutex::new(cell::Cell::new(0));

// Set by the INT0 handler on each 1 Hz edge from the RTC.
static TICK_FLAG: Mutex<cell::Cell<bool>> = Mutex::new(cell::Cell::new(false));

/// Timer/Counter 0 Compare Match A interrupt service routine.
#[avr_device::interrupt(atmega168)]
fn TIMER0_COMPA() {
    avr_device::interrupt::free(|cs| {
        let counter_cell = MILLIS_COUNTER.borrow(cs);
        let counter = counter_cell.get();
        counter_cell.set(counter.wrapping_add(MILLIS_INCREMENT));
    })
}

/// 1 Hz square-wave edge from the RTC.  Flag only; all real work (bus
/// reads, buffer rebuild) happens in the main loop.
#[avr_device::interrupt(atmega168)]
fn INT0() {
    avr_device::interrupt::free(|cs| {
        TICK_FLAG.borrow(cs).set(true);
    })
}

/// Milliseconds counted since `init_tc0()`, wrapping at 65536.  Compare
/// with `wrapping_sub`.
pub fn millis() -> u16 {
    avr_device::interrupt::free(|cs| MILLIS_COUNTER.borrow(cs).get())
}

/// Consume the 1 Hz flag.  The read-and-clear runs with interrupts
/// masked so a tick firing mid-clear can't be lost.
pub fn take_tick() -> bool {
    avr_device::interrupt::free(|cs| {
        let flag = TICK_FLAG.borrow(cs);
        let ticked = flag.get();
        flag.set(false);
        ticked
    })
}

/// Initialise Timer/Counter 0 in CTC mode for the interval set by
/// PRESCALER and TIMER_COUNTS.
pub fn init_tc0(tc0: arduino_hal::pac::TC0) {
    tc0.tccr0a.write(|w| w.wgm0().ctc());
    tc0.ocr0a.write(|w| w.bits(TIMER_COUNTS as u8));
    tc0.tccr0b.write(|w| match PRESCALER {
        1 => w.cs0().direct(),
        8 => w.cs0().prescale_8(),
        64 => w.cs0().prescale_64(),
        256 => w.cs0().prescale_256(),
        1024 => w.cs0().prescale_1024(),
        _ => panic!(),
    });
    tc0.timsk0.write(|w| w.ocie0a().set_bit());

    avr_device::interrupt::free(|cs| {
        MILLIS_COUNTER.borrow(cs).set(0);
    });
}

/// Arm INT0 on the falling edge of the RTC square-wave pin (PD2).
pub fn init_int0(exint: &arduino_hal::pac::EXINT) {
    // ISC01:ISC00 = 10, falling edge.
    exint.eicra.modify(|_, w| w.isc0().bits(0b10));
    exint.eimsk.modify(|_, w| w.int0().set_bit());
}
