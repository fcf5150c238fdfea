//! Raspberry Pi Pico wiring and HAL adapters

use cortex_m::peripheral::NVIC;
use embedded_hal::adc::OneShot;
use rp_pico::hal::{
    adc::{Adc, AdcPin},
    fugit::ExtU32,
    pac,
    gpio::{
        bank0::{Gpio14, Gpio15, Gpio26, Gpio4, Gpio7, Gpio8},
        FunctionSio, Pin, PullDown, PullNone, PullUp, SioInput, SioOutput,
    },
    timer::{Alarm, Alarm0},
};
use rtic::Mutex;
use voltclock::config::{Timing, ADC_FULL_SCALE};
use voltclock::shift_register::ShiftRegister;
use voltclock::voltmeter::AnalogInput;
use voltclock::{ElapsedTime, Instrument, TimeSource};

type Output<I> = Pin<I, FunctionSio<SioOutput>, PullDown>;
type Button<I> = Pin<I, FunctionSio<SioInput>, PullUp>;

// GP4 - shift register latch (ST_CP)
pub type LatchPin = Output<Gpio4>;
// GP7 - shift register clock (SH_CP)
pub type ClockPin = Output<Gpio7>;
// GP8 - shift register serial data (DS)
pub type DataPin = Output<Gpio8>;
// GP14 - reset button to GND
pub type ResetButton = Button<Gpio14>;
// GP15 - voltmeter button to GND
pub type ModeButton = Button<Gpio15>;
// GP26 - ADC0 sense input
pub type SensePin = AdcPin<Pin<Gpio26, FunctionSio<SioInput>, PullNone>>;

pub type Display = ShiftRegister<DataPin, ClockPin, LatchPin>;
pub type Board = Instrument<Display, ResetButton, ModeButton, SenseInput, cortex_m::delay::Delay>;

pub struct SenseInput {
    adc: Adc,
    pin: SensePin,
}

impl SenseInput {
    pub fn new(adc: Adc, pin: SensePin) -> Self {
        SenseInput { adc, pin }
    }
}

impl AnalogInput for SenseInput {
    fn read_normalized(&mut self) -> Option<f32> {
        let raw: u16 = self.adc.read(&mut self.pin).ok()?;
        Some(raw as f32 / ADC_FULL_SCALE as f32)
    }
}

/// Main loop view of the time kept by `timer_tick`.
///
/// Every access goes through the RTIC lock, so the tick can never land
/// between reading `minutes` and `seconds`.
pub struct SharedTime<C, A> {
    clock: C,
    alarm: A,
}

impl<C, A> SharedTime<C, A>
where
    C: Mutex<T = ElapsedTime>,
    A: Mutex<T = Alarm0>,
{
    pub fn new(clock: C, alarm: A) -> Self {
        SharedTime { clock, alarm }
    }
}

impl<C, A> TimeSource for SharedTime<C, A>
where
    C: Mutex<T = ElapsedTime>,
    A: Mutex<T = Alarm0>,
{
    fn snapshot(&mut self) -> ElapsedTime {
        self.clock.lock(|clock| *clock)
    }

    fn reset(&mut self) {
        let alarm = &mut self.alarm;
        self.clock.lock(|clock| {
            clock.reset();
            // Restart the second so the cleared time holds for a full period
            alarm.lock(|alarm| {
                alarm.clear_interrupt();
                alarm.schedule(Timing::DEFAULT.tick_period_us.micros()).ok();
            });
            // A tick that fell due while locked would otherwise run on exit
            NVIC::unpend(pac::Interrupt::TIMER_IRQ_0);
        });
    }
}
