#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod board;

#[cfg(target_os = "none")]
use {defmt_rtt as _, panic_probe as _};

#[cfg(target_os = "none")]
#[rtic::app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use crate::board::{Board, SenseInput, SharedTime};
    use defmt::{info, warn};
    use rp_pico::hal::{
        adc::{Adc, AdcPin},
        clocks::{init_clocks_and_plls, Clock},
        fugit::ExtU32,
        sio::Sio,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
    };
    use voltclock::config::Timing;
    use voltclock::shift_register::ShiftRegister;
    use voltclock::{ElapsedTime, Error, Instrument, Readout};

    // Shared resources (tick interrupt and main loop)
    #[shared]
    struct Shared {
        clock: ElapsedTime,
        alarm: Alarm0,
    }

    // Local resources (main loop only)
    #[local]
    struct Local {
        instrument: Board,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);
        let timing = Timing::DEFAULT;

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        // First tick one period after boot
        alarm.schedule(timing.tick_period_us.micros()).unwrap();
        alarm.enable_interrupt();

        let delay = cortex_m::delay::Delay::new(ctx.core.SYST, clocks.system_clock.freq().to_Hz());

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let display = ShiftRegister::new(
            pins.gpio8.into_push_pull_output(),
            pins.gpio7.into_push_pull_output(),
            pins.gpio4.into_push_pull_output(),
        );
        let reset = pins.gpio14.into_pull_up_input();
        let mode = pins.gpio15.into_pull_up_input();

        let adc = Adc::new(pac.ADC, &mut pac.RESETS);
        let sense = AdcPin::new(pins.gpio26.into_floating_input()).unwrap();

        info!("voltclock start");
        info!("  shift register: data GP8, clock GP7, latch GP4");
        info!("  buttons: reset GP14, volts GP15 (active low)");
        info!("  sense: GP26/ADC0");
        info!(
            "  dwell {=u32} ms, debounce {=u32} ms",
            timing.digit_dwell_ms,
            timing.reset_debounce_ms
        );

        let instrument = Instrument::new(
            display,
            reset,
            mode,
            SenseInput::new(adc, sense),
            delay,
            timing,
        );

        (
            Shared {
                clock: ElapsedTime::default(),
                alarm,
            },
            Local { instrument },
            init::Monotonics(),
        )
    }

    // Foreground loop: buttons, sampling, multiplexing
    #[idle(shared = [clock, alarm], local = [instrument])]
    fn idle(ctx: idle::Context) -> ! {
        let mut time = SharedTime::new(ctx.shared.clock, ctx.shared.alarm);
        let mut resetting = false;
        let mut showing_volts = false;

        ctx.local.instrument.run(&mut time, |step, extrema| match step {
            Ok(step) => {
                if step.reset && !resetting {
                    info!("clock reset");
                }
                resetting = step.reset;

                let volts = matches!(step.readout, Readout::Volts(_));
                if volts != showing_volts {
                    showing_volts = volts;
                    info!(
                        "showing {=u32} volts={=bool} (min {=f32} V, max {=f32} V)",
                        step.readout.value(),
                        volts,
                        extrema.lowest,
                        extrema.highest
                    );
                }
            }
            Err(Error::Adc) => warn!("sense input not ready"),
            Err(Error::Pin(never)) => match never {},
        })
    }

    // Hardware Task: Timer Interrupt (1Hz)
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [clock, alarm])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        // Clear interrupt and schedule next
        ctx.shared.alarm.lock(|alarm| {
            alarm.clear_interrupt();
            alarm
                .schedule(Timing::DEFAULT.tick_period_us.micros())
                .ok();
        });

        ctx.shared.clock.lock(|clock| clock.tick());
    }
}

// Only the library builds for the host.
#[cfg(not(target_os = "none"))]
fn main() {}
