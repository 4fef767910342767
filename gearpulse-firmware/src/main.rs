//! GearPulse - PC Hardware Monitor Firmware
//!
//! Main firmware binary for RP2040 boards driving a 16x2 character LCD.
//! The host streams JSON telemetry over UART0; a touch sensor cycles the
//! views and toggles power.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use gearpulse_core::config::TouchConfig;
use gearpulse_core::traits::RngSource;
use gearpulse_core::Monitor;
use gearpulse_display::CharDisplay;
use gearpulse_drivers::lcd::Hd44780;
use gearpulse_hal::i2c::I2cConfig;
use gearpulse_hal::ActiveLevel;
use gearpulse_hal_rp2040::adc::noise_seed;
use gearpulse_hal_rp2040::gpio::TouchInput;
use gearpulse_hal_rp2040::i2c::{controller_config, HalI2c};
use gearpulse_hal_rp2040::pins::PinBank;
use gearpulse_hal_rp2040::uart::config_8n1;

use crate::tasks::control::now_ms;

// Heap allocator for JSON documents
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB
const HEAP_SIZE: usize = 32 * 1024;

mod board;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Park spare GPIOs in the bank under their numbers
macro_rules! park_pins {
    ($bank:expr, $p:expr, $($num:literal => $pin:ident),* $(,)?) => {
        $( let _ = $bank.insert($num, $p.$pin.into()); )*
    };
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("GearPulse firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    board::check_wiring(&config);

    // Seed the random source from a floating ADC input
    let mut adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let mut seed_channel = Channel::new_pin(p.PIN_26, Pull::None);
    let seed = match noise_seed(&mut adc, &mut seed_channel).await {
        Ok(seed) => seed,
        Err(e) => {
            warn!("ADC seed failed: {:?}, using boot time", e);
            embassy_time::Instant::now().as_ticks()
        }
    };
    let rng = RngSource::new(SmallRng::seed_from_u64(seed));
    debug!("Random seed {=u64:x}", seed);

    // Setup UART0 for host telemetry (TX=GPIO0, RX=GPIO1)
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, config_8n1(config.serial.baud_rate));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.serial.baud_rate);

    // Setup I2C0 for the LCD backpack (SDA=GPIO4, SCL=GPIO5)
    let i2c = I2c::new_blocking(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        controller_config(I2cConfig::STANDARD),
    );

    let mut lcd = Hd44780::new(
        HalI2c::new(i2c),
        Delay,
        config.display.i2c_address,
        config.display.columns,
    );
    match lcd.init() {
        Ok(()) => match lcd.load_glyphs() {
            Ok(()) => info!("LCD initialized at {=u8:#x}", config.display.i2c_address),
            Err(e) => error!("Failed to load LCD glyphs: {}", e),
        },
        Err(e) => error!("Failed to initialize LCD: {}, control loop will retry", e),
    }

    // Touch sensor on a config-selected GPIO
    let mut bank = PinBank::new();
    park_pins!(bank, p,
        2 => PIN_2, 3 => PIN_3, 6 => PIN_6, 7 => PIN_7, 8 => PIN_8,
        9 => PIN_9, 10 => PIN_10, 11 => PIN_11, 12 => PIN_12, 13 => PIN_13,
        14 => PIN_14, 15 => PIN_15, 16 => PIN_16, 17 => PIN_17, 18 => PIN_18,
        19 => PIN_19, 20 => PIN_20, 21 => PIN_21, 22 => PIN_22, 27 => PIN_27,
        28 => PIN_28,
    );

    let (touch_num, touch_pin) = match bank.take(config.touch.pin) {
        Ok(pin) => (config.touch.pin, pin),
        Err(e) => {
            let fallback = TouchConfig::default().pin;
            warn!(
                "Touch pin gpio{} unavailable ({}), using gpio{}",
                config.touch.pin, e, fallback
            );
            (fallback, unwrap!(bank.take(fallback)))
        }
    };
    let level = if config.touch.active_high {
        ActiveLevel::High
    } else {
        ActiveLevel::Low
    };
    let touch = TouchInput::new(touch_pin, level);

    info!("Touch input initialized on gpio{}", touch_num);

    let monitor = Monitor::new(lcd, rng, &config, now_ms());

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::control_task(
            monitor,
            touch,
            config.poll.poll_interval_ms,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
