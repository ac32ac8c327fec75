//! Sandglass - LED Matrix Hourglass Firmware
//!
//! Main firmware binary for RP2040-based hourglass boards: two daisy-chained
//! MAX7219 8x8 panels, an MPU-6050 tilt sensor, a piezo buzzer and a
//! line-oriented serial console.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Instant;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sandglass_core::Hourglass;
use sandglass_drivers::display::Max7219;
use sandglass_drivers::sensor::Mpu6050;

use crate::board::{EmbassyClock, SignalBuzzer};
use crate::config::load_config;

/// Embedded configuration (compiled into firmware)
/// Edit sandglass.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../sandglass.toml");

/// SPI clock for the MAX7219 chain (the part tops out at 10 MHz)
const SPI_FREQUENCY_HZ: u32 = 1_000_000;

/// I2C clock for the MPU-6050
const I2C_FREQUENCY_HZ: u32 = 400_000;

mod board;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sandglass firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config(EMBEDDED_CONFIG);

    // Setup UART for the serial console
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = config.serial.baud_rate;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.serial.baud_rate);

    // Setup SPI0 for the MAX7219 chain (CLK=GPIO18, DIN=GPIO19, CS=GPIO17)
    let spi_config = {
        let mut cfg = SpiConfig::default();
        cfg.frequency = SPI_FREQUENCY_HZ;
        cfg
    };
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);

    let mut display = Max7219::new(spi, cs, config.display);
    match display.init() {
        Ok(()) => info!("Display initialized"),
        Err(e) => error!("Display init failed: {:?}", e),
    }

    // Setup I2C0 for the MPU-6050 (SDA=GPIO4, SCL=GPIO5)
    let i2c_config = {
        let mut cfg = I2cConfig::default();
        cfg.frequency = I2C_FREQUENCY_HZ;
        cfg
    };
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let mut sensor = Mpu6050::new(i2c, config.orientation);
    match sensor.init() {
        Ok(()) => info!("Tilt sensor initialized"),
        Err(e) => error!("Tilt sensor init failed: {:?}", e),
    }

    // Seed the sand tie-breaks from accelerometer noise and boot timing
    let noise = match sensor.read_accel() {
        Ok((x, y, z)) => ((x as u16 as u64) << 32) ^ ((y as u16 as u64) << 16) ^ (z as u16 as u64),
        Err(_) => 0,
    };
    let rng = SmallRng::seed_from_u64(noise ^ Instant::now().as_ticks());

    // Setup PWM slice 1 channel A for the piezo (GPIO2)
    let pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, PwmConfig::default());

    info!("Buzzer PWM initialized");

    let tick_interval_ms = config.hourglass.tick_interval_ms;
    let engine = Hourglass::new(
        config.hourglass,
        display,
        sensor,
        SignalBuzzer,
        EmbassyClock,
        rng,
    );

    // Spawn tasks
    spawner.spawn(tasks::tick_task(tick_interval_ms)).unwrap();
    spawner.spawn(tasks::buzzer_task(pwm)).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::hourglass_task(engine)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
