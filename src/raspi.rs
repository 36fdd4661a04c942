//! module for opening raspi GPIO and I2C through rppal
use rppal::{
    gpio::{self, Gpio, InputPin},
    i2c::{self, I2c},
};

use crate::{
    pins::{Line, PinSource},
    scanner::BusOpener,
    speed::BusSpeed,
};

/// BCM number of SCL on the 40-pin header (pin 5)
pub const DEFAULT_SCL: u8 = 3;
/// BCM number of SDA on the 40-pin header (pin 3)
pub const DEFAULT_SDA: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum RaspiError {
    #[error("gpio: {0}")]
    Gpio(#[from] gpio::Error),

    #[error("i2c: {0}")]
    I2c(#[from] i2c::Error),

    /// i2c-dev cannot retune the clock; the rate comes from the device tree
    /// (`dtparam=i2c_arm_baudrate=...`).
    #[error("/dev/i2c-{bus} is clocked at {}, {requested} requested", clock_label(.actual))]
    SpeedMismatch {
        bus: u8,
        requested: BusSpeed,
        actual: u32,
    },

    /// rppal reads the rate from the adapter's device tree node, which
    /// adapters that are not described in the device tree do not have.
    #[error(
        "cannot read clock rate of /dev/i2c-{bus}: \
         /sys/class/i2c-adapter/i2c-{bus}/of_node/clock-frequency is unavailable"
    )]
    ClockUnknown {
        bus: u8,
        #[source]
        source: i2c::Error,
    },
}

fn clock_label(hz: &u32) -> String {
    match BusSpeed::from_hz(*hz) {
        Some(speed) => speed.to_string(),
        None => format!("{} Hz", hz),
    }
}

/// SCL/SDA as plain GPIO. rppal restores the previous pin mode when the
/// `InputPin` is dropped, which hands the lines back to the I2C function.
#[derive(Debug)]
pub struct RaspiPins {
    gpio: Gpio,
    scl: u8,
    sda: u8,
}

impl RaspiPins {
    pub fn new(scl: u8, sda: u8) -> Result<Self, RaspiError> {
        let gpio = Gpio::new()?;
        return Ok(Self { gpio, scl, sda });
    }
}

impl PinSource for RaspiPins {
    type Pin = InputPin;
    type Error = RaspiError;

    fn open_pull_down(&mut self, line: Line) -> Result<InputPin, RaspiError> {
        let bcm = match line {
            Line::Scl => self.scl,
            Line::Sda => self.sda,
        };
        let pin = self.gpio.get(bcm)?.into_input_pulldown();
        return Ok(pin);
    }
}

/// `/dev/i2c-{bus}` opened fresh for every speed.
#[derive(Debug, Clone)]
pub struct RaspiBus {
    bus: u8,
    timeout_ms: u32,
}

impl RaspiBus {
    pub fn new(bus: u8, timeout_ms: u32) -> Self {
        Self { bus, timeout_ms }
    }
}

impl BusOpener for RaspiBus {
    type Bus = I2c;
    type Error = RaspiError;

    fn open(&mut self, speed: BusSpeed) -> Result<I2c, RaspiError> {
        let i2c = I2c::with_bus(self.bus)?;
        i2c.set_timeout(self.timeout_ms)?;

        let actual = i2c.clock_speed().map_err(|source| RaspiError::ClockUnknown {
            bus: self.bus,
            source,
        })?;
        if actual != speed.hz() {
            return Err(RaspiError::SpeedMismatch {
                bus: self.bus,
                requested: speed,
                actual,
            });
        }
        return Ok(i2c);
    }
}
