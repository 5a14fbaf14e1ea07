//! Host stand-in for the ULP sampling routine.
//!
//! Talks to a real or mocked SH4x over `embedded-hal` I2C and leaves its
//! samples in [`SharedMemory`] the way the prebuilt ULP binary does, so the
//! host side can be driven without the co-processor.

use embedded_hal::blocking::{delay::DelayMs, i2c};
use log::debug;

use crate::config::Measurement;
use crate::error::{Result, UlpError};
use crate::shared::{SharedMemory, Slot};
use crate::{merge_bytes, verify_data};

/// Default SH4x I2C address
pub const DEFAULT_ADDRESS: u8 = 0x44;

pub struct UlpEmulator<'a, I2C, D> {
    i2c: I2C,
    delay: D,
    shared: &'a SharedMemory,
    address: u8,
    ticks: u32,
    reported: Option<(u16, u16)>,
}

impl<'a, I2C, D> UlpEmulator<'a, I2C, D>
where
    I2C: i2c::Write + i2c::Read,
    D: DelayMs<u8>,
{
    pub fn new(i2c: I2C, delay: D, shared: &'a SharedMemory) -> Self {
        Self {
            i2c,
            delay,
            shared,
            address: DEFAULT_ADDRESS,
            ticks: 0,
            reported: None,
        }
    }

    /// Change the sensor's I2C address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Give back the bus and the delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// One wakeup timer tick, samples once every `period` ticks.
    /// Returns whether the main processor should be woken.
    pub fn tick(&mut self) -> Result<bool> {
        self.ticks += 1;
        if self.ticks < self.shared.half_word(Slot::Period).max(1) as u32 {
            return Ok(false);
        }
        self.ticks = 0;
        self.sample()
    }

    /// Measure once and publish the raw words. Returns whether either value
    /// moved past its threshold since the last time the host was woken.
    pub fn sample(&mut self) -> Result<bool> {
        let meas = Measurement::try_from(self.shared.half_word(Slot::Meas))?;

        self.i2c
            .write(self.address, &[meas.command()])
            .map_err(|_| UlpError::WriteI2CError)?;
        self.delay.delay_ms(meas.duration_ms());

        let mut buffer = [0; 6];
        self.i2c
            .read(self.address, &mut buffer)
            .map_err(|_| UlpError::ReadI2CError)?;
        verify_data(buffer)?;

        let raw_t = merge_bytes(buffer[0], buffer[1]);
        let raw_h = merge_bytes(buffer[3], buffer[4]);
        self.shared.store_sample(Slot::TempMsb, Slot::TempLsb, raw_t);
        self.shared.store_sample(Slot::HumiMsb, Slot::HumiLsb, raw_h);

        let wake = match self.reported {
            None => true,
            Some((last_t, last_h)) => {
                raw_t.abs_diff(last_t) > self.shared.half_word(Slot::TDiff)
                    || raw_h.abs_diff(last_h) > self.shared.half_word(Slot::HDiff)
            }
        };
        if wake {
            debug!("Waking host, raw_t = {:#x} raw_h = {:#x}", raw_t, raw_h);
            self.reported = Some((raw_t, raw_h));
        }

        Ok(wake)
    }
}
