pub mod config;
pub mod emulator;
pub mod error;
pub mod platform;
pub mod shared;

use crc::{Algorithm, Crc};
use log::{debug, trace, warn};

use config::{Config, Measurement, DEFAULT_H_DIFF, DEFAULT_MEAS, DEFAULT_PERIOD, DEFAULT_T_DIFF};
use error::{Result, UlpError};
use platform::{RtcGpioMode, UlpPlatform, UlpProgram};
use shared::{SharedMemory, Slot};

pub mod prelude {
    pub use super::{
        config::Config, config::Measurement, emulator::UlpEmulator, platform::UlpPlatform,
        platform::UlpProgram, shared::SharedMemory, Reading, Sh4xUlp, TemperatureUnit,
    };
}

/// RTC GPIO wired to the sensor clock
pub const SCL_PIN: u8 = 32;
/// RTC GPIO wired to the sensor data line
pub const SDA_PIN: u8 = 33;

/// Word offset in RTC slow memory the ULP binary is loaded at
pub const ULP_LOAD_ADDR: u32 = 0;
/// ULP wakeup timer driving the sampling routine
pub const ULP_WAKEUP_TIMER: usize = 0;
/// Base tick of the ULP routine, the sampling period counts these
pub const ULP_TICK_US: u32 = 1_000_000;

const CRC_ALGORITHM: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0x00,
    residue: 0x00,
};

// 2**16 - 1
const CONVERSION_DENOM: f32 = 65535f32;

// Constants used to convert values
const CELSIUS_PAIR: (f32, f32) = (45f32, 175f32);
const FAHRENHEIT_PAIR: (f32, f32) = (49f32, 315f32);
const HUMIDITY_PAIR: (f32, f32) = (6f32, 125f32);

/// Represents the latest sample left in shared memory by the ULP
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub temperature: f32,
    pub humidity: f32,
}

/// Influences what the reading temperature numbers are
#[derive(Default, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Merges two bytes so the result is both, ex merge_bytes(0x20, 0x33) = 0x2033
pub fn merge_bytes(a: u8, b: u8) -> u16 {
    ((a as u16) << 8) | b as u16
}

/// Sensirion CRC-8 of a sensor word
pub fn checksum(bytes: &[u8]) -> u8 {
    Crc::<u8>::new(&CRC_ALGORITHM).checksum(bytes)
}

/// Verifies both sensor words of a measurement against their checksums
pub fn verify_data(buffer: [u8; 6]) -> Result<()> {
    let temp_result = checksum(&[buffer[0], buffer[1]]);
    if temp_result != buffer[2] {
        return Err(UlpError::InvalidTemperatureChecksumError {
            bytes_start: buffer[0],
            bytes_end: buffer[1],
            expected_checksum: buffer[2],
            calculated_checksum: temp_result,
        });
    }

    let humidity_result = checksum(&[buffer[3], buffer[4]]);
    if humidity_result != buffer[5] {
        return Err(UlpError::InvalidHumidityChecksumError {
            bytes_start: buffer[3],
            bytes_end: buffer[4],
            expected_checksum: buffer[5],
            calculated_checksum: humidity_result,
        });
    }

    Ok(())
}

/// Unclamped, the sensor range is -45 to 130 °C
pub fn temperature_from_raw(raw: u16, unit: TemperatureUnit) -> f32 {
    let (sub, mul) = match unit {
        TemperatureUnit::Celsius => CELSIUS_PAIR,
        TemperatureUnit::Fahrenheit => FAHRENHEIT_PAIR,
    };

    mul * (raw as f32 / CONVERSION_DENOM) - sub
}

/// Relative humidity clamped to 0..=100 %
pub fn humidity_from_raw(raw: u16) -> f32 {
    let (sub, mul) = HUMIDITY_PAIR;
    (mul * (raw as f32 / CONVERSION_DENOM) - sub).clamp(0f32, 100f32)
}

fn or_default(value: u16, default: u16) -> u32 {
    if value != 0 {
        value as u32
    } else {
        default as u32
    }
}

/// Host side of the ULP sampling routine
#[derive(Debug)]
pub struct Sh4xUlp<'a, P> {
    platform: P,
    program: UlpProgram<'a>,
    shared: &'a SharedMemory,
    unit: TemperatureUnit,
}

impl<'a, P> Sh4xUlp<'a, P>
where
    P: UlpPlatform,
{
    pub fn new(platform: P, program: UlpProgram<'a>, shared: &'a SharedMemory) -> Self {
        Self {
            platform,
            program,
            shared,
            unit: TemperatureUnit::default(),
        }
    }

    /// Change the temperature unit
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    /// Change the temperature unit
    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn shared(&self) -> &'a SharedMemory {
        self.shared
    }

    /// Give back the platform driver
    pub fn release(self) -> P {
        self.platform
    }

    /// Configures the sensor pins, loads the ULP program and hands it the
    /// tunables. `None` or zero fields mean defaults. An unknown measurement
    /// type is logged and the current one is kept.
    pub fn setup(&mut self, config: Option<&Config>) -> Result<()> {
        for pin in [SCL_PIN, SDA_PIN] {
            self.platform
                .rtc_gpio_init(pin)
                .map_err(|_| UlpError::GpioError { pin })?;
            self.platform
                .rtc_gpio_set_direction(pin, RtcGpioMode::InputOnly)
                .map_err(|_| UlpError::GpioError { pin })?;
        }

        debug!(
            "Loading ULP binary of {} words at {:#x}",
            self.program.word_count(),
            ULP_LOAD_ADDR
        );
        self.platform
            .load_binary(ULP_LOAD_ADDR, self.program.code())
            .map_err(|_| UlpError::LoadBinaryError)?;

        self.platform
            .set_wakeup_period(ULP_WAKEUP_TIMER, ULP_TICK_US)
            .map_err(|_| UlpError::WakeupPeriodError)?;

        // Nothing below can fail, the tunables are written all or nothing
        let config = config.copied().unwrap_or_default();

        self.shared
            .write(Slot::TDiff, or_default(config.t_diff, DEFAULT_T_DIFF));
        self.shared
            .write(Slot::HDiff, or_default(config.h_diff, DEFAULT_H_DIFF));
        self.shared
            .write(Slot::Period, or_default(config.period, DEFAULT_PERIOD));

        if config.meas == 0 {
            self.write_measurement(DEFAULT_MEAS);
        } else {
            match config.measurement() {
                Ok(meas) => self.write_measurement(meas),
                Err(err) => {
                    warn!("{}, keeping the current one", err);
                    // Reset content of RTC memory is not a command the sensor knows
                    if Measurement::try_from(self.shared.half_word(Slot::Meas)).is_err() {
                        self.write_measurement(DEFAULT_MEAS);
                    }
                }
            }
        }

        debug!("ULP configured with {:?}", self.config());
        Ok(())
    }

    /// Lets the ULP wake the main processor and starts it. Call once, after `setup`.
    pub fn enable(&mut self) -> Result<()> {
        self.platform
            .enable_ulp_wakeup()
            .map_err(|_| UlpError::EnableWakeupError)?;

        let entry = self.program.entry();
        self.platform
            .run(entry)
            .map_err(|_| UlpError::RunError { entry })
    }

    fn write_measurement(&self, meas: Measurement) {
        self.shared.write(Slot::Meas, u16::from(meas) as u32);
    }

    /// The tunables currently in shared memory
    pub fn config(&self) -> Config {
        Config {
            meas: self.shared.half_word(Slot::Meas),
            t_diff: self.shared.half_word(Slot::TDiff),
            h_diff: self.shared.half_word(Slot::HDiff),
            period: self.shared.half_word(Slot::Period),
        }
    }

    pub fn raw_temperature(&self) -> u16 {
        merge_bytes(
            self.shared.byte(Slot::TempMsb),
            self.shared.byte(Slot::TempLsb),
        )
    }

    pub fn raw_humidity(&self) -> u16 {
        merge_bytes(
            self.shared.byte(Slot::HumiMsb),
            self.shared.byte(Slot::HumiLsb),
        )
    }

    /// Latest temperature, stale if the ULP has not sampled yet
    pub fn get_temp(&self) -> f32 {
        let raw = self.raw_temperature();
        trace!("raw_t = {:#x}", raw);
        temperature_from_raw(raw, self.unit)
    }

    /// Latest relative humidity, stale if the ULP has not sampled yet
    pub fn get_humi(&self) -> f32 {
        let raw = self.raw_humidity();
        trace!("raw_h = {:#x}", raw);
        humidity_from_raw(raw)
    }

    pub fn read(&self) -> Reading {
        Reading {
            temperature: self.get_temp(),
            humidity: self.get_humi(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn byte_merge() {
        let a = 0x20;
        let b = 0x33;
        assert_eq!(merge_bytes(a, b), 0x2033);
    }

    #[test]
    fn verify_checksum() {
        let buffer = [98, 153, 188, 98, 32, 139];

        assert!(verify_data(buffer).is_ok());
        assert_eq!(checksum(&[0xBE, 0xEF]), 0x92);

        let corrupt_temperature = [98, 153, 180, 98, 32, 139];

        assert_eq!(
            verify_data(corrupt_temperature).err().unwrap().to_string(),
            UlpError::InvalidTemperatureChecksumError {
                bytes_start: 98,
                bytes_end: 153,
                expected_checksum: 180,
                calculated_checksum: 188
            }
            .to_string()
        );

        let corrupt_humidity = [98, 153, 188, 98, 32, 180];
        assert_eq!(
            verify_data(corrupt_humidity).err().unwrap().to_string(),
            UlpError::InvalidHumidityChecksumError {
                bytes_start: 98,
                bytes_end: 32,
                expected_checksum: 180,
                calculated_checksum: 139
            }
            .to_string()
        );
    }

    #[test]
    fn temperature_is_unclamped() {
        assert_eq!(temperature_from_raw(0, TemperatureUnit::Celsius), -45f32);
        assert_eq!(temperature_from_raw(0xFFFF, TemperatureUnit::Celsius), 130f32);
        assert_eq!(temperature_from_raw(0, TemperatureUnit::Fahrenheit), -49f32);
        assert_eq!(
            temperature_from_raw(0xFFFF, TemperatureUnit::Fahrenheit),
            266f32
        );
        assert!(approx(
            temperature_from_raw(0x6299, TemperatureUnit::Celsius),
            175f32 * (0x6299 as f32 / 65535f32) - 45f32
        ));
    }

    #[test]
    fn humidity_is_clamped() {
        assert_eq!(humidity_from_raw(0), 0f32);
        assert_eq!(humidity_from_raw(0xFFFF), 100f32);
        // 6 %RH below the bottom of the formula
        assert_eq!(humidity_from_raw(0x0C49), 0f32);
        assert!(approx(humidity_from_raw(0x8000), 125f32 * (32768f32 / 65535f32) - 6f32));
    }
}
