use crate::error::{Result, UlpError};

/// Default measurement command, high repeatability
pub const DEFAULT_MEAS: Measurement = Measurement::High;
/// Default raw temperature delta that wakes the main processor
pub const DEFAULT_T_DIFF: u16 = 0x20;
/// Default raw humidity delta that wakes the main processor
pub const DEFAULT_H_DIFF: u16 = 0x40;
/// Default sampling period in seconds
pub const DEFAULT_PERIOD: u16 = 5;

/// SH4x measurement command sent by the ULP, the higher the repeatability
/// the longer the sensor takes and the more accurate it is
#[derive(Default, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Measurement {
    #[default]
    High = 0xFD,
    Medium = 0xF6,
    Low = 0xE0,
}

impl Measurement {
    /// Command byte as written on the bus
    pub fn command(self) -> u8 {
        self as u8
    }

    /// Worst case time the sensor needs before the result can be read
    pub fn duration_ms(self) -> u8 {
        match self {
            Measurement::High => 10,
            Measurement::Medium => 5,
            Measurement::Low => 2,
        }
    }
}

impl TryFrom<u16> for Measurement {
    type Error = UlpError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0xFD => Ok(Measurement::High),
            0xF6 => Ok(Measurement::Medium),
            0xE0 => Ok(Measurement::Low),
            other => Err(UlpError::UnknownMeasurementError(other)),
        }
    }
}

impl From<Measurement> for u16 {
    fn from(value: Measurement) -> Self {
        value as u16
    }
}

/// Tunables handed to the ULP program. A zero field falls back to its default.
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub meas: u16,
    pub t_diff: u16,
    pub h_diff: u16,
    pub period: u16,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with every default spelled out
    pub fn defaults() -> Self {
        Self {
            meas: DEFAULT_MEAS.into(),
            t_diff: DEFAULT_T_DIFF,
            h_diff: DEFAULT_H_DIFF,
            period: DEFAULT_PERIOD,
        }
    }

    /// Change the measurement command
    pub fn with_measurement(mut self, meas: Measurement) -> Self {
        self.meas = meas.into();
        self
    }

    /// Change the measurement command without checking it
    pub fn with_raw_measurement(mut self, meas: u16) -> Self {
        self.meas = meas;
        self
    }

    /// Change the raw temperature delta
    pub fn with_t_diff(mut self, t_diff: u16) -> Self {
        self.t_diff = t_diff;
        self
    }

    /// Change the raw humidity delta
    pub fn with_h_diff(mut self, h_diff: u16) -> Self {
        self.h_diff = h_diff;
        self
    }

    /// Change the sampling period in seconds
    pub fn with_period(mut self, period: u16) -> Self {
        self.period = period;
        self
    }

    /// The measurement command, if it is one the sensor knows
    pub fn measurement(&self) -> Result<Measurement> {
        Measurement::try_from(self.meas)
    }
}
