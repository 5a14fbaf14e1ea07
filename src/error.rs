use thiserror::Error;

pub type Result<T> = core::result::Result<T, UlpError>;
#[derive(Error, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum UlpError {
    #[error("RTC GPIO {pin} setup error")]
    GpioError { pin: u8 },
    #[error("ULP binary of {len} bytes is not made of whole 32-bit words")]
    MisalignedBinaryError { len: usize },
    #[error("ULP binary load error")]
    LoadBinaryError,
    #[error("ULP wakeup period error")]
    WakeupPeriodError,
    #[error("ULP wakeup source error")]
    EnableWakeupError,
    #[error("ULP run error at entry word {entry:#x}")]
    RunError { entry: u32 },
    #[error("Unknown SH4x measurement type {0:#x}")]
    UnknownMeasurementError(u16),
    #[error("Read I2C Error")]
    ReadI2CError,
    #[error("Write I2C Error")]
    WriteI2CError,
    #[error("Humidity bytes [{bytes_start:#x}, {bytes_end:#x}] expected {expected_checksum:#x} but got the checksum {calculated_checksum:#x}")]
    InvalidHumidityChecksumError {
        bytes_start: u8,
        bytes_end: u8,
        expected_checksum: u8,
        calculated_checksum: u8,
    },
    #[error("Temperature bytes [{bytes_start:#x}, {bytes_end:#x}] expected {expected_checksum:#x} but got the checksum {calculated_checksum:#x}")]
    InvalidTemperatureChecksumError {
        bytes_start: u8,
        bytes_end: u8,
        expected_checksum: u8,
        calculated_checksum: u8,
    },
}
