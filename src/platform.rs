use crate::error::{Result, UlpError};

/// Direction of an RTC GPIO
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum RtcGpioMode {
    InputOnly,
    OutputOnly,
    InputOutput,
    Disabled,
}

/// Vendor RTC IO, ULP and sleep driver
pub trait UlpPlatform {
    type Error: core::fmt::Debug;

    /// Route the pin to the RTC domain
    fn rtc_gpio_init(&mut self, pin: u8) -> core::result::Result<(), Self::Error>;

    fn rtc_gpio_set_direction(
        &mut self,
        pin: u8,
        mode: RtcGpioMode,
    ) -> core::result::Result<(), Self::Error>;

    /// Copy a ULP binary into RTC slow memory, `load_addr` is in words
    fn load_binary(&mut self, load_addr: u32, program: &[u8])
        -> core::result::Result<(), Self::Error>;

    /// Set the period of one of the ULP wakeup timers
    fn set_wakeup_period(
        &mut self,
        timer: usize,
        period_us: u32,
    ) -> core::result::Result<(), Self::Error>;

    /// Let the ULP wake the main processor from deep sleep
    fn enable_ulp_wakeup(&mut self) -> core::result::Result<(), Self::Error>;

    /// Start the ULP program at `entry`, in words from the start of RTC slow memory
    fn run(&mut self, entry: u32) -> core::result::Result<(), Self::Error>;
}

/// A precompiled ULP binary and the word offset of its entry point
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UlpProgram<'a> {
    code: &'a [u8],
    entry: u32,
}

impl<'a> UlpProgram<'a> {
    pub fn new(code: &'a [u8], entry: u32) -> Result<Self> {
        if code.len() % core::mem::size_of::<u32>() != 0 {
            return Err(UlpError::MisalignedBinaryError { len: code.len() });
        }
        Ok(Self { code, entry })
    }

    pub fn code(&self) -> &'a [u8] {
        self.code
    }

    pub fn entry(&self) -> u32 {
        self.entry
    }

    /// Length of the binary in 32-bit words
    pub fn word_count(&self) -> usize {
        self.code.len() / core::mem::size_of::<u32>()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn program_is_word_aligned() {
        let code = [0u8; 12];
        let program = UlpProgram::new(&code, 2).unwrap();
        assert_eq!(program.word_count(), 3);
        assert_eq!(program.entry(), 2);

        assert_eq!(
            UlpProgram::new(&code[..10], 0),
            Err(UlpError::MisalignedBinaryError { len: 10 })
        );
    }
}
