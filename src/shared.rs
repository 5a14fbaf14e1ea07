//! Cells of RTC slow memory shared between the main processor and the ULP.
//!
//! The host writes the tunables once during setup, the ULP overwrites the four
//! sample bytes on every pass. Nothing orders the two sides: each cell is a
//! single 32-bit word so a read never sees half a word, but the msb/lsb pair
//! of a sample may be torn if the host reads while the ULP is writing. The host
//! only reads after the ULP woke it, which happens after a completed pass.

use core::sync::atomic::{AtomicU32, Ordering};

/// Named variables exported by the ULP binary
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Slot {
    Meas,
    TDiff,
    HDiff,
    Period,
    TempMsb,
    TempLsb,
    HumiMsb,
    HumiLsb,
}

impl Slot {
    pub const COUNT: usize = 8;

    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::Meas,
        Slot::TDiff,
        Slot::HDiff,
        Slot::Period,
        Slot::TempMsb,
        Slot::TempLsb,
        Slot::HumiMsb,
        Slot::HumiLsb,
    ];

    /// Linker symbol of the variable in the prebuilt ULP binary
    pub fn symbol(self) -> &'static str {
        match self {
            Slot::Meas => "ulp_sh4x_meas",
            Slot::TDiff => "ulp_t_diff",
            Slot::HDiff => "ulp_h_diff",
            Slot::Period => "ulp_period",
            Slot::TempMsb => "ulp_temp_msb",
            Slot::TempLsb => "ulp_temp_lsb",
            Slot::HumiMsb => "ulp_humi_msb",
            Slot::HumiLsb => "ulp_humi_lsb",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Shared scratch region, lives as long as RTC slow memory is retained
#[derive(Debug)]
pub struct SharedMemory {
    cells: [AtomicU32; Slot::COUNT],
}

impl Default for SharedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedMemory {
    pub const fn new() -> Self {
        Self {
            cells: [const { AtomicU32::new(0) }; Slot::COUNT],
        }
    }

    pub fn read(&self, slot: Slot) -> u32 {
        self.cells[slot.index()].load(Ordering::Relaxed)
    }

    pub fn write(&self, slot: Slot, value: u32) {
        self.cells[slot.index()].store(value, Ordering::Relaxed)
    }

    /// Low byte of the cell, the ULP stores sample bytes in 32-bit words
    pub fn byte(&self, slot: Slot) -> u8 {
        self.read(slot) as u8
    }

    /// Low half-word of the cell, the ULP only keeps 16 bits per word
    pub fn half_word(&self, slot: Slot) -> u16 {
        self.read(slot) as u16
    }

    /// Store a big endian sample the way the ULP does
    pub fn store_sample(&self, msb: Slot, lsb: Slot, raw: u16) {
        let [hi, lo] = raw.to_be_bytes();
        self.write(msb, hi as u32);
        self.write(lsb, lo as u32);
    }
}
