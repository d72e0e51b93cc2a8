//! # Kawari Register Map
//!
//! The extended interface lives in the unused tail of the VIC-II register
//! page. It stays hidden until the magic sequence is written to
//! [`VIDEO_MEM_FLAGS`].
//!
//! | Address  | Register           |
//! |----------|--------------------|
//! | `$D034`  | lock bits          |
//! | `$D035`  | `VIDEO_MEM_1_IDX`  |
//! | `$D036`  | `VIDEO_MEM_2_IDX`  |
//! | `$D037`  | `VIDEO_MODE1`      |
//! | `$D038`  | `VIDEO_MODE2`      |
//! | `$D039`  | `VIDEO_MEM_1_LO`   |
//! | `$D03A`  | `VIDEO_MEM_1_HI`   |
//! | `$D03B`  | `VIDEO_MEM_1_VAL`  |
//! | `$D03C`  | `VIDEO_MEM_2_LO`   |
//! | `$D03D`  | `VIDEO_MEM_2_HI`   |
//! | `$D03E`  | `VIDEO_MEM_2_VAL`  |
//! | `$D03F`  | `VIDEO_MEM_FLAGS`  |
//!
//! With [`MemFlags::REGS`] set, the `VIDEO_MEM_1` window addresses the
//! extended registers instead of video RAM: write a selector to
//! `VIDEO_MEM_1_LO`, read or write `VIDEO_MEM_1_VAL`.

pub const LOCK_BITS: u16 = 0xd034;
pub const VIDEO_MEM_1_IDX: u16 = 0xd035;
pub const VIDEO_MEM_2_IDX: u16 = 0xd036;
pub const VIDEO_MODE1: u16 = 0xd037;
pub const VIDEO_MODE2: u16 = 0xd038;
pub const VIDEO_MEM_1_LO: u16 = 0xd039;
pub const VIDEO_MEM_1_HI: u16 = 0xd03a;
pub const VIDEO_MEM_1_VAL: u16 = 0xd03b;
pub const VIDEO_MEM_2_LO: u16 = 0xd03c;
pub const VIDEO_MEM_2_HI: u16 = 0xd03d;
pub const VIDEO_MEM_2_VAL: u16 = 0xd03e;
pub const VIDEO_MEM_FLAGS: u16 = 0xd03f;

// Extended register selectors, reached through the VIDEO_MEM_1 window.
pub const CHIP_MODEL: u8 = 0x1f;
pub const DISPLAY_FLAGS: u8 = 0x80;
pub const VERSION: u8 = 0x83;
pub const MAGIC_0: u8 = 0xfc;

/// Signature written to unlock the interface and read back to confirm it.
pub const MAGIC: [u8; 4] = *b"VIC2";

bitflags::bitflags! {
    /// `VIDEO_MEM_FLAGS` at `$D03F`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct MemFlags: u8 {
        /// Auto-increment for window 1.
        const MEM_1_INC     = 0b0000_0001;
        /// Auto-increment for window 2.
        const MEM_2_INC     = 0b0000_0100;
        /// Set while a write to persisted (EEPROM backed) storage is in flight.
        const PERSIST_BUSY  = 0b0001_0000;
        /// Window 1 addresses extended registers instead of video RAM.
        const REGS          = 0b0010_0000;
        /// Persist writes to extended registers.
        const PERSIST       = 0b1000_0000;
    }

    /// Extended register `DISPLAY_FLAGS`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct DisplayFlags: u8 {
        const CHIP_NTSC            = 0b0000_0001;
        const RGB_CSYNC            = 0b0000_0010;
        /// State of the external switch that inverts the chip model.
        const CHIP_INVERT_SWITCH   = 0b0000_0100;
        const VPOLARITY            = 0b0000_1000;
        const HPOLARITY            = 0b0001_0000;
        const WHITE_LINE           = 0b0010_0000;
    }

    /// Lock register at `$D034`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct LockBits: u8 {
        const FLASH_LOCK     = 0b0000_1000;
        const EXTENSION_LOCK = 0b0001_0000;
        const PERSIST_LOCK   = 0b0010_0000;
    }
}

/// Bits of the lock register that reflect the physical jumpers.
pub const LOCK_MASK: u8 = 0b0011_1000;

/// Video standard reported by the `CHIP_MODEL` register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChipModel {
    Mos6567R8,
    Mos6569R5,
    Mos6567R56A,
    Mos6569R1,
    Unknown(u8),
}

impl ChipModel {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ChipModel::Mos6567R8,
            1 => ChipModel::Mos6569R5,
            2 => ChipModel::Mos6567R56A,
            3 => ChipModel::Mos6569R1,
            _ => ChipModel::Unknown(raw),
        }
    }

    pub fn is_ntsc(&self) -> bool {
        matches!(self, ChipModel::Mos6567R8 | ChipModel::Mos6567R56A)
    }
}

impl core::fmt::Display for ChipModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChipModel::Mos6567R8 => write!(f, "6567R8"),
            ChipModel::Mos6569R5 => write!(f, "6569R5"),
            ChipModel::Mos6567R56A => write!(f, "6567R56A"),
            ChipModel::Mos6569R1 => write!(f, "6569R1"),
            ChipModel::Unknown(raw) => write!(f, "unknown ({raw:#04x})"),
        }
    }
}
