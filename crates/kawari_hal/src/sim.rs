//! Simulated register bank.
//!
//! Enough of the chip to run the probe routines on a host: the magic
//! unlock on `VIDEO_MEM_FLAGS`, the `VIDEO_MEM_1` window into extended
//! registers or video RAM, the persist busy bit, the lock register and an
//! external switch that can be flipped partway through a poll loop. A
//! stock VIC-II reads `$FF` from every unused register and ignores writes.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use log::trace;

use crate::bus::RegisterBus;
use crate::keyboard::{KEYD, KEYD_LEN, NDX};
use crate::regs::*;

/// Changes applied to the simulated hardware once the poll loop has read
/// the window a given number of times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stimulus {
    pub flip_switch: bool,
    pub lock_bits: Option<u8>,
}

pub struct SimBus {
    present: bool,
    extended: bool,
    unlock_step: usize,
    flags: u8,
    lock_bits: u8,
    ext: [u8; 256],
    ram: Box<[u8]>,
    vram: Box<[u8]>,

    busy_left: u32,
    busy_per_write: u32,
    stuck_busy: bool,
    busy_polls: u32,

    window_reads: u32,
    stimulus: Option<(u32, Stimulus)>,

    writes: Vec<(u16, u8)>,
}

impl SimBus {
    fn new(present: bool) -> Self {
        let mut ext = [0u8; 256];
        let magic = MAGIC_0 as usize;
        ext[magic..magic + 4].copy_from_slice(&MAGIC);
        ext[VERSION as usize] = 0x02;
        ext[CHIP_MODEL as usize] = 0x00;

        Self {
            present,
            extended: false,
            unlock_step: 0,
            flags: 0,
            lock_bits: 0,
            ext,
            ram: vec![0u8; 0x1_0000].into_boxed_slice(),
            vram: vec![0u8; 0x1_0000].into_boxed_slice(),
            busy_left: 0,
            busy_per_write: 0,
            stuck_busy: false,
            busy_polls: 0,
            window_reads: 0,
            stimulus: None,
            writes: Vec::new(),
        }
    }

    /// A board with a Kawari fitted, extensions still locked away.
    pub fn kawari() -> Self {
        Self::new(true)
    }

    /// A stock VIC-II: the magic sequence goes nowhere.
    pub fn stock_vic() -> Self {
        Self::new(false)
    }

    pub fn with_version(mut self, version: u8) -> Self {
        self.ext[VERSION as usize] = version;
        self
    }

    pub fn with_chip_model(mut self, model: u8) -> Self {
        self.ext[CHIP_MODEL as usize] = model;
        self
    }

    pub fn with_lock_bits(mut self, bits: u8) -> Self {
        self.lock_bits = bits;
        self
    }

    pub fn with_switch(mut self, on: bool) -> Self {
        self.ext[DISPLAY_FLAGS as usize] = self.display_flags_with(on);
        self
    }

    /// Every persisted write through the window keeps the busy bit set for
    /// `polls` reads of `VIDEO_MEM_FLAGS`.
    pub fn with_persist_delay(mut self, polls: u32) -> Self {
        self.busy_per_write = polls;
        self
    }


    /// Overwrite one signature byte so the magic check fails.
    pub fn with_bad_magic(mut self) -> Self {
        self.ext[MAGIC_0 as usize + 3] = 0;
        self
    }

    /// Apply `stimulus` on the `after`-th read of `VIDEO_MEM_1_VAL` from now.
    pub fn schedule(&mut self, after: u32, stimulus: Stimulus) {
        self.stimulus = Some((self.window_reads + after, stimulus));
    }

    pub fn set_busy(&mut self, polls: u32) {
        self.busy_left = polls;
    }

    /// Busy bit that never clears from now on.
    pub fn set_stuck_busy(&mut self) {
        self.stuck_busy = true;
    }

    /// Queue keys in the KERNAL buffer.
    pub fn type_keys(&mut self, keys: &[u8]) {
        let pending = self.ram[NDX as usize];
        let mut n = pending;
        for &key in keys {
            if n >= KEYD_LEN {
                break;
            }
            self.ram[(KEYD + n as u16) as usize] = key;
            n += 1;
        }
        self.ram[NDX as usize] = n;
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn ext_reg(&self, selector: u8) -> u8 {
        self.ext[selector as usize]
    }

    pub fn vram(&self, addr: u16) -> u8 {
        self.vram[addr as usize]
    }

    /// Reads of `VIDEO_MEM_FLAGS` that found the busy bit set.
    pub fn busy_polls(&self) -> u32 {
        self.busy_polls
    }

    pub fn window_reads(&self) -> u32 {
        self.window_reads
    }

    /// Every write in issue order.
    pub fn writes(&self) -> &[(u16, u8)] {
        &self.writes
    }

    /// Writes aimed at one address, in issue order.
    pub fn writes_to(&self, addr: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    fn display_flags_with(&self, switch_on: bool) -> u8 {
        let mut flags = DisplayFlags::from_bits_retain(self.ext[DISPLAY_FLAGS as usize]);
        flags.set(DisplayFlags::CHIP_INVERT_SWITCH, switch_on);
        flags.bits()
    }

    fn busy(&self) -> bool {
        self.stuck_busy || self.busy_left > 0
    }

    fn window_addr(&self) -> usize {
        let lo = self.ram[VIDEO_MEM_1_LO as usize] as usize;
        let hi = self.ram[VIDEO_MEM_1_HI as usize] as usize;
        hi << 8 | lo
    }

    fn regs_mapped(&self) -> bool {
        self.flags & MemFlags::REGS.bits() != 0
    }

    fn write_unlock(&mut self, value: u8) {
        if value == MAGIC[self.unlock_step] {
            self.unlock_step += 1;
        } else {
            self.unlock_step = usize::from(value == MAGIC[0]);
        }

        if self.unlock_step == MAGIC.len() {
            trace!("sim: extended registers unlocked");
            self.extended = true;
            self.unlock_step = 0;
        }
    }

    fn read_window(&mut self) -> u8 {
        self.window_reads += 1;
        if let Some((at, stimulus)) = self.stimulus {
            if self.window_reads >= at {
                self.stimulus = None;
                self.apply(stimulus);
            }
        }

        if self.regs_mapped() {
            self.ext[self.ram[VIDEO_MEM_1_LO as usize] as usize]
        } else {
            self.vram[self.window_addr()]
        }
    }

    fn write_window(&mut self, value: u8) {
        if self.regs_mapped() {
            self.ext[self.ram[VIDEO_MEM_1_LO as usize] as usize] = value;
            if self.flags & MemFlags::PERSIST.bits() != 0 && self.busy_per_write > 0 {
                self.busy_left = self.busy_per_write;
            }
        } else {
            let addr = self.window_addr();
            self.vram[addr] = value;
        }
    }

    fn apply(&mut self, stimulus: Stimulus) {
        if stimulus.flip_switch {
            let on = DisplayFlags::from_bits_retain(self.ext[DISPLAY_FLAGS as usize])
                .contains(DisplayFlags::CHIP_INVERT_SWITCH);
            self.ext[DISPLAY_FLAGS as usize] = self.display_flags_with(!on);
        }
        if let Some(bits) = stimulus.lock_bits {
            self.lock_bits = bits;
        }
    }
}

impl RegisterBus for SimBus {
    fn peek(&mut self, addr: u16) -> u8 {
        match addr {
            LOCK_BITS..=VIDEO_MEM_FLAGS if !self.extended => 0xff,
            LOCK_BITS => self.lock_bits,
            VIDEO_MEM_FLAGS => {
                if self.busy() {
                    self.busy_polls += 1;
                    self.busy_left = self.busy_left.saturating_sub(1);
                    self.flags | MemFlags::PERSIST_BUSY.bits()
                } else {
                    self.flags
                }
            }
            VIDEO_MEM_1_VAL => self.read_window(),
            _ => self.ram[addr as usize],
        }
    }

    fn poke(&mut self, addr: u16, value: u8) {
        self.writes.push((addr, value));
        match addr {
            VIDEO_MEM_FLAGS if !self.extended => {
                if self.present {
                    self.write_unlock(value);
                }
            }
            LOCK_BITS..=VIDEO_MEM_FLAGS if !self.extended => {}
            // read only
            LOCK_BITS => {}
            VIDEO_MEM_FLAGS => self.flags = value & !MemFlags::PERSIST_BUSY.bits(),
            VIDEO_MEM_1_VAL => self.write_window(value),
            _ => self.ram[addr as usize] = value,
        }
    }
}
