//! Kawari Hardware Access
//!
//! Probe and control routines for the Kawari VIC-II replacement. Every
//! routine is generic over [`RegisterBus`], so the same sequencing runs
//! against the live I/O page ([`Mmio`]) or a simulated register bank.

#![no_std]

#[cfg(any(test, feature = "sim"))]
extern crate alloc;

pub mod bus;
pub mod error;
pub mod keyboard;
pub mod probe;
pub mod regs;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use bus::{Mmio, RegisterBus};
pub use error::{ProbeError, Result};
pub use keyboard::{KernalKeyboard, KeySource, ScriptedKeys};
pub use probe::{
    enable_kawari, get_chip_model, get_lock_bits, get_version, have_magic, probe, safe_poke,
    safe_poke_within, wait_key_or_switch, wait_key_or_switch_within, Budget, Capabilities,
    WaitEvent,
};
pub use regs::{ChipModel, DisplayFlags, LockBits, MemFlags};
