//! Presence checks and guarded register access.
//!
//! None of these routines retry. A failed unlock or a signature mismatch
//! is handed back to the caller, who decides whether to run degraded or
//! stop.

use log::{debug, warn};

use crate::bus::RegisterBus;
use crate::error::{ProbeError, Result};
use crate::keyboard::KeySource;
use crate::regs::*;

/// Write the unlock sequence and confirm the interface answered.
///
/// Succeeds only if `VIDEO_MEM_FLAGS` reads back zero afterwards.
pub fn enable_kawari<B: RegisterBus>(bus: &mut B) -> bool {
    for byte in MAGIC {
        bus.poke(VIDEO_MEM_FLAGS, byte);
    }
    bus.poke(VIDEO_MEM_FLAGS, 0);

    bus.poke(VIDEO_MEM_1_IDX, 0);
    bus.poke(VIDEO_MEM_2_IDX, 0);

    let readback = bus.peek(VIDEO_MEM_FLAGS);
    if readback != 0 {
        warn!("kawari unlock not confirmed, flags read {:#04x}", readback);
        return false;
    }
    debug!("kawari extended registers enabled");
    true
}

/// Map the extended registers into window 1 and compare the signature.
pub fn have_magic<B: RegisterBus>(bus: &mut B) -> bool {
    bus.set_bits(VIDEO_MEM_FLAGS, MemFlags::REGS.bits());

    let mut signature = [0u8; 4];
    for (offset, slot) in signature.iter_mut().enumerate() {
        bus.poke(VIDEO_MEM_1_LO, MAGIC_0 + offset as u8);
        *slot = bus.peek(VIDEO_MEM_1_VAL);
    }

    if signature != MAGIC {
        warn!("magic mismatch: read {:02x?}", signature);
        return false;
    }
    true
}

#[inline(always)]
fn persist_busy<B: RegisterBus>(bus: &mut B) -> bool {
    bus.peek(VIDEO_MEM_FLAGS) & MemFlags::PERSIST_BUSY.bits() != 0
}

/// Spin until the persist busy bit clears, then write.
///
/// No timeout: a busy bit that never clears hangs here. Use
/// [`safe_poke_within`] when that is not acceptable.
pub fn safe_poke<B: RegisterBus>(bus: &mut B, addr: u16, value: u8) {
    while persist_busy(bus) {
        core::hint::spin_loop();
    }
    bus.poke(addr, value);
}

/// How long a polling routine may keep trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget(Option<u32>);

impl Budget {
    pub const fn polls(max: u32) -> Self {
        Budget(Some(max))
    }

    pub const fn unbounded() -> Self {
        Budget(None)
    }

    fn allows(&self, spent: u32) -> bool {
        self.0.map_or(true, |max| spent < max)
    }
}

/// [`safe_poke`] that tolerates at most `budget` busy reads.
///
/// Returns the number of busy reads seen before the write went out. When
/// the budget runs out the write is skipped.
pub fn safe_poke_within<B: RegisterBus>(
    bus: &mut B,
    addr: u16,
    value: u8,
    budget: Budget,
) -> Result<u32> {
    let mut polls = 0;
    while persist_busy(bus) {
        if !budget.allows(polls) {
            warn!("busy bit stuck, dropping write to {:#06x}", addr);
            return Err(ProbeError::Busy { addr, polls: polls + 1 });
        }
        polls += 1;
        core::hint::spin_loop();
    }
    bus.poke(addr, value);
    Ok(polls)
}

/// Why [`wait_key_or_switch`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitEvent {
    Key(u8),
    SwitchChanged,
    LockBitsChanged,
}

impl WaitEvent {
    /// The key code, `'*'` for a switch change, `'%'` for a lock change.
    pub fn code(&self) -> u8 {
        match self {
            WaitEvent::Key(key) => *key,
            WaitEvent::SwitchChanged => b'*',
            WaitEvent::LockBitsChanged => b'%',
        }
    }
}

fn poll_once<B: RegisterBus, K: KeySource>(
    bus: &mut B,
    keys: &mut K,
    current_switch_val: u8,
    current_lock_bits: u8,
) -> Option<WaitEvent> {
    let key = keys.getin(bus);
    if key != 0 {
        return Some(WaitEvent::Key(key));
    }

    let inv = bus.peek(VIDEO_MEM_1_VAL) & DisplayFlags::CHIP_INVERT_SWITCH.bits();
    let lb = get_lock_bits(bus) & LOCK_MASK;
    if current_switch_val != inv {
        return Some(WaitEvent::SwitchChanged);
    }
    if current_lock_bits != lb {
        return Some(WaitEvent::LockBitsChanged);
    }
    None
}

/// Block until a key is pressed, the invert switch moves away from
/// `current_switch_val`, or the lock jumpers move away from
/// `current_lock_bits`.
///
/// Both baselines are masked values: `DISPLAY_FLAGS & CHIP_INVERT_SWITCH`
/// and `lock bits & LOCK_MASK`. A key wins over a switch change, which
/// wins over a lock change. Expects the extended registers mapped into
/// window 1.
pub fn wait_key_or_switch<B: RegisterBus, K: KeySource>(
    bus: &mut B,
    keys: &mut K,
    current_switch_val: u8,
    current_lock_bits: u8,
) -> WaitEvent {
    bus.poke(VIDEO_MEM_1_LO, DISPLAY_FLAGS);
    loop {
        if let Some(event) = poll_once(bus, keys, current_switch_val, current_lock_bits) {
            debug!("wait finished: {:?}", event);
            return event;
        }
    }
}

/// [`wait_key_or_switch`] giving up after `budget` polls.
pub fn wait_key_or_switch_within<B: RegisterBus, K: KeySource>(
    bus: &mut B,
    keys: &mut K,
    current_switch_val: u8,
    current_lock_bits: u8,
    budget: Budget,
) -> Result<WaitEvent> {
    bus.poke(VIDEO_MEM_1_LO, DISPLAY_FLAGS);
    let mut polls = 0;
    while budget.allows(polls) {
        polls += 1;
        if let Some(event) = poll_once(bus, keys, current_switch_val, current_lock_bits) {
            debug!("wait finished after {} polls: {:?}", polls, event);
            return Ok(event);
        }
    }
    Err(ProbeError::Timeout { polls })
}

pub fn get_version<B: RegisterBus>(bus: &mut B) -> u8 {
    bus.poke(VIDEO_MEM_1_IDX, 0);
    bus.poke(VIDEO_MEM_2_IDX, 0);
    bus.poke(VIDEO_MEM_1_LO, VERSION);
    bus.peek(VIDEO_MEM_1_VAL)
}

pub fn get_lock_bits<B: RegisterBus>(bus: &mut B) -> u8 {
    bus.peek(LOCK_BITS)
}

pub fn get_chip_model<B: RegisterBus>(bus: &mut B) -> u8 {
    bus.poke(VIDEO_MEM_1_LO, CHIP_MODEL);
    bus.peek(VIDEO_MEM_1_VAL)
}

/// What a probe found. The identifiers are only read once the interface
/// is unlocked and the signature matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub enabled: bool,
    pub magic: bool,
    pub version: Option<u8>,
    pub chip_model: Option<ChipModel>,
    pub lock_bits: Option<LockBits>,
}

impl Capabilities {
    pub fn present(&self) -> bool {
        self.enabled && self.magic
    }
}

/// Unlock, check the signature, then read version, model and lock bits.
pub fn probe<B: RegisterBus>(bus: &mut B) -> Capabilities {
    let enabled = enable_kawari(bus);
    let magic = enabled && have_magic(bus);
    if !magic {
        return Capabilities {
            enabled,
            magic,
            version: None,
            chip_model: None,
            lock_bits: None,
        };
    }

    let version = get_version(bus);
    let chip_model = ChipModel::from_raw(get_chip_model(bus));
    let lock_bits = LockBits::from_bits_truncate(get_lock_bits(bus));
    debug!("kawari v{:#04x}, model {}, locks {:?}", version, chip_model, lock_bits);

    Capabilities {
        enabled,
        magic,
        version: Some(version),
        chip_model: Some(chip_model),
        lock_bits: Some(lock_bits),
    }
}
