//! Key sources for [`wait_key_or_switch`](crate::probe::wait_key_or_switch).

use crate::bus::RegisterBus;

/// Number of keys waiting in the KERNAL buffer.
pub const NDX: u16 = 0x00c6;
/// KERNAL keyboard queue.
pub const KEYD: u16 = 0x0277;
/// Queue capacity.
pub const KEYD_LEN: u8 = 10;

/// Something that can be asked for the next key press.
///
/// Returns 0 when no key is waiting, never blocks.
pub trait KeySource {
    fn getin<B: RegisterBus>(&mut self, bus: &mut B) -> u8;
}

/// Pops keys from the KERNAL keyboard buffer, the way GETIN does for the
/// keyboard device.
#[derive(Debug, Default, Clone, Copy)]
pub struct KernalKeyboard;

impl KeySource for KernalKeyboard {
    fn getin<B: RegisterBus>(&mut self, bus: &mut B) -> u8 {
        let pending = bus.peek(NDX).min(KEYD_LEN);
        if pending == 0 {
            return 0;
        }

        let key = bus.peek(KEYD);
        for i in 1..pending as u16 {
            let next = bus.peek(KEYD + i);
            bus.poke(KEYD + i - 1, next);
        }
        bus.poke(NDX, pending - 1);
        key
    }
}

/// Replays a fixed script, one entry per poll, then reports no key forever.
#[derive(Debug, Clone)]
pub struct ScriptedKeys<'a> {
    script: &'a [u8],
    pos: usize,
}

impl<'a> ScriptedKeys<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self { script, pos: 0 }
    }

    /// Never presses anything.
    pub fn none() -> Self {
        Self::new(&[])
    }

    /// How many polls have been answered so far.
    pub fn polls(&self) -> usize {
        self.pos
    }
}

impl KeySource for ScriptedKeys<'_> {
    fn getin<B: RegisterBus>(&mut self, _bus: &mut B) -> u8 {
        let key = self.script.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBus;

    #[test]
    fn kernal_buffer_empty_returns_zero() {
        let mut bus = SimBus::kawari();
        assert_eq!(KernalKeyboard.getin(&mut bus), 0);
    }

    #[test]
    fn kernal_buffer_pops_in_order() {
        let mut bus = SimBus::kawari();
        bus.type_keys(b"AB");

        assert_eq!(KernalKeyboard.getin(&mut bus), b'A');
        assert_eq!(bus.peek(NDX), 1);
        assert_eq!(KernalKeyboard.getin(&mut bus), b'B');
        assert_eq!(KernalKeyboard.getin(&mut bus), 0);
    }

    #[test]
    fn scripted_keys_run_out() {
        let mut bus = SimBus::kawari();
        let mut keys = ScriptedKeys::new(&[0, b'Q']);
        assert_eq!(keys.getin(&mut bus), 0);
        assert_eq!(keys.getin(&mut bus), b'Q');
        assert_eq!(keys.getin(&mut bus), 0);
        assert_eq!(keys.polls(), 3);
    }
}
