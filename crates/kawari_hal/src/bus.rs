//! Register access capability.

/// Byte-wide access to the 6510 address space.
///
/// Reads take `&mut self` because reading a hardware register can have
/// side effects (the simulated bank counts busy polls on reads).
pub trait RegisterBus {
    fn peek(&mut self, addr: u16) -> u8;
    fn poke(&mut self, addr: u16, value: u8);

    /// Read-modify-write: OR `bits` into the register.
    fn set_bits(&mut self, addr: u16, bits: u8) {
        let value = self.peek(addr) | bits;
        self.poke(addr, value);
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    #[inline(always)]
    fn peek(&mut self, addr: u16) -> u8 {
        (**self).peek(addr)
    }

    #[inline(always)]
    fn poke(&mut self, addr: u16, value: u8) {
        (**self).poke(addr, value)
    }
}

/// The live address space: every access is a volatile load or store.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only valid when running on the target with the I/O page banked in.
    /// Every address handed to the bus is dereferenced as-is.
    pub const unsafe fn new() -> Self {
        Mmio { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn peek(&mut self, addr: u16) -> u8 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }

    #[inline(always)]
    fn poke(&mut self, addr: u16, value: u8) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, value) }
    }
}
