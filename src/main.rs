//! Kawari probe demo
//!
//! Runs the same probe sequence the demo disks use, against a simulated
//! register bank, and prints what it found.

use kawari_hal::regs::{DISPLAY_FLAGS, LOCK_MASK, VIDEO_MEM_1_LO, VIDEO_MEM_1_VAL, VIDEO_MEM_FLAGS};
use kawari_hal::sim::{SimBus, Stimulus};
use kawari_hal::{
    probe, safe_poke_within, wait_key_or_switch_within, Budget, DisplayFlags, MemFlags,
    RegisterBus, ScriptedKeys, WaitEvent,
};
use tracing::Level;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .compact()
        .init();

    print_banner();

    let mut bus = board();
    let caps = probe(&mut bus);

    println!("\n📋 Probe results:");
    println!("   {} extended registers", mark(caps.enabled));
    println!("   {} magic signature", mark(caps.magic));

    if !caps.present() {
        println!("\n⚠️  No Kawari found, continuing as a stock VIC-II");
        return;
    }

    if let (Some(version), Some(model), Some(locks)) = (caps.version, caps.chip_model, caps.lock_bits) {
        println!("   ✅ version {}.{}", version >> 4, version & 0x0f);
        println!("   ✅ chip model {} ({})", model, if model.is_ntsc() { "NTSC" } else { "PAL" });
        println!("   ✅ lock bits {:?}", locks);
    }

    persist_white_line(&mut bus);
    wait_for_switch(&mut bus);
}

#[cfg(not(feature = "STOCK_VIC"))]
fn board() -> SimBus {
    SimBus::kawari()
        .with_version(0x02)
        .with_chip_model(1)
        .with_lock_bits(0x08)
        .with_persist_delay(4)
}

#[cfg(feature = "STOCK_VIC")]
fn board() -> SimBus {
    SimBus::stock_vic()
}

/// Set the white line flag and persist it, waiting out the busy bit.
fn persist_white_line(bus: &mut SimBus) {
    println!("\n💾 Persisting display flags...");
    bus.poke(VIDEO_MEM_FLAGS, (MemFlags::REGS | MemFlags::PERSIST).bits());
    bus.poke(VIDEO_MEM_1_LO, DISPLAY_FLAGS);
    let flags = bus.peek(VIDEO_MEM_1_VAL) | DisplayFlags::WHITE_LINE.bits();

    match safe_poke_within(bus, VIDEO_MEM_1_VAL, flags, Budget::polls(100)) {
        Ok(polls) => println!("   ✅ written after {} busy polls", polls),
        Err(e) => println!("   ❌ {}", e),
    }
    // Second write has to wait for the first to land.
    match safe_poke_within(bus, VIDEO_MEM_1_VAL, flags, Budget::polls(100)) {
        Ok(polls) => println!("   ✅ rewritten after {} busy polls", polls),
        Err(e) => println!("   ❌ {}", e),
    }
    bus.poke(VIDEO_MEM_FLAGS, MemFlags::REGS.bits());
}

/// Wait for the invert switch; the simulated user flips it on the fifth poll.
fn wait_for_switch(bus: &mut SimBus) {
    println!("\n🎯 Waiting for key or switch...");
    bus.poke(VIDEO_MEM_1_LO, DISPLAY_FLAGS);
    let switch = bus.peek(VIDEO_MEM_1_VAL) & DisplayFlags::CHIP_INVERT_SWITCH.bits();
    let locks = kawari_hal::get_lock_bits(bus) & LOCK_MASK;

    bus.schedule(5, Stimulus { flip_switch: true, lock_bits: None });
    let mut keys = ScriptedKeys::none();
    match wait_key_or_switch_within(bus, &mut keys, switch, locks, Budget::polls(50)) {
        Ok(WaitEvent::Key(key)) => println!("   ⌨️  key {:?}", key as char),
        Ok(event) => println!("   🔀 {:?} ('{}')", event, event.code() as char),
        Err(e) => println!("   ❌ {}", e),
    }
}

fn mark(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}

fn print_banner() {
    println!("🚀 ============================================");
    println!("🚀  Kawari Probe Demo");
    println!("🚀 ============================================");
}
