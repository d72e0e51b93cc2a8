//! Kawari build configuration
//!
//! Turns a preset number into the set of feature defines the simulator
//! and the HDL build are compiled with. Features pull in their
//! prerequisites through a declarative table; each flag is emitted at
//! most once per run.

pub mod emit;
pub mod error;
pub mod preset;
pub mod settings;
pub mod table;

pub use emit::{generate, Emission, Order, Target};
pub use error::{ConfigError, Result};
pub use preset::{parse_selector, Preset, PresetBook, NO_PRESET};
pub use settings::{Settings, VersionInfo};
pub use table::{Feature, Flag};
