//! Built-in presets and selector parsing.

use std::collections::BTreeMap;

use crate::table::Feature;
use crate::table::Feature::*;

/// Selector used when no preset argument is given.
pub const NO_PRESET: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: i32,
    pub name: String,
    /// Enabled in this order.
    pub features: Vec<Feature>,
}

impl Preset {
    pub fn new(id: i32, name: impl Into<String>, features: &[Feature]) -> Self {
        Self {
            id,
            name: name.into(),
            features: features.to_vec(),
        }
    }
}

/// The nine presets the simulator is built with.
///
/// For cycle by cycle stepping in the simulator, pick a preset without
/// RGB or hires modes so the native pixel sequencer values are used.
pub fn builtin() -> Vec<Preset> {
    vec![
        Preset::new(
            0,
            "full",
            &[GenLumaChroma, LumaSink, ConfigurableRgb, GenRgb, HiresModes, With64k],
        ),
        // Hides sync lines; used to generate test results.
        Preset::new(
            1,
            "test-results",
            &[GenLumaChroma, HaveFlash, WithDvi, HiresModes, HideSync],
        ),
        Preset::new(2, "eeprom", &[GenLumaChroma, HaveEeprom]),
        Preset::new(3, "dvi-rgb", &[WithDvi, GenRgb]),
        Preset::new(4, "test-pattern", &[TestPattern]),
        // DVI without RGB output.
        Preset::new(5, "dvi-only", &[WithDvi]),
        Preset::new(
            6,
            "configurable",
            &[GenLumaChroma, GenRgb, ConfigurableRgb, ConfigurableLumas, ConfigurableTiming],
        ),
        // Plain VIC replacement, no extensions.
        Preset::new(7, "vic-replacement", &[GenLumaChroma, LumaSink]),
        Preset::new(8, "extensions-only", &[GenLumaChroma, WithExt, WithMath]),
    ]
}

/// Presets by id.
#[derive(Debug, Clone)]
pub struct PresetBook {
    presets: BTreeMap<i32, Preset>,
}

impl PresetBook {
    pub fn builtin() -> Self {
        Self {
            presets: builtin().into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Add a preset, replacing any with the same id.
    pub fn insert(&mut self, preset: Preset) -> Option<Preset> {
        self.presets.insert(preset.id, preset)
    }

    pub fn get(&self, id: i32) -> Option<&Preset> {
        self.presets.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Read a selector the way C `atoi` does: skip leading whitespace, take
/// an optional sign and as many digits as follow. No digits means 0.
/// A missing argument selects nothing.
pub fn parse_selector(arg: Option<&str>) -> i32 {
    let Some(arg) = arg else {
        return NO_PRESET;
    };

    let s = arg.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
