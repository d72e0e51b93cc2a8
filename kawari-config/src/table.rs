//! Feature flags and the features that set them.

use serde::Deserialize;

/// A define handed to the HDL or simulator build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    WithExtensions,
    WithRam,
    TestPattern,
    GenLumaChroma,
    ConfigurableRgb,
    ConfigurableLumas,
    ConfigurableTiming,
    HaveLumaSink,
    WithSpi,
    HaveEeprom,
    HaveFlash,
    NeedRgb,
    GenRgb,
    WithDvi,
    HiresModes,
    HideSync,
    With64k,
    WithMath,
}

impl Flag {
    pub const ALL: [Flag; 18] = [
        Flag::WithExtensions,
        Flag::WithRam,
        Flag::TestPattern,
        Flag::GenLumaChroma,
        Flag::ConfigurableRgb,
        Flag::ConfigurableLumas,
        Flag::ConfigurableTiming,
        Flag::HaveLumaSink,
        Flag::WithSpi,
        Flag::HaveEeprom,
        Flag::HaveFlash,
        Flag::NeedRgb,
        Flag::GenRgb,
        Flag::WithDvi,
        Flag::HiresModes,
        Flag::HideSync,
        Flag::With64k,
        Flag::WithMath,
    ];

    /// Name as it appears in the emitted define.
    pub fn name(&self) -> &'static str {
        match self {
            Flag::WithExtensions => "WITH_EXTENSIONS",
            Flag::WithRam => "WITH_RAM",
            Flag::TestPattern => "TEST_PATTERN",
            Flag::GenLumaChroma => "GEN_LUMA_CHROMA",
            Flag::ConfigurableRgb => "CONFIGURABLE_RGB",
            Flag::ConfigurableLumas => "CONFIGURABLE_LUMAS",
            Flag::ConfigurableTiming => "CONFIGURABLE_TIMING",
            Flag::HaveLumaSink => "HAVE_LUMA_SINK",
            Flag::WithSpi => "WITH_SPI",
            Flag::HaveEeprom => "HAVE_EEPROM",
            Flag::HaveFlash => "HAVE_FLASH",
            Flag::NeedRgb => "NEED_RGB",
            Flag::GenRgb => "GEN_RGB",
            Flag::WithDvi => "WITH_DVI",
            Flag::HiresModes => "HIRES_MODES",
            Flag::HideSync => "HIDE_SYNC",
            Flag::With64k => "WITH_64K",
            Flag::WithMath => "WITH_MATH",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Something a preset can ask for. Enabling a feature sets its flag and
/// enables every prerequisite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    WithExt,
    WithRam,
    TestPattern,
    GenLumaChroma,
    ConfigurableRgb,
    ConfigurableLumas,
    ConfigurableTiming,
    LumaSink,
    WithSpi,
    HaveEeprom,
    HaveFlash,
    NeedRgb,
    GenRgb,
    WithDvi,
    HiresModes,
    HideSync,
    #[serde(rename = "with_64k")]
    With64k,
    WithMath,
}

/// Flag set by a feature, and the features it depends on, in the order
/// they are enabled.
pub struct FeatureSpec {
    pub flag: Flag,
    pub requires: &'static [Feature],
}

impl Feature {
    pub const ALL: [Feature; 18] = [
        Feature::WithExt,
        Feature::WithRam,
        Feature::TestPattern,
        Feature::GenLumaChroma,
        Feature::ConfigurableRgb,
        Feature::ConfigurableLumas,
        Feature::ConfigurableTiming,
        Feature::LumaSink,
        Feature::WithSpi,
        Feature::HaveEeprom,
        Feature::HaveFlash,
        Feature::NeedRgb,
        Feature::GenRgb,
        Feature::WithDvi,
        Feature::HiresModes,
        Feature::HideSync,
        Feature::With64k,
        Feature::WithMath,
    ];

    pub fn spec(&self) -> FeatureSpec {
        use Feature::*;

        let (flag, requires): (Flag, &'static [Feature]) = match self {
            WithExt => (Flag::WithExtensions, &[]),
            // RAM support is gated on the math block; WITH_RAM itself is
            // never set by a feature.
            WithRam => (Flag::WithMath, &[WithExt]),
            TestPattern => (Flag::TestPattern, &[]),
            GenLumaChroma => (Flag::GenLumaChroma, &[]),
            ConfigurableRgb => (Flag::ConfigurableRgb, &[WithExt]),
            ConfigurableLumas => (Flag::ConfigurableLumas, &[WithExt]),
            ConfigurableTiming => (Flag::ConfigurableTiming, &[WithExt]),
            LumaSink => (Flag::HaveLumaSink, &[]),
            WithSpi => (Flag::WithSpi, &[WithExt]),
            HaveEeprom => (Flag::HaveEeprom, &[WithSpi]),
            HaveFlash => (Flag::HaveFlash, &[WithSpi, WithRam]),
            NeedRgb => (Flag::NeedRgb, &[]),
            GenRgb => (Flag::GenRgb, &[NeedRgb]),
            WithDvi => (Flag::WithDvi, &[NeedRgb]),
            HiresModes => (Flag::HiresModes, &[WithExt, WithRam]),
            HideSync => (Flag::HideSync, &[]),
            With64k => (Flag::With64k, &[WithExt]),
            WithMath => (Flag::WithMath, &[WithExt]),
        };
        FeatureSpec { flag, requires }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feature::WithExt => "with_ext",
            Feature::WithRam => "with_ram",
            Feature::TestPattern => "test_pattern",
            Feature::GenLumaChroma => "gen_luma_chroma",
            Feature::ConfigurableRgb => "configurable_rgb",
            Feature::ConfigurableLumas => "configurable_lumas",
            Feature::ConfigurableTiming => "configurable_timing",
            Feature::LumaSink => "luma_sink",
            Feature::WithSpi => "with_spi",
            Feature::HaveEeprom => "have_eeprom",
            Feature::HaveFlash => "have_flash",
            Feature::NeedRgb => "need_rgb",
            Feature::GenRgb => "gen_rgb",
            Feature::WithDvi => "with_dvi",
            Feature::HiresModes => "hires_modes",
            Feature::HideSync => "hide_sync",
            Feature::With64k => "with_64k",
            Feature::WithMath => "with_math",
        }
    }
}
