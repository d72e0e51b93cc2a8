//! Flag expansion and the two output formats.
//!
//! Config mode writes one Verilog `` `define `` per line. Compile mode
//! writes `-DNAME=1 ` tokens on a single line for the simulator's
//! compiler invocation.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::settings::{Settings, VersionInfo};
use crate::table::{Feature, Flag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Verilog defines for the HDL build.
    Config,
    /// `-D` flags for compiling the simulator.
    Compile,
}

/// Where a feature's own flag lands relative to its prerequisites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Own flag first, then each prerequisite in turn.
    #[default]
    CallOrder,
    /// Prerequisites first, own flag last.
    DependencyFirst,
}

/// Flags emitted so far for one target.
#[derive(Debug, Clone)]
pub struct Emission {
    target: Target,
    order: Order,
    expanded: HashSet<Feature>,
    seen: HashSet<Flag>,
    flags: Vec<Flag>,
}

impl Emission {
    pub fn new(target: Target, order: Order) -> Self {
        Self {
            target,
            order,
            expanded: HashSet::new(),
            seen: HashSet::new(),
            flags: Vec::new(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Enable `feature` and everything it requires. Returns the flags this
    /// call added; flags already emitted are skipped.
    pub fn enable(&mut self, feature: Feature) -> Vec<Flag> {
        let start = self.flags.len();
        self.expand(feature);
        self.flags[start..].to_vec()
    }

    fn expand(&mut self, feature: Feature) {
        // A feature that was expanded once has all of its flags out already.
        if !self.expanded.insert(feature) {
            return;
        }

        let spec = feature.spec();
        match self.order {
            Order::CallOrder => {
                self.mark(spec.flag);
                for &required in spec.requires {
                    self.expand(required);
                }
            }
            Order::DependencyFirst => {
                for &required in spec.requires {
                    self.expand(required);
                }
                self.mark(spec.flag);
            }
        }
    }

    fn mark(&mut self, flag: Flag) {
        if self.seen.insert(flag) {
            trace!("emit {}", flag);
            self.flags.push(flag);
        }
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.seen.contains(&flag)
    }

    /// Every flag emitted so far, in emission order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn render(&self) -> String {
        self.flags
            .iter()
            .map(|flag| render_flag(self.target, *flag))
            .collect()
    }
}

pub fn render_flag(target: Target, flag: Flag) -> String {
    match target {
        Target::Config => format!("`define {} 1\n", flag.name()),
        Target::Compile => format!("-D{}=1 ", flag.name()),
    }
}

/// Fixed defines written before any preset flags.
pub fn render_preamble(target: Target, version: &VersionInfo) -> String {
    match target {
        Target::Compile => "-DSIMULATOR_BOARD=1 ".to_string(),
        Target::Config => {
            let mut out = String::new();
            out.push_str(&format!("`define VERSION_MAJOR 8'd{}\n", version.major));
            out.push_str(&format!("`define VERSION_MINOR 8'd{}\n", version.minor));
            out.push_str("`define SIMULATOR_BOARD 1\n");
            for (i, suffix) in version.variant_suffix.iter().enumerate() {
                out.push_str(&format!("`define VARIANT_SUFFIX_{} 8'd{}\n", i + 1, suffix));
            }
            out
        }
    }
}

/// Full output for one run: preamble, then the selected preset's flags.
/// An unknown selector yields the preamble alone.
pub fn generate(settings: &Settings, selector: i32, target: Target, order: Order) -> String {
    let mut out = render_preamble(target, &settings.version);

    let book = settings.book();
    let Some(preset) = book.get(selector) else {
        debug!("no preset {}, preamble only", selector);
        return out;
    };

    debug!("preset {} ({}) for {:?}", preset.id, preset.name, target);
    let mut emission = Emission::new(target, order);
    for &feature in &preset.features {
        emission.enable(feature);
    }
    out.push_str(&emission.render());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(flags: &[Flag]) -> Vec<&'static str> {
        flags.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn own_flag_before_prerequisites() {
        let mut emission = Emission::new(Target::Config, Order::CallOrder);
        let added = emission.enable(Feature::HaveFlash);
        assert_eq!(
            names(&added),
            ["HAVE_FLASH", "WITH_SPI", "WITH_EXTENSIONS", "WITH_MATH"]
        );
    }

    #[test]
    fn dependency_first_reverses_nesting() {
        let mut emission = Emission::new(Target::Config, Order::DependencyFirst);
        let added = emission.enable(Feature::HaveFlash);
        assert_eq!(
            names(&added),
            ["WITH_EXTENSIONS", "WITH_SPI", "WITH_MATH", "HAVE_FLASH"]
        );
    }

    #[test]
    fn enabling_twice_adds_nothing() {
        let mut emission = Emission::new(Target::Compile, Order::CallOrder);
        assert_eq!(emission.target(), Target::Compile);
        assert_eq!(emission.enable(Feature::HaveEeprom).len(), 3);
        assert!(emission.enable(Feature::HaveEeprom).is_empty());
        assert!(emission.enable(Feature::WithExt).is_empty());
        assert_eq!(emission.flags().len(), 3);
    }

    #[test]
    fn shared_flag_emitted_once() {
        let mut emission = Emission::new(Target::Config, Order::CallOrder);
        emission.enable(Feature::WithMath);
        let added = emission.enable(Feature::WithRam);
        assert!(added.is_empty());
        assert!(emission.contains(Flag::WithMath));
        assert!(!emission.contains(Flag::WithRam));
    }

    #[test]
    fn render_uses_emission_target() {
        let mut emission = Emission::new(Target::Compile, Order::CallOrder);
        emission.enable(Feature::WithDvi);
        assert_eq!(emission.render(), "-DWITH_DVI=1 -DNEED_RGB=1 ");
    }

    #[test]
    fn render_formats() {
        assert_eq!(render_flag(Target::Config, Flag::WithDvi), "`define WITH_DVI 1\n");
        assert_eq!(render_flag(Target::Compile, Flag::WithDvi), "-DWITH_DVI=1 ");
    }

    #[test]
    fn config_preamble() {
        let out = render_preamble(Target::Config, &VersionInfo::default());
        assert_eq!(
            out,
            "`define VERSION_MAJOR 8'd0\n\
             `define VERSION_MINOR 8'd2\n\
             `define SIMULATOR_BOARD 1\n\
             `define VARIANT_SUFFIX_1 8'd0\n\
             `define VARIANT_SUFFIX_2 8'd0\n\
             `define VARIANT_SUFFIX_3 8'd0\n\
             `define VARIANT_SUFFIX_4 8'd0\n"
        );
    }

    #[test]
    fn compile_preamble_is_board_marker() {
        let version = VersionInfo { major: 9, minor: 9, variant_suffix: [1, 2, 3, 4] };
        assert_eq!(render_preamble(Target::Compile, &version), "-DSIMULATOR_BOARD=1 ");
    }

    #[test]
    fn generate_is_repeatable() {
        let settings = Settings::default();
        let first = generate(&settings, 1, Target::Config, Order::CallOrder);
        let second = generate(&settings, 1, Target::Config, Order::CallOrder);
        assert_eq!(first, second);
    }
}
