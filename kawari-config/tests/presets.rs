use kawari_config::{generate, Order, Settings, Target};

const PREAMBLE: &str = "`define VERSION_MAJOR 8'd0\n\
`define VERSION_MINOR 8'd2\n\
`define SIMULATOR_BOARD 1\n\
`define VARIANT_SUFFIX_1 8'd0\n\
`define VARIANT_SUFFIX_2 8'd0\n\
`define VARIANT_SUFFIX_3 8'd0\n\
`define VARIANT_SUFFIX_4 8'd0\n";

/// Flags each preset emits, worked out by hand from the enable calls.
const EXPECTED: [&[&str]; 9] = [
    &[
        "GEN_LUMA_CHROMA",
        "HAVE_LUMA_SINK",
        "CONFIGURABLE_RGB",
        "WITH_EXTENSIONS",
        "GEN_RGB",
        "NEED_RGB",
        "HIRES_MODES",
        "WITH_MATH",
        "WITH_64K",
    ],
    &[
        "GEN_LUMA_CHROMA",
        "HAVE_FLASH",
        "WITH_SPI",
        "WITH_EXTENSIONS",
        "WITH_MATH",
        "WITH_DVI",
        "NEED_RGB",
        "HIRES_MODES",
        "HIDE_SYNC",
    ],
    &["GEN_LUMA_CHROMA", "HAVE_EEPROM", "WITH_SPI", "WITH_EXTENSIONS"],
    &["WITH_DVI", "NEED_RGB", "GEN_RGB"],
    &["TEST_PATTERN"],
    &["WITH_DVI", "NEED_RGB"],
    &[
        "GEN_LUMA_CHROMA",
        "GEN_RGB",
        "NEED_RGB",
        "CONFIGURABLE_RGB",
        "WITH_EXTENSIONS",
        "CONFIGURABLE_LUMAS",
        "CONFIGURABLE_TIMING",
    ],
    &["GEN_LUMA_CHROMA", "HAVE_LUMA_SINK"],
    &["GEN_LUMA_CHROMA", "WITH_EXTENSIONS", "WITH_MATH"],
];

fn config_text(flags: &[&str]) -> String {
    let mut out = PREAMBLE.to_string();
    for flag in flags {
        out.push_str(&format!("`define {} 1\n", flag));
    }
    out
}

fn compile_text(flags: &[&str]) -> String {
    let mut out = "-DSIMULATOR_BOARD=1 ".to_string();
    for flag in flags {
        out.push_str(&format!("-D{}=1 ", flag));
    }
    out
}

#[test]
fn every_preset_in_config_mode() {
    let settings = Settings::default();
    for (id, flags) in EXPECTED.iter().enumerate() {
        assert_eq!(
            generate(&settings, id as i32, Target::Config, Order::CallOrder),
            config_text(flags),
            "preset {}",
            id
        );
    }
}

#[test]
fn every_preset_in_compile_mode() {
    let settings = Settings::default();
    for (id, flags) in EXPECTED.iter().enumerate() {
        assert_eq!(
            generate(&settings, id as i32, Target::Compile, Order::CallOrder),
            compile_text(flags),
            "preset {}",
            id
        );
    }
}

#[test]
fn no_flag_repeats() {
    let settings = Settings::default();
    for id in 0..9 {
        for order in [Order::CallOrder, Order::DependencyFirst] {
            let out = generate(&settings, id, Target::Config, order);
            let mut lines: Vec<_> = out.lines().collect();
            let total = lines.len();
            lines.sort();
            lines.dedup();
            assert_eq!(lines.len(), total, "preset {} {:?}", id, order);
        }
    }
}

#[test]
fn test_pattern_is_single_line() {
    let out = generate(&Settings::default(), 4, Target::Config, Order::CallOrder);
    assert_eq!(out, format!("{}`define TEST_PATTERN 1\n", PREAMBLE));
}

#[test]
fn dvi_pulls_need_rgb_only() {
    let out = generate(&Settings::default(), 5, Target::Config, Order::CallOrder);
    assert_eq!(out, format!("{}`define WITH_DVI 1\n`define NEED_RGB 1\n", PREAMBLE));
}

#[test]
fn eeprom_compile_line() {
    let out = generate(&Settings::default(), 2, Target::Compile, Order::CallOrder);
    assert_eq!(
        out,
        "-DSIMULATOR_BOARD=1 -DGEN_LUMA_CHROMA=1 -DHAVE_EEPROM=1 -DWITH_SPI=1 -DWITH_EXTENSIONS=1 "
    );
}

#[test]
fn unknown_preset_is_preamble_only() {
    let settings = Settings::default();
    assert_eq!(generate(&settings, 99, Target::Config, Order::CallOrder), PREAMBLE);
    assert_eq!(generate(&settings, -1, Target::Config, Order::CallOrder), PREAMBLE);
    assert_eq!(
        generate(&settings, 99, Target::Compile, Order::CallOrder),
        "-DSIMULATOR_BOARD=1 "
    );
}

#[test]
fn dependency_first_puts_prerequisites_before() {
    let out = generate(&Settings::default(), 5, Target::Config, Order::DependencyFirst);
    assert_eq!(out, format!("{}`define NEED_RGB 1\n`define WITH_DVI 1\n", PREAMBLE));
}

#[test]
fn same_flag_set_in_either_order() {
    let settings = Settings::default();
    for id in 0..9 {
        let mut call: Vec<_> = generate(&settings, id, Target::Config, Order::CallOrder)
            .lines()
            .map(String::from)
            .collect();
        let mut dep: Vec<_> = generate(&settings, id, Target::Config, Order::DependencyFirst)
            .lines()
            .map(String::from)
            .collect();
        call.sort();
        dep.sort();
        assert_eq!(call, dep, "preset {}", id);
    }
}
