//! kawari-config: print the defines for one build preset.
//!
//! ```text
//! kawari-config <preset>          Verilog defines for the HDL build
//! kawari-config <preset> <any>    -D flags for the simulator compile
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;

use kawari_config::{generate, parse_selector, Order, Settings, Target};

#[derive(Parser)]
#[command(
    name = "kawari-config",
    about = "Emit Kawari feature defines for a build preset",
    version,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// TOML file with version constants and extra presets
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Placement of a feature's flag relative to its prerequisites
    #[arg(long, value_enum, default_value_t = OrderArg::Call)]
    order: OrderArg,

    /// Write to a file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// List presets and exit
    #[arg(long)]
    list: bool,

    /// Debug logging on stderr
    #[arg(long, short)]
    verbose: bool,

    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    /// <preset> [compile]: a preset number, then any value to switch to
    /// compiler defines. Everything from the preset on is taken verbatim.
    #[arg(
        value_name = "ARGS",
        allow_hyphen_values = true,
        allow_negative_numbers = true,
        trailing_var_arg = true
    )]
    args: Vec<String>,
}

impl Cli {
    fn selector(&self) -> i32 {
        parse_selector(self.args.first().map(String::as_str))
    }

    /// The second argument counts by presence alone.
    fn target(&self) -> Target {
        if self.args.get(1).is_some() {
            Target::Compile
        } else {
            Target::Config
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Call,
    DependencyFirst,
}

impl From<OrderArg> for Order {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Call => Order::CallOrder,
            OrderArg::DependencyFirst => Order::DependencyFirst,
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .compact()
        .init();
}

fn list(settings: &Settings) -> String {
    let mut out = String::from("📋 Presets:\n");
    for preset in settings.book().iter() {
        let features: Vec<_> = preset.features.iter().map(|f| f.name()).collect();
        out.push_str(&format!("  {:>2}  {:<16} {}\n", preset.id, preset.name, features.join(", ")));
    }
    out
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let text = if cli.list {
        list(&settings)
    } else {
        generate(&settings, cli.selector(), cli.target(), cli.order.into())
    };

    match &cli.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        process::exit(1);
    }
}
