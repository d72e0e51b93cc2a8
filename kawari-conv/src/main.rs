//! kawari-conv: turn a 320x200 image into a 16-colour Kawari bitmap.
//!
//! ```text
//! kawari-conv <image>       palette as 18-bit binary, bitmap to 320x200.bin
//! kawari-conv <image> -h    palette as hex channel bytes
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{info, Level};

use kawari_conv::{convert, PaletteFormat, DEFAULT_OUTPUT};

#[derive(Parser)]
#[command(
    name = "kawari-conv",
    about = "Convert an image to the Kawari 16-colour bitmap format",
    version,
    disable_help_flag = true
)]
struct Cli {
    /// Input image (any format the image crate decodes)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Print the palette as hex channel bytes
    #[arg(short = 'h', long)]
    hex: bool,

    /// Bitmap destination
    #[arg(long, short, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Debug logging on stderr
    #[arg(long, short)]
    verbose: bool,

    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn format(&self) -> PaletteFormat {
        if self.hex {
            PaletteFormat::Hex
        } else {
            PaletteFormat::Binary
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

fn run(cli: Cli) -> anyhow::Result<()> {
    let img = image::open(&cli.image)
        .with_context(|| format!("failed to read {}", cli.image.display()))?
        .to_rgb8();

    let conversion = convert(&img)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(conversion.palette.render(cli.format()).as_bytes())?;
    stdout.flush()?;

    fs::write(&cli.output, &conversion.data)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!("wrote {} bytes to {}", conversion.data.len(), cli.output.display());
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
