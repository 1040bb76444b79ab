use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quatgen_core::{generate, Convention, GeneratorConfig, Layout, Simplification};

#[derive(Parser)]
#[command(
    name = "quatgen",
    about = "Print the closed-form rotation of the basis vectors by a symbolic quaternion",
    long_about = "Builds a symbolic quaternion q = (x, y, z, w), rotates e1, e2 and e3 with the\n\
                  sandwich product and prints the rotated vectors. Each printed vector is one\n\
                  column of the rotation matrix (column-major).",
    version
)]
struct Cli {
    /// Prefix of the four quaternion symbols ({prefix}x, {prefix}y, ...)
    #[arg(long, default_value = "q.")]
    prefix: String,

    /// Operand order of the sandwich product
    #[arg(long, value_enum, default_value_t = Convention::InverseLeft)]
    convention: Convention,

    /// How far the expressions are reduced before printing
    #[arg(long = "simplify", value_enum, default_value_t = Simplification::Local)]
    simplification: Simplification,

    /// Output layout
    #[arg(long, value_enum, default_value_t = Layout::Columns)]
    layout: Layout,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for GeneratorConfig {
    fn from(cli: Cli) -> Self {
        GeneratorConfig {
            prefix: cli.prefix,
            convention: cli.convention,
            simplification: cli.simplification,
            layout: cli.layout,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // stdout sadece üretilen ifadeler içindir
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = GeneratorConfig::from(cli);
    tracing::debug!(?config, "starting generator");

    match generate(&config) {
        Ok(text) => print!("{}", text),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
