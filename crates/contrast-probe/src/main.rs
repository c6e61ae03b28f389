//! `contrast-probe` - inspect contrast decisions without a browser.
//!
//! ```text
//! contrast-probe check '#336699' --text '#ffffff'
//! contrast-probe check 'rgb(250, 250, 250)' --button outline-button --output json
//! contrast-probe scan page.yaml --config theme-contrast.yaml
//! ```

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use contrast_engine::{ButtonKind, ContrastConfig, ContrastEngine, MockDocument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::report::{check, render_check, render_scan, OutputFormat};

#[derive(Parser)]
#[command(name = "contrast-probe")]
#[command(about = "Inspect WCAG on-accent color decisions", version)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (.yaml, .yml or .json); defaults to the stock theme
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one background/text pairing
    Check {
        /// Background color (hex or rgb()/rgba())
        background: String,

        /// Current text color; omitted means "unknown", which forces an override
        #[arg(long)]
        text: Option<String>,

        /// Treat the element as a button of this kind
        #[arg(long, value_enum, default_value_t = ButtonArg::None)]
        button: ButtonArg,

        /// Whether the background came from an accent variable
        #[arg(long)]
        accent: bool,
    },
    /// Run one engine pass over a YAML page fixture
    Scan {
        /// Page fixture
        page: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ButtonArg {
    /// Not a button
    None,
    /// A button-like element
    Button,
    /// A button-like element with the outline modifier
    OutlineButton,
    /// The outline modifier on a non-button element
    Outline,
}

impl From<ButtonArg> for ButtonKind {
    fn from(arg: ButtonArg) -> Self {
        match arg {
            ButtonArg::None => ButtonKind::NotButton,
            ButtonArg::Button => ButtonKind::OtherButtonLike,
            ButtonArg::OutlineButton => ButtonKind::OutlineButton,
            ButtonArg::Outline => ButtonKind::Plain,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "contrast_engine=debug,contrast_color=debug"
    } else {
        "contrast_engine=warn,contrast_color=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ContrastConfig> {
    match path {
        Some(path) => ContrastConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ContrastConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    let rendered = match cli.command {
        Command::Check {
            background,
            text,
            button,
            accent,
        } => {
            let result = check(&config, &background, text.as_deref(), button.into(), accent)?;
            render_check(&result, cli.output)?
        }
        Command::Scan { page } => {
            tracing::debug!(page = %page.display(), "scanning fixture");
            let yaml = std::fs::read_to_string(&page)
                .with_context(|| format!("reading page fixture {}", page.display()))?;
            let mut doc = MockDocument::from_yaml(&yaml)
                .with_context(|| format!("parsing page fixture {}", page.display()))?;
            let mut engine = ContrastEngine::new(config);
            let report = engine.run_pass(&mut doc);
            render_scan(&report, cli.output)?
        }
    };

    println!("{}", rendered);
    Ok(())
}
