//! deckforge - generate printable MTG deck PDFs from Archidekt CSV exports

use std::path::PathBuf;

use clap::Parser;
use deckforge::image_cache::DEFAULT_CACHE_DIR;
use deckforge::render::DEFAULT_BLEED_MM;
use deckforge::scryfall::DEFAULT_API_URL;
use deckforge::{
    parse_decklist_file, Config, ConsoleReporter, DeckError, DeckPrinter, ImageQuality,
    QuietReporter, Reporter,
};

/// Generate printable MTG deck PDFs from Archidekt CSV exports
#[derive(Parser, Debug)]
#[command(name = "deckforge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Decklist CSV (quantity,"card name",scryfall_id per line)
    input: PathBuf,

    /// Output PDF filename (defaults to the CSV name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bleed margin in mm around each card
    #[arg(long, default_value_t = DEFAULT_BLEED_MM)]
    bleed: f32,

    /// Suppress progress output
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Scryfall image variant to print: normal, large or png
    #[arg(long, default_value_t = ImageQuality::Normal)]
    quality: ImageQuality,

    /// Directory for downloaded card images
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Scryfall API base URL
    #[arg(long, env = "DECKFORGE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

impl Args {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.input);
        if let Some(output) = self.output {
            config.output_path = output;
        }
        config.bleed_mm = self.bleed;
        config.quiet = self.quiet;
        config.quality = self.quality;
        config.cache_dir = self.cache_dir;
        config.api_url = self.api_url;
        config
    }
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Only errors by default so log lines don't interleave with progress output.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let config = Args::parse().into_config();

    if let Err(e) = run(&config) {
        eprintln!("Error: {e}");
        if let DeckError::NoPages { failures } = &e {
            for failure in failures {
                eprintln!("   • {failure}");
            }
        }
        std::process::exit(1);
    }
}

fn run(config: &Config) -> deckforge::Result<()> {
    log::info!("Reading decklist: {}", config.input_path.display());
    let mut decklist = parse_decklist_file(&config.input_path)?;

    let printer = DeckPrinter::from_config(config)?;

    let mut reporter: Box<dyn Reporter> = if config.quiet {
        Box::new(QuietReporter)
    } else {
        Box::new(ConsoleReporter::new())
    };

    let summary = printer.generate(&mut decklist, reporter.as_mut())?;
    log::info!(
        "Generated {} of {} expected page(s) in {}",
        summary.pages_written,
        summary.expected_pages,
        summary.output_path.display()
    );
    Ok(())
}
