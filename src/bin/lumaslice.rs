use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use colored::Colorize;
use lumaslice::{
    ExtractionConfig, ExtractionSession, FfmpegLogLevel, OutputShape, RegionSpec, SelectionPolicy,
    output,
};

const CLI_AFTER_HELP: &str = "Examples:
  lumaslice -i input.mp4 -f 10 -w 16
  lumaslice -i input.mp4 -o frames.json -f 0 -c 8 -w 32 --scale";

#[derive(Debug, Parser)]
#[command(
    name = "lumaslice",
    version,
    about = "Extract luma pixel regions from H.264 video frames as JSON",
    after_help = CLI_AFTER_HELP,
    disable_help_flag = true
)]
struct Cli {
    /// Input container file.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output JSON file.
    #[arg(short, long, default_value = "test.json")]
    output: PathBuf,

    /// Ordinal of the first decoded frame to extract (0-based).
    #[arg(short, long, default_value_t = 0)]
    frame: u64,

    /// Extract this many consecutive frames and write a JSON array.
    /// Without it, exactly one frame is written as a JSON object.
    #[arg(short, long)]
    count: Option<u64>,

    /// Region width; also the target width when scaling.
    #[arg(short, long, default_value_t = 32)]
    width: u32,

    /// Region height. Defaults to the width.
    #[arg(long)]
    height: Option<u32>,

    /// Resample each frame to the region size before extracting.
    #[arg(short, long)]
    scale: bool,

    /// Macroblock offset (accepted for compatibility, unused).
    #[arg(short, long)]
    macroblock: Option<u64>,

    /// Do not echo the JSON document to stdout.
    #[arg(short, long)]
    quiet: bool,

    /// Show debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, verbose, debug).
    #[arg(long)]
    log_level: Option<FfmpegLogLevel>,

    /// Pretty-print the JSON document.
    #[arg(long)]
    pretty: bool,

    /// Print usage and exit.
    #[arg(short, long, action = ArgAction::SetTrue)]
    help: bool,
}

impl Cli {
    fn extraction_config(&self) -> Result<ExtractionConfig, lumaslice::LumaError> {
        let policy = match self.count {
            Some(count) => SelectionPolicy::run(self.frame, count)?,
            None => SelectionPolicy::single(self.frame),
        };
        let region = RegionSpec::new(self.width, self.height.unwrap_or(self.width))?;

        Ok(ExtractionConfig::new()
            .with_policy(policy)
            .with_region(region)
            .with_resample(self.scale))
    }
}

fn print_usage() {
    eprintln!("{}", Cli::command().render_help());
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = cli.input.as_ref() else {
        print_usage();
        return Err("missing required --input <path>".into());
    };

    if let Some(level) = cli.log_level {
        lumaslice::set_ffmpeg_log_level(level);
    }
    if let Some(macroblock) = cli.macroblock {
        log::debug!("Ignoring macroblock offset {macroblock}");
    }

    let config = cli.extraction_config()?;
    let shape = OutputShape::for_policy(&config.policy);
    let mut session = ExtractionSession::new(config);

    match session.process(input) {
        Ok(outcome) if outcome.is_short() => log::warn!(
            "Extracted {} of {} requested frames ({} decoded)",
            outcome.selected,
            outcome.requested,
            outcome.decoded
        ),
        Ok(outcome) => log::info!("Extracted {} frames", outcome.selected),
        Err(error) if error.is_recoverable() => {
            eprintln!("{} {}", "warning:".yellow().bold(), error.to_string().yellow());
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    }

    let Some(document) = output::render(session.records(), shape, cli.pretty)? else {
        log::warn!("No frames extracted from {}", input.display());
        return Ok(());
    };

    output::write_document(&cli.output, &document)?;
    if !cli.quiet {
        println!("{document}");
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            std::process::exit(if error.use_stderr() { 1 } else { 0 });
        }
    };

    if cli.help {
        print_usage();
        std::process::exit(1);
    }

    init_logging(cli.verbose);

    if let Err(error) = run(cli) {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use lumaslice::SelectionPolicy;

    use super::Cli;

    #[test]
    fn defaults_select_single_first_frame() {
        let cli = Cli::try_parse_from(["lumaslice", "-i", "in.mp4"]).unwrap();
        let config = cli.extraction_config().unwrap();
        assert_eq!(config.policy, SelectionPolicy::single(0));
        assert_eq!((config.region.width, config.region.height), (32, 32));
        assert!(!config.resample);
        assert_eq!(cli.output.to_str(), Some("test.json"));
    }

    #[test]
    fn count_selects_run_mode() {
        let cli = Cli::try_parse_from([
            "lumaslice", "--input", "in.mp4", "-f", "3", "-c", "4", "-w", "16", "-s", "-m", "7",
        ])
        .unwrap();
        let config = cli.extraction_config().unwrap();
        assert_eq!(config.policy, SelectionPolicy::run(3, 4).unwrap());
        assert_eq!((config.region.width, config.region.height), (16, 16));
        assert!(config.resample);
    }

    #[test]
    fn height_overrides_square_region() {
        let cli = Cli::try_parse_from(["lumaslice", "-i", "in.mp4", "-w", "16", "--height", "8"])
            .unwrap();
        let config = cli.extraction_config().unwrap();
        assert_eq!((config.region.width, config.region.height), (16, 8));
    }

    #[test]
    fn zero_count_is_rejected() {
        let cli = Cli::try_parse_from(["lumaslice", "-i", "in.mp4", "-c", "0"]).unwrap();
        assert!(cli.extraction_config().is_err());
    }

    #[test]
    fn short_help_flag_is_parsed() {
        let cli = Cli::try_parse_from(["lumaslice", "-h"]).unwrap();
        assert!(cli.help);
        assert!(cli.input.is_none());
    }
}
