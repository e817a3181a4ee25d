use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mediasort_core::{
    organize_with_control, write_report, CancellationToken, CollisionPolicy, OrganizerConfig,
    ProgressEvent, RunControl, REPORT_FILENAME,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mediasort", version, about = "Copy photos, videos and PDFs into a date-bucketed library")]
struct Cli {
    /// Folder to read media from (walked recursively)
    source: PathBuf,

    /// Library folder to copy into
    destination: PathBuf,

    /// JSON file with extensions, folder names and collision policy
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the error report
    #[arg(long, default_value = REPORT_FILENAME)]
    report: PathBuf,

    /// What to do when two photos get the same name
    #[arg(long, value_enum)]
    on_collision: Option<CollisionPolicy>,

    /// Date photos without EXIF from names like IMG_20190509_154733.jpg
    #[arg(long)]
    guess_from_filename: bool,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let t_total = Instant::now();

    let mut config = match &cli.config {
        Some(path) => OrganizerConfig::load(path)?,
        None => OrganizerConfig::default(),
    };
    if let Some(policy) = cli.on_collision {
        config.on_collision = policy;
    }
    if cli.guess_from_filename {
        config.guess_from_filename = true;
    }

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install Ctrl-C handler")?;
    let control = RunControl::new().with_cancel_token(token);

    // Log lines and the spinner share stderr, so only spin when quiet.
    let spinner = if cli.verbose == 0 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {pos} files {wide_msg}")
                .expect("static progress template"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    } else {
        ProgressBar::hidden()
    };

    let result = organize_with_control(&cli.source, &cli.destination, config, &control, &|event| {
        match event {
            ProgressEvent::File(path) => {
                spinner.inc(1);
                spinner.set_message(path.display().to_string());
            }
            ProgressEvent::Milestone { photos } => {
                spinner.suspend(|| println!("{} processed files", photos));
            }
        }
    });
    spinner.finish_and_clear();
    let stats = result?;

    match write_report(&cli.report, &stats) {
        Ok(()) => println!("{} file generated successfully.", cli.report.display()),
        Err(e) => error!("{e}"),
    }
    println!("{stats}");

    info!("finished in {:.2}s", t_total.elapsed().as_secs_f64());
    Ok(())
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
