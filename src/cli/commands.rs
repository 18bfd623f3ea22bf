use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::processors::{ForecastPipeline, RecordFilter};
use crate::readers::InputFormat;
use crate::settings::Settings;
use crate::utils::constants::TIMESTAMP_FORMAT;
use crate::utils::progress::ProgressReporter;
use crate::writers::JsonWriter;
use std::io::Write;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose, &cli.log_level)?;

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            input,
            format,
            output,
            sorted,
            unsorted,
            pretty,
            workers,
            bbox,
            start,
            end,
            mmap,
        } => {
            let sorted = (sorted || unsorted).then_some(sorted);
            settings.apply_overrides(workers, sorted, pretty)?;

            let format = resolve_format(&input, format)?;
            let filter = RecordFilter::from_args(bbox.as_deref(), start.as_deref(), end.as_deref())?;

            info!(
                input = %input.display(),
                ?format,
                workers = settings.aggregation.workers,
                "Converting grid records"
            );

            let progress = ProgressReporter::new_spinner("Converting grid records...", cli.quiet);
            let pipeline = ForecastPipeline::from_settings(&settings)
                .with_filter(filter)
                .with_mmap(mmap);
            let (forecast, stats) = pipeline.run(&input, format, Some(&progress))?;

            progress.finish_with_message(&format!(
                "Aggregated {} locations, {} forecast items",
                forecast.location_count(),
                forecast.item_count()
            ));

            let writer = JsonWriter::new()
                .with_sorted(settings.output.sorted)
                .with_pretty(settings.output.pretty);

            match output {
                Some(path) => {
                    // Create output directory if it doesn't exist
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }

                    let written = writer.write_file(&forecast, &path)?;
                    info!(output = %path.display(), bytes = written, "Wrote forecast document");
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    writer.write_to(&forecast, &mut handle)?;
                    writeln!(handle)?;
                }
            }

            if !cli.quiet {
                eprintln!("\n{}", stats);
            }
        }

        Commands::Inspect {
            input,
            format,
            mmap,
        } => {
            let format = resolve_format(&input, format)?;
            let progress = ProgressReporter::new_spinner("Inspecting grid records...", cli.quiet);

            let pipeline = ForecastPipeline::from_settings(&settings).with_mmap(mmap);
            let (forecast, stats) = pipeline.run(&input, format, Some(&progress))?;
            progress.finish_with_message("Inspection complete");

            println!("Input: {} ({:?})", input.display(), format);
            println!("{}", stats);
            println!("Locations:        {}", forecast.location_count());
            println!("Forecast items:   {}", forecast.item_count());

            match forecast.time_span() {
                Some((first, last)) => println!(
                    "Valid-times:      {} .. {}",
                    first.format(TIMESTAMP_FORMAT),
                    last.format(TIMESTAMP_FORMAT)
                ),
                None => println!("Valid-times:      none"),
            }
        }
    }

    Ok(())
}

fn resolve_format(input: &Path, format: Option<InputFormat>) -> Result<InputFormat> {
    match format {
        Some(format) => Ok(format),
        None => InputFormat::from_path(input),
    }
}

/// Install the global subscriber; logs go to stderr so stdout can carry the document
fn init_tracing(verbose: bool, log_level: &str) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ProcessingError::Config(format!("Failed to install logger: {}", e)))
}
