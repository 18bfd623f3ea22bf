use crate::readers::InputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid-forecast")]
#[command(about = "Aggregates decoded weather grid records into per-location forecast JSON")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: grid-forecast.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Suppress progress and summary output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a decoded record dump and write the forecast document
    Convert {
        #[arg(short, long, help = "Decoded grid record file (.csv or .jsonl)")]
        input: PathBuf,

        #[arg(short, long, value_enum, help = "Input format [default: from file extension]")]
        format: Option<InputFormat>,

        #[arg(short, long, help = "Output JSON file [default: stdout]")]
        output: Option<PathBuf>,

        #[arg(long, conflicts_with = "unsorted", help = "Order locations and timestamps")]
        sorted: bool,

        #[arg(long, help = "Keep map iteration order")]
        unsorted: bool,

        #[arg(long, help = "Pretty-print the document")]
        pretty: bool,

        #[arg(long, help = "Aggregation worker threads [default: from configuration]")]
        workers: Option<usize>,

        #[arg(long, help = "Bounding box filter: minLon,minLat,maxLon,maxLat")]
        bbox: Option<String>,

        #[arg(long, help = "Earliest valid-time, e.g. 2022-08-17T12:00:00Z")]
        start: Option<String>,

        #[arg(long, help = "Latest valid-time, e.g. 2022-08-17T18:00:00Z")]
        end: Option<String>,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,
    },

    /// Summarize a decoded record dump without writing JSON
    Inspect {
        #[arg(short, long, help = "Decoded grid record file (.csv or .jsonl)")]
        input: PathBuf,

        #[arg(short, long, value_enum, help = "Input format [default: from file extension]")]
        format: Option<InputFormat>,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "grid-forecast",
            "convert",
            "--input",
            "dump.csv",
            "--unsorted",
            "--bbox",
            "19.0,59.5,31.5,70.1",
            "-q",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Convert {
                input,
                format,
                unsorted,
                bbox,
                ..
            } => {
                assert_eq!(input, PathBuf::from("dump.csv"));
                assert_eq!(format, None);
                assert!(unsorted);
                assert_eq!(bbox.as_deref(), Some("19.0,59.5,31.5,70.1"));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_sorted_conflicts_with_unsorted() {
        let result = Cli::try_parse_from([
            "grid-forecast",
            "convert",
            "-i",
            "dump.csv",
            "--sorted",
            "--unsorted",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_alias() {
        let cli = Cli::try_parse_from(["grid-forecast", "inspect", "-i", "dump.txt", "-f", "ndjson"])
            .unwrap();
        match cli.command {
            Commands::Inspect { format, .. } => assert_eq!(format, Some(InputFormat::Jsonl)),
            _ => panic!("expected inspect"),
        }
    }
}
