use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use ogrinfo_validator::{inspect_file, InspectOption, LimitsConfig, OgrInfo, OptionSet};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn cli() -> Command {
    Command::new("ogrinfo-validator")
        .version("1.0")
        .author("Jesper Fjellin")
        .about("Validates a vector file, inspects it with ogrinfo and reports its metadata as JSON")
        .arg(
            Arg::new("file")
                .required(true)
                .help("GeoJSON, GeoCSV, zipped shapefile or other vector file to inspect"),
        )
        .arg(
            Arg::new("option")
                .short('o')
                .long("option")
                .num_args(1)
                .action(ArgAction::Append)
                .value_parser(["summaryOnly", "listAll"])
                .help("Inspection option, repeatable and kept in order (summaryOnly, listAll)"),
        )
        .arg(
            Arg::new("feature-count")
                .long("feature-count")
                .value_parser(clap::value_parser!(u64).range(1..))
                .help("Report a violation when the layer has at least this many features"),
        )
        .arg(
            Arg::new("check-extent")
                .long("check-extent")
                .action(ArgAction::SetTrue)
                .help("Report a violation when the layer extent leaves the lon/lat domain"),
        )
        .arg(
            Arg::new("ogrinfo")
                .long("ogrinfo")
                .env("OGRINFO_BIN")
                .default_value(ogrinfo_validator::tool::DEFAULT_PROGRAM)
                .help("Path to the ogrinfo executable"),
        )
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    init_logging();

    let file = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .context("missing input file")?;

    let options = matches
        .get_many::<String>("option")
        .map(|names| {
            names
                .map(|name| name.parse::<InspectOption>())
                .collect::<Result<Vec<_>, _>>()
                .map(OptionSet::new)
        })
        .transpose()?;

    // Limits only apply when at least one was asked for
    let mut limits = None;
    if let Some(ceiling) = matches.get_one::<u64>("feature-count") {
        limits = Some(LimitsConfig::new().with_feature_count(*ceiling));
    }
    if matches.get_flag("check-extent") {
        limits = Some(limits.unwrap_or_default().with_check_extent(true));
    }

    let program = matches
        .get_one::<String>("ogrinfo")
        .context("missing ogrinfo program")?;
    let tool = OgrInfo::new(program);

    match inspect_file(&tool, &file, options.as_ref(), limits.as_ref()) {
        Ok(metadata) => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

// Logs go to stderr so stdout carries only the JSON result
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
