use anyhow::{Context, Result};
use clap::Parser;

use detailer::cli::CliArgs;
use detailer::config::DetailerConfig;
use detailer::script::{self, Script};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    detailer::tracing::init(args.log_file);

    let config = match &args.config {
        Some(path) => DetailerConfig::load_from(path),
        None => DetailerConfig::load(),
    };

    let script = Script::from_path(&args.script)
        .with_context(|| format!("Failed to load {}", args.script.display()))?;
    let transcript = script::run(&script, config.presentation)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    } else {
        print!("{}", transcript);
    }
    Ok(())
}
