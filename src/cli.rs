//! Command-line argument parsing for the episode replay tool

use clap::Parser;
use std::path::PathBuf;

/// Replay a detail-editing episode script and print what the host would see
#[derive(Parser, Debug)]
#[command(name = "detailer", version, about = "Replay a detail-editing episode")]
pub struct CliArgs {
    /// Episode script (YAML)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Print the transcript as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write debug logs to the config logs directory
    #[arg(long)]
    pub log_file: bool,

    /// Presentation config file (defaults to ~/.config/detailer/config.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_only() {
        let args = CliArgs::try_parse_from(["detailer", "episode.yaml"]).unwrap();
        assert_eq!(args.script, PathBuf::from("episode.yaml"));
        assert!(!args.json);
        assert!(!args.log_file);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_flags() {
        let args = CliArgs::try_parse_from([
            "detailer",
            "--json",
            "--log-file",
            "--config",
            "custom.yaml",
            "episode.yaml",
        ])
        .unwrap();
        assert!(args.json);
        assert!(args.log_file);
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn test_script_is_required() {
        assert!(CliArgs::try_parse_from(["detailer"]).is_err());
    }
}
