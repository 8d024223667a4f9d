use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "taskman",
    about = concat!("taskman v", env!("CARGO_PKG_VERSION"), " - the simplest way to organize your tasks"),
    version
)]
pub struct Cli {
    /// Task data file (default: storage.file from the config, else tasks.json)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Config file (default: taskman.toml in the current directory, if present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["taskman"]).unwrap();
        assert!(cli.file.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_file_and_config_flags() {
        let cli =
            Cli::try_parse_from(["taskman", "-f", "work.json", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("work.json")));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_positional_args_rejected() {
        assert!(Cli::try_parse_from(["taskman", "list"]).is_err());
    }
}
