use std::path::PathBuf;

use clap::Parser;
use gecco_notation::translate::Notation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Tex,
    Sequant,
    Json,
}

impl From<Format> for Notation {
    fn from(format: Format) -> Self {
        match format {
            Format::Tex => Notation::Tex,
            Format::Sequant => Notation::Sequant,
            Format::Json => Notation::Json,
        }
    }
}

/// Translates GeCCo contraction exports into TeX or SeQuant notation.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Export file to read, `-` for stdin
    pub input: PathBuf,
    #[arg(short, long, value_enum, default_value_t = Format::Tex)]
    pub format: Format,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Skip contractions that fail to translate
    #[arg(short, long)]
    pub keep_going: bool,
    /// Raise the log level (info, debug, trace); `RUST_LOG` takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Also write JSON logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "gecco-translate",
            "-",
            "--format",
            "sequant",
            "-k",
            "-vv",
            "--log-file",
            "run.log",
        ]);
        assert_eq!(cli.input, PathBuf::from("-"));
        assert_eq!(Notation::from(cli.format), Notation::Sequant);
        assert!(cli.keep_going);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert_eq!(cli.output, None);
    }

    #[test]
    fn defaults_to_tex() {
        let cli = Cli::parse_from(["gecco-translate", "export.lst"]);
        assert_eq!(cli.format, Format::Tex);
        assert!(!cli.keep_going);
    }
}
