mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use flexi_logger::{json_format, Duplicate, FileSpec, Logger, LoggerHandle};
use gecco_notation::translate::{translate, TranslateOptions};
use log::{info, LevelFilter};

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs to stderr, or as JSON to `--log-file` with warnings duplicated to stderr.
fn setup_logging(cli: &Cli) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(level(cli.verbose).as_str().to_lowercase())?;
    let logger = match &cli.log_file {
        Some(path) => logger
            .format_for_files(json_format)
            .log_to_file(FileSpec::try_from(path.clone())?)
            .duplicate_to_stderr(Duplicate::Warn),
        None => logger.log_to_stderr(),
    };
    Ok(logger.start()?)
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read export from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
    }
}

fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write to stdout"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli)?;

    let text = read_input(&cli.input)?;
    let options = TranslateOptions {
        notation: cli.format.into(),
        keep_going: cli.keep_going,
    };
    info!(input:? = cli.input, notation:? = options.notation; "Translating export");

    let output = translate(&text, &options)
        .with_context(|| format!("failed to translate {}", cli.input.display()))?;
    write_output(cli.output.as_deref(), &output)
}
