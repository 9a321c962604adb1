use std::path::PathBuf;

use clap::{arg, ArgMatches, Command};

use crate::output::Destination;
use crate::settings::{Settings, DEFAULT_ENV_FILE};

pub fn command(name: &'static str, about: &'static str) -> Command<'static> {
    Command::new(name)
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .arg(arg!(output: -o --output [FILE] "Writes the report to FILE instead of RESULT_FILE or standard output."))
        .arg(
            arg!(environment: -e --environment [FILE] "Reads settings from the given dotenv file.")
                .default_value(DEFAULT_ENV_FILE),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub output: Option<Destination>,
    pub environment: PathBuf,
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            output: matches.value_of("output").map(Destination::from),
            environment: PathBuf::from(matches.value_of("environment").unwrap_or(DEFAULT_ENV_FILE)),
        }
    }

    /// `--output` wins over `RESULT_FILE`; standard output is the fallback.
    pub fn destination(&self, settings: &Settings) -> Destination {
        self.output
            .clone()
            .or_else(|| settings.result_file.as_deref().map(Destination::from))
            .unwrap_or(Destination::Stdout)
    }
}
