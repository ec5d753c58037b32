//! Config extraction errors.

use crate::Config;
use figment::providers::{Format, Toml};
use std::{error::Error, fmt};

/// Failure to extract a [`Config`] from its figment.
///
/// Displays every distinct figment error on its own line, tagged with where the bad value came
/// from.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    error: figment::Error,
}

impl ExtractConfigError {
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to extract oxie config:")?;
        let mut seen = Vec::new();
        for err in self.error.clone() {
            let from_file =
                err.metadata.as_ref().is_some_and(|meta| meta.name.contains(Toml::NAME));
            let origin = if from_file { Config::FILE_NAME } else { "config" };
            let setting = if err.path.is_empty() {
                String::new()
            } else {
                format!(" for setting `{}`", err.path.join("."))
            };
            let line = format!("{origin}: {err}{setting}");
            if !seen.contains(&line) {
                write!(f, "\n{line}")?;
                seen.push(line);
            }
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}
