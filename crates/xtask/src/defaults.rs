use std::{fs, io, path::{Path, PathBuf}};

use kubermatic_operator::{KubermaticConfiguration, defaults};
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read configuration from {path}", path = path.display()))]
    ReadConfiguration { source: io::Error, path: PathBuf },

    #[snafu(display("failed to parse configuration from {path}", path = path.display()))]
    ParseConfiguration {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display("configuration in {path} is invalid", path = path.display()))]
    Normalize {
        source: defaults::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write defaulted configuration"))]
    WriteConfiguration { source: serde_yaml::Error },
}

pub fn print_defaulted(path: &Path) -> Result<(), Error> {
    let input = fs::read_to_string(path).context(ReadConfigurationSnafu { path })?;
    let config: KubermaticConfiguration =
        serde_yaml::from_str(&input).context(ParseConfigurationSnafu { path })?;

    let defaulted = defaults::normalize(&config).context(NormalizeSnafu { path })?;

    serde_yaml::to_writer(io::stdout().lock(), &defaulted).context(WriteConfigurationSnafu)
}
