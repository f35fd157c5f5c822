use std::{fs::File, path::PathBuf};

use kubermatic_operator::{KubermaticConfiguration, kube::CustomResourceExt};
use snafu::{OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to get manifest directory"))]
    GetManifestDirectory { source: std::env::VarError },

    #[snafu(display("failed to get parent directory of {path}", path = path.display()))]
    GetParentDirectory { path: PathBuf },

    #[snafu(display("failed to create CRD directory at {path}", path = path.display()))]
    CreateCrdDirectory {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to create CRD file at {path}", path = path.display()))]
    CreateCrdFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write CRD to file at {path}", path = path.display()))]
    WriteCrd {
        source: serde_yaml::Error,
        path: PathBuf,
    },
}

macro_rules! write_crd {
    ($base_path:expr, $crd_name:ident) => {
        let mut path = $base_path.join(stringify!($crd_name));
        path.set_extension("yaml");

        let file = File::create(&path).with_context(|_| CreateCrdFileSnafu { path: path.clone() })?;
        serde_yaml::to_writer(file, &$crd_name::crd())
            .with_context(|_| WriteCrdSnafu { path: path.clone() })?;

        tracing::info!(path = %path.display(), "wrote CRD preview");
    };
}

pub fn generate_preview() -> Result<(), Error> {
    let path = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .context(GetManifestDirectorySnafu)?;

    let path = path
        .parent()
        .with_context(|| GetParentDirectorySnafu { path: path.clone() })?
        .join("kubermatic-operator/crds");

    std::fs::create_dir_all(&path)
        .with_context(|_| CreateCrdDirectorySnafu { path: path.clone() })?;

    write_crd!(path, KubermaticConfiguration);

    Ok(())
}
