//! Typed views on the version catalog (`versions.yaml`) and the upgrade path catalog
//! (`updates.yaml`) which are shipped as master files.

use std::{fmt::Display, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use strum::EnumString;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse version catalog"))]
    ParseVersions { source: serde_yaml::Error },

    #[snafu(display("failed to parse update catalog"))]
    ParseUpdates { source: serde_yaml::Error },

    #[snafu(display(
        "the automatic update from {from:?} must target a single version, but targets {to:?}"
    ))]
    AutomaticUpdateToRange {
        source: semver::Error,
        from: String,
        to: String,
    },
}

/// The flavour of a user cluster.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, strum::Display, EnumString, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClusterType {
    #[default]
    Kubernetes,
    Openshift,
}

/// A version in the catalog, written with a leading `v`, e.g. `v1.15.6`.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogVersion(semver::Version);

impl FromStr for CatalogVersion {
    type Err = semver::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let version = input.strip_prefix('v').unwrap_or(input);
        semver::Version::parse(version).map(Self)
    }
}

impl TryFrom<String> for CatalogVersion {
    type Error = semver::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CatalogVersion> for String {
    fn from(value: CatalogVersion) -> Self {
        value.to_string()
    }
}

impl Display for CatalogVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl Deref for CatalogVersion {
    type Target = semver::Version;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub version: CatalogVersion,

    #[serde(default)]
    pub default: bool,

    #[serde(default, rename = "type")]
    pub cluster_type: ClusterType,
}

/// The versions users can choose from when creating or upgrading clusters.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Versions {
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Versions {
    pub fn from_yaml(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).context(ParseVersionsSnafu)
    }

    /// Returns the default version for new clusters of the given type.
    ///
    /// If multiple versions are flagged as default, the first one wins.
    pub fn default_version(&self, cluster_type: ClusterType) -> Option<&CatalogVersion> {
        self.of_type(cluster_type)
            .find(|version| version.default)
            .map(|version| &version.version)
    }

    pub fn of_type(&self, cluster_type: ClusterType) -> impl Iterator<Item = &Version> {
        self.versions
            .iter()
            .filter(move |version| version.cluster_type == cluster_type)
    }
}

/// An allowed upgrade path. `from` and `to` are version constraints like `1.15.*`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub from: String,
    pub to: String,

    /// Control planes matching `from` are upgraded to `to` without user interaction.
    #[serde(default)]
    pub automatic: bool,

    /// Nodes are upgraded as well. Implies `automatic`, as nodes must not be newer than the
    /// control plane.
    #[serde(default)]
    pub automatic_node_update: bool,

    #[serde(default, rename = "type")]
    pub cluster_type: ClusterType,
}

impl Update {
    pub fn is_automatic(&self) -> bool {
        self.automatic || self.automatic_node_update
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Updates {
    #[serde(default)]
    pub updates: Vec<Update>,
}

impl Updates {
    /// Parses and validates an update catalog.
    pub fn from_yaml(input: &str) -> Result<Self> {
        let updates: Self = serde_yaml::from_str(input).context(ParseUpdatesSnafu)?;
        updates.validate()?;
        Ok(updates)
    }

    /// Checks that every automatic update targets a single version instead of a range.
    pub fn validate(&self) -> Result<()> {
        for update in self.updates.iter().filter(|update| update.is_automatic()) {
            CatalogVersion::from_str(&update.to).with_context(|_| AutomaticUpdateToRangeSnafu {
                from: update.from.clone(),
                to: update.to.clone(),
            })?;
        }

        Ok(())
    }
}
