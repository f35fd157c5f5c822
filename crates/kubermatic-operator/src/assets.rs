//! Text assets which are compiled into the operator and used whenever the configuration does not
//! provide its own version.
//!
//! The assets are versioned together with the operator, upgrading them requires a new release.

use strum::{Display, EnumIter};

/// The file name of the version catalog in the master files.
pub const VERSIONS_FILE_NAME: &str = "versions.yaml";

/// The file name of the upgrade path catalog in the master files.
pub const UPDATES_FILE_NAME: &str = "updates.yaml";

const VERSIONS: &str = include_str!("../assets/versions.yaml");
const UPDATES: &str = include_str!("../assets/updates.yaml");
const UI_CONFIG: &str = include_str!("../assets/ui-config.json");
const OPENSHIFT_ADDONS: &str = include_str!("../assets/openshift-addons.yaml");
const BACKUP_STORE_CONTAINER: &str = include_str!("../assets/backup-store-container.yaml");
const BACKUP_CLEANUP_CONTAINER: &str = include_str!("../assets/backup-cleanup-container.yaml");

/// Identifies one of the bundled assets.
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum AssetKey {
    /// The catalog of supported Kubernetes and OpenShift versions.
    Versions,

    /// The catalog of allowed version upgrades.
    Updates,

    /// The dashboard configuration.
    UiConfig,

    /// The default addons of OpenShift user clusters, as a list of `Addon` manifests.
    OpenshiftAddons,

    /// The container which uploads etcd backups.
    BackupStoreContainer,

    /// The container which deletes the etcd backups of a removed cluster.
    BackupCleanupContainer,
}

impl AssetKey {
    /// Returns the content of the asset without surrounding whitespace.
    pub fn content(self) -> &'static str {
        let raw = match self {
            Self::Versions => VERSIONS,
            Self::Updates => UPDATES,
            Self::UiConfig => UI_CONFIG,
            Self::OpenshiftAddons => OPENSHIFT_ADDONS,
            Self::BackupStoreContainer => BACKUP_STORE_CONTAINER,
            Self::BackupCleanupContainer => BACKUP_CLEANUP_CONTAINER,
        };

        raw.trim()
    }
}

/// Returns `current` if it is not empty, the content of the asset identified by `key` otherwise.
pub fn provide_if_missing(current: &str, key: AssetKey) -> String {
    if current.is_empty() {
        key.content().to_owned()
    } else {
        current.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn assets_are_trimmed_and_not_empty() {
        for key in AssetKey::iter() {
            let content = key.content();

            assert!(!content.is_empty(), "asset {key} is empty");
            assert_eq!(content, content.trim(), "asset {key} is not trimmed");
        }
    }

    #[test]
    fn ui_config_is_json() {
        let config: serde_json::Value =
            serde_json::from_str(AssetKey::UiConfig.content()).expect("valid JSON");

        assert_eq!(config["share_kubeconfig"], serde_json::Value::Bool(false));
    }

    #[test]
    fn container_assets_are_yaml() {
        for key in [
            AssetKey::BackupStoreContainer,
            AssetKey::BackupCleanupContainer,
            AssetKey::OpenshiftAddons,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(key.content())
                .unwrap_or_else(|err| panic!("asset {key} is not valid YAML: {err}"));
        }
    }

    #[test]
    fn provide_keeps_current_value() {
        assert_eq!(provide_if_missing("{}", AssetKey::UiConfig), "{}");
        assert_eq!(
            provide_if_missing("", AssetKey::UiConfig),
            AssetKey::UiConfig.content()
        );
    }
}
