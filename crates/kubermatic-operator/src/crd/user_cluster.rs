use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings applied to every user cluster control plane.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserClusterConfiguration {
    /// The repository of the Kubermatic image used inside user clusters, without a tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kubermatic_docker_repository: String,

    /// The repository of the kubeletdnat-controller image, without a tag.
    #[serde(
        rename = "dnatControllerDockerRepository",
        skip_serializing_if = "String::is_empty"
    )]
    pub dnat_controller_docker_repository: String,

    /// Port range of NodePort services; defaults to `30000-32767`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node_port_range: String,

    /// Size of the etcd volume of every user cluster; defaults to `5Gi`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etcd_volume_size: String,

    pub addons: AddonsConfiguration,
}

/// The addons installed into new user clusters, per cluster flavour.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddonsConfiguration {
    pub kubernetes: AddonConfiguration,
    pub openshift: AddonConfiguration,
}

/// The default addons of one cluster flavour.
///
/// Either `default` or `defaultManifests` should be set, not both. Whichever is set wins and
/// the other one is left alone during defaulting.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddonConfiguration {
    /// Names of the addons to install.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default: Vec<String>,

    /// A Kubernetes `List` of `Addon` objects (as YAML), as an alternative to `default`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_manifests: String,

    /// The repository of the addon image, without a tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_repository: String,
}

impl AddonConfiguration {
    /// Returns `true` if neither an addon list nor an alternative manifest source is configured.
    pub fn is_unconfigured(&self) -> bool {
        self.default.is_empty() && self.default_manifests.is_empty()
    }
}
