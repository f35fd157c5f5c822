use k8s_openapi::api::core::v1::ResourceRequirements;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings of the dashboard (UI) deployment.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfiguration {
    /// The repository of the dashboard image, without a tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_repository: String,

    /// The JSON configuration handed to the dashboard.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config: String,

    pub resources: ResourceRequirements,
}

/// Settings of the API deployment.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfiguration {
    /// The repository of the Kubermatic image, without a tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_repository: String,

    /// Addons which users are allowed to install into their clusters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessible_addons: Vec<String>,

    /// Address the pprof handler listens on. An explicitly empty string disables it.
    #[serde(rename = "pprofEndpoint", skip_serializing_if = "Option::is_none")]
    pub pprof_endpoint: Option<String>,

    pub resources: ResourceRequirements,

    pub debug_log: bool,
}

/// Settings of the master controller manager.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MasterControllerConfiguration {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_repository: String,

    #[serde(rename = "pprofEndpoint", skip_serializing_if = "Option::is_none")]
    pub pprof_endpoint: Option<String>,

    pub resources: ResourceRequirements,

    pub debug_log: bool,
}

/// Settings of the seed controller manager, which runs once per seed.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedControllerConfiguration {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_repository: String,

    /// A container definition (as YAML) that uploads etcd snapshots after they were taken.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backup_store_container: String,

    /// A container definition (as YAML) that removes all backups of a deleted cluster.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backup_cleanup_container: String,

    #[serde(rename = "pprofEndpoint", skip_serializing_if = "Option::is_none")]
    pub pprof_endpoint: Option<String>,

    pub resources: ResourceRequirements,

    pub debug_log: bool,
}
