//! The `KubermaticConfiguration` custom resource.
//!
//! A single object of this kind describes every component of a Kubermatic installation. Nearly
//! every field is optional: the defaulting pass in [`crate::defaults`] turns a sparse object into
//! a fully populated one which the reconcilers consume without applying their own defaults.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use k8s_openapi::api::core::v1::TypedLocalObjectReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};
use strum::{Display, EnumString};

mod components;
mod user_cluster;

pub use components::*;
pub use user_cluster::*;

/// Describes the shared configuration of a Kubermatic master and all of its seeds.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.kubermatic.io",
    version = "v1alpha1",
    kind = "KubermaticConfiguration",
    plural = "kubermaticconfigurations",
    shortname = "kubermaticconfig",
    derive = "Default",
    derive = "PartialEq",
    crates(
        kube_core = "kube::core",
        k8s_openapi = "k8s_openapi",
        schemars = "schemars"
    ),
    namespaced
)]
#[serde(default, rename_all = "camelCase")]
pub struct KubermaticConfigurationSpec {
    /// The base domain the dashboard and API are reachable under, e.g. `kubermatic.example.com`.
    ///
    /// Several authentication URLs are derived from it when they are not set explicitly.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,

    /// How user cluster control planes are exposed; defaults to `NodePort`. An empty string is
    /// treated like an unset value.
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub expose_strategy: Option<ExposeStrategy>,

    /// Name of the Secret holding the credentials used to pull all images.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_pull_secret: String,

    /// The cert-manager issuer used for the master's TLS certificates. The kind defaults to
    /// `ClusterIssuer`.
    pub certificate_issuer: TypedLocalObjectReference,

    /// Arbitrary files mounted into the master components. The version and update catalogs
    /// (`versions.yaml`, `updates.yaml`) are always present after defaulting.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub master_files: BTreeMap<String, String>,

    /// OIDC settings shared by the dashboard and the API.
    pub auth: AuthConfiguration,

    #[serde(rename = "ui")]
    pub ui: UiConfiguration,

    #[serde(rename = "api")]
    pub api: ApiConfiguration,

    pub master_controller: MasterControllerConfiguration,

    pub seed_controller: SeedControllerConfiguration,

    pub user_cluster: UserClusterConfiguration,
}

/// How the control plane of a user cluster is exposed to the outside world.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, JsonSchema, PartialEq, Serialize,
)]
pub enum ExposeStrategy {
    NodePort,
    LoadBalancer,
}

/// OIDC client settings for the dashboard and the kubeconfig endpoint.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthConfiguration {
    /// Defaults to `kubermatic`.
    #[serde(rename = "clientID", skip_serializing_if = "String::is_empty")]
    pub client_id: String,

    /// Defaults to the client ID with an `Issuer` suffix.
    #[serde(rename = "issuerClientID", skip_serializing_if = "String::is_empty")]
    pub issuer_client_id: String,

    /// Defaults to `https://<domain>/dex` if a domain is configured.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token_issuer: String,

    /// Defaults to `https://<domain>/api/v1/kubeconfig` if a domain is configured.
    #[serde(rename = "issuerRedirectURL", skip_serializing_if = "String::is_empty")]
    pub issuer_redirect_url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub issuer_client_secret: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub issuer_cookie_key: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_account_key: String,

    #[serde(rename = "skipTokenIssuerTLSVerify")]
    pub skip_token_issuer_tls_verify: bool,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::missing("{}", None)]
    #[case::null("exposeStrategy: null", None)]
    #[case::empty("exposeStrategy: ''", None)]
    #[case::node_port("exposeStrategy: NodePort", Some(ExposeStrategy::NodePort))]
    #[case::load_balancer("exposeStrategy: LoadBalancer", Some(ExposeStrategy::LoadBalancer))]
    fn deserialize_expose_strategy(#[case] input: &str, #[case] expected: Option<ExposeStrategy>) {
        let spec: KubermaticConfigurationSpec = serde_yaml::from_str(input).expect("valid spec");

        assert_eq!(spec.expose_strategy, expected);
    }

    #[test]
    fn unknown_expose_strategy_is_rejected() {
        serde_yaml::from_str::<KubermaticConfigurationSpec>("exposeStrategy: Ingress")
            .expect_err("unknown strategy must be rejected");
    }
}
