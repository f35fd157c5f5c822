//! Defaulting of the [`KubermaticConfiguration`].
//!
//! [`normalize`] turns a sparse configuration into a fully populated one. Every field the
//! reconcilers consume is owned by exactly one rule in [`RULES`], and the rules are applied in
//! table order. A value which is already set is never overwritten, with the exception of the `cpu`
//! and `memory` resource constraints, which are always pinned to their built-in defaults (see
//! [`crate::commons::resources`]).
//!
//! Normalization is pure: the input is left untouched and a new object is returned. Applying it to
//! its own output yields the same object again.

use snafu::Snafu;

use crate::{
    commons::{image_repository, resources},
    crd::{KubermaticConfiguration, KubermaticConfigurationSpec},
};

mod constants;
mod rules;

pub use constants::*;
pub use rules::{Policy, RULES, Rule, rule_for};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid docker repository {value:?} configured for {field}"))]
    InvalidDockerRepository {
        source: image_repository::Error,
        field: &'static str,
        value: String,
    },

    #[snafu(display("invalid resource constraints configured for {field}"))]
    InvalidResources {
        source: resources::Error,
        field: &'static str,
    },
}

impl Error {
    /// The full path of the offending field, e.g. `ui.dockerRepository` or
    /// `api.resources.limits.memory`.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidDockerRepository { field, .. } => field,
            Self::InvalidResources { source, .. } => source.field(),
        }
    }

    /// The offending value as it was configured.
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidDockerRepository { value, .. } => value,
            Self::InvalidResources { source, .. } => source.value(),
        }
    }

    /// A stable, machine readable reason code, e.g. `TagNotAllowed`.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidDockerRepository { source, .. } => source.reason(),
            Self::InvalidResources { source, .. } => source.reason(),
        }
    }
}

/// Returns a copy of `config` with all defaults applied.
///
/// Metadata and status are carried over unchanged. The first invalid field aborts the pass.
#[tracing::instrument(
    skip(config),
    fields(
        namespace = config.metadata.namespace.as_deref(),
        name = config.metadata.name.as_deref(),
    )
)]
pub fn normalize(config: &KubermaticConfiguration) -> Result<KubermaticConfiguration, Error> {
    let mut normalized = config.clone();
    normalized.spec = config.spec.normalize()?;
    Ok(normalized)
}

impl KubermaticConfigurationSpec {
    /// Returns a copy of this spec with all defaults applied, see [`normalize`].
    pub fn normalize(&self) -> Result<Self, Error> {
        tracing::debug!("applying defaults to Kubermatic configuration");

        let mut spec = self.clone();
        for rule in RULES {
            if let Err(err) = rule.apply(&mut spec) {
                tracing::debug!(
                    field = err.field(),
                    reason = err.reason(),
                    partial = ?spec,
                    "aborting defaulting of Kubermatic configuration"
                );
                return Err(err);
            }
        }

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use indoc::indoc;
    use k8s_openapi::api::core::v1::ResourceRequirements;
    use rstest::rstest;

    use super::*;
    use crate::{assets::AssetKey, crd::ExposeStrategy};

    fn spec_from_yaml(input: &str) -> KubermaticConfigurationSpec {
        serde_yaml::from_str(input).expect("valid spec")
    }

    #[test]
    fn empty_spec_is_fully_populated() {
        let spec = KubermaticConfigurationSpec::default()
            .normalize()
            .expect("empty spec is valid");

        assert_eq!(spec.expose_strategy, Some(ExposeStrategy::NodePort));
        assert_eq!(spec.certificate_issuer.kind, DEFAULT_CERTIFICATE_ISSUER_KIND);
        assert_eq!(spec.auth.client_id, "kubermatic");
        assert_eq!(spec.auth.issuer_client_id, "kubermaticIssuer");
        assert_eq!(spec.api.docker_repository, DEFAULT_KUBERMATIC_IMAGE);
        assert_eq!(spec.ui.docker_repository, DEFAULT_DASHBOARD_IMAGE);
        assert_eq!(
            spec.user_cluster.dnat_controller_docker_repository,
            DEFAULT_DNAT_CONTROLLER_IMAGE
        );
        assert_eq!(spec.ui.config, AssetKey::UiConfig.content());
        assert_eq!(spec.master_files.len(), 2);
        assert_eq!(
            spec.seed_controller.resources,
            ResourceRequirements::from(DEFAULT_SEED_CONTROLLER_RESOURCES)
        );

        // No domain, nothing to derive from.
        assert!(spec.domain.is_empty());
        assert!(spec.auth.token_issuer.is_empty());
        assert!(spec.auth.issuer_redirect_url.is_empty());
    }

    #[test]
    fn input_is_not_modified() {
        let input = KubermaticConfigurationSpec::default();

        let _ = input.normalize().expect("empty spec is valid");

        assert_eq!(input, KubermaticConfigurationSpec::default());
    }

    #[test]
    fn configured_values_are_kept() {
        let input = spec_from_yaml(indoc! {"
            domain: example.com
            exposeStrategy: LoadBalancer
            auth:
              clientID: dashboard
              tokenIssuer: https://login.example.org
            ui:
              dockerRepository: registry.example.org/dashboard
            userCluster:
              nodePortRange: 31000-32000
        "});

        let spec = input.normalize().expect("valid spec");

        assert_eq!(spec.expose_strategy, Some(ExposeStrategy::LoadBalancer));
        assert_eq!(spec.auth.issuer_client_id, "dashboardIssuer");
        assert_eq!(spec.auth.token_issuer, "https://login.example.org");
        assert_eq!(
            spec.auth.issuer_redirect_url,
            "https://example.com/api/v1/kubeconfig"
        );
        assert_eq!(spec.ui.docker_repository, "registry.example.org/dashboard");
        assert_eq!(spec.user_cluster.node_port_range, "31000-32000");
    }

    #[rstest]
    #[case::api("api:\n  dockerRepository: foo:1.0", "api.dockerRepository", "TagNotAllowed")]
    #[case::dnat(
        "userCluster:\n  dnatControllerDockerRepository: Not A Repo",
        "userCluster.dnatControllerDockerRepository",
        "InvalidReferenceSyntax"
    )]
    #[case::resources(
        "masterController:\n  resources:\n    limits:\n      cpu: lots",
        "masterController.resources.limits.cpu",
        "MalformedQuantity"
    )]
    fn invalid_fields_are_reported(#[case] input: &str, #[case] field: &str, #[case] reason: &str) {
        let err = spec_from_yaml(input)
            .normalize()
            .expect_err("must be rejected");

        assert_eq!(err.field(), field);
        assert_eq!(err.reason(), reason);
    }

    #[test]
    fn first_error_wins() {
        let input = spec_from_yaml(indoc! {"
            api:
              dockerRepository: foo:1.0
              resources:
                requests:
                  memory: nope
            ui:
              dockerRepository: bar:2.0
        "});

        let err = input.normalize().expect_err("must be rejected");

        assert_eq!(err.field(), "api.dockerRepository");
    }

    #[test]
    fn normalize_keeps_metadata() {
        let mut config =
            KubermaticConfiguration::new("kubermatic", KubermaticConfigurationSpec::default());
        config.metadata.namespace = Some("kubermatic".to_owned());
        config.metadata.labels = Some(BTreeMap::from([(
            "team".to_owned(),
            "platform".to_owned(),
        )]));

        let normalized = normalize(&config).expect("empty spec is valid");

        assert_eq!(normalized.metadata, config.metadata);
        assert_eq!(normalized.spec.auth.client_id, "kubermatic");
    }
}
