//! The table of defaulting rules, in the order they are applied.
//!
//! Every rule owns exactly one field (or one map key) of the configuration. A rule which derives
//! its default from other fields lists them in [`Rule::depends_on`], and those fields are always
//! finalized by rules earlier in [`RULES`].

use std::{collections::BTreeMap, fmt::Display};

use k8s_openapi::api::core::v1::ResourceRequirements;
use snafu::ResultExt;

use super::{Error, InvalidDockerRepositorySnafu, InvalidResourcesSnafu, constants::*};
use crate::{
    assets::{self, AssetKey, UPDATES_FILE_NAME, VERSIONS_FILE_NAME},
    commons::{
        image_repository,
        resources::{self, ResourceDefaults},
    },
    crd::{ExposeStrategy, KubermaticConfigurationSpec},
};

/// How a rule treats the field it owns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Policy {
    /// A single value which is set if it is empty or absent.
    Scalar,

    /// A list which is replaced as a whole if it is empty.
    List,

    /// A list which is replaced as a whole if neither it nor its alternative manifest source is
    /// set.
    ListUnlessAlternative,

    /// An alternative manifest source which is set to a bundled asset if neither it nor the
    /// corresponding list is set.
    AssetUnlessList(AssetKey),

    /// A value which is set to a bundled asset if it is empty.
    Asset(AssetKey),

    /// A single key of a map which is set to a bundled asset if it is missing or empty. All other
    /// keys are left alone.
    MapKey(AssetKey),

    /// A value computed from other, already defaulted fields.
    Derived,

    /// An image repository, which is validated if it is set.
    Repository,

    /// Resource constraints, with `cpu` and `memory` pinned per resource name.
    Resources,
}

type Apply = fn(&mut KubermaticConfigurationSpec, &'static str) -> Result<(), Error>;

/// A single defaulting rule.
#[derive(Clone, Copy)]
pub struct Rule {
    /// The path of the field this rule defaults, e.g. `auth.issuerClientID`.
    pub field: &'static str,

    pub policy: Policy,

    /// Fields this rule reads to compute its default.
    pub depends_on: &'static [&'static str],

    apply: Apply,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("policy", &self.policy)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

impl Rule {
    const fn new(field: &'static str, policy: Policy, apply: Apply) -> Self {
        Self {
            field,
            policy,
            depends_on: &[],
            apply,
        }
    }

    const fn depends_on(self, depends_on: &'static [&'static str]) -> Self {
        Self { depends_on, ..self }
    }

    /// Applies this rule to `spec`, which is modified in place.
    pub fn apply(&self, spec: &mut KubermaticConfigurationSpec) -> Result<(), Error> {
        (self.apply)(spec, self.field)
    }
}

pub static RULES: &[Rule] = &[
    Rule::new("exposeStrategy", Policy::Scalar, |spec, field| {
        default_option(&mut spec.expose_strategy, ExposeStrategy::NodePort, field);
        Ok(())
    }),
    Rule::new(
        "seedController.backupStoreContainer",
        Policy::Asset(AssetKey::BackupStoreContainer),
        |spec, field| {
            default_asset(
                &mut spec.seed_controller.backup_store_container,
                AssetKey::BackupStoreContainer,
                field,
            );
            Ok(())
        },
    ),
    Rule::new(
        "seedController.backupCleanupContainer",
        Policy::Asset(AssetKey::BackupCleanupContainer),
        |spec, field| {
            default_asset(
                &mut spec.seed_controller.backup_cleanup_container,
                AssetKey::BackupCleanupContainer,
                field,
            );
            Ok(())
        },
    ),
    Rule::new("api.pprofEndpoint", Policy::Scalar, |spec, field| {
        default_option(
            &mut spec.api.pprof_endpoint,
            DEFAULT_PPROF_ENDPOINT.to_owned(),
            field,
        );
        Ok(())
    }),
    Rule::new("seedController.pprofEndpoint", Policy::Scalar, |spec, field| {
        default_option(
            &mut spec.seed_controller.pprof_endpoint,
            DEFAULT_PPROF_ENDPOINT.to_owned(),
            field,
        );
        Ok(())
    }),
    Rule::new("masterController.pprofEndpoint", Policy::Scalar, |spec, field| {
        default_option(
            &mut spec.master_controller.pprof_endpoint,
            DEFAULT_PPROF_ENDPOINT.to_owned(),
            field,
        );
        Ok(())
    }),
    Rule::new(
        "userCluster.addons.kubernetes.default",
        Policy::ListUnlessAlternative,
        |spec, field| {
            let addons = &mut spec.user_cluster.addons.kubernetes;
            if addons.is_unconfigured() {
                default_list(&mut addons.default, DEFAULT_KUBERNETES_ADDONS, field);
            }
            Ok(())
        },
    ),
    Rule::new(
        "userCluster.addons.openshift.defaultManifests",
        Policy::AssetUnlessList(AssetKey::OpenshiftAddons),
        |spec, field| {
            let addons = &mut spec.user_cluster.addons.openshift;
            if addons.is_unconfigured() {
                default_asset(
                    &mut addons.default_manifests,
                    AssetKey::OpenshiftAddons,
                    field,
                );
            }
            Ok(())
        },
    ),
    Rule::new("api.accessibleAddons", Policy::List, |spec, field| {
        default_list(
            &mut spec.api.accessible_addons,
            DEFAULT_ACCESSIBLE_ADDONS,
            field,
        );
        Ok(())
    }),
    Rule::new("userCluster.nodePortRange", Policy::Scalar, |spec, field| {
        default_string(
            &mut spec.user_cluster.node_port_range,
            DEFAULT_NODE_PORT_RANGE,
            field,
        );
        Ok(())
    }),
    Rule::new("userCluster.etcdVolumeSize", Policy::Scalar, |spec, field| {
        default_string(
            &mut spec.user_cluster.etcd_volume_size,
            DEFAULT_ETCD_VOLUME_SIZE,
            field,
        );
        Ok(())
    }),
    Rule::new("certificateIssuer.kind", Policy::Scalar, |spec, field| {
        default_string(
            &mut spec.certificate_issuer.kind,
            DEFAULT_CERTIFICATE_ISSUER_KIND,
            field,
        );
        Ok(())
    }),
    Rule::new("ui.config", Policy::Asset(AssetKey::UiConfig), |spec, field| {
        default_asset(&mut spec.ui.config, AssetKey::UiConfig, field);
        Ok(())
    }),
    Rule::new("masterFiles[\"versions.yaml\"]", Policy::MapKey(AssetKey::Versions), |spec, field| {
        default_map_key(
            &mut spec.master_files,
            VERSIONS_FILE_NAME,
            AssetKey::Versions,
            field,
        );
        Ok(())
    }),
    Rule::new("masterFiles[\"updates.yaml\"]", Policy::MapKey(AssetKey::Updates), |spec, field| {
        default_map_key(
            &mut spec.master_files,
            UPDATES_FILE_NAME,
            AssetKey::Updates,
            field,
        );
        Ok(())
    }),
    Rule::new("auth.clientID", Policy::Scalar, |spec, field| {
        default_string(&mut spec.auth.client_id, DEFAULT_AUTH_CLIENT_ID, field);
        Ok(())
    }),
    Rule::new("auth.issuerClientID", Policy::Derived, |spec, field| {
        let auth = &mut spec.auth;
        if auth.issuer_client_id.is_empty() {
            auth.issuer_client_id = format!("{}Issuer", auth.client_id);
            log_defaulted(field, &auth.issuer_client_id);
        }
        Ok(())
    })
    .depends_on(&["auth.clientID"]),
    Rule::new("auth.tokenIssuer", Policy::Derived, |spec, field| {
        if spec.auth.token_issuer.is_empty() && !spec.domain.is_empty() {
            spec.auth.token_issuer = format!("https://{}/dex", spec.domain);
            log_defaulted(field, &spec.auth.token_issuer);
        }
        Ok(())
    })
    .depends_on(&["domain"]),
    Rule::new("auth.issuerRedirectURL", Policy::Derived, |spec, field| {
        if spec.auth.issuer_redirect_url.is_empty() && !spec.domain.is_empty() {
            spec.auth.issuer_redirect_url = format!("https://{}/api/v1/kubeconfig", spec.domain);
            log_defaulted(field, &spec.auth.issuer_redirect_url);
        }
        Ok(())
    })
    .depends_on(&["domain"]),
    Rule::new("api.dockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.api.docker_repository,
            DEFAULT_KUBERMATIC_IMAGE,
            field,
        )
    }),
    Rule::new("ui.dockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.ui.docker_repository,
            DEFAULT_DASHBOARD_IMAGE,
            field,
        )
    }),
    Rule::new("masterController.dockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.master_controller.docker_repository,
            DEFAULT_KUBERMATIC_IMAGE,
            field,
        )
    }),
    Rule::new("seedController.dockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.seed_controller.docker_repository,
            DEFAULT_KUBERMATIC_IMAGE,
            field,
        )
    }),
    Rule::new("userCluster.kubermaticDockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.user_cluster.kubermatic_docker_repository,
            DEFAULT_KUBERMATIC_IMAGE,
            field,
        )
    }),
    Rule::new("userCluster.dnatControllerDockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.user_cluster.dnat_controller_docker_repository,
            DEFAULT_DNAT_CONTROLLER_IMAGE,
            field,
        )
    }),
    Rule::new("userCluster.addons.kubernetes.dockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.user_cluster.addons.kubernetes.docker_repository,
            DEFAULT_KUBERNETES_ADDON_IMAGE,
            field,
        )
    }),
    Rule::new("userCluster.addons.openshift.dockerRepository", Policy::Repository, |spec, field| {
        default_repository(
            &mut spec.user_cluster.addons.openshift.docker_repository,
            DEFAULT_OPENSHIFT_ADDON_IMAGE,
            field,
        )
    }),
    Rule::new("ui.resources", Policy::Resources, |spec, field| {
        default_resources(&mut spec.ui.resources, DEFAULT_UI_RESOURCES, field)
    }),
    Rule::new("api.resources", Policy::Resources, |spec, field| {
        default_resources(&mut spec.api.resources, DEFAULT_API_RESOURCES, field)
    }),
    Rule::new("seedController.resources", Policy::Resources, |spec, field| {
        default_resources(
            &mut spec.seed_controller.resources,
            DEFAULT_SEED_CONTROLLER_RESOURCES,
            field,
        )
    }),
    Rule::new("masterController.resources", Policy::Resources, |spec, field| {
        default_resources(
            &mut spec.master_controller.resources,
            DEFAULT_MASTER_CONTROLLER_RESOURCES,
            field,
        )
    }),
];

/// Returns the rule owning `field`, if any.
pub fn rule_for(field: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.field == field)
}

fn log_defaulted(field: &str, value: impl Display) {
    tracing::debug!(field, %value, "defaulting field");
}

fn default_string(value: &mut String, default: &str, field: &str) {
    if value.is_empty() {
        default.clone_into(value);
        log_defaulted(field, default);
    }
}

fn default_option<T: Display>(value: &mut Option<T>, default: T, field: &str) {
    if value.is_none() {
        log_defaulted(field, &default);
        *value = Some(default);
    }
}

fn default_list(list: &mut Vec<String>, default: &[&str], field: &str) {
    if list.is_empty() {
        *list = default.iter().map(|item| (*item).to_owned()).collect();
        tracing::debug!(field, value = ?list, "defaulting field");
    }
}

fn default_asset(value: &mut String, key: AssetKey, field: &str) {
    if value.is_empty() {
        *value = assets::provide_if_missing(value, key);
        tracing::debug!(field, asset = %key, "defaulting field");
    }
}

/// An existing key with an empty value is treated like a missing key.
fn default_map_key(map: &mut BTreeMap<String, String>, key: &str, asset: AssetKey, field: &str) {
    let value = map.entry(key.to_owned()).or_default();
    default_asset(value, asset, field);
}

fn default_repository(value: &mut String, default: &str, field: &'static str) -> Result<(), Error> {
    let repository = image_repository::validate_or_default(value, default)
        .with_context(|_| InvalidDockerRepositorySnafu {
            field,
            value: value.clone(),
        })?;

    if value.is_empty() {
        tracing::debug!(field, value = default, "defaulting docker repository");
        *value = repository;
    }

    Ok(())
}

fn default_resources(
    value: &mut ResourceRequirements,
    defaults: ResourceDefaults,
    field: &'static str,
) -> Result<(), Error> {
    resources::validate_quantities(value, field).context(InvalidResourcesSnafu { field })?;
    resources::merge_into(value, &defaults.into(), field);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use rstest::rstest;

    use super::*;

    fn apply(field: &str, spec: &mut KubermaticConfigurationSpec) -> Result<(), Error> {
        rule_for(field).expect("rule must exist").apply(spec)
    }

    #[test]
    fn fields_are_unique() {
        let mut seen = HashSet::new();
        for rule in RULES {
            assert!(seen.insert(rule.field), "{} is defaulted twice", rule.field);
        }
    }

    #[test]
    fn dependencies_are_defaulted_first() {
        for (index, rule) in RULES.iter().enumerate() {
            for dependency in rule.depends_on {
                if let Some(position) = RULES.iter().position(|r| r.field == *dependency) {
                    assert!(
                        position < index,
                        "{} depends on {dependency}, which is defaulted later",
                        rule.field
                    );
                }
            }
        }
    }

    #[test]
    fn derived_rules_declare_dependencies() {
        for rule in RULES.iter().filter(|rule| rule.policy == Policy::Derived) {
            assert!(!rule.depends_on.is_empty(), "{} has no dependencies", rule.field);
        }
    }

    #[test]
    fn repositories_are_defaulted_after_structural_rules() {
        let first_repository = RULES
            .iter()
            .position(|rule| rule.policy == Policy::Repository)
            .expect("repository rules exist");

        assert!(
            RULES[first_repository..]
                .iter()
                .all(|rule| matches!(rule.policy, Policy::Repository | Policy::Resources))
        );
    }

    #[rstest]
    #[case::empty("", "kubermaticIssuer")]
    #[case::custom("dashboard", "dashboardIssuer")]
    fn issuer_client_id_is_derived(#[case] client_id: &str, #[case] expected: &str) {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.auth.client_id = client_id.to_owned();

        apply("auth.clientID", &mut spec).expect("infallible");
        apply("auth.issuerClientID", &mut spec).expect("infallible");

        assert_eq!(spec.auth.issuer_client_id, expected);
    }

    #[rstest]
    #[case::no_domain("", "", "")]
    #[case::domain("example.com", "", "https://example.com/dex")]
    #[case::explicit("example.com", "https://dex.example.org", "https://dex.example.org")]
    fn token_issuer_is_derived(
        #[case] domain: &str,
        #[case] token_issuer: &str,
        #[case] expected: &str,
    ) {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.domain = domain.to_owned();
        spec.auth.token_issuer = token_issuer.to_owned();

        apply("auth.tokenIssuer", &mut spec).expect("infallible");

        assert_eq!(spec.auth.token_issuer, expected);
    }

    #[test]
    fn issuer_redirect_url_is_derived() {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.domain = "example.com".to_owned();

        apply("auth.issuerRedirectURL", &mut spec).expect("infallible");

        assert_eq!(
            spec.auth.issuer_redirect_url,
            "https://example.com/api/v1/kubeconfig"
        );
    }

    #[test]
    fn explicit_empty_pprof_endpoint_is_kept() {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.api.pprof_endpoint = Some(String::new());

        apply("api.pprofEndpoint", &mut spec).expect("infallible");
        apply("seedController.pprofEndpoint", &mut spec).expect("infallible");

        assert_eq!(spec.api.pprof_endpoint.as_deref(), Some(""));
        assert_eq!(
            spec.seed_controller.pprof_endpoint.as_deref(),
            Some(DEFAULT_PPROF_ENDPOINT)
        );
    }

    #[rstest]
    #[case::unconfigured(vec![], "", DEFAULT_KUBERNETES_ADDONS.len())]
    #[case::alternative_wins(vec![], "apiVersion: v1\nkind: List", 0)]
    #[case::list_is_kept(vec!["canal".to_owned()], "", 1)]
    fn kubernetes_addons(
        #[case] default: Vec<String>,
        #[case] manifests: &str,
        #[case] expected_len: usize,
    ) {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.user_cluster.addons.kubernetes.default = default;
        spec.user_cluster.addons.kubernetes.default_manifests = manifests.to_owned();

        apply("userCluster.addons.kubernetes.default", &mut spec).expect("infallible");

        let addons = &spec.user_cluster.addons.kubernetes;
        assert_eq!(addons.default.len(), expected_len);
        assert_eq!(addons.default_manifests, manifests);
    }

    #[test]
    fn openshift_addon_list_suppresses_manifests() {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.user_cluster.addons.openshift.default = vec!["network".to_owned()];

        apply("userCluster.addons.openshift.defaultManifests", &mut spec).expect("infallible");

        assert!(spec.user_cluster.addons.openshift.default_manifests.is_empty());
    }

    #[test]
    fn master_files_keep_unrelated_keys() {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.master_files = BTreeMap::from([
            (VERSIONS_FILE_NAME.to_owned(), String::new()),
            ("custom.yaml".to_owned(), "foo: bar".to_owned()),
        ]);

        apply("masterFiles[\"versions.yaml\"]", &mut spec).expect("infallible");
        apply("masterFiles[\"updates.yaml\"]", &mut spec).expect("infallible");

        assert_eq!(
            spec.master_files,
            BTreeMap::from([
                (
                    VERSIONS_FILE_NAME.to_owned(),
                    AssetKey::Versions.content().to_owned()
                ),
                (
                    UPDATES_FILE_NAME.to_owned(),
                    AssetKey::Updates.content().to_owned()
                ),
                ("custom.yaml".to_owned(), "foo: bar".to_owned()),
            ])
        );
    }

    #[test]
    fn docker_repository_error_names_field() {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.ui.docker_repository = "quay.io/kubermatic/dashboard-v2:v1.0.0".to_owned();

        let err = apply("ui.dockerRepository", &mut spec).expect_err("tag must be rejected");

        assert_eq!(err.field(), "ui.dockerRepository");
        assert_eq!(err.value(), "quay.io/kubermatic/dashboard-v2:v1.0.0");
        assert_eq!(err.reason(), "TagNotAllowed");
    }

    #[test]
    fn resources_error_names_field() {
        let mut spec = KubermaticConfigurationSpec::default();
        spec.seed_controller.resources.requests = Some(BTreeMap::from([(
            "memory".to_owned(),
            Quantity("a lot".to_owned()),
        )]));

        let err = apply("seedController.resources", &mut spec).expect_err("must be malformed");

        assert_eq!(err.field(), "seedController.resources.requests.memory");
        assert_eq!(err.value(), "a lot");
        assert_eq!(err.reason(), "MalformedQuantity");
    }
}
