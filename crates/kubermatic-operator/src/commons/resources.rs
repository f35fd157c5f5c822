//! Merging of user supplied compute resource constraints with built-in defaults.
//!
//! Requests and limits are merged independently. A missing map is replaced by the default map as
//! a whole. In a present map the two resource names the operator knows about, `cpu` and `memory`,
//! are always pinned to their defaults, whether they are set or not. Every other resource name in
//! the map is passed through untouched.

use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::ResourceRequirements, apimachinery::pkg::api::resource::Quantity,
};
use snafu::{ResultExt, Snafu};

use crate::quantity::{self, ParseQuantityError};

pub const CPU: &str = "cpu";
pub const MEMORY: &str = "memory";

/// The resource names which are pinned to their defaults.
const DEFAULTED_RESOURCE_NAMES: [&str; 2] = [MEMORY, CPU];

#[derive(Debug, PartialEq, Snafu, strum::IntoStaticStr)]
pub enum Error {
    #[snafu(display("failed to parse {quantity:?} configured for {field} as quantity"))]
    MalformedQuantity {
        source: ParseQuantityError,
        field: String,
        quantity: String,
    },
}

impl Error {
    /// The full path of the offending field, e.g. `api.resources.limits.memory`.
    pub fn field(&self) -> &str {
        match self {
            Self::MalformedQuantity { field, .. } => field,
        }
    }

    /// The offending quantity as it was configured.
    pub fn value(&self) -> &str {
        match self {
            Self::MalformedQuantity { quantity, .. } => quantity,
        }
    }

    pub fn reason(&self) -> &'static str {
        self.into()
    }
}

/// CPU and memory values for either the requests or the limits of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComputeResources {
    pub cpu: &'static str,
    pub memory: &'static str,
}

impl ComputeResources {
    fn to_resource_list(self) -> BTreeMap<String, Quantity> {
        BTreeMap::from([
            (CPU.to_owned(), Quantity(self.cpu.to_owned())),
            (MEMORY.to_owned(), Quantity(self.memory.to_owned())),
        ])
    }
}

/// The built-in resource constraints of a component.
///
/// This exists because [`ResourceRequirements`] can't be constructed in a `const` context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceDefaults {
    pub requests: ComputeResources,
    pub limits: ComputeResources,
}

impl From<ResourceDefaults> for ResourceRequirements {
    fn from(value: ResourceDefaults) -> Self {
        Self {
            requests: Some(value.requests.to_resource_list()),
            limits: Some(value.limits.to_resource_list()),
            ..Self::default()
        }
    }
}

/// Merges `current` with `defaults` and returns the result, see the module documentation for
/// the merge rules.
pub fn merge(
    current: &ResourceRequirements,
    defaults: &ResourceRequirements,
) -> ResourceRequirements {
    let mut merged = current.clone();
    merge_into(&mut merged, defaults, "resources");
    merged
}

/// In-place version of [`merge`], logging every defaulted entry below `field`.
pub fn merge_into(
    current: &mut ResourceRequirements,
    defaults: &ResourceRequirements,
    field: &str,
) {
    merge_resource_list(
        &mut current.requests,
        defaults.requests.as_ref(),
        &format!("{field}.requests"),
    );
    merge_resource_list(
        &mut current.limits,
        defaults.limits.as_ref(),
        &format!("{field}.limits"),
    );
}

fn merge_resource_list(
    current: &mut Option<BTreeMap<String, Quantity>>,
    defaults: Option<&BTreeMap<String, Quantity>>,
    field: &str,
) {
    let Some(defaults) = defaults else {
        return;
    };

    if current.is_none() {
        tracing::debug!(
            field,
            cpu = ?defaults.get(CPU).map(|q| q.0.as_str()),
            memory = ?defaults.get(MEMORY).map(|q| q.0.as_str()),
            "defaulting resource constraints"
        );
        *current = Some(defaults.clone());
        return;
    }

    let Some(current) = current.as_mut() else {
        return;
    };

    for name in DEFAULTED_RESOURCE_NAMES {
        let Some(default) = defaults.get(name) else {
            continue;
        };

        let previous = current.insert(name.to_owned(), default.clone());
        if previous.as_ref() != Some(default) {
            tracing::debug!(
                field = %format_args!("{field}.{name}"),
                value = %default.0,
                previous = ?previous.map(|q| q.0),
                "defaulting resource constraint"
            );
        }
    }
}

/// Checks that every quantity in `requirements` can be parsed.
///
/// This has to run before [`merge`], which assumes well-formed quantities.
pub fn validate_quantities(
    requirements: &ResourceRequirements,
    field: &str,
) -> Result<(), Error> {
    let lists = [
        ("requests", requirements.requests.as_ref()),
        ("limits", requirements.limits.as_ref()),
    ];

    for (kind, list) in lists {
        for (name, value) in list.into_iter().flatten() {
            quantity::Quantity::try_from(value).with_context(|_| MalformedQuantitySnafu {
                field: format!("{field}.{kind}.{name}"),
                quantity: value.0.clone(),
            })?;
        }
    }

    Ok(())
}
