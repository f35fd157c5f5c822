//! Types and defaulting logic for the `KubermaticConfiguration` resource of the Kubermatic
//! operator.
//!
//! The entry point is [`defaults::normalize`], which fills every unset field of a configuration
//! with its built-in default and rejects invalid image repositories and resource quantities.

pub mod assets;
pub mod catalog;
pub mod commons;
pub mod crd;
pub mod defaults;
pub mod quantity;

// External re-exports
pub use k8s_openapi;
pub use kube;
pub use schemars;

pub use crate::{
    crd::{KubermaticConfiguration, KubermaticConfigurationSpec},
    defaults::normalize,
};
