//! Parsing of Kubernetes quantities like `250m` or `1Gi`.
//!
//! The [`Quantity`] type of k8s-openapi is an unvalidated string. Resource constraints supplied by
//! users are parsed with [`Quantity::from_str`] before they are merged with the built-in defaults,
//! so that malformed values are rejected with a precise error instead of being passed on.

use std::{num::ParseFloatError, str::FromStr};

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as K8sQuantity;
use snafu::{ResultExt as _, Snafu, ensure};

mod suffix;

pub use suffix::*;

#[derive(Debug, PartialEq, Snafu)]
pub enum ParseQuantityError {
    #[snafu(display("input is either empty or contains non-ascii characters"))]
    InvalidFormat,

    #[snafu(display("failed to parse floating point number"))]
    InvalidFloat { source: ParseFloatError },

    #[snafu(display("failed to parse suffix"))]
    InvalidSuffix { source: ParseSuffixError },
}

/// A parsed quantity of the form `<signedNumber><suffix>`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    // We don't need arbitrary precision here, quantities are only parsed for validation.
    value: f64,
    suffix: Option<Suffix>,
}

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        ensure!(!input.is_empty() && input.is_ascii(), InvalidFormatSnafu);

        let unsigned = input.strip_prefix(['+', '-']).unwrap_or(input);
        let sign_len = input.len() - unsigned.len();

        match unsigned.find(|c: char| c != '.' && !c.is_ascii_digit()) {
            Some(suffix_index) => {
                let (value, suffix) = input.split_at(sign_len + suffix_index);
                let value = f64::from_str(value).context(InvalidFloatSnafu)?;
                let suffix = Suffix::from_str(suffix).context(InvalidSuffixSnafu)?;

                Ok(Self {
                    value,
                    suffix: Some(suffix),
                })
            }
            None => Ok(Self {
                value: f64::from_str(input).context(InvalidFloatSnafu)?,
                suffix: None,
            }),
        }
    }
}

impl TryFrom<&K8sQuantity> for Quantity {
    type Error = ParseQuantityError;

    fn try_from(value: &K8sQuantity) -> Result<Self, Self::Error> {
        Self::from_str(&value.0)
    }
}

impl Quantity {
    /// Returns the value in base units, e.g. `0.25` for `250m` or `1024` for `1Ki`.
    pub fn as_base_units(&self) -> f64 {
        self.suffix.map_or(self.value, |suffix| self.value * suffix.factor())
    }
}
