use std::str::FromStr;

use snafu::Snafu;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(display("failed to parse {input:?} as quantity suffix"))]
pub struct ParseSuffixError {
    input: String,
}

/// The suffix of a [`Quantity`](super::Quantity), as defined by the [Kubernetes serialization
/// format][k8s-serialization-format].
///
/// [k8s-serialization-format]: https://github.com/kubernetes/apimachinery/blob/8c60292e48e46c4faa1e92acb232ce6adb37512c/pkg/api/resource/quantity.go#L37-L59
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Suffix {
    BinaryMultiple(BinaryMultiple),
    DecimalMultiple(DecimalMultiple),
    DecimalExponent(f64),
}

impl FromStr for Suffix {
    type Err = ParseSuffixError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Ok(binary) = BinaryMultiple::from_str(input) {
            return Ok(Self::BinaryMultiple(binary));
        }

        if let Ok(decimal) = DecimalMultiple::from_str(input) {
            return Ok(Self::DecimalMultiple(decimal));
        }

        if let Some(exponent) = input.strip_prefix(['e', 'E']) {
            if let Ok(exponent) = exponent.parse::<i32>() {
                return Ok(Self::DecimalExponent(f64::from(exponent)));
            }
        }

        ParseSuffixSnafu { input }.fail()
    }
}

impl Suffix {
    /// Returns the factor a value with this suffix has to be multiplied with to get base units.
    pub fn factor(&self) -> f64 {
        match self {
            Self::BinaryMultiple(binary) => binary.factor(),
            Self::DecimalMultiple(decimal) => decimal.factor(),
            Self::DecimalExponent(exponent) => 10f64.powf(*exponent),
        }
    }
}

/// Byte-multiples based on powers of 2, e.g. `Mi` for 1024^2.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, strum::Display, strum::EnumString)]
pub enum BinaryMultiple {
    #[strum(serialize = "Ki")]
    Kibi,

    #[strum(serialize = "Mi")]
    Mebi,

    #[strum(serialize = "Gi")]
    Gibi,

    #[strum(serialize = "Ti")]
    Tebi,

    #[strum(serialize = "Pi")]
    Pebi,

    #[strum(serialize = "Ei")]
    Exbi,
}

impl BinaryMultiple {
    pub fn factor(&self) -> f64 {
        match self {
            Self::Kibi => 2f64.powi(10),
            Self::Mebi => 2f64.powi(20),
            Self::Gibi => 2f64.powi(30),
            Self::Tebi => 2f64.powi(40),
            Self::Pebi => 2f64.powi(50),
            Self::Exbi => 2f64.powi(60),
        }
    }
}

/// Multiples based on powers of 10, e.g. `m` for 10^-3.
///
/// Note that 1024 = 1Ki but 1000 = 1k.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, strum::Display, strum::EnumString)]
pub enum DecimalMultiple {
    #[strum(serialize = "n")]
    Nano,

    #[strum(serialize = "u")]
    Micro,

    #[strum(serialize = "m")]
    Milli,

    #[strum(serialize = "k")]
    Kilo,

    #[strum(serialize = "M")]
    Mega,

    #[strum(serialize = "G")]
    Giga,

    #[strum(serialize = "T")]
    Tera,

    #[strum(serialize = "P")]
    Peta,

    #[strum(serialize = "E")]
    Exa,
}

impl DecimalMultiple {
    pub fn factor(&self) -> f64 {
        match self {
            Self::Nano => 10f64.powi(-9),
            Self::Micro => 10f64.powi(-6),
            Self::Milli => 10f64.powi(-3),
            Self::Kilo => 10f64.powi(3),
            Self::Mega => 10f64.powi(6),
            Self::Giga => 10f64.powi(9),
            Self::Tera => 10f64.powi(12),
            Self::Peta => 10f64.powi(15),
            Self::Exa => 10f64.powi(18),
        }
    }
}
