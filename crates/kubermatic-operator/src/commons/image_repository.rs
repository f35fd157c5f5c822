//! Parsing and validation of container image repositories.
//!
//! Every component image is configured as a repository only, e.g. `quay.io/kubermatic/kubermatic`.
//! The tag is always derived from the Kubermatic version, so a configured repository must never
//! carry a tag of its own. A digest is tolerated and passed through unchecked.

// The grammar is adapted from the Docker distribution reference package.
// See https://github.com/distribution/reference/blob/main/regexp.go for details.

use std::{fmt::Display, str::FromStr, sync::LazyLock};

use const_format::concatcp;
use regex::Regex;
use snafu::{Snafu, ensure};

/// The maximum total length of a repository name, including the domain.
const NAME_TOTAL_MAX_LENGTH: usize = 255;

const ALPHANUMERIC_FMT: &str = "[a-z0-9]+";
const SEPARATOR_FMT: &str = "(?:[._]|__|[-]+)";
const PATH_COMPONENT_FMT: &str = concatcp!(
    ALPHANUMERIC_FMT,
    "(?:",
    SEPARATOR_FMT,
    ALPHANUMERIC_FMT,
    ")*"
);

const DOMAIN_NAME_COMPONENT_FMT: &str = "(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
const DOMAIN_NAME_FMT: &str = concatcp!(
    DOMAIN_NAME_COMPONENT_FMT,
    "(?:\\.",
    DOMAIN_NAME_COMPONENT_FMT,
    ")*"
);
const IPV6_ADDRESS_FMT: &str = "\\[[a-fA-F0-9:]+\\]";
const DOMAIN_FMT: &str = concatcp!(
    "(?:",
    DOMAIN_NAME_FMT,
    "|",
    IPV6_ADDRESS_FMT,
    ")(?::[0-9]+)?"
);

const NAME_FMT: &str = concatcp!(
    "(?:",
    DOMAIN_FMT,
    "/)?",
    PATH_COMPONENT_FMT,
    "(?:/",
    PATH_COMPONENT_FMT,
    ")*"
);
const TAG_FMT: &str = "[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
const DIGEST_FMT: &str = "[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";

const REFERENCE_FMT: &str = concatcp!(
    "^(?P<name>",
    NAME_FMT,
    ")(?::(?P<tag>",
    TAG_FMT,
    "))?(?:@(?P<digest>",
    DIGEST_FMT,
    "))?$"
);

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(REFERENCE_FMT).expect("failed to compile image reference regex")
});

/// The error type for image repository parsing/validation operations.
///
/// The variant name doubles as the stable reason code, see [`Error::reason`].
#[derive(Debug, PartialEq, Snafu, strum::IntoStaticStr)]
pub enum Error {
    /// The input cannot be parsed as an image reference at all.
    #[snafu(display("failed to parse {input:?} as image repository: {reason}"))]
    InvalidReferenceSyntax { input: String, reason: &'static str },

    /// The input is a valid reference, but contains a tag.
    #[snafu(display(
        "it is not allowed to specify an image tag ({tag:?}) for the repository {input:?}, the tag is managed by Kubermatic"
    ))]
    TagNotAllowed { input: String, tag: String },
}

impl Error {
    /// Returns the reason code of this error, e.g. `TagNotAllowed`.
    pub fn reason(&self) -> &'static str {
        self.into()
    }
}

/// A parsed image reference of the form `name[:tag][@digest]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageReference {
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl FromStr for ImageReference {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        ensure!(
            !input.is_empty(),
            InvalidReferenceSyntaxSnafu {
                input,
                reason: "repository name must have at least one component",
            }
        );

        let captures = REFERENCE_REGEX
            .captures(input)
            .ok_or_else(|| Error::InvalidReferenceSyntax {
                input: input.to_owned(),
                reason: "invalid reference format",
            })?;

        // The name group is not optional, a successful match always contains it.
        let name = captures.name("name").map_or("", |m| m.as_str());

        ensure!(
            name.len() <= NAME_TOTAL_MAX_LENGTH,
            InvalidReferenceSyntaxSnafu {
                input,
                reason: "repository name must not be more than 255 characters",
            }
        );

        Ok(Self {
            name: name.to_owned(),
            tag: captures.name("tag").map(|m| m.as_str().to_owned()),
            digest: captures.name("digest").map(|m| m.as_str().to_owned()),
        })
    }
}

impl Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

impl ImageReference {
    /// The repository name including the optional domain, e.g. `quay.io/kubermatic/kubermatic`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}

/// Validates that `repository` is an image repository without a tag.
pub fn validate_repository(repository: &str) -> Result<ImageReference, Error> {
    let reference = ImageReference::from_str(repository)?;

    if let Some(tag) = reference.tag() {
        return TagNotAllowedSnafu {
            input: repository,
            tag,
        }
        .fail();
    }

    Ok(reference)
}

/// Returns `default` if `current` is empty, otherwise validates `current` and returns it as-is.
///
/// The built-in default is trusted and never validated.
pub fn validate_or_default(current: &str, default: &str) -> Result<String, Error> {
    if current.is_empty() {
        return Ok(default.to_owned());
    }

    validate_repository(current)?;
    Ok(current.to_owned())
}
