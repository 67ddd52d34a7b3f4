// Copyright (c) 2025 - Cowboy AI, Inc.
//! Platform Family Resolution
//!
//! Maps a free-form container image identifier onto a normalized
//! [`Family`] through an ordered rule table. The first rule with a matching
//! pattern wins, so the order of [`FAMILY_RULES`] is part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ProvisionError, ProvisionResult};

/// Version used when the image identifier carries no tag
pub const DEFAULT_VERSION: &str = "latest";

/// Normalized OS family, selecting the command sequences used on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Debian,
    Fedora,
    Redhat,
    Sles,
    Archlinux,
}

impl Family {
    /// All families, in rule-table order
    pub const ALL: [Family; 5] = [
        Self::Debian,
        Self::Fedora,
        Self::Redhat,
        Self::Sles,
        Self::Archlinux,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Fedora => "fedora",
            Self::Redhat => "redhat",
            Self::Sles => "sles",
            Self::Archlinux => "archlinux",
        }
    }

    /// First family whose rule matches `identifier`
    pub fn match_identifier(identifier: &str) -> Option<Self> {
        FAMILY_RULES
            .iter()
            .find(|rule| rule.matches(identifier))
            .map(|rule| rule.family)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case-sensitive identifier pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Contains(&'static str),
    StartsWith(&'static str),
}

impl Pattern {
    pub fn matches(&self, identifier: &str) -> bool {
        match self {
            Self::Contains(needle) => identifier.contains(needle),
            Self::StartsWith(prefix) => identifier.starts_with(prefix),
        }
    }
}

/// One row of the resolution table
#[derive(Debug, Clone, Copy)]
pub struct FamilyRule {
    pub family: Family,
    pub patterns: &'static [Pattern],
}

impl FamilyRule {
    pub fn matches(&self, identifier: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(identifier))
    }
}

/// Ordered resolution table, first match wins
pub const FAMILY_RULES: &[FamilyRule] = &[
    FamilyRule {
        family: Family::Debian,
        patterns: &[
            Pattern::Contains("debian"),
            Pattern::Contains("ubuntu"),
            Pattern::Contains("cumulus"),
        ],
    },
    FamilyRule {
        family: Family::Fedora,
        patterns: &[Pattern::Contains("fedora")],
    },
    FamilyRule {
        family: Family::Redhat,
        patterns: &[
            Pattern::Contains("centos"),
            Pattern::StartsWith("el-"),
            Pattern::Contains("eos"),
            Pattern::Contains("oracle"),
            Pattern::Contains("redhat"),
            Pattern::Contains("scientific"),
        ],
    },
    FamilyRule {
        family: Family::Sles,
        patterns: &[Pattern::Contains("opensuse"), Pattern::Contains("sles")],
    },
    FamilyRule {
        family: Family::Archlinux,
        patterns: &[Pattern::Contains("archlinux")],
    },
];

/// Resolve a single identifier to a family
pub fn resolve_family(identifier: &str) -> ProvisionResult<Family> {
    Family::match_identifier(identifier)
        .ok_or_else(|| ProvisionError::UnsupportedPlatform(identifier.to_string()))
}

/// Parsed `image[:tag]` identifier
///
/// # Examples
///
/// ```rust
/// use docker_provision::domain::ImageRef;
///
/// let image = ImageRef::parse("litmusimage/centos:7").unwrap();
/// assert_eq!(image.repository(), "litmusimage_centos");
/// assert_eq!(image.tag(), Some("7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    original: String,
    repository: String,
    tag: Option<String>,
}

impl ImageRef {
    /// Split an identifier into repository and tag
    ///
    /// The tag is everything after the last `:` unless that suffix contains a
    /// `/` (a registry port). Path separators in the repository become `_`.
    pub fn parse(identifier: impl Into<String>) -> ProvisionResult<Self> {
        let original = identifier.into();
        let trimmed = original.trim();

        if trimmed.is_empty() {
            return Err(ProvisionError::RequestValidation(
                "platform must not be empty".to_string(),
            ));
        }

        let (repository, tag) = match trimmed.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => (repo, Some(tag).filter(|t| !t.is_empty())),
            _ => (trimmed, None),
        };

        Ok(Self {
            repository: repository.replace('/', "_"),
            tag: tag.map(str::to_string),
            original: trimmed.to_string(),
        })
    }

    /// Identifier exactly as requested
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Repository portion with `/` replaced by `_`
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Resolved platform family and version of an image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub family: Family,
    pub version: String,
}

impl PlatformSpec {
    /// Resolve the family from the repository, falling back to the tag
    ///
    /// The version is the raw tag, or [`DEFAULT_VERSION`] without one.
    pub fn resolve(image: &ImageRef) -> ProvisionResult<Self> {
        let family = Family::match_identifier(image.repository())
            .or_else(|| image.tag().and_then(Family::match_identifier))
            .ok_or_else(|| ProvisionError::UnsupportedPlatform(image.to_string()))?;

        Ok(Self {
            family,
            version: image.tag().unwrap_or(DEFAULT_VERSION).to_string(),
        })
    }

    /// Generated container name, `{family}_{version}-{port}`
    pub fn container_name(&self, port: u16) -> String {
        format!("{}_{}-{}", self.family, self.version, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("debian" => Some(Family::Debian))]
    #[test_case("ubuntu" => Some(Family::Debian))]
    #[test_case("litmusimage_cumulus" => Some(Family::Debian))]
    #[test_case("fedora" => Some(Family::Fedora))]
    #[test_case("centos" => Some(Family::Redhat))]
    #[test_case("el-7" => Some(Family::Redhat))]
    #[test_case("eos-4" => Some(Family::Redhat))]
    #[test_case("oraclelinux" => Some(Family::Redhat))]
    #[test_case("redhat" => Some(Family::Redhat))]
    #[test_case("scientificlinux" => Some(Family::Redhat))]
    #[test_case("opensuse" => Some(Family::Sles))]
    #[test_case("sles" => Some(Family::Sles))]
    #[test_case("archlinux" => Some(Family::Archlinux))]
    #[test_case("alpine" => None)]
    #[test_case("Debian" => None; "matching is case sensitive")]
    #[test_case("model-el-7" => None; "el- must lead")]
    fn test_match_identifier(identifier: &str) -> Option<Family> {
        Family::match_identifier(identifier)
    }

    #[test]
    fn test_first_rule_wins() {
        // Matches both the debian and redhat rows
        assert_eq!(
            Family::match_identifier("ubuntu-centos"),
            Some(Family::Debian)
        );
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<Family> = FAMILY_RULES.iter().map(|r| r.family).collect();
        assert_eq!(order, Family::ALL.to_vec());
    }

    #[test]
    fn test_resolve_family_unsupported() {
        let err = resolve_family("alpine").unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedPlatform(ref id) if id == "alpine"));
    }

    #[test_case("debian:9", "debian", Some("9"))]
    #[test_case("litmusimage/centos:7", "litmusimage_centos", Some("7"))]
    #[test_case(
        "registry.local:5000/ubuntu:18.04",
        "registry.local:5000_ubuntu",
        Some("18.04")
    )]
    #[test_case("registry.local:5000/ubuntu", "registry.local:5000_ubuntu", None)]
    #[test_case("archlinux", "archlinux", None)]
    #[test_case("fedora:", "fedora", None)]
    fn test_image_ref_parse(input: &str, repository: &str, tag: Option<&str>) {
        let image = ImageRef::parse(input).unwrap();
        assert_eq!(image.repository(), repository);
        assert_eq!(image.tag(), tag);
        assert_eq!(image.as_str(), input);
    }

    #[test]
    fn test_image_ref_rejects_empty() {
        assert!(ImageRef::parse("  ").is_err());
    }

    #[test]
    fn test_resolve_uses_tag_verbatim_as_version() {
        let image = ImageRef::parse("litmusimage/oraclelinux:7.9-slim").unwrap();
        let spec = PlatformSpec::resolve(&image).unwrap();
        assert_eq!(spec.family, Family::Redhat);
        assert_eq!(spec.version, "7.9-slim");
    }

    #[test]
    fn test_resolve_falls_back_to_tag() {
        let image = ImageRef::parse("litmusimage/os:centos7").unwrap();
        let spec = PlatformSpec::resolve(&image).unwrap();
        assert_eq!(spec.family, Family::Redhat);
        assert_eq!(spec.version, "centos7");
    }

    #[test]
    fn test_resolve_without_tag_defaults_version() {
        let image = ImageRef::parse("archlinux").unwrap();
        let spec = PlatformSpec::resolve(&image).unwrap();
        assert_eq!(spec.version, DEFAULT_VERSION);
    }

    #[test]
    fn test_resolve_unsupported_carries_identifier() {
        let image = ImageRef::parse("alpine:3.18").unwrap();
        let err = PlatformSpec::resolve(&image).unwrap_err();
        assert_eq!(
            err.to_string(),
            "platform alpine:3.18 not yet supported on docker"
        );
    }

    #[test]
    fn test_container_name() {
        let spec = PlatformSpec {
            family: Family::Debian,
            version: "9".to_string(),
        };
        assert_eq!(spec.container_name(2224), "debian_9-2224");
    }
}
