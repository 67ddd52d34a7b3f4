// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Platform Resolution
//!
//! Any identifier carrying a family keyword resolves to that family (subject
//! to rule order); identifiers built from letters that cannot spell any
//! keyword never resolve.

use docker_provision::domain::{resolve_family, Family, ImageRef, PlatformSpec, FAMILY_RULES};
use docker_provision::ProvisionError;
use proptest::prelude::*;

/// One keyword per family, unique to that family's rule
fn family_keyword() -> impl Strategy<Value = (Family, &'static str)> {
    prop_oneof![
        Just((Family::Debian, "debian")),
        Just((Family::Debian, "ubuntu")),
        Just((Family::Debian, "cumulus")),
        Just((Family::Fedora, "fedora")),
        Just((Family::Redhat, "centos")),
        Just((Family::Redhat, "oracle")),
        Just((Family::Redhat, "redhat")),
        Just((Family::Redhat, "scientific")),
        Just((Family::Sles, "opensuse")),
        Just((Family::Sles, "sles")),
        Just((Family::Archlinux, "archlinux")),
    ]
}

/// Digits and separators only, so no keyword can appear
fn neutral_text() -> impl Strategy<Value = String> {
    "[0-9._-]{0,12}"
}

/// Lowercase text over letters that appear in no keyword prefix pair
fn unmatched_identifier() -> impl Strategy<Value = String> {
    "[wxyzkq0-9]{1,20}"
}

proptest! {
    #[test]
    fn prop_keyword_resolves_to_its_family(
        (family, keyword) in family_keyword(),
        prefix in neutral_text(),
        suffix in neutral_text(),
    ) {
        // Keep the identifier from starting with "el-"
        let identifier = format!("x{prefix}{keyword}{suffix}");
        prop_assert_eq!(resolve_family(&identifier).unwrap(), family);
    }

    #[test]
    fn prop_unmatched_identifier_is_unsupported(identifier in unmatched_identifier()) {
        let err = resolve_family(&identifier).unwrap_err();
        prop_assert!(
            matches!(err, ProvisionError::UnsupportedPlatform(ref id) if *id == identifier)
        );
    }

    #[test]
    fn prop_matching_is_case_sensitive((_, keyword) in family_keyword()) {
        prop_assert!(Family::match_identifier(&keyword.to_uppercase()).is_none());
    }

    #[test]
    fn prop_earlier_rule_wins_on_overlap(
        (first, first_keyword) in family_keyword(),
        (second, second_keyword) in family_keyword(),
    ) {
        let identifier = format!("{first_keyword}-{second_keyword}");
        let rank = |family: Family| FAMILY_RULES.iter().position(|r| r.family == family);
        let expected = if rank(first) <= rank(second) { first } else { second };
        prop_assert_eq!(Family::match_identifier(&identifier), Some(expected));
    }

    #[test]
    fn prop_version_is_tag_verbatim(
        (family, keyword) in family_keyword(),
        tag in "[0-9a-z][0-9a-z._-]{0,10}",
    ) {
        let image = ImageRef::parse(format!("{keyword}:{tag}")).unwrap();
        let spec = PlatformSpec::resolve(&image).unwrap();
        prop_assert_eq!(spec.family, family);
        prop_assert_eq!(&spec.version, &tag);
        prop_assert_eq!(spec.container_name(2222), format!("{family}_{tag}-2222"));
    }
}
