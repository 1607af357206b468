//! Container image reference grammar
//!
//! ```text
//! reference        := name [ ":" tag ] [ "@" digest ]
//! name             := [ domain "/" ] path-component [ "/" path-component ]*
//! domain           := domain-component [ "." domain-component ]* [ ":" port ]
//! domain-component := /([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])/
//! path-component   := alphanumeric [ separator alphanumeric ]*
//! alphanumeric     := /[a-z0-9]+/
//! separator        := /[_.]|__|[-]+/
//! tag              := /[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}/
//! digest           := algorithm ":" hex
//! ```
//!
//! Digests must use a registered algorithm with its exact lowercase hex
//! length. A bare 64 character hex identifier, or a bare digest, is also
//! accepted.

use regex::Regex;
use std::sync::LazyLock;

const NAME_TOTAL_LENGTH_MAX: usize = 255;

const ALPHANUMERIC: &str = r"[a-z0-9]+";
const SEPARATOR: &str = r"(?:[._]|__|[-]+)";
const DOMAIN_COMPONENT: &str = r"(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
const TAG: &str = r"[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
const DIGEST: &str = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";

/// Registered digest algorithms and their hex lengths
const DIGEST_ALGORITHMS: [(&str, usize); 3] = [("sha256", 64), ("sha384", 96), ("sha512", 128)];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-f0-9]{64}$").expect("identifier pattern is valid"));

static BARE_DIGEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{DIGEST}$")).expect("digest pattern is valid"));

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let path_component = format!("{ALPHANUMERIC}(?:{SEPARATOR}{ALPHANUMERIC})*");
    let domain = format!(r"{DOMAIN_COMPONENT}(?:\.{DOMAIN_COMPONENT})*(?::[0-9]+)?");
    let name = format!("(?P<name>(?:{domain}/)?{path_component}(?:/{path_component})*)");
    Regex::new(&format!("^{name}(?::{TAG})?(?:@(?P<digest>{DIGEST}))?$"))
        .expect("reference pattern is valid")
});

/// Returns true if `reference` parses as any container image reference
pub fn is_image_reference(reference: &str) -> bool {
    if IDENTIFIER.is_match(reference)
        || (BARE_DIGEST.is_match(reference) && is_registered_digest(reference))
    {
        return true;
    }

    let Some(captures) = REFERENCE.captures(reference) else {
        return false;
    };
    let name_ok = captures
        .name("name")
        .is_some_and(|name| name.as_str().len() <= NAME_TOTAL_LENGTH_MAX);
    let digest_ok = captures
        .name("digest")
        .map_or(true, |digest| is_registered_digest(digest.as_str()));
    name_ok && digest_ok
}

fn is_registered_digest(digest: &str) -> bool {
    let Some((algorithm, hex)) = digest.split_once(':') else {
        return false;
    };
    DIGEST_ALGORITHMS
        .iter()
        .find(|(name, _)| *name == algorithm)
        .is_some_and(|(_, len)| {
            hex.len() == *len && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        })
}
