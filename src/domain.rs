//! Helpers for working with domain names as the Hetzner API and ACME clients present them.

use itertools::Itertools;

/// Returns the base-domain suffixes of `domain`, ordered from most to least specific.
///
/// For `a.b.example.co.uk` this yields `a.b.example.co.uk`, `b.example.co.uk`, `example.co.uk`, `co.uk` and `uk`.
/// Names are lower-cased, a trailing dot is ignored and empty labels are skipped.
pub fn base_domain_candidates(domain: &str) -> Vec<String> {
    let labels = strip_fqdn(domain)
        .split('.')
        .filter(|l| !l.is_empty())
        .map(|l| l.to_ascii_lowercase())
        .collect_vec();

    (0..labels.len())
        .map(|start| labels[start..].iter().join("."))
        .collect()
}

/// Convert a name into its fully-qualified form, with a trailing dot
pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_owned()
    } else {
        format!("{}.", name)
    }
}

/// Remove a single trailing dot, if present
pub fn strip_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Compare two domain names, ignoring case and a trailing dot
pub fn names_match(a: &str, b: &str) -> bool {
    strip_fqdn(a).eq_ignore_ascii_case(strip_fqdn(b))
}

/// Returns the name of `fqdn` relative to `zone`, the way the Hetzner API stores record names.
///
/// The zone apex is reported as `@`. Returns [`None`] if `fqdn` is not inside `zone`.
pub fn relative_to_zone(fqdn: &str, zone: &str) -> Option<String> {
    let name = strip_fqdn(fqdn).to_ascii_lowercase();
    let zone = strip_fqdn(zone).to_ascii_lowercase();

    if name == zone {
        return Some("@".to_owned());
    }
    name.strip_suffix(&zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_owned)
}
