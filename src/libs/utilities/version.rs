// Version helpers for installed Python packages.
// Package versions (`2.0.3`, `10.0`, `1.26.4rc1`, `5.2.0.post1`) are not strict
// semver, so they are coerced before comparison.

use semver::Version;

/// Coerces a PEP 440-ish version string into a `semver::Version`.
///
/// Only the leading numeric release segment is used: `1.26.4rc1` becomes
/// `1.26.4`, `10.0` becomes `10.0.0`, `5.2.0.post1` becomes `5.2.0`.
///
/// # Returns
/// * `Some(Version)` when at least a major component could be read.
/// * `None` for empty or non-numeric input.
pub fn coerce_version(raw: &str) -> Option<Version> {
    let raw = raw.trim().trim_start_matches(['v', 'V']);
    let mut parts = [0u64; 3];
    let mut seen = 0;

    for segment in raw.split('.') {
        if seen == parts.len() {
            break;
        }
        let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            break;
        }
        parts[seen] = digits.parse().ok()?;
        seen += 1;
        // `4rc1` ends the release segment.
        if digits.len() != segment.len() {
            break;
        }
    }

    if seen == 0 {
        return None;
    }
    Some(Version::new(parts[0], parts[1], parts[2]))
}

/// Returns `Some(true)` when `found` is strictly older than `minimum`,
/// `None` when either side cannot be read.
pub fn is_older_than(found: &str, minimum: &str) -> Option<bool> {
    Some(coerce_version(found)? < coerce_version(minimum)?)
}
