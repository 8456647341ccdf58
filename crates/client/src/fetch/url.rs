//! Script reference resolution and target validation.

use harvest_core::Error;
use url::Url;

/// Resolve a script `src` value against the page it appeared on.
///
/// Absolute and protocol-relative references resolve normally. A relative
/// reference whose path is non-empty and does not start with `/` gets a
/// leading `/`, so `script` on `https://example.com/path/` resolves to
/// `https://example.com/script` rather than `.../path/script`. Script
/// discovery and the script cache key off the resulting URL.
pub fn resolve_reference(base: &str, reference: &str) -> Result<Url, Error> {
    let base_url = Url::parse(base).map_err(|e| Error::InvalidUrl(format!("{}: {}", base, e)))?;

    match Url::parse(reference) {
        Ok(absolute) => return Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => return Err(Error::InvalidUrl(format!("{}: {}", reference, e))),
    }

    let reference = root_relative(reference);
    base_url
        .join(&reference)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", reference, e)))
}

/// Prefix a bare relative path with `/`, leaving network-path, absolute-path,
/// query-only and fragment-only references untouched.
fn root_relative(reference: &str) -> String {
    if reference.starts_with("//") {
        return reference.to_string();
    }

    let path_end = reference.find(['?', '#']).unwrap_or(reference.len());
    let path = &reference[..path_end];

    if path.is_empty() || path.starts_with('/') { reference.to_string() } else { format!("/{reference}") }
}

/// Check user-supplied targets before a scrape.
///
/// Targets must be non-empty and every entry must start with `http://` or
/// `https://`.
pub fn validate_targets(targets: &[String]) -> Result<(), Error> {
    if targets.is_empty() {
        return Err(Error::InvalidInput("targets array must have at least one URL".into()));
    }

    if let Some(bad) = targets
        .iter()
        .find(|t| !t.starts_with("http://") && !t.starts_with("https://"))
    {
        return Err(Error::InvalidInput(format!("all targets must start with 'http://' or 'https://': {bad}")));
    }

    Ok(())
}
