//! Same-site gate for script following.
//!
//! Scripts are only fetched when their registrable domain (eTLD+1, via the
//! public suffix list) equals the target's. A static hostname blacklist keeps
//! the service away from its own deployments.

use harvest_core::Error;
use std::collections::HashSet;
use url::Url;

/// Registrable domain of `hostname`, e.g. `example.co.uk` for `www.example.co.uk`.
pub fn registrable_domain(hostname: &str) -> Result<String, Error> {
    let host = hostname.trim_end_matches('.').to_ascii_lowercase();
    psl::domain_str(&host)
        .map(str::to_string)
        .ok_or_else(|| Error::TldResolutionFailed(format!("no registrable domain for {hostname}")))
}

/// Whether two hostnames share a registrable domain. Unresolvable hosts never match.
pub fn same_registrable_domain(a: &str, b: &str) -> bool {
    match (registrable_domain(a), registrable_domain(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Outcome of checking one script URL against its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptGate {
    Follow,
    Blacklisted,
    OffSite { script_domain: String },
}

/// Blacklist plus registrable-domain comparison.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    blacklist: HashSet<String>,
}

impl DomainFilter {
    pub fn new<I, S>(blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { blacklist: blacklist.into_iter().map(Into::into).collect() }
    }

    /// Exact hostname match against the blacklist.
    pub fn is_blacklisted(&self, hostname: &str) -> bool {
        self.blacklist.contains(hostname)
    }

    /// Registrable domain of a target URL.
    ///
    /// Fails the whole target on an unparsable URL, a blacklisted host, or a
    /// failed suffix lookup.
    pub fn target_domain(&self, target: &str) -> Result<String, Error> {
        let url = Url::parse(target).map_err(|e| Error::InvalidUrl(format!("{}: {}", target, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{target}: missing host")))?;

        if self.is_blacklisted(host) {
            return Err(Error::TargetBlacklisted(host.to_string()));
        }

        registrable_domain(host)
    }

    /// Decide whether a resolved script URL should be followed.
    ///
    /// A suffix lookup failure on the script host is returned as an error so
    /// the caller can log it; it never fails the target.
    pub fn check_script(&self, script: &Url, target_domain: &str) -> Result<ScriptGate, Error> {
        let host = script
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{script}: missing host")))?;

        if self.is_blacklisted(host) {
            return Ok(ScriptGate::Blacklisted);
        }

        let script_domain = registrable_domain(host)?;
        if script_domain == target_domain { Ok(ScriptGate::Follow) } else { Ok(ScriptGate::OffSite { script_domain }) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::config::DEFAULT_BLACKLIST;

    fn filter() -> DomainFilter {
        DomainFilter::new(DEFAULT_BLACKLIST.iter().copied())
    }

    #[test]
    fn test_registrable_domain_strips_subdomains() {
        assert_eq!(registrable_domain("cdn.example.com").unwrap(), "example.com");
        assert_eq!(registrable_domain("www.example.com").unwrap(), "example.com");
        assert_eq!(registrable_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn test_registrable_domain_multi_label_suffix() {
        assert_eq!(registrable_domain("www.example.co.uk").unwrap(), "example.co.uk");
    }

    #[test]
    fn test_registrable_domain_bare_suffix_fails() {
        assert!(matches!(registrable_domain("com"), Err(Error::TldResolutionFailed(_))));
        assert!(matches!(registrable_domain("co.uk"), Err(Error::TldResolutionFailed(_))));
    }

    #[test]
    fn test_same_registrable_domain() {
        assert!(same_registrable_domain("cdn.example.com", "www.example.com"));
        assert!(!same_registrable_domain("example.com", "unrelated.org"));
        assert!(!same_registrable_domain("com", "com"));
    }

    #[test]
    fn test_target_domain() {
        assert_eq!(filter().target_domain("https://www.example.com/page").unwrap(), "example.com");
    }

    #[test]
    fn test_target_domain_blacklisted() {
        let result = filter().target_domain("https://google.com/search");
        assert!(matches!(result, Err(Error::TargetBlacklisted(host)) if host == "google.com"));
    }

    #[test]
    fn test_target_domain_invalid_url() {
        assert!(matches!(filter().target_domain("not a url"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_check_script_same_site_followed() {
        let script = Url::parse("https://cdn.example.com/a.js").unwrap();
        assert_eq!(filter().check_script(&script, "example.com").unwrap(), ScriptGate::Follow);
    }

    #[test]
    fn test_check_script_off_site_skipped() {
        let script = Url::parse("https://unrelated.org/a.js").unwrap();
        assert_eq!(
            filter().check_script(&script, "example.com").unwrap(),
            ScriptGate::OffSite { script_domain: "unrelated.org".into() }
        );
    }

    #[test]
    fn test_check_script_blacklisted_skipped() {
        let filter = DomainFilter::new(["static.example.com"]);
        let script = Url::parse("https://static.example.com/a.js").unwrap();
        assert_eq!(filter.check_script(&script, "example.com").unwrap(), ScriptGate::Blacklisted);
    }

    #[test]
    fn test_blacklist_is_exact_hostname_match() {
        let filter = filter();
        assert!(filter.is_blacklisted("google.com"));
        assert!(!filter.is_blacklisted("www.google.com"));
        assert!(!filter.is_blacklisted("localhost"));
    }
}
