//! Link attribute policy: affiliate domains and named campaign URLs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static URL_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://(?:[^@/?#]*@)?([^/:?#]+)").expect("valid url host regex")
});

/// Returns the lowercase host of an absolute URL.
pub fn url_host(url: &str) -> Option<String> {
    URL_HOST_RE
        .captures(url.trim())
        .and_then(|captures| captures.get(1))
        .map(|host| host.as_str().trim_end_matches('.').to_ascii_lowercase())
        .filter(|host| !host.is_empty())
}

/// Known affiliate domains and promotional URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPolicy {
    /// Registrable domains; sub-domains match too.
    #[serde(default)]
    pub affiliate_domains: Vec<String>,
    /// Exact promotional URL -> campaign name.
    #[serde(default)]
    pub campaigns: BTreeMap<String, String>,
}

impl LinkPolicy {
    /// Returns whether `url`'s host is, or is a sub-domain of, an affiliate domain.
    pub fn is_affiliate(&self, url: &str) -> bool {
        let Some(host) = url_host(url) else {
            return false;
        };
        self.affiliate_domains.iter().any(|domain| {
            let domain = domain.trim().to_ascii_lowercase();
            !domain.is_empty()
                && (host == domain
                    || (host.len() > domain.len()
                        && host.ends_with(domain.as_str())
                        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'))
        })
    }

    /// Returns the campaign name registered for this exact URL.
    pub fn campaign(&self, url: &str) -> Option<&str> {
        self.campaigns.get(url).map(String::as_str)
    }
}
