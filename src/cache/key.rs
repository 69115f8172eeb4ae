//! Cache key derivation.
//!
//! A key is the request URL, with a reserved key-only query parameter added
//! when the request comes from the link-preview crawler. Crawler and browser
//! traffic for the same URL therefore never share an entry.

use std::collections::HashSet;
use std::fmt;

use url::Url;

/// Normalized identifier of a cached response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives cache keys from a URL and the User-Agent header.
#[derive(Debug, Clone)]
pub struct CacheKeyNormalizer {
    /// Lowercased crawler token.
    token: String,
    /// Reserved query parameter name.
    marker: String,
}

impl CacheKeyNormalizer {
    pub fn new(crawler_token: &str, crawler_marker: &str) -> Self {
        Self {
            token: crawler_token.to_lowercase(),
            marker: crawler_marker.to_string(),
        }
    }

    /// Case-insensitive substring match on the raw User-Agent.
    /// A missing header is never a crawler.
    pub fn is_crawler(&self, user_agent: Option<&str>) -> bool {
        match user_agent {
            Some(ua) if !self.token.is_empty() => ua.to_lowercase().contains(&self.token),
            _ => false,
        }
    }

    /// Derive the key for a request.
    ///
    /// Any client-supplied marker parameter is stripped first so a browser can
    /// never address the crawler entry. The fragment is dropped.
    pub fn key_for(&self, url: &Url, user_agent: Option<&str>) -> CacheKey {
        let mut key = url.clone();
        key.set_fragment(None);

        if key.query().is_some() {
            let kept: Vec<(String, String)> = key
                .query_pairs()
                .filter(|(name, _)| name != self.marker.as_str())
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect();
            let had_marker = kept.len() != key.query_pairs().count();
            if had_marker {
                if kept.is_empty() {
                    key.set_query(None);
                } else {
                    key.query_pairs_mut().clear().extend_pairs(kept);
                }
            }
        }

        if self.is_crawler(user_agent) {
            key.query_pairs_mut().append_key_only(&self.marker);
        }

        CacheKey(key.into())
    }
}

/// Hostnames that bypass cache reads. Matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    hosts: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| self.hosts.contains(&host.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> CacheKeyNormalizer {
        CacheKeyNormalizer::new("Telegram", "telegram")
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    const TELEGRAM_UA: &str = "TelegramBot (like TwitterBot)";
    const BROWSER_UA: &str = "Mozilla/5.0 (X11; Linux x86_64)";

    #[test]
    fn test_crawler_detection() {
        let n = normalizer();
        assert!(n.is_crawler(Some(TELEGRAM_UA)));
        assert!(n.is_crawler(Some("xx-telegram-yy")));
        assert!(!n.is_crawler(Some(BROWSER_UA)));
        assert!(!n.is_crawler(Some("")));
        assert!(!n.is_crawler(None));
    }

    #[test]
    fn test_browser_key_is_url() {
        let key = normalizer().key_for(&url("https://e.com/p/abc?x=1"), Some(BROWSER_UA));
        assert_eq!(key.as_str(), "https://e.com/p/abc?x=1");
    }

    #[test]
    fn test_crawler_key_gets_marker() {
        let n = normalizer();
        assert_eq!(
            n.key_for(&url("https://e.com/p/abc"), Some(TELEGRAM_UA)).as_str(),
            "https://e.com/p/abc?telegram"
        );
        assert_eq!(
            n.key_for(&url("https://e.com/p/abc?x=1"), Some(TELEGRAM_UA)).as_str(),
            "https://e.com/p/abc?x=1&telegram"
        );
    }

    #[test]
    fn test_crawler_and_browser_keys_differ() {
        let n = normalizer();
        for u in ["https://e.com/", "https://e.com/version", "https://e.com/a?b=c"] {
            let u = url(u);
            assert_ne!(n.key_for(&u, Some(TELEGRAM_UA)), n.key_for(&u, Some(BROWSER_UA)));
            assert_ne!(n.key_for(&u, Some(TELEGRAM_UA)), n.key_for(&u, None));
        }
    }

    #[test]
    fn test_browser_cannot_forge_crawler_key() {
        let n = normalizer();
        let forged = n.key_for(&url("https://e.com/a?telegram"), Some(BROWSER_UA));
        let crawler = n.key_for(&url("https://e.com/a"), Some(TELEGRAM_UA));
        assert_eq!(forged.as_str(), "https://e.com/a");
        assert_ne!(forged, crawler);

        let forged = n.key_for(&url("https://e.com/a?x=1&telegram"), Some(BROWSER_UA));
        assert_eq!(forged.as_str(), "https://e.com/a?x=1");
    }

    #[test]
    fn test_crawler_marker_not_duplicated() {
        let key = normalizer().key_for(&url("https://e.com/a?telegram"), Some(TELEGRAM_UA));
        assert_eq!(key.as_str(), "https://e.com/a?telegram");
    }

    #[test]
    fn test_fragment_dropped() {
        let key = normalizer().key_for(&url("https://e.com/a#frag"), None);
        assert_eq!(key.as_str(), "https://e.com/a");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        // The dispatcher derives the key once for both lookup and store; this
        // pins that a second derivation would agree bit-for-bit anyway.
        let n = normalizer();
        for ua in [Some(TELEGRAM_UA), Some(BROWSER_UA), None] {
            let u = url("https://e.com/a?z=1&y=%20&telegram");
            assert_eq!(n.key_for(&u, ua), n.key_for(&u, ua));
        }
    }

    #[test]
    fn test_exclusion_set_is_case_insensitive() {
        let set = ExclusionSet::new(["API.example.com"]);
        assert!(set.contains(&url("https://api.example.com/x")));
        assert!(set.contains(&url("https://API.EXAMPLE.COM/x")));
        assert!(!set.contains(&url("https://example.com/x")));
        assert_eq!(set.len(), 1);
    }
}
