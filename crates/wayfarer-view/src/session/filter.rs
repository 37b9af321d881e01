/// Host block list applied to a partition's outgoing requests.
///
/// A blocked host also blocks all of its subdomains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    blocked: Vec<String>,
}

impl ContentFilter {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for host in hosts {
            filter.block(host.as_ref());
        }
        filter
    }

    pub fn block(&mut self, host: &str) {
        let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
        if !host.is_empty() && !self.blocked.contains(&host) {
            self.blocked.push(host);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Whether a request to `url` should be cancelled. URLs without a host
    /// are never blocked.
    pub fn is_blocked(&self, url: &str) -> bool {
        if self.blocked.is_empty() {
            return false;
        }
        let Some(host) = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
        else {
            return false;
        };
        self.blocked.iter().any(|blocked| {
            host == *blocked
                || host
                    .strip_suffix(blocked.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_host_and_subdomains() {
        let filter = ContentFilter::new(["ads.example.com"]);
        assert!(filter.is_blocked("https://ads.example.com/banner.js"));
        assert!(filter.is_blocked("http://cdn.ads.example.com/x"));
        assert!(!filter.is_blocked("https://example.com/"));
        assert!(!filter.is_blocked("https://badads.example.com/"));
    }

    #[test]
    fn matching_ignores_case() {
        let filter = ContentFilter::new(["Tracker.TEST"]);
        assert!(filter.is_blocked("https://TRACKER.test/pixel.gif"));
    }

    #[test]
    fn hostless_urls_pass() {
        let filter = ContentFilter::new(["example.com"]);
        assert!(!filter.is_blocked("data:text/plain,hello"));
        assert!(!filter.is_blocked("not a url"));
    }

    #[test]
    fn empty_filter_blocks_nothing() {
        let filter = ContentFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.is_blocked("https://anything.test/"));
    }
}
