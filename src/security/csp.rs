//! `Content-Security-Policy` header generation.

use crate::config::Config;

/// Builder for a single `Content-Security-Policy` header value.
///
/// Directives keep insertion order. Adding values to an existing directive
/// appends to it; duplicates are skipped.
///
/// # Examples
///
/// ```rust
/// use rcms::security::ContentSecurityPolicy;
///
/// let csp = ContentSecurityPolicy::new()
///     .directive("default-src", ["'self'"])
///     .directive("img-src", ["'self'", "data:"])
///     .directive("frame-ancestors", ["'none'"]);
///
/// assert_eq!(
///     csp.header_value(),
///     "default-src 'self'; img-src 'self' data:; frame-ancestors 'none'"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    directives: Vec<(String, Vec<String>)>,
}

impl ContentSecurityPolicy {
    /// Header name to pair with [`header_value`](Self::header_value).
    pub const HEADER: &'static str = "Content-Security-Policy";

    /// Creates an empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's policy: same-origin by default, with the CMS API allowed for
    /// `connect-src` and the media host allowed for `img-src`.
    pub fn for_site(config: &Config) -> Self {
        Self::new()
            .directive("default-src", ["'self'"])
            .directive("script-src", ["'self'"])
            .directive("style-src", ["'self'", "'unsafe-inline'"])
            .directive("img-src", ["'self'", "data:", "blob:"])
            .directive("img-src", [origin_of(&config.image_url)])
            .directive("connect-src", ["'self'"])
            .directive("connect-src", [origin_of(&config.api_url)])
            .directive("font-src", ["'self'"])
            .directive("object-src", ["'none'"])
            .directive("base-uri", ["'self'"])
            .directive("frame-ancestors", ["'none'"])
    }

    /// Adds `values` to `name`, creating the directive if needed.
    ///
    /// A directive with no values (e.g. `upgrade-insecure-requests`) is
    /// rendered as the bare name.
    #[must_use]
    pub fn directive<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let idx = match self.directives.iter().position(|(n, _)| *n == name) {
            Some(idx) => idx,
            None => {
                self.directives.push((name, Vec::new()));
                self.directives.len() - 1
            }
        };
        let existing = &mut self.directives[idx].1;
        for value in values {
            let value = value.into();
            if !existing.contains(&value) {
                existing.push(value);
            }
        }
        self
    }

    /// Returns the values of `name`, if the directive is present.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.directives
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Renders `"{directive} {value1 value2 ...}"` pairs joined by `"; "`.
    pub fn header_value(&self) -> String {
        self.directives
            .iter()
            .map(|(name, values)| {
                if values.is_empty() {
                    name.clone()
                } else {
                    format!("{} {}", name, values.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// `scheme://host[:port]` of an absolute URL; anything else is returned as-is.
fn origin_of(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
            format!("{scheme}://{authority}")
        }
        None => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_policy_renders_empty() {
        assert_eq!(ContentSecurityPolicy::new().header_value(), "");
    }

    #[test]
    fn valueless_directive() {
        let csp = ContentSecurityPolicy::new()
            .directive("upgrade-insecure-requests", Vec::<String>::new())
            .directive("default-src", ["'self'"]);
        assert_eq!(
            csp.header_value(),
            "upgrade-insecure-requests; default-src 'self'"
        );
    }

    #[test]
    fn repeated_directive_merges_without_duplicates() {
        let csp = ContentSecurityPolicy::new()
            .directive("img-src", ["'self'"])
            .directive("img-src", ["'self'", "https://media.example.com"]);
        assert_eq!(
            csp.get("img-src").unwrap(),
            ["'self'", "https://media.example.com"]
        );
    }

    #[test]
    fn site_policy_allows_backend_origins() {
        let config = Config::new(
            "http://cms.internal:1337/api",
            "token",
            "https://media.example.com/uploads",
        );
        let csp = ContentSecurityPolicy::for_site(&config);
        let header = csp.header_value();
        assert!(header.starts_with("default-src 'self'; "));
        assert!(header.contains("img-src 'self' data: blob: https://media.example.com;"));
        assert!(header.contains("connect-src 'self' http://cms.internal:1337;"));
        assert!(header.ends_with("frame-ancestors 'none'"));
    }
}
