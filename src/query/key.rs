use std::fmt;

/// Identifies one cache entry: a short ordered sequence of string tokens.
///
/// # Examples
///
/// ```
/// use rcms::query::QueryKey;
///
/// let key = QueryKey::new(["partners", "en"]);
/// assert_eq!(key.to_string(), "partners:en");
/// assert_eq!(QueryKey::from("hero").parts(), ["hero"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for QueryKey {
    fn from(part: &str) -> Self {
        Self(vec![part.to_owned()])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}
