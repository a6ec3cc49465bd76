use std::fmt;

/// Cache namespaces. Each has its own typed key constructor on [`CacheKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// code -> original URL
    Resolve,
    /// normalized URL (+ owner) -> code
    Dedup,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Resolve => "resolve",
            Namespace::Dedup => "dedup",
        }
    }
}

/// A fully rendered cache key.
///
/// Only constructible through [`CacheKey::resolve`] and [`CacheKey::dedup`],
/// so a key always carries its namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: Namespace,
    rendered: String,
}

impl CacheKey {
    pub fn resolve(code: &str) -> Self {
        Self {
            namespace: Namespace::Resolve,
            rendered: format!("{}:{}", Namespace::Resolve.as_str(), code),
        }
    }

    pub fn dedup(normalized_url: &str, owner_id: Option<&str>) -> Self {
        let rendered = match owner_id {
            Some(owner) => format!("{}:{}:{}", Namespace::Dedup.as_str(), normalized_url, owner),
            None => format!("{}:{}", Namespace::Dedup.as_str(), normalized_url),
        };
        Self {
            namespace: Namespace::Dedup,
            rendered,
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
