use std::fmt;

/// Ordered field names from the root of a schema down to one node.
///
/// Paths include the synthetic repeated groups of lists (`list`) and maps
/// (`key_value`), so the path of a list element is `["tags", "list",
/// "element"]`. A path is the join key between a schema and its engine type
/// mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaPath(Vec<String>);

impl SchemaPath {
    /// Create a path from its parts
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted path (`"a.list.element"`)
    pub fn from_dotted(dotted: &str) -> Self {
        Self::new(dotted.split('.').filter(|part| !part.is_empty()))
    }

    /// The root path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path parts
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `name` appended
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut parts = self.0.clone();
        parts.push(name.into());
        Self(parts)
    }

    pub(crate) fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&[&str]> for SchemaPath {
    fn from(parts: &[&str]) -> Self {
        Self::new(parts.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for SchemaPath {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}
