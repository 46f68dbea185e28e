use std::ops::Index;
use std::slice;

/// A single URL parameter, consisting of a key and a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Param {
    pub key: String,
    pub value: String,
}

impl Param {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The parameters extracted by a route match.
///
/// The list is ordered: the first URL parameter is also the first entry, so it is
/// safe to read values by index.
///
/// ```rust
/// use radix_router::tree::Node;
///
/// let mut tree = Node::new();
/// tree.insert("/blog/:category/:post", "post").unwrap();
///
/// let matched = tree.at("/blog/rust/routers").unwrap();
/// assert_eq!(matched.params.get("post"), Some("routers"));
/// assert_eq!(matched.params[0].key, "category");
/// assert_eq!(matched.params[0].value, "rust");
/// ```
///
/// A `Params` can be handed to [`Node::get_value`](crate::tree::Node::get_value) and
/// reused across lookups after calling [`clear`](Params::clear).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params(Vec<Param>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates an empty list able to hold `capacity` parameters without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Returns the value of the first parameter registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.0
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys and values in match order.
    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter(self.0.iter())
    }

    /// Removes every parameter, keeping the allocation for the next lookup.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    // Keys come from the route as bytes; routes are `String`s, so they are valid UTF-8.
    pub(crate) fn push(&mut self, key: impl AsRef<[u8]>, value: &str) {
        let key = String::from_utf8_lossy(key.as_ref()).into_owned();
        self.0.push(Param::new(key, value));
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }
}

impl Index<usize> for Params {
    type Output = Param;

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = ParamsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys and values of a route's [parameters](crate::Params).
pub struct ParamsIter<'a>(slice::Iter<'a, Param>);

impl<'a> Iterator for ParamsIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|param| (param.key.as_str(), param.value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for ParamsIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_by_insertion() {
        let mut params = Params::new();
        params.push("category", "rust");
        params.push("post", "routers");

        assert_eq!(params.len(), 2);
        assert_eq!(params[0], Param::new("category", "rust"));
        assert_eq!(params[1].value, "routers");
        assert!(params
            .iter()
            .eq(vec![("category", "rust"), ("post", "routers")]));
    }

    #[test]
    fn get_returns_first_match() {
        let mut params = Params::new();
        params.push("id", "1");
        params.push("id", "2");

        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut params = Params::with_capacity(4);
        params.push("a", "b");
        params.clear();

        assert!(params.is_empty());
        assert!(params.0.capacity() >= 4);
    }

    #[test]
    fn truncate_drops_tail() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");
        params.truncate(1);

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("b"), None);
    }
}
