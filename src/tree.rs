//! The radix tree behind the [`Router`](crate::Router).
//!
//! Every HTTP method gets its own [`Node`] tree. A tree is a compressed trie over the
//! bytes of the registered routes: each node owns the longest prefix shared by all
//! routes passing through it, and children are dispatched on the first byte of their
//! own prefix. Parameters (`:name`) and catch-alls (`*name`) live in dedicated wildcard
//! nodes, which never share a parent with static nodes.
//!
//! ```rust
//! use radix_router::tree::Node;
//! use radix_router::Tsr;
//!
//! let mut tree = Node::new();
//! tree.insert("/user/get", 1).unwrap();
//! tree.insert("/user/getAll", 2).unwrap();
//! tree.insert("/files/*filepath", 3).unwrap();
//!
//! assert_eq!(*tree.at("/user/getAll").unwrap().value, 2);
//!
//! let matched = tree.at("/files/css/site.css").unwrap();
//! assert_eq!(matched.params.get("filepath"), Some("css/site.css"));
//!
//! assert_eq!(tree.at("/user/get/").unwrap_err(), Tsr::Yes);
//! ```
use crate::error::{InsertError, LookupError, Tsr};
use crate::params::Params;

use std::mem;

use hyper::Method;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Static,
    Root,
    Param,
    CatchAll,
}

/// A node in the radix tree, holding an optional value of type `T`.
///
/// The tree is built during registration through [`Node::insert`] and is only read
/// afterwards, so a `Node<T>` can be shared between request handlers without locking.
#[derive(Debug)]
pub struct Node<T> {
    path: Vec<u8>,
    kind: NodeKind,
    // the last child is a wildcard, and it is the only child
    wild_child: bool,
    // first byte of each child's path, parallel to `children`
    indices: Vec<u8>,
    children: Vec<Node<T>>,
    value: Option<T>,
    full_path: String,
}

/// A value found by [`Node::get_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'n, T> {
    pub value: &'n T,
    /// The route the value was registered with, e.g. `/user/:id`.
    pub full_path: &'n str,
}

/// A value found by [`Node::at`], together with the extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<'n, T> {
    pub value: &'n T,
    pub full_path: &'n str,
    pub params: Params,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            kind: NodeKind::Static,
            wild_child: false,
            indices: Vec::new(),
            children: Vec::new(),
            value: None,
            full_path: String::new(),
        }
    }
}

impl<T> Node<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` for the route `path`.
    ///
    /// The route must begin with `/`. It may contain named parameters (`:name`), which
    /// match a single path segment, and a trailing catch-all (`*name`), which matches
    /// the rest of the path.
    ///
    /// ```rust
    /// use radix_router::tree::Node;
    /// use radix_router::InsertError;
    ///
    /// let mut tree = Node::new();
    /// tree.insert("/user/:id", "user").unwrap();
    ///
    /// assert_eq!(
    ///     tree.insert("/user/:id", "again"),
    ///     Err(InsertError::Duplicate { path: "/user/:id".into() })
    /// );
    /// assert!(matches!(
    ///     tree.insert("/user/new", "new"),
    ///     Err(InsertError::Conflict { .. })
    /// ));
    /// ```
    ///
    /// A failed insertion never changes which paths the tree matches.
    pub fn insert(&mut self, route: impl Into<String>, value: T) -> Result<(), InsertError> {
        let route = route.into();
        if !route.starts_with('/') {
            return Err(InsertError::InvalidPath { path: route });
        }
        validate(route.as_bytes())?;

        let full_path = route.as_str();
        let mut path = route.as_bytes();

        // empty tree
        if self.path.is_empty() && self.children.is_empty() && self.value.is_none() {
            self.full_path = full_path.to_owned();
            self.insert_child(path, full_path, value);
            self.kind = NodeKind::Root;
            return Ok(());
        }

        let mut node = self;

        loop {
            // The common prefix never contains ':' or '*', since static paths don't.
            let common = longest_common_prefix(path, &node.path);

            if common < node.path.len() {
                node.split(common);
            }

            if common == path.len() {
                if node.value.is_some() {
                    return Err(InsertError::Duplicate {
                        path: full_path.to_owned(),
                    });
                }

                node.value = Some(value);
                node.full_path = full_path.to_owned();
                return Ok(());
            }

            path = &path[common..];

            if node.wild_child {
                let last = node.children.len() - 1;
                let wild = &node.children[last];

                if wild.accepts(path) {
                    node = &mut node.children[last];
                    continue;
                }

                return Err(conflict(path, full_path, &wild.full_path));
            }

            let next = path[0];

            if let Some(i) = node.indices.iter().position(|&c| c == next) {
                node = &mut node.children[i];
                continue;
            }

            if next != b':' && next != b'*' {
                node.indices.push(next);
                node.children.push(Node {
                    full_path: full_path.to_owned(),
                    ..Node::default()
                });

                let last = node.children.len() - 1;
                node.children[last].insert_child(path, full_path, value);
                return Ok(());
            }

            // a wildcard can't share its position with static routes
            if let Some(child) = node.children.first() {
                return Err(conflict(path, full_path, &child.full_path));
            }

            node.insert_child(path, full_path, value);
            return Ok(());
        }
    }

    /// Returns the value registered for `path`, pushing any extracted parameters onto
    /// `params` in the order they appear in the route.
    ///
    /// When nothing matches, the error holds a trailing slash recommendation: `Tsr::Yes`
    /// if a value exists for the same path with an extra (or without the) trailing
    /// slash. `params` is left as it was before the call.
    pub fn get_value<'n>(&'n self, path: &str, params: &mut Params) -> Result<Match<'n, T>, Tsr> {
        let len = params.len();
        let found = self.walk(path, params);

        if found.is_err() {
            params.truncate(len);
        }

        found
    }

    /// Like [`get_value`](Node::get_value), collecting the parameters into a new list.
    pub fn at<'n>(&'n self, path: &str) -> Result<Lookup<'n, T>, Tsr> {
        let mut params = Params::new();
        let matched = self.get_value(path, &mut params)?;

        Ok(Lookup {
            value: matched.value,
            full_path: matched.full_path,
            params,
        })
    }

    fn walk<'n>(&'n self, full: &str, params: &mut Params) -> Result<Match<'n, T>, Tsr> {
        let mut node = self;
        let mut path = full.as_bytes();
        // offset of `path` within `full`
        let mut pos = 0;

        loop {
            let prefix = node.path.as_slice();

            if path.len() > prefix.len() && path.starts_with(prefix) {
                path = &path[prefix.len()..];
                pos += prefix.len();

                if !node.wild_child {
                    let next = path[0];
                    if let Some(i) = node.indices.iter().position(|&c| c == next) {
                        node = &node.children[i];
                        continue;
                    }

                    // Nothing found. We can recommend to redirect to the same URL
                    // without a trailing slash if a leaf exists for that path.
                    return Err(Tsr::from(path == b"/" && node.value.is_some()));
                }

                node = &node.children[node.children.len() - 1];

                match node.kind {
                    NodeKind::Param => {
                        let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
                        if end == 0 {
                            return Err(Tsr::No);
                        }

                        params.push(&node.path[1..], &full[pos..pos + end]);

                        if end < path.len() {
                            if let Some(child) = node.children.first() {
                                path = &path[end..];
                                pos += end;
                                node = child;
                                continue;
                            }

                            return Err(Tsr::from(path.len() == end + 1));
                        }

                        if let Some(found) = node.matched() {
                            return Ok(found);
                        }

                        let tsr = node
                            .children
                            .first()
                            .map_or(false, |child| child.is_slash_leaf());
                        return Err(Tsr::from(tsr));
                    }
                    NodeKind::CatchAll => {
                        params.push(&node.path[1..], &full[pos..]);
                        return node.matched().ok_or(Tsr::No);
                    }
                    NodeKind::Static | NodeKind::Root => return Err(Tsr::No),
                }
            }

            if path == prefix {
                if let Some(found) = node.matched() {
                    return Ok(found);
                }

                // a catch-all also matches an empty remainder
                if let Some(catch_all) = node.catch_all_child() {
                    params.push(&catch_all.path[1..], "");
                    return catch_all.matched().ok_or(Tsr::No);
                }

                if path == b"/" && node.kind == NodeKind::Static {
                    return Err(Tsr::Yes);
                }

                // Check if a value for this path plus a trailing slash exists.
                let tsr = node
                    .indices
                    .iter()
                    .position(|&c| c == b'/')
                    .map_or(false, |i| node.children[i].is_slash_leaf());
                return Err(Tsr::from(tsr));
            }

            // Nothing found. We can recommend to redirect to the same URL with an
            // extra trailing slash if a leaf exists for that path.
            let tsr = path == b"/"
                || (prefix.len() == path.len() + 1
                    && prefix[path.len()] == b'/'
                    && &prefix[..path.len()] == path
                    && (node.value.is_some() || node.catch_all_child().is_some()));

            return Err(Tsr::from(tsr));
        }
    }

    /// Makes a case-insensitive lookup of `path` and returns the path as it was
    /// registered, or `None` if nothing matches.
    ///
    /// Only ASCII letters are folded. With `fix_trailing_slash`, a missing or extra
    /// trailing slash is corrected as well.
    ///
    /// ```rust
    /// use radix_router::tree::Node;
    ///
    /// let mut tree = Node::new();
    /// tree.insert("/Users/:name/Profile", ()).unwrap();
    ///
    /// assert_eq!(
    ///     tree.find_case_insensitive_path("/users/Ana/PROFILE/", true),
    ///     Some("/Users/Ana/Profile".to_owned())
    /// );
    /// assert_eq!(tree.find_case_insensitive_path("/users/Ana/PROFILE/", false), None);
    /// ```
    pub fn find_case_insensitive_path(
        &self,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        let mut out = Vec::with_capacity(path.len() + 1);

        if self.find_case_insensitive(path.as_bytes(), &mut out, fix_trailing_slash) {
            String::from_utf8(out).ok()
        } else {
            None
        }
    }

    fn find_case_insensitive(&self, path: &[u8], out: &mut Vec<u8>, fix: bool) -> bool {
        let start = out.len();

        let found = match self.kind {
            NodeKind::CatchAll => {
                out.extend_from_slice(path);
                true
            }
            NodeKind::Param => self.find_param_case_insensitive(path, out, fix),
            NodeKind::Static | NodeKind::Root => self.find_static_case_insensitive(path, out, fix),
        };

        if !found {
            out.truncate(start);
        }

        found
    }

    fn find_param_case_insensitive(&self, path: &[u8], out: &mut Vec<u8>, fix: bool) -> bool {
        let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
        if end == 0 {
            return false;
        }

        out.extend_from_slice(&path[..end]);
        let rest = &path[end..];

        if rest.is_empty() {
            if self.value.is_some() {
                return true;
            }

            if fix && self.children.first().map_or(false, Node::is_slash_leaf) {
                out.push(b'/');
                return true;
            }

            return false;
        }

        if let Some(child) = self.children.first() {
            if child.find_case_insensitive(rest, out, fix) {
                return true;
            }
        }

        fix && rest == b"/" && self.value.is_some()
    }

    fn find_static_case_insensitive(&self, path: &[u8], out: &mut Vec<u8>, fix: bool) -> bool {
        let prefix = self.path.as_slice();

        if path.len() < prefix.len() || !path[..prefix.len()].eq_ignore_ascii_case(prefix) {
            // the path may lack the trailing slash of this leaf
            if fix
                && path.len() + 1 == prefix.len()
                && prefix[path.len()] == b'/'
                && path.eq_ignore_ascii_case(&prefix[..path.len()])
                && (self.value.is_some() || self.catch_all_child().is_some())
            {
                out.extend_from_slice(prefix);
                return true;
            }

            return false;
        }

        out.extend_from_slice(prefix);
        let rest = &path[prefix.len()..];

        if rest.is_empty() {
            if self.value.is_some() || self.catch_all_child().is_some() {
                return true;
            }

            if fix {
                let slash = self.indices.iter().position(|&c| c == b'/');
                if slash.map_or(false, |i| self.children[i].is_slash_leaf()) {
                    out.push(b'/');
                    return true;
                }
            }

            return false;
        }

        if self.wild_child {
            if let Some(wild) = self.children.last() {
                if wild.find_case_insensitive(rest, out, fix) {
                    return true;
                }
            }
        } else {
            for (i, c) in self.indices.iter().enumerate() {
                if c.eq_ignore_ascii_case(&rest[0])
                    && self.children[i].find_case_insensitive(rest, out, fix)
                {
                    return true;
                }
            }
        }

        fix && rest == b"/" && self.value.is_some()
    }

    // Moves everything past `at` into a new static child.
    fn split(&mut self, at: usize) {
        let child = Node {
            path: self.path.split_off(at),
            kind: NodeKind::Static,
            wild_child: self.wild_child,
            indices: mem::take(&mut self.indices),
            children: mem::take(&mut self.children),
            value: self.value.take(),
            full_path: self.full_path.clone(),
        };

        self.indices = vec![child.path[0]];
        self.children = vec![child];
        self.wild_child = false;
    }

    // Builds the chain of nodes for the rest of a route below `self`, which is either
    // fresh or about to receive its first child, a wildcard.
    fn insert_child(&mut self, mut path: &[u8], full_path: &str, value: T) {
        let mut node = self;

        loop {
            let (start, wildcard) = match find_wildcard(path) {
                Some(found) => found,
                None => {
                    node.path = path.to_vec();
                    node.value = Some(value);
                    node.full_path = full_path.to_owned();
                    return;
                }
            };

            if start > 0 {
                node.path = path[..start].to_vec();
                path = &path[start..];
            }

            let kind = if wildcard[0] == b':' {
                NodeKind::Param
            } else {
                NodeKind::CatchAll
            };

            node.wild_child = true;
            node.indices.push(wildcard[0]);
            node.children.push(Node {
                path: wildcard.to_vec(),
                kind,
                full_path: full_path.to_owned(),
                ..Node::default()
            });

            let last = node.children.len() - 1;
            node = &mut node.children[last];
            path = &path[wildcard.len()..];

            if path.is_empty() {
                node.value = Some(value);
                return;
            }

            // the static part following a parameter
            node.indices.push(path[0]);
            node.children.push(Node {
                full_path: full_path.to_owned(),
                ..Node::default()
            });

            node = &mut node.children[0];
        }
    }

    // Whether a route continuing with `path` passes through this wildcard node.
    fn accepts(&self, path: &[u8]) -> bool {
        path.starts_with(&self.path)
            && (path.len() == self.path.len()
                || (self.kind != NodeKind::CatchAll && path[self.path.len()] == b'/'))
    }

    fn matched(&self) -> Option<Match<'_, T>> {
        self.value.as_ref().map(|value| Match {
            value,
            full_path: &self.full_path,
        })
    }

    fn catch_all_child(&self) -> Option<&Node<T>> {
        self.children
            .last()
            .filter(|child| self.wild_child && child.kind == NodeKind::CatchAll)
    }

    // A "/" node that matches on its own, so its parent path plus '/' is routable.
    fn is_slash_leaf(&self) -> bool {
        self.path == b"/" && (self.value.is_some() || self.catch_all_child().is_some())
    }
}

/// The per-method collection of trees, in registration order.
///
/// ```rust
/// use radix_router::tree::MethodTrees;
/// use radix_router::{LookupError, Params, Tsr};
/// use hyper::Method;
///
/// let mut trees = MethodTrees::new();
/// trees.insert(Method::GET, "/x", "get x").unwrap();
///
/// let mut params = Params::new();
/// assert_eq!(*trees.lookup(&Method::GET, "/x", &mut params).unwrap().value, "get x");
/// assert_eq!(
///     trees.lookup(&Method::POST, "/x", &mut params).unwrap_err(),
///     LookupError::MethodNotRegistered
/// );
/// assert_eq!(
///     trees.lookup(&Method::GET, "/x/", &mut params).unwrap_err(),
///     LookupError::NotFound(Tsr::Yes)
/// );
/// ```
#[derive(Debug)]
pub struct MethodTrees<T> {
    trees: Vec<(Method, Node<T>)>,
}

impl<T> Default for MethodTrees<T> {
    fn default() -> Self {
        Self { trees: Vec::new() }
    }
}

impl<T> MethodTrees<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` for `path` in the tree of `method`, creating the tree if this
    /// is the first route for the method.
    ///
    /// Method names must be made of uppercase ASCII letters.
    pub fn insert(
        &mut self,
        method: Method,
        path: impl Into<String>,
        value: T,
    ) -> Result<(), InsertError> {
        if !is_valid_method(method.as_str()) {
            return Err(InsertError::InvalidMethod {
                method: method.to_string(),
            });
        }

        match self.trees.iter_mut().find(|(m, _)| *m == method) {
            Some((_, root)) => root.insert(path, value),
            None => {
                let mut root = Node::new();
                root.insert(path, value)?;
                self.trees.push((method, root));
                Ok(())
            }
        }
    }

    /// Returns the tree registered for `method`.
    pub fn get(&self, method: &Method) -> Option<&Node<T>> {
        self.trees
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, root)| root)
    }

    /// Looks up `path` in the tree of `method`.
    pub fn lookup<'n>(
        &'n self,
        method: &Method,
        path: &str,
        params: &mut Params,
    ) -> Result<Match<'n, T>, LookupError> {
        let root = self.get(method).ok_or(LookupError::MethodNotRegistered)?;
        root.get_value(path, params).map_err(LookupError::NotFound)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, &Node<T>)> {
        self.trees.iter().map(|(method, root)| (method, root))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

fn is_valid_method(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|c| c.is_ascii_uppercase())
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

// Returns the start of the first wildcard in `path` and the wildcard itself, which
// runs up to the next '/' or the end of the path.
fn find_wildcard(path: &[u8]) -> Option<(usize, &[u8])> {
    let start = path.iter().position(|&c| c == b':' || c == b'*')?;
    let end = path[start..]
        .iter()
        .position(|&c| c == b'/')
        .map_or(path.len(), |i| start + i);

    Some((start, &path[start..end]))
}

fn validate(route: &[u8]) -> Result<(), InsertError> {
    let mut offset = 0;

    while let Some((start, wildcard)) = find_wildcard(&route[offset..]) {
        let start = offset + start;

        if wildcard[1..].iter().any(|&c| c == b':' || c == b'*') {
            return Err(InsertError::TooManyParams);
        }

        if wildcard.len() < 2 {
            return Err(InsertError::UnnamedParam);
        }

        if wildcard[0] == b'*'
            && (start + wildcard.len() != route.len() || route[start - 1] != b'/')
        {
            return Err(InsertError::InvalidCatchAll);
        }

        offset = start + wildcard.len();
    }

    Ok(())
}

fn conflict(path: &[u8], full_path: &str, with: &str) -> InsertError {
    let segment = match path.first() {
        Some(b'*') => path,
        _ => {
            let end = path
                .iter()
                .skip(1)
                .position(|&c| c == b'/')
                .map_or(path.len(), |i| i + 1);
            &path[..end]
        }
    };

    InsertError::Conflict {
        segment: String::from_utf8_lossy(segment).into_owned(),
        path: full_path.to_owned(),
        with: with.to_owned(),
    }
}
