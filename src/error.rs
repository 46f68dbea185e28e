use thiserror::Error;

/// Represents errors that can occur when registering a route.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum InsertError {
    /// Routes must be non-empty and begin with '/'.
    #[error("path must begin with '/' in path '{path}'")]
    InvalidPath { path: String },
    /// Methods must consist of uppercase ASCII letters.
    #[error("http method {method} is not valid")]
    InvalidMethod { method: String },
    /// A value is already registered for the exact route.
    #[error("handlers are already registered for path '{path}'")]
    Duplicate { path: String },
    /// The route conflicts with a wildcard or with static routes at the same position.
    #[error("'{segment}' in new path '{path}' conflicts with existing route '{with}'")]
    Conflict {
        /// The segment of the new route that could not be placed.
        segment: String,
        /// The route being inserted.
        path: String,
        /// A previously registered route occupying that position.
        with: String,
    },
    /// Only one parameter per route segment is allowed.
    #[error("only one wildcard per path segment is allowed")]
    TooManyParams,
    /// Parameters must be registered with a name.
    #[error("wildcards must be named with a non-empty name")]
    UnnamedParam,
    /// Catch-all parameters are only allowed at the end of a route, after a '/'.
    #[error("catch-all routes are only allowed at the end of the path, after a '/'")]
    InvalidCatchAll,
}

/// Trailing slash recommendation attached to a failed match.
///
/// `Tsr::Yes` means no route matched the path, but the same path with an extra (or
/// without the) trailing slash would.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Tsr {
    Yes,
    No,
}

impl From<bool> for Tsr {
    fn from(tsr: bool) -> Self {
        if tsr {
            Tsr::Yes
        } else {
            Tsr::No
        }
    }
}

/// A failed lookup through [`MethodTrees`](crate::tree::MethodTrees).
///
/// The two variants let a dispatcher tell "no route for this method at all" apart from
/// "this method has routes, none of them match", e.g. to choose between 404 and 405.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum LookupError {
    #[error("no routes are registered for the request method")]
    MethodNotRegistered,
    #[error("matching route not found")]
    NotFound(Tsr),
}

impl LookupError {
    /// Returns the trailing slash recommendation, `Tsr::No` when the method has no tree.
    pub fn tsr(&self) -> Tsr {
        match self {
            LookupError::MethodNotRegistered => Tsr::No,
            LookupError::NotFound(tsr) => *tsr,
        }
    }
}
