//! # radix-router
//!
//! A lightweight HTTP request router for hyper, built on a compressing radix tree.
//!
//! Routes are matched against the request method and the request path. Each method gets
//! its own tree, so the routing of different methods is independent from each other.
//!
//! ## Features
//!
//! **Only explicit matches:** A request can only match exactly one or no route. There are
//! no pattern priority rules, and no unintended matches.
//!
//! **Path auto-correction:** Besides detecting the missing or additional trailing slash at
//! no extra cost, the router can also fix wrong cases and remove superfluous path elements
//! (like `../` or `//`), and redirect the client to the corrected URL.
//!
//! **Parameters in your routing pattern:** Give a path segment a name and the router
//! delivers the dynamic value to you through the request extensions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use radix_router::{Router, Params};
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn hello(req: Request<Body>) -> Result<Response<Body>, Error> {
//!     let params = req.extensions().get::<Params>().unwrap();
//!     Ok(Response::new(format!("Hello, {}", params.get("user").unwrap()).into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::default()
//!         .get("/", index)
//!         .get("/hello/:user", hello);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await;
//! }
//! ```
//!
//! ### Named parameters
//!
//! `:user` is a *named parameter*. The values are accessible via
//! `req.extensions().get::<Params>()`. Named parameters only match a single, non-empty
//! path segment:
//!
//! ```ignore
//! Pattern: /user/:user
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! **Note:** Since this router has only explicit matches, you can not register static
//! routes and parameters for the same path segment. For example you can not register the
//! patterns `/user/new` and `/user/:user` for the same request method at the same time.
//!
//! ### Catch-All parameters
//!
//! Catch-all parameters have the form `*name` and match everything, so they must always
//! be at the **end** of the pattern:
//!
//! ```ignore
//! Pattern: /src/*filepath
//!
//!  /src/                     match
//!  /src/somefile.go          match
//!  /src/subdir/somefile.go   match
//! ```
//!
//! ## Automatic OPTIONS responses and CORS
//!
//! Automatic responses to OPTIONS requests can be customized with
//! [`Router::global_options`], e.g. to support CORS preflight requests:
//!
//! ```rust
//! use radix_router::Router;
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn global_options(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::builder()
//!         .header("Access-Control-Allow-Methods", "Allow")
//!         .header("Access-Control-Allow-Origin", "*")
//!         .body(Body::empty())
//!         .unwrap())
//! }
//!
//! let router = Router::default().global_options(global_options);
//! ```
//!
//! ### Not Found Handler
//!
//! Requests which could not be matched are passed to [`Router::not_found`], if set:
//!
//! ```rust
//! use radix_router::Router;
//! use hyper::{Request, Response, Body, StatusCode};
//!
//! let router = Router::default().not_found(|_: Request<Body>| async {
//!     let mut res = Response::new(Body::from("nothing here"));
//!     *res.status_mut() = StatusCode::NOT_FOUND;
//!     Ok::<_, hyper::Error>(res)
//! });
//! ```
//!
//! ### Logging
//!
//! The router logs through [`tracing`](https://docs.rs/tracing). In [`Mode::Debug`], the
//! default, every registered route is logged at the `debug` level. Install a subscriber
//! to see the output.

#![forbid(unsafe_code)]

mod error;
mod mode;
mod params;
pub mod path;

#[doc(hidden)]
pub mod router;

pub mod tree;

#[doc(inline)]
pub use error::{InsertError, LookupError, Tsr};

#[doc(inline)]
pub use mode::{Mode, ParseModeError};

#[doc(inline)]
pub use params::{Param, Params, ParamsIter};

#[doc(inline)]
pub use router::{Handler, MatchedPath, Router};

// test the code examples in README.md
#[cfg(doctest)]
mod test_readme {
    macro_rules! doc_comment {
        ($x:expr) => {
            #[doc = $x]
            extern "C" {}
        };
    }

    doc_comment!(include_str!("../README.md"));
}
