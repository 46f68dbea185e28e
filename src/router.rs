//! [`Router`](crate::Router) is a lightweight high performance HTTP request router.
//!
//! This router supports variables in the routing pattern and matches against
//! the request method. It also scales well.
//!
//! The router is optimized for high performance and a small memory footprint.
//! It scales well even with very long paths and a large number of routes.
//! A compressing dynamic trie (radix tree) structure is used for efficient matching.
//!
//! The `Router` can be used directly as a service for a hyper server:
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
//!```
//!
//! The registered path, against which the router matches incoming requests, can
//! contain two types of parameters:
//! ```ignore
//!  Syntax    Type
//!  :name     named parameter
//!  *name     catch-all parameter
//! ```
//!
//! Named parameters are dynamic path segments. They match anything until the
//! next '/' or the path end:
//! ```ignore
//!  Path: /blog/:category/:post
//! ```
//!
//!  Requests:
//! ```ignore
//!   /blog/rust/request-routers            match: category="rust", post="request-routers"
//!   /blog/rust/request-routers/           no match, but the router would redirect
//!   /blog/rust/                           no match
//!   /blog/rust/request-routers/comments   no match
//! ```
//!
//! Catch-all parameters match anything until the path end, including further
//! slashes. Since they match anything until the end, catch-all parameters must
//! always be the final path element.
//! ```ignore
//!  Path: /files/*filepath
//! ```
//!
//!  Requests:
//! ```ignore
//!   /files/                             match: filepath=""
//!   /files/LICENSE                      match: filepath="LICENSE"
//!   /files/templates/article.html       match: filepath="templates/article.html"
//!   /files                              no match, but the router would redirect
//! ```
//!
//! The values of parameters are stored in [`Params`](crate::Params), an ordered list
//! of [`Param`](crate::Param)s, each consisting of a key and a value. The list is
//! inserted into the request extensions before the handler is called, together with
//! the [`MatchedPath`].
//!
//! There are two ways to retrieve the value of a parameter:
//!  1) by the name of the parameter
//! ```rust
//!  # use radix_router::Params;
//!  # let params = Params::default();
//!  let user = params.get("user"); // defined by :user or *user
//! ```
//!  2) by the index of the parameter. This way you can also get the name (key)
//! ```rust,no_run
//!  # use radix_router::Params;
//!  # let params = Params::default();
//!  let third_key = &params[2].key;   // the name of the 3rd parameter
//!  let third_value = &params[2].value; // the value of the 3rd parameter
//! ```
use crate::error::{LookupError, Tsr};
use crate::mode::Mode;
use crate::params::Params;
use crate::path::clean;
use crate::tree::{Lookup, MethodTrees};

use std::any::type_name;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{future, ready};
use hyper::header::{self, HeaderValue};
use hyper::service::Service;
use hyper::{Body, Method, Request, Response, StatusCode};

const DEFAULT_404_BODY: &str = "404 page not found";
const DEFAULT_405_BODY: &str = "405 method not allowed";

// The methods registered by `Router::any`.
const ANY_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
    Method::DELETE,
    Method::CONNECT,
    Method::TRACE,
];

/// The route pattern that matched a request, e.g. `/user/:id`.
///
/// Inserted into the request extensions next to the [`Params`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedPath(pub String);

impl MatchedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Router dispatches requests to different handlers via configurable routes.
pub struct Router {
    trees: MethodTrees<Arc<dyn Handler>>,
    redirect_trailing_slash: bool,
    redirect_fixed_path: bool,
    handle_method_not_allowed: bool,
    handle_options: bool,
    global_options: Option<Arc<dyn Handler>>,
    not_found: Option<Arc<dyn Handler>>,
    method_not_allowed: Option<Arc<dyn Handler>>,
    mode: Mode,
}

impl Router {
    /// Insert a value into the router for a specific path at the specified method.
    /// ```rust
    /// use radix_router::Router;
    /// use hyper::{Request, Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .handle("/teapot", Method::GET, |_: Request<Body>| async {
    ///         Ok::<_, hyper::Error>(Response::new(Body::from("I am a teapot!")))
    ///     });
    /// ```
    ///
    /// # Panics
    ///
    /// Registration errors are programming errors, so this panics if the method is not
    /// made of uppercase ASCII letters, if the path does not begin with `/`, is malformed, or
    /// conflicts with a route registered earlier. See [`InsertError`](crate::InsertError).
    pub fn handle<H: Handler + 'static>(self, path: &str, method: Method, handler: H) -> Self {
        self.add_route(path, method, Arc::new(handler), type_name::<H>())
    }

    fn add_route(
        mut self,
        path: &str,
        method: Method,
        handler: Arc<dyn Handler>,
        handler_name: &str,
    ) -> Self {
        if self.mode.is_debug() {
            tracing::debug!("{:<6} {:<25} --> {}", method.as_str(), path, handler_name);
        }

        if let Err(err) = self.trees.insert(method, path, handler) {
            panic!("{}", err);
        }

        self
    }

    /// Lookup allows the manual lookup of handler for a specific method and path.
    /// If the handler is not found, the error tells whether the method has any routes
    /// at all, and whether a redirection to the same path with (or without) a trailing
    /// slash would succeed.
    /// ```rust
    /// use radix_router::{LookupError, Router, Tsr};
    /// use hyper::{Request, Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .get("/home", |_: Request<Body>| async {
    ///         Ok::<_, hyper::Error>(Response::new(Body::from("Welcome!")))
    ///     });
    ///
    /// let res = router.lookup(&Method::GET, "/home").unwrap();
    /// assert!(res.params.is_empty());
    /// assert_eq!(res.full_path, "/home");
    ///
    /// assert_eq!(router.lookup(&Method::GET, "/home/").err(), Some(LookupError::NotFound(Tsr::Yes)));
    /// assert_eq!(router.lookup(&Method::POST, "/home").err(), Some(LookupError::MethodNotRegistered));
    /// ```
    pub fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<Lookup<'_, Arc<dyn Handler>>, LookupError> {
        let mut params = Params::new();
        let found = self.trees.lookup(method, path, &mut params)?;

        Ok(Lookup {
            value: found.value,
            full_path: found.full_path,
            params,
        })
    }

    /// Register a handler for `GET` requests
    pub fn get<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::GET, handler)
    }

    /// Register a handler for `HEAD` requests
    pub fn head<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::HEAD, handler)
    }

    /// Register a handler for `OPTIONS` requests
    pub fn options<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::OPTIONS, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::POST, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::PUT, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::PATCH, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete<H: Handler + 'static>(self, path: &str, handler: H) -> Self {
        self.handle(path, Method::DELETE, handler)
    }

    /// Register one handler for `GET`, `POST`, `PUT`, `PATCH`, `HEAD`, `OPTIONS`,
    /// `DELETE`, `CONNECT` and `TRACE` requests.
    pub fn any<H: Handler + 'static>(mut self, path: &str, handler: H) -> Self {
        let handler: Arc<dyn Handler> = Arc::new(handler);
        for method in ANY_METHODS {
            self = self.add_route(path, method, Arc::clone(&handler), type_name::<H>());
        }
        self
    }

    /// Enables automatic redirection if the current route can't be matched but a
    /// handler for the path with (without) the trailing slash exists.
    /// For example if `/foo/` is requested but a route only exists for `/foo`, the
    /// client is redirected to `/foo` with HTTP status code 301 for `GET` requests
    /// and 308 for all other request methods.
    pub fn redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.redirect_trailing_slash = enabled;
        self
    }

    /// If enabled, the router tries to fix the current request path, if no
    /// handle is registered for it.
    /// First superfluous path elements like `../` or `//` are removed.
    /// Afterwards the router does a case-insensitive lookup of the cleaned path.
    /// If a handle can be found for this route, the router makes a redirection
    /// to the corrected path with status code 301 for `GET` requests and 308 for
    /// all other request methods.
    /// For example `/FOO` and `/..//Foo` could be redirected to `/foo`.
    /// `redirect_trailing_slash` is independent of this option.
    pub fn redirect_fixed_path(mut self, enabled: bool) -> Self {
        self.redirect_fixed_path = enabled;
        self
    }

    /// If enabled, the router checks if another method is allowed for the
    /// current route, if the current request can not be routed.
    /// If this is the case, the request is answered with `MethodNotAllowed`
    /// and HTTP status code 405.
    /// If no other Method is allowed, the request is delegated to the `NotFound`
    /// handler.
    pub fn handle_method_not_allowed(mut self, enabled: bool) -> Self {
        self.handle_method_not_allowed = enabled;
        self
    }

    /// If enabled, the router automatically replies to `OPTIONS` requests.
    /// Custom `OPTIONS` handlers take priority over automatic replies.
    pub fn handle_options(mut self, enabled: bool) -> Self {
        self.handle_options = enabled;
        self
    }

    /// An optional handler that is called on automatic `OPTIONS` requests.
    /// The handler is only called if `handle_options` is true and no `OPTIONS`
    /// handler for the specific path was set.
    pub fn global_options(mut self, handler: impl Handler + 'static) -> Self {
        self.global_options = Some(Arc::new(handler));
        self
    }

    /// Configurable handler which is called when no matching route is
    /// found.
    pub fn not_found(mut self, handler: impl Handler + 'static) -> Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// A configurable handler which is called when a request
    /// cannot be routed and `handle_method_not_allowed` is true.
    pub fn method_not_allowed(mut self, handler: impl Handler + 'static) -> Self {
        self.method_not_allowed = Some(Arc::new(handler));
        self
    }

    /// Sets the [`Mode`]. Routes registered in `Mode::Debug` are logged.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a list of the allowed methods for a specific path
    /// ```rust
    /// use radix_router::Router;
    /// use hyper::{Request, Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .get("/home", |_: Request<Body>| async {
    ///         Ok::<_, hyper::Error>(Response::new(Body::from("Welcome!")))
    ///     })
    ///     .post("/home", |_: Request<Body>| async {
    ///         Ok::<_, hyper::Error>(Response::new(Body::from("Welcome!")))
    ///     });
    ///
    /// let allowed = router.allowed("/home");
    /// assert_eq!(allowed, ["GET", "POST", "OPTIONS"]);
    /// ```
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        let mut allowed = match path {
            "*" => self
                .trees
                .iter()
                .filter(|(method, _)| **method != Method::OPTIONS)
                .map(|(method, _)| method.as_str())
                .collect::<Vec<_>>(),
            _ => self
                .trees
                .iter()
                .filter(|(method, _)| **method != Method::OPTIONS)
                .filter(|(_, root)| root.at(path).is_ok())
                .map(|(method, _)| method.as_str())
                .collect::<Vec<_>>(),
        };

        if !allowed.is_empty() {
            allowed.push(Method::OPTIONS.as_str())
        }

        allowed
    }
}

/// The default configuration: trailing slash and fixed path redirects, automatic
/// `OPTIONS` replies and `405` responses are enabled.
impl Default for Router {
    fn default() -> Self {
        Self {
            trees: MethodTrees::new(),
            redirect_trailing_slash: true,
            redirect_fixed_path: true,
            handle_method_not_allowed: true,
            handle_options: true,
            global_options: None,
            method_not_allowed: None,
            not_found: None,
            mode: Mode::default(),
        }
    }
}

/// Represents a HTTP handler function.
/// This trait is implemented for asynchronous functions that take a `Request` and return a
/// `Result<Response<Body>, hyper::Error>`
/// ```rust
/// # use radix_router::Handler;
/// # use hyper::{Request, Response, Body};
/// async fn hello(_: Request<Body>) -> Result<Response<Body>, hyper::Error> {
///     Ok(Response::new(Body::empty()))
/// }
///
/// let handler: Box<dyn Handler> = Box::new(hello);
/// ```
pub trait Handler: Send + Sync {
    fn handle(
        &self,
        req: Request<Body>,
    ) -> Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>;
}

impl<F, R> Handler for F
where
    F: Fn(Request<Body>) -> R + Send + Sync,
    R: Future<Output = Result<Response<Body>, hyper::Error>> + Send + Sync + 'static,
{
    fn handle(
        &self,
        req: Request<Body>,
    ) -> Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>> {
        Box::pin(self(req))
    }
}

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

#[doc(hidden)]
#[derive(Clone)]
pub struct RouterService(Arc<Router>);

impl RouterService {
    fn new(router: Router) -> Self {
        RouterService(Arc::new(router))
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.0.serve(req)
    }
}

impl Router {
    /// Converts the `Router` into a `Service` which you can serve directly with `Hyper`.
    /// If you have an existing `Service` that you want to incorporate a `Router` into, see
    /// [`Router::serve`](crate::Router::serve).
    /// ```rust,no_run
    /// # use radix_router::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// // Our router...
    /// let router = Router::default();
    ///
    /// // Convert it into a service...
    /// let service = router.into_service();
    ///
    /// // Serve with hyper
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(service)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService(RouterService::new(self))
    }

    /// An asynchronous function from a `Request` to a `Response`. You will generally not need to use
    /// this function directly, and instead use
    /// [`Router::into_service`](crate::Router::into_service). However, it may be useful when
    /// incorporating the router into a larger service.
    /// ```rust,no_run
    /// # use radix_router::Router;
    /// # use hyper::service::{make_service_fn, service_fn};
    /// # use hyper::{Request, Body, Server};
    /// # use std::convert::Infallible;
    /// # use std::sync::Arc;
    ///
    /// # async fn run() {
    /// let router = Arc::new(Router::default());
    ///
    /// let make_svc = make_service_fn(move |_| {
    ///     let router = router.clone();
    ///     async move {
    ///         Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
    ///             let router = router.clone();
    ///             async move { router.serve(req).await }
    ///         }))
    ///     }
    /// });
    ///
    /// let server = Server::bind(&([127, 0, 0, 1], 3000).into())
    ///     .serve(make_svc)
    ///     .await;
    /// # }
    /// ```
    pub fn serve(&self, mut req: Request<Body>) -> ResponseFut {
        let root = self.trees.get(req.method());
        let path = req.uri().path();

        if let Some(root) = root {
            let mut params = Params::new();

            match root.get_value(path, &mut params) {
                Ok(found) => {
                    let matched = MatchedPath(found.full_path.to_owned());
                    req.extensions_mut().insert(params);
                    req.extensions_mut().insert(matched);
                    return ResponseFutKind::Boxed(found.value.handle(req)).into();
                }
                Err(tsr) => {
                    if req.method() != Method::CONNECT && path != "/" {
                        let code = match *req.method() {
                            // Moved Permanently, request with GET method
                            Method::GET => StatusCode::MOVED_PERMANENTLY,
                            // Permanent Redirect, request with same method
                            _ => StatusCode::PERMANENT_REDIRECT,
                        };

                        if tsr == Tsr::Yes && self.redirect_trailing_slash {
                            let fixed = if path.len() > 1 && path.ends_with('/') {
                                path[..path.len() - 1].to_owned()
                            } else {
                                [path, "/"].concat()
                            };

                            if let Some(location) = location(&fixed, req.uri().query()) {
                                tracing::trace!(
                                    from = %path,
                                    to = %fixed,
                                    status = %code,
                                    "redirecting to trailing slash variant"
                                );
                                return ResponseFutKind::Redirect(location, code).into();
                            }
                        }

                        if self.redirect_fixed_path {
                            let fixed = root.find_case_insensitive_path(
                                &clean(path),
                                self.redirect_trailing_slash,
                            );

                            if let Some(fixed) = fixed {
                                if let Some(location) = location(&fixed, req.uri().query()) {
                                    tracing::trace!(
                                        from = %path,
                                        to = %fixed,
                                        status = %code,
                                        "redirecting to fixed path"
                                    );
                                    return ResponseFutKind::Redirect(location, code).into();
                                }
                            }
                        }
                    }
                }
            }
        }

        if req.method() == Method::OPTIONS && self.handle_options {
            let allow = self.allowed(path);

            if !allow.is_empty() {
                return match self.global_options {
                    Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
                    None => ResponseFutKind::Options(allow.join(", ")).into(),
                };
            }
        } else if self.handle_method_not_allowed {
            let allow = self.allowed(path);

            if !allow.is_empty() {
                tracing::trace!(method = %req.method(), path = %path, "method not allowed");
                return match self.method_not_allowed {
                    Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
                    None => ResponseFutKind::MethodNotAllowed(allow.join(", ")).into(),
                };
            }
        }

        tracing::trace!(method = %req.method(), path = %path, "no route matched");

        match self.not_found {
            Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
            None => ResponseFutKind::NotFound.into(),
        }
    }
}

// The `Location` of a redirect, keeping the query string of the request.
fn location(path: &str, query: Option<&str>) -> Option<HeaderValue> {
    let location = match query {
        Some(query) => [path, "?", query].concat(),
        None => path.to_owned(),
    };

    HeaderValue::from_str(&location).ok()
}

pub struct ResponseFut {
    kind: ResponseFutKind,
}

impl From<ResponseFutKind> for ResponseFut {
    fn from(kind: ResponseFutKind) -> Self {
        Self { kind }
    }
}

enum ResponseFutKind {
    Boxed(Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>),
    Redirect(HeaderValue, StatusCode),
    MethodNotAllowed(String),
    Options(String),
    NotFound,
}

impl Future for ResponseFut {
    type Output = hyper::Result<Response<Body>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = match self.kind {
            ResponseFutKind::Boxed(ref mut fut) => ready!(fut.as_mut().poll(cx)),
            ResponseFutKind::Redirect(ref location, code) => {
                let mut res = response(code, Body::empty());
                res.headers_mut().insert(header::LOCATION, location.clone());
                Ok(res)
            }
            ResponseFutKind::NotFound => Ok(plain_text(StatusCode::NOT_FOUND, DEFAULT_404_BODY)),
            ResponseFutKind::Options(ref allowed) => {
                let mut res = response(StatusCode::OK, Body::empty());
                insert_allow(&mut res, allowed);
                Ok(res)
            }
            ResponseFutKind::MethodNotAllowed(ref allowed) => {
                let mut res = plain_text(StatusCode::METHOD_NOT_ALLOWED, DEFAULT_405_BODY);
                insert_allow(&mut res, allowed);
                Ok(res)
            }
        };

        Poll::Ready(ready)
    }
}

fn response(status: StatusCode, body: Body) -> Response<Body> {
    let mut res = Response::new(body);
    *res.status_mut() = status;
    res
}

fn plain_text(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut res = response(status, Body::from(body));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}

// Method names are validated at registration, so the list is always a valid header.
fn insert_allow(res: &mut Response<Body>, allowed: &str) {
    if let Ok(allow) = HeaderValue::from_str(allowed) {
        res.headers_mut().insert(header::ALLOW, allow);
    }
}
