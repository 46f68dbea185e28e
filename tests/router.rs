use radix_router::{MatchedPath, Mode, Params, Router};

use hyper::header::{ALLOW, CONTENT_TYPE, LOCATION};
use hyper::{Body, Client, Method, Request, Response, Server, StatusCode};

async fn send(router: &Router, method: Method, uri: &str) -> Response<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    router.serve(req).await.unwrap()
}

async fn body(res: Response<Body>) -> String {
    let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn echo(req: Request<Body>) -> hyper::Result<Response<Body>> {
    let params = req.extensions().get::<Params>().unwrap();
    let matched = req.extensions().get::<MatchedPath>().unwrap();

    let params = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    Ok(Response::new(Body::from(format!(
        "{} {}",
        matched.as_str(),
        params
    ))))
}

async fn ok(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("ok")))
}

#[tokio::test]
async fn params_and_matched_path() {
    let router = Router::default()
        .get("/user/:name", echo)
        .get("/src/*filepath", echo);

    let res = send(&router, Method::GET, "/user/gordon").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, "/user/:name name=gordon");

    let res = send(&router, Method::GET, "/src/a/b/c.txt").await;
    assert_eq!(body(res).await, "/src/*filepath filepath=a/b/c.txt");
}

#[tokio::test]
async fn trailing_slash_redirect() {
    let router = Router::default().get("/foo", ok).post("/bar/", ok);

    let res = send(&router, Method::GET, "/foo/").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/foo");

    let res = send(&router, Method::POST, "/bar").await;
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()[LOCATION], "/bar/");

    let res = send(&router, Method::GET, "/foo/?page=2").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/foo?page=2");
}

#[tokio::test]
async fn trailing_slash_redirect_disabled() {
    let router = Router::default()
        .redirect_trailing_slash(false)
        .get("/foo", ok);

    let res = send(&router, Method::GET, "/foo/").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fixed_path_redirect() {
    let router = Router::default().get("/foo", ok).get("/bar", ok);

    let res = send(&router, Method::GET, "/Foo/../BAR").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/bar");

    let res = send(&router, Method::GET, "//FOO/").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/foo");

    let router = Router::default().redirect_fixed_path(false).get("/foo", ok);

    let res = send(&router, Method::GET, "/FOO").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_path_is_never_redirected() {
    let router = Router::default().get("/foo", ok);

    let res = send(&router, Method::GET, "/").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn method_not_allowed() {
    let router = Router::default().get("/x", ok).delete("/x", ok);

    let res = send(&router, Method::POST, "/x").await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[ALLOW], "GET, DELETE, OPTIONS");
    assert_eq!(body(res).await, "405 method not allowed");

    let router = Router::default()
        .get("/x", ok)
        .method_not_allowed(|_: Request<Body>| async {
            let mut res = Response::new(Body::from("custom"));
            *res.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
            Ok::<_, hyper::Error>(res)
        });

    let res = send(&router, Method::PUT, "/x").await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body(res).await, "custom");

    let router = Router::default()
        .handle_method_not_allowed(false)
        .get("/x", ok);

    let res = send(&router, Method::POST, "/x").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn automatic_options() {
    let router = Router::default().get("/x", ok).post("/x", ok);

    let res = send(&router, Method::OPTIONS, "/x").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[ALLOW], "GET, POST, OPTIONS");

    let res = send(&router, Method::OPTIONS, "/y").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let router = Router::default()
        .get("/x", ok)
        .global_options(|_: Request<Body>| async {
            let mut res = Response::new(Body::empty());
            *res.status_mut() = StatusCode::NO_CONTENT;
            Ok::<_, hyper::Error>(res)
        });

    let res = send(&router, Method::OPTIONS, "/x").await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let router = Router::default()
        .get("/x", ok)
        .options("/x", |_: Request<Body>| async {
            Ok::<_, hyper::Error>(Response::new(Body::from("explicit")))
        });

    let res = send(&router, Method::OPTIONS, "/x").await;
    assert_eq!(body(res).await, "explicit");
}

#[tokio::test]
async fn not_found() {
    let router = Router::default().get("/x", ok);

    let res = send(&router, Method::GET, "/nope").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(body(res).await, "404 page not found");

    let router = Router::default()
        .get("/x", ok)
        .not_found(|_: Request<Body>| async {
            let mut res = Response::new(Body::from("gone fishing"));
            *res.status_mut() = StatusCode::NOT_FOUND;
            Ok::<_, hyper::Error>(res)
        });

    let res = send(&router, Method::GET, "/nope").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(res).await, "gone fishing");
}

#[tokio::test]
async fn method_isolation() {
    let router = Router::default()
        .get("/x", |_: Request<Body>| async {
            Ok::<_, hyper::Error>(Response::new(Body::from("get")))
        })
        .post("/x", |_: Request<Body>| async {
            Ok::<_, hyper::Error>(Response::new(Body::from("post")))
        });

    assert_eq!(body(send(&router, Method::GET, "/x").await).await, "get");
    assert_eq!(body(send(&router, Method::POST, "/x").await).await, "post");
}

#[tokio::test]
async fn any_registers_every_method() {
    let router = Router::default().any("/any", ok);

    for method in [Method::GET, Method::DELETE, Method::TRACE, Method::OPTIONS] {
        let res = send(&router, method.clone(), "/any").await;
        assert_eq!(res.status(), StatusCode::OK, "{}", method);
    }

    assert_eq!(
        router.allowed("/any"),
        ["GET", "POST", "PUT", "PATCH", "HEAD", "DELETE", "CONNECT", "TRACE", "OPTIONS"]
    );
}

#[test]
fn allowed_methods() {
    let router = Router::default()
        .get("/a", ok)
        .post("/b", ok)
        .options("/a", ok);

    assert_eq!(router.allowed("/a"), ["GET", "OPTIONS"]);
    assert_eq!(router.allowed("/b"), ["POST", "OPTIONS"]);
    assert_eq!(router.allowed("*"), ["GET", "POST", "OPTIONS"]);
    assert!(router.allowed("/c").is_empty());
}

#[test]
fn release_mode() {
    let router = Router::default().mode(Mode::Release).get("/quiet", ok);
    assert!(router.lookup(&Method::GET, "/quiet").is_ok());
}

#[test]
#[should_panic(expected = "conflicts with existing route")]
fn conflicting_route_panics() {
    let _ = Router::default().get("/user/:id", ok).get("/user/new", ok);
}

#[test]
#[should_panic(expected = "already registered")]
fn duplicate_route_panics() {
    let _ = Router::default().get("/user", ok).get("/user", ok);
}

#[test]
#[should_panic(expected = "is not valid")]
fn invalid_method_panics() {
    let method = Method::from_bytes(b"m-search").unwrap();
    let _ = Router::default().handle("/", method, ok);
}

#[tokio::test]
async fn serves_over_http() {
    let router = Router::default().get("/hello/:user", |req: Request<Body>| async move {
        let params = req.extensions().get::<Params>().unwrap();
        let greeting = format!("Hello, {}", params.get("user").unwrap());
        Ok::<_, hyper::Error>(Response::new(Body::from(greeting)))
    });

    let server = Server::try_bind(&([127, 0, 0, 1], 0).into())
        .unwrap()
        .serve(router.into_service());
    let addr = server.local_addr();
    tokio::spawn(server);

    let client = Client::new();

    let uri = format!("http://{}/hello/ferris", addr).parse().unwrap();
    let res = client.get(uri).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, "Hello, ferris");

    let uri = format!("http://{}/hello/ferris/", addr).parse().unwrap();
    let res = client.get(uri).await.unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/hello/ferris");
}
