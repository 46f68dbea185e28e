use std::net::SocketAddr;

use radix_router::{Mode, Params, Router};

use hyper::{Body, Request, Response, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn index(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new("Welcome!".into()))
}

async fn hello(req: Request<Body>) -> hyper::Result<Response<Body>> {
    let user = req
        .extensions()
        .get::<Params>()
        .and_then(|params| params.get("user"))
        .unwrap_or("stranger");

    Ok(Response::new(format!("Hello, {}!\n", user).into()))
}

async fn files(req: Request<Body>) -> hyper::Result<Response<Body>> {
    let path = req
        .extensions()
        .get::<Params>()
        .and_then(|params| params.get("filepath"))
        .unwrap_or_default()
        .to_owned();

    Ok(Response::new(format!("serving '{}'\n", path).into()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "radix_router=debug,hello=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mode = Mode::from_env()?;

    let router = Router::default()
        .mode(mode)
        .get("/", index)
        .get("/hello/:user", hello)
        .get("/files/*filepath", files);

    let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();
    tracing::info!(%addr, %mode, "listening");

    Server::bind(&addr).serve(router.into_service()).await?;

    Ok(())
}
