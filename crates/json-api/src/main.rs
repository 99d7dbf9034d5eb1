//! Pricedrop JSON API Server

use std::process::ExitCode;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use pricedrop_app::context::AppContext;

use crate::{config::ServerConfig, state::State};

mod auth;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod sales;
mod scheduler;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Pricedrop JSON API Server entry point
#[tokio::main]
pub async fn main() -> ExitCode {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(source) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging not initialized yet, must use eprintln for config errors"
            )]
            {
                eprintln!("Configuration error: {source}");
            }

            return ExitCode::FAILURE;
        }
    };

    if let Err(source) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "the subscriber failed to install, nothing else can report this"
        )]
        {
            eprintln!("failed to initialise logging: {source}");
        }

        return ExitCode::FAILURE;
    }

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        config.catalog.catalog_config(),
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            return ExitCode::FAILURE;
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(router::app_router());

    let doc = OpenApi::new("Pricedrop API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    ExitCode::SUCCESS
}
