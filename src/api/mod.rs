mod search;

use std::future::Future;

use actix_web::error::QueryPayloadError;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use futures::future::{self, Either};
use serde_json::json;

use crate::lifecycle::{self, Lifecycle, LifecycleError, Phase};
use crate::AppState;
use search::search_products;

/// Serves until `shutdown` resolves, then drains in-flight requests within
/// the configured grace period. A failed `shutdown` future still drains the
/// server but is reported as an error.
pub async fn run_server<S>(
    state: AppState,
    lifecycle: &mut Lifecycle,
    shutdown: S,
) -> crate::Result<()>
where
    S: Future<Output = std::io::Result<()>>,
{
    let listen = state.config.api.listen;
    let grace = state.config.api.shutdown_grace();
    let workers = state.config.api.workers;
    let state = web::Data::new(state);

    let mut server = HttpServer::new({
        let state = state.clone();
        move || {
            App::new()
                .wrap(Logger::default())
                .app_data(state.clone())
                .configure(config_routes)
        }
    })
    .disable_signals()
    // actix's own deadline trails ours so an overrun is reported as a timeout
    .shutdown_timeout(grace.as_secs() + 1);
    if let Some(workers) = workers {
        server = server.workers(workers);
    }
    let server = server.bind(listen)?.run();

    let handle = server.handle();
    let server_task = actix_rt::spawn(server);
    lifecycle.advance(Phase::Serving)?;
    log::info!("Server is running on http://{}", listen);

    let (signal, server_task) = match future::select(server_task, Box::pin(shutdown)).await {
        Either::Left((exited, _)) => {
            lifecycle.advance(Phase::Draining)?;
            lifecycle.advance(Phase::Stopped)?;
            let err = match exited {
                Ok(Ok(())) => LifecycleError::ServerTask("server exited unexpectedly".to_string()),
                Ok(Err(err)) => LifecycleError::Server(err),
                Err(err) => LifecycleError::ServerTask(err.to_string()),
            };
            return Err(err.into());
        }
        Either::Right((signal, server_task)) => (signal, server_task),
    };

    lifecycle.advance(Phase::Draining)?;
    let stop = async move {
        handle.stop(true).await;
        match server_task.await {
            Ok(result) => result.map_err(LifecycleError::from),
            Err(err) => Err(LifecycleError::ServerTask(err.to_string())),
        }
    };
    lifecycle::drain(stop, grace).await?;
    lifecycle.advance(Phase::Stopped)?;
    signal.map_err(LifecycleError::Signal)?;
    log::info!("Server stopped gracefully");
    Ok(())
}

pub fn config_routes(conf: &mut web::ServiceConfig) {
    conf.app_data(web::QueryConfig::default().error_handler(error_handler))
        .service(web::resource("/").route(web::get().to(status)))
        .service(web::resource("/search").route(web::get().to(search_products)));
}

fn error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    crate::error::value_parsing_err(err).into()
}

async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "tantivy_version": tantivy::version_string(),
        "products": state.catalog.len(),
    }))
}
