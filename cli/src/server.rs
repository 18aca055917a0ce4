#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::{rejection::JsonRejection, State},
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use matlite::{Engine, ExecutionResult};
    use serde::Deserialize;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info};

    type SharedEngine = Arc<Engine>;

    #[derive(Debug, Deserialize)]
    struct RunRequest {
        #[serde(default)]
        code: String,
    }

    pub fn router(engine: Engine) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/api/run", post(run_script))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(engine))
    }

    pub async fn start_server(engine: Engine, host: &str, port: u16) -> anyhow::Result<()> {
        let app = router(engine);

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("matlite server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "matlite",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    /// Always answers 200 with a result record; transport failures use the server error shape
    async fn run_script(
        State(engine): State<SharedEngine>,
        payload: Result<Json<RunRequest>, JsonRejection>,
    ) -> Json<ExecutionResult> {
        let request = match payload {
            Ok(Json(request)) => request,
            Err(rejection) => {
                error!("Rejected request body: {}", rejection);
                return Json(ExecutionResult::server_error(
                    "invalid request body",
                    &rejection.body_text(),
                ));
            }
        };

        let result = tokio::task::spawn_blocking(move || engine.run(&request.code)).await;
        match result {
            Ok(result) => {
                info!(
                    success = result.success,
                    plots = result.plots.len(),
                    "Handled run request"
                );
                Json(result)
            }
            Err(join_error) => {
                error!("Run worker failed: {}", join_error);
                Json(ExecutionResult::server_error(
                    "execution worker failed",
                    &join_error.to_string(),
                ))
            }
        }
    }

}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _engine: matlite::Engine,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
