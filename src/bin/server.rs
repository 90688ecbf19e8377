use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use sheetcut::config::PackConfig;
use sheetcut::error::PackError;
use sheetcut::solver::Solver;
use sheetcut::types::{Part, Rect, SheetLayout, Solution};
use std::time::Duration;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeRequest {
    stock: Rect,
    parts: Vec<Part>,
    #[serde(default)]
    config: PackConfig,
    /// Milliseconds to spend on randomized restarts; omitted means one
    /// deterministic preset sweep.
    #[serde(default)]
    budget_ms: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeResponse {
    sheets: Vec<SheetLayout>,
    stock: Rect,
    sheet_count: usize,
    utilization: f64,
    unplaced: Vec<UnplacedPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnplacedPart {
    part_id: String,
    reason: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    unplaced: Vec<UnplacedPart>,
}

fn error_response(err: PackError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        PackError::PartTooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PackError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
        PackError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let reason = err.to_string();
    let unplaced = err
        .unplaced_ids()
        .iter()
        .map(|id| UnplacedPart {
            part_id: id.clone(),
            reason: reason.clone(),
        })
        .collect();
    (
        status,
        Json(ErrorResponse {
            error: reason,
            unplaced,
        }),
    )
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, Json<ErrorResponse>)> {
    tracing::info!(
        parts = req.parts.len(),
        stock = %req.stock,
        "POST /optimize"
    );

    let solver = Solver::new(req.stock, req.config.clone(), req.parts);
    let result = match req.budget_ms {
        Some(ms) => solver.solve_with_budget(Duration::from_millis(ms), req.seed.unwrap_or(0)),
        None => solver.solve_best(),
    };
    let solution: Solution = result.map_err(error_response)?;

    Ok(Json(OptimizeResponse {
        sheet_count: solution.sheet_count(),
        utilization: solution.utilization,
        sheets: solution.sheets,
        stock: solution.stock,
        unplaced: Vec::new(),
    }))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
