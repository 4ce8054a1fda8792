use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{
        sse::{Event, Sse},
        Json,
    },
    routing::{get, post},
    Router,
};
use fleet_core::{ComponentId, EventEnvelope, FleetError, RepairOutcome};
use std::convert::Infallible;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, "http://localhost:5173")
}

pub fn make_router_with_cors(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin.parse::<axum::http::HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(err) => {
            tracing::warn!("invalid CORS origin {cors_origin:?}: {err}; allowing any origin");
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/status", get(status_handler))
        .route("/api/v1/history", get(history_handler))
        .route("/api/v1/stream", get(stream_handler))
        .route("/api/v1/machines", post(add_machine_handler))
        .route("/api/v1/machines/:index/repair", post(repair_handler))
        .route(
            "/api/v1/components/:component_id/maintenance",
            post(maintenance_handler),
        )
        .route("/api/v1/pause", post(pause_handler))
        .route("/api/v1/resume", post(resume_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    let paused = app_state.paused.load(Ordering::Relaxed);
    Json(serde_json::json!({
        "tick": sim.environment.meta.tick,
        "seed": sim.environment.meta.seed,
        "content_version": sim.environment.meta.content_version,
        "machines": sim.environment.machines().len(),
        "tick_interval_secs": app_state.tick_interval.as_secs_f64(),
        "paused": paused,
    }))
}

pub async fn status_handler(
    State(app_state): State<AppState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let snapshot = app_state.sim.lock().environment.snapshot();
    match serde_json::to_string(&snapshot) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            json,
        ),
        Err(err) => {
            tracing::error!("status serialization failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"serialization failed"}"#.to_string(),
            )
        }
    }
}

pub async fn history_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    Json(serde_json::json!({
        "history": sim.environment.failure_history(),
        "total_cost": sim.environment.total_repair_cost(),
    }))
}

pub async fn maintenance_handler(
    State(app_state): State<AppState>,
    Path(component_id): Path<String>,
) -> Json<serde_json::Value> {
    let component_id = ComponentId(component_id);
    let result = app_state.sim.lock().preventive_maintenance(&component_id);
    match result {
        Ok(report) => {
            tracing::info!(
                component = %report.component_id,
                before = report.lifespan_before,
                after = report.lifespan_after,
                "preventive maintenance performed"
            );
            Json(serde_json::json!({
                "success": true,
                "message": "Preventive maintenance performed",
                "lifespan": report.lifespan_after,
            }))
        }
        Err(err) => Json(serde_json::json!({
            "success": false,
            "message": err.to_string(),
        })),
    }
}

pub async fn repair_handler(
    State(app_state): State<AppState>,
    Path(index): Path<usize>,
) -> (StatusCode, Json<serde_json::Value>) {
    let result = app_state.sim.lock().repair_machine(index);
    match result {
        Ok(RepairOutcome::Repaired {
            machine_id,
            components,
        }) => {
            tracing::info!(machine = %machine_id, repaired = components.len(), "machine repaired");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "machine_id": machine_id,
                    "repaired": components,
                })),
            )
        }
        Ok(RepairOutcome::AlreadyOperational { machine_id }) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "machine_id": machine_id,
                "repaired": [],
            })),
        ),
        Err(err @ FleetError::MachineNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"success": false, "error": err.to_string()})),
        ),
        Err(err) => {
            tracing::error!("repair failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"success": false, "error": err.to_string()})),
            )
        }
    }
}

pub async fn add_machine_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let machine_id = app_state.sim.lock().add_machine();
    tracing::info!(machine = %machine_id, "machine added");
    Json(serde_json::json!({"success": true, "machine_id": machine_id}))
}

pub async fn pause_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    app_state.paused.store(true, Ordering::Relaxed);
    Json(serde_json::json!({"paused": true}))
}

pub async fn resume_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    app_state.paused.store(false, Ordering::Relaxed);
    Json(serde_json::json!({"paused": false}))
}

pub async fn stream_handler(
    State(app_state): State<AppState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = app_state.event_tx.subscribe();
    let sim = app_state.sim.clone();

    let stream = async_stream::stream! {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(5));
        heartbeat.tick().await; // discard the immediate first tick
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(events) if !events.is_empty() => {
                            match serde_json::to_string::<Vec<EventEnvelope>>(&events) {
                                Ok(data) => {
                                    yield Ok(Event::default().data(data));
                                }
                                Err(err) => tracing::error!("event serialization failed: {err}"),
                            }
                        }
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = heartbeat.tick() => {
                    let tick = sim.lock().environment.meta.tick;
                    let hb = serde_json::json!({"heartbeat": true, "tick": tick});
                    yield Ok(Event::default().data(hb.to_string()));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
