use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::error;

use upfluence_types::api::{DbDiagnostics, EnvDiagnostics};

use crate::state::{AppState, blocking_db};

const PROBE_EMAIL: &str = "sarah@fashionnova.com";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn db_diagnostics(State(state): State<AppState>) -> (StatusCode, Json<DbDiagnostics>) {
    let probe = blocking_db(&state, |db| Ok((db.count_users()?, db.email_exists(PROBE_EMAIL)?))).await;

    match probe {
        Ok((user_count, found)) => (
            StatusCode::OK,
            Json(DbDiagnostics {
                status: "ok".into(),
                database: "connected".into(),
                user_count: Some(user_count),
                test_user: Some(if found { "found" } else { "not found" }.into()),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Database diagnostics failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbDiagnostics {
                    status: "error".into(),
                    database: "disconnected".into(),
                    user_count: None,
                    test_user: None,
                    error: Some("Database check failed".into()),
                }),
            )
        }
    }
}

fn env_is_set(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| !v.trim().is_empty())
}

/// Presence-only view of the configuration. Values are never echoed.
pub async fn env_diagnostics(State(state): State<AppState>) -> Json<EnvDiagnostics> {
    Json(EnvDiagnostics {
        status: "ok".into(),
        environment: state.environment.clone(),
        db_path_set: env_is_set("UPFLUENCE_DB_PATH"),
        jwt_secret_set: env_is_set("UPFLUENCE_JWT_SECRET"),
        static_dir_set: env_is_set("UPFLUENCE_STATIC_DIR"),
    })
}
