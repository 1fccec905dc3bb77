use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::shared::config;
use crate::{handlers, system};

/// Multipart framing on top of the file itself
const UPLOAD_OVERHEAD_BYTES: u64 = 64 * 1024;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Routes reachable without a token
fn public_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(system::handlers::auth::login))
        .route("/auth/login-json", post(system::handlers::auth::login))
        .route("/auth/register", post(system::handlers::auth::register))
        .route("/auth/refresh", post(system::handlers::auth::refresh))
}

/// Routes behind `require_auth`; role checks happen in the handlers.
fn protected_routes() -> Router {
    let upload_limit =
        (config::get().uploads.max_size_bytes + UPLOAD_OVERHEAD_BYTES) as usize;

    Router::new()
        // ========================================
        // AUTH & USERS
        // ========================================
        .route("/auth/logout", post(system::handlers::auth::logout))
        .route("/auth/me", get(system::handlers::auth::current_user))
        .route(
            "/auth/change-password",
            post(system::handlers::auth::change_password),
        )
        .route("/users", get(system::handlers::users::list))
        .route("/users/technicians", get(system::handlers::users::technicians))
        .route(
            "/users/:id",
            get(system::handlers::users::get_by_id).put(system::handlers::users::update),
        )
        // ========================================
        // PLANT STRUCTURE
        // ========================================
        .route(
            "/sites",
            get(handlers::a001_site::list).post(handlers::a001_site::create),
        )
        .route(
            "/sites/:id",
            get(handlers::a001_site::get_by_id)
                .put(handlers::a001_site::update)
                .delete(handlers::a001_site::delete),
        )
        .route(
            "/production-lines",
            get(handlers::a002_production_line::list).post(handlers::a002_production_line::create),
        )
        .route(
            "/production-lines/:id",
            get(handlers::a002_production_line::get_by_id)
                .put(handlers::a002_production_line::update)
                .delete(handlers::a002_production_line::delete),
        )
        .route(
            "/equipment",
            get(handlers::a003_equipment::list).post(handlers::a003_equipment::create),
        )
        .route("/equipment/stats/summary", get(handlers::a003_equipment::stats))
        .route(
            "/equipment/:id",
            get(handlers::a003_equipment::get_by_id)
                .put(handlers::a003_equipment::update)
                .delete(handlers::a003_equipment::delete),
        )
        .route(
            "/equipment/:id/attachments",
            get(system::handlers::uploads::list_for_equipment),
        )
        // ========================================
        // MAINTENANCE PLANS
        // ========================================
        .route(
            "/maintenance/plans",
            get(handlers::a004_maintenance_plan::list).post(handlers::a004_maintenance_plan::create),
        )
        .route(
            "/maintenance/plans/:id",
            get(handlers::a004_maintenance_plan::get_by_id)
                .put(handlers::a004_maintenance_plan::update)
                .delete(handlers::a004_maintenance_plan::delete),
        )
        .route(
            "/maintenance/plans/:id/activate",
            post(handlers::a004_maintenance_plan::activate),
        )
        .route(
            "/maintenance/plans/:id/deactivate",
            post(handlers::a004_maintenance_plan::deactivate),
        )
        .route(
            "/maintenance/plans/:id/generate",
            post(handlers::a004_maintenance_plan::generate),
        )
        .route(
            "/maintenance/plans/:id/tasks",
            get(handlers::a004_maintenance_plan::list_tasks)
                .post(handlers::a004_maintenance_plan::add_task),
        )
        .route(
            "/maintenance/plans/:id/tasks/reorder",
            post(handlers::a004_maintenance_plan::reorder_tasks),
        )
        .route(
            "/maintenance/plans/:id/tasks/:task_id",
            put(handlers::a004_maintenance_plan::update_task)
                .delete(handlers::a004_maintenance_plan::delete_task),
        )
        // ========================================
        // SCHEDULED MAINTENANCES
        // ========================================
        .route(
            "/maintenance/scheduled",
            get(handlers::a005_scheduled_maintenance::list)
                .post(handlers::a005_scheduled_maintenance::create),
        )
        .route(
            "/maintenance/scheduled/reschedule",
            post(handlers::a005_scheduled_maintenance::reschedule),
        )
        .route(
            "/maintenance/scheduled/:id",
            get(handlers::a005_scheduled_maintenance::get_by_id)
                .put(handlers::a005_scheduled_maintenance::update)
                .delete(handlers::a005_scheduled_maintenance::delete),
        )
        .route(
            "/maintenance/scheduled/:id/assign",
            post(handlers::a005_scheduled_maintenance::assign),
        )
        .route(
            "/maintenance/upcoming",
            get(handlers::a005_scheduled_maintenance::upcoming),
        )
        .route(
            "/maintenance/overdue",
            get(handlers::a005_scheduled_maintenance::overdue),
        )
        // ========================================
        // INTERVENTIONS
        // ========================================
        .route(
            "/maintenance/interventions",
            get(handlers::a006_intervention::list).post(handlers::a006_intervention::create),
        )
        .route(
            "/maintenance/interventions/:id",
            get(handlers::a006_intervention::get_by_id)
                .put(handlers::a006_intervention::update)
                .delete(handlers::a006_intervention::delete),
        )
        .route(
            "/maintenance/interventions/:id/assign",
            post(handlers::a006_intervention::assign),
        )
        .route(
            "/maintenance/interventions/:id/start",
            post(handlers::a006_intervention::start),
        )
        .route(
            "/maintenance/interventions/:id/complete",
            post(handlers::a006_intervention::complete),
        )
        .route(
            "/maintenance/interventions/:id/validate",
            post(handlers::a006_intervention::validate),
        )
        .route(
            "/maintenance/interventions/:id/reject",
            post(handlers::a006_intervention::reject),
        )
        .route(
            "/maintenance/interventions/:id/tasks/:task_id",
            put(handlers::a006_intervention::update_task),
        )
        // ========================================
        // CALENDAR, STATS, DASHBOARD
        // ========================================
        .route("/maintenance/calendar", get(handlers::d100_maintenance_stats::calendar))
        .route(
            "/maintenance/calendar/move",
            post(handlers::d100_maintenance_stats::move_event),
        )
        .route("/maintenance/stats", get(handlers::d100_maintenance_stats::stats))
        .route("/dashboard", get(handlers::d101_role_dashboard::get_dashboard))
        // ========================================
        // UPLOADS & SYSTEM
        // ========================================
        .route(
            "/uploads",
            post(system::handlers::uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/uploads/:id",
            axum::routing::delete(system::handlers::uploads::delete),
        )
        .route("/system/testdata", post(system::handlers::system::insert_test_data))
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth))
}

fn api_routes() -> Router {
    public_routes().merge(protected_routes())
}

/// Every API route, mounted under `/api` and mirrored under `/api/v1`
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .nest("/api/v1", api_routes())
}
