// --- File: crates/services/werkstatt_backend/src/app.rs ---
use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use werkstatt_common::rate_limit_middleware;

use crate::app_state::AppState;

/// The full application: liveness at `/`, the API under `/api`.
pub fn build_router(state: &AppState) -> Router {
    let api_router = Router::new()
        .merge(werkstatt_gcal::routes::routes(state.gcal.clone()))
        .merge(werkstatt_appointments::routes(
            state.appointments.clone(),
            state.admin_auth.clone(),
        ))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    #[allow(unused_mut)] // only the openapi feature adds routes
    let mut app = werkstatt_common::routes().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;
    use werkstatt_appointments::doc::AppointmentsApiDoc;
    use werkstatt_gcal::doc::GcalApiDoc;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Werkstatt API",
            version = "0.1.0",
            description = "Appointment booking and administration for the workshop"
        ),
        servers((url = "/api", description = "Main API prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(AppointmentsApiDoc::openapi());
    openapi_doc.merge(GcalApiDoc::openapi());
    tracing::info!("Swagger UI at /api/docs");

    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
