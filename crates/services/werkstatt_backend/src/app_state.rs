// --- File: crates/services/werkstatt_backend/src/app_state.rs ---
use std::sync::Arc;
use werkstatt_appointments::{AdminAuthState, AdminQueryService, AppointmentService, AppointmentsState};
use werkstatt_common::RateLimiter;
use werkstatt_gcal::GcalState;

use crate::service_factory::WerkstattServiceFactory;

/// Per-router state, built once from the service factory.
#[derive(Clone)]
pub struct AppState {
    pub gcal: Arc<GcalState>,
    pub appointments: Arc<AppointmentsState>,
    pub admin_auth: Arc<AdminAuthState>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn from_factory(factory: &WerkstattServiceFactory) -> Self {
        let config = factory.config();
        let booking = AppointmentService::new(
            config.clone(),
            factory.calendar(),
            factory.repository(),
            factory.mailer(),
        );
        let admin = AdminQueryService::new(config.clone(), factory.calendar(), factory.repository());

        Self {
            gcal: Arc::new(GcalState {
                calendar: factory.calendar(),
            }),
            appointments: Arc::new(AppointmentsState {
                booking: Arc::new(booking),
                admin: Arc::new(admin),
            }),
            admin_auth: Arc::new(AdminAuthState::from_config(&config)),
            rate_limiter: Arc::new(RateLimiter::from_config(&config)),
        }
    }
}
