// Service layer: business logic between HTTP routes and storage

mod analytics;
mod applicant;
mod event;
mod session;
mod user;

pub use analytics::AnalyticsService;
pub use applicant::ApplicantService;
pub use event::EventService;
pub use session::SessionService;
pub use user::UserService;

/// Rolling lookback applied to KPI and conversion queries.
pub const ANALYTICS_WINDOW_DAYS: i64 = 30;
