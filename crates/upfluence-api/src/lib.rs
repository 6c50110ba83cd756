pub mod auth;
pub mod campaigns;
pub mod dashboard;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod messages;
pub mod middleware;
pub mod password;
pub mod profile;
pub mod router;
pub mod routes;
pub mod search;
pub mod seed;
pub mod session;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::app_router;
pub use state::{AppState, AppStateInner};
