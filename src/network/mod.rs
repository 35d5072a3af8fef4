pub mod api_error;
pub mod routes;
pub mod server;
pub mod upload;

pub use api_error::ApiError;
pub use routes::{AppState, router};
pub use server::Server;
