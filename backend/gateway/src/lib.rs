//! HTTP gateway: router, request/response schemas, and handlers for the
//! blueprint analysis and bid generation endpoints.

pub mod error;
pub mod routes;
pub mod schemas;
pub mod server;
pub mod state;

pub use routes::build_router;
pub use server::start_server;
pub use state::AppState;
