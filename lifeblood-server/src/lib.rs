pub mod config;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod scim;
pub mod state;

pub use routes::app;
