pub mod connection;
pub mod dispatcher;
pub mod routes;

pub use routes::router;
