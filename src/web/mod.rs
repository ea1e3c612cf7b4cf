//! Browser form and JSON API over the transaction evaluator

pub mod form;
pub mod render;
pub mod routes;

pub use routes::router;
