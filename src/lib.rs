pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod templates;
pub mod types;

pub use error::PaygateError;
pub use router::{PaygateState, paygate_router};
