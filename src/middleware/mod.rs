// Middleware module - logging and metrics

pub mod metrics;
pub mod request_logger;

pub use metrics::metrics_middleware;
pub use request_logger::{current_request_id, request_logger_middleware, REQUEST_ID_HEADER};
