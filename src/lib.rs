pub mod batch;
pub mod cli;
pub mod config;
pub mod ctx;
pub mod error;
pub mod input;
pub mod io;
pub mod math;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod tlog;
