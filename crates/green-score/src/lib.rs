pub mod config;
pub mod consumption;
pub mod error;
pub mod estimator;
pub mod storage;
pub mod telemetry;
