pub mod catalog;
pub mod configuration;
pub mod db;
pub mod quiz;
pub mod server;
pub mod telemetry;
