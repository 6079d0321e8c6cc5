pub mod backend_api;
pub mod chips;
pub mod config;
pub mod difficulty;
pub mod fixtures_view;
pub mod fpl_api;
pub mod gw_stats;
pub mod injuries;
pub mod loader;
pub mod market;
pub mod mocks;
pub mod model;
pub mod provider;
pub mod resource;
pub mod sandbox;
pub mod session;
pub mod squad;
pub mod state;
pub mod telemetry;
