// Library crate for integration tests.
// main.rs only wires these modules together.

pub mod audit;
pub mod browser;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod routes;
pub mod scan;
pub mod score;
pub mod server;
pub mod settings;
pub mod state;
