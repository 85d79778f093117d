pub mod api;
pub mod backend;
pub mod categories;
pub mod config;
pub mod data_models;
pub mod error;
pub mod highlight;
pub mod orchestrator;
pub mod render;
pub mod session;
pub mod snippet;
