pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod service;
pub mod state;
pub mod store;
