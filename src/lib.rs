//! ROI Engine library crate.
//!
//! This crate exposes the return-on-investment engine for workplace
//! health software and its API components as reusable modules.
//! External applications may depend on the `roi_engine` crate and call
//! into `engine::calculate` directly or embed the API via
//! `api::build_router`.

pub mod models;
pub mod error;
pub mod config;
pub mod validation;
pub mod pricing;
pub mod engine;
pub mod format;
pub mod report;
pub mod api;
