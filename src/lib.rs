//! Shedyard - marketing site and back office for a shed-building business
//!
//! This library provides the catalog, lead capture, content management and
//! search-engine plumbing behind the site.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
