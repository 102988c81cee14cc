//! Storefront backend: vendor stores and catalogs exposed for public browsing,
//! with HTTP revalidation on the public read surface.

pub mod application;
pub mod config;
pub mod domain;
pub mod freshness;
pub mod infra;
