//! Integration tests for Catalog-Crawler
//!
//! Site tasks run against pre-loaded pages; the catalog is either recorded
//! in memory or served by a mock HTTP server.

mod acm_tests;
mod catalog_tests;
mod mdpi_tests;
mod springer_tests;
mod support;
