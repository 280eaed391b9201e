//! Integration tests for Mnamky

mod crawl_tests;
