//! Storage integration tests
//!
//! Both `TreeStore` backends run the same nested-set scenarios.

pub mod nested_set_test;
