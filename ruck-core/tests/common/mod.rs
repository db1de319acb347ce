//! Shared test utilities for ruck-core integration harnesses.
//!
//! Import via `mod common;` at the top of each harness file. Not every
//! harness uses every helper.
#![allow(dead_code)]

pub mod fake_upstream;

pub use fake_upstream::FakeUpstream;
