//! scorecard-core: exam model, share-link codec, and scoring.
//!
//! This crate defines the exam data model, the compact share-link format,
//! and the scoring engine that the rest of scorecard builds on.

pub mod codec;
pub mod config;
pub mod error;
pub mod fragment;
pub mod import;
pub mod lz;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod setup;
