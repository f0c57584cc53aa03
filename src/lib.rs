//! Threadscope - reply-tree analytics for discussion archives
//!
//! A fast, local-first analysis tool that rebuilds the conversation tree
//! behind every submission in a flat comment dump and derives structural
//! metrics from it: size, depth, branch dispersion, participation
//! inequality, activity duration, and controversy.

pub mod classify;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod prep;
pub mod reporters;
pub mod tree;
