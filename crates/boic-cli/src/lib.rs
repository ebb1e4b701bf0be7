//! # boic-cli
//!
//! Command-line front end for boic jewels: runs ShQL queries, lists shards,
//! resolves jewel paths and shows what the corpus walker visits.

pub mod cli;
pub mod commands;
pub mod output;
