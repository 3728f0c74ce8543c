//! A3S Tag CLI - manage repository names and tags of local images.

pub mod commands;
pub mod output;
