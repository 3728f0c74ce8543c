//! CLI command definitions and dispatch.

mod digest;
mod images;
mod lookup;
mod manifest;
mod names;
mod rmi_names;
mod tag;
mod untag;

use std::path::PathBuf;

use a3s_tag_core::StoreConfig;
use a3s_tag_store::TagStore;
use clap::{Args, Parser, Subcommand};

/// A3S Tag: manage repository names and tags of locally stored images.
#[derive(Parser)]
#[command(name = "a3s-tag", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Store root directory (default: ~/.a3s/tags)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Build the effective store configuration: file first, then `--root`.
    pub fn load_config(&self) -> a3s_tag_core::Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::from_file(path)?,
            None => StoreConfig::default(),
        };
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        Ok(config)
    }
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Point a repository tag at an existing image
    Tag(tag::TagArgs),
    /// Remove a tag, or a whole repository
    Untag(untag::UntagArgs),
    /// Resolve a name, tag, digest or id prefix to an image
    Lookup(lookup::LookupArgs),
    /// List tagged images
    Images(images::ImagesArgs),
    /// Record an immutable digest for an image in a repository
    Digest(digest::DigestArgs),
    /// Show every name that refers to an image
    Names(names::NamesArgs),
    /// Remove every tag that refers to an image
    RmiNames(rmi_names::RmiNamesArgs),
    /// Print a manifest file, or its content digest
    Manifest(manifest::ManifestArgs),
}

/// Open the tag store described by `config`.
pub(crate) fn open_store(config: &StoreConfig) -> Result<TagStore, Box<dyn std::error::Error>> {
    let store = TagStore::from_config(config)?;
    tracing::debug!(path = %store.path().display(), "Opened tag store");
    Ok(store)
}

/// Dispatch a parsed command to the appropriate handler.
pub async fn dispatch(
    command: Command,
    config: &StoreConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Tag(args) => tag::execute(args, config).await,
        Command::Untag(args) => untag::execute(args, config).await,
        Command::Lookup(args) => lookup::execute(args, config).await,
        Command::Images(args) => images::execute(args, config).await,
        Command::Digest(args) => digest::execute(args, config).await,
        Command::Names(args) => names::execute(args, config).await,
        Command::RmiNames(args) => rmi_names::execute(args, config).await,
        Command::Manifest(args) => manifest::execute(args).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use a3s_tag_core::StoreConfig;
    use tempfile::TempDir;

    /// Config rooted in a fresh temp dir with the given images present in
    /// the graph directory.
    pub fn config_with_images(ids: &[&str]) -> (TempDir, StoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::with_root(dir.path());
        for id in ids {
            std::fs::create_dir_all(config.graph_path().join(id)).unwrap();
        }
        (dir, config)
    }
}
