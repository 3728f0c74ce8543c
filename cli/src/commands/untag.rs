//! `a3s-tag untag` command: remove a tag or a whole repository.

use a3s_tag_core::StoreConfig;
use a3s_tag_store::{parse_repository_tag, DEFAULT_TAG};
use clap::Args;

#[derive(Args)]
pub struct UntagArgs {
    /// Reference to remove (repository[:tag], tag defaults to "latest")
    pub name: String,

    /// Remove the repository with every tag it holds
    #[arg(short, long)]
    pub all: bool,
}

pub async fn execute(args: UntagArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;

    let (repository, tag) = parse_repository_tag(&args.name);
    if args.all {
        store.delete_tag(repository, "")?;
        println!("Deleted: {repository}");
    } else {
        let tag = tag.unwrap_or(DEFAULT_TAG);
        store.delete_tag(repository, tag)?;
        println!("Untagged: {repository}:{tag}");
    }
    Ok(())
}
