//! `a3s-tag tag` command: point a repository tag at an existing image.

use a3s_tag_core::StoreConfig;
use a3s_tag_store::parse_repository_tag;
use clap::Args;

#[derive(Args)]
pub struct TagArgs {
    /// Source image (id, id prefix, or existing name[:tag])
    pub source: String,

    /// Target reference (repository[:tag], tag defaults to "latest")
    pub target: String,

    /// Move the tag if it already points at another image
    #[arg(short, long)]
    pub force: bool,
}

pub async fn execute(args: TagArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.target.contains('@') {
        return Err(format!(
            "refusing to create a tag with a digest reference: {}",
            args.target
        )
        .into());
    }

    let store = super::open_store(config)?;

    let (repository, tag) = parse_repository_tag(&args.target);
    store.set_tag(repository, tag.unwrap_or(""), &args.source, args.force)?;

    println!("{}", args.target);
    Ok(())
}
