//! `a3s-tag digest` command: record an immutable digest for an image.

use a3s_tag_core::StoreConfig;
use clap::Args;

#[derive(Args)]
pub struct DigestArgs {
    /// Repository name
    pub repository: String,

    /// Content digest (e.g. sha256:<hex>)
    pub digest: String,

    /// Image the digest refers to (id, id prefix, or name[:tag])
    pub image: String,
}

pub async fn execute(args: DigestArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;

    let image = store
        .lookup_image(&args.image)?
        .ok_or_else(|| format!("No such image: {}", args.image))?;
    store.set_digest(&args.digest, &image.id, &args.repository)?;

    println!("{}@{}", args.repository, args.digest);
    Ok(())
}
