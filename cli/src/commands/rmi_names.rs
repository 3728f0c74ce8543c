//! `a3s-tag rmi-names` command: drop every name referring to an image.

use a3s_tag_core::StoreConfig;
use clap::Args;

#[derive(Args)]
pub struct RmiNamesArgs {
    /// Image id or id prefix
    pub image: String,
}

pub async fn execute(args: RmiNamesArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;

    // Tags may outlive the image in the graph; fall back to the literal id.
    let image_id = store
        .resolve_name(&args.image)?
        .unwrap_or_else(|| args.image.clone());

    let names = store.by_id()?.remove(&image_id).unwrap_or_default();
    store.delete_all(&image_id)?;

    for name in names {
        println!("Untagged: {name}");
    }
    Ok(())
}
