//! `a3s-tag lookup` command: resolve a reference to image metadata.

use a3s_tag_core::StoreConfig;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct LookupArgs {
    /// Name to resolve (repository[:tag], repository@digest, or image id prefix)
    pub name: String,

    /// Print only the image id
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn execute(args: LookupArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;

    let image = store
        .lookup_image(&args.name)?
        .ok_or_else(|| format!("No such image: {}", args.name))?;

    if args.quiet {
        println!("{}", image.id);
    } else {
        println!("{}", output::to_pretty_json(&image)?);
    }
    Ok(())
}
