//! `a3s-tag names` command: list every name referring to an image.

use a3s_tag_core::StoreConfig;
use clap::Args;

#[derive(Args)]
pub struct NamesArgs {
    /// Image id, id prefix, or one of its names
    pub image: String,

    /// Print only the preferred display name
    #[arg(short, long)]
    pub short: bool,
}

pub async fn execute(args: NamesArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;
    let image_id = store
        .resolve_name(&args.image)?
        .ok_or_else(|| format!("No such image: {}", args.image))?;

    if args.short {
        println!("{}", store.image_name(&image_id)?);
        return Ok(());
    }

    let names = store.by_id()?.remove(&image_id).unwrap_or_default();
    if names.is_empty() {
        tracing::info!(image = %image_id, "Image has no names");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::config_with_images;

    #[tokio::test]
    async fn test_names_by_prefix_and_name() {
        let (_dir, config) = config_with_images(&["aaa111"]);
        let store = crate::commands::open_store(&config).unwrap();
        store.set_tag("app", "v1", "aaa111", false).unwrap();

        for image in ["aaa", "app:v1"] {
            let args = NamesArgs {
                image: image.to_string(),
                short: false,
            };
            execute(args, &config).await.unwrap();
        }
        let args = NamesArgs {
            image: "aaa111".to_string(),
            short: true,
        };
        execute(args, &config).await.unwrap();
    }

    #[tokio::test]
    async fn test_names_by_digest() {
        let (_dir, config) = config_with_images(&["aaa111"]);
        let store = crate::commands::open_store(&config).unwrap();
        store.set_tag("app", "v1", "aaa111", false).unwrap();
        store.set_digest("sha256:00ff", "aaa111", "app").unwrap();

        let args = NamesArgs {
            image: "app@sha256:00ff".to_string(),
            short: false,
        };
        execute(args, &config).await.unwrap();
    }

    #[tokio::test]
    async fn test_names_unknown_image() {
        let (_dir, config) = config_with_images(&[]);
        let args = NamesArgs {
            image: "zzz".to_string(),
            short: false,
        };
        assert!(execute(args, &config).await.is_err());
    }
}
