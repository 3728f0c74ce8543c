//! `a3s-tag manifest` command: print a manifest file or its digest.

use std::path::PathBuf;

use a3s_tag_store::compute_digest;
use clap::Args;

#[derive(Args)]
pub struct ManifestArgs {
    /// Path to the manifest file
    pub file: PathBuf,

    /// Print the content digest instead of the manifest
    #[arg(long)]
    pub digest: bool,
}

pub async fn execute(args: ManifestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let data = tokio::fs::read(&args.file)
        .await
        .map_err(|e| format!("Failed to read manifest {}: {}", args.file.display(), e))?;

    if args.digest {
        println!("{}", compute_digest(&data));
        return Ok(());
    }

    let text = String::from_utf8(data)
        .map_err(|_| format!("Manifest {} is not valid UTF-8", args.file.display()))?;
    println!("{}", text.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manifest_digest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("manifest.json");
        std::fs::write(&file, br#"{"schemaVersion":2}"#).unwrap();

        execute(ManifestArgs {
            file: file.clone(),
            digest: true,
        })
        .await
        .unwrap();
        execute(ManifestArgs { file, digest: false }).await.unwrap();
    }

    #[tokio::test]
    async fn test_manifest_missing_file() {
        let err = execute(ManifestArgs {
            file: PathBuf::from("/nonexistent/manifest.json"),
            digest: true,
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }

    #[tokio::test]
    async fn test_manifest_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blob");
        std::fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();

        assert!(execute(ManifestArgs { file, digest: false }).await.is_err());
    }
}
