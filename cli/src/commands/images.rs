//! `a3s-tag images` command.

use std::collections::{BTreeSet, HashMap};

use a3s_tag_core::StoreConfig;
use a3s_tag_store::reference::split_repository_tag;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct ImagesArgs {
    /// Only show short image ids (one per line)
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn execute(args: ImagesArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;
    let refs = store.repo_refs()?;

    if args.quiet {
        let ids: BTreeSet<&String> = refs.keys().collect();
        for id in ids {
            println!("{id}");
        }
        return Ok(());
    }

    let mut table = output::new_table(&["REPOSITORY", "TAG", "IMAGE ID"]);
    for row in rows(&refs) {
        table.add_row(&[&row.repository, &row.tag, &row.image_id]);
    }
    println!("{table}");
    Ok(())
}

/// One table line per `repo:tag`.
#[derive(Debug, PartialEq, Eq)]
struct ImageRow {
    repository: String,
    tag: String,
    image_id: String,
}

/// Flatten short-id → names into rows ordered by repository, then tag.
fn rows(refs: &HashMap<String, Vec<String>>) -> Vec<ImageRow> {
    let mut rows: Vec<ImageRow> = refs
        .iter()
        .flat_map(|(id, names)| {
            names.iter().map(move |name| {
                let (repository, tag) = split_repository_tag(name);
                ImageRow {
                    repository: repository.to_string(),
                    tag: tag.to_string(),
                    image_id: id.clone(),
                }
            })
        })
        .collect();
    rows.sort_by(|a, b| (&a.repository, &a.tag).cmp(&(&b.repository, &b.tag)));
    rows
}
