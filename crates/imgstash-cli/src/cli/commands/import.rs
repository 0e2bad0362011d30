//! `imgstash import` – copy local content into a new timestamped file.

use anyhow::{Context, Result};
use imgstash_core::config::StashConfig;
use imgstash_core::content::{import_content, FsContentResolver};
use imgstash_core::media;

pub fn run_import(cfg: &StashConfig, id: &str, notify: bool) -> Result<()> {
    let output = cfg.output_dir();
    let path = import_content(&FsContentResolver, id, &output, cfg.chunk_size)
        .with_context(|| format!("failed to import {id}"))?;
    println!("{}", path.display());

    if notify {
        let indexer = media::indexer_from_config(&cfg.media);
        media::notify_media_indexer(&path, indexer.as_ref());
    }
    Ok(())
}
