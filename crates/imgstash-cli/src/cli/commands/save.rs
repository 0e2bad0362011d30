//! `imgstash save` – download a remote image to a path.

use anyhow::{Context, Result};
use imgstash_core::config::StashConfig;
use imgstash_core::http::HttpOptions;
use imgstash_core::media;
use imgstash_core::resource::{DefaultOpener, ResourceDescriptor};
use imgstash_core::save::save_remote_resource;
use imgstash_core::size::format_byte_count;
use std::path::Path;

pub fn run_save(
    cfg: &StashConfig,
    url: &str,
    dest: &Path,
    title: Option<String>,
    notify: bool,
) -> Result<()> {
    let mut resource = ResourceDescriptor::new(url);
    resource.title = title;
    let opener = DefaultOpener::new(HttpOptions::from(&cfg.http));

    let bytes = save_remote_resource(&resource, dest, &opener, cfg.chunk_size)
        .with_context(|| format!("failed to save {url}"))?;
    println!("{}  {}", format_byte_count(bytes, false), dest.display());

    if notify {
        let indexer = media::indexer_from_config(&cfg.media);
        media::notify_media_indexer(dest, indexer.as_ref());
    }
    Ok(())
}
