//! `imgstash new-file` – allocate an empty timestamped file.

use anyhow::Result;
use imgstash_core::config::StashConfig;
use imgstash_core::output::create_timestamped_file;

pub fn run_new_file(cfg: &StashConfig) -> Result<()> {
    let path = create_timestamped_file(&cfg.output_dir())?;
    println!("{}", path.display());
    Ok(())
}
