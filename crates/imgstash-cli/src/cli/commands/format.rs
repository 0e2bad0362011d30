use anyhow::Result;
use imgstash_core::size::format_byte_count;

pub fn run_format(bytes: u64, si: bool) -> Result<()> {
    println!("{}", format_byte_count(bytes, si));
    Ok(())
}
