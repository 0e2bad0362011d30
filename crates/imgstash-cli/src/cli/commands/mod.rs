//! CLI command handlers. Each command is in its own file.

mod completions;
pub(super) mod du;
mod format;
mod import;
mod new_file;
mod save;

pub use completions::run_completions;
pub use du::run_du;
pub use format::run_format;
pub use import::run_import;
pub use new_file::run_new_file;
pub use save::run_save;
