//! Command implementations for the outposts CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod configure;
pub mod delete;
pub mod health;
pub mod info;
pub mod list;
pub mod mutate;

pub use completions::generate_completions;
pub use configure::run_configure;
pub use delete::run_delete;
pub use health::run_health;
pub use info::run_info;
pub use list::run_list;
pub use mutate::{run_create, run_update};
