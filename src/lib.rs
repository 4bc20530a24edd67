pub mod clipboard;
pub mod collector;
pub mod config;
pub mod copy;
pub mod document;
pub mod errors;
pub mod ignore;
pub mod loader;
pub mod logger;
pub mod minify;
pub mod reporting;
pub mod trie;
pub mod truncate;
pub mod utils;

pub use config::CollyConfig;
pub use copy::copy_files_to_clipboard;
pub use errors::CollyError;
pub use ignore::ExclusionSet;
