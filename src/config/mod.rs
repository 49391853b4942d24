//! Configuration for usedef.
//!
//! Settings come from `.usedef.toml`, found by walking up from the working
//! directory or passed explicitly, and are overridden by CLI flags.
//!
//! ```toml
//! [analysis]
//! max_iterations = 10000
//!
//! [output]
//! format = "json"
//! color = false
//! ```

mod core;
mod loader;

pub use self::core::{
    default_color, default_max_iterations, AnalysisConfig, OutputConfig, OutputFormat,
    UsedefConfig,
};
pub use loader::{
    directory_ancestors, discover_config, discover_config_from, load_config_file,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
