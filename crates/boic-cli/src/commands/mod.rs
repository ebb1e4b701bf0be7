pub mod execute;
pub mod list;
pub mod resolve;
pub mod walk;

use anyhow::{Context, Result};
use boic_core::Jewel;
use boic_query::ExecutionOptions;
use std::path::Path;
use std::rc::Rc;

/// Open the jewel rooted at `root`, loading its `jewel.yml` if present
pub fn open_jewel(root: &Path) -> Result<Rc<Jewel>> {
    if !root.is_dir() {
        anyhow::bail!("Jewel root {} is not a directory", root.display());
    }
    let jewel = Jewel::open(root)
        .with_context(|| format!("Failed to load configuration of jewel {}", root.display()))?;
    tracing::debug!(config = ?jewel.config(), "Jewel configuration");
    Ok(jewel)
}

/// Execution options from the jewel configuration, with a command-line
/// depth taking precedence
pub fn options(jewel: &Jewel, depth: Option<usize>) -> ExecutionOptions {
    let options = ExecutionOptions::from_config(jewel.config());
    match depth {
        Some(depth) => options.with_max_depth(depth),
        None => options,
    }
}
