//! # boic-core
//!
//! The jewel layer: a directory of markdown shards addressed through
//! logical `jewel://` paths.
//!
//! - [`JewelPath`] resolves segments to a filesystem location, substituting
//!   `.jlnk` indirection files on the way, and caches the result.
//! - [`Walk`] traverses a jewel depth-first with an explicit stack.
//! - [`Shard`] loads a document and exposes its frontmatter as
//!   [`FieldValue`]s; `jewel://` strings become lazily resolved
//!   [`Reference`]s.
//!
//! ```no_run
//! use boic_core::{Jewel, Shard};
//!
//! let jewel = Jewel::open("/srv/jewel")?;
//! let shard = Shard::load(&jewel.path("AIOT/Usine Nord.md"))?;
//! println!("{}", shard.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod jewel;
pub mod path;
pub mod shard;
pub mod walk;

pub use config::{ErrorPolicy, JewelConfig, ReferenceConfig, ScanConfig};
pub use error::{
    ConfigError, ConfigResult, FieldError, FieldResult, PathError, PathResult, ShardError,
    ShardResult,
};
pub use jewel::{IoStats, Jewel};
pub use path::{JewelPath, JEWEL_SCHEME, LINK_SUFFIX};
pub use shard::{FieldValue, Fields, Reference, Shard, SHARD_SUFFIX};
pub use walk::{Walk, WalkEntry};
