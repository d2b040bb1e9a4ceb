pub mod artwork;
mod cache;
mod config;
pub mod definitions;
mod error;
pub mod excellon;
mod font;
mod geometry;
pub mod gerber;
mod mask;
pub mod path;
pub mod scene;
mod shape;
pub mod spacial;
mod transform;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use font::*;
pub use geometry::*;
pub use mask::*;
pub use path::{Path, PathTransform, SubPath, TransformedPath};
pub use scene::{Node, Role, Scene, SheetKind, StyledPath};
pub use shape::*;
pub use transform::*;

/// re-export 'gerber_parser' crate
#[cfg(feature = "parser")]
pub use gerber_parser;
/// re-export 'gerber_types' crate
#[cfg(feature = "types")]
pub use gerber_types;

#[cfg(feature = "testing")]
pub mod testing;
