//! Client-side gallery orchestration: loading, category filter, pagination and
//! the full-screen carousel viewer. Rendering is left to the caller.

pub mod loader;
pub mod state;
pub mod viewer;

pub use loader::{FallbackSource, GalleryLoader, NoFallback, StaticFallback};
pub use state::{GalleryState, PAGE_SIZE};
pub use viewer::{ClickOutcome, Direction, Key, Point, Rect, Viewer};
