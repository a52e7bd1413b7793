pub mod adapters;
pub mod iter;
pub mod traits;

// Re-export commonly used types
pub use adapters::{Chunks, Cycle, Enumerate, Filtered, Reversed, Windows, ZipWith};
pub use iter::{Iter, TryIter};
pub use traits::Source;
