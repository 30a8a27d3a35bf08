pub mod directory;
mod store;

pub use directory::{Directory, DirectoryLoadError, Loaded, Unloaded};
pub use store::{DocumentStore, MemoryStore, NotFoundError};
