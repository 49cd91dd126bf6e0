//! transcript_store - Transcript and prompt library
//!
//! The library is read-only. Transcripts come newest first, prompts in
//! their configured order.

pub mod error;
pub mod file_provider;
pub mod loader;
pub mod memory_provider;
pub mod provider;

pub use error::{Result, StoreError};
pub use file_provider::FileLibraryProvider;
pub use loader::{load_library, LoadedLibrary};
pub use memory_provider::InMemoryLibraryProvider;
pub use provider::LibraryProvider;
