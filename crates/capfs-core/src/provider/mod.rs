//! Host entry providers.
//!
//! A provider is the host side of the capability API: it enumerates
//! directory children, looks up (and optionally creates) children by name,
//! removes them, and moves bytes in and out of files.
//!
//! - **MemoryProvider**: In-memory ephemeral hierarchy (tests, scratch)
//! - **LocalProvider**: Real directory tree on disk, sandboxed to a root
//!
//! ```text
//! <root>/                 # Entry::root()
//! ├── src/                # Entry { name: "src", path: "src" }
//! │   └── main.rs         # Entry { name: "main.rs", path: "src/main.rs" }
//! └── Cargo.toml
//! ```

mod local;
mod memory;
mod traits;

pub use local::LocalProvider;
pub use memory::MemoryProvider;
pub use traits::EntryProvider;
