//! # RAG Code Chunker
//!
//! Tree-sitter based chunking of source files for embedding and retrieval.
//!
//! Every file produces one whole-file chunk plus one chunk per top-level
//! definition (functions and classes; Rust items), each carrying byte and
//! line ranges back into the original file.
//!
//! ## Example
//!
//! ```
//! use rag_code_chunker::{Chunker, Language};
//!
//! let mut chunker = Chunker::new(Language::Python).unwrap();
//! let chunks = chunker
//!     .chunk_source("def greet():\n    pass\n", "greet.py")
//!     .unwrap();
//!
//! assert_eq!(chunks.len(), 2); // file chunk + function chunk
//! ```

mod chunker;
mod error;
mod language;
mod types;

pub use chunker::Chunker;
pub use error::{ChunkerError, Result};
pub use language::Language;
pub use types::{ChunkType, CodeChunk};
