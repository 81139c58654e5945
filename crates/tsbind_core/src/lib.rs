//! tsbind_core: Shared foundations for the tsbind binder.
//!
//! String interning, source-text spans, and the insertion-ordered map the
//! symbol tables are built on.

pub mod collections;
pub mod intern;
pub mod text;

pub use collections::OrderedMap;
pub use intern::{InternedString, StringInterner};
pub use text::TextSpan;
