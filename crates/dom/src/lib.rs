//! Arena-backed HTML tree for hypermedia clients
//!
//! ## Core Design
//!
//! ```text
//! HTML bytes → html5ever (scraper) → DomArena (owned) → NodeId handles
//! ```
//!
//! - **Data structures first**: one Vec of nodes in document order,
//!   indices everywhere, no per-node allocation or reference counting
//! - **lxml text model**: each element carries its leading `text` and
//!   trailing `tail` so mixed content flattens exactly
//! - **Lookups are not errors**: id and tag lookups return Option/empty,
//!   only stale node ids are errors

pub mod arena;
pub mod error;
pub mod parser;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use error::{DomError, Result};
pub use parser::parse_html;
pub use types::{DomNode, NodeId};
pub use utils::{flatten_text, normalize_whitespace};
