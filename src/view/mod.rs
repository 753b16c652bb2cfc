//! Rendered view of the document.
//!
//! - [`LineStore`]: arena of line containers mutated by the reconciler
//! - [`ViewState`]: presentation state derived from options and selection

mod lines;
mod state;

pub use lines::{LineId, LineStore, LineView};
pub use state::{ClassFlags, ViewState, class_name};
