// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorError)
    clippy::module_name_repetitions
)]

//! # Codeslate
//!
//! The core of an overlay code editor: an editable text surface kept in
//! sync with a syntax-highlighted, line-structured view.
//!
//! Codeslate provides:
//! - Syntax highlighting through syntect grammars
//! - Incremental line reconciliation that touches only changed lines
//! - Active-line tracking that follows the selection
//! - Extensions, event listeners and key/input commands
//!
//! ## Architecture
//!
//! An [`EditorSession`] owns everything. Hosts feed it input, native
//! selection notifications and end-of-turn ticks
//! ([`EditorSession::run_deferred`]); each change runs one update pass:
//! - **Tokenize**: the text becomes a token stream
//! - **Render**: tokens become per-line markup
//! - **Reconcile**: the line store is patched to match
//! - **Dispatch**: selection, listeners and extensions observe the result
//!
//! ## Modules
//!
//! - [`session`]: The editor session and its options
//! - [`highlight`]: Grammars, tokenizing and markup rendering
//! - [`view`]: Line store and computed view state
//! - [`reconcile`]: Incremental line reconciliation
//! - [`editor`]: The editable text surface
//! - [`selection`]: Selections and the selection gate
//! - [`events`]: Events and listeners
//! - [`extensions`]: Extension hooks
//! - [`commands`]: Key and input commands
//! - [`platform`]: Host platform facts
//! - [`config`]: CLI configuration files

pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod extensions;
pub mod highlight;
pub mod perf;
pub mod platform;
pub mod reconcile;
pub mod selection;
pub mod session;
pub mod view;

pub use error::{EditorError, Result};
pub use events::{EditorEvent, EventKind};
pub use session::{EditorOptions, EditorSession, OptionsPatch};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commands::{Command, command};
    pub use crate::error::{EditorError, Result};
    pub use crate::events::{EditorEvent, EventKind, Listener, ListenerId, listener};
    pub use crate::extensions::{Extension, ReactiveExtension};
    pub use crate::highlight::{Grammar, LanguageRegistry, SyntectTokenizer, Tokenizer};
    pub use crate::platform::Platform;
    pub use crate::selection::{Selection, SelectionDirection};
    pub use crate::session::{EditorOptions, EditorSession, OptionsPatch};
}
