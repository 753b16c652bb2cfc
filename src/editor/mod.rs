//! The editable text surface.
//!
//! Provides a rope-backed text model with a browser-style selection range,
//! standing in for the hidden input element the highlighted view overlays.

mod surface;

pub use surface::TextSurface;
