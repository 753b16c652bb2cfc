//! Pluggable hooks that observe configuration changes.
//!
//! Two kinds exist:
//! - [`Extension::Init`]: called once when registered, then dropped
//! - [`Extension::Reactive`]: called when registered and again on every
//!   later `set_options`, for the lifetime of the session
//!
//! The kind is fixed when the [`Extension`] value is built, so the session
//! never inspects hooks at dispatch time.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::session::{EditorOptions, EditorSession};

/// One-shot hook.
pub type Initializer = Rc<dyn Fn(&mut EditorSession, &EditorOptions) -> Result<()>>;

/// Persistent hook re-run on every configuration change.
///
/// Takes `&self`; implementations that keep state use interior mutability.
/// An `update` may call back into the session (`set_options` included), which
/// runs a nested pass over the attached extensions.
pub trait ReactiveExtension {
    /// React to the session's current configuration.
    ///
    /// # Errors
    /// Errors abort the pass and are returned from the triggering operation.
    fn update(&self, session: &mut EditorSession, options: &EditorOptions) -> Result<()>;
}

/// A hook together with its kind.
#[derive(Clone)]
pub enum Extension {
    Init(Initializer),
    Reactive(Rc<dyn ReactiveExtension>),
}

impl Extension {
    /// Wrap a closure as a one-shot initializer.
    pub fn init<F>(f: F) -> Self
    where
        F: Fn(&mut EditorSession, &EditorOptions) -> Result<()> + 'static,
    {
        Self::Init(Rc::new(f))
    }

    /// Wrap an owned reactive extension.
    pub fn reactive<R: ReactiveExtension + 'static>(extension: R) -> Self {
        Self::Reactive(Rc::new(extension))
    }

    pub const fn is_reactive(&self) -> bool {
        matches!(self, Self::Reactive(_))
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(_) => f.write_str("Extension::Init"),
            Self::Reactive(_) => f.write_str("Extension::Reactive"),
        }
    }
}

/// Extensions attached to a session, in attachment order.
#[derive(Debug, Default, Clone)]
pub struct ExtensionRegistry {
    attached: Vec<Extension>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue extensions for the first configuration pass.
    pub fn attach_pending(&mut self, extensions: impl IntoIterator<Item = Extension>) {
        for extension in extensions {
            match extension {
                Extension::Reactive(reactive) => {
                    self.attach(reactive);
                }
                init @ Extension::Init(_) => self.attached.push(init),
            }
        }
    }

    /// Keep `extension` for future passes.
    ///
    /// Returns `false` if this exact extension is already attached.
    pub fn attach(&mut self, extension: Rc<dyn ReactiveExtension>) -> bool {
        let already = self.attached.iter().any(|attached| match attached {
            Extension::Reactive(existing) => Rc::ptr_eq(existing, &extension),
            Extension::Init(_) => false,
        });
        if !already {
            self.attached.push(Extension::Reactive(extension));
        }
        !already
    }

    /// Hooks to run for one configuration pass.
    ///
    /// Pending initializers are handed out exactly once: they leave the
    /// registry here, before any hook runs.
    pub fn begin_pass(&mut self) -> Vec<Extension> {
        let pass = self.attached.clone();
        self.attached.retain(Extension::is_reactive);
        pass
    }

    /// Number of attached reactive extensions.
    pub fn reactive_count(&self) -> usize {
        self.attached.iter().filter(|e| e.is_reactive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;

    impl ReactiveExtension for Nop {
        fn update(&self, _: &mut EditorSession, _: &EditorOptions) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_begin_pass_drops_initializers() {
        let mut registry = ExtensionRegistry::new();
        registry.attach_pending([
            Extension::init(|_, _| Ok(())),
            Extension::reactive(Nop),
            Extension::init(|_, _| Ok(())),
        ]);
        assert_eq!(registry.reactive_count(), 1);

        let pass = registry.begin_pass();
        assert_eq!(pass.len(), 3);
        assert!(!pass[0].is_reactive());
        assert!(pass[1].is_reactive());
        assert!(!pass[2].is_reactive());
        assert_eq!(registry.reactive_count(), 1);

        assert_eq!(registry.begin_pass().len(), 1);
    }

    #[test]
    fn test_attach_is_idempotent_per_instance() {
        let mut registry = ExtensionRegistry::new();
        let shared: Rc<dyn ReactiveExtension> = Rc::new(Nop);
        assert!(registry.attach(Rc::clone(&shared)));
        assert!(!registry.attach(Rc::clone(&shared)));
        assert!(registry.attach(Rc::new(Nop)));
        assert_eq!(registry.reactive_count(), 2);
    }
}
