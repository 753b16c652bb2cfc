//! Key and input command maps.
//!
//! A command receives the session, the selection and the text at the moment
//! the key or character arrived, and returns `true` when it handled the
//! input (the default action is then skipped).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::selection::Selection;
use crate::session::EditorSession;

pub type Command = Rc<dyn Fn(&mut EditorSession, Selection, &str) -> Result<bool>>;

/// Wrap a closure as a [`Command`].
pub fn command<F>(f: F) -> Command
where
    F: Fn(&mut EditorSession, Selection, &str) -> Result<bool> + 'static,
{
    Rc::new(f)
}

/// Commands keyed by key name (`"Escape"`) or inserted character (`"("`).
#[derive(Default, Clone)]
pub struct CommandMap {
    commands: HashMap<String, Command>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key commands every session starts with: `Escape` blurs the editor.
    pub fn default_keys() -> Self {
        let mut map = Self::new();
        map.set(
            "Escape",
            Some(command(|session, _, _| {
                session.blur()?;
                Ok(false)
            })),
        );
        map
    }

    pub fn get(&self, key: &str) -> Option<Command> {
        self.commands.get(key).cloned()
    }

    /// Bind `key` to `command`; `None` unbinds.
    pub fn set(&mut self, key: impl Into<String>, command: Option<Command>) {
        let key = key.into();
        match command {
            Some(command) => {
                self.commands.insert(key, command);
            }
            None => {
                self.commands.remove(&key);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.commands.contains_key(key)
    }
}

impl fmt::Debug for CommandMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_set().entries(keys).finish()
    }
}
