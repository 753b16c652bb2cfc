//! Editor events and their subscribers.
//!
//! Every event is delivered twice over: first to the explicit listeners
//! registered for its kind (in subscription order), then to the matching
//! callback slot in [`crate::EditorOptions`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::highlight::TokenStream;
use crate::selection::Selection;
use crate::session::EditorSession;

/// Kinds of events a session emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The text was tokenized, before rendering.
    Tokenize,
    /// The view was reconciled with the text.
    Update,
    /// The selection (or the text around it) changed.
    SelectionChange,
}

impl EventKind {
    pub const ALL: [Self; 3] = [Self::Tokenize, Self::Update, Self::SelectionChange];

    /// Event name, e.g. `selectionChange`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::Update => "update",
            Self::SelectionChange => "selectionChange",
        }
    }

    /// Name of the option slot that receives this event, e.g. `onSelectionChange`.
    pub const fn option_name(self) -> &'static str {
        match self {
            Self::Tokenize => "onTokenize",
            Self::Update => "onUpdate",
            Self::SelectionChange => "onSelectionChange",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event with its payload.
///
/// The events of one update pass share a single copy of the text.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    Tokenize {
        tokens: Rc<TokenStream>,
        language: String,
        value: Rc<str>,
    },
    Update {
        value: Rc<str>,
    },
    SelectionChange {
        selection: Selection,
        value: Rc<str>,
    },
}

impl EditorEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Tokenize { .. } => EventKind::Tokenize,
            Self::Update { .. } => EventKind::Update,
            Self::SelectionChange { .. } => EventKind::SelectionChange,
        }
    }

    /// Document text at the time of the event.
    pub fn value(&self) -> &str {
        match self {
            Self::Tokenize { value, .. }
            | Self::Update { value }
            | Self::SelectionChange { value, .. } => value,
        }
    }

    /// Shared handle to the text, for subscribers that keep it.
    pub fn shared_value(&self) -> Rc<str> {
        match self {
            Self::Tokenize { value, .. }
            | Self::Update { value }
            | Self::SelectionChange { value, .. } => Rc::clone(value),
        }
    }
}

/// Callback invoked with the emitting session and the event.
///
/// Returning an error stops delivery of that event to later subscribers and
/// fails the operation that emitted it.
pub type Listener = Rc<dyn Fn(&mut EditorSession, &EditorEvent) -> Result<()>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&mut EditorSession, &EditorEvent) -> Result<()> + 'static,
{
    Rc::new(f)
}

/// Handle returned by [`Listeners::add`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Explicit subscribers, grouped by event kind.
#[derive(Default)]
pub struct Listeners {
    entries: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to `kind`.
    ///
    /// Subscribing the same `Rc` twice to one kind is a no-op that returns
    /// the existing id.
    pub fn add(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let entries = self.entries.entry(kind).or_default();
        if let Some((id, _)) = entries.iter().find(|(_, l)| Rc::ptr_eq(l, &listener)) {
            return *id;
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        entries.push((id, listener));
        id
    }

    /// Unsubscribe; returns whether anything was removed.
    pub fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(entries) = self.entries.get_mut(&kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Current subscribers of `kind`, in subscription order.
    ///
    /// Returned by value so subscribers may (un)subscribe while being called.
    pub fn snapshot(&self, kind: EventKind) -> Vec<Listener> {
        self.entries
            .get(&kind)
            .map(|entries| entries.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            map.entry(&kind, &self.count(kind));
        }
        map.finish()
    }
}
