use std::fmt;

use serde::Deserialize;

use crate::error::Result;
use crate::events::{EditorEvent, EventKind, Listener, listener};
use crate::session::EditorSession;

/// Tab width used when none (or zero) is configured.
pub const DEFAULT_TAB_SIZE: usize = 2;

/// Current configuration of a session.
///
/// Sessions hand this out read-only; change it with
/// [`EditorSession::set_options`].
#[derive(Clone)]
pub struct EditorOptions {
    /// Language id resolved against the session's registry.
    pub language: String,
    /// Text most recently supplied through `set_options`.
    pub value: String,
    /// Tab width in columns; `None` means [`DEFAULT_TAB_SIZE`].
    pub tab_size: Option<usize>,
    pub read_only: bool,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub rtl: bool,
    on_tokenize: Option<Listener>,
    on_update: Option<Listener>,
    on_selection_change: Option<Listener>,
}

impl EditorOptions {
    /// Tab width actually applied to the view.
    pub fn effective_tab_size(&self) -> usize {
        self.tab_size
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_TAB_SIZE)
    }

    /// Callback slot for `kind`.
    pub const fn callback(&self, kind: EventKind) -> Option<&Listener> {
        match kind {
            EventKind::Tokenize => self.on_tokenize.as_ref(),
            EventKind::Update => self.on_update.as_ref(),
            EventKind::SelectionChange => self.on_selection_change.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: EventKind) -> &mut Option<Listener> {
        match kind {
            EventKind::Tokenize => &mut self.on_tokenize,
            EventKind::Update => &mut self.on_update,
            EventKind::SelectionChange => &mut self.on_selection_change,
        }
    }

    /// Merge every field of `patch` except `language` and `value`, which
    /// the session commits only after the language resolves.
    pub(crate) fn merge_presentation(&mut self, patch: &OptionsPatch) {
        if let Some(tab_size) = patch.tab_size {
            self.tab_size = Some(tab_size);
        }
        if let Some(read_only) = patch.read_only {
            self.read_only = read_only;
        }
        if let Some(word_wrap) = patch.word_wrap {
            self.word_wrap = word_wrap;
        }
        if let Some(line_numbers) = patch.line_numbers {
            self.line_numbers = line_numbers;
        }
        if let Some(rtl) = patch.rtl {
            self.rtl = rtl;
        }
        for (kind, callback) in &patch.callbacks {
            *self.slot_mut(*kind) = callback.clone();
        }
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            language: "text".to_string(),
            value: String::new(),
            tab_size: None,
            read_only: false,
            word_wrap: false,
            line_numbers: true,
            rtl: false,
            on_tokenize: None,
            on_update: None,
            on_selection_change: None,
        }
    }
}

impl fmt::Debug for EditorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorOptions")
            .field("language", &self.language)
            .field("value", &format_args!("{} bytes", self.value.len()))
            .field("tab_size", &self.tab_size)
            .field("read_only", &self.read_only)
            .field("word_wrap", &self.word_wrap)
            .field("line_numbers", &self.line_numbers)
            .field("rtl", &self.rtl)
            .field("on_tokenize", &self.on_tokenize.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_selection_change", &self.on_selection_change.is_some())
            .finish()
    }
}

/// A partial [`EditorOptions`]; only the fields that are set get applied.
///
/// Deserializes from camelCase JSON (`{"language":"rust","tabSize":4}`).
/// Callbacks can only be set in code.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsPatch {
    pub language: Option<String>,
    pub value: Option<String>,
    pub tab_size: Option<usize>,
    pub read_only: Option<bool>,
    pub word_wrap: Option<bool>,
    pub line_numbers: Option<bool>,
    pub rtl: Option<bool>,
    #[serde(skip)]
    callbacks: Vec<(EventKind, Option<Listener>)>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a patch from JSON.
    ///
    /// # Errors
    /// Returns an error on malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = Some(tab_size);
        self
    }

    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    #[must_use]
    pub const fn word_wrap(mut self, word_wrap: bool) -> Self {
        self.word_wrap = Some(word_wrap);
        self
    }

    #[must_use]
    pub const fn line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = Some(line_numbers);
        self
    }

    #[must_use]
    pub const fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = Some(rtl);
        self
    }

    /// Fill the callback slot for `kind`.
    #[must_use]
    pub fn on(mut self, kind: EventKind, callback: Listener) -> Self {
        self.callbacks.push((kind, Some(callback)));
        self
    }

    /// Empty the callback slot for `kind`.
    #[must_use]
    pub fn clear_callback(mut self, kind: EventKind) -> Self {
        self.callbacks.push((kind, None));
        self
    }

    #[must_use]
    pub fn on_tokenize<F>(self, f: F) -> Self
    where
        F: Fn(&mut EditorSession, &EditorEvent) -> Result<()> + 'static,
    {
        self.on(EventKind::Tokenize, listener(f))
    }

    #[must_use]
    pub fn on_update<F>(self, f: F) -> Self
    where
        F: Fn(&mut EditorSession, &EditorEvent) -> Result<()> + 'static,
    {
        self.on(EventKind::Update, listener(f))
    }

    #[must_use]
    pub fn on_selection_change<F>(self, f: F) -> Self
    where
        F: Fn(&mut EditorSession, &EditorEvent) -> Result<()> + 'static,
    {
        self.on(EventKind::SelectionChange, listener(f))
    }
}

impl fmt::Debug for OptionsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsPatch")
            .field("language", &self.language)
            .field("value", &self.value.as_ref().map(String::len))
            .field("tab_size", &self.tab_size)
            .field("read_only", &self.read_only)
            .field("word_wrap", &self.word_wrap)
            .field("line_numbers", &self.line_numbers)
            .field("rtl", &self.rtl)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
