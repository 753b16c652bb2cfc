//! The editor session: one editable document and its highlighted view.
//!
//! [`EditorSession`] owns all editor state. Every change flows through the
//! same pass:
//! - the surface text is tokenized and rendered per line
//! - the [`crate::reconcile`] pass patches the [`LineStore`]
//! - the selection is re-read and the active line moved
//! - listeners, option callbacks and extensions observe the result

mod options;

pub use options::{DEFAULT_TAB_SIZE, EditorOptions, OptionsPatch};

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::commands::{Command, CommandMap};
use crate::editor::TextSurface;
use crate::error::{EditorError, Result};
use crate::events::{EditorEvent, EventKind, Listener, ListenerId, Listeners};
use crate::extensions::{Extension, ExtensionRegistry};
use crate::highlight::{Grammar, LanguageRegistry, SyntectTokenizer, TokenStream, Tokenizer};
use crate::platform::Platform;
use crate::reconcile::{ReconcileOutcome, reconcile};
use crate::selection::{DeferredTask, Selection, SelectionGate, TaskQueue, count_lines};
use crate::view::{ClassFlags, LineStore, LineView, ViewState, class_name};

/// Root state of one editor instance.
pub struct EditorSession {
    languages: LanguageRegistry,
    tokenizer: Rc<dyn Tokenizer>,
    platform: Platform,
    language: String,
    grammar: Option<Arc<Grammar>>,
    value: Rc<str>,
    tokens: Rc<TokenStream>,
    options: EditorOptions,
    surface: TextSurface,
    lines: LineStore,
    /// Markup per line from the last pass; the reconciler's baseline.
    rendered: Vec<String>,
    active_line_index: usize,
    last_patch: Option<ReconcileOutcome>,
    view: ViewState,
    focused: bool,
    removed: bool,
    /// Set when a programmatic change on WebKit will cause a spurious focus.
    bounce_focus: bool,
    gate: SelectionGate,
    tasks: TaskQueue,
    extensions: ExtensionRegistry,
    listeners: Listeners,
    key_commands: CommandMap,
    input_commands: CommandMap,
}

impl EditorSession {
    /// Create an unconfigured session.
    ///
    /// Nothing is rendered until the first [`EditorSession::set_options`].
    pub fn new(languages: LanguageRegistry) -> Self {
        Self {
            languages,
            tokenizer: Rc::new(SyntectTokenizer),
            platform: Platform::default(),
            language: EditorOptions::default().language,
            grammar: None,
            value: Rc::from(""),
            tokens: Rc::new(TokenStream::new()),
            options: EditorOptions::default(),
            surface: TextSurface::empty(),
            lines: LineStore::new(),
            rendered: Vec::new(),
            active_line_index: 0,
            last_patch: None,
            view: ViewState::default(),
            focused: false,
            removed: false,
            bounce_focus: false,
            gate: SelectionGate::new(),
            tasks: TaskQueue::new(),
            extensions: ExtensionRegistry::new(),
            listeners: Listeners::new(),
            key_commands: CommandMap::default_keys(),
            input_commands: CommandMap::new(),
        }
    }

    /// Use the given platform facts.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Use a custom tokenizer instead of syntect.
    #[must_use]
    pub fn with_tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Rc::new(tokenizer);
        self
    }

    /// Attach extensions that run during the first configuration pass.
    #[must_use]
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = Extension>) -> Self {
        self.extensions.attach_pending(extensions);
        self
    }

    /// Create a session, attach `extensions` and apply `options` if given.
    ///
    /// # Errors
    /// Fails like [`EditorSession::set_options`].
    pub fn create_editor(
        languages: LanguageRegistry,
        options: Option<OptionsPatch>,
        extensions: impl IntoIterator<Item = Extension>,
    ) -> Result<Self> {
        let mut session = Self::new(languages).with_extensions(extensions);
        if let Some(options) = options {
            session.set_options(options)?;
        }
        Ok(session)
    }

    /// Like [`EditorSession::create_editor`], but the text defaults to
    /// `placeholder` unless `options` carries a value.
    ///
    /// # Errors
    /// Fails like [`EditorSession::set_options`].
    pub fn from_placeholder(
        languages: LanguageRegistry,
        placeholder: &str,
        mut options: OptionsPatch,
        extensions: impl IntoIterator<Item = Extension>,
    ) -> Result<Self> {
        if options.value.is_none() {
            options.value = Some(placeholder.to_string());
        }
        Self::create_editor(languages, Some(options), extensions)
    }

    // --- Read access ---

    /// Current document text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current language id.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub const fn grammar(&self) -> Option<&Arc<Grammar>> {
        self.grammar.as_ref()
    }

    /// Tokens from the last update pass.
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub const fn lines(&self) -> &LineStore {
        &self.lines
    }

    /// Number of document lines in the view.
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Markup per line from the last pass.
    pub fn rendered_lines(&self) -> &[String] {
        &self.rendered
    }

    /// Index into [`EditorSession::lines`] of the line holding the caret.
    pub const fn active_line_index(&self) -> usize {
        self.active_line_index
    }

    pub fn active_line(&self) -> Option<&LineView> {
        self.lines.get(self.active_line_index)
    }

    /// What the reconciler did on the last pass.
    pub const fn last_patch(&self) -> Option<&ReconcileOutcome> {
        self.last_patch.as_ref()
    }

    /// Current selection on the editable surface.
    pub const fn selection(&self) -> Selection {
        self.surface.selection()
    }

    pub const fn get_selection(&self) -> Selection {
        self.selection()
    }

    /// Text covered by the current selection.
    pub fn selected_text(&self) -> String {
        self.surface.selected_text()
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn removed(&self) -> bool {
        self.removed
    }

    pub const fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub const fn platform(&self) -> Platform {
        self.platform
    }

    pub const fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    /// Deferred tasks waiting for [`EditorSession::run_deferred`].
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    // --- Configuration ---

    /// Merge `patch` into the options and re-render if needed.
    ///
    /// Presentation fields are merged first. The language is then resolved;
    /// if it has no grammar the call fails and the language, text and view
    /// stay as they were. Otherwise the reactive extensions run, and the
    /// document is re-rendered (selection reset to the start) when the
    /// grammar or the text changed.
    ///
    /// An unknown language rejects the patch's `language` and `value`
    /// entirely: neither is written into [`EditorSession::options`], so a
    /// later patch without a language resolves against the last valid one.
    /// Presentation fields and callbacks from the rejected patch do stick.
    ///
    /// # Errors
    /// [`EditorError::UnknownLanguage`] for an unregistered language,
    /// [`EditorError::Removed`] after [`EditorSession::remove`], or any error
    /// raised by an extension, listener or the tokenizer.
    pub fn set_options(&mut self, patch: OptionsPatch) -> Result<()> {
        self.ensure_live()?;
        self.options.merge_presentation(&patch);

        let OptionsPatch {
            language, value, ..
        } = patch;
        let language = language.unwrap_or_else(|| self.options.language.clone());
        let Some(grammar) = self.languages.get(&language) else {
            tracing::warn!(%language, "set_options: no grammar registered");
            return Err(EditorError::UnknownLanguage(language));
        };
        let value_supplied = value.is_some();

        if let Some(value) = value {
            self.options.value = value;
        }
        if language != self.language {
            tracing::debug!(from = %self.language, to = %language, "set_options: language changed");
        }
        self.options.language.clone_from(&language);
        self.language = language;
        let grammar_changed = !self
            .grammar
            .as_ref()
            .is_some_and(|bound| Arc::ptr_eq(bound, &grammar));
        self.grammar = Some(grammar);

        self.view.tab_size = self.options.effective_tab_size();
        self.view.read_only = self.options.read_only;
        self.refresh_class_name();

        self.run_extension_pass()?;

        // Read back after the pass: an extension may have set options itself.
        let value: Rc<str> = if value_supplied {
            Rc::from(self.options.value.as_str())
        } else {
            Rc::clone(&self.value)
        };
        if grammar_changed || !self.surface.text_eq(&value) {
            self.guard_focus();
            self.surface.set_text(&value);
            let direction = self.surface.selection().direction;
            self.surface.set_selection_range(0, 0, direction);
            self.update()?;
        }
        Ok(())
    }

    // --- Update pass ---

    /// Re-tokenize the surface text and reconcile the view with it.
    ///
    /// # Errors
    /// [`EditorError::NotConfigured`] before the first successful
    /// `set_options`, or any tokenizer/listener error.
    pub fn update(&mut self) -> Result<()> {
        self.ensure_live()?;
        let _scope = crate::perf::scope("session.update");
        let grammar = self.grammar.clone().ok_or(EditorError::NotConfigured)?;

        self.value = Rc::from(self.surface.text());
        self.tokens = Rc::new(self.tokenizer.tokenize(&self.value, &grammar)?);
        self.dispatch_event(EditorEvent::Tokenize {
            tokens: Rc::clone(&self.tokens),
            language: self.language.clone(),
            value: Rc::clone(&self.value),
        })?;

        let next: Vec<String> = self
            .tokenizer
            .render(&self.tokens)
            .split('\n')
            .map(str::to_string)
            .collect();
        let outcome = reconcile(&mut self.lines, &self.rendered, &next);
        self.rendered = next;
        self.last_patch = Some(outcome);

        self.dispatch_event(EditorEvent::Update {
            value: Rc::clone(&self.value),
        })?;
        self.dispatch_selection(true)?;
        self.gate.close(&mut self.tasks);
        Ok(())
    }

    // --- Selection ---

    /// Select `selection` (clamped to the text) and announce it.
    ///
    /// # Errors
    /// [`EditorError::Removed`], or a listener error.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        self.ensure_live()?;
        self.guard_focus();
        self.surface
            .set_selection_range(selection.start, selection.end, selection.direction);
        self.dispatch_selection(true)
    }

    /// Record a selection change reported by the host.
    ///
    /// The surface always takes the new selection; the `selectionChange`
    /// event is skipped if an update pass already announced it this turn.
    ///
    /// # Errors
    /// [`EditorError::Removed`], or a listener error.
    pub fn notify_selection_change(&mut self, selection: Selection) -> Result<()> {
        self.ensure_live()?;
        self.surface
            .set_selection_range(selection.start, selection.end, selection.direction);
        self.dispatch_selection(false)
    }

    fn dispatch_selection(&mut self, force: bool) -> Result<()> {
        if !force && !self.gate.is_open() {
            tracing::trace!("selection notification dropped; update pass already dispatched");
            return Ok(());
        }
        let selection = self.surface.selection();
        let line = count_lines(&self.value, selection.anchor());
        self.active_line_index = line;

        let line_id = self.lines.get(line).map(LineView::id);
        if line_id != self.lines.active() {
            self.lines.set_active(line_id);
        }

        self.refresh_class_name();
        self.dispatch_event(EditorEvent::SelectionChange {
            selection,
            value: Rc::clone(&self.value),
        })
    }

    /// Run work deferred to the end of the host's turn.
    ///
    /// Hosts call this once their current batch of events is processed;
    /// until then, selection notifications caused by the last edit are
    /// dropped. Returns the number of tasks run.
    pub fn run_deferred(&mut self) -> usize {
        let tasks = self.tasks.drain();
        for task in &tasks {
            match task {
                DeferredTask::ReopenSelectionGate => self.gate.reopen(),
            }
        }
        tasks.len()
    }

    // --- Input ---

    /// Insert `text` over the current selection, as typed input.
    ///
    /// Returns `false` when the input was prevented: the session is
    /// read-only, or a single typed character's input command handled it.
    ///
    /// # Errors
    /// [`EditorError::Removed`], or any command/update error.
    pub fn insert_text(&mut self, text: &str) -> Result<bool> {
        self.ensure_live()?;
        if self.view.read_only {
            return Ok(false);
        }
        let mut chars = text.chars();
        if let (Some(ch), None) = (chars.next(), chars.next())
            && let Some(command) = self.input_commands.get(&ch.to_string())
        {
            let (selection, value) = (self.surface.selection(), Rc::clone(&self.value));
            if command(self, selection, &value)? {
                return Ok(false);
            }
        }
        self.surface.replace_selection(text);
        self.update()?;
        Ok(true)
    }

    /// Run the key command bound to `key`, if any.
    ///
    /// Returns whether the command handled the key.
    ///
    /// # Errors
    /// [`EditorError::Removed`], or the command's error.
    pub fn handle_key(&mut self, key: &str) -> Result<bool> {
        self.ensure_live()?;
        let Some(command) = self.key_commands.get(key) else {
            return Ok(false);
        };
        let (selection, value) = (self.surface.selection(), Rc::clone(&self.value));
        command(self, selection, &value)
    }

    /// Bind (or with `None`, unbind) a key command.
    pub fn set_key_command(&mut self, key: impl Into<String>, command: Option<Command>) {
        self.key_commands.set(key, command);
    }

    /// Bind (or with `None`, unbind) a command for a typed character.
    pub fn set_input_command(&mut self, ch: char, command: Option<Command>) {
        self.input_commands.set(ch.to_string(), command);
    }

    /// The editable surface gained focus.
    ///
    /// # Errors
    /// [`EditorError::Removed`].
    pub fn focus(&mut self) -> Result<()> {
        self.ensure_live()?;
        if self.bounce_focus {
            // Focus stolen by our own programmatic change; give it back.
            self.bounce_focus = false;
            tracing::debug!("focus bounced after programmatic change");
            return Ok(());
        }
        self.focused = true;
        self.refresh_class_name();
        Ok(())
    }

    /// The editable surface lost focus.
    ///
    /// # Errors
    /// [`EditorError::Removed`].
    pub fn blur(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.focused = false;
        self.refresh_class_name();
        Ok(())
    }

    fn guard_focus(&mut self) {
        if self.platform.is_webkit && !self.focused {
            self.bounce_focus = true;
        }
    }

    // --- Extensions and listeners ---

    /// Register extensions, running each immediately in order.
    ///
    /// # Errors
    /// [`EditorError::Removed`], or the first extension error; extensions
    /// after the failing one are not registered.
    pub fn add_extensions(&mut self, extensions: impl IntoIterator<Item = Extension>) -> Result<()> {
        self.ensure_live()?;
        for extension in extensions {
            let options = self.options.clone();
            match extension {
                Extension::Init(init) => init(self, &options)?,
                Extension::Reactive(reactive) => {
                    reactive.update(self, &options)?;
                    self.extensions.attach(reactive);
                }
            }
        }
        Ok(())
    }

    fn run_extension_pass(&mut self) -> Result<()> {
        for extension in self.extensions.begin_pass() {
            let options = self.options.clone();
            match extension {
                Extension::Init(init) => init(self, &options)?,
                Extension::Reactive(reactive) => reactive.update(self, &options)?,
            }
        }
        Ok(())
    }

    /// Number of attached reactive extensions.
    pub fn extension_count(&self) -> usize {
        self.extensions.reactive_count()
    }

    /// Subscribe `listener` to `kind`.
    pub fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    /// Unsubscribe; returns whether the listener was subscribed.
    pub fn remove_listener(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.listeners.remove(kind, id)
    }

    fn dispatch_event(&mut self, event: EditorEvent) -> Result<()> {
        let kind = event.kind();
        for listener in self.listeners.snapshot(kind) {
            listener(self, &event)?;
        }
        if let Some(callback) = self.options.callback(kind).cloned() {
            callback(self, &event)?;
        }
        Ok(())
    }

    // --- Lifecycle ---

    /// Detach the view and disable the session for good.
    pub fn remove(&mut self) {
        if !self.removed {
            tracing::debug!(language = %self.language, "editor session removed");
        }
        self.removed = true;
        self.focused = false;
    }

    fn ensure_live(&self) -> Result<()> {
        if self.removed {
            Err(EditorError::Removed)
        } else {
            Ok(())
        }
    }

    fn refresh_class_name(&mut self) {
        let flags = ClassFlags {
            has_selection: !self.surface.selection().is_collapsed(),
            focused: self.focused,
            ..ClassFlags::from_options(&self.options)
        };
        self.view.class_name = class_name(&self.language, flags);
    }
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("language", &self.language)
            .field("line_count", &self.line_count())
            .field("active_line_index", &self.active_line_index)
            .field("selection", &self.surface.selection())
            .field("focused", &self.focused)
            .field("removed", &self.removed)
            .field("extensions", &self.extensions.reactive_count())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
