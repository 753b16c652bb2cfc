//! Language ids and the grammars bound to them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use syntect::parsing::SyntaxSet;

/// Lexical rules for one language, identified by a syntect syntax name.
///
/// Grammars are shared as `Arc<Grammar>`; two language ids bound to the same
/// `Arc` share grammar identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    name: String,
    syntax: String,
}

impl Grammar {
    /// Create a grammar named `name` that tokenizes with the syntect syntax `syntax`.
    pub fn new(name: impl Into<String>, syntax: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            syntax: syntax.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn syntax(&self) -> &str {
        &self.syntax
    }
}

const PLAIN_TEXT_IDS: &[&str] = &["text", "txt", "plain", "plaintext"];

/// Extra ids for common languages whose syntect names don't match what
/// people type.
const ALIASES: &[(&str, &str)] = &[
    ("bash", "Bourne Again Shell (bash)"),
    ("shell", "Bourne Again Shell (bash)"),
    ("sh", "Bourne Again Shell (bash)"),
    ("cpp", "C++"),
    ("csharp", "C#"),
    ("cs", "C#"),
    ("js", "JavaScript"),
    ("javascript", "JavaScript"),
    ("md", "Markdown"),
    ("objc", "Objective-C"),
    ("py", "Python"),
    ("latex", "LaTeX"),
    ("makefile", "Makefile"),
];

/// Mapping from language id to grammar.
///
/// Lookups are exact; a missing id is what makes `set_options` fail with
/// [`crate::EditorError::UnknownLanguage`].
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    grammars: HashMap<String, Arc<Grammar>>,
}

impl LanguageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated from syntect's bundled syntaxes.
    ///
    /// Every syntax is reachable by its lower-cased name and by each of its
    /// file extensions; plain text is reachable as `text`.
    pub fn with_defaults() -> Self {
        Self::from_syntax_set(super::syntax_set())
    }

    fn from_syntax_set(syntax_set: &SyntaxSet) -> Self {
        let mut registry = Self::new();
        let plain = syntax_set.find_syntax_plain_text();
        let plain = Arc::new(Grammar::new(plain.name.clone(), plain.name.clone()));
        for id in PLAIN_TEXT_IDS {
            registry.grammars.insert((*id).to_string(), Arc::clone(&plain));
        }

        for syntax in syntax_set.syntaxes() {
            let grammar = Arc::new(Grammar::new(syntax.name.clone(), syntax.name.clone()));
            registry
                .grammars
                .entry(syntax.name.to_ascii_lowercase())
                .or_insert_with(|| Arc::clone(&grammar));
            for ext in &syntax.file_extensions {
                registry
                    .grammars
                    .entry(ext.to_ascii_lowercase())
                    .or_insert_with(|| Arc::clone(&grammar));
            }
        }

        for (alias, name) in ALIASES {
            if let Some(grammar) = registry.get(&name.to_ascii_lowercase()) {
                registry.grammars.insert((*alias).to_string(), grammar);
            }
        }

        registry
    }

    /// Bind `id` to `grammar`, replacing any previous binding.
    pub fn register(&mut self, id: impl Into<String>, grammar: Arc<Grammar>) {
        self.grammars.insert(id.into(), grammar);
    }

    /// Look up the grammar bound to `id`.
    pub fn get(&self, id: &str) -> Option<Arc<Grammar>> {
        self.grammars.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.grammars.contains_key(id)
    }

    /// Registered language ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Pick a registered language id for a file based on its extension.
    pub fn language_for_path(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.contains(&ext).then_some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_plain_text_ids() {
        let registry = LanguageRegistry::with_defaults();
        for id in PLAIN_TEXT_IDS {
            assert!(registry.contains(id), "missing {id}");
        }
    }

    #[test]
    fn test_name_and_extension_share_grammar_identity() {
        let registry = LanguageRegistry::with_defaults();
        let by_name = registry.get("rust").unwrap();
        let by_ext = registry.get("rs").unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_ext));
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let registry = LanguageRegistry::with_defaults();
        assert!(registry.get("doesnotexist").is_none());
    }

    #[test]
    fn test_register_replaces_binding() {
        let mut registry = LanguageRegistry::new();
        registry.register("x", Arc::new(Grammar::new("X", "Plain Text")));
        let first = registry.get("x").unwrap();
        registry.register("x", Arc::new(Grammar::new("X2", "Plain Text")));
        let second = registry.get("x").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.name(), "X2");
    }

    #[test]
    fn test_language_for_path_uses_extension() {
        let registry = LanguageRegistry::with_defaults();
        assert_eq!(
            registry.language_for_path(Path::new("src/main.RS")).as_deref(),
            Some("rs")
        );
        assert_eq!(registry.language_for_path(Path::new("data.nope")), None);
        assert_eq!(registry.language_for_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_aliases_resolve_when_syntax_exists() {
        let registry = LanguageRegistry::with_defaults();
        let js = registry.get("js").unwrap();
        assert_eq!(js.syntax(), "JavaScript");
    }
}
