use crate::session::EditorOptions;

/// Inputs to the container's class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassFlags {
    pub line_numbers: bool,
    pub word_wrap: bool,
    pub rtl: bool,
    pub has_selection: bool,
    pub focused: bool,
    pub read_only: bool,
}

impl ClassFlags {
    pub const fn from_options(options: &EditorOptions) -> Self {
        Self {
            line_numbers: options.line_numbers,
            word_wrap: options.word_wrap,
            rtl: options.rtl,
            has_selection: false,
            focused: false,
            read_only: options.read_only,
        }
    }
}

/// Compose the container class name for `language` and `flags`.
pub fn class_name(language: &str, flags: ClassFlags) -> String {
    let mut class = format!("code-editor language-{language}");
    if flags.line_numbers {
        class.push_str(" show-line-numbers");
    }
    class.push_str(if flags.word_wrap { " cs-wrap" } else { " cs-nowrap" });
    if flags.rtl {
        class.push_str(" cs-rtl");
    }
    class.push_str(if flags.has_selection {
        " cs-has-selection"
    } else {
        " cs-no-selection"
    });
    if flags.focused {
        class.push_str(" cs-focus");
    }
    if flags.read_only {
        class.push_str(" cs-readonly");
    }
    class
}

/// Presentation state derived from options, focus and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Width of a tab character, in columns.
    pub tab_size: usize,
    /// Whether the surface should refuse text input.
    pub read_only: bool,
    /// Composed container class name.
    pub class_name: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab_size: crate::session::DEFAULT_TAB_SIZE,
            read_only: false,
            class_name: class_name("text", ClassFlags::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_defaults() {
        let flags = ClassFlags {
            line_numbers: true,
            ..ClassFlags::default()
        };
        assert_eq!(
            class_name("rust", flags),
            "code-editor language-rust show-line-numbers cs-nowrap cs-no-selection"
        );
    }

    #[test]
    fn test_class_name_all_flags() {
        let flags = ClassFlags {
            line_numbers: false,
            word_wrap: true,
            rtl: true,
            has_selection: true,
            focused: true,
            read_only: true,
        };
        assert_eq!(
            class_name("text", flags),
            "code-editor language-text cs-wrap cs-rtl cs-has-selection cs-focus cs-readonly"
        );
    }
}
