//! Host platform facts, injected into a session at construction.

use std::sync::OnceLock;

use regex::Regex;

/// What the host environment is.
///
/// Sessions never sniff the environment themselves; hosts build this once
/// (usually with [`Platform::detect`]) and hand it to
/// [`crate::EditorSession::with_platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    /// Apple platform; primary modifier is Cmd.
    pub is_mac: bool,
    /// Chromium-based engine.
    pub is_chrome: bool,
    /// WebKit without Chromium. Programmatic selection changes steal focus
    /// on this engine.
    pub is_webkit: bool,
}

impl Platform {
    /// Classify a user agent string and platform name.
    pub fn detect(user_agent: &str, platform: &str) -> Self {
        let is_chrome = chrome_re().is_match(user_agent);
        Self {
            is_mac: mac_re().is_match(platform),
            is_chrome,
            is_webkit: !is_chrome && webkit_re().is_match(user_agent),
        }
    }
}

fn mac_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Mac|iPhone|iPod|iPad").expect("valid platform regex"))
}

fn chrome_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Chrome/").expect("valid platform regex"))
}

fn webkit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"AppleWebKit/").expect("valid platform regex"))
}
