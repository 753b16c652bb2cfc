use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::session::OptionsPatch;

/// Flags that can be persisted as defaults with `--save`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub language: Option<String>,
    pub tab_size: Option<usize>,
    pub read_only: bool,
    pub word_wrap: bool,
    pub no_line_numbers: bool,
    pub rtl: bool,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches add up, values from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            language: other.language.clone().or_else(|| self.language.clone()),
            tab_size: other.tab_size.or(self.tab_size),
            read_only: self.read_only || other.read_only,
            word_wrap: self.word_wrap || other.word_wrap,
            no_line_numbers: self.no_line_numbers || other.no_line_numbers,
            rtl: self.rtl || other.rtl,
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    /// Editor options these flags imply. Unset switches are left out so a
    /// later patch can still turn them on.
    pub fn to_options_patch(&self) -> OptionsPatch {
        let mut patch = OptionsPatch::new();
        patch.language.clone_from(&self.language);
        patch.tab_size = self.tab_size;
        if self.read_only {
            patch.read_only = Some(true);
        }
        if self.word_wrap {
            patch.word_wrap = Some(true);
        }
        if self.no_line_numbers {
            patch.line_numbers = Some(false);
        }
        if self.rtl {
            patch.rtl = Some(true);
        }
        patch
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("codeslate").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("codeslate")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("codeslate").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("codeslate")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".codeslaterc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# codeslate defaults (saved with --save)".to_string()];
    if let Some(language) = &flags.language {
        lines.push(format!("--language {language}"));
    }
    if let Some(tab_size) = flags.tab_size {
        lines.push(format!("--tab-size {tab_size}"));
    }
    for (set, flag) in [
        (flags.read_only, "--read-only"),
        (flags.word_wrap, "--word-wrap"),
        (flags.no_line_numbers, "--no-line-numbers"),
        (flags.rtl, "--rtl"),
        (flags.perf, "--perf"),
    ] {
        if set {
            lines.push(flag.to_string());
        }
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick persisted flags out of raw arguments. Unknown tokens (the program
/// name, file paths, `--save`) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = split_flag(token);
        match name {
            "--read-only" => flags.read_only = true,
            "--word-wrap" => flags.word_wrap = true,
            "--no-line-numbers" => flags.no_line_numbers = true,
            "--rtl" => flags.rtl = true,
            "--perf" => flags.perf = true,
            "--language" | "-l" | "--tab-size" | "--debug-log" => {
                let value = match inline {
                    Some(value) => Some(value),
                    None => {
                        i += 1;
                        tokens.get(i).map(String::as_str)
                    }
                };
                if let Some(value) = value {
                    apply_valued_flag(&mut flags, name, value);
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

/// Split `--name=value`, `-l=value` and `-lvalue` into name and inline value.
fn split_flag(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        return match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
    }
    match token.strip_prefix("-l") {
        Some("") => ("-l", None),
        Some(rest) => ("-l", Some(rest.strip_prefix('=').unwrap_or(rest))),
        None => (token, None),
    }
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--language" | "-l" => flags.language = Some(value.to_string()),
        "--tab-size" => flags.tab_size = value.parse().ok(),
        "--debug-log" => flags.debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "codeslate",
            "--language",
            "rust",
            "--tab-size=4",
            "--word-wrap",
            "--no-line-numbers",
            "--debug-log=debug.log",
            "main.rs",
        ]));
        assert_eq!(flags.language.as_deref(), Some("rust"));
        assert_eq!(flags.tab_size, Some(4));
        assert!(flags.word_wrap);
        assert!(flags.no_line_numbers);
        assert!(!flags.read_only);
        assert_eq!(flags.debug_log, Some(PathBuf::from("debug.log")));
    }

    #[test]
    fn test_short_language_flag_forms() {
        for raw in [
            &["codeslate", "-l", "rust", "snippet.txt"][..],
            &["codeslate", "-l=rust", "snippet.txt"][..],
            &["codeslate", "-lrust", "snippet.txt"][..],
        ] {
            let flags = parse_flag_tokens(&args(raw));
            assert_eq!(flags.language.as_deref(), Some("rust"), "{raw:?}");
        }
    }

    #[test]
    fn test_short_language_flag_survives_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".codeslaterc");
        let flags = parse_flag_tokens(&args(&["codeslate", "-l", "python"]));
        save_config_flags(&path, &flags).unwrap();
        assert_eq!(
            load_config_flags(&path).unwrap().language.as_deref(),
            Some("python")
        );
    }

    #[test]
    fn test_invalid_tab_size_is_ignored() {
        let flags = parse_flag_tokens(&args(&["--tab-size", "wide"]));
        assert_eq!(flags.tab_size, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            read_only: true,
            language: Some("python".to_string()),
            tab_size: Some(8),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            rtl: true,
            language: Some("rust".to_string()),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.read_only);
        assert!(merged.rtl);
        assert_eq!(merged.language.as_deref(), Some("rust"));
        assert_eq!(merged.tab_size, Some(8));
    }

    #[test]
    fn test_to_options_patch_only_sets_enabled_switches() {
        let flags = ConfigFlags {
            no_line_numbers: true,
            tab_size: Some(3),
            ..ConfigFlags::default()
        };
        let patch = flags.to_options_patch();
        assert_eq!(patch.line_numbers, Some(false));
        assert_eq!(patch.tab_size, Some(3));
        assert_eq!(patch.word_wrap, None);
        assert_eq!(patch.language, None);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".codeslaterc");
        let flags = ConfigFlags {
            language: Some("rust".to_string()),
            tab_size: Some(4),
            read_only: true,
            word_wrap: true,
            no_line_numbers: true,
            rtl: true,
            perf: true,
            debug_log: Some(PathBuf::from("debug.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
