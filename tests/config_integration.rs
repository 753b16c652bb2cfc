use std::path::PathBuf;

use codeslate::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use codeslate::prelude::*;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".codeslaterc");
    let content = r#"
# comment
--word-wrap

--language python
   
--debug-log=debug.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.word_wrap);
    assert_eq!(flags.language.as_deref(), Some("python"));
    assert_eq!(flags.debug_log, Some(PathBuf::from("debug.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".codeslaterc");
    let content = "--read-only\n--language python\n--debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "codeslate".to_string(),
        "--language".to_string(),
        "rust".to_string(),
        "--rtl".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.read_only, "file flags should remain enabled");
    assert!(effective.rtl, "cli flags should be applied");
    assert_eq!(
        effective.language.as_deref(),
        Some("rust"),
        "cli should override language"
    );
    assert_eq!(
        effective.debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        word_wrap: true,
        no_line_numbers: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        rtl: true,
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.word_wrap);
    assert!(merged.no_line_numbers);
    assert!(merged.rtl);
    assert!(merged.perf);
}

#[test]
fn test_saved_flags_configure_a_session() {
    let flags = parse_flag_tokens(&[
        "--language=rust".to_string(),
        "--tab-size".to_string(),
        "4".to_string(),
        "--read-only".to_string(),
    ]);
    let session = EditorSession::create_editor(
        LanguageRegistry::with_defaults(),
        Some(flags.to_options_patch().value("fn main() {}")),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(session.language(), "rust");
    assert_eq!(session.view_state().tab_size, 4);
    assert!(session.view_state().class_name.ends_with("cs-readonly"));
}
