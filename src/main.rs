//! Codeslate - render source files through the overlay editor core.
//!
//! # Usage
//!
//! ```bash
//! codeslate src/main.rs
//! codeslate --language rust --tab-size 4 snippet.txt
//! codeslate new.rs --against old.rs
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use codeslate::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use codeslate::perf;
use codeslate::prelude::*;
use codeslate::reconcile::ReconcileOutcome;

/// Render a source file as highlighted editor lines
#[derive(Parser, Debug)]
#[command(name = "codeslate", version, about, long_about = None)]
struct Cli {
    /// Source file to render
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Render OLD first, then apply FILE as an edit and report the line patch
    #[arg(long, value_name = "OLD")]
    against: Option<PathBuf>,

    /// Language id (defaults to the file extension, then plain text)
    #[arg(short, long)]
    language: Option<String>,

    /// Tab width in columns
    #[arg(long)]
    tab_size: Option<usize>,

    /// Mark the editor read-only
    #[arg(long)]
    read_only: bool,

    /// Wrap long lines
    #[arg(long)]
    word_wrap: bool,

    /// Hide the line-number gutter
    #[arg(long)]
    no_line_numbers: bool,

    /// Right-to-left layout
    #[arg(long)]
    rtl: bool,

    /// Extra editor options as JSON, e.g. '{"tabSize":4}'
    #[arg(long, value_name = "JSON")]
    options: Option<String>,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write reconcile/update debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    /// Flags as clap parsed them, so short and long spellings agree.
    fn config_flags(&self) -> ConfigFlags {
        ConfigFlags {
            language: self.language.clone(),
            tab_size: self.tab_size,
            read_only: self.read_only,
            word_wrap: self.word_wrap,
            no_line_numbers: self.no_line_numbers,
            rtl: self.rtl,
            perf: self.perf,
            debug_log: self.debug_log.clone(),
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn report_patch(outcome: &ReconcileOutcome) {
    let patch = outcome.patch;
    eprintln!(
        "lines {}..{} -> {}..{}: {:?}",
        patch.start + 1,
        patch.old_end + 1,
        patch.start + 1,
        patch.new_end + 1,
        outcome.kind
    );
}

fn render_page(session: &EditorSession) -> String {
    let view = session.view_state();
    format!(
        "<div class=\"{}\" style=\"tab-size: {}\">\n{}</div>\n",
        view.class_name,
        view.tab_size,
        session.lines().to_html()
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.config_flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("CODESLATE_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize debug log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let extra = cli
        .options
        .as_deref()
        .map(OptionsPatch::from_json)
        .transpose()
        .context("Invalid --options JSON")?;

    let text = read_source(&cli.file)?;
    let baseline = cli.against.as_deref().map(read_source).transpose()?;

    let languages = LanguageRegistry::with_defaults();
    let mut patch = effective.to_options_patch();
    if patch.language.is_none() {
        patch.language = Some(
            languages
                .language_for_path(&cli.file)
                .unwrap_or_else(|| "text".to_string()),
        );
    }
    patch.value = Some(baseline.clone().unwrap_or_else(|| text.clone()));

    let mut session = EditorSession::create_editor(languages, Some(patch), Vec::new())
        .context("Failed to configure editor")?;
    if let Some(extra) = extra {
        session
            .set_options(extra)
            .context("Failed to apply --options")?;
    }
    if baseline.is_some() {
        session
            .set_options(OptionsPatch::new().value(text))
            .context("Failed to apply edit")?;
        if let Some(outcome) = session.last_patch() {
            report_patch(outcome);
        }
    }
    session.run_deferred();

    print!("{}", render_page(&session));
    Ok(())
}
