//! Readline wrapper with company-name completion.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};

pub struct CompanyHelper {
    names: Vec<String>,
    hinter: HistoryHinter,
}

impl CompanyHelper {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            names: names.into_iter().map(|s| s.to_string()).collect(),
            hinter: HistoryHinter::default(),
        }
    }
}

impl Helper for CompanyHelper {}
impl Validator for CompanyHelper {}
impl Highlighter for CompanyHelper {}

impl Hinter for CompanyHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Completer for CompanyHelper {
    type Candidate = Pair;

    // The whole line is one company name, so completion always replaces from 0.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = line[..pos].trim_start().to_lowercase();
        if typed.is_empty() {
            return Ok((0, Vec::new()));
        }

        let mut matches: Vec<Pair> = self
            .names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&typed))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();

        matches.sort_by(|a, b| a.replacement.cmp(&b.replacement));
        matches.dedup_by(|a, b| a.replacement == b.replacement);

        Ok((0, matches))
    }
}

/// Thin wrapper over `rustyline::Editor` with company completion and a history file.
pub struct Readline {
    editor: Editor<CompanyHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Readline {
    pub fn new<'a>(
        companies: impl IntoIterator<Item = &'a str>,
        history_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        let helper = CompanyHelper::new(companies);
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(helper));

        let history_path = history_path.unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".tidings/history")
        });

        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
            if let Some(dir) = self.history_path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            let _ = self.editor.append_history(&self.history_path);
        }
        Ok(line)
    }

    /// Utility for tests to inspect completions without invoking terminal input.
    pub fn completions(&self, line: &str) -> Vec<String> {
        if let Some(helper) = self.editor.helper() {
            let pos = line.len();
            let history = self.editor.history();
            if let Ok((_, pairs)) = helper.complete(line, pos, &Context::new(history)) {
                return pairs.into_iter().map(|p| p.replacement).collect();
            }
        }
        Vec::new()
    }
}
