//! Interactive three-panel viewer
//!
//! Global configuration, protein configuration and results side by side,
//! each panel highlighted with the same shared rule set. Keyboard shortcuts:
//! C-e load config, C-o load protein, C-r (or Enter) run, C-s save, C-q quit,
//! F1 help, Tab switch panel, arrows/PageUp/PageDown scroll. Loading and
//! saving ask for a path in the message line; C-g or Esc cancels.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{error, info};

use crate::backend::HydroBackend;
use crate::config::Sampling;
use crate::display::{Display, Panel};
use crate::documents::{self, ComputationResult, GlobalConfig, ProteinConfig};
use crate::error::{AppError, Result};
use crate::pipeline;
use crate::syntax::Highlighter;
use crate::terminal::{Input, Terminal};

const GLOBAL_PANEL: usize = 0;
const PROTEIN_PANEL: usize = 1;
const RESULTS_PANEL: usize = 2;

pub const KEY_HELP: &str =
    "C-e load config | C-o load protein | C-r run | C-s save results | C-q quit | Tab switch panel";

/// Where the viewer reads and writes its documents
#[derive(Debug, Clone, Default)]
pub struct ViewerPaths {
    pub global: Option<PathBuf>,
    pub protein: Option<PathBuf>,
    /// Suggested file for saved results
    pub save: Option<PathBuf>,
}

/// What to do with the path typed into the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptAction {
    LoadConfig,
    LoadProtein,
    SaveResults,
}

/// Message-line path prompt
#[derive(Debug, Clone)]
struct Prompt {
    label: &'static str,
    input: String,
    action: PromptAction,
}

/// Viewer state, independent of the terminal
pub struct Session<'a> {
    pub panels: Vec<Panel>,
    pub display: Display,
    pub focused: usize,
    pub running: bool,
    paths: ViewerPaths,
    prompt: Option<Prompt>,
    global: Option<GlobalConfig>,
    protein: Option<ProteinConfig>,
    result: Option<ComputationResult>,
    backend: &'a dyn HydroBackend,
    sampling: Sampling,
}

impl<'a> Session<'a> {
    pub fn new(
        highlighter: Arc<Highlighter>,
        backend: &'a dyn HydroBackend,
        sampling: Sampling,
        paths: ViewerPaths,
    ) -> Self {
        let panels = vec![
            Panel::new("Global configuration", Arc::clone(&highlighter)),
            Panel::new("Protein configuration", Arc::clone(&highlighter)),
            Panel::new("Results", highlighter),
        ];
        Self {
            panels,
            display: Display::new(),
            focused: GLOBAL_PANEL,
            running: true,
            paths,
            prompt: None,
            global: None,
            protein: None,
            result: None,
            backend,
            sampling,
        }
    }

    /// Load whichever documents have paths, reporting failures in the message line
    pub fn load_all(&mut self) {
        if self.paths.global.is_some() {
            self.report(Self::load_global);
        }
        if self.paths.protein.is_some() {
            self.report(Self::load_protein);
        }
    }

    pub fn load_global(&mut self) -> Result<()> {
        let path = self.paths.global.clone().ok_or(AppError::Missing("global config path"))?;
        let loaded = documents::load::<GlobalConfig>(&path)?;
        self.panels[GLOBAL_PANEL].set_text(&loaded.display_text()?);
        self.display.set_message(format!("Loaded {}", loaded.path.display()));
        self.global = Some(loaded.parsed);
        Ok(())
    }

    pub fn load_protein(&mut self) -> Result<()> {
        let path = self.paths.protein.clone().ok_or(AppError::Missing("protein config path"))?;
        let loaded = documents::load::<ProteinConfig>(&path)?;
        self.panels[PROTEIN_PANEL].set_text(&loaded.display_text()?);
        self.display.set_message(format!("Loaded {}", loaded.path.display()));
        self.protein = Some(loaded.parsed);
        Ok(())
    }

    /// Compute with the loaded documents and show the result
    pub fn run(&mut self) -> Result<()> {
        let global = self.global.as_ref().ok_or(AppError::Missing("global configuration"))?;
        let protein = self.protein.as_ref().ok_or(AppError::Missing("protein configuration"))?;
        let result = pipeline::compute(global, protein, self.backend, self.sampling)?;
        self.panels[RESULTS_PANEL].set_text(&documents::to_yaml(&result)?);
        self.result = Some(result);
        self.display.set_message("Computation finished");
        Ok(())
    }

    /// Write the current result to `path`, creating its directory
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let result = self.result.as_ref().ok_or(AppError::NoResults)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        documents::write_result(path, result)?;
        self.display.set_message(format!("Saved {}", path.display()));
        self.paths.save = Some(path.to_path_buf());
        Ok(())
    }

    fn prompt_save(&mut self) -> Result<()> {
        if self.result.is_none() {
            return Err(AppError::NoResults);
        }
        let suggestion = self.save_suggestion();
        self.start_prompt("Save results", PromptAction::SaveResults, Some(&suggestion));
        Ok(())
    }

    /// Suggested save location: the last one used, else next to the protein
    fn save_suggestion(&self) -> PathBuf {
        if let Some(path) = &self.paths.save {
            return path.clone();
        }
        match &self.paths.protein {
            Some(protein) => result_path_for(protein),
            None => PathBuf::from("result.yaml"),
        }
    }

    /// Run an action; a failure is logged and shown, never fatal
    fn report<T>(&mut self, action: impl FnOnce(&mut Self) -> Result<T>) {
        if let Err(e) = action(self) {
            error!("{}", e);
            self.display.set_message(format!("Error: {}", e));
        }
    }

    fn start_prompt(&mut self, label: &'static str, action: PromptAction, current: Option<&Path>) {
        let input = current.map(|p| p.display().to_string()).unwrap_or_default();
        self.prompt = Some(Prompt { label, input, action });
        self.update_prompt_display();
    }

    fn update_prompt_display(&mut self) {
        if let Some(prompt) = &self.prompt {
            self.display.set_prompt(format!("{}: {}", prompt.label, prompt.input));
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('g') if ctrl => self.cancel_prompt(),
            KeyCode::Esc => self.cancel_prompt(),
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.display.clear_message();
                    self.complete_prompt(prompt.action, prompt.input.trim());
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.input.pop();
                }
                self.update_prompt_display();
            }
            KeyCode::Char(ch) if !ctrl => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.input.push(ch);
                }
                self.update_prompt_display();
            }
            _ => {}
        }
    }

    fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.display.set_message("Cancelled");
    }

    fn complete_prompt(&mut self, action: PromptAction, input: &str) {
        if input.is_empty() {
            self.display.set_message("No file name");
            return;
        }
        let path = PathBuf::from(input);
        match action {
            PromptAction::LoadConfig => {
                self.paths.global = Some(path);
                self.report(Self::load_global);
            }
            PromptAction::LoadProtein => {
                self.paths.protein = Some(path);
                self.report(Self::load_protein);
            }
            PromptAction::SaveResults => self.report(|session| session.save_to(&path)),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        self.display.clear_message();

        match key.code {
            KeyCode::Char('q') if ctrl => self.running = false,
            KeyCode::Char('e') if ctrl => {
                let current = self.paths.global.clone();
                self.start_prompt("Load config", PromptAction::LoadConfig, current.as_deref());
            }
            KeyCode::Char('o') if ctrl => {
                let current = self.paths.protein.clone();
                self.start_prompt("Load protein", PromptAction::LoadProtein, current.as_deref());
            }
            KeyCode::Char('r') if ctrl => self.report(Self::run),
            KeyCode::Enter => self.report(Self::run),
            KeyCode::Char('s') if ctrl => self.report(Self::prompt_save),
            KeyCode::F(1) => self.display.set_message(KEY_HELP),
            KeyCode::Tab => self.focused = (self.focused + 1) % self.panels.len(),
            KeyCode::BackTab => self.focused = (self.focused + self.panels.len() - 1) % self.panels.len(),
            KeyCode::Up => self.panels[self.focused].scroll(-1),
            KeyCode::Down => self.panels[self.focused].scroll(1),
            KeyCode::PageUp => self.panels[self.focused].scroll(-10),
            KeyCode::PageDown => self.panels[self.focused].scroll(10),
            _ => {}
        }
    }
}

/// `dir/name.yaml` becomes `dir/name_result.yaml`
fn result_path_for(protein: &Path) -> PathBuf {
    let stem = protein.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    protein.with_file_name(format!("{}_result.yaml", stem))
}

/// Take over the terminal until the user quits
pub fn run(mut session: Session<'_>) -> Result<()> {
    let mut terminal = Terminal::new()?;
    session.load_all();
    if session.display.message().is_none() {
        session.display.set_message(format!("F1 for help | {}", KEY_HELP));
    }
    info!("viewer started");

    while session.running {
        session.display.render(&mut terminal, &mut session.panels, session.focused)?;
        match terminal.read_input()? {
            Input::Key(key) => session.handle_key(key),
            Input::Resize => session.display.force_redraw(),
        }
    }

    info!("viewer closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{StubBackend, GLOBAL, PROTEIN};
    use crate::syntax::{document_highlighter, Theme};

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(session: &mut Session<'_>, text: &str) {
        for ch in text.chars() {
            session.handle_key(key(KeyCode::Char(ch)));
        }
    }

    /// Clear the prefilled prompt input and type `text`
    fn replace_input(session: &mut Session<'_>, text: &str) {
        while session.prompt.as_ref().is_some_and(|p| !p.input.is_empty()) {
            session.handle_key(key(KeyCode::Backspace));
        }
        type_text(session, text);
    }

    fn fixture(dir: &tempfile::TempDir) -> ViewerPaths {
        let global = dir.path().join("global.yaml");
        let protein = dir.path().join("demo.yaml");
        fs::write(&global, GLOBAL).unwrap();
        fs::write(&protein, PROTEIN).unwrap();
        ViewerPaths {
            global: Some(global),
            protein: Some(protein),
            save: None,
        }
    }

    fn highlighter() -> Arc<Highlighter> {
        Arc::new(document_highlighter(&Theme::default()).unwrap())
    }

    #[test]
    fn test_load_run_save() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), fixture(&dir));

        session.load_all();
        assert!(session.panels[GLOBAL_PANEL].doc.line_count() > 0);
        assert_eq!(session.panels[PROTEIN_PANEL].doc.line(0), Some("ProteinName: demo"));

        session.handle_key(ctrl('r'));
        assert_eq!(session.display.message(), Some("Computation finished"));
        assert!(session.panels[RESULTS_PANEL].doc.text().contains("HydrodynamicRadius_MDA: 7.4074"));

        session.handle_key(ctrl('s'));
        let suggested = dir.path().join("demo_result.yaml");
        assert_eq!(
            session.display.message(),
            Some(format!("Save results: {}", suggested.display()).as_str())
        );
        session.handle_key(key(KeyCode::Enter));
        assert!(suggested.exists());
        assert!(session.display.message().unwrap().starts_with("Saved"));
    }

    #[test]
    fn test_prompts_load_without_command_line_paths() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(&dir);
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), ViewerPaths::default());

        session.handle_key(ctrl('e'));
        assert_eq!(session.display.message(), Some("Load config: "));
        type_text(&mut session, &paths.global.unwrap().display().to_string());
        session.handle_key(key(KeyCode::Enter));
        assert!(session.display.message().unwrap().starts_with("Loaded"));

        session.handle_key(ctrl('o'));
        type_text(&mut session, &paths.protein.unwrap().display().to_string());
        session.handle_key(key(KeyCode::Enter));
        assert_eq!(session.panels[PROTEIN_PANEL].doc.line(0), Some("ProteinName: demo"));

        session.handle_key(ctrl('r'));
        assert_eq!(session.display.message(), Some("Computation finished"));
    }

    #[test]
    fn test_load_prompt_prefilled_with_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(&dir);
        let current = paths.protein.clone().unwrap();
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), paths);

        session.handle_key(ctrl('o'));
        assert_eq!(
            session.display.message(),
            Some(format!("Load protein: {}", current.display()).as_str())
        );

        let other = dir.path().join("other.yaml");
        fs::write(&other, "ProteinName: other\nAnnotatedSequence: GG\n").unwrap();
        replace_input(&mut session, &other.display().to_string());
        session.handle_key(key(KeyCode::Enter));
        assert_eq!(session.panels[PROTEIN_PANEL].doc.line(0), Some("ProteinName: other"));
        assert_eq!(session.paths.protein, Some(other));
    }

    #[test]
    fn test_save_to_typed_path_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), fixture(&dir));
        session.load_all();
        session.handle_key(ctrl('r'));

        let target = dir.path().join("out").join("lysozyme.yaml");
        session.handle_key(ctrl('s'));
        replace_input(&mut session, &target.display().to_string());
        session.handle_key(key(KeyCode::Enter));
        assert!(target.exists());

        // The next save suggests the same file
        session.handle_key(ctrl('s'));
        assert_eq!(
            session.display.message(),
            Some(format!("Save results: {}", target.display()).as_str())
        );
    }

    #[test]
    fn test_prompt_cancel_and_empty_input() {
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), ViewerPaths::default());

        session.handle_key(ctrl('e'));
        type_text(&mut session, "abc");
        session.handle_key(key(KeyCode::Esc));
        assert_eq!(session.display.message(), Some("Cancelled"));
        assert!(session.paths.global.is_none());

        session.handle_key(ctrl('o'));
        session.handle_key(ctrl('g'));
        assert_eq!(session.display.message(), Some("Cancelled"));

        session.handle_key(ctrl('e'));
        session.handle_key(key(KeyCode::Enter));
        assert_eq!(session.display.message(), Some("No file name"));
        assert!(session.running);
    }

    #[test]
    fn test_prompt_swallows_shortcuts() {
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), ViewerPaths::default());

        session.handle_key(ctrl('e'));
        session.handle_key(ctrl('q'));
        session.handle_key(key(KeyCode::Tab));
        assert!(session.running);
        assert_eq!(session.focused, GLOBAL_PANEL);
        type_text(&mut session, "q");
        assert_eq!(session.display.message(), Some("Load config: q"));
    }

    #[test]
    fn test_load_failure_is_recoverable() {
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), ViewerPaths::default());
        session.handle_key(ctrl('e'));
        type_text(&mut session, "/nonexistent/global.yaml");
        session.handle_key(key(KeyCode::Enter));
        assert!(session.running);
        assert!(session.display.message().unwrap().starts_with("Error:"));
        assert!(session.panels[GLOBAL_PANEL].doc.is_empty());
    }

    #[test]
    fn test_run_without_documents_is_recoverable() {
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), ViewerPaths::default());
        session.handle_key(ctrl('r'));
        assert!(session.running);
        assert!(session.display.message().unwrap().starts_with("Error:"));
    }

    #[test]
    fn test_backend_failure_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(&dir);
        fs::write(
            paths.protein.as_ref().unwrap(),
            "ProteinName: bad\nAnnotatedSequence: AKx\n",
        )
        .unwrap();
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), paths);
        session.load_all();

        session.handle_key(ctrl('r'));
        assert!(session.running);
        assert!(session.display.message().unwrap().contains("malformed sequence"));
        assert!(session.panels[RESULTS_PANEL].doc.is_empty());
    }

    #[test]
    fn test_save_before_run() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), fixture(&dir));
        assert!(matches!(
            session.save_to(&dir.path().join("x.yaml")),
            Err(AppError::NoResults)
        ));

        session.handle_key(ctrl('s'));
        assert!(session.prompt.is_none());
        assert_eq!(session.display.message(), Some("Error: No results to save"));
    }

    #[test]
    fn test_result_path_for() {
        assert_eq!(
            result_path_for(Path::new("/data/lysozyme.yaml")),
            PathBuf::from("/data/lysozyme_result.yaml")
        );
        assert_eq!(result_path_for(Path::new("p.yml")), PathBuf::from("p_result.yaml"));
    }

    #[test]
    fn test_navigation_and_quit() {
        let backend = StubBackend::default();
        let mut session = Session::new(highlighter(), &backend, Sampling::default(), ViewerPaths::default());

        session.handle_key(key(KeyCode::Tab));
        assert_eq!(session.focused, PROTEIN_PANEL);
        session.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        session.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(session.focused, RESULTS_PANEL);

        session.handle_key(key(KeyCode::F(1)));
        assert_eq!(session.display.message(), Some(KEY_HELP));

        session.handle_key(key(KeyCode::Char('q')));
        assert!(session.running);
        session.handle_key(ctrl('q'));
        assert!(!session.running);
    }

    #[test]
    fn test_panels_share_rule_set() {
        let engine = highlighter();
        let backend = StubBackend::default();
        let _session = Session::new(Arc::clone(&engine), &backend, Sampling::default(), ViewerPaths::default());
        assert_eq!(Arc::strong_count(&engine), 4);
    }
}
