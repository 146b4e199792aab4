//! Interactive fallbacks for the scan directory and output file.
//!
//! Scanning itself never asks anything; the command line picks one of
//! these resolvers and consults it only for paths not given as flags.

use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};

/// Source of paths the user did not pass on the command line.
///
/// `Ok(None)` means the user declined to choose.
pub trait PathResolver {
    /// Ask for the directory to scan.
    fn pick_directory(&self) -> Result<Option<PathBuf>>;

    /// Ask where to save the JSON output.
    fn pick_output(&self) -> Result<Option<PathBuf>>;
}

/// Never asks; every request counts as cancelled.
#[derive(Debug, Default)]
pub struct NonInteractive;

impl PathResolver for NonInteractive {
    fn pick_directory(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    fn pick_output(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Prompts on the terminal. An empty answer cancels.
#[cfg_attr(feature = "gui-dialogs", allow(dead_code))]
#[derive(Debug, Default)]
pub struct TerminalPrompt;

#[cfg_attr(feature = "gui-dialogs", allow(dead_code))]
impl TerminalPrompt {
    fn ask(&self, prompt: &str) -> Result<Option<PathBuf>> {
        let answer: String = dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read from terminal")?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }
}

impl PathResolver for TerminalPrompt {
    fn pick_directory(&self) -> Result<Option<PathBuf>> {
        self.ask("Directory to scan (empty to cancel)")
    }

    fn pick_output(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .ask("Save JSON file as (empty to cancel)")?
            .map(with_json_extension))
    }
}

/// Native folder and save dialogs.
#[cfg(feature = "gui-dialogs")]
#[derive(Debug, Default)]
pub struct NativeDialog;

#[cfg(feature = "gui-dialogs")]
impl PathResolver for NativeDialog {
    fn pick_directory(&self) -> Result<Option<PathBuf>> {
        Ok(rfd::FileDialog::new()
            .set_title("Select a Directory")
            .pick_folder())
    }

    fn pick_output(&self) -> Result<Option<PathBuf>> {
        Ok(rfd::FileDialog::new()
            .set_title("Save JSON file")
            .add_filter("JSON files", &["json"])
            .add_filter("All files", &["*"])
            .save_file()
            .map(with_json_extension))
    }
}

/// Pick the resolver for this run.
pub fn default_resolver(interactive: bool) -> Box<dyn PathResolver> {
    if !interactive {
        return Box::new(NonInteractive);
    }

    #[cfg(feature = "gui-dialogs")]
    {
        Box::new(NativeDialog)
    }

    #[cfg(not(feature = "gui-dialogs"))]
    {
        use std::io::IsTerminal;

        if std::io::stdin().is_terminal() {
            Box::new(TerminalPrompt)
        } else {
            Box::new(NonInteractive)
        }
    }
}

/// Use the explicit path when given, otherwise ask.
pub fn explicit_or<F>(explicit: Option<PathBuf>, ask: F) -> Result<Option<PathBuf>>
where
    F: FnOnce() -> Result<Option<PathBuf>>,
{
    match explicit {
        Some(path) => Ok(Some(path)),
        None => ask(),
    }
}

/// Append `.json` to a chosen output path that has no extension.
pub fn with_json_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("json");
    }
    path
}
