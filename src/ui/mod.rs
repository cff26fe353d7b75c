//! Presentation layer
//!
//! The pipeline talks to the user only through the [`Presenter`] trait:
//! - menus return the index of the chosen option, or `None` when dismissed
//! - transfers report byte progress, rendered as a bar or a spinner
//! - notices are one-line status messages
//!
//! [`TerminalPresenter`] renders with inquire prompts, indicatif bars and
//! console styles. Tests drive the pipeline with a scripted implementation.

use std::cell::RefCell;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Select, Text};

use crate::error::Result;
use crate::transfer::Progress;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Warning,
    Error,
}

/// Rendering interface the pipeline depends on
pub trait Presenter {
    /// Show `options` under `title`; `None` when the user backs out.
    fn show_menu(&self, title: &str, options: &[&str]) -> Result<Option<usize>>;

    /// Render progress of the running transfer
    fn show_progress(&self, progress: Progress);

    /// Close the progress display of the finished transfer
    fn finish_progress(&self);

    /// Ask for a line of text; `None` when the user backs out.
    fn prompt_text(&self, label: &str) -> Result<Option<String>>;

    /// Show a status message
    fn notify(&self, notice: Notice, message: &str);
}

const MENU_HELP: &str = "↑↓ to move, ENTER to select, ESC to go back";

/// Interactive terminal presenter
pub struct TerminalPresenter {
    /// Pick the first option of every menu without prompting
    assume_yes: bool,
    bar: RefCell<Option<ProgressBar>>,
}

impl TerminalPresenter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            bar: RefCell::new(None),
        }
    }

    /// Byte bar when the fraction can be computed, spinner otherwise
    fn new_bar(progress: Progress) -> ProgressBar {
        match (progress.fraction(), progress.total) {
            (Some(_), Some(total)) => {
                let style = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> ");
                let bar = ProgressBar::new(total);
                bar.set_style(style);
                bar
            }
            _ => {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {bytes} downloaded ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                let bar = ProgressBar::new_spinner();
                bar.set_style(style);
                bar
            }
        }
    }
}

impl Presenter for TerminalPresenter {
    fn show_menu(&self, title: &str, options: &[&str]) -> Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }
        if self.assume_yes {
            log::debug!("Auto-selecting '{}' for '{title}'", options[0]);
            return Ok(Some(0));
        }

        let selection = Select::new(title, options.to_vec())
            .with_starting_cursor(0)
            .with_page_size(10)
            .without_filtering()
            .with_help_message(MENU_HELP)
            .raw_prompt_skippable()?;

        Ok(selection.map(|choice| choice.index))
    }

    fn show_progress(&self, progress: Progress) {
        let mut slot = self.bar.borrow_mut();
        let bar = slot.get_or_insert_with(|| Self::new_bar(progress));
        bar.set_position(progress.bytes_written);
    }

    fn finish_progress(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish();
        }
    }

    fn prompt_text(&self, label: &str) -> Result<Option<String>> {
        let answer = Text::new(label)
            .with_help_message("ESC to go back")
            .prompt_skippable()?;
        Ok(answer
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    fn notify(&self, notice: Notice, message: &str) {
        match notice {
            Notice::Info => println!("{message}"),
            Notice::Success => println!("{}", Style::new().bold().green().apply_to(message)),
            Notice::Warning => println!("{}", Style::new().yellow().apply_to(message)),
            Notice::Error => eprintln!("{}", Style::new().bold().red().apply_to(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assume_yes_picks_first_option() {
        let presenter = TerminalPresenter::new(true);
        let choice = presenter
            .show_menu("Successfully downloaded!", &["Install", "Cancel"])
            .unwrap();
        assert_eq!(choice, Some(0));
    }

    #[test]
    fn test_empty_menu_is_dismissed() {
        let presenter = TerminalPresenter::new(true);
        assert_eq!(presenter.show_menu("Nothing", &[]).unwrap(), None);
    }

    #[test]
    fn test_progress_bar_tracks_bytes() {
        let presenter = TerminalPresenter::new(false);
        presenter.show_progress(Progress {
            bytes_written: 100,
            total: Some(1000),
        });
        presenter.show_progress(Progress {
            bytes_written: 400,
            total: Some(1000),
        });

        {
            let slot = presenter.bar.borrow();
            let bar = slot.as_ref().unwrap();
            assert_eq!(bar.length(), Some(1000));
            assert_eq!(bar.position(), 400);
        }

        presenter.finish_progress();
        assert!(presenter.bar.borrow().is_none());
    }

    #[test]
    fn test_unknown_total_uses_spinner() {
        let presenter = TerminalPresenter::new(false);
        presenter.show_progress(Progress {
            bytes_written: 8192,
            total: None,
        });

        let slot = presenter.bar.borrow();
        assert_eq!(slot.as_ref().unwrap().length(), None);
    }

    #[test]
    fn test_finish_without_progress_is_noop() {
        let presenter = TerminalPresenter::new(false);
        presenter.finish_progress();
        assert!(presenter.bar.borrow().is_none());
    }
}
