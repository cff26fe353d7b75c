//! Interactive menu
//!
//! Asks once whether to install the platform tools, then loops over the
//! installation methods until the user quits. Errors are shown and the loop
//! returns to the method menu.

use miette::Diagnostic;

use super::Components;
use crate::config::Settings;
use crate::error::{ApkError, Result};
use crate::pipeline::Pipeline;
use crate::ui::{Notice, Presenter};

const INSTALL_TOOLS_TITLE: &str = "Do you want to install ADB? (it is kept in the base directory)";
const INSTALL_TOOLS_OPTIONS: [&str; 2] = ["Yes", "No"];

const METHOD_TITLE: &str = "Choose installation method";

/// Entries of the installation method menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    GithubUrl,
    LocalFile,
    PackageBundle,
    Quit,
}

impl Method {
    const ALL: [Method; 4] = [
        Method::GithubUrl,
        Method::LocalFile,
        Method::PackageBundle,
        Method::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            Method::GithubUrl => "GitHub URL",
            Method::LocalFile => "Local APK file",
            Method::PackageBundle => "Package bundle",
            Method::Quit => "Quit",
        }
    }
}

/// Run the interactive menu
pub fn run(settings: Settings) -> Result<()> {
    let components = Components::new(settings, false)?;
    run_with(&components.pipeline())
}

fn run_with(pipeline: &Pipeline<'_>) -> Result<()> {
    let presenter = pipeline.presenter;

    if presenter.show_menu(INSTALL_TOOLS_TITLE, &INSTALL_TOOLS_OPTIONS)? == Some(0) {
        report(presenter, pipeline.setup_platform_tools().map(|_| ()));
    }

    let labels: Vec<&str> = Method::ALL.iter().map(|m| m.label()).collect();
    loop {
        let method = presenter
            .show_menu(METHOD_TITLE, &labels)?
            .and_then(|index| Method::ALL.get(index).copied())
            .unwrap_or(Method::Quit);

        match method {
            Method::GithubUrl => {
                if let Some(url) = presenter.prompt_text("GitHub APK URL:")? {
                    report(presenter, pipeline.run_single_url(&url).map(|_| ()));
                }
            }
            Method::LocalFile => {
                if let Some(file) = presenter.prompt_text("APK file name:")? {
                    report(presenter, pipeline.run_local_file(&file).map(|_| ()));
                }
            }
            Method::PackageBundle => {
                let result = pipeline.choose_bundle_file().and_then(|chosen| match chosen {
                    Some(file) => pipeline.run_bundle(&file).map(|_| ()),
                    None => Ok(()),
                });
                report(presenter, result);
            }
            Method::Quit => return Ok(()),
        }
    }
}

/// Show a failed step without leaving the menu
fn report(presenter: &dyn Presenter, result: Result<()>) {
    if let Err(e) = result {
        show_error(presenter, &e);
    }
}

fn show_error(presenter: &dyn Presenter, error: &ApkError) {
    presenter.notify(Notice::Error, &format!("Error: {error}"));
    if let Some(help) = error.help() {
        presenter.notify(Notice::Info, &help.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Device, InstallResult, PackageInstaller};
    use crate::release::{Release, ReleaseSource, RepositoryReference};
    use crate::test_fixtures::create_temp_dir;
    use crate::transfer::{DownloadTask, Downloader, Progress};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::Path;

    struct NoDownloads;

    impl Downloader for NoDownloads {
        fn fetch(
            &self,
            url: &str,
            _destination: &Path,
            _on_progress: &mut dyn FnMut(Progress),
        ) -> Result<DownloadTask> {
            Err(ApkError::Network {
                url: url.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    struct NoReleases;

    impl ReleaseSource for NoReleases {
        fn latest_release(&self, repository: &RepositoryReference) -> Result<Release> {
            Err(ApkError::NotFound {
                resource: repository.to_string(),
            })
        }
    }

    struct NoDevices;

    impl PackageInstaller for NoDevices {
        fn list_devices(&self) -> Result<Vec<Device>> {
            Ok(Vec::new())
        }

        fn install(&self, package: &Path) -> Result<InstallResult> {
            Err(ApkError::FileNotFound {
                path: package.display().to_string(),
            })
        }
    }

    #[derive(Default)]
    struct Script {
        menus: RefCell<VecDeque<Option<usize>>>,
        texts: RefCell<VecDeque<Option<String>>>,
        titles: RefCell<Vec<String>>,
        notices: RefCell<Vec<String>>,
    }

    impl Presenter for Script {
        fn show_menu(&self, title: &str, _options: &[&str]) -> Result<Option<usize>> {
            self.titles.borrow_mut().push(title.to_string());
            Ok(self.menus.borrow_mut().pop_front().flatten())
        }

        fn show_progress(&self, _progress: Progress) {}

        fn finish_progress(&self) {}

        fn prompt_text(&self, _label: &str) -> Result<Option<String>> {
            Ok(self.texts.borrow_mut().pop_front().flatten())
        }

        fn notify(&self, _notice: Notice, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }
    }

    fn run_script(menus: Vec<Option<usize>>, texts: Vec<Option<String>>) -> Script {
        let temp = create_temp_dir();
        let settings = Settings::for_base_dir(temp.path());
        let script = Script {
            menus: RefCell::new(menus.into()),
            texts: RefCell::new(texts.into()),
            ..Script::default()
        };
        let pipeline = Pipeline {
            settings: &settings,
            downloader: &NoDownloads,
            releases: &NoReleases,
            installer: &NoDevices,
            presenter: &script,
        };
        run_with(&pipeline).unwrap();
        script
    }

    #[test]
    fn test_quit_immediately() {
        let script = run_script(vec![Some(1), Some(3)], vec![]);
        assert_eq!(
            *script.titles.borrow(),
            vec![INSTALL_TOOLS_TITLE.to_string(), METHOD_TITLE.to_string()]
        );
    }

    #[test]
    fn test_escape_quits() {
        let script = run_script(vec![None, None], vec![]);
        assert_eq!(script.titles.borrow().len(), 2);
    }

    #[test]
    fn test_invalid_url_returns_to_menu() {
        let script = run_script(
            vec![Some(1), Some(0), Some(3)],
            vec![Some("https://example.com/app.zip".to_string())],
        );

        assert_eq!(script.titles.borrow().len(), 3);
        let notices = script.notices.borrow();
        assert!(notices.iter().any(|n| n.starts_with("Error: Invalid input")));
    }

    #[test]
    fn test_local_file_without_device_shows_help() {
        let script = run_script(
            vec![Some(1), Some(1), Some(3)],
            vec![Some("app.apk".to_string())],
        );

        let notices = script.notices.borrow();
        assert!(notices.iter().any(|n| n == "Error: No device connected"));
        assert!(notices.iter().any(|n| n.contains("USB debugging")));
    }

    #[test]
    fn test_bundle_without_files_returns_to_menu() {
        let script = run_script(vec![Some(1), Some(2), Some(3)], vec![]);

        let notices = script.notices.borrow();
        assert!(notices.contains(&"No Package-Bundle files found.".to_string()));
        assert_eq!(script.titles.borrow().len(), 3);
    }

    #[test]
    fn test_method_labels() {
        let labels: Vec<&str> = Method::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(
            labels,
            vec!["GitHub URL", "Local APK file", "Package bundle", "Quit"]
        );
    }
}
