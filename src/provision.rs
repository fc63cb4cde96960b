/*
 * Copyright 2024 the Scaffy authors
 *
 * This file is part of Scaffy.
 *
 * Scaffy is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Scaffy is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Scaffy.  If not, see <http://www.gnu.org/licenses/>.
 */
use crate::pattern;
use crate::settings::{Database, KivyVersion, ProjectSpec};
use crate::util::ScaffyError;
use crate::{error, loud, loudest, normal};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::Ordering;

/// Seed translations for the second supported language.  This is a fixture
/// over four fixed phrases, not a generic translation mechanism.
pub static PHRASE_SEEDS: &[(&str, &str)] = &[
    (
        "To log in, enter your personal data:",
        "Для входа введите свои личные данные",
    ),
    ("Login", "Логин"),
    ("Password", "Пароль"),
    ("LOGIN", "ЛОГИН"),
];

pub static FIREBASE_PIP_PACKAGES: &[&str] = &[
    "multitasking",
    "firebase",
    "firebase-admin",
    "python_jwt",
    "gcloud",
    "sseclient",
    "pycryptodome==3.4.3",
    "requests_toolbelt",
    "watchdog",
];

const KIVY_MASTER_ARCHIVE: &str = "https://github.com/kivy/kivy/archive/master.zip";
const KIVYMD_MASTER_ARCHIVE: &str = "https://github.com/kivymd/KivyMD/archive/master.zip";

/// Outcome of a single external invocation that did not succeed.
pub struct StepFailure {
    label: String,
    detail: String,
}

impl StepFailure {
    fn new(label: &str, detail: &str) -> Self {
        StepFailure {
            label: label.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.detail)
    }
}

/// Runs the external tooling sequence for a generated project: the
/// requirements manifest, the localization catalogs, the virtual
/// environment and the dependency installs.  External failures are
/// captured and aggregated instead of aborting generation; only writes
/// into our own project tree are fatal.
pub struct Provisioner<'a> {
    spec: &'a ProjectSpec,
    failures: Vec<StepFailure>,
}

impl<'a> Provisioner<'a> {
    pub fn new(spec: &'a ProjectSpec) -> Self {
        Provisioner {
            spec,
            failures: vec![],
        }
    }

    pub fn run(mut self) -> Result<Vec<StepFailure>, ScaffyError> {
        self.write_requirements()?;
        if self.spec.localization {
            normal!("Create localization files...");
            self.build_locale_catalogs();
        }
        normal!(
            "Create a virtual environment for the '{}' project...",
            self.spec.dest.display()
        );
        self.create_virtual_environment();
        normal!(
            "Install requirements for the '{}' project...",
            self.spec.dest.display()
        );
        self.install_requirements();
        Ok(self.failures)
    }

    fn write_requirements(&self) -> Result<(), ScaffyError> {
        let mut requirements = match self.spec.database {
            Some(_) => pattern::DATABASE_REQUIREMENTS.to_string(),
            None => pattern::BASE_REQUIREMENTS.to_string(),
        };
        if self.spec.hotreload {
            requirements.push_str("watchdog\n");
        }
        fs::write(self.spec.dest.join("requirements.txt"), requirements)?;
        Ok(())
    }

    fn build_locale_catalogs(&mut self) {
        self.run_step(
            "extract message catalog (make po)",
            Command::new("make").arg("po").current_dir(&self.spec.dest),
        );
        self.seed_locale_catalog();
        self.run_step(
            "compile message catalog (make mo)",
            Command::new("make").arg("mo").current_dir(&self.spec.dest),
        );
    }

    /// Patches the extracted `ru.po` with the fixed phrase translations.
    /// The file only exists if the extraction step succeeded, so a missing
    /// catalog is recorded as a step failure rather than a fatal error.
    fn seed_locale_catalog(&mut self) {
        let path = self.spec.dest.join("data/locales/po/ru.po");
        let seeded = match fs::read_to_string(&path) {
            Ok(catalog) => seed_catalog(&catalog),
            Err(e) => {
                self.failures
                    .push(StepFailure::new("seed ru.po", &e.to_string()));
                return;
            }
        };
        if let Err(e) = fs::write(&path, seeded) {
            self.failures
                .push(StepFailure::new("seed ru.po", &e.to_string()));
        }
    }

    fn create_virtual_environment(&mut self) {
        let python = self.spec.python_version.clone();
        self.run_step(
            "install virtualenv",
            Command::new(&python).args(["-m", "pip", "install", "virtualenv"]),
        );
        self.run_step(
            "create virtual environment",
            Command::new("virtualenv")
                .arg("-p")
                .arg(&python)
                .arg(self.spec.dest.join("venv")),
        );
    }

    fn venv_python(&self) -> PathBuf {
        self.spec.dest.join("venv").join("bin").join("python3")
    }

    fn install_requirements(&mut self) {
        let kivy_spec = match &self.spec.kivy_version {
            // macOS needs the extras spelling for the source archive.
            KivyVersion::Master => match cfg!(target_os = "macos") {
                true => format!("kivy[base] @ {}", KIVY_MASTER_ARCHIVE),
                false => KIVY_MASTER_ARCHIVE.to_string(),
            },
            KivyVersion::Stable => "kivy".to_string(),
            KivyVersion::Exact(version) => format!("kivy=={}", version),
        };
        self.pip_install("install kivy", &[kivy_spec.as_str()]);
        self.pip_install("install kivymd", &[KIVYMD_MASTER_ARCHIVE]);
        self.pip_install("install watchdog", &["watchdog"]);
        if self.spec.database == Some(Database::Firebase) {
            self.pip_install("install firebase requirements", FIREBASE_PIP_PACKAGES);
        }
        self.run_step(
            "pip list",
            Command::new(self.venv_python()).args(["-m", "pip", "list"]),
        );
    }

    fn pip_install(&mut self, label: &str, packages: &[&str]) {
        self.run_step(
            label,
            Command::new(self.venv_python())
                .args(["-m", "pip", "install"])
                .args(packages),
        );
    }

    fn run_step(&mut self, label: &str, cmd: &mut Command) {
        loud!(" - {}", label);
        match cmd.output() {
            Ok(output) if output.status.success() => {
                loudest!("{}", String::from_utf8_lossy(&output.stdout));
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = format!("exited with {} ({})", output.status, stderr.trim());
                error!("WARNING: {} {}", label, detail);
                self.failures.push(StepFailure::new(label, &detail));
            }
            Err(e) => {
                let detail = format!("failed to start ({})", e);
                error!("WARNING: {} {}", label, detail);
                self.failures.push(StepFailure::new(label, &detail));
            }
        }
    }
}

pub fn seed_catalog(catalog: &str) -> String {
    let mut catalog = catalog.to_string();
    for (msgid, msgstr) in PHRASE_SEEDS {
        catalog = catalog.replace(
            &format!("msgid \"{}\"\nmsgstr \"\"", msgid),
            &format!("msgid \"{}\"\nmsgstr \"{}\"", msgid, msgstr),
        );
    }
    catalog
}
