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
use crate::util::{ScaffyError, ScaffyErrorKind};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

pub const DEFAULT_NAME_SCREEN: &str = "HomePageScreen";
pub const SCREEN_SUFFIX: &str = "Screen";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(help_template = "\
{name} v{version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
")]
struct CliArgs {
    /// Name of the pattern with which the project will be created
    #[arg(value_enum)]
    pattern: Pattern,
    /// Directory in which the project will be created
    directory: PathBuf,
    /// Project name
    name: String,
    /// Python interpreter (specify as `python3.9` or `python3.10`) with
    /// which the virtual environment will be created
    python_version: String,
    /// Version of Kivy (specify as `2.1.0`, `master` or `stable`) that
    /// will be used in the project
    kivy_version: String,
    /// Class name of the project screen.  Upper camel case, at least two
    /// words before the mandatory `Screen` suffix.
    #[arg(long, value_name = "NAME")]
    name_screen: Option<String>,
    /// Database provider whose wrapper will be included in the model
    #[arg(long, value_enum, value_name = "PROVIDER")]
    database: Option<Database>,
    /// Create a hot reload entry point to the application
    #[arg(long)]
    hotreload: bool,
    /// Create application localization files
    #[arg(long)]
    localization: bool,
    /// Path to a TOML file with default generation options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Open the project directory after generation
    #[arg(long)]
    open: bool,
    /// Don't show any output, except errors and warnings
    #[arg(short, long)]
    quiet: bool,
    /// Increase verbosity of output.  Specify up to 4 times.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Model-View-Controller project layout
    #[value(name = "MVC")]
    Mvc,
}

#[derive(ValueEnum, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    /// Basic wrapper for the Firebase realtime database
    Firebase,
    /// Full wrapper for the restdb.io database
    Restdb,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Firebase => "firebase",
            Database::Restdb => "restdb",
        }
    }
    /// Skeleton path of this provider's wrapper module.
    pub fn module_file(&self) -> &'static str {
        match self {
            Database::Firebase => "Model/database_firebase.py",
            Database::Restdb => "Model/database_restdb.py",
        }
    }
    pub fn other(&self) -> Database {
        match self {
            Database::Firebase => Database::Restdb,
            Database::Restdb => Database::Firebase,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KivyVersion {
    Master,
    Stable,
    Exact(String),
}

impl KivyVersion {
    pub fn parse(raw: &str) -> KivyVersion {
        match raw {
            "master" => KivyVersion::Master,
            "stable" => KivyVersion::Stable,
            _ => KivyVersion::Exact(raw.to_string()),
        }
    }
}

/// Optional defaults loaded from a `--config` TOML file.  Command line
/// values always win over configured ones.
#[derive(Deserialize, Debug, Default)]
pub struct ScaffyDefaults {
    pub name_screen: Option<String>,
    pub database: Option<Database>,
    pub hotreload: Option<bool>,
    pub localization: Option<bool>,
}

impl ScaffyDefaults {
    pub fn load(path: &Path) -> Result<ScaffyDefaults, ScaffyError> {
        let raw = read_to_string(path).map_err(|source| {
            ScaffyError::sourced_kind(
                ScaffyErrorKind::Settings,
                Some(&format!("configuration file not found: {}", path.display())),
                source,
            )
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

/// The resolved, validated set of generation parameters.  Built once from
/// the command line and config defaults, immutable afterwards.
#[derive(Debug)]
pub struct ProjectSpec {
    pub pattern: Pattern,
    pub dest: PathBuf,
    pub project_name: String,
    pub python_version: String,
    pub kivy_version: KivyVersion,
    pub name_screen: String,
    pub module_name: String,
    pub screen_title: String,
    pub database: Option<Database>,
    pub hotreload: bool,
    pub localization: bool,
}

impl ProjectSpec {
    /// Validates every argument before any filesystem mutation happens.
    fn resolve(args: &CliArgs, defaults: &ScaffyDefaults) -> Result<ProjectSpec, ScaffyError> {
        if !args.python_version.contains('3') {
            return Err(settings_error("Python must be at least version 3"));
        }
        let project_name = squash_whitespace(&args.name);
        let name_screen = args
            .name_screen
            .clone()
            .or_else(|| defaults.name_screen.clone())
            .unwrap_or_else(|| DEFAULT_NAME_SCREEN.to_string());
        let name_screen = squash_whitespace(&name_screen);
        let module_name = screen_module_name(&name_screen)?;
        let screen_title = module_name.replace('_', " ");
        let dest = args.directory.join(&project_name);
        if dest.exists() {
            return Err(settings_error(&format!(
                "The {} project already exists",
                dest.display()
            )));
        }
        Ok(ProjectSpec {
            pattern: args.pattern,
            dest,
            project_name,
            python_version: args.python_version.clone(),
            kivy_version: KivyVersion::parse(&args.kivy_version),
            name_screen,
            module_name,
            screen_title,
            database: args.database.or(defaults.database),
            hotreload: args.hotreload || defaults.hotreload.unwrap_or(false),
            localization: args.localization || defaults.localization.unwrap_or(false),
        })
    }
}

pub struct ScaffyCli {
    pub spec: ProjectSpec,
    pub should_open: bool,
}

impl ScaffyCli {
    pub fn new() -> Self {
        let cli = CliArgs::parse();
        crate::util::VERBOSITY.store(
            match cli.quiet {
                true => 0,
                false => (cli.verbose + 1).into(),
            },
            Ordering::Relaxed,
        );
        let defaults = match cli.config.as_deref() {
            Some(path) => match ScaffyDefaults::load(path) {
                Ok(defaults) => defaults,
                Err(e) => {
                    let mut cmd = CliArgs::command();
                    cmd.error(ErrorKind::ValueValidation, e.message()).exit();
                }
            },
            None => ScaffyDefaults::default(),
        };
        let spec = match ProjectSpec::resolve(&cli, &defaults) {
            Ok(spec) => spec,
            Err(e) => {
                let mut cmd = CliArgs::command();
                cmd.error(ErrorKind::ValueValidation, e.message()).exit();
            }
        };
        ScaffyCli {
            spec,
            should_open: cli.open,
        }
    }
}

fn settings_error(msg: &str) -> ScaffyError {
    ScaffyError::kind(ScaffyErrorKind::Settings, Some(msg))
}

pub fn squash_whitespace(name: &str) -> String {
    name.split_whitespace().collect()
}

/// Splits an upper-camel-case string into its lowercased words.  Returns
/// `None` for anything that is not strictly upper camel case.
fn camel_case_words(name: &str) -> Option<Vec<String>> {
    let mut words: Vec<String> = vec![];
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            words.push(c.to_ascii_lowercase().to_string());
        } else if c.is_ascii_lowercase() {
            words.last_mut()?.push(c);
        } else {
            return None;
        }
    }
    match words.is_empty() {
        true => None,
        false => Some(words),
    }
}

/// Derives the snake case module name from a screen class name:
/// `UserLoginScreen` becomes `user_login`.  The `Screen` suffix is
/// mandatory and the part before it must hold at least two camel case
/// words.
pub fn screen_module_name(name_screen: &str) -> Result<String, ScaffyError> {
    let base = name_screen.strip_suffix(SCREEN_SUFFIX).ok_or_else(|| {
        settings_error(
            "Name of the screen must contain the word 'Screen' at the end. \
             \nFor example - '... --name-screen MyFirstScreen'",
        )
    })?;
    let words = camel_case_words(base).filter(|words| words.len() >= 2).ok_or_else(|| {
        settings_error(
            "The name of the screen should be written in camel case style \
             with at least two words. \nFor example - 'MyFirstScreen'",
        )
    })?;
    Ok(words.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_args(directory: &Path) -> CliArgs {
        CliArgs {
            pattern: Pattern::Mvc,
            directory: directory.to_path_buf(),
            name: "My MVC Project".to_string(),
            python_version: "python3.10".to_string(),
            kivy_version: "2.1.0".to_string(),
            name_screen: None,
            database: None,
            hotreload: false,
            localization: false,
            config: None,
            open: false,
            quiet: false,
            verbose: 0,
        }
    }

    #[test]
    fn project_name_whitespace_is_squashed() {
        assert_eq!(squash_whitespace("My MVC Project"), "MyMVCProject");
        assert_eq!(squash_whitespace("NoSpaces"), "NoSpaces");
    }

    #[test]
    fn screen_module_name_strips_suffix_and_snake_cases() {
        assert_eq!(screen_module_name("UserLoginScreen").unwrap(), "user_login");
        assert_eq!(screen_module_name("MyFirstScreen").unwrap(), "my_first");
    }

    #[test]
    fn single_word_screen_name_is_rejected() {
        assert!(screen_module_name("LoginScreen").is_err());
    }

    #[test]
    fn screen_name_without_suffix_is_rejected() {
        assert!(screen_module_name("UserLoginView").is_err());
    }

    #[test]
    fn screen_name_must_be_camel_case() {
        assert!(screen_module_name("userLoginScreen").is_err());
        assert!(screen_module_name("User1LoginScreen").is_err());
        assert!(screen_module_name("user_login_screen").is_err());
    }

    #[test]
    fn kivy_version_parses_into_closed_variants() {
        assert_eq!(KivyVersion::parse("master"), KivyVersion::Master);
        assert_eq!(KivyVersion::parse("stable"), KivyVersion::Stable);
        assert_eq!(KivyVersion::parse("2.1.0"), KivyVersion::Exact("2.1.0".to_string()));
    }

    #[test]
    fn resolve_builds_a_spec_with_derived_names() {
        let dir = TempDir::new().unwrap();
        let spec = ProjectSpec::resolve(&cli_args(dir.path()), &ScaffyDefaults::default()).unwrap();
        assert_eq!(spec.project_name, "MyMVCProject");
        assert_eq!(spec.dest, dir.path().join("MyMVCProject"));
        assert_eq!(spec.name_screen, DEFAULT_NAME_SCREEN);
        assert_eq!(spec.module_name, "home_page");
        assert_eq!(spec.screen_title, "home page");
        assert!(spec.database.is_none());
    }

    #[test]
    fn resolve_rejects_python_without_major_marker() {
        let dir = TempDir::new().unwrap();
        let mut args = cli_args(dir.path());
        args.python_version = "python2.7".to_string();
        assert!(ProjectSpec::resolve(&args, &ScaffyDefaults::default()).is_err());
    }

    #[test]
    fn resolve_rejects_existing_destination() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("MyMVCProject")).unwrap();
        let err = ProjectSpec::resolve(&cli_args(dir.path()), &ScaffyDefaults::default()).unwrap_err();
        assert!(err.message().contains("already exists"));
    }

    #[test]
    fn config_defaults_fill_unset_options() {
        let dir = TempDir::new().unwrap();
        let defaults = ScaffyDefaults {
            name_screen: Some("UserLoginScreen".to_string()),
            database: Some(Database::Restdb),
            hotreload: Some(true),
            localization: None,
        };
        let spec = ProjectSpec::resolve(&cli_args(dir.path()), &defaults).unwrap();
        assert_eq!(spec.name_screen, "UserLoginScreen");
        assert_eq!(spec.database, Some(Database::Restdb));
        assert!(spec.hotreload);
        assert!(!spec.localization);
    }

    #[test]
    fn command_line_wins_over_config_defaults() {
        let dir = TempDir::new().unwrap();
        let mut args = cli_args(dir.path());
        args.database = Some(Database::Firebase);
        let defaults = ScaffyDefaults {
            database: Some(Database::Restdb),
            ..Default::default()
        };
        let spec = ProjectSpec::resolve(&args, &defaults).unwrap();
        assert_eq!(spec.database, Some(Database::Firebase));
    }

    #[test]
    fn defaults_parse_from_toml() {
        let defaults: ScaffyDefaults = toml::from_str(
            "name_screen = \"UserLoginScreen\"\ndatabase = \"firebase\"\nlocalization = true\n",
        )
        .unwrap();
        assert_eq!(defaults.name_screen.as_deref(), Some("UserLoginScreen"));
        assert_eq!(defaults.database, Some(Database::Firebase));
        assert_eq!(defaults.localization, Some(true));
        assert!(toml::from_str::<ScaffyDefaults>("database = \"mysql\"").is_err());
    }

    #[test]
    fn unknown_pattern_and_database_are_parser_errors() {
        assert!(CliArgs::try_parse_from([
            "scaffy", "MVP", "/tmp", "Demo", "python3.10", "2.1.0",
        ])
        .is_err());
        assert!(CliArgs::try_parse_from([
            "scaffy", "MVC", "/tmp", "Demo", "python3.10", "2.1.0", "--database", "mysql",
        ])
        .is_err());
        assert!(CliArgs::try_parse_from([
            "scaffy", "MVC", "/tmp", "Demo", "python3.10", "2.1.0", "--database", "restdb",
        ])
        .is_ok());
    }
}
