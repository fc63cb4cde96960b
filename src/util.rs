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
use std::error::Error as StdError;
use std::sync::atomic::AtomicUsize;

pub static VERBOSITY: AtomicUsize = AtomicUsize::new(0);

#[macro_export]
#[allow(unused_macros)]
macro_rules! always {
    () => { println!() };
    ($($arg:tt)*) => {{ println!($($arg)*); }};
}

#[macro_export]
#[allow(unused_macros)]
macro_rules! error {
    () => { eprintln!() };
    ($($arg:tt)*) => {{ eprintln!($($arg)*); }};
}

#[macro_export]
#[allow(unused_macros)]
macro_rules! normal {
    () => { if crate::util::VERBOSITY.load(Ordering::Relaxed) > 0 { println!() } };
    ($($arg:tt)*) => {{ if crate::util::VERBOSITY.load(Ordering::Relaxed) > 0 { println!($($arg)*); } }};
}

#[macro_export]
#[allow(unused_macros)]
macro_rules! normal_noln {
    () => { if crate::util::VERBOSITY.load(Ordering::Relaxed) > 0 { print!(); let _ = std::io::stdout().flush(); } };
    ($($arg:tt)*) => { if crate::util::VERBOSITY.load(Ordering::Relaxed) > 0 { {print!($($arg)*);}; let _ = std::io::stdout().flush(); }};
}

#[macro_export]
#[allow(unused_macros)]
macro_rules! loud {
    () => { if crate::util::VERBOSITY.load(Ordering::Relaxed) > 1 { println!() } };
    ($($arg:tt)*) => {{ if crate::util::VERBOSITY.load(Ordering::Relaxed) > 1 { println!($($arg)*); } }};
}

#[macro_export]
#[allow(unused_macros)]
macro_rules! louder {
    () => { if crate::util::VERBOSITY.load(Ordering::Relaxed) > 2 { println!() } };
    ($($arg:tt)*) => {{ if crate::util::VERBOSITY.load(Ordering::Relaxed) > 2 { println!($($arg)*); } }};
}

#[macro_export]
#[allow(unused_macros)]
macro_rules! loudest {
    () => { if crate::util::VERBOSITY.load(Ordering::Relaxed) > 3 { println!() } };
    ($($arg:tt)*) => {{ if crate::util::VERBOSITY.load(Ordering::Relaxed) > 3 { println!($($arg)*); } }};
}

#[derive(Default, Clone)]
#[allow(dead_code)]
pub enum ScaffyErrorKind {
    #[default]
    Unknown,
    Settings,
    Template,
    Filesystem,
    Process,
}

#[derive(Default)]
pub struct ScaffyError {
    msg: Option<String>,
    kind: ScaffyErrorKind,
    source: Option<Box<dyn std::error::Error>>,
}

#[allow(dead_code)]
impl ScaffyError {
    pub fn kind(kind: ScaffyErrorKind, msg: Option<&str>) -> Self {
        ScaffyError {
            kind,
            msg: msg.map(|x| x.to_owned()),
            source: None,
        }
    }
    pub fn sourced_kind(kind: ScaffyErrorKind, msg: Option<&str>, source: impl std::error::Error + 'static) -> Self {
        ScaffyError {
            kind,
            msg: msg.map(|x| x.to_owned()),
            source: Some(Box::new(source)),
        }
    }
    pub fn message(&self) -> String {
        match &self.msg {
            Some(msg) => msg.clone(),
            None => self.to_string(),
        }
    }
}
impl std::fmt::Display for ScaffyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ScaffyErrorKind::Settings => write!(f, "scaffy error (settings)")?,
            ScaffyErrorKind::Template => write!(f, "scaffy error (template)")?,
            ScaffyErrorKind::Filesystem => write!(f, "scaffy error (filesystem)")?,
            ScaffyErrorKind::Process => write!(f, "scaffy error (process)")?,
            ScaffyErrorKind::Unknown => write!(f, "scaffy error (unknown)")?,
        }
        write!(f, ": {}", self.msg.as_deref().unwrap_or_default())?;
        if let Some(src) = &self.source {
            write!(f, " ({})", src)?;
        }
        Ok(())
    }
}
impl std::fmt::Debug for ScaffyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
impl std::error::Error for ScaffyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|c| &**c as &(dyn StdError + 'static))
    }
}
impl From<tera::Error> for ScaffyError {
    fn from(source: tera::Error) -> Self {
        ScaffyError::sourced_kind(ScaffyErrorKind::Template, Some(&source.to_string()), source)
    }
}
impl From<std::io::Error> for ScaffyError {
    fn from(source: std::io::Error) -> Self {
        ScaffyError::sourced_kind(ScaffyErrorKind::Filesystem, Some(&source.to_string()), source)
    }
}
impl From<toml::de::Error> for ScaffyError {
    fn from(source: toml::de::Error) -> Self {
        ScaffyError::sourced_kind(ScaffyErrorKind::Settings, Some(&source.to_string()), source)
    }
}
