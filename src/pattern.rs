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
use crate::settings::Pattern;

/// Extension marking a skeleton file that still awaits template filling.
/// Every file carrying it is renamed to the real source extension in a
/// single tree walk at the end of the filler stage.
pub const TMP_EXT: &str = "py_tmp";
pub const FINAL_EXT: &str = "py";

/// Name of the auxiliary template holding the hot-reload entry point.  It
/// is rendered over the plain `main.py` instead of being copied into the
/// project tree.
pub const HOTRELOAD_MAIN: &str = "hotreload_main.py_tmp";

pub struct PatternFile {
    /// Destination path, relative to the project root.
    pub path: &'static str,
    pub contents: &'static str,
    /// Whether the file is rendered against the project context after the
    /// copy stage, or copied verbatim.
    pub templated: bool,
}

pub struct PatternSkeleton {
    pub name: &'static str,
    pub files: &'static [PatternFile],
    /// Empty directories the skeleton ships without any files.
    pub dirs: &'static [&'static str],
    /// Templates registered with the engine but never copied to disk.
    pub aux_templates: &'static [(&'static str, &'static str)],
}

pub fn skeleton_for(pattern: &Pattern) -> &'static PatternSkeleton {
    match pattern {
        Pattern::Mvc => &MVC,
    }
}

macro_rules! mvc_file {
    ($path:literal, $templated:expr) => {
        PatternFile {
            path: $path,
            contents: include_str!(concat!("../patterns/MVC/", $path)),
            templated: $templated,
        }
    };
}

pub static MVC: PatternSkeleton = PatternSkeleton {
    name: "MVC",
    files: &[
        mvc_file!("main.py_tmp", true),
        mvc_file!("Makefile", true),
        mvc_file!("messages.pot", false),
        mvc_file!("Model/__init__.py", false),
        mvc_file!("Model/base_model.py", false),
        mvc_file!("Model/database_firebase.py", false),
        mvc_file!("Model/database_restdb.py", false),
        mvc_file!("Model/first_screen.py_tmp", true),
        mvc_file!("Controller/__init__.py", false),
        mvc_file!("Controller/first_screen.py_tmp", true),
        mvc_file!("View/__init__.py", false),
        mvc_file!("View/screens.py_tmp", true),
        mvc_file!("View/base_screen.py_tmp", true),
        mvc_file!("View/FirstScreen/__init__.py", false),
        mvc_file!("View/FirstScreen/first_screen.py_tmp", true),
        mvc_file!("View/FirstScreen/first_screen.kv", true),
        mvc_file!("Utility/__init__.py", false),
        mvc_file!("Utility/observer.py", false),
        mvc_file!("libs/__init__.py", false),
        mvc_file!("libs/translation.py", false),
    ],
    dirs: &["assets/images", "assets/fonts", "data/locales/po"],
    aux_templates: &[(HOTRELOAD_MAIN, include_str!("../patterns/MVC/hotreload_main.py_tmp"))],
};

/// Requirements manifest for a project without a database wrapper.
pub const BASE_REQUIREMENTS: &str = "kivy==2.1.0
kivymd==1.0.0
";

/// Requirements manifest for a project with a database wrapper.
pub const DATABASE_REQUIREMENTS: &str = "kivy==2.1.0
kivymd==1.0.0
multitasking
firebase
firebase-admin
python_jwt
gcloud
sseclient
pycryptodome==3.4.3
requests_toolbelt
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_templated_file_is_a_template_or_kv_or_makefile() {
        for file in MVC.files {
            if file.templated {
                assert!(
                    file.path.ends_with(TMP_EXT) || file.path.ends_with(".kv") || file.path.ends_with("Makefile"),
                    "unexpected templated file: {}",
                    file.path
                );
            }
        }
    }

    #[test]
    fn skeleton_paths_are_relative_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for file in MVC.files {
            assert!(!file.path.starts_with('/'), "absolute path in skeleton: {}", file.path);
            assert!(seen.insert(file.path), "duplicate path in skeleton: {}", file.path);
        }
    }

    #[test]
    fn base_requirements_pin_framework_and_templating_library_only() {
        let lines: Vec<&str> = BASE_REQUIREMENTS.lines().collect();
        assert_eq!(lines, vec!["kivy==2.1.0", "kivymd==1.0.0"]);
    }
}
