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
use crate::{
    error, loud, louder, normal,
    pattern::{self, PatternSkeleton},
    provision::Provisioner,
    settings::{Database, ScaffyCli},
    template::{project_context, tera_init},
    util::ScaffyError,
};
use std::fs::{self, create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tera::{Context, Tera};
use walkdir::WalkDir;

pub struct ScaffyGenerator {
    cli: ScaffyCli,
}

impl ScaffyGenerator {
    pub fn new(cli: ScaffyCli) -> ScaffyGenerator {
        ScaffyGenerator { cli }
    }

    pub fn generate(&self) -> Result<(), ScaffyError> {
        let start = Instant::now();
        let spec = &self.cli.spec;

        normal!("Create the '{}' project...", spec.dest.display());
        self.scaffold()?;
        normal!("Project '{}' created", spec.dest.display());

        let failures = Provisioner::new(spec).run()?;
        if !failures.is_empty() {
            error!("WARNING: {} provisioning step(s) failed:", failures.len());
            for failure in &failures {
                error!(" - {}", failure);
            }
            error!("The project files were generated, but its environment is incomplete.");
        }

        normal!("done in {:.2}s", start.elapsed().as_secs_f32());
        if self.cli.should_open {
            let _ = open::that(&spec.dest);
        }
        Ok(())
    }

    /// Produces the complete project tree: copy, fill, rename, prune.
    /// Everything after this is environment provisioning.
    fn scaffold(&self) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        let skeleton = pattern::skeleton_for(&spec.pattern);
        let tera = tera_init(skeleton)?;
        let ctx = project_context(spec);

        self.copy_skeleton(skeleton)?;
        self.fill_templates(skeleton, &tera, &ctx)?;
        self.finalize_screen_names()?;
        self.rename_tmp_extensions()?;
        if spec.hotreload {
            self.create_hotreload_main(&tera, &ctx)?;
        }
        self.prune_features()?;
        Ok(())
    }

    /// Writes a file beneath the destination directory.  The containment
    /// check guards against a template or rename step escaping the tree
    /// being generated.
    fn write_file(&self, path: &Path, contents: &str) -> Result<(), ScaffyError> {
        let dest = &self.cli.spec.dest;
        assert!(
            path.starts_with(dest),
            "ERROR: output file {} not contained in project path: {}",
            path.display(),
            dest.display()
        );
        if let Some(dir) = path.parent() {
            create_dir_all(dir)?;
        }
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        louder!(" - wrote file: {}", path.display());
        Ok(())
    }

    fn copy_skeleton(&self, skeleton: &PatternSkeleton) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        loud!("Copy the {} pattern skeleton...", skeleton.name);
        create_dir_all(&spec.dest)?;
        for file in skeleton.files {
            self.write_file(&spec.dest.join(file.path), file.contents)?;
        }
        for dir in skeleton.dirs {
            create_dir_all(spec.dest.join(dir))?;
        }
        Ok(())
    }

    fn fill_templates(
        &self,
        skeleton: &PatternSkeleton,
        tera: &Tera,
        ctx: &Context,
    ) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        loud!("Fill the project templates...");
        for file in skeleton.files.iter().filter(|file| file.templated) {
            let rendered = tera.render(file.path, ctx)?;
            self.write_file(&spec.dest.join(file.path), &rendered)?;
        }
        Ok(())
    }

    /// Moves the `first_screen`/`FirstScreen` placeholders to the names
    /// derived from the requested screen class, and gives the screen its
    /// own `components` package.
    fn finalize_screen_names(&self) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        loud!("Rename the screen placeholders to '{}'...", spec.name_screen);
        let module = &spec.module_name;
        let renames = [
            (
                "Model/first_screen.py_tmp".to_string(),
                format!("Model/{}.py_tmp", module),
            ),
            (
                "Controller/first_screen.py_tmp".to_string(),
                format!("Controller/{}.py_tmp", module),
            ),
            (
                "View/FirstScreen/first_screen.py_tmp".to_string(),
                format!("View/FirstScreen/{}.py_tmp", module),
            ),
            (
                "View/FirstScreen/first_screen.kv".to_string(),
                format!("View/FirstScreen/{}.kv", module),
            ),
        ];
        for (from, to) in &renames {
            fs::rename(spec.dest.join(from), spec.dest.join(to))?;
        }
        let screen_dir = spec.dest.join("View").join(&spec.name_screen);
        fs::rename(spec.dest.join("View/FirstScreen"), &screen_dir)?;
        self.write_file(&screen_dir.join("components").join("__init__.py"), "")?;
        Ok(())
    }

    /// The single tree walk renaming every placeholder-extension file to
    /// the real source extension.  After this no `.py_tmp` file may remain.
    fn rename_tmp_extensions(&self) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        loud!("Rename the placeholder extensions...");
        let pending: Vec<PathBuf> = WalkDir::new(&spec.dest)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path().to_path_buf())
            .filter(|path| path.extension().map(|ext| ext == pattern::TMP_EXT).unwrap_or(false))
            .collect();
        for path in pending {
            let renamed = path.with_extension(pattern::FINAL_EXT);
            fs::rename(&path, &renamed)?;
            louder!(" - renamed: {}", renamed.display());
        }
        Ok(())
    }

    /// Replaces `main.py` with the hot-reload entry point.  The plain
    /// entry point is preserved below it, fully commented out, so the
    /// finished project can switch back by uncommenting.
    fn create_hotreload_main(&self, tera: &Tera, ctx: &Context) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        loud!("Create the hot reload entry point...");
        let main_path = spec.dest.join("main.py");
        let plain = fs::read_to_string(&main_path)?;
        let mut ctx = ctx.clone();
        ctx.insert("original", &plain);
        let rendered = tera.render(pattern::HOTRELOAD_MAIN, &ctx)?;
        self.write_file(&main_path, &rendered)?;
        Ok(())
    }

    /// Removes the files of unselected features.  Runs only after the
    /// filler so that every kept template has already been rendered.
    fn prune_features(&self) -> Result<(), ScaffyError> {
        let spec = &self.cli.spec;
        match &spec.database {
            Some(database) => {
                loud!("Keep the {} database wrapper...", database.as_str());
                fs::remove_file(spec.dest.join(database.other().module_file()))?;
                fs::rename(
                    spec.dest.join(database.module_file()),
                    spec.dest.join("Model/database.py"),
                )?;
            }
            None => {
                for database in [Database::Firebase, Database::Restdb] {
                    fs::remove_file(spec.dest.join(database.module_file()))?;
                }
            }
        }
        if !spec.localization {
            loud!("Remove the localization scaffold...");
            fs::remove_file(spec.dest.join("messages.pot"))?;
            fs::remove_file(spec.dest.join("libs/translation.py"))?;
            fs::remove_file(spec.dest.join("Makefile"))?;
            fs::remove_dir_all(spec.dest.join("data"))?;
        }
        Ok(())
    }
}
