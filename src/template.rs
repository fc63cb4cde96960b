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
use crate::pattern::PatternSkeleton;
use crate::settings::ProjectSpec;
use crate::util::ScaffyError;
use std::collections::HashMap;
use tera::{to_value, try_get_value, Context, Filter, Tera, Value};

/// Prefixes every line of the input with `# `, turning it into a Python
/// comment block.  The hot-reload entry point uses this to keep the plain
/// entry point available below the generated code.
pub struct CommentOutFilter;
impl Filter for CommentOutFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> Result<Value, tera::Error> {
        let text: String = try_get_value!("comment_out", "value", String, value);
        let commented: Vec<String> = text
            .lines()
            .map(|line| match line.is_empty() {
                true => "#".to_string(),
                false => format!("# {}", line),
            })
            .collect();
        Ok(to_value(commented.join("\n")).unwrap())
    }
}

pub fn tera_init(skeleton: &PatternSkeleton) -> Result<Tera, ScaffyError> {
    let mut templates: Vec<(&str, &str)> = skeleton
        .files
        .iter()
        .filter(|file| file.templated)
        .map(|file| (file.path, file.contents))
        .collect();
    templates.extend(skeleton.aux_templates.iter().cloned());
    let mut tera = Tera::default();
    tera.add_raw_templates(templates)?;
    tera.register_filter("comment_out", CommentOutFilter {});
    Ok(tera)
}

/// Builds the named substitution context shared by every template of a
/// pattern.  Feature selection happens inside the templates with `{% if %}`
/// blocks over the boolean keys.
pub fn project_context(spec: &ProjectSpec) -> Context {
    let mut ctx = Context::new();
    ctx.insert("project_name", &spec.project_name);
    ctx.insert("name_screen", &spec.name_screen);
    ctx.insert("module_name", &spec.module_name);
    ctx.insert("screen_title", &spec.screen_title);
    ctx.insert("database", &spec.database.is_some());
    if let Some(database) = &spec.database {
        ctx.insert("database_name", database.as_str());
    }
    ctx.insert("hotreload", &spec.hotreload);
    ctx.insert("localization", &spec.localization);
    // With hot reload on, the controller cannot import the view class
    // directly: the view module is reloaded at runtime, so the class is
    // referenced through its full module path.
    let name_view = match spec.hotreload {
        true => format!(
            "View.{}.{}.{}View",
            spec.name_screen, spec.module_name, spec.name_screen
        ),
        false => format!("{}View", spec.name_screen),
    };
    ctx.insert("name_view", &name_view);
    let generated_dt = chrono::offset::Local::now();
    ctx.insert("generated_on", &generated_dt.format("%Y-%m-%d").to_string());
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern;
    use crate::settings::{Database, KivyVersion, Pattern};
    use std::path::PathBuf;

    fn test_spec() -> ProjectSpec {
        ProjectSpec {
            pattern: Pattern::Mvc,
            dest: PathBuf::from("/tmp/TestProject"),
            project_name: "TestProject".to_string(),
            python_version: "python3.10".to_string(),
            kivy_version: KivyVersion::Exact("2.1.0".to_string()),
            name_screen: "UserLoginScreen".to_string(),
            module_name: "user_login".to_string(),
            screen_title: "user login".to_string(),
            database: None,
            hotreload: false,
            localization: false,
        }
    }

    #[test]
    fn comment_out_prefixes_every_line() {
        let filter = CommentOutFilter {};
        let value = to_value("first\n\nsecond\n").unwrap();
        let commented = filter.filter(&value, &HashMap::new()).unwrap();
        assert_eq!(commented.as_str().unwrap(), "# first\n#\n# second");
    }

    #[test]
    fn context_carries_named_keys() {
        let ctx = project_context(&test_spec());
        let json = ctx.into_json();
        assert_eq!(json["project_name"], "TestProject");
        assert_eq!(json["module_name"], "user_login");
        assert_eq!(json["screen_title"], "user login");
        assert_eq!(json["database"], false);
        assert_eq!(json["name_view"], "UserLoginScreenView");
    }

    #[test]
    fn hotreload_view_is_referenced_by_module_path() {
        let mut spec = test_spec();
        spec.hotreload = true;
        let ctx = project_context(&spec);
        assert_eq!(
            ctx.into_json()["name_view"],
            "View.UserLoginScreen.user_login.UserLoginScreenView"
        );
    }

    #[test]
    fn database_name_is_present_only_with_a_backend() {
        let mut spec = test_spec();
        spec.database = Some(Database::Restdb);
        let json = project_context(&spec).into_json();
        assert_eq!(json["database"], true);
        assert_eq!(json["database_name"], "restdb");
        let json = project_context(&test_spec()).into_json();
        assert!(json.get("database_name").is_none());
    }

    #[test]
    fn screens_template_renders_with_screen_names() {
        let tera = tera_init(pattern::skeleton_for(&Pattern::Mvc)).unwrap();
        let rendered = tera.render("View/screens.py_tmp", &project_context(&test_spec())).unwrap();
        assert!(rendered.contains("from Model.user_login import UserLoginScreenModel"));
        assert!(rendered.contains("\"user login\": {"));
        assert!(!rendered.contains("{{"));
    }
}
