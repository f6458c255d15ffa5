//! Book renderer.

use super::{BookPage, TemplateError, PAGE_TEMPLATE, README_TEMPLATE, SUMMARY_TEMPLATE};
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (log content is embedded verbatim)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders the markdown files of a book and its toolchain arguments.
pub struct BookRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for BookRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BookRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the book's introduction page.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_readme(&self, name: &str) -> Result<String, TemplateError> {
        self.render_template(README_TEMPLATE, &json!({ "name": name }))
    }

    /// Renders one page: the title as heading, the log content as body.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_page(&self, title: &str, body: &str) -> Result<String, TemplateError> {
        self.render_template(PAGE_TEMPLATE, &json!({ "title": title, "body": body }))
    }

    /// Renders the summary index linking every page.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(&self, name: &str, pages: &[BookPage]) -> Result<String, TemplateError> {
        let pages: Vec<Value> = pages
            .iter()
            .map(|p| json!({ "title": p.title, "file": p.file_name }))
            .collect();
        self.render_template(SUMMARY_TEMPLATE, &json!({ "name": name, "pages": pages }))
    }

    /// Renders a toolchain argv, substituting `{{name}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if any argument fails to render.
    pub fn render_argv(&self, argv: &[String], name: &str) -> Result<Vec<String>, TemplateError> {
        let data = json!({ "name": name });
        argv.iter()
            .map(|arg| self.render_template(arg, &data))
            .collect()
    }

    fn render_template(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}
