//! Book templates rendered with Handlebars.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, BookRenderer};

/// Introduction page of a book.
const README_TEMPLATE: &str = "# {{name}}\n\nExecution logs collected for `{{name}}`.\n";

/// One page per log file. The body is the raw log.
const PAGE_TEMPLATE: &str = "# {{title}}\n\n{{body}}\n";

/// Summary index consumed by the book toolchain.
const SUMMARY_TEMPLATE: &str = "# Summary\n\n* [Introduction](README.md)\n{{#each pages}}* [{{title}}]({{file}})\n{{/each}}";

/// A page entry in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    /// Heading and summary label.
    pub title: String,
    /// File name of the page inside the book directory.
    pub file_name: String,
}

/// Page title for a log file of `name`.
///
/// The title is the part of the file stem after the last `-`, so
/// `hw1-alice-clone.log` becomes `clone`.
#[must_use]
pub fn page_title(log_stem: &str) -> &str {
    log_stem.rsplit('-').next().unwrap_or(log_stem)
}
