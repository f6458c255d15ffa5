//! Book template error types.

use thiserror::Error;

/// A book template failed to render.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Handlebars rejected the template or its data.
    #[error("failed to render book template: {0}")]
    Render(#[from] handlebars::RenderError),
}
