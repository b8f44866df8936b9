//! Embedded artifact templates and the Tera renderer
//!
//! Templates are compiled into the binary with `include_str!`, so the
//! generator works from any directory without shipping template files.

use super::GenerateError;
use tera::{Context, Tera};
use tracing::debug;

pub const DOCKERFILE: &str = "Dockerfile";
pub const TERRAFORM: &str = "main.tf";
pub const CLOUDBUILD: &str = "cloudbuild.yaml";
pub const BOOTSTRAP_SCRIPT: &str = "gcp_bootstrap.sh";
pub const SHOW_COMMANDS_SCRIPT: &str = "gcp_show_commands.sh";

/// All embedded templates as (name, content) pairs for registration with Tera
pub const ALL_TEMPLATES: &[(&str, &str)] = &[
    (DOCKERFILE, include_str!("templates/Dockerfile.j2")),
    (TERRAFORM, include_str!("templates/main.tf.j2")),
    (CLOUDBUILD, include_str!("templates/cloudbuild.yaml.j2")),
    (BOOTSTRAP_SCRIPT, include_str!("templates/gcp_bootstrap.sh.j2")),
    (SHOW_COMMANDS_SCRIPT, include_str!("templates/gcp_show_commands.sh.j2")),
];

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Register every embedded template
    ///
    /// Template names carry no `.html`/`.xml` suffix, so Tera leaves values
    /// unescaped.
    pub fn from_embedded() -> Result<Self, GenerateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(ALL_TEMPLATES.iter().copied())
            .map_err(|source| GenerateError::Render {
                name: "(embedded)".to_string(),
                source,
            })?;
        debug!("Loaded {} embedded templates", ALL_TEMPLATES.len());
        Ok(Self { tera })
    }

    /// Render a template with a Tera context
    pub fn render(&self, name: &str, context: &Context) -> Result<String, GenerateError> {
        let rendered = self
            .tera
            .render(name, context)
            .map_err(|source| GenerateError::Render {
                name: name.to_string(),
                source,
            })?;
        debug!("Rendered template {name} ({} bytes)", rendered.len());
        Ok(rendered)
    }

    /// List all loaded template names
    pub fn list_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(String::from).collect();
        names.sort();
        names
    }
}
