//! Handlebars rendering of generated files.
//!
//! Templates are embedded in the binary and registered by name when the
//! renderer is built. The registry runs in strict mode so a template that
//! references a value the caller did not supply fails loudly instead of
//! rendering an empty string into a Makefile. HTML escaping is disabled:
//! none of the outputs are HTML and quotes must survive verbatim.

use crate::fragments;
use crate::{Error, Result};
use deploy_config::{EnvironmentName, ResolvedConfig};
use handlebars::Handlebars;
use serde_json::{json, Value};

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

pub const MAKEFILE_BLOCK_TEMPLATE: &str = "makefile_block";
pub const COMPOSE_TEMPLATE: &str = "compose";
pub const DOCKERFILE_TEMPLATE: &str = "dockerfile";
pub const DEPLOYMENT_TIPS_TEMPLATE: &str = "deployment_tips";

const TEMPLATES: [(&str, &str); 4] = [
    (
        MAKEFILE_BLOCK_TEMPLATE,
        include_str!("../templates/makefile_block.hbs"),
    ),
    (COMPOSE_TEMPLATE, include_str!("../templates/compose.hbs")),
    (DOCKERFILE_TEMPLATE, include_str!("../templates/dockerfile.hbs")),
    (
        DEPLOYMENT_TIPS_TEMPLATE,
        include_str!("../templates/deployment_tips.hbs"),
    ),
];

/// Renders deployment artifacts from resolved configuration.
pub struct ArtifactRenderer {
    handlebars: Handlebars<'static>,
}

impl ArtifactRenderer {
    /// Builds the renderer and compiles all embedded templates.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` naming the template that failed to compile.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| Error::Render {
                    template: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders a registered template with `data`.
    pub fn render(&self, template: &str, data: &Value) -> Result<String> {
        self.handlebars
            .render(template, data)
            .map_err(|e| Error::Render {
                template: template.to_string(),
                message: e.to_string(),
            })
    }

    /// The Makefile block, sentinels included.
    pub fn makefile_block(
        &self,
        base: &ResolvedConfig,
        local: &ResolvedConfig,
        test: &ResolvedConfig,
        prod: &ResolvedConfig,
        custom_envs: &[EnvironmentName],
    ) -> Result<String> {
        let data = fragments::makefile_context(base, local, test, prod, custom_envs);
        self.render(MAKEFILE_BLOCK_TEMPLATE, &data)
    }

    /// The compose descriptor of one environment.
    pub fn compose(&self, config: &ResolvedConfig) -> Result<String> {
        self.render(COMPOSE_TEMPLATE, &fragments::compose_context(config))
    }

    pub fn dockerfile(&self, base: &ResolvedConfig) -> Result<String> {
        self.render(DOCKERFILE_TEMPLATE, &fragments::dockerfile_context(base))
    }

    pub fn deployment_tips(&self) -> Result<String> {
        self.render(DEPLOYMENT_TIPS_TEMPLATE, &json!({}))
    }
}
