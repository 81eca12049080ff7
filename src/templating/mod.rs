//! Materializing function source templates into the project tree.
//!
//! The lifecycle operations hand the renderer a list of [`CopyJob`]s and a
//! parameter object. [`TeraTemplateRenderer`] renders each template with
//! [Tera](https://keats.github.io/tera/) using the parameters as context and
//! writes the result to the job's target.
//!
//! Targets that already exist are left alone unless `overwrite` is set, so
//! re-running a create never clobbers user edits.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

use crate::core::StoreError;
use crate::utils::fs::atomic_write;

/// One template to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    /// Directory the template path is relative to.
    pub source_dir: PathBuf,
    /// Template file, relative to `source_dir`.
    pub template: PathBuf,
    /// Output file.
    pub target: PathBuf,
}

impl CopyJob {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            template: template.into(),
            target: target.into(),
        }
    }

    /// Absolute location of the template.
    pub fn template_path(&self) -> PathBuf {
        self.source_dir.join(&self.template)
    }
}

/// Renders templates and writes them to disk.
pub trait TemplateRenderer {
    /// Renders every job with `params` as context.
    ///
    /// Existing targets are skipped unless `overwrite` is set.
    fn render(&self, jobs: &[CopyJob], params: &Value, overwrite: bool) -> Result<()>;
}

/// [`TemplateRenderer`] backed by Tera.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraTemplateRenderer;

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_one(job: &CopyJob, context: &TeraContext) -> Result<()> {
        let template_path = job.template_path();
        if !template_path.is_file() {
            return Err(StoreError::MissingTemplate {
                path: template_path,
            }
            .into());
        }

        let source = fs::read_to_string(&template_path)
            .with_context(|| format!("Failed to read template {}", template_path.display()))?;

        // Fresh instance per render keeps no state between jobs
        let mut tera = Tera::default();
        let rendered =
            tera.render_str(&source, context).map_err(|e| StoreError::TemplateRender {
                template: template_path.clone(),
                message: format_tera_error(&e),
            })?;

        atomic_write(&job.target, rendered.as_bytes())
            .with_context(|| format!("Failed to write rendered template {}", job.target.display()))
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(&self, jobs: &[CopyJob], params: &Value, overwrite: bool) -> Result<()> {
        let context = TeraContext::from_serialize(params)
            .context("Template parameters must be a JSON object")?;

        for job in jobs {
            if !overwrite && job.target.exists() {
                tracing::debug!("Keeping existing file {}", job.target.display());
                continue;
            }
            Self::render_one(job, &context)?;
            tracing::debug!(
                "Rendered {} -> {}",
                job.template.display(),
                display_relative(&job.target, &job.source_dir)
            );
        }
        Ok(())
    }
}

/// Joins a Tera error with its causes, dropping Tera's internal template name.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = Vec::new();
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        let cleaned = err
            .to_string()
            .replace("Failed to render '__tera_one_off'", "")
            .replace("Failed to parse '__tera_one_off'", "")
            .replace("'__tera_one_off'", "template")
            .trim()
            .to_string();
        if !cleaned.is_empty() {
            messages.push(cleaned);
        }
        current = err.source();
    }

    if messages.is_empty() {
        "template syntax error".to_string()
    } else {
        messages.join(": ")
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}
