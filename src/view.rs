//! View rendering.
//!
//! A view identifier such as `widgets/show` resolves to a template; rendering it
//! with a JSON data mapping yields an HTML string. On the server the result is
//! additionally wrapped in the `layout` view.

use minijinja::{context, AutoEscape, Environment, ErrorKind};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ViewError;

/// Fixed identifier of the layout template used for full-page server responses.
pub const LAYOUT_VIEW: &str = "layout";

/// File extensions recognised as templates when loading a views directory.
const TEMPLATE_EXTENSIONS: [&str; 3] = ["html", "jinja", "j2"];

/// Resolves view identifiers to templates and renders them.
pub trait ViewRenderer: Send + Sync {
    /// Render `view` with `data`.
    ///
    /// # Errors
    ///
    /// [`ViewError::NotFound`] when the identifier does not resolve,
    /// [`ViewError::Render`] when the template fails.
    fn render(&self, view: &str, data: &JsonValue) -> Result<String, ViewError>;

    /// Wrap an already rendered body in the [`LAYOUT_VIEW`] template.
    ///
    /// # Errors
    ///
    /// Same contract as [`ViewRenderer::render`].
    fn render_layout(&self, body: &str) -> Result<String, ViewError> {
        self.render(LAYOUT_VIEW, &serde_json::json!({ "body": body }))
    }
}

impl<F> ViewRenderer for F
where
    F: Fn(&str, &JsonValue) -> Result<String, ViewError> + Send + Sync,
{
    fn render(&self, view: &str, data: &JsonValue) -> Result<String, ViewError> {
        self(view, data)
    }
}

/// minijinja-backed [`ViewRenderer`].
///
/// Output is HTML-escaped. The layout receives the rendered view as `body`
/// marked safe, so `{{ body }}` inserts it verbatim.
pub struct TemplateViews {
    env: Environment<'static>,
}

impl Default for TemplateViews {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateViews {
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }

    /// Add a single template under `view`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Load`] when the source does not compile.
    pub fn add_view(&mut self, view: &str, source: &str) -> Result<(), ViewError> {
        self.env
            .add_template_owned(view.to_string(), source.to_string())
            .map_err(|e| ViewError::Load {
                path: view.to_string(),
                message: e.to_string(),
            })
    }

    /// Build from in-memory `(view, source)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Load`] for the first template that does not compile.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, ViewError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut views = Self::new();
        for (view, source) in sources {
            views.add_view(view, source)?;
        }
        Ok(views)
    }

    /// Load every template under `dir`.
    ///
    /// `dir/widgets/show.html` becomes the view `widgets/show`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Load`] when the directory cannot be read or a
    /// template does not compile.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ViewError> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        collect_templates(dir, &mut files)?;

        let mut views = Self::new();
        for path in &files {
            let Some(view) = view_name(dir, path) else {
                continue;
            };
            let source = fs::read_to_string(path).map_err(|e| ViewError::Load {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            views.add_view(&view, &source)?;
            debug!(view = %view, path = %path.display(), "Template loaded");
        }
        info!(views_dir = %dir.display(), views_count = files.len(), "Views loaded");
        Ok(views)
    }

    /// The underlying minijinja environment, for registering filters and globals.
    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    fn render_ctx<S: serde::Serialize>(&self, view: &str, ctx: S) -> Result<String, ViewError> {
        let tmpl = self.env.get_template(view).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => ViewError::NotFound {
                view: view.to_string(),
            },
            _ => ViewError::Render {
                view: view.to_string(),
                message: e.to_string(),
            },
        })?;
        tmpl.render(ctx).map_err(|e| ViewError::Render {
            view: view.to_string(),
            message: e.to_string(),
        })
    }
}

impl ViewRenderer for TemplateViews {
    fn render(&self, view: &str, data: &JsonValue) -> Result<String, ViewError> {
        self.render_ctx(view, data)
    }

    fn render_layout(&self, body: &str) -> Result<String, ViewError> {
        let body = minijinja::Value::from_safe_string(body.to_string());
        self.render_ctx(LAYOUT_VIEW, context! { body => body })
    }
}

fn collect_templates(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ViewError> {
    let load_err = |e: std::io::Error| ViewError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    };
    for entry in fs::read_dir(dir).map_err(load_err)? {
        let path = entry.map_err(load_err)?.path();
        if path.is_dir() {
            collect_templates(&path, out)?;
        } else if path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
        {
            out.push(path);
        }
    }
    out.sort();
    Ok(())
}

/// `base/widgets/show.html` -> `widgets/show`
fn view_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?.with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
