use anyhow::Context;
use clap::Parser;
use isoview::config::AppConfig;
use isoview::server::{HttpServer, Pipeline, PipelineService};
use isoview::view::TemplateViews;
use isoview::{Registrar, ViewRouter};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Serve the demo widget pages
#[derive(Parser)]
#[command(name = "isoview")]
#[command(about = "Isomorphic view router demo server", long_about = None)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "ISOVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Template directory (overrides config)
    #[arg(long)]
    views: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    addr: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Widget {
    id: &'static str,
    name: &'static str,
}

const WIDGETS: [Widget; 3] = [
    Widget { id: "1", name: "Sprocket" },
    Widget { id: "2", name: "Flange" },
    Widget { id: "42", name: "Gizmo" },
];

/// Shared by the server build and, in a browser host, the client build.
fn app_routes(r: &mut Registrar<'_>) {
    r.register("/", |_, done| {
        done.render("index", serde_json::json!({ "widgets": WIDGETS }));
    })
    .register("/widgets/:id", |params, done| {
        let id = params.get("id").unwrap_or_default();
        match WIDGETS.iter().find(|w| w.id == id) {
            Some(widget) => done.render("widgets/show", widget),
            None => done.fail(anyhow::anyhow!("no widget with id '{id}'")),
        }
    });
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env(),
    };
    if let Some(views) = cli.views {
        config.views.dir = views;
    }
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }

    isoview::logging::init_logging(&cli.log_level)?;
    may::config().set_stack_size(config.server.stack_size);
    info!(
        addr = %config.server.addr,
        stack_size = config.server.stack_size,
        views_dir = %config.views.dir.display(),
        "Configuration loaded"
    );

    let views = TemplateViews::from_dir(&config.views.dir)
        .with_context(|| format!("Failed to load views from {}", config.views.dir.display()))?;
    let router = Arc::new(
        ViewRouter::server()
            .views(Arc::new(views))
            .routes(app_routes)
            .build()?,
    );

    let pipeline = Pipeline::new().with(Arc::new(router.middleware()?));
    let handle = HttpServer(PipelineService::new(Arc::new(pipeline)))
        .start(config.server.addr.as_str())
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;
    info!(addr = %handle.addr(), "Serving views");

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("server coroutine panicked"))
}
