//! Dev command - initial build, file watcher and live-reload server

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result, WrapErr};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::{net::TcpListener, sync::mpsc};
use vitrine_core::ProjectLayout;
use vitrine_pipeline::{Affected, BuildStats, Pipeline, Task, WatchPlan};

use super::{check::quick_validate, load_config, print_build_stats, print_warnings, project_root};
use crate::server::{LIVERELOAD_SCRIPT, ReloadMessage, ServerState, create_router};

/// Run the dev command.
///
/// Builds once, then rebuilds affected tasks on change while serving the output.
pub async fn run(config_path: &Path, port: Option<u16>, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, ?port, "Starting dev mode");

    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    let open_browser = open_browser || config.server.open;
    let debounce = Duration::from_millis(config.server.debounce_ms);
    let addr = config.server_addr();

    // watcher events carry absolute paths on some platforms
    let root = std::fs::canonicalize(project_root(config_path))
        .wrap_err("Failed to resolve project root")?;
    let plan = WatchPlan::from_config(&config).wrap_err("Invalid watch patterns")?;
    let pipeline = Pipeline::new(config, root)
        .wrap_err("Invalid configuration")?
        .with_page_snippet(LIVERELOAD_SCRIPT);
    let pipeline = Arc::new(pipeline);

    print_warnings(&quick_validate(pipeline.config(), pipeline.layout()));

    tracing::info!("Running initial build...");
    let stats = initial_build(&pipeline).wrap_err("Initial build failed")?;
    print_build_stats(&stats);

    let state = Arc::new(ServerState::new());

    // Setup file watcher
    let (tx, rx) = mpsc::channel::<Vec<PathBuf>>(64);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(event) if is_content_change(&event.kind) => {
                let _ = tx.blocking_send(event.paths);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "watch error"),
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    let source_dir = pipeline.layout().source_dir().to_path_buf();
    watcher
        .watch(&source_dir, RecursiveMode::Recursive)
        .wrap_err_with(|| format!("Failed to watch {}", source_dir.display()))?;
    tracing::debug!(dir = %source_dir.display(), "Watching source directory");

    tokio::spawn(rebuild_loop(
        rx,
        Arc::clone(&pipeline),
        plan,
        Arc::clone(&state),
        debounce,
    ));

    // Start server
    let app = create_router(pipeline.layout().output_dir(), state);
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser {
        if let Err(e) = open::that(format!("http://{addr}")) {
            tracing::warn!(error = %e, "Failed to open browser");
        }
    }

    // Keep watcher alive
    let _watcher = watcher;

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

/// Sprites first, since images ships the sprite, then the rest in parallel.
fn initial_build(pipeline: &Pipeline) -> vitrine_pipeline::build::Result<BuildStats> {
    let start = Instant::now();
    let sprites = pipeline.run(Task::Sprites)?;

    let mut stats = pipeline.run_parallel(&Task::DEV_PARALLEL)?;
    stats.record(&sprites);
    stats.duration_ms = start.elapsed().as_millis() as u64;
    Ok(stats)
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
    )
}

/// Debounce change batches, run the tasks they affect and notify browsers.
async fn rebuild_loop(
    mut rx: mpsc::Receiver<Vec<PathBuf>>,
    pipeline: Arc<Pipeline>,
    plan: WatchPlan,
    state: Arc<ServerState>,
    debounce: Duration,
) {
    while let Some(first) = rx.recv().await {
        tokio::time::sleep(debounce).await;

        // Drain any queued events
        let mut paths = first;
        while let Ok(more) = rx.try_recv() {
            paths.extend(more);
        }

        let affected = affected_by(&plan, pipeline.layout(), &paths);
        if affected.is_empty() {
            tracing::trace!(?paths, "Change ignored");
            continue;
        }

        println!();
        println!("  File change detected, rebuilding...");
        let tasks = ordered(&affected);
        let runner = Arc::clone(&pipeline);
        let result = tokio::task::spawn_blocking(move || run_tasks(&runner, &tasks)).await;

        match result {
            Ok(Rebuild { duration, failed: 0 }) => {
                println!("  ✓ Rebuilt in {}ms", duration.as_millis());
                if let Some(message) = ReloadMessage::for_reload(affected.reload) {
                    let clients = state.notify(message);
                    tracing::debug!(?message, clients, "Sent reload");
                }
            }
            Ok(Rebuild { failed, .. }) => {
                eprintln!("  ✗ Rebuild failed ({failed} task(s)), keeping the last good output");
            }
            Err(e) => tracing::error!(error = %e, "Rebuild panicked"),
        }
    }
}

/// Source-relative view of a batch, mapped through the watch rules.
fn affected_by(plan: &WatchPlan, layout: &ProjectLayout, paths: &[PathBuf]) -> Affected {
    let relative: Vec<PathBuf> = paths
        .iter()
        .filter_map(|p| layout.relative_to_source(p))
        .collect();
    plan.affected(relative.iter().map(PathBuf::as_path))
}

/// Affected tasks in build order, so a fresh sprite is copied by images.
fn ordered(affected: &Affected) -> Vec<Task> {
    Task::BUILD
        .into_iter()
        .filter(|t| affected.tasks.contains(t))
        .collect()
}

struct Rebuild {
    duration: Duration,
    failed: usize,
}

/// Run every task; a failure is logged and does not stop the others.
fn run_tasks(pipeline: &Pipeline, tasks: &[Task]) -> Rebuild {
    let start = Instant::now();
    let mut failed = 0;

    for task in tasks {
        if let Err(e) = pipeline.run(*task) {
            tracing::error!(%task, "Rebuild failed: {e}");
            eprintln!("  ✗ {e}");
            failed += 1;
        }
    }

    Rebuild {
        duration: start.elapsed(),
        failed,
    }
}
