use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::time::Instant;
use tracing::{info, warn};

use netsecure_tui::data::write_export;
use netsecure_tui::poller::fetch_into;
use netsecure_tui::ui::{self, layout};
use netsecure_tui::{
    events, logging, App, DashboardConfig, DataProvider, DirectoryProvider, HttpProvider,
    Resource, SharedState,
};

#[derive(Parser, Debug)]
#[command(name = "netsecure")]
#[command(about = "Live security operations dashboard for the terminal")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base URL
    #[arg(short, long, conflicts_with = "fixtures")]
    api: Option<String>,

    /// Serve resource payloads from <DIR>/<resource>.json instead of the API
    #[arg(short, long, value_name = "DIR")]
    fixtures: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Display frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export one snapshot of every resource to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    /// Command-line flags win over file and environment settings.
    fn apply(&self, config: &mut DashboardConfig) {
        if let Some(api) = &self.api {
            config.api.base_url = api.clone();
        }
        if let Some(dir) = &self.fixtures {
            config.api.fixtures_dir = Some(dir.clone());
        }
        if let Some(refresh) = self.refresh {
            config.refresh.interval_ms = refresh;
        }
        if let Some(fps) = self.fps {
            config.render.fps = fps;
        }
        if let Some(file) = &self.log_file {
            config.log.file = file.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    logging::init(&config.log)?;

    let provider = build_provider(&config)?;
    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return rt.block_on(export_to_file(provider.as_ref(), &export_path));
    }

    // The UI loop runs on this thread; pollers run on the runtime's workers.
    let result = {
        let _guard = rt.enter();
        run_tui(config, provider)
    };
    rt.shutdown_background();
    result
}

fn build_provider(config: &DashboardConfig) -> Result<Arc<dyn DataProvider>> {
    if let Some(dir) = &config.api.fixtures_dir {
        return Ok(Arc::new(DirectoryProvider::new(dir)));
    }
    let provider = HttpProvider::builder()
        .base_url(config.api.base_url.clone())
        .timeout(config.request_timeout())
        .build()
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(provider))
}

/// Run the TUI until the user quits
fn run_tui(config: DashboardConfig, provider: Arc<dyn DataProvider>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(config, provider);
    app.start();

    let result = run_app(&mut terminal, &mut app);
    app.quit();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let frame_interval = app.config().frame_interval();

    while app.running {
        let now = Instant::now();
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        // Scenes paint at the size the canvases are about to be drawn at.
        let surfaces = layout::surfaces(app, area, now);
        app.frame(now, &surfaces);

        terminal.draw(|frame| ui::render(frame, app, now))?;

        if let Some(event) = events::poll_event(frame_interval)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, area),
                Event::Resize(_, _) => {
                    // Surfaces are resized on the next frame
                }
                _ => {}
            }
        }
    }

    info!("dashboard stopped");
    Ok(())
}

/// Fetch every resource once and write the export document.
async fn export_to_file(provider: &dyn DataProvider, path: &Path) -> Result<()> {
    let state = SharedState::new();
    for resource in Resource::ALL {
        if let Err(e) = fetch_into(resource, provider, &state).await {
            warn!(%resource, error = %e, "export fetch failed");
            eprintln!("Warning: could not fetch {resource}: {e}");
        }
    }

    write_export(&state, path)?;
    println!("Exported dashboard state to: {}", path.display());
    Ok(())
}
