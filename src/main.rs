//! skinshop - skin-type quiz and storefront in the terminal
//!
//! Sets up logging and the terminal, wires the storefront client, the cart
//! file and the application state together, then runs the event loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use skinshop::application::{App, AppMode, CartStore, CatalogView, QuizEngine};
use skinshop::cli::Cli;
use skinshop::infrastructure::{CatalogLoader, FileCartRepository, StorefrontClient};
use skinshop::logging;
use skinshop::presentation::{render_ui, InputHandler};

const TICK: Duration = Duration::from_millis(100);

/// Entry point for the skinshop terminal storefront.
///
/// # Errors
///
/// Returns an error if logging or terminal setup fails, or if the terminal
/// fails while the application runs.
fn main() -> color_eyre::Result<()> {
    let cli = Cli::parse();
    install_hooks()?;
    let _log_guard = logging::init(&cli.log_path())?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting skinshop");

    let client = StorefrontClient::new(cli.storefront_config())
        .wrap_err("building storefront client")?;
    let loader = CatalogLoader::new(Arc::new(client));
    let cart = CartStore::open(Box::new(FileCartRepository::new(cli.cart_path())));
    let mut app = App::new(QuizEngine::default(), cart, CatalogView::new(cli.product_limit));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &loader);

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "terminal failure");
    }
    info!("exiting");
    res.wrap_err("running terminal interface")
}

/// Routes panics through color-eyre after putting the terminal back.
fn install_hooks() -> color_eyre::Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        panic_hook(info);
    }));
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

/// Main application event loop.
///
/// Draws, hands any queued catalog request to the loader, applies finished
/// fetches, and waits up to one tick for a key. Continues until the user
/// presses 'q' outside the help popup.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    loader: &CatalogLoader,
) -> io::Result<()> {
    loop {
        if let Some(request) = app.take_catalog_request() {
            loader.dispatch(request);
        }
        while let Some(response) = loader.try_next() {
            app.apply_catalog_response(response);
        }

        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode != AppMode::Help => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
