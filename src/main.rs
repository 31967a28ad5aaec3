// What you SEE:
// • A window with the first image, letterboxed on dark gray.
// • Click two corners: a box in the redaction color appears (a translucent
//   preview follows the pointer after the first click).
// • U / R undo and redo picks. Wheel zooms at the pointer, arrows/WASD pan.
// • Enter (or N) exports the boxes burned into the image and opens the next one.
// • Escape or closing the window exports the current image and quits.

mod codec;
mod config;
mod draw;
mod error;
mod geometry;
mod picks;
mod raster;
mod session;
mod types;
mod viewport;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use config::{Cli, Config};
use draw::Drawer;
use error::Error;
use session::Session;

/// Largest initial window; bigger images start zoomed to fit.
const MAX_WINDOW: (usize, usize) = (1600, 1000);

fn run(cli: Cli) -> Result<(), Error> {
    /* --- Arguments ---
       Bad arguments stop us here, before any window opens. */
    let config = Config::from_cli(cli)?;
    info!("{} image(s) to process", config.jobs.len());

    /* --- First image + window ---
       Visual: the window opens at the image size (capped), showing it whole. */
    let mut session = Session::new(config);
    session.load_current()?;
    let (w, h) = session
        .context()
        .map(|ctx| (ctx.image.width(), ctx.image.height()))
        .unwrap_or(MAX_WINDOW);
    let mut drawer = Drawer::new(&session.title(), w.min(MAX_WINDOW.0), h.min(MAX_WINDOW.1))?;

    /* --- Main loop --- */
    session.run(&mut drawer)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("[ERROR]: {e}");
            ExitCode::FAILURE
        }
    }
}
