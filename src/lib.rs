pub mod app;
pub mod config;
pub mod error;
pub mod feature;
pub mod geojson;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod loader;
pub mod logging;
pub mod map;
pub mod mode;
pub mod projection;
pub mod session;
pub use error::{AppError, AppResult};

use session::AnnotationSession;

/// Entrypoint used by the binary: annotates the image named by the first argument,
/// reading shell commands from stdin.
pub fn run() -> AppResult<()> {
    logging::init();
    let image_uri = std::env::args()
        .nth(1)
        .ok_or(AppError::MissingImageArgument)?;
    tracing::info!(%image_uri, "starting pixmark");

    let config = config::load_app_config();
    let session = AnnotationSession::initialize(&image_uri, &config)?;
    let mut app = app::App::new(session);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    app.run(stdin.lock(), &mut stdout)?;

    let annotations = app.close();
    tracing::info!(features = annotations.len(), "shutdown complete");
    Ok(())
}
