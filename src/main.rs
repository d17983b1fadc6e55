//! Binary entry point: resolve where the data lives, start logging, load the
//! catalog and hand control to the terminal UI until the user closes it.
use tracing::info;
use video_rental_manager::logging::init_logging;
use video_rental_manager::{run_app, App, DatabaseFile, Settings};

fn main() -> anyhow::Result<()> {
    let settings = Settings::resolve()?;
    init_logging(&settings.log_path)?;
    info!(database = %settings.database_path.display(), "starting session");

    let mut app = App::open(DatabaseFile::new(settings.database_path.clone()));
    run_app(&mut app, settings.autosave_notice)
}
