use crate::gui::trace;
use directories::UserDirs;
use keytrace_core::export::{ExportFormat, Viewport};
use keytrace_core::session::Session;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("PNG encoding error: {0}")]
    Png(#[from] cairo::IoError),
}

/// Downloads folder, or the working directory when there is none.
pub fn output_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Writes the current trace into `dir`. Returns `Ok(None)` when there is
/// nothing to export.
pub fn export_to(
    dir: &Path,
    session: &Session,
    format: ExportFormat,
    width: i32,
    height: i32,
) -> Result<Option<PathBuf>, ExportError> {
    let path = dir.join(session.export_file_name(format));
    let written = match format {
        ExportFormat::Svg => save_svg(&path, session, width, height)?,
        ExportFormat::Png => save_png(&path, session, width, height)?,
    };
    Ok(written.then_some(path))
}

pub fn export(
    session: &Session,
    format: ExportFormat,
    width: i32,
    height: i32,
) -> Result<Option<PathBuf>, ExportError> {
    export_to(&output_dir(), session, format, width, height)
}

fn save_svg(path: &Path, session: &Session, width: i32, height: i32) -> Result<bool, ExportError> {
    let Some(document) = session.export_svg(Viewport::new(width as f64, height as f64)) else {
        return Ok(false);
    };
    fs_err::write(path, document.to_string())?;
    Ok(true)
}

/// Renders the surface contents again into an image of the same size.
fn save_png(path: &Path, session: &Session, width: i32, height: i32) -> Result<bool, ExportError> {
    if width <= 0 || height <= 0 {
        return Ok(false);
    }

    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    {
        let cr = cairo::Context::new(&surface)?;
        trace::draw(&cr, session)?;
    }
    surface.flush();

    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    Ok(true)
}
