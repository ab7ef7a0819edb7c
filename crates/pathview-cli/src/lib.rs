pub mod cli;
pub mod errors;
pub mod figure;
pub mod output;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use pathview_core::extract::{vector_series, DIRECTION_COLUMNS, POSITION_COLUMNS};
use pathview_core::session::{discover_session_files, session_name};
use pathview_core::{draw_path, Session, Surface};

use crate::errors::{Result, ThumbnailError};
use crate::figure::Figure;
use crate::output::BatchReport;
use crate::types::ThumbnailConfig;

/// Name of the thumbnail folder created under an explicit output directory
pub fn thumbnail_dir_name(input: &Path) -> String {
    let group = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .or_else(|| {
            input
                .canonicalize()
                .ok()
                .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "sessions".to_string());
    format!("{}-thumbnails", group)
}

/// Where thumbnails for `input` go.
///
/// Without an output directory, or when it is the input directory itself,
/// thumbnails land directly in `input`. Otherwise they go to
/// `<opath>/<input name>-thumbnails`, which is created if needed.
pub fn resolve_output_dir(input: &Path, opath: Option<&Path>) -> Result<PathBuf> {
    let Some(opath) = opath else {
        return Ok(input.to_path_buf());
    };

    if let (Ok(a), Ok(b)) = (input.canonicalize(), opath.canonicalize()) {
        if a == b {
            return Ok(input.to_path_buf());
        }
    }

    let out = opath.join(thumbnail_dir_name(input));
    if !out.exists() {
        fs::create_dir_all(&out)?;
    }
    Ok(out)
}

/// Renders one thumbnail per session of a directory
pub struct ThumbnailBatch {
    config: ThumbnailConfig,
}

impl ThumbnailBatch {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    /// Render every session in `input`.
    ///
    /// Each session file is read and rendered on its own. A session that
    /// fails, including one whose file cannot be parsed, is recorded in the
    /// report and skipped, unless `continue_on_error` is off, in which case
    /// the run stops with that error.
    pub fn run<P: AsRef<Path>>(&self, input: P, opath: Option<&Path>) -> Result<BatchReport> {
        let input = input.as_ref();
        if !input.is_dir() {
            return Err(ThumbnailError::NotADirectory(input.display().to_string()));
        }

        let files = discover_session_files(input)?;
        let out_dir = resolve_output_dir(input, opath)?;
        info!(
            "Rendering {} sessions from {} into {}",
            files.len(),
            input.display(),
            out_dir.display()
        );

        let mut report = BatchReport::new(input.to_path_buf(), out_dir.clone());
        for (id, file) in files.into_iter().enumerate() {
            let name = session_name(&file);
            let rendered = Session::load(id, file)
                .map_err(ThumbnailError::from)
                .and_then(|session| self.render_session(&session, &out_dir));

            match rendered {
                Ok(path) => report.record_success(id, &name, path),
                Err(err) => {
                    let err = err.in_session(&name);
                    if !self.config.continue_on_error {
                        return Err(err);
                    }
                    warn!("{}", err);
                    report.record_failure(id, &name, err.to_string());
                }
            }
        }

        if let Some(summary) = &self.config.summary_path {
            report.write_json(summary)?;
            info!("Wrote batch report to {}", summary.display());
        }

        info!(
            "Batch complete: {} written, {} failed",
            report.written(),
            report.sessions.len() - report.written()
        );
        Ok(report)
    }

    /// Render one session's position/direction path and write it to `out_dir`.
    pub fn render_session(&self, session: &Session, out_dir: &Path) -> Result<PathBuf> {
        let path = vector_series(&session.table, &POSITION_COLUMNS)?;
        let direction = vector_series(&session.table, &DIRECTION_COLUMNS)?;
        let out = out_dir.join(self.config.file_name(&session.name));
        let size = self.config.figure_size;

        Figure::scoped(size, size, |figure| {
            let (mut surface, _) = draw_path(
                &path,
                Some(&direction),
                self.config.bbox.as_ref(),
                Some(Surface::spatial()),
                &self.config.path_style(),
            )?;
            surface.clear_panes();
            figure.render(&surface)?;
            figure.save(&out, self.config.transparent)
        })?;

        info!("Session {}: wrote {}", session.id, out.display());
        Ok(out)
    }
}
