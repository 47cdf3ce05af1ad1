//! Plain-text output of grid functions
//!
//! One line per grid point, `x  y  value` with six decimals, and a blank line
//! after each x-column group, boundary included. This is the layout gnuplot's
//! `splot` reads directly. Frames of a run are written as
//! `<tag>/wave2d_<tag>_<frame:05>.dat`.

use crate::error::Result;
use crate::grid::GridFunction;
use solvers::RealField;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write every point of `u` to `writer`.
pub fn write_grid<T: RealField, W: Write>(u: &GridFunction<T>, writer: &mut W) -> Result<()> {
    let last = u.n() + 1;
    let h = u.h().to_f64_lossy();
    for i in 0..=last {
        for j in 0..=last {
            writeln!(
                writer,
                "{:.6}  {:.6}  {:.6}",
                i as f64 * h,
                j as f64 * h,
                u[(i, j)].to_f64_lossy()
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Save `u` to `path`, replacing any existing file.
pub fn save_to_file<T: RealField>(u: &GridFunction<T>, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_grid(u, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Relative path of frame `frame` for run `tag`
pub fn frame_path(tag: &str, frame: usize) -> PathBuf {
    Path::new(tag).join(format!("wave2d_{tag}_{frame:05}.dat"))
}

/// Write frame `frame` of run `tag` below `root`, creating `<root>/<tag>/` if needed.
///
/// Returns the path of the written file.
pub fn write_frame_in<T: RealField>(
    root: impl AsRef<Path>,
    u: &GridFunction<T>,
    tag: &str,
    frame: usize,
) -> Result<PathBuf> {
    let path = root.as_ref().join(frame_path(tag, frame));
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    save_to_file(u, &path)?;
    log::debug!("wrote frame {} to {}", frame, path.display());
    Ok(path)
}

/// Write frame `frame` of run `tag` relative to the working directory.
pub fn write_frame<T: RealField>(u: &GridFunction<T>, tag: &str, frame: usize) -> Result<PathBuf> {
    write_frame_in(".", u, tag, frame)
}
