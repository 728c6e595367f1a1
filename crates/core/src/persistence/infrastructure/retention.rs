use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Limits how many composited frames accumulate in the output directory.
///
/// The default policy is unbounded: one file per processed frame, never
/// cleaned up, exactly as the host application may expect. Bounds apply
/// only to files matching the pipeline's own `image-*.png` naming; anything
/// else in the directory is left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Keep at most this many files, newest first.
    pub max_files: Option<usize>,
    /// Remove files older than this.
    pub max_age: Option<Duration>,
}

impl RetentionPolicy {
    pub fn keep_last(n: usize) -> Self {
        Self {
            max_files: Some(n),
            max_age: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_files.is_none() && self.max_age.is_none()
    }

    /// Applies the policy to `dir`. Failures are logged and skipped; a file
    /// that cannot be inspected or removed never aborts the sweep.
    pub fn enforce(&self, dir: &Path) {
        if self.is_unbounded() {
            return;
        }

        let mut files = match scan_output_files(dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("retention sweep failed to read {}: {e}", dir.display());
                return;
            }
        };

        if let Some(max_age) = self.max_age {
            let now = SystemTime::now();
            files.retain(|(path, modified)| {
                let stale = now
                    .duration_since(*modified)
                    .map(|age| age > max_age)
                    .unwrap_or(false);
                if stale {
                    remove(path);
                }
                !stale
            });
        }

        if let Some(max_files) = self.max_files {
            if files.len() > max_files {
                // Newest first; everything past the cap goes.
                files.sort_by(|a, b| b.1.cmp(&a.1));
                for (path, _) in &files[max_files..] {
                    remove(path);
                }
            }
        }
    }
}

fn scan_output_files(dir: &Path) -> std::io::Result<Vec<(PathBuf, SystemTime)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !(name.starts_with("image-") && name.ends_with(".png")) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        files.push((entry.path(), modified));
    }
    Ok(files)
}

fn remove(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("retention removed {}", path.display()),
        Err(e) => log::warn!("retention failed to remove {}: {e}", path.display()),
    }
}
