use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use crate::persistence::domain::image_saver::ImageSaver;
use crate::persistence::domain::image_writer::ImageWriter;
use crate::persistence::infrastructure::retention::RetentionPolicy;
use crate::shared::composite_image::CompositeImage;

/// One queued encode-and-write, consumed exactly once by the worker.
struct PersistJob {
    image: CompositeImage,
    path: PathBuf,
}

/// Fire-and-forget persistence: an unbounded job queue drained by a single
/// background worker thread.
///
/// `save_async` derives `image-<index>.png` under the configured directory
/// and returns the path without waiting for the write. The caller must not
/// assume the file exists yet. A reused frame index silently overwrites the
/// earlier file (last write wins). Worker failures are logged, never
/// surfaced, and never stop the worker.
///
/// Dropping the saver disconnects the queue and joins the worker, so any
/// queued writes still complete.
pub struct BackgroundImageSaver {
    tx: Option<Sender<PersistJob>>,
    worker: Option<JoinHandle<()>>,
    dir: PathBuf,
}

impl BackgroundImageSaver {
    pub fn new(writer: Box<dyn ImageWriter>, dir: PathBuf, retention: RetentionPolicy) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded::<PersistJob>();
        let worker_dir = dir.clone();
        let worker = std::thread::spawn(move || {
            for job in rx {
                if let Err(e) = writer.write(&job.path, &job.image) {
                    log::warn!("failed to persist {}: {e}", job.path.display());
                }
                retention.enforce(&worker_dir);
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
            dir,
        }
    }

    /// The deterministic destination for a given frame index.
    pub fn path_for(&self, frame_index: u64) -> PathBuf {
        self.dir.join(format!("image-{frame_index}.png"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSaver for BackgroundImageSaver {
    fn save_async(&self, image: CompositeImage, frame_index: u64) -> PathBuf {
        let path = self.path_for(frame_index);
        if let Some(tx) = &self.tx {
            let job = PersistJob {
                image,
                path: path.clone(),
            };
            if tx.send(job).is_err() {
                log::warn!("persistence worker gone; dropping frame {frame_index}");
            }
        }
        path
    }
}

impl Drop for BackgroundImageSaver {
    fn drop(&mut self) {
        // Disconnect so the worker drains the queue and exits.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
