//! Support for defining and running a loop-and-mux job.
//!
//! A [LoopJob] names the input video, the input audio track and the number of loop iterations,
//! using a builder pattern for the optional settings. The consuming [LoopJob::run_to] method
//! drives the whole pipeline: validate inputs, write the concatenation manifest, run the two
//! ffmpeg steps, and clean up.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::LoopMuxError;
use crate::ffmpeg::{write_concat_manifest, loop_video, mux_audio_video};
use crate::media::{container_has_audio, container_has_video, video_container_type};


/// A loop-and-mux job: repeat the video stream of `video_path` a fixed number of times and mux
/// the result with the audio stream of `audio_path`.
#[derive(Debug, Clone)]
pub struct LoopJob {
    video_path: PathBuf,
    audio_path: PathBuf,
    loops: i64,
    pub(crate) verbosity: u8,
    pub(crate) ffmpeg_location: String,
}

impl LoopJob {
    pub fn new(video_path: impl Into<PathBuf>, audio_path: impl Into<PathBuf>) -> LoopJob {
        LoopJob {
            video_path: video_path.into(),
            audio_path: audio_path.into(),
            loops: 1,
            verbosity: 0,
            ffmpeg_location: if cfg!(target_os = "windows") {
                String::from("ffmpeg.exe")
            } else {
                String::from("ffmpeg")
            },
        }
    }

    /// The number of times the video stream is repeated in the output. Must be strictly positive.
    pub fn loops(mut self, count: i64) -> LoopJob {
        self.loops = count;
        self
    }

    /// Set the verbosity level of the job runner. Possible values for level:
    ///
    /// - 0: no informative messages are printed
    /// - 1: one line of diagnostics per pipeline stage
    /// - 2 or larger: also print the full ffmpeg command lines
    pub fn verbosity(mut self, level: u8) -> LoopJob {
        self.verbosity = level;
        self
    }

    /// Specify the location of the `ffmpeg` application, if not located in PATH.
    ///
    /// # Example
    ///
    /// ```
    /// # use loopmux::LoopJob;
    /// let job = LoopJob::new("input.mp4", "audio.mp3")
    ///     .with_ffmpeg("/opt/ffmpeg-next/bin/ffmpeg");
    /// ```
    pub fn with_ffmpeg(mut self, ffmpeg_path: &str) -> LoopJob {
        self.ffmpeg_location = ffmpeg_path.to_string();
        self
    }

    // Checks that halt the pipeline before any filesystem side effect takes place.
    fn validate(&self) -> Result<(), LoopMuxError> {
        if !is_regular_file(&self.video_path) {
            return Err(LoopMuxError::MissingInput(self.video_path.clone()));
        }
        if !is_regular_file(&self.audio_path) {
            return Err(LoopMuxError::MissingInput(self.audio_path.clone()));
        }
        if self.loops < 1 {
            return Err(LoopMuxError::InvalidConfiguration(
                format!("loop count must be a positive integer, got {}", self.loops)));
        }
        // Advisory stream checks (ffprobe may be missing or the container exotic, so these never
        // fail the job).
        if !container_has_video(&self.video_path) {
            warn!("{} does not appear to contain a video stream", self.video_path.display());
        }
        if !container_has_audio(&self.audio_path) {
            warn!("{} does not appear to contain an audio stream", self.audio_path.display());
        }
        Ok(())
    }

    /// Run the job, writing the final video to `output_path`. Returns the output path on success.
    ///
    /// The concatenation manifest and the intermediate looped file are created in a scratch
    /// directory that is unique to this job and deleted on every exit path, so concurrent jobs do
    /// not collide and a failed run leaves nothing behind. The output file is only valid if this
    /// method returns success; on failure its state is undefined.
    pub fn run_to(self, output_path: impl Into<PathBuf>) -> Result<PathBuf, LoopMuxError> {
        let output_path = output_path.into();
        self.validate()?;
        let video_path = fs::canonicalize(&self.video_path)
            .map_err(|e| LoopMuxError::Io(e, String::from("resolving video path")))?;
        let audio_path = fs::canonicalize(&self.audio_path)
            .map_err(|e| LoopMuxError::Io(e, String::from("resolving audio path")))?;
        // The scratch directory owns the temporary files: dropping it (on success, failure or
        // panic) deletes them.
        let scratch = tempfile::Builder::new()
            .prefix("loopmux")
            .tempdir()
            .map_err(|e| LoopMuxError::Io(e, String::from("creating scratch directory")))?;
        let manifest_path = scratch.path().join("concat.txt");
        if self.verbosity > 0 {
            println!("Writing concat manifest ({} entries)", self.loops);
        }
        write_concat_manifest(&video_path, self.loops, &manifest_path)?;
        // Keep the intermediate file in the same container format as the input, since the video
        // stream is copied rather than re-encoded. Detection is content-based, with the filename
        // extension as fallback.
        let container = video_container_type(&video_path)
            .ok()
            .or_else(|| video_path.extension().map(|e| e.to_string_lossy().to_string()))
            .unwrap_or_else(|| String::from("mp4"));
        let looped_path = scratch.path().join(format!("looped.{container}"));
        if self.verbosity > 0 {
            println!("Looping video ({} iterations)", self.loops);
        }
        loop_video(&self, &manifest_path, &looped_path)?;
        if self.verbosity > 0 {
            println!("Muxing looped video with audio track");
        }
        mux_audio_video(&self, &looped_path, &audio_path, &output_path)?;
        if let Err(e) = scratch.close() {
            warn!("Failed to delete scratch directory: {e}");
        }
        if self.verbosity > 0 {
            if let Ok(metadata) = fs::metadata(&output_path) {
                println!("Wrote {:.1}MB to {}", metadata.len() as f64 / (1024.0 * 1024.0),
                         output_path.display());
            }
        }
        info!("Created {} with {} loops", output_path.display(), self.loops);
        Ok(output_path)
    }
}

fn is_regular_file(p: &Path) -> bool {
    fs::metadata(p).map(|m| m.is_file()).unwrap_or(false)
}
