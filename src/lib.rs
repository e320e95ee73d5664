//! A Rust library and command-line tool for looping a video file a fixed number of times and
//! muxing the result with a separately supplied audio track, producing a single output video.
//!
//! No decoding or encoding is done in-process. All media handling is delegated to
//! [ffmpeg](https://ffmpeg.org/), run as a subprocess: the video stream is repeated losslessly
//! using the concat demuxer (driven by a generated concatenation manifest), then muxed with the
//! audio track, with the video stream copied unmodified, the audio re-encoded to AAC, and the
//! output trimmed to the shorter of the two input streams.
//!
//! ```no_run
//! use loopmux::LoopJob;
//!
//! let out = LoopJob::new("input.mp4", "audio.mp3")
//!     .loops(3)
//!     .verbosity(1)
//!     .run_to("final_looped_video.mp4")
//!     .unwrap();
//! println!("Wrote {}", out.display());
//! ```
//!
//! Intermediate artifacts (the concatenation manifest and the looped video-only file) live in a
//! per-job scratch directory which is deleted on every exit path, including failures.

use std::path::PathBuf;

mod ffmpeg;
mod media;
pub mod job;

pub use crate::job::LoopJob;


#[derive(thiserror::Error, Debug)]
pub enum LoopMuxError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("I/O error {1}")]
    Io(#[source] std::io::Error, String),
    #[error("ffmpeg error {0}")]
    Ffmpeg(String),
}
