/// Looping and muxing support using ffmpeg as a subprocess.
///
/// ffmpeg is run with an explicit argument list (never through a shell), with its stdout/stderr
/// captured. A non-zero exit status from ffmpeg is fatal for the step concerned; the child's
/// stderr is included in the returned error so that its diagnostics are not lost.


use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;
use tracing::info;
use crate::LoopMuxError;
use crate::job::LoopJob;


// The ffmpeg concat demuxer reads one "file" directive per line, with the path between single
// quotes. An embedded single quote has to be written as '\'' (close quote, escaped quote, reopen
// quote), otherwise it would truncate the path.
fn quoted_path(p: &Path) -> String {
    format!("'{}'", p.to_string_lossy().replace('\'', r"'\''"))
}

/// Write a concat demuxer manifest referencing `video` once per loop iteration.
pub(crate) fn write_concat_manifest(
    video: &Path,
    loops: i64,
    manifest_path: &Path) -> Result<(), LoopMuxError>
{
    let manifest = File::create(manifest_path)
        .map_err(|e| LoopMuxError::Io(e, String::from("creating concat manifest")))?;
    let mut manifest = BufWriter::new(manifest);
    for _ in 0..loops {
        writeln!(manifest, "file {}", quoted_path(video))
            .map_err(|e| LoopMuxError::Io(e, String::from("writing concat manifest")))?;
    }
    manifest.flush()
        .map_err(|e| LoopMuxError::Io(e, String::from("flushing concat manifest")))?;
    Ok(())
}

// Run ffmpeg with the supplied arguments, logging anything it prints and mapping a non-zero exit
// status to a Ffmpeg error that names the stage and carries the child's stderr.
fn run_ffmpeg(job: &LoopJob, stage: &str, args: &[&str]) -> Result<(), LoopMuxError> {
    if job.verbosity > 1 {
        println!("  Running {} {}", job.ffmpeg_location, args.join(" "));
    }
    let ffmpeg = Command::new(&job.ffmpeg_location)
        .args(args)
        .output()
        .map_err(|e| LoopMuxError::Io(e, format!("spawning ffmpeg subprocess for {stage}")))?;
    let msg = String::from_utf8_lossy(&ffmpeg.stdout);
    if !msg.is_empty() {
        info!("ffmpeg stdout: {msg}");
    }
    let msg = String::from_utf8_lossy(&ffmpeg.stderr);
    if !msg.is_empty() {
        info!("ffmpeg stderr: {msg}");
    }
    if ffmpeg.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&ffmpeg.stderr);
        Err(LoopMuxError::Ffmpeg(format!("{stage}: {}", stderr.trim())))
    }
}

/// Concatenate the manifest entries into a single video-only file by stream copy, stripping any
/// audio present in the source. `-safe 0` allows the absolute paths used in the manifest.
pub(crate) fn loop_video(
    job: &LoopJob,
    manifest_path: &Path,
    looped_path: &Path) -> Result<(), LoopMuxError>
{
    run_ffmpeg(job, "looping video",
               &["-hide_banner", "-nostats",
                 "-loglevel", "error",
                 "-y",
                 "-f", "concat",
                 "-safe", "0",
                 "-i", &manifest_path.to_string_lossy(),
                 "-an",
                 "-c:v", "copy",
                 &looped_path.to_string_lossy()])
}

/// Mux the looped video-only file with the audio track: video stream 0 copied unmodified, audio
/// stream 0 re-encoded to AAC at 192 kb/s, output trimmed to the shorter of the two inputs.
pub(crate) fn mux_audio_video(
    job: &LoopJob,
    looped_path: &Path,
    audio_path: &Path,
    output_path: &Path) -> Result<(), LoopMuxError>
{
    run_ffmpeg(job, "muxing audio and video",
               &["-hide_banner", "-nostats",
                 "-loglevel", "error",
                 "-y",
                 "-i", &looped_path.to_string_lossy(),
                 "-i", &audio_path.to_string_lossy(),
                 "-map", "0:v:0",
                 "-map", "1:a:0",
                 "-c:v", "copy",
                 "-c:a", "aac",
                 "-b:a", "192k",
                 "-shortest",
                 &output_path.to_string_lossy()])
}
