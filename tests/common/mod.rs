//! Shared code for our test harness.
//!
//! Media fixtures are generated locally with ffmpeg's lavfi sources, so the integration tests
//! need ffmpeg on the search path; tests that can't find it return early instead of failing.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;
use std::sync::Once;
use ffprobe::ffprobe;


static TRACING_INIT: Once = Once::new();

pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env()
                             .unwrap_or_else(|_| EnvFilter::new("info")))
            .with_target(false)
            .compact()
            .init();
    });
}

pub fn have_ffmpeg() -> bool {
    Command::new("ffmpeg").arg("-version").output().is_ok() &&
        Command::new("ffprobe").arg("-version").output().is_ok()
}

// A black video of the requested duration, using the native mpeg4 encoder so that the fixture can
// be generated by any ffmpeg build.
pub fn generate_test_video(out: &Path, seconds: f64) {
    let ffmpeg = Command::new("ffmpeg")
        .args(["-hide_banner", "-nostats",
               "-loglevel", "error",
               "-y",
               "-f", "lavfi",
               "-i", &format!("color=c=black:s=320x240:d={seconds}"),
               "-pix_fmt", "yuv420p",
               "-c:v", "mpeg4",
               &out.to_string_lossy()])
        .output()
        .expect("spawning ffmpeg to generate video fixture");
    assert!(ffmpeg.status.success(),
            "generating video fixture: {}", String::from_utf8_lossy(&ffmpeg.stderr));
}

// Silence of the requested duration. WAV output so that no optional audio encoder is needed.
pub fn generate_test_audio(out: &Path, seconds: f64) {
    let ffmpeg = Command::new("ffmpeg")
        .args(["-hide_banner", "-nostats",
               "-loglevel", "error",
               "-y",
               "-f", "lavfi",
               "-i", "anullsrc=channel_layout=stereo:sample_rate=44100",
               "-t", &format!("{seconds}"),
               &out.to_string_lossy()])
        .output()
        .expect("spawning ffmpeg to generate audio fixture");
    assert!(ffmpeg.status.success(),
            "generating audio fixture: {}", String::from_utf8_lossy(&ffmpeg.stderr));
}

// We tolerate moderate differences in duration, because stream-copy concatenation keeps the
// original packet timing and container-level rounding differs between muxers.
pub fn check_media_duration(p: &Path, expected: f64) {
    let meta = ffprobe(p).unwrap();
    let duration_str = meta.format.duration.as_ref()
        .expect("ffprobe reports no container duration");
    let duration = duration_str.parse::<f64>().unwrap();
    let ratio = duration / expected;
    assert!(0.9 < ratio && ratio < 1.1,
            "Media duration: expected {expected}, got {duration}");
}
