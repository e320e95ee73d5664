// Media introspection helpers, used to sanity-check the job inputs before any ffmpeg subprocess
// is spawned and to choose a container extension for the intermediate looped file.


use std::path::Path;
use file_format::FileFormat;
use crate::LoopMuxError;


// Returns "mp4", "mkv", "avi" etc. Based on analyzing the media content rather than on the filename
// extension.
#[tracing::instrument(level="trace")]
pub(crate) fn video_container_type(container: &Path) -> Result<String, LoopMuxError> {
    let format = FileFormat::from_file(container)
        .map_err(|e| LoopMuxError::Io(e, String::from("determining video container type")))?;
    Ok(format.extension().to_string())
}

// Does the media container at path contain an audio track?
#[tracing::instrument(level="trace")]
pub(crate) fn container_has_audio(path: &Path) -> bool {
    if let Ok(meta) = ffprobe::ffprobe(path) {
        return meta.streams.iter().any(|s| s.codec_type.as_ref().is_some_and(|typ| typ.eq("audio")));
    }
    false
}

// Does the media container at path contain a video track?
#[tracing::instrument(level="trace")]
pub(crate) fn container_has_video(path: &Path) -> bool {
    if let Ok(meta) = ffprobe::ffprobe(path) {
        return meta.streams.iter().any(|s| s.codec_type.as_ref().is_some_and(|typ| typ.eq("video")));
    }
    false
}
