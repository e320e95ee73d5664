// Command-line frontend: loop a video file N times and mux it with an audio track.
//
// Requires ffmpeg to be installed (or its location supplied with --ffmpeg).

use std::process;
use clap::{Arg, ArgAction, value_parser};
use tracing_subscriber::EnvFilter;
use loopmux::LoopJob;


fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();
    let matches = clap::Command::new("loopmux")
        .version(clap::crate_version!())
        .about("Loop a video file and mux it with an audio track, using ffmpeg as a subprocess")
        .arg(Arg::new("loops")
             .short('n')
             .long("loops")
             .value_name("COUNT")
             .value_parser(value_parser!(i64))
             .default_value("1")
             .help("Number of times the video is repeated in the output"))
        .arg(Arg::new("ffmpeg")
             .long("ffmpeg")
             .value_name("PATH")
             .help("Location of the ffmpeg application, if not located in PATH"))
        .arg(Arg::new("verbose")
             .short('v')
             .long("verbose")
             .action(ArgAction::Count)
             .help("Print more information about the pipeline stages (may be repeated)"))
        .arg(Arg::new("quiet")
             .short('q')
             .long("quiet")
             .action(ArgAction::SetTrue)
             .conflicts_with("verbose")
             .help("Only print error messages"))
        .arg(Arg::new("video")
             .value_name("VIDEO")
             .required(true)
             .index(1)
             .help("Input video file to be looped"))
        .arg(Arg::new("audio")
             .value_name("AUDIO")
             .required(true)
             .index(2)
             .help("Input audio track for the final output"))
        .arg(Arg::new("output")
             .value_name("OUTPUT")
             .required(true)
             .index(3)
             .help("Output video file (overwritten if it already exists)"))
        .get_matches();
    let video = matches.get_one::<String>("video").unwrap();
    let audio = matches.get_one::<String>("audio").unwrap();
    let output = matches.get_one::<String>("output").unwrap();
    let loops = *matches.get_one::<i64>("loops").unwrap();
    let verbosity = if matches.get_flag("quiet") {
        0
    } else {
        1 + matches.get_count("verbose")
    };
    let mut job = LoopJob::new(video, audio)
        .loops(loops)
        .verbosity(verbosity);
    if let Some(ffmpeg) = matches.get_one::<String>("ffmpeg") {
        job = job.with_ffmpeg(ffmpeg);
    }
    if let Err(e) = job.run_to(output) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
