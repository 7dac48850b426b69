//! Decodes a VC-2 bitstream file and prints a one-line summary per picture.

use std::env;
use std::fs;
use std::process::ExitCode;

use vc2_conformance::{decode_stream, Picture, VideoParameters};

fn dump_picture(picture: &Picture, video_parameters: &VideoParameters) {
    println!(
        "picture {}: {}x{} luma, {}x{} colour-diff, depth {}/{}",
        picture.picture_number,
        video_parameters.luma_width,
        video_parameters.luma_height,
        video_parameters.color_diff_width,
        video_parameters.color_diff_height,
        video_parameters.luma_depth,
        video_parameters.color_diff_depth,
    );
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: decode_and_dump <path-to-vc2-stream>");
            return ExitCode::FAILURE;
        }
    };

    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = dump_picture;
    if let Err(e) = decode_stream(&data, &mut sink) {
        eprintln!("decode error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
