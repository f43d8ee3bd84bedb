#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::{
    fs::File,
    io::{self, BufWriter, Read},
    process::ExitCode,
};

use clap::Parser;
use tracing::{info, warn};

use digger::{
    config::{self, ImagifyArgs},
    error::RenderError,
    render::{is_tile_map, render, write_tga},
};

fn main() -> ExitCode {
    let args = ImagifyArgs::parse();
    config::init_logging(args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("imagify: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &ImagifyArgs) -> Result<(), RenderError> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    if !is_tile_map(&text, args.width, args.height) {
        warn!("map has characters outside the tile alphabet");
    }
    let fb = render(&text, usize::from(args.width), usize::from(args.height))?;

    match &args.output {
        Some(path) => {
            info!(path = %path.display(), "writing image");
            let mut file = BufWriter::new(File::create(path)?);
            write_tga(&fb, &mut file)
        }
        None => write_tga(&fb, &mut io::stdout().lock()),
    }
}
