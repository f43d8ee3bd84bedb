#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::io::{self, Write};

use clap::Parser;
use tracing::info;

use digger::{
    config::{self, Args},
    DigRng, Dungeon, Stage,
};

fn main() -> io::Result<()> {
    let args = Args::parse();
    config::init_logging(args.log_level);

    let rng = args.seed.map_or_else(DigRng::from_entropy, DigRng::new);
    info!(
        seed = rng.seed(),
        width = args.width,
        height = args.height,
        "digging"
    );

    let mut stage = Stage::new(i32::from(args.width), i32::from(args.height));
    let stats = Dungeon::new(&mut stage, rng).generate();
    info!(?stats, "done");

    let mut out = io::stdout().lock();
    write!(out, "{stage}")?;
    out.flush()
}
