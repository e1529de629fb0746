use clap::Parser;
use log::error;

use halftone3d::app;
use halftone3d::config::Args;

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = app::run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}
