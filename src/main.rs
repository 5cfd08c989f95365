mod audio;
mod config;
mod error;
mod library;
mod mpris;
mod player;
mod runtime;

fn main() -> Result<(), error::App> {
    runtime::run()
}
