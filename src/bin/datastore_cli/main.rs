mod app;
mod context;
mod commands;
mod formatters;
mod utils;

use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    app::run()
}
