use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = mtime_stamp::cli::parse();
    app::run(args)
}
