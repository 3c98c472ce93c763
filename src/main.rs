use anyhow::Result;
use formcraft::{app::App, cli, config::Config, logger::StderrLogger};
use log::LevelFilter;

fn main() -> Result<()> {
    let matches = cli::build_app().get_matches();
    let cli = cli::parse_matches(&matches)?;

    let mut config = Config::new();
    config.load(cli.config_dir.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.level_filter()
    };
    StderrLogger::init(level)?;

    App::start(config, cli.command)
}
