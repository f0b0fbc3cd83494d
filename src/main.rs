use std::path::PathBuf;

use anyhow::{self, format_err};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use efp_gamess::interfaces::cli::{log_heading, Cli};
use efp_gamess::interfaces::input::Input;
use efp_gamess::interfaces::InputHandle;
use efp_gamess::io::{read_efpg_yaml, write_efpg_yaml};

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    if let Some(template) = cli.template.as_ref() {
        write_efpg_yaml(template, &Input::default())?;
        return Ok(());
    }

    let config_path = cli
        .config
        .ok_or_else(|| format_err!("No input configuration file specified."))?;
    let output_stem = cli.output.unwrap_or_else(|| PathBuf::from("efp-gamess"));
    let mut output_path = output_stem.into_os_string();
    output_path.push(".out");

    let output_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .append(false)
        .build(PathBuf::from(output_path))?;
    let config = Config::builder()
        .appender(Appender::builder().build("output_ap", Box::new(output_appender)))
        .logger(
            Logger::builder()
                .appender("output_ap")
                .additive(false)
                .build("efp-gamess-output", LevelFilter::Info),
        )
        .build(Root::builder().build(LevelFilter::Off))?;
    log4rs::init_config(config)?;

    log_heading();
    let inp = read_efpg_yaml::<Input, _>(&config_path)?;
    inp.handle()
}
