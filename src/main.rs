use std::path::Path;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use pix_gateway::{services, settings};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log4rs)?;

    let mut settings = settings::Settings::load(&args.config)?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    log::info!("Starting PIX gateway on port {}.", settings.server.port);
    services::start_services(settings).await
}

fn init_logging(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        return log4rs::init_file(path, Default::default())
            .map_err(|e| anyhow::anyhow!("Could not initialize logging: {}", e));
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;

    log4rs::init_config(config)?;
    Ok(())
}
