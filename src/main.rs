use log::{LevelFilter, error, info};
use std::{fs, path::PathBuf, process::exit, thread};

use clap::Parser;
use licensing_lib::{
    CacheableLicensingBlock, LicensingError, Page, SiteConfig, SiteHelper, Translations,
    standalone_document,
};

mod preview;
mod watch;

/// Render the licensing block of an article
#[derive(Parser, Debug)]
#[command(
    author = "Lyr",
    version = "0.1.0",
    about = "Article licensing block - Command Line Interface",
    long_about = "Render the licensing block of an article from a site config and a page"
)]
pub struct Args {
    /// site config (eg. ./site.toml)
    config: PathBuf,

    /// the article to render the block for (eg. ./posts/hello-world.toml)
    page: PathBuf,

    /// file to write the html to, prints to stdout when not given
    output: Option<PathBuf>,

    /// locale file with translated messages
    #[clap(long)]
    locale: Option<PathBuf>,

    /// Wrap the block in a full html document
    #[clap(long, short)]
    standalone: bool,

    /// Watch config, page and locale for changes and render again
    #[clap(long, short)]
    watch: bool,

    /// Serve the output on this port while watching
    #[clap(long, short, requires_all = ["watch", "output"])]
    port: Option<u16>,

    /// "TRACE", "DEBUG", "INFO", "WARN", "ERROR"
    #[clap(long, short)]
    log: Option<LevelFilter>,
}

/// Load all inputs and render them with `block`, returns the html
pub fn render(args: &Args, block: &mut CacheableLicensingBlock) -> Result<String, LicensingError> {
    let config = SiteConfig::from_path(&args.config)?;
    let page = Page::from_path(&args.page)?;
    let translations = match &args.locale {
        Some(path) => Translations::from_path(path)?,
        None => Translations::new(),
    };
    let helper = SiteHelper::new(&config, &translations)?;

    let node = block.render(&config, &page, &helper)?;
    let html = if args.standalone {
        standalone_document(&config, &page, node).to_string()
    } else {
        node.to_string()
    };
    Ok(html)
}

/// Render and write to output or stdout
pub fn run(args: &Args, block: &mut CacheableLicensingBlock) -> Result<(), LicensingError> {
    let html = render(args, block)?;
    match &args.output {
        Some(output) => {
            fs::write(output, html)
                .map_err(|e| LicensingError::from(e).with_context(output.display().to_string()))?;
            info!("Written licensing block to {output:?}");
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn main() {
    let args: Args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log.unwrap_or(LevelFilter::Info))
        .init();

    let mut block = CacheableLicensingBlock::new();
    if let Err(e) = run(&args, &mut block) {
        error!("{e}");
        if !args.watch {
            exit(1);
        }
    }

    if args.watch {
        if let (Some(port), Some(output)) = (args.port, args.output.clone()) {
            thread::spawn(move || preview::start_preview_server(output, port));
        }
        if let Err(e) = watch::watch_and_rerender(&args, block) {
            error!("{e}");
            exit(1);
        }
    }
}
