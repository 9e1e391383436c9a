//! Command-line interface wiring for the `mdcards` binary.
//!
//! This module owns the clap definitions; the heavy lifting lives in the
//! library's [`Pipeline`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mdcards::{CardOptions, DEFAULT_MARKER, LogObserver, Pipeline, Template, TemplateConfig};

pub mod common;
pub mod utils;

use common::PaginateArg;
use utils::{asset_root, describe_plan, read_input};

/// Parsed CLI entrypoint for the `mdcards` binary.
#[derive(Parser, Debug)]
#[command(
    name = "mdcards",
    version,
    about = "Turn a markdown document into paginated PNG cards"
)]
pub struct Cli {
    /// Markdown file to render (`-` reads stdin).
    #[arg(required_unless_present = "dump_template")]
    pub input: Option<PathBuf>,
    /// JSON template; built-in defaults apply when omitted.
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Directory receiving `page_NN.png` files.
    #[arg(short = 'o', long, default_value = "cards")]
    pub output: PathBuf,
    /// Character budget per page, used with `--paginate chars`.
    #[arg(long = "max_chars", default_value_t = 1000)]
    pub max_chars: usize,
    /// Token that forces a page break wherever it appears.
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,
    /// How page boundaries are chosen.
    #[arg(long, value_enum, default_value_t = PaginateArg::Height)]
    pub paginate: PaginateArg,
    /// Print the page plan without writing images.
    #[arg(long)]
    pub dry_run: bool,
    /// Print the effective template as JSON and exit.
    #[arg(long)]
    pub dump_template: bool,
}

/// Execute the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    if cli.dump_template {
        return dump_template(&cli);
    }
    let Some(input) = cli.input.as_deref() else {
        anyhow::bail!("an input file is required");
    };

    let observer = LogObserver;
    let template = Template::load(cli.template.as_deref(), &observer)
        .context("failed to load template")?;
    log::debug!("using {:?}", template);

    let text = read_input(input)?;
    let options = CardOptions {
        marker: cli.marker.clone(),
        policy: cli.paginate.policy(cli.max_chars),
        asset_root: asset_root(input),
    };
    let pipeline = Pipeline::new(&template, options).with_observer(&observer);

    if cli.dry_run {
        print!("{}", describe_plan(&pipeline.plan(&text)));
        return Ok(());
    }

    let written = pipeline.write_cards(&text, &cli.output)?;
    println!(
        "Rendered {} card(s) to {}",
        written.len(),
        cli.output.display()
    );
    Ok(())
}

fn dump_template(cli: &Cli) -> Result<()> {
    let config = match cli.template.as_deref() {
        Some(path) => TemplateConfig::from_path(path)?,
        None => TemplateConfig::default(),
    };
    let json = serde_json::to_string_pretty(&config).context("failed to serialize template")?;
    println!("{json}");
    Ok(())
}
