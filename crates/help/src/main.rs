//! MudProg help generator
//!
//! Builds the prog runtime exactly as the server does and prints the
//! documentation for every registered function and entity property.
//!
//! Usage: `proghelp [progoptions.txt]`

use anyhow::Context;
use mudprog_config::{HelpFormat, ProgConfig};
use mudprog_scripting::help::HelpDocument;
use mudprog_scripting::runtime;
use mudprog_scripting::ProgRuntime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let options_path = std::env::args().nth(1);

    let loaded = match &options_path {
        Some(path) => ProgConfig::load_from_file(path),
        None => ProgConfig::load_default(),
    };
    let (config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (ProgConfig::default(), Some(e)),
    };

    // Environment filter wins over the options file
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match load_error {
        None => info!("Configuration loaded"),
        Some(e) => {
            warn!("Failed to load prog options: {}", e);
            warn!("Using default configuration");
        }
    }
    config.display();

    let builder = ProgRuntime::builder(config)
        .with_standard_library()
        .with_entity_types(mudprog_game::register_entity_types);
    let runtime = runtime::initialise(builder).context("prog runtime failed to start")?;

    let document = HelpDocument::for_runtime(runtime);
    let output = match runtime.config().help_format {
        HelpFormat::Text => document.render_text(runtime.config().help_width),
        HelpFormat::Json => document.to_json().context("failed to render help as JSON")?,
    };
    println!("{}", output);
    Ok(())
}
