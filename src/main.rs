use anyhow::Context;
use clap::Parser;
use serde_json::Value;

use modal_overlay::{Config, ConfigPatch, MemoryBackend, Modal, SpinnerKind, Variant, TEARDOWN_DELAY};

/// Renders the markup a modal mounts, optionally walking it through close.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Partial configuration as JSON, e.g. '{"type": "success"}'
    #[arg(long, env = "MODAL_CONFIG")]
    config: Option<String>,

    #[arg(long = "type", env = "MODAL_TYPE")]
    variant: Option<Variant>,

    #[arg(long, env = "MODAL_CLASS")]
    class: Option<String>,

    #[arg(long, env = "MODAL_TITLE")]
    title: Option<String>,

    #[arg(long, env = "MODAL_MESSAGE")]
    message: Option<String>,

    #[arg(long, env = "MODAL_CLOSABLE")]
    closable: Option<bool>,

    #[arg(long, env = "MODAL_SPINNER")]
    spinner: Option<SpinnerKind>,

    /// Print the effective configuration
    #[arg(long)]
    show_config: bool,

    /// Close the modal and run its teardown
    #[arg(long)]
    close: bool,
}

impl Args {
    fn patch(&self) -> ConfigPatch {
        ConfigPatch {
            variant: self.variant,
            style_class: self.class.clone(),
            title: self.title.clone(),
            message: self.message.clone(),
            closable: self.closable,
            spinner: self.spinner,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let partial: Option<Value> = args
        .config
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--config is not valid JSON")?;
    let flags = serde_json::to_value(args.patch())?;
    let config = Config::from_partials(&[partial.as_ref(), Some(&flags)])?;

    let backend = MemoryBackend::new();
    let modal = Modal::with_config(backend.clone(), config)?;

    if args.show_config {
        println!("{}", serde_json::to_string_pretty(modal.config())?);
    }
    for element in backend.elements() {
        println!("{}", element.outer_html());
    }

    if args.close {
        modal.set_on_close(|closed| println!("on close: {:?}", closed.state()));
        modal.close()?;

        println!("state: {:?}", modal.state());
        for element in backend.elements() {
            println!("{}", element.outer_html());
        }

        backend.advance(TEARDOWN_DELAY);
        println!("state: {:?}, live elements: {}", modal.state(), backend.live_count());
    }

    Ok(())
}
