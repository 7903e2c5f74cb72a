use std::fs;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use funj::{compile, declaration_types};

mod cli;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().without_time())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = cli::Args::parse();

    let module = args.sample.build()?;
    info!("built the {} tree", module.name);

    match args.mode {
        cli::Mode::Ast => {
            module.pretty_print().into_diagnostic()?;
        }
        cli::Mode::Types => {
            for (name, ty) in declaration_types(&module)? {
                println!("{name} :: {ty}");
            }
        }
        cli::Mode::Emit => {
            let units = compile(&module)?;
            let directory = args.output.unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&directory).into_diagnostic()?;
            for unit in units {
                let path = directory.join(&unit.name);
                if path.exists() {
                    warn!("{:?} already exists and will be overridden", &path);
                }
                fs::write(&path, &unit.text).into_diagnostic()?;
                info!("wrote {:?}", path);
            }
        }
    }

    Ok(())
}
