//! Front door of the pdep workspace.
//!
//! Wraps the parser and the code model behind an [`Engine`]: add PHP
//! files, finish, and query the resulting [`Analysis`]. Configuration
//! comes from [`Config`]; logging is opt-in through [`init_tracing`].

mod config;
mod engine;
mod error;


use std::sync::Once;

pub use config::{Config, ENV_EXCLUDE_NAMESPACES, ENV_NO_TOKEN_CACHE, ENV_WITHOUT_ANNOTATIONS};
pub use engine::{Analysis, Engine};
pub use error::EngineError;

pub use pdep_code as code;
pub use pdep_ir as ir;
pub use pdep_parse::{ParseError, ParserConfig};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Does nothing otherwise, and nothing on any call after the first.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
