//! # `answersmith`
//!
//! `answersmith` generates the answers file that drives an unattended Alpine Linux
//! installation (`setup-alpine -f answers.txt`).
//!
//! ## Usage
//!
//! ```sh
//! answersmith generate --hostname web01 --disk /dev/sda --groups wheel,audio -o answers.txt
//! answersmith validate --config site.yaml
//! answersmith version
//! ```
//!
//! The template is read from `$TEMPLATE_DIR/answers.tmpl` (default `templates/`).

use answersmith::cli::Args;
use answersmith::error::AnswersError;
use clap::Parser as _;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match answersmith::run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(
                err.downcast_ref::<AnswersError>()
                    .map_or(1, AnswersError::exit_code),
            );
        }
    }
}
