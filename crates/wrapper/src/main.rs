//! transcode-wrapper - lets file-only encoders sit in a streamed pipeline.
//!
//! ```text
//! transcode-wrapper --encode --suffix .wav -- afconvert -f m4af %i out.m4a
//! transcode-wrapper --decode --suffix .wav -- some-decoder in.x -o %o
//! ```
//!
//! Logging goes to standard error; standard output is reserved for the
//! wrapped program (encode) or the decoded audio (decode).

mod bridge;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcoder_core::codec::{INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};

use bridge::{Bridge, Direction};

/// Command-line arguments for transcode-wrapper
#[derive(Parser, Debug)]
#[command(name = "transcode-wrapper")]
#[command(about = "Bridges a byte stream to programs that only read or write files")]
#[command(version)]
struct Args {
    /// Spool stdin to a temp file and run the command on it
    #[arg(short, long, conflicts_with = "decode", required_unless_present = "decode")]
    encode: bool,

    /// Run the command into a temp file and copy it to stdout
    #[arg(short, long)]
    decode: bool,

    /// Suffix of the temp file, e.g. `.wav`
    #[arg(short, long, default_value = "")]
    suffix: String,

    /// Token replaced by the temp file path (default `%i` for encode, `%o` for decode)
    #[arg(short, long)]
    placeholder: Option<String>,

    /// Directory for the temp file
    #[arg(long, env = "TRANSCODER_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Program and arguments to run
    #[arg(last = true, required = true)]
    command: Vec<OsString>,
}

impl Args {
    fn into_bridge(self) -> Bridge {
        let direction = if self.decode {
            Direction::Decode
        } else {
            Direction::Encode
        };
        let placeholder = self.placeholder.unwrap_or_else(|| {
            match direction {
                Direction::Encode => INPUT_PLACEHOLDER,
                Direction::Decode => OUTPUT_PLACEHOLDER,
            }
            .to_string()
        });

        Bridge {
            direction,
            suffix: self.suffix,
            placeholder,
            temp_dir: self.temp_dir,
            command: self.command,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    let bridge = args.into_bridge();
    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    bridge.run(&mut stdin, &mut stdout).await
}
