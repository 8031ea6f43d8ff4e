use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use framescan_core::retrieval::RetrievalMode;

#[derive(Parser, Debug)]
#[command(name = "framescan", version, about = "Fade, scene cut and thumbnail analysis for video files")]
pub struct Args {
    /// Analysis settings as JSON; missing fields use defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that receives JPEG images. Without it images are dropped from the output.
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame count, size, frame rate and codec.
    Details { input: PathBuf },
    /// Middle frame of the file, also checks whether frame-index seeking is reliable.
    Poster { input: PathBuf },
    /// Find where the content starts and ends.
    Fade {
        input: PathBuf,
        /// Seek by position ratio instead of frame index.
        #[arg(long)]
        ratio: bool,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Find hard cuts.
    Scenes {
        input: PathBuf,
        #[arg(long)]
        ratio: bool,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Grab frames as JPEG images.
    Thumbs {
        input: PathBuf,
        #[arg(required = true, num_args = 1..)]
        frames: Vec<u64>,
        #[arg(long)]
        ratio: bool,
        /// Return empty slots instead of searching neighbouring frames.
        #[arg(long, value_enum, default_value_t = Mode::Retry)]
        mode: Mode,
    },
    /// Run a JSON array of job requests.
    Batch { jobs: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Direct,
    Retry,
}

impl From<Mode> for RetrievalMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Direct => RetrievalMode::Direct,
            Mode::Retry => RetrievalMode::RetrySearch,
        }
    }
}
