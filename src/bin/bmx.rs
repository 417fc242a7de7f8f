// src/bin/bmx.rs
use bmx_codec::{bmx_to_png, png_to_bmx, FrameSequence, ImageCrateCodec};
use clap::{Parser, Subcommand};
use log::error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmx")]
#[command(version)]
#[command(about = "Convert between 1-bpp BMX/BM bitmaps and PNG")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a .bmx file to PNG
    #[command(name = "bmx2png")]
    Bmx2png {
        input: PathBuf,
        /// Defaults to the input path with a .png extension
        output: Option<PathBuf>,
    },

    /// Threshold an image at mid-gray and write it as .bmx
    #[command(name = "png2bmx")]
    Png2bmx {
        input: PathBuf,
        /// Defaults to the input path with a .bmx extension
        output: Option<PathBuf>,
    },

    /// Decode a directory of frame_NN.bm files (with its meta record) to PNGs
    #[command(name = "bm2png")]
    Bm2png {
        dir: PathBuf,
        /// Defaults to the frame directory itself
        output_dir: Option<PathBuf>,
    },
}

fn default_output(input: &Path, output: Option<PathBuf>, ext: &str) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension(ext))
}

fn run(command: Commands) -> bmx_codec::Result<()> {
    let codec = ImageCrateCodec;
    match command {
        Commands::Bmx2png { input, output } => {
            let output = default_output(&input, output, "png");
            bmx_to_png(&input, &output, &codec)?;
        }
        Commands::Png2bmx { input, output } => {
            let output = default_output(&input, output, "bmx");
            png_to_bmx(&input, &output, &codec)?;
        }
        Commands::Bm2png { dir, output_dir } => {
            let sequence = FrameSequence::load(&dir)?;
            let out_dir = output_dir.unwrap_or_else(|| dir.clone());
            sequence.save_png(&out_dir, &codec)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
