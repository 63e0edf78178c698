use clap::{Parser, Subcommand};
use grana_cli::parse_color;
use std::path::PathBuf;

mod commands;

use commands::{cmd_analyze, cmd_preset_create, cmd_preset_list, cmd_preset_show, cmd_render};

#[derive(Parser)]
#[command(name = "grana")]
#[command(version, about = "Film grain and color grading for photos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an image with grain, grading, and adjustments
    Render {
        /// Input file (PNG or TIFF)
        input: PathBuf,

        /// Output file path (defaults to <input>_graded.<ext>)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Parameter preset file (YAML)
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Predict starting values from image content
        #[arg(long)]
        auto: bool,

        /// Export format: png or tiff
        #[arg(long, default_value = "png")]
        export: String,

        /// Grain noise seed (random when omitted)
        #[arg(long)]
        seed: Option<u32>,

        /// Config file path (otherwise discovered in the working directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Grain opacity, 0.0-1.0
        #[arg(long)]
        grain_alpha: Option<f32>,

        /// Grain block scale, 1.0-3.0
        #[arg(long)]
        grain_scale: Option<f32>,

        /// Contrast factor, 0.8-1.2
        #[arg(long)]
        contrast: Option<f32>,

        /// White balance in Kelvin, 2000-10000
        #[arg(long)]
        temperature: Option<f32>,

        /// Luminance threshold for the tone split, 0.0-1.0
        #[arg(long)]
        threshold: Option<f32>,

        /// Highlight overlay color (hex #RRGGBB or R,G,B floats)
        #[arg(long, value_parser = parse_color)]
        bright_color: Option<grana_core::Rgb>,

        /// Highlight overlay opacity, 0.0-1.0
        #[arg(long)]
        bright_alpha: Option<f32>,

        /// Shadow overlay color (hex #RRGGBB or R,G,B floats)
        #[arg(long, value_parser = parse_color)]
        dark_color: Option<grana_core::Rgb>,

        /// Shadow overlay opacity, 0.0-1.0
        #[arg(long)]
        dark_alpha: Option<f32>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an image and report its feature vector
    Analyze {
        /// Input file (PNG or TIFF)
        input: PathBuf,

        /// Also run the preset predictor over the features
        #[arg(long)]
        predict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage parameter presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List available presets
    List {
        /// Presets directory (defaults to ~/grana/presets)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show the control values stored in a preset
    Show {
        /// Preset name or file path
        preset: String,
    },

    /// Create a new preset template
    Create {
        /// Output file path
        output: PathBuf,

        /// Preset name
        #[arg(short, long)]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            out,
            preset,
            auto,
            export,
            seed,
            config,
            grain_alpha,
            grain_scale,
            contrast,
            temperature,
            threshold,
            bright_color,
            bright_alpha,
            dark_color,
            dark_alpha,
            verbose,
        } => cmd_render(commands::RenderArgs {
            input,
            out,
            preset,
            auto,
            export,
            seed,
            config,
            grain_alpha,
            grain_scale,
            contrast,
            temperature,
            threshold,
            bright_color,
            bright_alpha,
            dark_color,
            dark_alpha,
            verbose,
        }),

        Commands::Analyze {
            input,
            predict,
            json,
            verbose,
        } => cmd_analyze(input, predict, json, verbose),

        Commands::Preset { action } => match action {
            PresetAction::List { dir } => cmd_preset_list(dir),
            PresetAction::Show { preset } => cmd_preset_show(preset),
            PresetAction::Create { output, name } => cmd_preset_create(output, name),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
