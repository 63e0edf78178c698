use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use grana_core::models::ParamField;
use grana_core::{CoreDefaults, EditSession, ModelRegistry, Rgb};

use grana_cli::determine_output_path;

/// Options for the render command, collected from the command line.
pub struct RenderArgs {
    pub input: PathBuf,
    pub out: Option<PathBuf>,
    pub preset: Option<PathBuf>,
    pub auto: bool,
    pub export: String,
    pub seed: Option<u32>,
    pub config: Option<PathBuf>,
    pub grain_alpha: Option<f32>,
    pub grain_scale: Option<f32>,
    pub contrast: Option<f32>,
    pub temperature: Option<f32>,
    pub threshold: Option<f32>,
    pub bright_color: Option<Rgb>,
    pub bright_alpha: Option<f32>,
    pub dark_color: Option<Rgb>,
    pub dark_alpha: Option<f32>,
    pub verbose: bool,
}

/// Execute the render command for a single image.
///
/// Opens an editing session, applies a preset file and/or the predicted
/// preset, then any explicit control overrides, and exports the result at
/// full resolution. Overrides always win over preset values.
pub fn cmd_render(args: RenderArgs) -> Result<(), String> {
    let start_time = Instant::now();

    if args.verbose {
        grana_core::config::set_verbose(true);
    }

    let defaults = match &args.config {
        Some(path) => CoreDefaults::load_from_file(path)?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("Failed to determine working directory: {}", e))?;
            let (defaults, source) = CoreDefaults::discover(&cwd)?;
            if let Some(source) = source {
                grana_core::verbose_println!("[grana] using config {}", source.display());
            }
            defaults
        }
    };

    let registry = Arc::new(ModelRegistry::load_builtin()?);

    let image = grana_core::decoders::decode_image(&args.input)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut session = EditSession::from_image(image, defaults, registry, seed);

    if let Some(preset_path) = &args.preset {
        let params = grana_core::presets::load_preset(preset_path)?;
        session.set_params(params);
    }

    if args.auto && session.request_preset().is_none() {
        eprintln!("Warning: preset prediction unavailable, continuing with current settings");
    }

    apply_overrides(&mut session, &args);

    let frame = session.export();
    let output_path = determine_output_path(&args.input, args.out.clone(), &args.export);
    grana_core::exporters::export_image(&frame, &output_path)?;

    println!("Rendered: {}", output_path.display());
    println!("  {}x{}, seed {}", frame.width, frame.height, session.seed());
    println!("  Completed in {:.2}s", start_time.elapsed().as_secs_f32());

    Ok(())
}

fn apply_overrides(session: &mut EditSession, args: &RenderArgs) {
    let scalar_overrides = [
        (ParamField::GrainAlpha, args.grain_alpha),
        (ParamField::GrainScale, args.grain_scale),
        (ParamField::Contrast, args.contrast),
        (ParamField::Temperature, args.temperature),
        (ParamField::Threshold, args.threshold),
    ];
    for (field, value) in scalar_overrides {
        if let Some(value) = value {
            session.set_param(field, value, true);
        }
    }

    if let Some(color) = args.bright_color {
        session.set_bright_color(color);
        session.set_bright_overlay(true);
    }
    if let Some(alpha) = args.bright_alpha {
        session.set_param(ParamField::BrightAlpha, alpha, true);
        session.set_bright_overlay(true);
    }
    if let Some(color) = args.dark_color {
        session.set_dark_color(color);
        session.set_dark_overlay(true);
    }
    if let Some(alpha) = args.dark_alpha {
        session.set_param(ParamField::DarkAlpha, alpha, true);
        session.set_dark_overlay(true);
    }
}
