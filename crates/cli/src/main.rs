#![deny(unsafe_code)]
//! CLI for previewing the galaxy backdrop without a browser.
//!
//! Subcommands:
//! - `preview` -- build the scene, run the frame loop, write a PNG
//! - `presets` -- print the built-in parameter sets

mod error;

use backdrop_core::scene::build_scene_with;
use backdrop_core::{
    BackdropConfig, Capability, FrameLoop, LoopState, ParticleFieldParameters, Preset, Srgb, Xorshift64,
};
use backdrop_preview::RasterBackend;
use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;

/// Simulated frame interval when running several frames.
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser)]
#[command(name = "backdrop", about = "Galaxy backdrop preview CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the backdrop to a PNG.
    Preview {
        /// Parameter preset (portfolio, classic).
        #[arg(short, long, default_value = "portfolio")]
        preset: String,

        /// Use the mobile capability regardless of width.
        #[arg(long)]
        mobile: bool,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Viewport width in CSS pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: u32,

        /// Viewport height in CSS pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: u32,

        /// Device pixel ratio (capped like the page does).
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Frames to advance before the snapshot.
        #[arg(long, default_value_t = 1)]
        frames: u32,

        /// Background color behind the transparent canvas.
        #[arg(long, default_value = "#0a0a0a")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "backdrop.png")]
        output: PathBuf,

        /// Particle field overrides as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List presets and the parameter schema.
    Presets,
}

struct PreviewArgs {
    preset: String,
    mobile: bool,
    seed: u64,
    width: u32,
    height: u32,
    scale: f64,
    frames: u32,
    background: String,
    output: PathBuf,
    params: String,
}

fn preview(args: PreviewArgs, json: bool) -> Result<(), CliError> {
    let overrides: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let background = Srgb::from_hex(&args.background)?;
    let preset = Preset::from_name(&args.preset)?;
    let capability = if args.mobile {
        Capability::Mobile
    } else {
        Capability::detect(f64::from(args.width))
    };

    let mut config = BackdropConfig::with_preset(preset, capability);
    config.field = config.field.with_overrides(&overrides);
    config.field.validate()?;

    let ratio = config.pixel_ratio(args.scale);
    let px = |v: u32| (f64::from(v) * ratio).round() as u32;
    let (css_w, css_h) = (f64::from(args.width), f64::from(args.height));

    let mut rng = Xorshift64::new(args.seed);
    let ctx = build_scene_with(config, css_w, css_h, &mut rng);
    let mut frame_loop = FrameLoop::new(ctx, RasterBackend::new(px(args.width), px(args.height), background));
    frame_loop.resize(css_w, css_h, args.scale);

    for frame in 0..args.frames.max(1) {
        if frame_loop.tick(f64::from(frame) * FRAME_MS) == LoopState::Stopped {
            return Err(CliError::Render(format!("frame loop stopped at frame {frame}")));
        }
    }

    backdrop_preview::snapshot::write_frame(frame_loop.backend(), &args.output)?;
    let (out_w, out_h) = (frame_loop.backend().width(), frame_loop.backend().height());
    let particles = frame_loop.context().config.field.count;
    let capability = frame_loop.context().capability();
    let frames = frame_loop.frames();
    frame_loop.teardown();

    if json {
        let info = serde_json::json!({
            "preset": preset.name(),
            "capability": capability,
            "particles": particles,
            "width": out_w,
            "height": out_h,
            "frames": frames,
            "seed": args.seed,
            "output": args.output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({capability:?}, {particles} particles, {out_w}x{out_h}, seed {}) -> {}",
            preset.name(),
            args.seed,
            args.output.display()
        );
    }
    Ok(())
}

fn presets(json: bool) -> Result<(), CliError> {
    let names = Preset::list_names();
    if json {
        let mut presets = serde_json::Map::new();
        for &name in names {
            let preset = Preset::from_name(name)?;
            presets.insert(
                name.to_string(),
                serde_json::json!({
                    "desktop": preset.parameters(Capability::Desktop),
                    "mobile": preset.parameters(Capability::Mobile),
                }),
            );
        }
        let info = serde_json::json!({
            "presets": presets,
            "schema": ParticleFieldParameters::schema(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Presets:");
        for &name in names {
            let preset = Preset::from_name(name)?;
            let desktop = preset.parameters(Capability::Desktop);
            let mobile = preset.parameters(Capability::Mobile);
            println!(
                "  {name:<10} {} / {} particles, {} arms, radius {}",
                desktop.count, mobile.count, desktop.branch_count, desktop.radius
            );
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Presets => presets(cli.json),
        Command::Preview {
            preset,
            mobile,
            seed,
            width,
            height,
            scale,
            frames,
            background,
            output,
            params,
        } => preview(
            PreviewArgs {
                preset,
                mobile,
                seed,
                width,
                height,
                scale,
                frames,
                background,
                output,
                params,
            },
            cli.json,
        ),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::debug!("exiting with code {}", e.exit_code());
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
