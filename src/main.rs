//! ascii-cam binary: wires config, camera, render loop and terminal together.

use std::path::PathBuf;

use clap::Parser;

use ascii_cam::camera::{CameraCapture, CameraSettings, Resolution};
use ascii_cam::cli::{self, Args, Command};
use ascii_cam::config::Config;
use ascii_cam::display::Display;
use ascii_cam::event_loop;
use ascii_cam::render_loop::RenderLoop;
use ascii_cam::scheduler::TickScheduler;

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    device: u32,
    resolution: Resolution,
    mirror: bool,
    width: u16,
    height: u16,
    invert: bool,
    fps: u32,
    output_dir: PathBuf,
}

impl Settings {
    /// CLI flags win over config values; config values win over defaults.
    fn merge(args: &Args, config: &Config) -> Result<Self, String> {
        let resolution = match (args.resolution, config.camera.resolution.as_deref()) {
            (Some((width, height)), _) => Resolution { width, height },
            (None, Some(s)) => {
                let (width, height) = cli::parse_resolution(s)?;
                Resolution { width, height }
            }
            (None, None) => Resolution::FRONT,
        };

        Ok(Self {
            device: args.camera.unwrap_or(config.camera.device),
            resolution,
            mirror: if args.mirror {
                true
            } else if args.no_mirror {
                false
            } else {
                config.camera.mirror
            },
            width: args.width.unwrap_or(config.grid.width),
            height: args.height.unwrap_or(config.grid.height),
            invert: args.invert || config.ascii.invert,
            fps: args.fps.unwrap_or(config.display.fps),
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| config.export.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Some(Command::ListCameras) => {
            cli::list_cameras();
            return;
        }
        Some(Command::Config { action }) => {
            cli::handle_config_action(action);
            return;
        }
        None => {}
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::merge(&args, &config)?;

    // Camera failure is not fatal: the loop keeps running and publishes a
    // blank frame forever. No retry.
    let camera = if args.no_camera {
        None
    } else {
        let cam_settings = CameraSettings {
            device_index: settings.device,
            resolution: settings.resolution,
            fps: 30,
            mirror: settings.mirror,
        };
        match CameraCapture::open(cam_settings).and_then(|mut cam| cam.start().map(|()| cam)) {
            Ok(cam) => Some(cam),
            Err(e) => {
                log::error!("Error accessing the camera: {}", e);
                None
            }
        }
    };

    let mut scheduler = TickScheduler::new(settings.fps);
    let mut render_loop = RenderLoop::new(
        settings.width,
        settings.height,
        settings.invert,
        scheduler.token(),
    );
    if let Some(cam) = camera {
        render_loop.attach_camera(cam);
    }

    let mut display = Display::new()?;
    let result = event_loop::run(
        &mut render_loop,
        &mut scheduler,
        &mut display,
        &settings.output_dir,
    )
    .await;

    // Cancel pending ticks and release the camera before the terminal is
    // restored, whatever the loop's outcome was.
    render_loop.teardown();
    drop(display);

    result?;
    Ok(())
}
