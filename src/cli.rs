//! Command-line interface definitions and helpers.
//!
//! Argument parsing, the subcommand handlers for `list-cameras` and
//! `config`, and small value parsers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::camera;
use crate::config::default_path as get_config_path;

/// Parse and validate a resolution in WIDTHxHEIGHT form.
pub fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 640x480)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Resolution width and height must be greater than 0".to_string());
    }
    Ok((width, height))
}

/// Parse and validate the display refresh rate (1-240).
pub fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid refresh rate", s))?;
    if !(1..=240).contains(&fps) {
        return Err(format!(
            "Refresh rate must be between 1 and 240, got {}",
            fps
        ));
    }
    Ok(fps)
}

/// Live webcam as ASCII art in your terminal
#[derive(Parser, Debug)]
#[command(name = "ascii-cam")]
#[command(version, about = "Live webcam as ASCII art in your terminal", long_about = None)]
#[command(after_help = "KEYS (while running):
    s      save a PNG snapshot of the current frame
    t      save the current frame as plain text
    q      quit (also Esc or Ctrl-C)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Run without a camera (blank output, mostly for debugging)
    #[arg(long)]
    pub no_camera: bool,

    /// ASCII grid width in characters (default 150)
    #[arg(long)]
    pub width: Option<u16>,

    /// ASCII grid height in characters (default 90)
    #[arg(long)]
    pub height: Option<u16>,

    /// Requested capture resolution (WIDTHxHEIGHT)
    #[arg(long, value_parser = parse_resolution)]
    pub resolution: Option<(u32, u32)>,

    /// Display refresh rate to synchronize to (default 60)
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Mirror horizontally even if disabled in the config
    #[arg(long, conflicts_with = "no_mirror")]
    pub mirror: bool,

    /// Disable horizontal mirroring (selfie view is the default)
    #[arg(long)]
    pub no_mirror: bool,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Directory for snapshot and text exports
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the config file location and whether it exists
    Show,
    /// Create a default config file
    Init,
}

/// List available cameras and print them to stdout.
pub fn list_cameras() {
    match camera::list_devices() {
        Ok(devices) => {
            if devices.is_empty() {
                println!("No cameras found.");
                println!();
                println!("Make sure your camera is connected and permissions are granted.");
                println!("On macOS, grant access in System Settings > Privacy & Security > Camera.");
            } else {
                println!("Available cameras:");
                for device in devices {
                    println!("  {}", device);
                }
                println!();
                println!("Use --camera <index> to select a camera.");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction) {
    match action {
        ConfigAction::Show => {
            let config_path = get_config_path();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
                println!("Run 'ascii-cam config init' to create one.");
            }
        }
        ConfigAction::Init => {
            let config_path = get_config_path();

            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            let default_config = r#"# ascii-cam configuration

[camera]
# Camera device index (see: ascii-cam list-cameras)
device = 0
# Mirror horizontally (selfie view)
mirror = true
# Requested capture resolution
resolution = "640x480"

[grid]
# ASCII output dimensions in characters
width = 150
height = 90

[ascii]
# Invert brightness (for light terminals)
invert = false

[export]
# Directory for snapshots and text dumps (default: current directory)
# output_dir = "~/Pictures"

[display]
# Display refresh rate the render loop synchronizes to
fps = 60
"#;

            if let Err(e) = std::fs::write(&config_path, default_config) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== CLI Default Values Tests ====================

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["ascii-cam"]);
        assert!(args.command.is_none());
        assert!(args.camera.is_none());
        assert!(!args.no_camera);
        assert!(args.width.is_none());
        assert!(args.height.is_none());
        assert!(args.resolution.is_none());
        assert!(args.fps.is_none());
        assert!(!args.no_mirror);
        assert!(!args.invert);
        assert!(args.output_dir.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_grid_dimensions() {
        let args = Args::parse_from(["ascii-cam", "--width", "80", "--height", "24"]);
        assert_eq!(args.width, Some(80));
        assert_eq!(args.height, Some(24));
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from(["ascii-cam", "--no-mirror", "--invert", "--no-camera"]);
        assert!(args.no_mirror);
        assert!(args.invert);
        assert!(args.no_camera);
    }

    #[test]
    fn test_args_mirror_flags_conflict() {
        assert!(Args::try_parse_from(["ascii-cam", "--mirror", "--no-mirror"]).is_err());
    }

    #[test]
    fn test_args_resolution() {
        let args = Args::parse_from(["ascii-cam", "--resolution", "1280x720"]);
        assert_eq!(args.resolution, Some((1280, 720)));
    }

    #[test]
    fn test_args_bad_resolution_rejected() {
        assert!(Args::try_parse_from(["ascii-cam", "--resolution", "huge"]).is_err());
        assert!(Args::try_parse_from(["ascii-cam", "--resolution", "0x480"]).is_err());
    }

    #[test]
    fn test_args_fps_bounds() {
        let args = Args::parse_from(["ascii-cam", "--fps", "30"]);
        assert_eq!(args.fps, Some(30));
        assert!(Args::try_parse_from(["ascii-cam", "--fps", "0"]).is_err());
        assert!(Args::try_parse_from(["ascii-cam", "--fps", "500"]).is_err());
    }

    #[test]
    fn test_args_output_dir() {
        let args = Args::parse_from(["ascii-cam", "--output-dir", "/tmp/shots"]);
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/shots")));

        let args = Args::parse_from(["ascii-cam", "-o", "/tmp/other"]);
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/other")));
    }

    #[test]
    fn test_args_config_option() {
        let args = Args::parse_from(["ascii-cam", "--config", "/tmp/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn test_args_list_cameras_subcommand() {
        let args = Args::parse_from(["ascii-cam", "list-cameras"]);
        assert!(matches!(args.command, Some(Command::ListCameras)));
    }

    #[test]
    fn test_args_config_subcommands() {
        let args = Args::parse_from(["ascii-cam", "config", "show"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));

        let args = Args::parse_from(["ascii-cam", "config", "init"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Init
            })
        ));
    }

    // ==================== Value Parser Tests ====================

    #[test]
    fn test_parse_resolution_valid() {
        assert_eq!(parse_resolution("640x480"), Ok((640, 480)));
        assert_eq!(parse_resolution("1920x1080"), Ok((1920, 1080)));
    }

    #[test]
    fn test_parse_resolution_invalid() {
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("640x480x2").is_err());
        assert!(parse_resolution("wxh").is_err());
        assert!(parse_resolution("640x0").is_err());
    }

    #[test]
    fn test_parse_fps_bounds() {
        assert_eq!(parse_fps("1"), Ok(1));
        assert_eq!(parse_fps("240"), Ok(240));
        assert!(parse_fps("0").is_err());
        assert!(parse_fps("241").is_err());
        assert!(parse_fps("abc").is_err());
    }
}
