//! Launch parameter parsing.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;

/// Default car model asset path.
pub const DEFAULT_CAR_MODEL: &str = "models/car.glb";
/// Default track model asset path.
pub const DEFAULT_TRACK_MODEL: &str = "models/track-v1.glb";
/// Default fixed physics rate in Hz.
pub const DEFAULT_PHYSICS_HZ: f64 = 120.0;
/// Default number of physics substeps per fixed step.
pub const DEFAULT_SUBSTEPS: u32 = 12;

/// Launch parameters for the demo.
#[derive(Resource, Debug, Clone)]
pub struct LaunchParams {
    /// Car glTF asset path.
    pub car_model: String,
    /// Track glTF asset path.
    pub track_model: String,
    /// Fixed physics rate in Hz.
    pub physics_hz: f64,
    /// Physics substeps per fixed step.
    pub substeps: u32,
    /// Extra drivable mesh name fragments.
    pub collision_patterns: Vec<String>,
    /// Whether the debug overlay starts visible.
    pub debug_ui: bool,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            car_model: DEFAULT_CAR_MODEL.to_string(),
            track_model: DEFAULT_TRACK_MODEL.to_string(),
            physics_hz: DEFAULT_PHYSICS_HZ,
            substeps: DEFAULT_SUBSTEPS,
            collision_patterns: Vec::new(),
            debug_ui: false,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    /// Parse a strictly positive physics rate.
    fn parse_physics_hz(s: &str) -> Result<f64, String> {
        let hz = s
            .parse::<f64>()
            .map_err(|e| format!("invalid rate: {e}"))?;
        if !hz.is_finite() || hz <= 0.0 {
            return Err(format!("physics rate must be positive, got {hz}"));
        }
        Ok(hz)
    }

    #[derive(Parser)]
    #[command(about = "Drive a car around a glTF race track")]
    pub(super) struct CliArgs {
        /// Car glTF asset path, relative to the assets folder.
        #[arg(long, default_value = DEFAULT_CAR_MODEL)]
        car_model: String,

        /// Track glTF asset path, relative to the assets folder.
        #[arg(long, default_value = DEFAULT_TRACK_MODEL)]
        track_model: String,

        /// Fixed physics rate in Hz.
        #[arg(long, default_value_t = DEFAULT_PHYSICS_HZ, value_parser = parse_physics_hz)]
        physics_hz: f64,

        /// Physics substeps per fixed step.
        #[arg(
            long,
            default_value_t = DEFAULT_SUBSTEPS,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        substeps: u32,

        /// Extra mesh name fragment to treat as drivable (repeatable).
        #[arg(long = "collision-pattern")]
        collision_patterns: Vec<String>,

        /// Show the debug overlay on startup.
        #[arg(long)]
        debug_ui: bool,
    }

    impl From<CliArgs> for LaunchParams {
        fn from(args: CliArgs) -> Self {
            Self {
                car_model: args.car_model,
                track_model: args.track_model,
                physics_hz: args.physics_hz,
                substeps: args.substeps,
                collision_patterns: args.collision_patterns,
                debug_ui: args.debug_ui,
            }
        }
    }

    pub fn parse() -> LaunchParams {
        CliArgs::parse().into()
    }

}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
