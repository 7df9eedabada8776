//! CLI argument definitions for quatview

use clap::Parser;
use quatview_core::{Vec3, ViewerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quatview")]
#[command(about = "Interactive quaternion rotation viewer for the terminal")]
#[command(version)]
pub struct Cli {
    /// Mesh file to load (.obj or .stl); a cube is shown when omitted
    pub mesh: Option<PathBuf>,

    /// Rotation axis as X,Y,Z
    #[arg(long, value_parser = parse_axis, allow_hyphen_values = true, default_value = "1,0,0")]
    pub axis: Vec3,

    /// Rotation angle in degrees
    #[arg(long, value_parser = parse_angle, default_value = "45.0", allow_hyphen_values = true)]
    pub angle: f64,

    /// Apply the rotation on startup
    #[arg(long)]
    pub apply: bool,

    /// Hide the coordinate axes
    #[arg(long)]
    pub no_axes: bool,

    /// Hide the X/Y/Z letters at the axis tips
    #[arg(long)]
    pub no_axis_labels: bool,

    /// Hide the rotation axis arrow
    #[arg(long)]
    pub no_rotation_axis: bool,

    /// Hide the angle arc and readout
    #[arg(long)]
    pub no_angle: bool,

    /// Hide the original mesh
    #[arg(long)]
    pub hide_original: bool,

    /// Hide the rotated mesh
    #[arg(long)]
    pub hide_rotated: bool,

    /// Start with an orthographic projection
    #[arg(long)]
    pub orthographic: bool,

    /// Frames per second
    #[arg(long, default_value = "30")]
    pub fps: u32,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn viewer_config(&self) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.overlay.show_axes = !self.no_axes;
        config.overlay.show_axis_labels = !(self.no_axes || self.no_axis_labels);
        config.overlay.show_rotation_axis = !self.no_rotation_axis;
        config.overlay.show_angle_label = !self.no_angle;
        config.visibility.show_original = !self.hide_original;
        config.visibility.show_rotated = !self.hide_rotated;
        config
    }
}

/// Parse a finite number; `inf` and `NaN` are refused.
fn parse_finite(s: &str) -> Result<f64, String> {
    let value = s.trim().parse::<f64>().map_err(|e| format!("invalid number {:?}: {}", s, e))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{:?} is not a finite number", s))
    }
}

/// Parse an angle in degrees.
pub fn parse_angle(s: &str) -> Result<f64, String> {
    parse_finite(s)
}

/// Parse `X,Y,Z` into a vector.
pub fn parse_axis(s: &str) -> Result<Vec3, String> {
    let parts = s.split(',').map(parse_finite).collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        &[x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected three comma-separated components, got {}", parts.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_axis() {
        assert_eq!(parse_axis("0, -1,0.5").unwrap(), Vec3::new(0.0, -1.0, 0.5));
        assert!(parse_axis("1,2").is_err());
        assert!(parse_axis("1,a,2").is_err());
        assert!(parse_axis("1,inf,0").is_err());
    }

    #[test]
    fn test_angle_must_be_finite() {
        assert_eq!(parse_angle("-1e12").unwrap(), -1e12);
        for bad in ["inf", "-inf", "NaN"] {
            assert!(parse_angle(bad).is_err());
            assert!(Cli::try_parse_from(["quatview", "--angle", bad]).is_err());
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["quatview"]);
        assert!(cli.mesh.is_none());
        assert_eq!(cli.axis, Vec3::X);
        assert_eq!(cli.angle, 45.0);
        assert_eq!(cli.viewer_config(), ViewerConfig::default());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "quatview",
            "model.obj",
            "--axis",
            "-1,0,0",
            "--angle",
            "-30",
            "--no-axes",
            "--hide-original",
        ]);
        assert_eq!(cli.mesh, Some(PathBuf::from("model.obj")));
        assert_eq!(cli.axis, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(cli.angle, -30.0);

        let config = cli.viewer_config();
        assert!(!config.overlay.show_axes);
        assert!(!config.overlay.show_axis_labels);
        assert!(config.overlay.show_rotation_axis);
        assert!(!config.visibility.show_original);
        assert!(config.visibility.show_rotated);
    }
}
