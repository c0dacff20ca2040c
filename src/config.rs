//! Run configuration, its defaults, and the command-line overrides.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{GoreError, Result};

/// Smallest gore width that still keeps the panels printable.
pub const MIN_GORE_WIDTH_DEG: u32 = 15;
/// Widest gore; anything wider folds badly.
pub const MAX_GORE_WIDTH_DEG: u32 = 120;
/// Shift applied to the last gore so its east edge stays short of ±180°.
pub const ANTIMERIDIAN_NUDGE_DEG: f64 = 0.01;

/// Everything the pipeline needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GoreConfig {
    /// Pixel width of every gore tile.
    pub gore_pixel_width: u32,
    /// Angular width of every gore in degrees of longitude.
    pub gore_width_deg: u32,
    /// Outline stroke width in pixels (0 disables the outline).
    pub outline_stroke_width: f64,
    /// Where the composite image is written.
    pub output_path: PathBuf,
    /// GeoJSON land polygons, normally Natural Earth's 1:110m land layer
    /// (`ne_110m_land.geojson` from
    /// <https://github.com/nvkelso/natural-earth-vector/tree/master/geojson>).
    pub land_path: PathBuf,
    /// Interpolated points per rhumb half of the gore boundary.
    pub rhumb_points: usize,
    /// Render gores on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for GoreConfig {
    fn default() -> Self {
        Self {
            gore_pixel_width: 500,
            gore_width_deg: 60,
            outline_stroke_width: 4.0,
            output_path: PathBuf::from("globe.png"),
            land_path: PathBuf::from("data/ne_110m_land.json"),
            rhumb_points: 100,
            parallel: false,
        }
    }
}

impl GoreConfig {
    /// Reject parameter combinations that cannot tile the sphere.
    pub fn validate(&self) -> Result<()> {
        let width = self.gore_width_deg;
        if !(MIN_GORE_WIDTH_DEG..=MAX_GORE_WIDTH_DEG).contains(&width) {
            return Err(GoreError::Configuration {
                param: "gore width (degrees)",
                value: width.to_string(),
                reason: "must be between 15 and 120 (valid: 15, 20, 30, 60, 90, 120)",
            });
        }
        if 360 % width != 0 {
            return Err(GoreError::Configuration {
                param: "gore width (degrees)",
                value: width.to_string(),
                reason: "must divide 360 exactly (valid: 15, 20, 30, 60, 90, 120)",
            });
        }
        if self.gore_pixel_width == 0 {
            return Err(GoreError::Configuration {
                param: "gore width (pixels)",
                value: self.gore_pixel_width.to_string(),
                reason: "must be greater than 0",
            });
        }
        if !self.outline_stroke_width.is_finite() || self.outline_stroke_width < 0.0 {
            return Err(GoreError::Configuration {
                param: "outline width",
                value: self.outline_stroke_width.to_string(),
                reason: "must be a finite number >= 0",
            });
        }
        if self.rhumb_points == 0 {
            return Err(GoreError::Configuration {
                param: "rhumb points",
                value: self.rhumb_points.to_string(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Number of gores around the globe.
    pub fn gore_count(&self) -> usize {
        (360 / self.gore_width_deg) as usize
    }

    /// Central meridian of gore `index`, west to east from -180°.
    pub fn central_meridian(&self, index: usize) -> f64 {
        let width = self.gore_width_deg as f64;
        let cm = -180.0 + width / 2.0 + width * index as f64;
        // Keep the last gore's east edge off the antimeridian
        if index + 1 == self.gore_count() {
            cm - ANTIMERIDIAN_NUDGE_DEG
        } else {
            cm
        }
    }
}

/// Command-line arguments. Anything left unset keeps its default.
#[derive(Parser, Debug, Default)]
#[command(name = "gore-globe", about = "Render orange-peel globe gores to a single image")]
pub struct CliArgs {
    /// Pixel width of each gore.
    #[arg(short = 'p', long = "pixel-width")]
    pub pixel_width: Option<u32>,

    /// Gore width in degrees (15, 20, 30, 60, 90 or 120).
    #[arg(short = 'd', long = "gore-width")]
    pub gore_width: Option<u32>,

    /// Gore outline stroke width in pixels.
    #[arg(short = 'g', long = "outline-width")]
    pub outline_width: Option<f64>,

    /// Output image path (.png or .jpg).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// GeoJSON land dataset [default: data/ne_110m_land.json]. Download
    /// ne_110m_land.geojson from
    /// https://github.com/nvkelso/natural-earth-vector/tree/master/geojson
    #[arg(long)]
    pub land: Option<PathBuf>,

    /// Interpolated points per gore edge.
    #[arg(long)]
    pub rhumb_points: Option<usize>,

    /// Render gores in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl GoreConfig {
    /// Apply CLI overrides on top of the current values.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(p) = args.pixel_width {
            self.gore_pixel_width = p;
        }
        if let Some(d) = args.gore_width {
            self.gore_width_deg = d;
        }
        if let Some(g) = args.outline_width {
            self.outline_stroke_width = g;
        }
        if let Some(ref out) = args.output {
            self.output_path = out.clone();
        }
        if let Some(ref land) = args.land {
            self.land_path = land.clone();
        }
        if let Some(n) = args.rhumb_points {
            self.rhumb_points = n;
        }
        if args.parallel {
            self.parallel = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_width(deg: u32) -> GoreConfig {
        GoreConfig {
            gore_width_deg: deg,
            ..GoreConfig::default()
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(GoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_valid_widths_give_integer_counts() {
        for deg in MIN_GORE_WIDTH_DEG..=MAX_GORE_WIDTH_DEG {
            let config = with_width(deg);
            if config.validate().is_ok() {
                assert_eq!(config.gore_count() as u32 * deg, 360);
                assert!(config.gore_count() >= 3);
            }
        }
    }

    #[test]
    fn test_rejects_non_divisor() {
        let err = with_width(37).validate().unwrap_err();
        assert!(matches!(err, GoreError::Configuration { .. }));
        assert!(err.to_string().contains("37"));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(with_width(10).validate().is_err());
        assert!(with_width(180).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_pixels_and_negative_stroke() {
        let mut config = GoreConfig::default();
        config.gore_pixel_width = 0;
        assert!(config.validate().is_err());

        let mut config = GoreConfig::default();
        config.outline_stroke_width = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_central_meridians_for_sixty_degrees() {
        let config = with_width(60);
        assert_eq!(config.gore_count(), 6);
        let expected = [-150.0, -90.0, -30.0, 30.0, 90.0, 150.0 - ANTIMERIDIAN_NUDGE_DEG];
        for (i, want) in expected.iter().enumerate() {
            assert_relative_eq!(config.central_meridian(i), *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = GoreConfig::default();
        let args = CliArgs {
            pixel_width: Some(250),
            gore_width: Some(30),
            output: Some(PathBuf::from("out/globe.jpg")),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.gore_pixel_width, 250);
        assert_eq!(config.gore_width_deg, 30);
        assert_eq!(config.output_path, PathBuf::from("out/globe.jpg"));
        // Non-overridden fields keep their defaults
        assert_eq!(config.outline_stroke_width, 4.0);
        assert!(!config.parallel);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = GoreConfig::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, GoreConfig::default());
    }

    #[test]
    fn test_land_help_names_the_dataset_source() {
        use clap::CommandFactory;
        let help = CliArgs::command().render_long_help().to_string();
        assert!(help.contains("data/ne_110m_land.json"));
        assert!(help.contains("natural-earth-vector"));
    }
}
