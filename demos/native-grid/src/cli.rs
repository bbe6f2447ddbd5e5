use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Report, eyre::eyre};

#[derive(Parser, Debug)]
#[command(
    name = "native-grid",
    about = "Draws a terminal background grid in a native OpenGL 3.3 window"
)]
pub struct Cli {
    /// TrueType/OpenType font file; defaults to the system monospace font
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(short = 's', long, default_value = "16.0", value_name = "SIZE")]
    pub font_size: f32,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "960", value_name = "PIXELS")]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "600", value_name = "PIXELS")]
    pub height: u32,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<(), Report> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(eyre!("font size must be positive, got {}", self.font_size));
        }
        if self.width == 0 || self.height == 0 {
            return Err(eyre!("window size must be non-zero, got {}x{}", self.width, self.height));
        }
        if let Some(font) = &self.font
            && !font.is_file()
        {
            return Err(eyre!("font file not found: {}", font.display()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cli = Cli::parse_from(["native-grid"]);

        assert_eq!(cli.font_size, 16.0);
        assert_eq!((cli.width, cli.height), (960, 600));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn rejects_zero_font_size() {
        let cli = Cli::parse_from(["native-grid", "--font-size", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_missing_font_file() {
        let cli = Cli::parse_from(["native-grid", "--font", "/nonexistent/font.ttf"]);
        let err = cli.validate().unwrap_err();

        assert!(err.to_string().contains("font file not found"), "{err}");
    }
}
