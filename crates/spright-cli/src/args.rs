//! Command-line argument definitions.
//!
//! [`Args`] is parsed from the command line with [`clap`]. Arguments select
//! the configuration document, the output file and format, the `spright`
//! binary, and whether to keep watching the document.

use clap::{Parser, ValueEnum};

/// What the previewer writes to the output file.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The laid out preview as an SVG document
    #[default]
    Svg,
    /// The `setConfig` message as JSON
    Json,
}

/// Command-line arguments for the spright sprite sheet previewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the sprite sheet configuration
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Path to the spright binary, overrides the configuration
    #[arg(long)]
    pub tool: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Keep running and refresh the output whenever the input changes
    #[arg(long)]
    pub watch: bool,

    /// Zoom factor of the preview, overrides the configuration
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Rewrite the input in normalized form
    #[arg(long)]
    pub normalize: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["spright-preview", "sheet.txt"]).unwrap();

        assert_eq!(args.input, "sheet.txt");
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.format, OutputFormat::Svg);
        assert!(args.tool.is_none());
        assert!(!args.watch);
        assert!(!args.normalize);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "spright-preview",
            "sheet.txt",
            "-o",
            "state.json",
            "--format",
            "json",
            "--tool",
            "/opt/spright/bin/spright",
            "-c",
            "preview.toml",
            "--watch",
            "--zoom",
            "4",
            "--normalize",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.output, "state.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.tool.as_deref(), Some("/opt/spright/bin/spright"));
        assert_eq!(args.config.as_deref(), Some("preview.toml"));
        assert!(args.watch);
        assert_eq!(args.zoom, Some(4.0));
        assert!(args.normalize);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["spright-preview", "sheet.txt", "--format", "png"]).is_err());
    }
}
