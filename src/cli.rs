use clap::Parser;
use std::path::PathBuf;

use crate::preview::{PreviewConfig, Viewport};

#[derive(Parser, Debug)]
#[command(name = "docpreview")]
#[command(version)]
#[command(about = "Preview and edit pdf, docx, xlsx, text and image files", long_about = None)]
#[command(after_help = "Examples:\n  \
  docpreview report.xlsx              summarize every sheet\n  \
  docpreview -p 2 notes.pdf           print the text of page 2\n  \
  docpreview -j https://example.com/a.docx   summary of a remote file as JSON\n  \
  docpreview memo.pdf -e new.txt -o memo2.pdf   replace the text and save")]
pub struct Cli {
    /// File path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// MIME type to assume instead of the extension or server header
    #[arg(long = "content-type", value_name = "MIME")]
    pub content_type: Option<String>,

    /// Viewport used for the fit zoom
    #[arg(long, value_name = "WxH", default_value = "1280x800")]
    pub viewport: Viewport,

    /// Show page PAGE (1-based) and print its content
    #[arg(short = 'p', value_name = "PAGE")]
    pub page: Option<usize>,

    /// Zoom factor, clamped to 0.25-4
    #[arg(short = 'z', value_name = "ZOOM")]
    pub zoom: Option<f64>,

    /// Print the summary as JSON
    #[arg(short = 'j')]
    pub json: bool,

    /// Replace page contents with the sections of EDITS (form feed separated)
    #[arg(short = 'e', value_name = "EDITS", requires = "output")]
    pub edits: Option<PathBuf>,

    /// Save the re-encoded file to OUT
    #[arg(short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Quiet mode, errors only
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Verbose logging (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    /// Default log filter; `RUST_LOG` still takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    pub fn config(&self) -> PreviewConfig {
        PreviewConfig::default().with_viewport(self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["docpreview", "a.pdf"]).unwrap();
        assert_eq!(cli.viewport, Viewport::new(1280.0, 800.0));
        assert_eq!(cli.log_filter(), "warn");
        assert!(!cli.is_http_url());
        assert!(cli.page.is_none());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "docpreview",
            "https://example.com/a.xlsx",
            "--viewport",
            "800x600",
            "-p",
            "2",
            "-z",
            "1.5",
            "-vv",
        ])
        .unwrap();
        assert!(cli.is_http_url());
        assert_eq!(cli.config().viewport, Viewport::new(800.0, 600.0));
        assert_eq!(cli.page, Some(2));
        assert_eq!(cli.zoom, Some(1.5));
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_edits_require_output() {
        assert!(Cli::try_parse_from(["docpreview", "a.pdf", "-e", "new.txt"]).is_err());
        assert!(Cli::try_parse_from(["docpreview", "a.pdf", "-e", "new.txt", "-o", "b.pdf"]).is_ok());
        assert!(Cli::try_parse_from(["docpreview", "a.pdf", "--viewport", "wide"]).is_err());
    }
}
