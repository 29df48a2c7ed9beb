//! Omnibar - URL bar display text layout
//!
//! Usage: omnibar [OPTIONS] <url>

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;

use omnibar_text::{FixedAdvanceShaper, FontShaper, TextShaper};
use omnibar_urlbar::{
    DisplayText, ScrollType, UrlBar, UrlBarConfig, UrlBarError, UrlDirection, DEFAULT_FONT_SIZE,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default viewport width in pixels
const DEFAULT_WIDTH: i32 = 300;

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
struct Options {
    url: String,
    width: i32,
    font_size: f32,
    rtl: bool,
    scroll_type: ScrollType,
    origin_end: Option<usize>,
    truncate: bool,
    font: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
}

impl Options {
    fn new(url: String) -> Self {
        Self {
            url,
            width: DEFAULT_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            rtl: false,
            scroll_type: ScrollType::ScrollToTld,
            origin_end: None,
            truncate: false,
            font: None,
            config: None,
            json: false,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Layout(Options),
}

/// What gets printed for a laid out URL
#[derive(Debug, Serialize)]
struct Report<'a> {
    text: &'a str,
    rendered_text: String,
    truncated: bool,
    origin_end_index: usize,
    scroll_type: ScrollType,
    viewport_width: i32,
    font_size: f32,
    scroll_offset: i32,
    pending: bool,
    visible_hint: Option<&'a str>,
    url_direction: UrlDirection,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("omnibar");

    match parse_args(&args[1.min(args.len())..]) {
        Ok(Command::Help) => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("Omnibar {}", VERSION);
            ExitCode::SUCCESS
        }
        Ok(Command::Layout(options)) => {
            if let Err(e) = run(&options) {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"Omnibar {} - URL bar scroll and visible text calculator

USAGE:
    {} [OPTIONS] <URL>

OPTIONS:
    -h, --help            Print this help message
    -V, --version         Print version information
    --width <PX>          Viewport width in pixels (default {})
    --font-size <PX>      Font size in pixels (default {})
    --rtl                 Right-to-left layout direction
    --beginning           Scroll to the beginning instead of the TLD
    --no-scroll           Do not scroll
    --origin-end <INDEX>  Override the detected end of the origin
    --truncate            Truncate long URLs before layout
    --font <PATH>         Measure with a TrueType/OpenType font
    --config <PATH>       Load configuration from a JSON file
    --json                Print the result as JSON

EXAMPLES:
    {} https://www.example.com/path
    {} --width 200 --truncate https://www.example.com/very/long/path
    {} --font DejaVuSans.ttf --json https://example.com

"#,
        VERSION, program, DEFAULT_WIDTH, DEFAULT_FONT_SIZE, program, program, program
    );
}

/// Parse arguments (without the program name)
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut url = None;
    let mut options = Options::new(String::new());
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--width" => options.width = parse_value(arg, iter.next())?,
            "--font-size" => options.font_size = parse_value(arg, iter.next())?,
            "--origin-end" => options.origin_end = Some(parse_value(arg, iter.next())?),
            "--font" => options.font = Some(PathBuf::from(required(arg, iter.next())?)),
            "--config" => options.config = Some(PathBuf::from(required(arg, iter.next())?)),
            "--rtl" => options.rtl = true,
            "--beginning" => options.scroll_type = ScrollType::ScrollToBeginning,
            "--no-scroll" => options.scroll_type = ScrollType::NoScroll,
            "--truncate" => options.truncate = true,
            "--json" => options.json = true,
            other if other.starts_with("--") => return Err(format!("Unknown option: {}", other)),
            other => {
                if url.is_some() {
                    return Err(format!("Unexpected argument: {}", other));
                }
                url = Some(other.to_string());
            }
        }
    }

    options.url = url.ok_or_else(|| "Missing URL".to_string())?;
    Ok(Command::Layout(options))
}

fn required<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, String> {
    value
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = required(flag, value)?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

/// Lay out the URL and print where it ends up
fn run(options: &Options) -> Result<(), UrlBarError> {
    let config = match &options.config {
        Some(path) => UrlBarConfig::load(path)?,
        None => UrlBarConfig::default(),
    };

    let shaper: Box<dyn TextShaper> = match &options.font {
        Some(path) => Box::new(FontShaper::from_file(path)?),
        None => Box::new(FixedAdvanceShaper::new()),
    };

    let display = DisplayText::from_url(&options.url)?;
    let origin_end = options.origin_end.unwrap_or(display.origin_end_index());
    log::info!("Laying out {} characters, origin ends at {}", display.len(), origin_end);

    let mut bar = UrlBar::with_shaper(shaper, config);
    bar.on_font_or_direction_changed(options.font_size, options.rtl);
    if options.truncate {
        bar.set_text_with_truncation(display.as_str(), options.scroll_type, origin_end);
    } else {
        bar.set_text(display.as_str());
    }
    bar.set_scroll_state(options.scroll_type, origin_end);
    bar.on_layout(options.width);

    let report = Report {
        text: bar.text(),
        rendered_text: bar.rendered_text().into_owned(),
        truncated: bar.text().len() < display.as_str().len(),
        origin_end_index: origin_end,
        scroll_type: options.scroll_type,
        viewport_width: options.width,
        font_size: bar.font_size(),
        scroll_offset: bar.scroll_offset(),
        pending: bar.has_pending_scroll(),
        visible_hint: bar.visible_text_hint(),
        url_direction: bar.url_direction(),
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report<'_>) {
    println!("Text:          {}", report.rendered_text);
    println!("Truncated:     {}", report.truncated);
    println!("Origin end:    {}", report.origin_end_index);
    println!("Scroll type:   {:?}", report.scroll_type);
    println!("Viewport:      {}px @ {}px font", report.viewport_width, report.font_size);
    if report.pending {
        println!("Scroll offset: pending");
    } else {
        println!("Scroll offset: {}px", report.scroll_offset);
    }
    match report.visible_hint {
        Some(hint) => println!("Visible hint:  {}", hint),
        None => println!("Visible hint:  (none)"),
    }
    println!("Direction:     {:?}", report.url_direction);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_url_only() {
        let command = parse_args(&args(&["https://example.com"])).unwrap();
        assert_eq!(command, Command::Layout(Options::new("https://example.com".to_string())));
    }

    #[test]
    fn test_parse_options() {
        let command = parse_args(&args(&[
            "--width",
            "200",
            "--font-size",
            "20",
            "--rtl",
            "--beginning",
            "--origin-end",
            "12",
            "--json",
            "https://example.com",
        ]))
        .unwrap();

        let Command::Layout(options) = command else {
            panic!("expected layout command");
        };
        assert_eq!(options.width, 200);
        assert_eq!(options.font_size, 20.0);
        assert!(options.rtl);
        assert!(options.json);
        assert_eq!(options.scroll_type, ScrollType::ScrollToBeginning);
        assert_eq!(options.origin_end, Some(12));
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--width"])).is_err());
        assert!(parse_args(&args(&["--width", "wide", "https://a.com"])).is_err());
        assert!(parse_args(&args(&["--bogus", "https://a.com"])).is_err());
        assert!(parse_args(&args(&["https://a.com", "https://b.com"])).is_err());
    }

    #[test]
    fn test_run_rejects_invalid_url() {
        let options = Options::new("not a url".to_string());
        assert!(matches!(run(&options), Err(UrlBarError::InvalidUrl(_))));
    }

    #[test]
    fn test_run_rejects_missing_font() {
        let mut options = Options::new("https://example.com".to_string());
        options.font = Some(PathBuf::from("/nonexistent/omnibar.ttf"));
        assert!(matches!(run(&options), Err(UrlBarError::Text(_))));
    }
}
