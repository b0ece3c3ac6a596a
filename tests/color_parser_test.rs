use ratatui::style::Color;
use sentidash::config::{AppConfig, ColorParser, Theme};
use sentidash::{App, AppEvent, MockGateway};
use std::sync::mpsc::channel;
use std::sync::Arc;

// NO_COLOR would turn every parsed color into Reset
fn ensure_colors_enabled() {
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_parse_basic_ansi_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert_eq!(parser.parse("black").unwrap(), Color::Black);
    assert_eq!(parser.parse("red").unwrap(), Color::Red);
    assert_eq!(parser.parse("green").unwrap(), Color::Green);
    assert_eq!(parser.parse("yellow").unwrap(), Color::Yellow);
    assert_eq!(parser.parse("cyan").unwrap(), Color::Cyan);
    assert_eq!(parser.parse("white").unwrap(), Color::White);
}

#[test]
fn test_parse_bright_and_gray_names() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert_eq!(parser.parse("bright_red").unwrap(), Color::Indexed(9));
    assert_eq!(parser.parse("bright red").unwrap(), Color::Indexed(9));
    assert_eq!(parser.parse("dark_gray").unwrap(), Color::Indexed(8));
    assert_eq!(parser.parse("light grey").unwrap(), Color::Indexed(7));
    assert_eq!(parser.parse("RED").unwrap(), Color::Red);
}

#[test]
fn test_parse_indexed_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    assert_eq!(parser.parse("indexed(236)").unwrap(), Color::Indexed(236));
    assert_eq!(parser.parse("Indexed(0)").unwrap(), Color::Indexed(0));
    assert!(parser.parse("indexed(256)").is_err());
    assert!(parser.parse("indexed(x)").is_err());
}

#[test]
fn test_parse_hex_colors() {
    ensure_colors_enabled();
    let parser = ColorParser::new();

    // Exact value depends on terminal capabilities; the parse must succeed.
    assert!(parser.parse("#4e79a7").is_ok());
    assert!(parser.parse("#FFFFFF").is_ok());
    assert!(parser.parse("#gg0000").is_err());
}

#[test]
fn test_parse_rejects_unknown_names() {
    ensure_colors_enabled();
    let parser = ColorParser::new();
    let err = parser.parse("chartreuse-ish").unwrap_err();
    assert!(err.to_string().contains("Unknown color name"));
}

#[test]
fn test_theme_lookup_falls_back_to_reset() {
    let theme = Theme::from_config(&AppConfig::default().theme).unwrap();
    assert!(theme.get_optional("chart_bar").is_some());
    assert_eq!(theme.get("no_such_color"), Color::Reset);
    assert!(theme.get_optional("no_such_color").is_none());
}

#[test]
fn test_app_accepts_custom_theme() {
    ensure_colors_enabled();
    let mut config = AppConfig::default();
    config.theme.colors.sentiment_positive = "bright_green".to_string();
    let theme = Theme::from_config(&config.theme).expect("custom theme");
    assert_eq!(theme.get("sentiment_positive"), Color::Indexed(10));

    let (tx, _rx) = channel::<AppEvent>();
    let app = App::new_with_config(tx, Arc::new(MockGateway::new()), theme, config);
    assert!(!app.show_help());
}
