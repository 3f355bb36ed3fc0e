use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use wherekit::api::{CmdMessage, MessageLevel};
use wherekit::config::WherekitConfig;
use wherekit::model::Palette;
use wherekit::FetchRequest;

const NAME_WIDTH: usize = 16;
const TIME_WIDTH: usize = 16;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_palettes(palettes: &[Palette]) {
    if palettes.is_empty() {
        println!("No palettes found.");
        return;
    }

    for (i, palette) in palettes.iter().enumerate() {
        let (r, g, b) = hsb_to_rgb(palette.hue, palette.saturation, palette.brightness);
        let name = pad_to_width(&truncate_to_width(&palette.color_name, NAME_WIDTH), NAME_WIDTH);
        println!(
            "{:>3}. {} {} {:>3}°  s {:.2}  b {:.2}  {}",
            i + 1,
            "  ".on_truecolor(r, g, b),
            name,
            palette.hue,
            palette.saturation,
            palette.brightness,
            format_time_ago(palette.date_added).dimmed()
        );
    }
}

pub(super) fn print_count(count: usize) {
    println!("{}", count);
}

pub(super) fn print_request(request: &FetchRequest) {
    let predicate = request
        .predicate()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string());
    let sort = if request.sort_keys().is_empty() {
        "none".to_string()
    } else {
        request
            .sort_keys()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let limit = request
        .fetch_limit
        .map(|l| l.to_string())
        .unwrap_or_else(|| "none".to_string());

    println!("{}{}", label("entity"), request.entity());
    println!("{}{}", label("kind"), request.kind());
    println!("{}{}", label("where"), predicate.bold());
    println!("{}{}", label("sort"), sort);
    println!("{}{}", label("limit"), limit);
    println!("{}{}", label("offset"), request.fetch_offset);
}

fn label(name: &str) -> colored::ColoredString {
    format!("{:<10}", name).dimmed()
}

pub(super) fn print_config(config: &WherekitConfig) {
    for key in WherekitConfig::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

/// HSB (hue in degrees, saturation and brightness in 0..=1) to 8-bit RGB.
fn hsb_to_rgb(hue: i64, saturation: f64, brightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360) as f64 / 60.0;
    let c = brightness * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = brightness - c;
    let (r, g, b) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// Cut `s` to at most `max_width` columns, ending in `…` when anything was
/// dropped.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
