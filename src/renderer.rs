//! # Almanac Table Rendering
//!
//! Plain-text output for the terminal: one row per day with the phase glyph,
//! illuminated fraction and the Sun and Moon event clocks. Rendering builds
//! strings; only [`draw_ascii`] touches stdout.

use crate::report::{BodyPosition, DailyAlmanac};

const DATE_WIDTH: usize = 6;
const CLOCK_WIDTH: usize = 10;

/// Column headings after the date and phase columns.
const EVENT_COLUMNS: [&str; 4] = ["Sunrise", "Sunset", "Moonrise", "Moonset"];
const TRANSIT_COLUMNS: [&str; 2] = ["Sun↑", "Moon↑"];

fn header(show_transits: bool) -> String {
    let mut line = format!(
        "{:<width$}{:<12}{:>6}  ",
        "Date",
        "Phase",
        "Lit",
        width = DATE_WIDTH
    );
    for column in EVENT_COLUMNS {
        line.push_str(&format!("{:<width$}", column, width = CLOCK_WIDTH));
    }
    if show_transits {
        for column in TRANSIT_COLUMNS {
            line.push_str(&format!("{:<width$}", column, width = CLOCK_WIDTH));
        }
    }
    line.trim_end().to_string()
}

fn row(almanac: &DailyAlmanac, show_transits: bool) -> String {
    let phase = almanac.phase;
    let mut line = format!(
        "{:<width$}{} {:<10}{:>5.0}%  ",
        almanac.date_label(),
        phase.name().glyph(),
        phase.index,
        phase.illuminated_fraction * 100.0,
        width = DATE_WIDTH
    );

    let mut events = vec![
        almanac.sun.rise,
        almanac.sun.set,
        almanac.moon.rise,
        almanac.moon.set,
    ];
    if show_transits {
        events.push(almanac.sun.transit);
        events.push(almanac.moon.transit);
    }
    for event in events {
        line.push_str(&format!("{:<width$}", event.to_clock(), width = CLOCK_WIDTH));
    }
    line.trim_end().to_string()
}

/// Render a titled table, one row per almanac day.
pub fn render_table(title: &str, almanacs: &[DailyAlmanac], show_transits: bool) -> String {
    let mut lines = vec![title.to_string(), header(show_transits)];
    lines.extend(almanacs.iter().map(|almanac| row(almanac, show_transits)));
    lines.join("\n")
}

/// One line with a body's current altitude and azimuth.
pub fn render_position(label: &str, position: &BodyPosition) -> String {
    let horizontal = position.horizontal;
    let state = if horizontal.altitude > 0.0 {
        "up"
    } else {
        "down"
    };
    format!(
        "{:<5} alt {:>7.2}°  az {:>7.2}°  ({})",
        label, horizontal.altitude, horizontal.azimuth, state
    )
}

/// Print the almanac table to the terminal.
pub fn draw_ascii(title: &str, almanacs: &[DailyAlmanac], show_transits: bool) {
    println!("{}", render_table(title, almanacs, show_transits));
}
