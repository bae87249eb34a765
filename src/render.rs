//! Plain-text board rendering.
//!
//! Output format (colour escapes omitted):
//! ```text
//!   (Left)
//!
//! |-----|-----|-----|-----|
//! |    4|    2|     |     |
//! |-----|-----|-----|-----|
//! |   16|     |     |     |
//! ...
//! ```

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crossterm::style::{Color, Stylize, style};

use crate::game::{Board, Direction};

/// Colour and boldness for a tile exponent.
fn tile_format(exponent: u8) -> (Color, bool) {
    match exponent {
        1 => (Color::White, true),
        2 => (Color::Cyan, false),
        3 => (Color::Cyan, true),
        4 => (Color::Blue, false),
        5 => (Color::Blue, true),
        6 => (Color::Magenta, false),
        7 => (Color::Magenta, true),
        8 => (Color::Red, false),
        9 => (Color::Red, true),
        10 => (Color::Yellow, false),
        11 => (Color::Yellow, true),
        _ => (Color::Grey, false),
    }
}

/// Five-character cell text, blank when empty.
fn tile_symbol(exponent: u8, colored: bool) -> String {
    if exponent == 0 {
        return " ".repeat(5);
    }

    let text = match 1u64.checked_shl(u32::from(exponent)) {
        Some(value) => format!("{value:>5}"),
        None => format!("{:>5}", format!("2^{exponent}")),
    };
    if !colored {
        return text;
    }

    let (color, bold) = tile_format(exponent);
    let styled = style(text).with(color);
    if bold {
        styled.bold().to_string()
    } else {
        styled.to_string()
    }
}

/// Render `board` as a grid of tile values.
///
/// When `last_action` is set it heads the output as `  (Up)`. `colored`
/// adds ANSI colour per tile exponent.
#[must_use]
pub fn render(board: &Board, last_action: Option<Direction>, colored: bool) -> String {
    let mut output = String::new();

    if let Some(direction) = last_action {
        output.push_str(&format!("  ({direction})\n"));
    }

    let hline = format!("\n|{}|\n", vec!["-----"; board.size()].join("|"));
    let rows: Vec<String> = (0..board.size())
        .map(|r| {
            let cells: Vec<String> = board
                .row(r)
                .iter()
                .map(|&v| tile_symbol(v, colored))
                .collect();
            format!("|{}|", cells.join("|"))
        })
        .collect();

    output.push_str(&hline);
    output.push_str(&rows.join(&hline));
    output.push_str(&hline);
    output
}
