use crossterm::style::Color;

// Dialog palette
pub fn frame_fg() -> Color {
    Color::AnsiValue(21)
} // Bright blue
pub fn header_fg() -> Color {
    Color::AnsiValue(231)
} // Pure white
pub fn text_fg() -> Color {
    Color::AnsiValue(252)
} // Light grey
pub fn hint_fg() -> Color {
    Color::AnsiValue(244)
} // Mid grey
pub fn bar_empty_fg() -> Color {
    Color::AnsiValue(238)
} // Dark grey

/// Progress bar colour for a progress type postfix
pub fn bar_fg(progress_type: &str) -> Color {
    match progress_type {
        "success" => Color::AnsiValue(46), // Bright green
        "info" => Color::AnsiValue(51),    // Bright cyan
        "warning" => Color::AnsiValue(226), // Bright yellow
        "danger" => Color::AnsiValue(196), // Bright red
        _ => Color::AnsiValue(33),         // Default blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_colors_by_type() {
        assert_eq!(bar_fg("success"), Color::AnsiValue(46));
        assert_eq!(bar_fg("danger"), Color::AnsiValue(196));
        assert_eq!(bar_fg(""), Color::AnsiValue(33));
        assert_eq!(bar_fg("unknown"), bar_fg(""));
    }
}
