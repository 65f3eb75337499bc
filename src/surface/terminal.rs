//! Terminal render surface
//!
//! Draws the waiting dialog as a centered box using crossterm:
//! - heading row (hidden when the layout has no header)
//! - progress bar, filled right-to-left in rtl mode, with its label
//! - body row (the progress message)
//! - close hint
//!
//! Class names and the content element have no terminal equivalent and are
//! ignored here.

use super::colors::{bar_empty_fg, bar_fg, frame_fg, header_fg, hint_fg, text_fg};
use super::{RenderSurface, SurfaceHandle, SurfaceSpec};
use crate::constants::surface::{
    CLOSE_HINT, FALLBACK_COLUMNS, FALLBACK_ROWS, WIDTH_LARGE, WIDTH_MEDIUM, WIDTH_SMALL,
};
use crate::dialog::DismissNotifier;
use crate::error::AppError;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::{Stdout, Write, stdout};
use std::sync::{Arc, Mutex, PoisonError};
use unicode_width::UnicodeWidthChar;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Shared slot through which an event loop reports that the user closed the
/// dialog (e.g. pressed Esc).
#[derive(Debug, Clone, Default)]
pub struct DismissHook {
    notifier: Arc<Mutex<Option<DismissNotifier>>>,
}

impl DismissHook {
    /// Reports a dismissal of the current element.
    ///
    /// Fires at most once per construct. Returns whether the controller
    /// accepted it.
    pub fn dismiss(&self) -> bool {
        let notifier = self
            .notifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match notifier {
            Some(notifier) => notifier.notify(),
            None => false,
        }
    }

    /// Whether a dismissal can currently be reported
    pub fn is_armed(&self) -> bool {
        self.notifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn arm(&self, notifier: Option<DismissNotifier>) {
        *self
            .notifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = notifier;
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    fg: Color,
    bold: bool,
}

impl Segment {
    fn new(text: impl Into<String>, fg: Color) -> Self {
        Self {
            text: text.into(),
            fg,
            bold: false,
        }
    }

    fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

type Row = Vec<Segment>;

/// Crossterm implementation of [`RenderSurface`].
pub struct TerminalSurface<W: Write + Send = Stdout> {
    out: W,
    columns: u16,
    rows: u16,
    next_id: u64,
    current: Option<SurfaceHandle>,
    spec: Option<SurfaceSpec>,
    header: String,
    header_visible: bool,
    body: String,
    body_visible: bool,
    percent: u8,
    label: String,
    open: bool,
    /// Top-left corner, width and height of the area last drawn
    drawn: Option<(u16, u16, u16, u16)>,
    hook: DismissHook,
}

impl TerminalSurface<Stdout> {
    /// Surface drawing on stdout, sized to the current terminal
    pub fn stdout() -> Self {
        let (columns, rows) =
            crossterm::terminal::size().unwrap_or((FALLBACK_COLUMNS, FALLBACK_ROWS));
        Self::new(stdout(), columns, rows)
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, columns: u16, rows: u16) -> Self {
        Self {
            out,
            columns,
            rows,
            next_id: 0,
            current: None,
            spec: None,
            header: String::new(),
            header_visible: false,
            body: String::new(),
            body_visible: false,
            percent: 0,
            label: String::new(),
            open: false,
            drawn: None,
            hook: DismissHook::default(),
        }
    }

    /// Hook for reporting user dismissal from an event loop
    pub fn dismiss_hook(&self) -> DismissHook {
        self.hook.clone()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Handle of the element built by the last `construct`
    pub fn current_handle(&self) -> Option<SurfaceHandle> {
        self.current
    }

    fn inner_width(&self) -> usize {
        let wanted = match self.spec.as_ref().map(|s| s.dialog_size.as_str()) {
            Some("sm") => WIDTH_SMALL,
            Some("lg") => WIDTH_LARGE,
            _ => WIDTH_MEDIUM,
        };
        // Keep the borders on screen on narrow terminals
        wanted.min((self.columns as usize).saturating_sub(2)).max(1)
    }

    fn layout(&self) -> Vec<Row> {
        let width = self.inner_width();
        let frame = frame_fg();
        let horizontal = "─".repeat(width);
        let spec = self.spec.as_ref();
        let rank = spec.map(|s| s.header_rank.get()).unwrap_or(3);
        let rtl = spec.map(|s| s.rtl).unwrap_or(true);
        let progress_type = spec.map(|s| s.progress_type.as_str()).unwrap_or("");

        let boxed = |inner: Row| -> Row {
            let mut row = vec![Segment::new("│", frame)];
            row.extend(inner);
            row.push(Segment::new("│", frame));
            row
        };

        let mut rows = vec![vec![Segment::new(format!("┌{horizontal}┐"), frame)]];

        if self.header_visible {
            let header = if rank == 1 {
                self.header.to_uppercase()
            } else {
                self.header.clone()
            };
            rows.push(boxed(vec![
                Segment::new(fit(&format!(" {header}"), width), header_fg()).bold(rank <= 3),
            ]));
            rows.push(vec![Segment::new(format!("├{horizontal}┤"), frame)]);
        }

        let bar_width = width.saturating_sub(2);
        let filled = bar_width * self.percent as usize / 100;
        let filled_text: String = std::iter::repeat_n(BAR_FILLED, filled).collect();
        let empty_text: String = std::iter::repeat_n(BAR_EMPTY, bar_width - filled).collect();
        let mut bar = vec![Segment::new(" ", frame)];
        if rtl {
            bar.push(Segment::new(empty_text, bar_empty_fg()));
            bar.push(Segment::new(filled_text, bar_fg(progress_type)));
        } else {
            bar.push(Segment::new(filled_text, bar_fg(progress_type)));
            bar.push(Segment::new(empty_text, bar_empty_fg()));
        }
        bar.push(Segment::new(" ", frame));
        rows.push(boxed(bar));
        rows.push(boxed(vec![Segment::new(center(&self.label, width), text_fg())]));

        if self.body_visible {
            rows.push(boxed(vec![Segment::new(
                fit(&format!(" {}", self.body), width),
                text_fg(),
            )]));
        }

        rows.push(boxed(vec![Segment::new(
            right_align(&format!("{CLOSE_HINT} "), width),
            hint_fg(),
        )]));
        rows.push(vec![Segment::new(format!("└{horizontal}┘"), frame)]);
        rows
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        if !self.open {
            return Ok(());
        }

        let rows = self.layout();
        let box_width = (self.inner_width() + 2) as u16;
        let height = rows.len() as u16;
        let left = self.columns.saturating_sub(box_width) / 2;
        let top = self.rows.saturating_sub(height) / 2;

        // A header appearing or disappearing changes the height
        if let Some((_, _, _, previous_height)) = self.drawn
            && previous_height != height
        {
            self.clear_drawn()?;
        }

        for (i, row) in rows.iter().enumerate() {
            queue!(self.out, MoveTo(left, top + i as u16))?;
            for segment in row {
                if segment.bold {
                    queue!(self.out, SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    self.out,
                    SetForegroundColor(segment.fg),
                    Print(&segment.text),
                    ResetColor
                )?;
                if segment.bold {
                    queue!(self.out, SetAttribute(Attribute::NormalIntensity))?;
                }
            }
        }
        self.out.flush()?;
        self.drawn = Some((left, top, box_width, height));
        Ok(())
    }

    fn clear_drawn(&mut self) -> Result<(), AppError> {
        if let Some((left, top, width, height)) = self.drawn.take() {
            let blank = " ".repeat(width as usize);
            for i in 0..height {
                queue!(self.out, MoveTo(left, top + i), Print(&blank))?;
            }
            self.out.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn plain_rows(&self) -> Vec<String> {
        self.layout()
            .into_iter()
            .map(|row| row.into_iter().map(|s| s.text).collect())
            .collect()
    }
}

impl<W: Write + Send> RenderSurface for TerminalSurface<W> {
    fn construct(&mut self, spec: &SurfaceSpec) -> Result<SurfaceHandle, AppError> {
        self.clear_drawn()?;
        self.hook.arm(None);

        self.next_id += 1;
        let handle = SurfaceHandle::new(self.next_id);
        self.current = Some(handle);
        self.spec = Some(spec.clone());
        self.header.clear();
        self.header_visible = false;
        self.body.clear();
        self.body_visible = false;
        self.percent = 0;
        self.label.clear();
        self.open = false;
        Ok(handle)
    }

    fn set_header(&mut self, text: &str, visible: bool) -> Result<(), AppError> {
        self.header = text.to_string();
        self.header_visible = visible;
        self.redraw()
    }

    fn set_body(&mut self, text: &str, visible: bool) -> Result<(), AppError> {
        self.body = text.to_string();
        self.body_visible = visible;
        self.redraw()
    }

    fn set_progress(&mut self, percent: u8, label: &str) -> Result<(), AppError> {
        self.percent = percent.min(100);
        self.label = label.to_string();
        self.redraw()
    }

    fn progress(&self) -> u8 {
        self.percent
    }

    fn open(&mut self) -> Result<(), AppError> {
        self.open = true;
        self.redraw()
    }

    fn close(&mut self) -> Result<(), AppError> {
        self.open = false;
        self.hook.arm(None);
        self.clear_drawn()
    }

    fn on_dismissed(&mut self, notifier: DismissNotifier) {
        self.hook.arm(Some(notifier));
    }

    fn resize(&mut self, columns: u16, rows: u16) -> Result<(), AppError> {
        self.clear_drawn()?;
        self.columns = columns;
        self.rows = rows;
        self.redraw()
    }
}

/// Truncates or pads `text` to exactly `width` display columns
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn center(text: &str, width: usize) -> String {
    let used = display_width(text);
    if used >= width {
        return fit(text, width);
    }
    let left = (width - used) / 2;
    format!(
        "{}{text}{}",
        " ".repeat(left),
        " ".repeat(width - used - left)
    )
}

fn right_align(text: &str, width: usize) -> String {
    let used = display_width(text);
    if used >= width {
        return fit(text, width);
    }
    format!("{}{text}", " ".repeat(width - used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::HeaderRank;

    fn spec(dialog_size: &str, rtl: bool) -> SurfaceSpec {
        SurfaceSpec {
            dialog_size: dialog_size.to_string(),
            progress_type: "success".to_string(),
            rtl,
            header_rank: HeaderRank::default(),
            header_class: String::new(),
            content_element: "p".to_string(),
            content_class: "content".to_string(),
        }
    }

    fn surface() -> TerminalSurface<Vec<u8>> {
        TerminalSurface::new(Vec::new(), 80, 24)
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        // Wide characters count double
        assert_eq!(fit("日本語", 4), "日本");
    }

    #[test]
    fn test_center_and_right_align() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(right_align("ab ", 6), "   ab ");
    }

    #[test]
    fn test_layout_with_header_and_body() {
        let mut surface = surface();
        surface.construct(&spec("sm", false)).unwrap();
        surface.set_header("Loading", true).unwrap();
        surface.set_body("Fetching data", true).unwrap();
        surface.set_progress(50, "50 Complete").unwrap();

        let rows = surface.plain_rows();
        let width = WIDTH_SMALL;
        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|r| r.chars().count() == width + 2));
        assert!(rows[1].contains("Loading"));
        assert!(rows[4].contains("50 Complete"));
        assert!(rows[5].contains("Fetching data"));
        assert!(rows[6].contains(CLOSE_HINT));

        // Left-to-right bar starts filled
        let bar = &rows[3];
        assert!(bar.starts_with(&format!("│ {BAR_FILLED}")));
        assert_eq!(
            bar.chars().filter(|c| *c == BAR_FILLED).count(),
            (width - 2) / 2
        );
    }

    #[test]
    fn test_rtl_bar_fills_from_the_right() {
        let mut surface = surface();
        surface.construct(&spec("m", true)).unwrap();
        surface.set_progress(25, "25 Complete").unwrap();

        let rows = surface.plain_rows();
        let bar = &rows[1];
        assert!(bar.starts_with(&format!("│ {BAR_EMPTY}")));
        assert!(bar.ends_with(&format!("{BAR_FILLED} │")));
    }

    #[test]
    fn test_hidden_regions_are_not_drawn() {
        let mut surface = surface();
        surface.construct(&spec("m", true)).unwrap();
        let rows = surface.plain_rows();
        // border, bar, label, hint, border
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_nothing_written_until_open() {
        let mut surface = surface();
        surface.construct(&spec("m", true)).unwrap();
        surface.set_header("Loading", true).unwrap();
        assert!(surface.writer().is_empty());

        surface.open().unwrap();
        let written = String::from_utf8_lossy(surface.writer()).to_string();
        assert!(written.contains("Loading"));
        assert!(written.contains(CLOSE_HINT));
    }

    #[test]
    fn test_progress_is_read_back() {
        let mut surface = surface();
        surface.construct(&spec("m", true)).unwrap();
        surface.set_progress(73, "73 Complete").unwrap();
        assert_eq!(surface.progress(), 73);

        surface.construct(&spec("m", true)).unwrap();
        assert_eq!(surface.progress(), 0);
    }

    #[test]
    fn test_narrow_terminal_keeps_box_on_screen() {
        let mut surface = TerminalSurface::new(Vec::new(), 20, 10);
        surface.construct(&spec("lg", true)).unwrap();
        let rows = surface.plain_rows();
        assert!(rows.iter().all(|r| r.chars().count() == 20));
    }

    #[test]
    fn test_resize_relayouts_open_dialog() {
        let mut surface = TerminalSurface::new(Vec::new(), 80, 24);
        surface.construct(&spec("lg", true)).unwrap();
        surface.open().unwrap();
        assert!(surface.plain_rows().iter().all(|r| r.chars().count() == 74));

        surface.resize(30, 12).unwrap();
        assert!(surface.plain_rows().iter().all(|r| r.chars().count() == 30));
        assert_eq!(surface.drawn.map(|(_, _, width, _)| width), Some(30));
    }

    #[test]
    fn test_hook_is_disarmed_without_notifier() {
        let mut surface = surface();
        let hook = surface.dismiss_hook();
        surface.construct(&spec("m", true)).unwrap();
        assert!(!hook.is_armed());
        assert!(!hook.dismiss());
    }
}
