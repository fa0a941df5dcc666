//! Paginated fixed-width text reports.
//!
//! Renders any text file as pages with a title header and a numbered
//! footer, wrapping long lines at word boundaries where a sensible break
//! exists. Pages are separated by form feeds.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Columns a tab advances to a multiple of.
pub const TAB_WIDTH: usize = 4;

/// Narrowest line width a report can be laid out with.
pub const MIN_WIDTH: usize = 10;

/// Lines shorter than this never break at a space.
const MIN_WORD_BREAK: usize = 20;

const PAGE_BREAK: &str = "\u{0c}";

/// Page geometry. The defaults fit 9 pt monospace on A4 with 15 mm margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: usize,
    pub lines_per_page: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            width: 94,
            lines_per_page: 66,
        }
    }
}

impl PageLayout {
    pub fn new(width: usize, lines_per_page: usize) -> Self {
        PageLayout {
            width: width.max(MIN_WIDTH),
            lines_per_page: lines_per_page.max(1),
        }
    }
}

/// Replaces tabs with spaces up to the next multiple of `tab_width`.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_width - column % tab_width;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Splits `line` into pieces of at most `width` characters.
///
/// A piece ends at the last space of the window when that space is far
/// enough in (at least 20 columns and 60% of the width); the space itself
/// is dropped. Otherwise the line is cut at exactly `width`.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(MIN_WIDTH);
    let threshold = MIN_WORD_BREAK.max(width * 6 / 10);

    let mut rest: Vec<char> = line.chars().collect();
    let mut pieces = Vec::new();

    while rest.len() > width {
        let window = &rest[..width];
        match window.iter().rposition(|c| *c == ' ') {
            Some(brk) if brk >= threshold => {
                pieces.push(rest[..brk].iter().collect());
                rest.drain(..=brk);
            }
            _ => {
                pieces.push(window.iter().collect());
                rest.drain(..width);
            }
        }
    }
    pieces.push(rest.into_iter().collect());
    pieces
}

fn page(title: &str, number: usize, body: &[String], width: usize) -> String {
    let rule = "-".repeat(width);
    let footer = format!("Page {number}");

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for line in body {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{footer:>width$}\n"));
    out
}

/// Splits on `\r\n`, `\n`, `\r`, vertical tab and form feed. A trailing
/// terminator does not start an extra line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '\n' | '\r' | '\x0b' | '\x0c') {
            lines.push(&text[start..i]);
            start = i + 1;
            if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
                chars.next();
                start += 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Lays out `text` under `title`. Always produces at least one page.
pub fn render_text(title: &str, text: &str, layout: PageLayout) -> String {
    let layout = PageLayout::new(layout.width, layout.lines_per_page);

    let lines: Vec<String> = split_lines(text)
        .into_iter()
        .flat_map(|raw| wrap_line(&expand_tabs(raw, TAB_WIDTH), layout.width))
        .collect();

    let mut pages: Vec<&[String]> = lines.chunks(layout.lines_per_page).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }

    pages
        .iter()
        .enumerate()
        .map(|(i, body)| page(title, i + 1, body, layout.width))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

/// Renders the file at `input`. A missing file renders as a one-line error
/// page rather than failing.
pub fn render_file(input: &Path, title: Option<&str>, layout: PageLayout) -> Result<String> {
    let title = title.map(str::to_string).unwrap_or_else(|| {
        input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string())
    });

    let text = match fs::read(input) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %input.display(), "Report input not found");
            format!("[ERROR] File not found: {}\n", input.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", input.display()));
        }
    };

    Ok(render_text(&title, &text, layout))
}

/// Writes the rendered report for `input` to `output`. Returns the page count.
#[tracing::instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn write_report(
    input: &Path,
    output: &Path,
    title: Option<&str>,
    layout: PageLayout,
) -> Result<usize> {
    let rendered = render_file(input, title, layout)?;
    let pages = rendered.matches(PAGE_BREAK).count() + 1;

    fs::write(output, &rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(pages, "Report written");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_expand_tabs_is_column_aware() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tx", 4), "ab  x");
        assert_eq!(expand_tabs("abcd\tx", 4), "abcd    x");
    }

    #[test]
    fn test_short_line_is_untouched() {
        assert_eq!(wrap_line("hello world", 40), ["hello world"]);
        assert_eq!(wrap_line("", 40), [""]);
    }

    #[test]
    fn test_wrap_at_last_space() {
        let line = format!("{} {}", "a".repeat(30), "b".repeat(15));
        let pieces = wrap_line(&line, 40);

        assert_eq!(pieces, ["a".repeat(30), "b".repeat(15)]);
    }

    #[test]
    fn test_hard_break_when_space_is_too_early() {
        let line = format!("{} {}", "a".repeat(10), "b".repeat(45));
        let pieces = wrap_line(&line, 40);

        assert_eq!(pieces[0].chars().count(), 40);
        assert_eq!(pieces[0], format!("{} {}", "a".repeat(10), "b".repeat(29)));
        assert_eq!(pieces[1], "b".repeat(16));
    }

    #[test]
    fn test_width_has_a_floor() {
        let pieces = wrap_line(&"x".repeat(25), 3);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|p| p.chars().count() <= MIN_WIDTH));
    }

    #[test]
    fn test_pages_have_header_and_footer() {
        let text: String = (1..=5).map(|i| format!("line {i}\n")).collect();
        let rendered = render_text("notes.txt", &text, PageLayout::new(20, 2));
        let pages: Vec<_> = rendered.split(PAGE_BREAK).collect();

        assert_eq!(pages.len(), 3);
        for (i, page) in pages.iter().enumerate() {
            let lines: Vec<_> = page.lines().collect();
            assert_eq!(lines[0], "notes.txt");
            assert_eq!(lines[1], "-".repeat(20));
            assert_eq!(*lines.last().unwrap(), format!("{:>20}", format!("Page {}", i + 1)));
        }
        assert!(pages[2].contains("line 5"));
        assert!(!pages[2].contains("line 4"));
    }

    #[test]
    fn test_split_lines_on_every_break() {
        assert_eq!(split_lines("a\r\nb\rc\nd\x0ce\x0bf\n"), ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(split_lines("a\n\nb"), ["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_form_feed_in_input_does_not_add_a_page() {
        let rendered = render_text("t", "a\x0cb\nc\n", PageLayout::new(20, 10));

        assert_eq!(rendered.matches(PAGE_BREAK).count(), 0);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(&lines[2..5], ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_text_renders_one_page() {
        let rendered = render_text("empty", "", PageLayout::default());
        assert!(!rendered.contains(PAGE_BREAK));
        assert!(rendered.ends_with("Page 1\n"));
    }

    #[test]
    fn test_missing_input_renders_error_line() {
        let missing = Path::new("no/such/input.md");
        let rendered = render_file(missing, None, PageLayout::default()).unwrap();

        assert!(rendered.starts_with("input.md\n"));
        assert!(rendered.contains("[ERROR] File not found: no/such/input.md"));
    }

    #[test]
    fn test_write_report() {
        let input = env::temp_dir().join("route_planner_report_input.txt");
        let output = env::temp_dir().join("route_planner_report_output.txt");
        let text: String = (0..150).map(|i| format!("row\t{i}\n")).collect();
        fs::write(&input, text).unwrap();

        let pages = write_report(&input, &output, Some("Routes"), PageLayout::default()).unwrap();

        assert_eq!(pages, 3);
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("Routes\n"));
        assert!(written.contains("row 0"));

        fs::remove_file(&input).unwrap();
        fs::remove_file(&output).unwrap();
    }
}
