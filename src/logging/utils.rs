//! Formatting helpers: ANSI stripping, timestamps, banners and log lines.

/// Target used for section header events.
pub(super) const SECTION_TARGET: &str = "sysmaint::section";

/// Target used for dry-run events.
pub(super) const DRY_RUN_TARGET: &str = "sysmaint::dry_run";

/// Width of the centred title field inside a section banner.
pub(super) const BANNER_TITLE_WIDTH: usize = 57;

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Format the current local time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_local_datetime() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Build the three lines of a section banner for `title`.
pub(super) fn section_banner(title: &str) -> [String; 3] {
    let border = "═".repeat(BANNER_TITLE_WIDTH + 2);
    [
        format!("╔{border}╗"),
        format!("║ {title:^width$} ║", width = BANNER_TITLE_WIDTH),
        format!("╚{border}╝"),
    ]
}

/// Severity prefix written before a message in the log file.
pub(super) fn file_prefix(level: tracing::Level, target: &str) -> &'static str {
    match (level, target) {
        (tracing::Level::INFO, DRY_RUN_TARGET) => "DRY RUN: ",
        (tracing::Level::ERROR, _) => "ERROR: ",
        (tracing::Level::WARN, _) => "WARNING: ",
        (tracing::Level::DEBUG | tracing::Level::TRACE, _) => "DEBUG: ",
        _ => "",
    }
}

/// Render one log file line: `"<timestamp> - <prefix><message>"`.
pub(super) fn file_line(ts: &str, level: tracing::Level, target: &str, msg: &str) -> String {
    format!(
        "{ts} - {}{}",
        file_prefix(level, target),
        strip_ansi(msg)
    )
}
