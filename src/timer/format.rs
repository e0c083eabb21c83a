//! Countdown formatting

/// Format a number of seconds as `MM:SS`.
///
/// Both parts are zero-padded to two digits; minutes are not wrapped into
/// hours, so a three hour focus interval renders as `180:00`.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
