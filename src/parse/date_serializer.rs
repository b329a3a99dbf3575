use crate::model::time::Time;

/// Format a time in canonical form: `<YYYY-MM-DD Www[ HH:MM][ ++Nd]>`.
///
/// Recurrence is always written in days, so `++2w` comes back as `++14d`.
/// `until` is not written.
pub fn format_date(time: &Time) -> String {
    let mut out = String::from("<");
    out.push_str(&time.date.format("%Y-%m-%d %a").to_string());
    if time.has_time_of_day {
        out.push(' ');
        out.push_str(&format_clock(time));
    }
    if let Some(days) = time.recurrence {
        out.push_str(&format!(" ++{}d", days));
    }
    out.push('>');
    out
}

/// `HH:MM` of a time, zero-padded
pub fn format_clock(time: &Time) -> String {
    time.date.format("%H:%M").to_string()
}
