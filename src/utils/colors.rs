/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

fn is_blank(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "--:--:--" || v == "-"
}

/// Empty cells grey, otherwise green for IN and red for OUT.
pub fn colorize_in_out(value: &str, is_in: bool) -> String {
    if is_blank(value) {
        return format!("{GREY}{value}{RESET}");
    }

    if is_in {
        format!("{GREEN}{value}{RESET}")
    } else {
        format!("{RED}{value}{RESET}")
    }
}

/// Grey for empty cells, unchanged otherwise.
pub fn colorize_optional(value: &str) -> String {
    if is_blank(value) {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Leave status colour: yellow pending, green approved, red disapproved.
pub fn color_for_leave_status(status: &str) -> &'static str {
    match status {
        "Approved" => GREEN,
        "Disapproved" => RED,
        "Pending" => YELLOW,
        _ => RESET,
    }
}
