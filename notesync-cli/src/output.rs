// ============================================================================
// notesync-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Headings, labelled values and result printing
//
// Plain-text renderings of sync plans and signature reports. JSON output is
// produced by the command modules directly with serde_json.

use std::fmt::Display;

use owo_colors::{OwoColorize, Stream, Style};

use crate::commands::inspect::SignatureReport;
use crate::commands::sync::SyncPlan;

/// Styles `text` when `stream` is a color-capable terminal. `NO_COLOR`
/// turns styling off, piped output is never styled.
fn paint(text: &str, stream: Stream, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

/// Print a heading with colored styling and clear separation
pub fn print_heading(text: &str) {
    let line = paint(&"=".repeat(50), Stream::Stdout, Style::new().bright_blue());
    println!("\n{line}");
    println!(
        "{}",
        paint(&format!(" {text} "), Stream::Stdout, Style::new().bold().bright_white())
    );
    println!("{line}\n");
}

/// Print a section heading (smaller than main heading)
pub fn print_section(text: &str) {
    println!(
        "\n{}",
        paint(&format!(" {text} "), Stream::Stdout, Style::new().bold().white())
    );
    println!("{}", paint(&"-".repeat(40), Stream::Stdout, Style::new().blue()));
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!(
        "{}: {}",
        paint(label, Stream::Stdout, Style::new().bright_cyan()),
        value
    );
}

/// Print an error message with red styling
pub fn print_error(message: impl Display) {
    eprintln!(
        "{} {}",
        paint("Error:", Stream::Stderr, Style::new().bold().bright_red()),
        message
    );
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub fn print_plan(plan: &SyncPlan) {
    print_heading(&format!("Sync {} -> {}", plan.source, plan.destination));

    print_section("Source");
    print_info("Provider", &plan.source);
    print_info("Category", &plan.category);
    print_info("Auth method", plan.auth_method);
    print_info("User ID", or_dash(plan.user_id.as_deref()));

    print_section("Browser");
    print_info("Headless", plan.browser.headless_mode);
    print_info("Timeout (s)", plan.browser.browser_timeout_seconds);
    print_info("Fail on empty source", plan.browser.error_on_empty_source);
    print_info("Config dir", plan.config_dir.display());
    print_info("Cache dir", plan.cache_dir.display());

    print_section("Destination");
    print_info("Service", &plan.destination);
    print_info("Token", &plan.readwise_token);
    if plan.tags.is_empty() {
        print_info("Tags", "-");
    } else {
        print_info("Tags", plan.tags.join(", "));
    }
}

pub fn print_report(report: &SignatureReport) {
    print_heading(&report.command);
    println!("{}", paint(&report.signature, Stream::Stdout, Style::new().dimmed()));

    for row in &report.parameters {
        print_section(&row.flag);
        print_info("Kind", &row.kind);
        print_info("Type", &row.type_name);
        print_info("Default", &row.default);
        print_info("Env", or_dash(row.env.as_deref()));
        print_info("Declared by", row.declared_by.join(", "));
    }
}
