//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It allows to print in appropriate colors depending on the situation.
//! It also provides a table print-format for the elevator fleet.
use crate::config;
use crate::elevator_logic::{Fleet, Phase};
use crate::world_view::Directive;
use ansi_term::Colour::{self, Green, Red, Yellow, Purple};

use prettytable::{format, row, Table};
use unicode_width::UnicodeWidthStr;

/// Reads a print toggle. A poisoned toggle counts as on.
fn enabled(toggle: &std::sync::Mutex<bool>) -> bool {
    toggle.lock().map(|on| *on).unwrap_or(true)
}

/// Prints a message in a specified color to the terminal.
///
/// If `PRINT_ELSE_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The message to print.
/// - `color`: The color to use for the text output.
///
/// ## Example
/// ```
/// use ansi_term::Colour;
/// use elevatorsolver::print;
///
/// print::color("Hello, World!".to_string(), Colour::Green);
/// ```
pub fn color(msg: String, color: Colour) {
    if enabled(&config::PRINT_ELSE_ON) {
        println!("{}{}", color.paint("[CUSTOM]:  "), color.paint(msg));
    }
}

/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use elevatorsolver::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if enabled(&config::PRINT_ERR_ON) {
        eprintln!("{}{}", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if enabled(&config::PRINT_WARN_ON) {
        println!("{}{}", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    if enabled(&config::PRINT_OK_ON) {
        println!("{}{}", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let light_blue = Colour::RGB(102, 178, 255);
    if enabled(&config::PRINT_INFO_ON) {
        println!("{}{}", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that may take more than one column width (e.g. Unicode symbols),
/// ensuring aligned text in terminal-based tables or UI output.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

fn directive_label(directive: Directive) -> &'static str {
    match directive {
        Directive::Up => "⬆ up",
        Directive::Down => "⬇ down",
        Directive::Stay => "■ stay",
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::ApproachPickup => "Approach pickup",
        Phase::Pickup => "Pickup",
        Phase::Transit => "Transit",
        Phase::DropOff => "Drop-off",
    }
}

/// Renders the fleet as a table, one row per elevator.
///
/// Split from [fleet] so the layout can be checked without a terminal.
pub fn fleet_table(fleet: &Fleet) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["ID", "Floor", "Directive", "Phase", "Onboard", "Auth"]);
    for (id, elevator) in fleet.iter().enumerate() {
        let auth = if elevator.auth_token.is_empty() { "-" } else { elevator.auth_token.as_str() };
        table.add_row(row![
            id,
            elevator.current_floor,
            directive_label(elevator.directive),
            phase_label(elevator.phase),
            format!("{}/{}", elevator.onboard.len(), config::MAX_LOAD_LIMIT),
            auth
        ]);
    }
    table
}

/// Logs the current fleet state to the terminal in a structured table format.
///
/// # Behavior
/// - If configured printing is disabled (`config::PRINT_FLEET_ON` is false), the function exits early.
/// - Prints a header with the turn number, followed by [fleet_table].
pub fn fleet(fleet: &Fleet, turn: u32) {
    if !enabled(&config::PRINT_FLEET_ON) {
        return;
    }
    let header = pad_text(&format!("│  FLEET STATUS  turn {}", turn), 33);
    println!("{}", Purple.bold().paint("┌─────────────────────────────────┐"));
    println!("{}", Purple.bold().paint(format!("{}│", header)));
    println!("{}", Purple.bold().paint("└─────────────────────────────────┘"));
    fleet_table(fleet).printstd();
}
