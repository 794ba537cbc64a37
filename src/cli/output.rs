//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Encoded records are the
//! exception: they go to stdout unstyled so they can be piped.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::crypto::Algorithm;
use crate::hasher::HashInfo;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a dim debug line to stderr: "dot {msg}"
pub fn debug(msg: &str) {
    eprintln!("{} {}", style("\u{00b7}").dim(), style(msg).dim());
}

/// Print the decoded contents of a record as a two-column table.
pub fn print_hash_info(info: &HashInfo) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec!["Scheme".to_string(), info.scheme.clone()]);
    table.add_row(vec![
        "Algorithm".to_string(),
        format!("{} (index {})", info.algorithm, info.algorithm_index),
    ]);
    table.add_row(vec!["Cost".to_string(), info.cost.to_string()]);
    table.add_row(vec!["Salt".to_string(), format!("{} bytes", info.salt_len)]);
    table.add_row(vec!["Hash".to_string(), format!("{} bytes", info.derived_len)]);

    println!("{table}");
}

/// Print the algorithm registry (Index, Name, Tag size, Notes).
pub fn print_algorithms_table(algorithms: &[Algorithm]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Index", "Name", "Tag bytes", "Notes"]);

    for alg in algorithms {
        let notes = if alg.is_legacy() {
            "legacy, not recommended"
        } else if *alg == Algorithm::default() {
            "default"
        } else {
            ""
        };
        table.add_row(vec![
            alg.index().to_string(),
            alg.name().to_string(),
            alg.tag_len().to_string(),
            notes.to_string(),
        ]);
    }

    println!("{table}");
}
