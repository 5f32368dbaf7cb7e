//! CSV export of decision scores.
//!
//! Contract: header `Decision,Score`, one row per decision in input order,
//! scores rounded to 2 decimals, `\n` line endings. Labels are quoted only
//! when they contain a comma, quote or line break.

use crate::scoring::round2;

pub const CSV_FILE_NAME: &str = "decision_scores.csv";
pub const CSV_MIME: &str = "text/csv";

/// Pairs labels with scores by position; extra entries on either side are ignored.
pub fn scores_to_csv<S: AsRef<str>>(decisions: &[S], scores: &[f64]) -> String {
    let mut out = String::from("Decision,Score\n");
    for (label, score) in decisions.iter().zip(scores) {
        out.push_str(&csv_field(label.as_ref()));
        out.push(',');
        out.push_str(&format!("{:.2}", round2(*score)));
        out.push('\n');
    }
    out
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
