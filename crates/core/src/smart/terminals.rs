//! Static walking-distance proxy between terminal codes.
//!
//! Entries are directed: `(from, to)` is looked up as given and the reverse
//! direction is a separate row. Pairs that are not listed fall back to
//! [`DEFAULT_DISTANCE`].

/// Distance returned for any pair missing from the table.
pub const DEFAULT_DISTANCE: u32 = 20;

const TERMINAL_DISTANCES: &[(&str, &str, u32)] = &[
    ("T1", "T1", 0),
    ("T1", "T2", 5),
    ("T1", "T3", 10),
    ("T1", "T4", 15),
    ("T1", "JEWEL", 5),
    ("T2", "T2", 0),
    ("T2", "T1", 5),
    ("T2", "T3", 5),
    ("T2", "T4", 15),
    ("T2", "JEWEL", 10),
    ("T3", "T3", 0),
    ("T3", "T1", 10),
    ("T3", "T2", 5),
    ("T3", "JEWEL", 10),
    ("T4", "T4", 0),
    ("T4", "T1", 15),
    ("T4", "T2", 15),
    ("JEWEL", "JEWEL", 0),
    ("JEWEL", "T1", 5),
    ("JEWEL", "T2", 10),
    ("JEWEL", "T3", 10),
];

/// Travel-distance proxy between two terminals, in minutes of walking.
pub fn distance(from_terminal: &str, to_terminal: &str) -> u32 {
    let from = from_terminal.trim();
    let to = to_terminal.trim();

    TERMINAL_DISTANCES
        .iter()
        .find(|(a, b, _)| a.eq_ignore_ascii_case(from) && b.eq_ignore_ascii_case(to))
        .map(|(_, _, minutes)| *minutes)
        .unwrap_or(DEFAULT_DISTANCE)
}
