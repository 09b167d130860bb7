//! Outlet status table parsing
//!
//! `oltsta show` prints one row per outlet:
//!
//! ```text
//!   Index    Name          Status
//!   1        Outlet1       On
//!   2        Outlet2       Off
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static STATUS_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(\d+)\s+(\S+)\s+(on|off)\s*$").expect("status row pattern is valid")
});

/// One parsed row of the status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutletStatus {
    pub index: u32,
    pub name: String,
    /// `true` when the outlet is energized
    pub state: bool,
}

/// Parse every status row in `text`. Non-matching lines (headers, command
/// echo, prompts) are ignored; an empty result means the page was unusable.
pub fn parse_status(text: &str) -> Vec<OutletStatus> {
    STATUS_ROW
        .captures_iter(text)
        .filter_map(|caps| {
            let index = caps[1].parse::<u32>().ok()?;
            Some(OutletStatus {
                index,
                name: caps[2].to_string(),
                state: caps[3].eq_ignore_ascii_case("on"),
            })
        })
        .collect()
}

/// Outlet index to state, ordered by index
pub fn state_map(rows: &[OutletStatus]) -> BTreeMap<u32, bool> {
    rows.iter().map(|row| (row.index, row.state)).collect()
}
