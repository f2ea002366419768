use std::sync::LazyLock;

use regex::Regex;

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\s.*)?$").expect("ordered item pattern is valid"));

static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.").expect("ordinal pattern is valid"));

/// Leading number of an ordered list line such as `"3. item"` or `"12."`.
///
/// The line must start with the digits; callers strip indentation first.
pub fn ordered_list_number(line: &str) -> Option<u64> {
    ORDERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Rewrites the first `<digits>.` in `marker` to `1.`.
pub(crate) fn reset_ordinal(marker: &str) -> Option<String> {
    ORDINAL
        .is_match(marker)
        .then(|| ORDINAL.replace(marker, "1.").into_owned())
}
