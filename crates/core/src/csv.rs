/// Parses a comma separated list, returning the trimmed non-empty values in order.
///
/// There is no quoting or escaping: every comma is a separator.
pub fn parse_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
