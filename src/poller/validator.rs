/// Syntactic sanity check for an extracted price candidate.
///
/// Rejects values that are too short to be a real quote, percentage-change
/// text that the source page renders near the price, and anything not
/// formatted with exactly two fractional digits. Says nothing about whether
/// the value is economically plausible.
pub fn validate(value: &str) -> bool {
    // A real quote needs at least a two-digit whole part plus ".dd".
    if value.len() < 5 {
        return false;
    }
    if value.contains('%') {
        return false;
    }
    let Some(dot) = value.find('.') else {
        return false;
    };
    value.len() - 3 == dot
}
