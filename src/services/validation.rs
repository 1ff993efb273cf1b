//! Form name checks

/// Characters a name may not start or end with
const FORBIDDEN_EDGE_CHARS: [char; 4] = ['^', '/', '-', '.'];

/// A name is valid when it is non-empty and neither starts nor ends with
/// whitespace or one of `^ / - .`
pub fn validate_form_name(name: &str) -> bool {
    let (Some(first), Some(last)) = (name.chars().next(), name.chars().next_back()) else {
        return false;
    };
    [first, last]
        .iter()
        .all(|c| !c.is_whitespace() && !FORBIDDEN_EDGE_CHARS.contains(c))
}
