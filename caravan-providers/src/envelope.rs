use serde_json::Value;

/// Walks each candidate path in order and returns the first array found.
///
/// Provider responses wrap their payload inconsistently between deployments
/// (`data.Cities` vs `Cities` vs `Data`), so callers list every shape they
/// have seen, highest priority first.
pub fn first_array<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a Vec<Value>> {
    for path in paths {
        let mut cursor = value;
        let mut found = true;
        for key in *path {
            match cursor.get(key) {
                Some(next) => cursor = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found {
            if let Some(items) = cursor.as_array() {
                return Some(items);
            }
        }
    }
    None
}
