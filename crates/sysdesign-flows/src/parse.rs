/// Pull the structured object out of raw model text.
///
/// Providers that honour the schema return bare JSON; others wrap it in
/// prose or a fenced block. Returns `None` when no JSON object can be found.
pub fn extract_object(raw: &str) -> Option<serde_json::Value> {
    let trimmed = raw.trim();
    if let Ok(value @ serde_json::Value::Object(_)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return Some(value);
    }

    // Widest span first: handles prose before and after a single object.
    if let Some(span) = outer_span(trimmed) {
        if let Ok(value @ serde_json::Value::Object(_)) = serde_json::from_str::<serde_json::Value>(span) {
            return Some(value);
        }
    }

    // Fall back to the first balanced object that parses.
    balanced_objects(trimmed)
        .into_iter()
        .find_map(|s| match serde_json::from_str::<serde_json::Value>(s) {
            Ok(value @ serde_json::Value::Object(_)) => Some(value),
            _ => None,
        })
}

fn outer_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Top-level `{...}` substrings, tracking string literals so braces inside
/// text values do not shift the depth.
fn balanced_objects(raw: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        objects.push(&raw[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    objects
}
