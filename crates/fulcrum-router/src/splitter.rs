//! Tokenizes a registration pattern into radix-tree segments.
//!
//! A segment is either a constant run beginning with `/`, or a single
//! `:name[|check]` / `*name[|check]` token. A `^...$` regex check is copied
//! verbatim into its segment, including any `/` it contains, so the splitter
//! must track whether it is inside a regex to avoid cutting one in half.

/// Splits a registration pattern (e.g. `/api/v1/:id|isnum/*rest`) into its
/// constituent segments.
///
/// `/api/users` becomes `["/api/users"]`; `/api/:id/edit` becomes
/// `["/api/", ":id", "/edit"]`; a pattern shorter than two bytes (`""` or
/// `"/"`) is treated as the root and returns `["/"]`.
pub(crate) fn split_path(pattern: &str) -> Vec<String> {
    if pattern.len() < 2 {
        return vec!["/".to_string()];
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut segments: Vec<String> = Vec::new();
    let mut in_regex = false;
    let mut in_const = false;

    for i in 0..chars.len() {
        let c = chars[i];

        if in_regex {
            segments.last_mut().expect("regex body starts mid-segment").push(c);
            if c == '$' && chars[i - 1] != '\\' && (i == chars.len() - 1 || chars[i + 1] == '/') {
                in_regex = false;
            }
            continue;
        }

        match c {
            '/' => {
                if !in_const {
                    segments.push(String::new());
                    in_const = true;
                }
            }
            ':' | '*' => {
                in_const = false;
                if chars[i - 1] == '/' {
                    segments.push(String::new());
                }
            }
            '^' => in_regex = true,
            _ => {}
        }
        segments.last_mut().expect("first char is always '/'").push(c);
    }

    segments
}
