use std::borrow::Cow;

pub use project_name::ProjectName;

mod project_name;

/// Normalize a project name.
///
/// Lowercases the name and collapses runs of `-`, `_`, and `.` down to a single `-`. Any string is
/// accepted; names that are already normalized are returned without allocating.
///
/// See: <https://packaging.python.org/en/latest/specifications/name-normalization/>
pub fn normalize(name: &str) -> Cow<'_, str> {
    if is_normalized(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(normalize_owned(name))
    }
}

fn normalize_owned(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());

    let mut separator = false;
    for char in name.chars() {
        match char {
            '-' | '_' | '.' => {
                if !separator {
                    normalized.push('-');
                }
                separator = true;
            }
            'A'..='Z' => {
                normalized.push(char.to_ascii_lowercase());
                separator = false;
            }
            _ if char.is_ascii() => {
                normalized.push(char);
                separator = false;
            }
            _ => {
                normalized.extend(char.to_lowercase());
                separator = false;
            }
        }
    }

    normalized
}

/// Returns `true` if the name is already normalized.
pub fn is_normalized(name: &str) -> bool {
    let mut last = None;
    for char in name.chars() {
        match char {
            'A'..='Z' | '_' | '.' => return false,
            // Runs of `-` are normalized to a single `-`.
            '-' if last == Some('-') => return false,
            _ if char.is_ascii() => {}
            _ => {
                let mut lower = char.to_lowercase();
                if lower.next() != Some(char) || lower.next().is_some() {
                    return false;
                }
            }
        }
        last = Some(char);
    }
    true
}

/// Create the URL of a project's page in a simple repository.
///
/// The name is normalized and joined to `base_url` with exactly one `/`, and the result always
/// ends with a `/`. An empty `base_url` yields a relative URL consisting of the name alone.
pub fn create_project_url(base_url: &str, name: &str) -> String {
    let name = normalize(name);
    let mut url = String::with_capacity(base_url.len() + name.len() + 2);
    url.push_str(base_url);
    if !base_url.is_empty() && !base_url.ends_with('/') {
        url.push('/');
    }
    url.push_str(&name);
    url.push('/');
    url
}
