//! Manifest path utilities

/// Normalize a manifest path
/// - Converts backslashes to forward slashes
/// - Removes redundant separators and interior `.` components
/// - Keeps a leading `./` or `/` so that differing roots stay visible
pub fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let (prefix, rest) = split_prefix(&path);

    let components: Vec<&str> = rest
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();

    format!("{}{}", prefix, components.join("/"))
}

/// Drop `count` leading directory components, never the file name itself
///
/// `strip_components("./SR2324/raw/a.txt", 1)` gives `./raw/a.txt`.
pub fn strip_components(path: &str, count: usize) -> String {
    if count == 0 {
        return path.to_string();
    }

    let (prefix, rest) = split_prefix(path);
    let components: Vec<&str> = rest.split('/').filter(|c| !c.is_empty()).collect();
    let keep_from = count.min(components.len().saturating_sub(1));

    format!("{}{}", prefix, components[keep_from..].join("/"))
}

/// Split off a leading `./` or `/`
fn split_prefix(path: &str) -> (&str, &str) {
    if let Some(rest) = path.strip_prefix("./") {
        ("./", rest)
    } else if let Some(rest) = path.strip_prefix('/') {
        ("/", rest)
    } else {
        ("", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(normalize_path(".\\SR2324\\raw\\a.txt"), "./SR2324/raw/a.txt");
    }

    #[test]
    fn test_normalize_redundant_separators() {
        assert_eq!(normalize_path("./a//b/./c.txt"), "./a/b/c.txt");
        assert_eq!(normalize_path("/a/b/"), "/a/b");
    }

    #[test]
    fn test_normalize_keeps_root_prefix() {
        assert_eq!(normalize_path("./a.txt"), "./a.txt");
        assert_eq!(normalize_path("a.txt"), "a.txt");
        assert_ne!(normalize_path("./a.txt"), normalize_path("./SR2324/a.txt"));
    }

    #[test]
    fn test_strip_components() {
        assert_eq!(strip_components("./SR2324/raw/a.txt", 1), "./raw/a.txt");
        assert_eq!(strip_components("/mnt/SR2324/raw/a.txt", 2), "/raw/a.txt");
        assert_eq!(strip_components("SR2324/a.txt", 1), "a.txt");
    }

    #[test]
    fn test_strip_never_removes_filename() {
        assert_eq!(strip_components("./a/b.txt", 5), "./b.txt");
        assert_eq!(strip_components("b.txt", 1), "b.txt");
    }

    #[test]
    fn test_strip_zero_is_identity() {
        assert_eq!(strip_components("./a/b.txt", 0), "./a/b.txt");
    }
}
