/// Returns the canonical URL path for `p`, eliminating `.` and `..` elements.
///
/// The following rules are applied:
///  1. Replace multiple slashes with a single slash.
///  2. Eliminate each `.` path name element (the current directory).
///  3. Eliminate each inner `..` path name element (the parent directory)
///     along with the non-`..` element that precedes it.
///  4. Eliminate `..` elements that begin a rooted path:
///     that is, replace `/..` by `/` at the beginning of a path.
///
/// The result always begins with `/`, and keeps the trailing slash of `p`. If the
/// result of this process is an empty string, `/` is returned.
///
/// ```rust
/// use radix_router::path::clean;
///
/// assert_eq!(clean("/a//b/./c/../d/"), "/a/b/d/");
/// assert_eq!(clean("../x"), "/x");
/// ```
pub fn clean(p: &str) -> String {
    if p.is_empty() {
        return "/".to_owned();
    }

    // a final '.' element names a directory, like a trailing slash
    let trailing = (p.len() > 1 && p.ends_with('/')) || p == "." || p.ends_with("/.");

    let mut elements: Vec<&str> = Vec::new();
    for element in p.split('/') {
        match element {
            "" | "." => {}
            ".." => {
                elements.pop();
            }
            element => elements.push(element),
        }
    }

    let mut cleaned = String::with_capacity(p.len() + 1);
    for element in &elements {
        cleaned.push('/');
        cleaned.push_str(element);
    }

    if cleaned.is_empty() || trailing {
        cleaned.push('/');
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    // path, result
    fn clean_tests() -> Vec<(&'static str, &'static str)> {
        vec![
            // Already clean
            ("/", "/"),
            ("/abc", "/abc"),
            ("/a/b/c", "/a/b/c"),
            ("/abc/", "/abc/"),
            ("/a/b/c/", "/a/b/c/"),
            // missing root
            ("", "/"),
            ("a/", "/a/"),
            ("abc", "/abc"),
            ("abc/def", "/abc/def"),
            ("a/b/c", "/a/b/c"),
            // Remove doubled slash
            ("//", "/"),
            ("/abc//", "/abc/"),
            ("/abc/def//", "/abc/def/"),
            ("/a/b/c//", "/a/b/c/"),
            ("/abc//def//ghi", "/abc/def/ghi"),
            ("//abc", "/abc"),
            ("///abc", "/abc"),
            ("//abc//", "/abc/"),
            // Remove . elements
            (".", "/"),
            ("./", "/"),
            ("/abc/./def", "/abc/def"),
            ("/./abc/def", "/abc/def"),
            ("/abc/.", "/abc/"),
            // Remove .. elements
            ("..", "/"),
            ("../", "/"),
            ("../../", "/"),
            ("../..", "/"),
            ("../../abc", "/abc"),
            ("/abc/def/ghi/../jkl", "/abc/def/jkl"),
            ("/abc/def/../ghi/../jkl", "/abc/jkl"),
            ("/abc/def/..", "/abc"),
            ("/abc/def/../..", "/"),
            ("/abc/def/../../..", "/"),
            ("/abc/def/../../../ghi/jkl/../../../mno", "/mno"),
            // Combinations
            ("abc/./../def", "/def"),
            ("abc//./../def", "/def"),
            ("abc/../../././../def", "/def"),
        ]
    }

    #[test]
    fn path_clean() {
        for (path, expected) in clean_tests() {
            assert_eq!(clean(path), expected, "clean({:?})", path);
            assert_eq!(clean(expected), expected, "clean({:?})", expected);
        }
    }

    #[test]
    fn path_clean_long() {
        for i in 1..1234 {
            let element = "a".repeat(i);
            let correct = format!("/{}", element);

            for path in [
                correct.clone(),
                element.clone(),
                format!("//{}", element),
                format!("//{}/b/..", element),
            ] {
                assert_eq!(clean(&path), correct);
            }
        }
    }
}
