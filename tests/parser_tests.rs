use pathedit::{parse_path, EditError, Path};
use yare::parameterized;

#[parameterized(
    single_key = { "key", vec!["key"] },
    dotted = { "a.b.c", vec!["a", "b", "c"] },
    bracketed_index = { "a.b[0].c", vec!["a", "b", "0", "c"] },
    bracketed_key = { "a[b].c", vec!["a", "b", "c"] },
    consecutive_indices = { "grid[1][2]", vec!["grid", "1", "2"] },
    leading_dot = { ".a", vec!["a"] },
    doubled_dots = { "a..b", vec!["a", "b"] },
    unbalanced_brackets = { "a[b.c", vec!["a", "b", "c"] },
    stray_closing = { "a]b", vec!["a", "b"] },
    spaces_kept = { "key with spaces.x", vec!["key with spaces", "x"] },
    unicode = { "ключ[0]", vec!["ключ", "0"] },
    negative_index = { "arr[-1]", vec!["arr", "-1"] },
    only_separators = { ".[]", vec![] },
)]
fn test_parse_path_ok(input: &str, expected: Vec<&str>) {
    let path = parse_path(input).expect("Failed to parse path");

    assert_eq!(path.segments(), expected.as_slice());
}

#[test]
fn test_parse_path_rejects_empty() {
    assert!(matches!(parse_path(""), Err(EditError::InvalidPath(_))));
    assert!(matches!("".parse::<Path>(), Err(EditError::InvalidPath(_))));
}

#[parameterized(
    dotted = { "a.b.c", "a.b.c" },
    bracketed = { "a[0].b", "a.0.b" },
    normalised = { "..a[[b]]", "a.b" },
)]
fn test_path_display(input: &str, expected: &str) {
    let path = input.parse::<Path>().expect("Failed to parse path");

    assert_eq!(path.to_string(), expected);
}

#[test]
fn test_path_prefix() {
    let path: Path = "a.b[2].c".parse().unwrap();

    assert_eq!(path.len(), 4);
    assert_eq!(path.prefix(0), "");
    assert_eq!(path.prefix(2), "a.b");
    assert_eq!(path.prefix(10), "a.b.2.c");
    assert_eq!(path.into_segments(), ["a", "b", "2", "c"]);
}
