use crate::types::{EditError, Path};
use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::one_of,
    combinator::{all_consuming, map, value},
    multi::many0,
    IResult, Parser,
};
use nom_language::error::VerboseError;

type Res<T, U> = IResult<T, U, VerboseError<T>>;

const SEPARATORS: &str = ".[]";

/// Parses a path string into its segments.
///
/// Every maximal run of characters other than `.`, `[` and `]` becomes one segment.
/// Separators are dropped without checking that brackets balance, so `a.b`, `a[b]`
/// and `a]b` all parse to `["a", "b"]`.
///
/// ## Errors
///
/// Returns `EditError::InvalidPath` if `input` is empty.
pub fn parse_path(input: &str) -> Result<Path, EditError> {
    if input.is_empty() {
        return Err(EditError::InvalidPath(
            "path must be a non-empty string".to_string(),
        ));
    }

    match all_consuming(segments).parse(input) {
        Ok((_, segments)) => Ok(Path::from_segments(segments)),
        Err(err) => Err(EditError::InvalidPath(format!("{}", err))),
    }
}

fn segments(input: &str) -> Res<&str, Vec<String>> {
    map(
        many0(alt((map(segment, Some), value(None, separator)))),
        |parts: Vec<Option<String>>| parts.into_iter().flatten().collect(),
    )
    .parse(input)
}

fn segment(input: &str) -> Res<&str, String> {
    map(is_not(SEPARATORS), |s: &str| s.to_string()).parse(input)
}

fn separator(input: &str) -> Res<&str, char> {
    one_of(SEPARATORS).parse(input)
}
