//! Range expressions such as `"3-7,10"` and the text shown before deleting them.

use thiserror::Error;

/// Upper bound on how many indices one expression may expand to.
pub const MAX_SELECTION: usize = 1_000_000;

/// Why a range expression was rejected. The whole expression is rejected on
/// the first bad token; no partial selection is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("not an integer: {token:?}")]
    InvalidNumber { token: String },

    #[error("row indices start at 1: {token:?}")]
    NotPositive { token: String },

    #[error("expression selects more than {MAX_SELECTION} rows")]
    TooLarge,
}

/// Parse a comma separated mix of single indices and inclusive `start-end`
/// ranges into display indices, keeping input order and duplicates.
///
/// A descending range (`start > end`) contributes nothing.
pub fn parse_range(text: &str) -> Result<Vec<usize>, RangeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for token in text.split(',') {
        let token = token.trim();
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(start, token)?;
                let end = parse_index(end, token)?;
                if start <= end {
                    if out.len().saturating_add(end - start).saturating_add(1) > MAX_SELECTION {
                        return Err(RangeError::TooLarge);
                    }
                    out.extend(start..=end);
                }
            }
            None => {
                if out.len() >= MAX_SELECTION {
                    return Err(RangeError::TooLarge);
                }
                out.push(parse_index(token, token)?);
            }
        }
    }
    Ok(out)
}

fn parse_index(part: &str, token: &str) -> Result<usize, RangeError> {
    let part = part.trim();
    // `usize::from_str` tolerates a leading '+'.
    if !part.bytes().all(|b| b.is_ascii_digit()) || part.is_empty() {
        return Err(RangeError::InvalidNumber {
            token: token.to_string(),
        });
    }
    match part.parse::<usize>() {
        Ok(0) => Err(RangeError::NotPositive {
            token: token.to_string(),
        }),
        Ok(n) => Ok(n),
        Err(_) => Err(RangeError::InvalidNumber {
            token: token.to_string(),
        }),
    }
}

/// Confirmation text for deleting `indices`: the full list when there are at
/// most `limit` of them, `first-last` otherwise.
pub fn deletion_summary(indices: &[usize], limit: usize) -> String {
    let rows = match (indices.first(), indices.last()) {
        (Some(first), Some(last)) if indices.len() > limit => format!("{first}-{last}"),
        _ => indices
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    };
    format!("Are you sure you want to delete rows {rows}?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_expands_ranges() {
        assert_eq!(parse_range("1,3-5,2").unwrap(), vec![1, 3, 4, 5, 2]);
        assert_eq!(parse_range("3-5,8").unwrap(), vec![3, 4, 5, 8]);
        assert_eq!(parse_range("2,2,1-2").unwrap(), vec![2, 2, 1, 2]);
    }

    #[test]
    fn tolerates_whitespace_around_tokens() {
        assert_eq!(parse_range(" 1 , 4 - 6 ").unwrap(), vec![1, 4, 5, 6]);
    }

    #[test]
    fn empty_input_is_an_empty_selection() {
        assert!(parse_range("").unwrap().is_empty());
        assert!(parse_range("   ").unwrap().is_empty());
    }

    #[test]
    fn descending_range_is_empty() {
        assert!(parse_range("7-3").unwrap().is_empty());
        assert_eq!(parse_range("1,7-3,9").unwrap(), vec![1, 9]);
    }

    #[test]
    fn one_bad_token_rejects_everything() {
        for bad in ["1,x,3", "1,,3", "1,", "-3", "3-", "1-2-3", "+4", "2.5", "a-b"] {
            assert!(
                matches!(parse_range(bad), Err(RangeError::InvalidNumber { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_is_not_a_display_index() {
        assert_eq!(
            parse_range("0"),
            Err(RangeError::NotPositive {
                token: "0".to_string()
            })
        );
        assert!(matches!(
            parse_range("0-4"),
            Err(RangeError::NotPositive { .. })
        ));
    }

    #[test]
    fn huge_ranges_are_rejected() {
        assert_eq!(parse_range("1-2000000"), Err(RangeError::TooLarge));
        assert_eq!(parse_range("1-1000000").unwrap().len(), MAX_SELECTION);
    }

    #[test]
    fn summary_lists_small_selections() {
        assert_eq!(
            deletion_summary(&[3, 4, 8], 25),
            "Are you sure you want to delete rows 3, 4, 8?"
        );
    }

    #[test]
    fn summary_abbreviates_large_selections() {
        let indices: Vec<usize> = (10..=40).collect();
        assert_eq!(
            deletion_summary(&indices, 25),
            "Are you sure you want to delete rows 10-40?"
        );
        let exactly: Vec<usize> = (1..=25).collect();
        assert!(deletion_summary(&exactly, 25).contains("1, 2, 3"));
    }
}
