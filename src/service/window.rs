use crate::error::{ServiceError, ServiceResult};

pub const MAX_RANK: usize = 100;

/// Slice of a year's entries selected by the `query` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankWindow {
    /// Highest values, highest first.
    Top(usize),
    /// Lowest values, lowest first.
    Bottom(usize),
}

impl RankWindow {
    /// `N` or `+N` selects the top N, `-N` the bottom N. No query selects nothing.
    ///
    /// Surrounding whitespace is ignored because a `+` in a query string decodes to a space.
    pub fn parse(query: Option<&str>) -> ServiceResult<Self> {
        let Some(raw) = query else {
            return Ok(RankWindow::Top(0));
        };

        let raw = raw.trim();
        let (bottom, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServiceError::InvalidRequest(format!(
                "invalid query {raw:?}: expected N, +N or -N"
            )));
        }

        let count = digits
            .parse::<usize>()
            .ok()
            .filter(|count| *count <= MAX_RANK)
            .ok_or_else(|| {
                ServiceError::InvalidRequest(format!(
                    "enter a query between 1 and {MAX_RANK}"
                ))
            })?;

        Ok(if bottom {
            RankWindow::Bottom(count)
        } else {
            RankWindow::Top(count)
        })
    }

    pub fn count(&self) -> usize {
        match self {
            RankWindow::Top(count) | RankWindow::Bottom(count) => *count,
        }
    }

    /// Applies the window to rows already sorted by value, highest first.
    pub fn apply<T>(&self, mut descending: Vec<T>) -> Vec<T> {
        if let RankWindow::Bottom(_) = self {
            descending.reverse();
        }
        descending.truncate(self.count());
        descending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_forms() {
        assert_eq!(RankWindow::parse(None).unwrap(), RankWindow::Top(0));
        assert_eq!(RankWindow::parse(Some("5")).unwrap(), RankWindow::Top(5));
        assert_eq!(RankWindow::parse(Some("+10")).unwrap(), RankWindow::Top(10));
        assert_eq!(RankWindow::parse(Some(" 10")).unwrap(), RankWindow::Top(10));
        assert_eq!(RankWindow::parse(Some("-3")).unwrap(), RankWindow::Bottom(3));
        assert_eq!(RankWindow::parse(Some("100")).unwrap(), RankWindow::Top(100));
    }

    #[test]
    fn rejects_counts_above_limit() {
        for query in ["101", "-250", "99999999999999999999999"] {
            let err = RankWindow::parse(Some(query)).unwrap_err();
            assert!(
                matches!(&err, ServiceError::InvalidRequest(msg) if msg == "enter a query between 1 and 100"),
                "{query}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_malformed_queries() {
        for query in ["", "-", "+", "--3", "+-3", "ten", "3.5", "1e2"] {
            assert!(
                matches!(RankWindow::parse(Some(query)), Err(ServiceError::InvalidRequest(_))),
                "{query} should be rejected"
            );
        }
    }

    #[test]
    fn top_takes_head_of_descending_rows() {
        let rows = vec![9, 7, 5, 3, 1];
        assert_eq!(RankWindow::Top(3).apply(rows.clone()), vec![9, 7, 5]);
        assert_eq!(RankWindow::Top(10).apply(rows.clone()), rows);
        assert!(RankWindow::Top(0).apply(rows).is_empty());
    }

    #[test]
    fn bottom_returns_lowest_in_ascending_order() {
        let rows = vec![9, 7, 5, 3, 1];
        assert_eq!(RankWindow::Bottom(2).apply(rows), vec![1, 3]);
    }
}
