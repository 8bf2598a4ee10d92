use std::fmt;

use thiserror::Error;

/// A column that callers may sort on. Only names listed by `parse` ever reach SQL.
pub trait SortField: Copy + PartialEq + fmt::Debug {
    fn parse(name: &str) -> Option<Self>;
    fn column(&self) -> &'static str;
    /// Appended last so equal rows keep a stable order.
    fn tie_breaker() -> Self;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy<F: SortField> {
    terms: Vec<(F, Direction)>,
}

#[derive(Debug, Error, PartialEq)]
pub enum OrderByError {
    #[error("unknown order_by field: {0}")]
    UnknownField(String),
    #[error("order_by segment {0:?} has no field name")]
    MissingField(String),
}

impl<F: SortField> Default for OrderBy<F> {
    fn default() -> Self {
        Self { terms: Vec::new() }
    }
}

impl<F: SortField> OrderBy<F> {
    /// Parses `"-value, +country,date"`. Whitespace is dropped and empty segments
    /// are skipped; a segment without a sign sorts ascending.
    pub fn parse(raw: &str) -> Result<Self, OrderByError> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let mut order = Self::default();

        for segment in compact.split(',').filter(|s| !s.is_empty()) {
            let (direction, name) = match segment.as_bytes()[0] {
                b'-' => (Direction::Desc, &segment[1..]),
                b'+' => (Direction::Asc, &segment[1..]),
                _ => (Direction::Asc, segment),
            };
            if name.is_empty() {
                return Err(OrderByError::MissingField(segment.to_string()));
            }
            let field = F::parse(&name.to_ascii_lowercase())
                .ok_or_else(|| OrderByError::UnknownField(name.to_string()))?;
            if !order.terms.iter().any(|(f, _)| *f == field) {
                order.terms.push((field, direction));
            }
        }

        Ok(order)
    }

    pub fn parse_opt(raw: Option<&str>) -> Result<Self, OrderByError> {
        raw.map(Self::parse).transpose().map(Option::unwrap_or_default)
    }

    /// Renders ` ORDER BY ...` from allow-listed columns, ending with the tie breaker.
    pub fn sql_clause(&self) -> String {
        let mut parts: Vec<String> = self
            .terms
            .iter()
            .map(|(field, direction)| format!("{} {}", field.column(), direction.keyword()))
            .collect();

        let tie = F::tie_breaker();
        if !self.terms.iter().any(|(f, _)| *f == tie) {
            parts.push(format!("{} ASC", tie.column()));
        }

        format!(" ORDER BY {}", parts.join(", "))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionField {
    Id,
    IndicatorId,
    CreationTime,
    IndicatorValue,
}

impl SortField for CollectionField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "indicator_id" | "indicator" => Some(Self::IndicatorId),
            "creation_time" => Some(Self::CreationTime),
            "indicator_value" => Some(Self::IndicatorValue),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::IndicatorId => "indicator",
            Self::CreationTime => "creation_time",
            Self::IndicatorValue => "indicator_value",
        }
    }

    fn tie_breaker() -> Self {
        Self::Id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryField {
    Id,
    Country,
    Date,
    Value,
}

impl SortField for EntryField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "country" => Some(Self::Country),
            "date" => Some(Self::Date),
            "value" => Some(Self::Value),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Country => "country",
            Self::Date => "date",
            Self::Value => "value",
        }
    }

    fn tie_breaker() -> Self {
        Self::Id
    }
}
