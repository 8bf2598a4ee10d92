use chrono::NaiveDateTime;

/// Text layout of `collections.creation_time`; lexical order matches time order.
pub const CREATION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn format_creation_time(time: &NaiveDateTime) -> String {
    time.format(CREATION_TIME_FORMAT).to_string()
}

pub fn parse_creation_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, CREATION_TIME_FORMAT)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    pub id: i64,
    pub indicator_id: String,
    pub creation_time: NaiveDateTime,
    /// Human readable indicator name taken from the first upstream record.
    pub indicator_value: String,
}

impl Collection {
    pub fn uri(&self) -> String {
        format!("/collections/{}", self.id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCollection {
    pub indicator_id: String,
    pub creation_time: NaiveDateTime,
    pub indicator_value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountryEntry {
    pub id: i64,
    pub country: String,
    pub date: String,
    pub value: f64,
    pub collection_id: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCountryEntry {
    pub country: String,
    pub date: String,
    pub value: f64,
}
