//! Closed Month/Day Vocabularies and One-Hot Encoding

use crate::record::{FieldValue, RawRecord};
use crate::schema::{DAY_FIELD, MONTH_FIELD};
use data_validator::ValidationError;
use serde::{Deserialize, Serialize};

/// Number of one-hot category columns (12 months + 7 days)
pub const CATEGORY_WIDTH: usize = 19;

/// Category column names in model order: months in calendar order, then
/// days in week order starting Monday
pub const CATEGORY_COLUMNS: [&str; CATEGORY_WIDTH] = [
    "month_jan", "month_feb", "month_mar", "month_apr", "month_may", "month_jun",
    "month_jul", "month_aug", "month_sep", "month_oct", "month_nov", "month_dec",
    "day_mon", "day_tue", "day_wed", "day_thu", "day_fri", "day_sat", "day_sun",
];

/// Calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Lowercase three-letter abbreviation
    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Aug => "aug",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dec => "dec",
        }
    }

    /// Exact match against the abbreviation; no case folding
    pub fn from_abbr(abbr: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == abbr)
    }

    /// Position in the category block
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Day of week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "mon",
            Day::Tue => "tue",
            Day::Wed => "wed",
            Day::Thu => "thu",
            Day::Fri => "fri",
            Day::Sat => "sat",
            Day::Sun => "sun",
        }
    }

    pub fn from_abbr(abbr: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == abbr)
    }

    /// Position in the category block (after the 12 months)
    pub fn index(&self) -> usize {
        Month::ALL.len() + *self as usize
    }
}

/// One-hot month/day flags, keyed by [`CATEGORY_COLUMNS`]
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVector {
    flags: [f64; CATEGORY_WIDTH],
}

impl CategoryVector {
    /// Flag for a column name such as `"month_mar"`
    pub fn get(&self, key: &str) -> Option<f64> {
        CATEGORY_COLUMNS
            .iter()
            .position(|c| *c == key)
            .map(|i| self.flags[i])
    }

    pub fn values(&self) -> &[f64] {
        &self.flags
    }

    /// `(column, flag)` pairs in model order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        CATEGORY_COLUMNS.iter().copied().zip(self.flags.iter().copied())
    }

    /// Number of set flags
    pub fn hot_count(&self) -> usize {
        self.flags.iter().filter(|f| **f == 1.0).count()
    }
}

/// Fresh all-zero category vector
pub fn build_category_template() -> CategoryVector {
    CategoryVector {
        flags: [0.0; CATEGORY_WIDTH],
    }
}

/// One-hot encode the record's `month` and `day` fields.
///
/// Values outside the closed vocabularies are rejected with
/// [`ValidationError::UnknownCategory`] instead of widening the vector.
pub fn encode_categorical(record: &RawRecord) -> Result<CategoryVector, ValidationError> {
    let missing: Vec<String> = [MONTH_FIELD, DAY_FIELD]
        .into_iter()
        .filter(|f| record.get(f).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::SchemaMismatch {
            missing,
            unexpected: Vec::new(),
        });
    }

    let month_abbr = text_field(record, MONTH_FIELD)?;
    let month = Month::from_abbr(month_abbr).ok_or_else(|| ValidationError::UnknownCategory {
        field: MONTH_FIELD.to_string(),
        value: month_abbr.to_string(),
    })?;

    let day_abbr = text_field(record, DAY_FIELD)?;
    let day = Day::from_abbr(day_abbr).ok_or_else(|| ValidationError::UnknownCategory {
        field: DAY_FIELD.to_string(),
        value: day_abbr.to_string(),
    })?;

    let mut categories = build_category_template();
    categories.flags[month.index()] = 1.0;
    categories.flags[day.index()] = 1.0;
    Ok(categories)
}

fn text_field<'a>(record: &'a RawRecord, field: &str) -> Result<&'a str, ValidationError> {
    match record.get(field) {
        Some(FieldValue::Text(s)) => Ok(s),
        _ => Err(ValidationError::InvalidType {
            field: field.to_string(),
            expected: "a three-letter abbreviation",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(month: &str, day: &str) -> RawRecord {
        RawRecord::new().with("month", month).with("day", day)
    }

    #[test]
    fn test_column_names_follow_enum_order() {
        for m in Month::ALL {
            assert_eq!(CATEGORY_COLUMNS[m.index()], format!("month_{}", m.as_str()));
        }
        for d in Day::ALL {
            assert_eq!(CATEGORY_COLUMNS[d.index()], format!("day_{}", d.as_str()));
        }
    }

    #[test]
    fn test_template_is_zeroed() {
        let template = build_category_template();
        assert_eq!(template.values().len(), CATEGORY_WIDTH);
        assert_eq!(template.hot_count(), 0);
    }

    #[test]
    fn test_encode_mar_fri() {
        let encoded = encode_categorical(&record("mar", "fri")).unwrap();
        assert_eq!(encoded.get("month_mar"), Some(1.0));
        assert_eq!(encoded.get("day_fri"), Some(1.0));
        assert_eq!(encoded.hot_count(), 2);
        assert_eq!(encoded.iter().filter(|(_, v)| *v == 0.0).count(), 17);
    }

    #[test]
    fn test_encoding_does_not_leak_between_calls() {
        let first = encode_categorical(&record("aug", "sun")).unwrap();
        let second = encode_categorical(&record("jan", "mon")).unwrap();
        assert_eq!(first.get("month_aug"), Some(1.0));
        assert_eq!(second.get("month_aug"), Some(0.0));
        assert_eq!(second.hot_count(), 2);
    }

    #[test]
    fn test_unknown_month_rejected() {
        let err = encode_categorical(&record("xyz", "fri")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownCategory {
                field: "month".to_string(),
                value: "xyz".to_string()
            }
        );
    }

    #[test]
    fn test_case_sensitive_vocabulary() {
        let err = encode_categorical(&record("Mar", "fri")).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory { .. }));
    }

    #[test]
    fn test_unknown_day_rejected() {
        let err = encode_categorical(&record("mar", "funday")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownCategory { ref field, .. } if field == "day"
        ));
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let err = encode_categorical(&RawRecord::new().with("month", "mar")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SchemaMismatch {
                missing: vec!["day".to_string()],
                unexpected: vec![]
            }
        );

        let err = encode_categorical(&RawRecord::new().with("month", 3.0).with("day", "fri"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    proptest! {
        #[test]
        fn exactly_one_month_and_one_day(m in 0usize..12, d in 0usize..7) {
            let month = Month::ALL[m];
            let day = Day::ALL[d];
            let encoded = encode_categorical(&record(month.as_str(), day.as_str())).unwrap();

            let months = &encoded.values()[..12];
            let days = &encoded.values()[12..];
            prop_assert_eq!(months.iter().sum::<f64>(), 1.0);
            prop_assert_eq!(days.iter().sum::<f64>(), 1.0);
            prop_assert_eq!(months[m], 1.0);
            prop_assert_eq!(days[d], 1.0);
        }
    }
}
