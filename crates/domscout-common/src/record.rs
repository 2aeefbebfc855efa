use chrono::{NaiveDateTime, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered attribute samples taken from matched elements.
pub type SampleAttributes = IndexMap<String, String>;

/// Local wall-clock time, truncated to seconds.
pub fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// `%Y-%m-%d %H:%M:%S` (de)serialization for record timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Outcome of applying one location strategy (or one sub-case of a
/// composite strategy).
///
/// Built through [`StrategyResult::hit`] or [`StrategyResult::miss`] so that
/// `error_detail` is present exactly when nothing was found and a miss always
/// reports zero matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    strategy_name: String,
    target_description: String,
    selector_value: String,
    found: bool,
    match_count: usize,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    sample_attributes: SampleAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
    #[serde(with = "timestamp")]
    captured_at: NaiveDateTime,
}

impl StrategyResult {
    /// A successful lookup. `match_count` is expected to be at least one.
    pub fn hit(
        strategy_name: impl Into<String>,
        target_description: impl Into<String>,
        selector_value: impl Into<String>,
        match_count: usize,
        sample_attributes: SampleAttributes,
    ) -> Self {
        debug_assert!(match_count > 0, "a hit needs at least one match");
        Self {
            strategy_name: strategy_name.into(),
            target_description: target_description.into(),
            selector_value: selector_value.into(),
            found: true,
            match_count,
            sample_attributes,
            error_detail: None,
            captured_at: now(),
        }
    }

    pub fn miss(
        strategy_name: impl Into<String>,
        target_description: impl Into<String>,
        selector_value: impl Into<String>,
        error_detail: impl Into<String>,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            target_description: target_description.into(),
            selector_value: selector_value.into(),
            found: false,
            match_count: 0,
            sample_attributes: SampleAttributes::new(),
            error_detail: Some(error_detail.into()),
            captured_at: now(),
        }
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn target_description(&self) -> &str {
        &self.target_description
    }

    pub fn selector_value(&self) -> &str {
        &self.selector_value
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn sample_attributes(&self) -> &SampleAttributes {
        &self.sample_attributes
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn captured_at(&self) -> NaiveDateTime {
        self.captured_at
    }
}

/// Aggregate of the independent sub-cases of a composite strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeResult {
    strategy_name: String,
    target_description: String,
    found_count: usize,
    total_tested: usize,
    details: Vec<StrategyResult>,
    #[serde(with = "timestamp")]
    captured_at: NaiveDateTime,
}

impl CompositeResult {
    pub fn new(
        strategy_name: impl Into<String>,
        target_description: impl Into<String>,
        details: Vec<StrategyResult>,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            target_description: target_description.into(),
            found_count: details.iter().filter(|d| d.found()).count(),
            total_tested: details.len(),
            details,
            captured_at: now(),
        }
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn target_description(&self) -> &str {
        &self.target_description
    }

    pub fn found_count(&self) -> usize {
        self.found_count
    }

    pub fn total_tested(&self) -> usize {
        self.total_tested
    }

    pub fn details(&self) -> &[StrategyResult] {
        &self.details
    }

    pub fn captured_at(&self) -> NaiveDateTime {
        self.captured_at
    }
}

/// Result of one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyOutcome {
    Singular(StrategyResult),
    Composite(CompositeResult),
}

impl StrategyOutcome {
    pub fn strategy_name(&self) -> &str {
        match self {
            StrategyOutcome::Singular(r) => r.strategy_name(),
            StrategyOutcome::Composite(c) => c.strategy_name(),
        }
    }

    pub fn target_description(&self) -> &str {
        match self {
            StrategyOutcome::Singular(r) => r.target_description(),
            StrategyOutcome::Composite(c) => c.target_description(),
        }
    }

    /// Shared success predicate: a singular result succeeds when it found
    /// something, a composite when any sub-case did.
    pub fn is_success(&self) -> bool {
        match self {
            StrategyOutcome::Singular(r) => r.found(),
            StrategyOutcome::Composite(c) => {
                c.found_count() > 0 || c.details().iter().any(StrategyResult::found)
            }
        }
    }

    /// Number of independent location attempts behind this outcome.
    pub fn attempts(&self) -> usize {
        match self {
            StrategyOutcome::Singular(_) => 1,
            StrategyOutcome::Composite(c) => c.details().len(),
        }
    }

    /// Count shown next to the strategy in the summary, if any.
    pub fn found_hint(&self) -> Option<usize> {
        let n = match self {
            StrategyOutcome::Singular(r) => r.match_count(),
            StrategyOutcome::Composite(c) => c.found_count(),
        };
        (n > 0).then_some(n)
    }

    /// Every individual result, in declared order.
    pub fn results(&self) -> Box<dyn Iterator<Item = &StrategyResult> + '_> {
        match self {
            StrategyOutcome::Singular(r) => Box::new(std::iter::once(r)),
            StrategyOutcome::Composite(c) => Box::new(c.details().iter()),
        }
    }
}

/// One normalized body row of an HTML table.
///
/// `fields` is flattened when serialized, so the key order of a record is
/// `row_index`, `captured_at`, the column headers, then the action columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub row_index: usize,
    #[serde(with = "timestamp")]
    pub captured_at: NaiveDateTime,
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
    pub available_actions: Vec<String>,
    pub edit_link: Option<String>,
    pub delete_link: Option<String>,
}

impl TableRecord {
    /// Keys the fixed fields serialize under. A column header may not use
    /// one, it would collide with the flattened `fields`.
    pub const RESERVED_KEYS: &'static [&'static str] = &[
        "row_index",
        "captured_at",
        "available_actions",
        "edit_link",
        "delete_link",
    ];

    pub fn is_reserved_key(key: &str) -> bool {
        Self::RESERVED_KEYS.contains(&key)
    }

    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            captured_at: now(),
            fields: IndexMap::new(),
            available_actions: Vec::new(),
            edit_link: None,
            delete_link: None,
        }
    }
}
