// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Category, Result, SampleError, SampleValue};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Reserved `int` key holding the sample timestamp in seconds since the epoch.
pub const TIME_KEY: &str = "time";

/// One timestamped record of named values, destined for a single logging
/// event.
///
/// Values are partitioned by type into [`Category`] columns. `int` and
/// `normal` always exist, `int` starting out with the [`TIME_KEY`] entry. The
/// other categories are created by the first value added to them. Each
/// category is its own key namespace: the same key may be used in several
/// categories.
///
/// Keys are kept sorted, so the encoded document only depends on the current
/// contents and not on the order values were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub(crate) timestamp: SystemTime,
    pub(crate) ints: BTreeMap<String, i64>,
    pub(crate) doubles: Option<BTreeMap<String, f64>>,
    pub(crate) normals: BTreeMap<String, String>,
    pub(crate) norm_vectors: Option<BTreeMap<String, Vec<String>>>,
    pub(crate) tag_sets: Option<BTreeMap<String, BTreeSet<String>>>,
}

impl Default for Sample {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample {
    /// Creates a sample timestamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(SystemTime::now())
    }

    /// Creates a sample with an explicit timestamp. `int["time"]` is set to
    /// the whole seconds since the epoch, rounded down.
    pub fn with_timestamp(timestamp: SystemTime) -> Self {
        let mut sample = Self::empty(timestamp);
        sample
            .ints
            .insert(TIME_KEY.to_owned(), epoch_seconds(timestamp));
        sample
    }

    /// A sample with no values at all, not even [`TIME_KEY`]. Only used while
    /// decoding, which restores the time entry from the document.
    pub(crate) fn empty(timestamp: SystemTime) -> Self {
        Self {
            timestamp,
            ints: BTreeMap::new(),
            doubles: None,
            normals: BTreeMap::new(),
            norm_vectors: None,
            tag_sets: None,
        }
    }

    /// The point in time the sample was created for.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Iterates over the categories currently present, in wire order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| self.has_category(*category))
    }

    /// Whether the category exists. Always true for `int` and `normal`.
    pub fn has_category(&self, category: Category) -> bool {
        match category {
            Category::Int | Category::Normal => true,
            Category::Double => self.doubles.is_some(),
            Category::NormVector => self.norm_vectors.is_some(),
            Category::TagSet => self.tag_sets.is_some(),
        }
    }

    /// Stores `value` under `key` in the category of `V`, replacing any
    /// previous value for that key.
    pub fn add<V: SampleValue>(&mut self, key: impl Into<String>, value: V) {
        V::column_mut(self).insert(key.into(), value);
    }

    /// Whether `key` is set in the category of `V`.
    pub fn is_set<V: SampleValue>(&self, key: &str) -> bool {
        V::column(self).is_some_and(|column| column.contains_key(key))
    }

    /// Looks up `key` in the category of `V`.
    ///
    /// # Errors
    /// [`SampleError::InvalidKey`] if the category does not exist yet or does
    /// not contain `key`.
    pub fn get<V: SampleValue>(&self, key: &str) -> Result<&V> {
        V::column(self)
            .and_then(|column| column.get(key))
            .ok_or_else(|| SampleError::invalid_key(key, V::CATEGORY))
    }

    /// Stores an integer under `key` in the `int` category.
    pub fn add_int(&mut self, key: impl Into<String>, value: i64) {
        self.add(key, value);
    }

    /// Stores a floating point value under `key`, creating the `double`
    /// category if needed.
    pub fn add_double(&mut self, key: impl Into<String>, value: f64) {
        self.add(key, value);
    }

    /// Stores a string under `key` in the `normal` category.
    pub fn add_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.add(key, value.into());
    }

    /// Stores an ordered list of strings. Order and duplicates are kept.
    pub fn add_string_vector<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.add(key, values);
    }

    /// Stores a set of tags. Duplicates collapse and order is not kept.
    pub fn add_string_tagset<I, S>(&mut self, key: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        self.add(key, tags);
    }

    /// Returns the integer stored under `key`.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get::<i64>(key).copied()
    }

    /// Returns the floating point value stored under `key`.
    pub fn get_double(&self, key: &str) -> Result<f64> {
        self.get::<f64>(key).copied()
    }

    /// Returns the string stored under `key`.
    pub fn get_string(&self, key: &str) -> Result<&str> {
        self.get::<String>(key).map(String::as_str)
    }

    /// Returns the ordered strings stored under `key`.
    pub fn get_string_vector(&self, key: &str) -> Result<&[String]> {
        self.get::<Vec<String>>(key).map(Vec::as_slice)
    }

    /// Returns the tag set stored under `key`.
    pub fn get_string_tagset(&self, key: &str) -> Result<&BTreeSet<String>> {
        self.get::<BTreeSet<String>>(key)
    }

    /// Whether `key` is set in `int`.
    pub fn is_int_set(&self, key: &str) -> bool {
        self.is_set::<i64>(key)
    }

    /// Whether `key` is set in `double`.
    pub fn is_double_set(&self, key: &str) -> bool {
        self.is_set::<f64>(key)
    }

    /// Whether `key` is set in `normal`.
    pub fn is_string_set(&self, key: &str) -> bool {
        self.is_set::<String>(key)
    }

    /// Whether `key` is set in `normvector`.
    pub fn is_string_vector_set(&self, key: &str) -> bool {
        self.is_set::<Vec<String>>(key)
    }

    /// Whether `key` is set in `tagset`.
    pub fn is_string_tagset_set(&self, key: &str) -> bool {
        self.is_set::<BTreeSet<String>>(key)
    }
}

/// Whole seconds between the epoch and `timestamp`, rounded towards negative
/// infinity.
pub(crate) fn epoch_seconds(timestamp: SystemTime) -> i64 {
    match timestamp.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            if before.subsec_nanos() > 0 {
                (-secs).saturating_sub(1)
            } else {
                -secs
            }
        }
    }
}

/// Inverse of [`epoch_seconds`], `None` when the platform cannot represent
/// the instant.
pub(crate) fn timestamp_from_epoch_seconds(secs: i64) -> Option<SystemTime> {
    let offset = Duration::from_secs(secs.unsigned_abs());
    if secs >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}
