// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// The value partitions of a [`crate::Sample`]. Each category holds values of
/// exactly one type and is identified in the serialized document by its wire
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// 64-bit signed integers, wire name `int`.
    Int,
    /// Floating point values, wire name `double`.
    Double,
    /// Strings, wire name `normal`.
    Normal,
    /// Ordered string sequences, wire name `normvector`.
    NormVector,
    /// Sets of unique strings, wire name `tagset`.
    TagSet,
}

impl Category {
    /// Every category, in the order they appear in a serialized sample.
    pub const ALL: [Category; 5] = [
        Category::Int,
        Category::Double,
        Category::Normal,
        Category::NormVector,
        Category::TagSet,
    ];

    /// The name of the category in the serialized document.
    ///
    /// Downstream consumers key on these strings, they must never change.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Category::Int => "int",
            Category::Double => "double",
            Category::Normal => "normal",
            Category::NormVector => "normvector",
            Category::TagSet => "tagset",
        }
    }

    /// Lazy categories are absent from a sample until a value is added to
    /// them. `int` and `normal` always exist.
    pub const fn is_lazy(self) -> bool {
        matches!(
            self,
            Category::Double | Category::NormVector | Category::TagSet
        )
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Returned when parsing a string that is not a category wire name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.wire_name() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
