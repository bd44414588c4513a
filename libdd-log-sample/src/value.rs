// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Category, Sample};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use tracing::debug;

mod private {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
    impl Sealed for Vec<String> {}
    impl Sealed for std::collections::BTreeSet<String> {}
}

/// A type that can be stored in a [`Sample`]. Each implementor is bound to
/// exactly one [`Category`], which is what lets `add` and `get` agree on
/// where a value lives without any runtime type tags.
///
/// This trait is sealed; the five implementors are the value types of the
/// five categories.
pub trait SampleValue: private::Sealed + Serialize + DeserializeOwned + Clone + Debug {
    /// The category values of this type are stored under.
    const CATEGORY: Category;

    /// Returns the column for this type, if it exists.
    #[doc(hidden)]
    fn column(sample: &Sample) -> Option<&BTreeMap<String, Self>>;

    /// Returns the column for this type, creating it first if it is lazy and
    /// has not been created yet.
    #[doc(hidden)]
    fn column_mut(sample: &mut Sample) -> &mut BTreeMap<String, Self>;
}

fn materialize<V>(
    slot: &mut Option<BTreeMap<String, V>>,
    category: Category,
) -> &mut BTreeMap<String, V> {
    slot.get_or_insert_with(|| {
        debug!(sample.category = %category, "Creating lazy sample category");
        BTreeMap::new()
    })
}

impl SampleValue for i64 {
    const CATEGORY: Category = Category::Int;

    fn column(sample: &Sample) -> Option<&BTreeMap<String, Self>> {
        Some(&sample.ints)
    }

    fn column_mut(sample: &mut Sample) -> &mut BTreeMap<String, Self> {
        &mut sample.ints
    }
}

impl SampleValue for f64 {
    const CATEGORY: Category = Category::Double;

    fn column(sample: &Sample) -> Option<&BTreeMap<String, Self>> {
        sample.doubles.as_ref()
    }

    fn column_mut(sample: &mut Sample) -> &mut BTreeMap<String, Self> {
        materialize(&mut sample.doubles, Self::CATEGORY)
    }
}

impl SampleValue for String {
    const CATEGORY: Category = Category::Normal;

    fn column(sample: &Sample) -> Option<&BTreeMap<String, Self>> {
        Some(&sample.normals)
    }

    fn column_mut(sample: &mut Sample) -> &mut BTreeMap<String, Self> {
        &mut sample.normals
    }
}

impl SampleValue for Vec<String> {
    const CATEGORY: Category = Category::NormVector;

    fn column(sample: &Sample) -> Option<&BTreeMap<String, Self>> {
        sample.norm_vectors.as_ref()
    }

    fn column_mut(sample: &mut Sample) -> &mut BTreeMap<String, Self> {
        materialize(&mut sample.norm_vectors, Self::CATEGORY)
    }
}

impl SampleValue for BTreeSet<String> {
    const CATEGORY: Category = Category::TagSet;

    fn column(sample: &Sample) -> Option<&BTreeMap<String, Self>> {
        sample.tag_sets.as_ref()
    }

    fn column_mut(sample: &mut Sample) -> &mut BTreeMap<String, Self> {
        materialize(&mut sample.tag_sets, Self::CATEGORY)
    }
}
