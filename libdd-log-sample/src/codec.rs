// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! JSON encoding of a [`Sample`].
//!
//! The document is an object keyed by category wire name, each holding an
//! object of key to value:
//!
//! ```json
//! {"int":{"count":5,"time":1000},"normal":{},"tagset":{"labels":["a","b"]}}
//! ```
//!
//! Categories are written in [`Category::ALL`] order and keys in byte order,
//! so equal samples always encode to identical text.

use crate::sample::timestamp_from_epoch_seconds;
use crate::{Category, Result, Sample, SampleError, SampleValue, UnknownCategory, TIME_KEY};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io;
use std::time::UNIX_EPOCH;
use tracing::debug;

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories().count()))?;
        map.serialize_entry(&Category::Int, &self.ints)?;
        if let Some(doubles) = &self.doubles {
            if let Some((key, value)) = non_finite_double(doubles) {
                return Err(serde::ser::Error::custom(format!(
                    "double {key} is {value}, which has no JSON representation"
                )));
            }
            map.serialize_entry(&Category::Double, doubles)?;
        }
        map.serialize_entry(&Category::Normal, &self.normals)?;
        if let Some(norm_vectors) = &self.norm_vectors {
            map.serialize_entry(&Category::NormVector, norm_vectors)?;
        }
        if let Some(tag_sets) = &self.tag_sets {
            map.serialize_entry(&Category::TagSet, tag_sets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Sample {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Value::deserialize(deserializer)?;
        Sample::from_value(document).map_err(D::Error::custom)
    }
}

impl Sample {
    /// Renders the sample as a single line of JSON.
    ///
    /// Encoding has no side effects: calling this repeatedly without
    /// modifying the sample returns the same text.
    ///
    /// # Errors
    /// [`SampleError::InvalidValue`] if a `double` is NaN or infinite.
    pub fn to_json(&self) -> Result<String> {
        self.check_encodable()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Writes the same bytes as [`Sample::to_json`] into `writer`. Nothing is
    /// written when a `double` is NaN or infinite.
    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<()> {
        self.check_encodable()?;
        serde_json::to_writer(writer, self).map_err(|err| {
            if err.is_io() {
                SampleError::Io(err.into())
            } else {
                SampleError::Json(err)
            }
        })
    }

    fn check_encodable(&self) -> Result<()> {
        match self.doubles.as_ref().and_then(non_finite_double) {
            Some((key, value)) => Err(SampleError::InvalidValue {
                key: key.to_owned(),
                category: Category::Double,
                reason: format!("{value} has no JSON representation"),
            }),
            None => Ok(()),
        }
    }

    /// Parses a document produced by [`Sample::to_json`].
    ///
    /// The sample timestamp is restored from `int["time"]`, which must be
    /// present. The document only carries whole seconds, so the restored
    /// timestamp has no sub-second part, and it follows `int["time"]` even if
    /// that entry was overwritten after construction. A missing `normal`
    /// category is treated as empty.
    ///
    /// # Errors
    /// - [`SampleError::Json`] if `json` is not valid JSON.
    /// - [`SampleError::MalformedDocument`] if the document is not an object
    ///   of objects keyed by category wire names.
    /// - [`SampleError::InvalidValue`] if a value does not fit its category.
    /// - [`SampleError::InvalidKey`] if `int["time"]` is missing.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    fn from_value(document: Value) -> Result<Self> {
        let Value::Object(document) = document else {
            return Err(SampleError::MalformedDocument(format!(
                "expected an object, found {}",
                kind(&document)
            )));
        };

        let mut sample = Sample::empty(UNIX_EPOCH);
        for (name, entries) in document {
            let category: Category = name.parse().map_err(|err: UnknownCategory| {
                SampleError::MalformedDocument(err.to_string())
            })?;
            let Value::Object(entries) = entries else {
                return Err(SampleError::MalformedDocument(format!(
                    "category {category} must be an object, found {}",
                    kind(&entries)
                )));
            };
            match category {
                Category::Int => sample.ints = decode_column(entries)?,
                Category::Double => sample.doubles = Some(decode_column(entries)?),
                Category::Normal => sample.normals = decode_column(entries)?,
                Category::NormVector => sample.norm_vectors = Some(decode_column(entries)?),
                Category::TagSet => sample.tag_sets = Some(decode_column(entries)?),
            }
        }

        let time = sample.get_int(TIME_KEY)?;
        sample.timestamp =
            timestamp_from_epoch_seconds(time).ok_or_else(|| SampleError::InvalidValue {
                key: TIME_KEY.to_owned(),
                category: Category::Int,
                reason: format!("timestamp {time} is out of range"),
            })?;

        debug!(
            sample.time = time,
            sample.categories = sample.categories().count(),
            "Decoded log sample"
        );
        Ok(sample)
    }
}

fn decode_column<V: SampleValue>(entries: Map<String, Value>) -> Result<BTreeMap<String, V>> {
    entries
        .into_iter()
        .map(|(key, value)| match serde_json::from_value::<V>(value) {
            Ok(value) => Ok((key, value)),
            Err(err) => Err(SampleError::InvalidValue {
                key,
                category: V::CATEGORY,
                reason: err.to_string(),
            }),
        })
        .collect()
}

fn non_finite_double(doubles: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    doubles
        .iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(key, value)| (key.as_str(), *value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn fresh_sample_encodes_eager_categories_only() {
        let sample = Sample::with_timestamp(at(1000));
        assert_eq!(sample.to_json().unwrap(), r#"{"int":{"time":1000},"normal":{}}"#);
    }

    #[test]
    fn double_category_appears_after_first_add() {
        let mut sample = Sample::with_timestamp(at(1));
        assert!(!sample.to_json().unwrap().contains("\"double\""));
        sample.add_double("load", 1.5);
        assert_eq!(
            sample.to_json().unwrap(),
            r#"{"int":{"time":1},"double":{"load":1.5},"normal":{}}"#
        );
    }

    #[test]
    fn all_categories_in_wire_order() {
        let mut sample = Sample::with_timestamp(at(7));
        sample.add_string_tagset("tags", ["z", "a"]);
        sample.add_string_vector("hops", ["b", "a"]);
        sample.add_string("zone", "eu");
        sample.add_double("ratio", 0.5);
        sample.add_int("bytes", 12);
        assert_eq!(
            sample.to_json().unwrap(),
            concat!(
                r#"{"int":{"bytes":12,"time":7},"double":{"ratio":0.5},"#,
                r#""normal":{"zone":"eu"},"normvector":{"hops":["b","a"]},"#,
                r#""tagset":{"tags":["a","z"]}}"#
            )
        );
    }

    #[test]
    fn encoding_ignores_insertion_order() {
        let mut first = Sample::with_timestamp(at(3));
        first.add_int("a", 1);
        first.add_int("b", 2);
        let mut second = Sample::with_timestamp(at(3));
        second.add_int("b", 2);
        second.add_int("a", 1);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn strings_are_escaped() {
        let mut sample = Sample::with_timestamp(at(0));
        sample.add_string("quote\"key", "line\nbreak");
        assert_eq!(
            sample.to_json().unwrap(),
            r#"{"int":{"time":0},"normal":{"quote\"key":"line\nbreak"}}"#
        );
    }

    #[test]
    fn non_finite_doubles_are_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut sample = Sample::with_timestamp(at(0));
            sample.add_double("ok", 1.0);
            sample.add_double("ratio", value);

            match sample.to_json().unwrap_err() {
                SampleError::InvalidValue { key, category, .. } => {
                    assert_eq!(key, "ratio");
                    assert_eq!(category, Category::Double);
                }
                other => panic!("unexpected error: {other}"),
            }

            let mut buf = Vec::new();
            let err = sample.write_json(&mut buf).unwrap_err();
            assert!(matches!(err, SampleError::InvalidValue { .. }), "{err}");
            assert!(buf.is_empty());

            serde_json::to_string(&sample).unwrap_err();
        }
    }

    #[test]
    fn finite_doubles_still_encode_after_rejection() {
        let mut sample = Sample::with_timestamp(at(0));
        sample.add_double("ratio", f64::NAN);
        sample.to_json().unwrap_err();
        sample.add_double("ratio", 0.5);
        let decoded = Sample::from_json(&sample.to_json().unwrap()).unwrap();
        assert_eq!(decoded.get_double("ratio").unwrap(), 0.5);
    }

    #[test]
    fn write_json_matches_to_json() {
        let mut sample = Sample::with_timestamp(at(5));
        sample.add_string_vector("v", ["x"]);
        let mut buf = Vec::new();
        sample.write_json(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), sample.to_json().unwrap());
    }

    #[test]
    fn write_json_reports_io_errors() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = Sample::with_timestamp(at(0)).write_json(Broken).unwrap_err();
        assert!(matches!(err, SampleError::Io(_)), "{err}");
    }

    #[test]
    fn decode_restores_everything() {
        let mut sample = Sample::with_timestamp(at(1_700_000_000));
        sample.add_int("count", 5);
        sample.add_double("ratio", 0.125);
        sample.add_string("host", "web-3");
        sample.add_string_vector("path", ["/", "/api"]);
        sample.add_string_tagset("labels", ["b", "a"]);

        let decoded = Sample::from_json(&sample.to_json().unwrap()).unwrap();
        assert_eq!(decoded, sample);
        assert_eq!(decoded.timestamp(), at(1_700_000_000));
    }

    #[test]
    fn decode_keeps_empty_lazy_categories() {
        let decoded = Sample::from_json(r#"{"int":{"time":2},"double":{}}"#).unwrap();
        assert!(decoded.has_category(Category::Double));
        assert!(decoded.has_category(Category::Normal));
        assert_eq!(
            decoded.to_json().unwrap(),
            r#"{"int":{"time":2},"double":{},"normal":{}}"#
        );
    }

    #[test]
    fn decode_accepts_integers_as_doubles() {
        let decoded = Sample::from_json(r#"{"int":{"time":0},"double":{"d":3}}"#).unwrap();
        assert_eq!(decoded.get_double("d").unwrap(), 3.0);
    }

    #[test]
    fn decode_restores_whole_seconds_only() {
        let mut sample = Sample::with_timestamp(at(12) + Duration::from_millis(250));
        let decoded = Sample::from_json(&sample.to_json().unwrap()).unwrap();
        assert_eq!(decoded.timestamp(), at(12));
        assert_ne!(decoded, sample);
        assert_eq!(decoded.to_json().unwrap(), sample.to_json().unwrap());

        sample.add_int(TIME_KEY, 30);
        let decoded = Sample::from_json(&sample.to_json().unwrap()).unwrap();
        assert_eq!(decoded.timestamp(), at(30));
    }

    #[test]
    fn decode_negative_time() {
        let decoded = Sample::from_json(r#"{"int":{"time":-5}}"#).unwrap();
        assert_eq!(decoded.timestamp(), UNIX_EPOCH - Duration::from_secs(5));
    }

    #[test]
    fn decode_requires_time() {
        let err = Sample::from_json(r#"{"int":{"count":1},"normal":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            SampleError::InvalidKey { ref key, category: Category::Int } if key == TIME_KEY
        ));
    }

    #[test]
    fn decode_rejects_unknown_category() {
        let err = Sample::from_json(r#"{"int":{"time":0},"bool":{}}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed sample document: unknown category: bool"
        );
    }

    #[test]
    fn decode_rejects_non_object_shapes() {
        let err = Sample::from_json("[1, 2]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed sample document: expected an object, found an array"
        );

        let err = Sample::from_json(r#"{"int":{"time":0},"normal":"x"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed sample document: category normal must be an object, found a string"
        );
    }

    #[test]
    fn decode_reports_conversion_failures() {
        let err = Sample::from_json(r#"{"int":{"time":0,"count":"five"}}"#).unwrap_err();
        match err {
            SampleError::InvalidValue { key, category, .. } => {
                assert_eq!(key, "count");
                assert_eq!(category, Category::Int);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Sample::from_json(r#"{"int":{"time":0},"tagset":{"t":[1]}}"#).unwrap_err();
        assert!(matches!(
            err,
            SampleError::InvalidValue { category: Category::TagSet, .. }
        ));

        let err = Sample::from_json(r#"{"int":{"time":0.5}}"#).unwrap_err();
        assert!(matches!(
            err,
            SampleError::InvalidValue { category: Category::Int, .. }
        ));
    }

    #[test]
    fn decode_reports_syntax_errors() {
        let err = Sample::from_json("{\"int\":").unwrap_err();
        assert!(matches!(err, SampleError::Json(_)));
    }

    #[test]
    fn serde_deserialize_matches_from_json() {
        let json = r#"{"int":{"time":9},"normal":{"k":"v"}}"#;
        let via_serde: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(via_serde, Sample::from_json(json).unwrap());
        serde_json::from_str::<Sample>(r#"{"normal":{}}"#).unwrap_err();
    }

    #[test]
    fn embeds_in_larger_payloads() {
        #[derive(Serialize)]
        struct Envelope<'a> {
            table: &'a str,
            sample: &'a Sample,
        }

        let sample = Sample::with_timestamp(at(4));
        let envelope = Envelope {
            table: "perfpipe_events",
            sample: &sample,
        };
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"table":"perfpipe_events","sample":{"int":{"time":4},"normal":{}}}"#
        );
    }
}
