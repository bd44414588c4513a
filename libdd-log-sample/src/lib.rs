// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! `libdd-log-sample` builds log samples: one timestamped record per logical
//! event, holding named values split by type into a fixed set of categories,
//! and rendered as a JSON document for a downstream logging pipeline.
//!
//! ```
//! use libdd_log_sample::Sample;
//! use std::time::{Duration, UNIX_EPOCH};
//!
//! let mut sample = Sample::with_timestamp(UNIX_EPOCH + Duration::from_secs(1000));
//! sample.add_int("count", 5);
//! sample.add_string_tagset("labels", ["b", "a"]);
//!
//! assert_eq!(
//!     sample.to_json()?,
//!     r#"{"int":{"count":5,"time":1000},"normal":{},"tagset":{"labels":["a","b"]}}"#
//! );
//! assert_eq!(sample.get_int("count")?, 5);
//! # Ok::<(), libdd_log_sample::SampleError>(())
//! ```

mod category;
mod codec;
mod error;
mod sample;
mod value;

pub use category::{Category, UnknownCategory};
pub use error::{Result, SampleError};
pub use sample::{Sample, TIME_KEY};
pub use value::SampleValue;
