// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Side-by-side comparison of AArch64 system register values.
//!
//! Register dumps taken in different environments (board, OS, hypervisor,
//! CPU model, boot stage) are loaded from a [`catalogue`] as a flat list of
//! [`Observation`]s and pivoted by [`RegisterReportBuilder`] into one markdown
//! table per register: fields down, environments across.
//!
//! ```
//! use regreport::{Fields, Observation, RegisterReportBuilder};
//!
//! let fields: Fields = [("m", "0")].into_iter().collect();
//! let report = RegisterReportBuilder::new()
//!     .build(&[Observation::new("E1", "X", fields)])
//!     .unwrap();
//! assert!(report.to_string().contains("| `m` | 0 |"));
//! ```

pub mod catalogue;
pub mod error;
pub mod group;
pub mod observation;
pub mod report;

pub use error::{Error, Result};
pub use observation::{Fields, Observation};
pub use report::{ColumnPolicy, RegisterReportBuilder, RegisterSection, Report, Row};
