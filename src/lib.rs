#![doc = include_str!("../README.md")]
pub mod accumulate;
pub mod cli;
pub mod error;
pub mod locator;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod sum;
pub mod table;

pub use accumulate::OverflowPolicy;
pub use error::{Error, Result};
pub use pipeline::{run, Config, Pipeline, Stage, Summary};
pub use record::EmptyAmountPolicy;
pub use report::{read_report, ReportRow};
pub use sum::Sum;
pub use table::{Entry, ReferenceTable, TableKind};
