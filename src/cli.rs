use clap::Parser;

use std::path::PathBuf;

use crate::{accumulate::OverflowPolicy, pipeline::Config, record::EmptyAmountPolicy};

/// Totals daily sales records per branch and per commodity
#[derive(Parser, Debug)]
#[command(name = "sales-summary", version, long_about = None)]
pub struct Args {
    /// Directory holding branch.lst, commodity.lst and the NNNNNNNN.rcd records
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// When a record's totals count as too large
    #[arg(long, value_enum, default_value_t = OverflowPolicy::LegacyBoth)]
    pub overflow_policy: OverflowPolicy,

    /// How to treat a record with an empty amount line
    #[arg(long, value_enum, default_value_t = EmptyAmountPolicy::Reject)]
    pub empty_amount: EmptyAmountPolicy,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            overflow_policy: self.overflow_policy,
            empty_amount: self.empty_amount,
        }
    }
}
