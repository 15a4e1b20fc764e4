use clap::ValueEnum;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::{
    error::{Error, Result},
    sum::Sum,
    table::ReferenceTable,
};

/// What to do with a record whose amount line is empty.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum EmptyAmountPolicy {
    /// Treat it like any other malformed amount.
    #[default]
    Reject,
    /// Count it as an amount of zero.
    Zero,
}

/// A validated sales record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub file: String,
    pub branch: String,
    pub commodity: String,
    pub amount: Sum,
}

/// Reads every line of the record file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file can't be opened or read, or isn't UTF-8.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path).map_err(|e| Error::io(path, e))?);
    file.lines()
        .collect::<std::io::Result<_>>()
        .map_err(|e| Error::io(path, e))
}

/// Checks the lines of the record file `file` against the definitions and
/// returns the parsed record.
///
/// A record has exactly three lines: a branch code, a commodity code, and an
/// amount made only of ASCII digits.
///
/// # Errors
///
/// Returns, in order of checking:
/// * [`Error::InvalidRecordFormat`] if there aren't exactly three lines
/// * [`Error::UnknownBranchCode`] if the branch isn't in `branches`
/// * [`Error::UnknownCommodityCode`] if the commodity isn't in `commodities`
/// * [`Error::InvalidAmount`] if the amount isn't a whole number that fits in
///   a `u64` (or is empty, under [`EmptyAmountPolicy::Reject`])
pub fn validate(
    file: &str,
    lines: &[String],
    branches: &ReferenceTable,
    commodities: &ReferenceTable,
    empty_amount: EmptyAmountPolicy,
) -> Result<Transaction> {
    let [branch, commodity, amount] = lines else {
        return Err(Error::InvalidRecordFormat { file: file.into() });
    };
    if !branches.contains(branch) {
        return Err(Error::UnknownBranchCode { file: file.into() });
    }
    if !commodities.contains(commodity) {
        return Err(Error::UnknownCommodityCode { file: file.into() });
    }
    let amount = match (amount.as_str(), empty_amount) {
        ("", EmptyAmountPolicy::Zero) => Sum::default(),
        (s, _) => Sum::from_str(s).map_err(|_| Error::InvalidAmount { file: file.into() })?,
    };
    Ok(Transaction {
        file: file.into(),
        branch: branch.clone(),
        commodity: commodity.clone(),
        amount,
    })
}
