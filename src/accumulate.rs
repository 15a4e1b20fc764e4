use clap::ValueEnum;
use tracing::debug;

use crate::{
    error::{Error, Result},
    record::Transaction,
    sum::Sum,
    table::ReferenceTable,
};

/// Decides when a record pushes totals past [`Sum::LIMIT`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OverflowPolicy {
    /// Abort only when the branch total and the commodity total both reach
    /// the limit. This is how existing installations behave: a record that
    /// overflows just one side is accepted and the oversized total is
    /// reported as-is.
    #[default]
    LegacyBoth,
    /// Abort as soon as either total reaches the limit.
    StrictEither,
}

impl OverflowPolicy {
    #[must_use]
    pub fn exceeded(self, branch: Sum, commodity: Sum) -> bool {
        match self {
            OverflowPolicy::LegacyBoth => branch.exceeds_limit() && commodity.exceeds_limit(),
            OverflowPolicy::StrictEither => branch.exceeds_limit() || commodity.exceeds_limit(),
        }
    }
}

/// Adds the amount of `tx` to its branch and commodity totals.
///
/// Either both totals are updated or neither is.
///
/// # Errors
///
/// Returns errors if:
/// * The new totals are over the limit under `policy`
///   ([`Error::AmountExceedsLimit`])
/// * `tx` names a code missing from its table ([`Error::UnknownBranchCode`],
///   [`Error::UnknownCommodityCode`]); records from
///   [`crate::record::validate`] never do
pub fn accumulate(
    branches: &mut ReferenceTable,
    commodities: &mut ReferenceTable,
    tx: &Transaction,
    policy: OverflowPolicy,
) -> Result<()> {
    let branch_total = branches
        .sum(&tx.branch)
        .ok_or_else(|| Error::UnknownBranchCode {
            file: tx.file.clone(),
        })?
        + tx.amount;
    let commodity_total = commodities
        .sum(&tx.commodity)
        .ok_or_else(|| Error::UnknownCommodityCode {
            file: tx.file.clone(),
        })?
        + tx.amount;
    if policy.exceeded(branch_total, commodity_total) {
        return Err(Error::AmountExceedsLimit {
            file: tx.file.clone(),
        });
    }
    branches.set_sum(&tx.branch, branch_total);
    commodities.set_sum(&tx.commodity, commodity_total);
    debug!(
        file = %tx.file,
        branch = %tx.branch,
        commodity = %tx.commodity,
        amount = %tx.amount,
        %branch_total,
        %commodity_total,
        "record added"
    );
    Ok(())
}
