use tracing::{debug, warn};

use std::path::{Path, PathBuf};

use crate::{
    accumulate::{accumulate, OverflowPolicy},
    error::Result,
    locator::locate,
    record::{read_lines, validate, EmptyAmountPolicy},
    report::write_report,
    table::{ReferenceTable, TableKind},
};

/// Settings that change how records are judged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub overflow_policy: OverflowPolicy,
    pub empty_amount: EmptyAmountPolicy,
}

/// How far a [`Pipeline`] has got.
///
/// Within a run, stages only move forward. [`Stage::Aborted`] can follow any
/// stage and ends the run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Init,
    BranchLoaded,
    CommodityLoaded,
    FilesDiscovered,
    /// Working on the record file at this position in sequence order.
    Processing(usize),
    Done,
    Aborted,
}

/// The outcome of a successful run.
#[derive(Debug)]
pub struct Summary {
    pub branches: ReferenceTable,
    pub commodities: ReferenceTable,
    pub files_processed: usize,
    /// Report paths, branch first.
    pub reports: Vec<PathBuf>,
}

/// Totals one directory of sales records.
#[derive(Debug)]
pub struct Pipeline {
    dir: PathBuf,
    config: Config,
    stage: Stage,
}

impl Pipeline {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            dir: dir.into(),
            config,
            stage: Stage::Init,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Loads the definitions, totals every record file, and writes both
    /// reports.
    ///
    /// Stops at the first problem. Reports are only written once every record
    /// has been accepted; if the commodity report then fails, the branch
    /// report stays written.
    ///
    /// # Errors
    ///
    /// Returns the first error met; see [`crate::Error`]. The pipeline is then
    /// [`Stage::Aborted`].
    pub fn run(&mut self) -> Result<Summary> {
        self.stage = Stage::Init;
        self.execute().inspect_err(|err| {
            warn!(stage = ?self.stage, error = ?err, "run aborted");
            self.stage = Stage::Aborted;
        })
    }

    fn execute(&mut self) -> Result<Summary> {
        let mut branches = ReferenceTable::load(&self.dir, TableKind::Branch)?;
        self.advance(Stage::BranchLoaded);
        let mut commodities = ReferenceTable::load(&self.dir, TableKind::Commodity)?;
        self.advance(Stage::CommodityLoaded);

        let files = locate(&self.dir)?;
        self.advance(Stage::FilesDiscovered);

        for (i, file) in files.iter().enumerate() {
            self.advance(Stage::Processing(i));
            let lines = read_lines(&file.path)?;
            let tx = validate(
                &file.name,
                &lines,
                &branches,
                &commodities,
                self.config.empty_amount,
            )?;
            accumulate(
                &mut branches,
                &mut commodities,
                &tx,
                self.config.overflow_policy,
            )?;
        }
        self.advance(Stage::Done);

        let reports = vec![
            write_report(&self.dir, &branches)?,
            write_report(&self.dir, &commodities)?,
        ];
        Ok(Summary {
            branches,
            commodities,
            files_processed: files.len(),
            reports,
        })
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "stage");
        self.stage = next;
    }
}

/// Runs a [`Pipeline`] over `dir`.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn run(dir: impl AsRef<Path>, config: &Config) -> Result<Summary> {
    Pipeline::new(dir.as_ref(), *config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, sum::Sum};

    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for entry in fs::read_dir("testdata/valid").unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
        }
        dir
    }

    #[test]
    fn run_fn_totals_fixture_directory() {
        let dir = fixture();
        let mut pipeline = Pipeline::new(dir.path(), Config::default());
        let summary = pipeline.run().unwrap();
        assert_eq!(pipeline.stage(), Stage::Done);
        assert_eq!(summary.files_processed, 3);
        assert_eq!(summary.branches.sum("001"), Some(Sum::new(15_000)));
        assert_eq!(summary.branches.sum("003"), Some(Sum::new(2_500)));
        assert_eq!(summary.branches.sum("005"), Some(Sum::new(0)));
        assert_eq!(summary.commodities.sum("SFT00001"), Some(Sum::new(12_500)));
        assert_eq!(summary.commodities.sum("SFT00002"), Some(Sum::new(5_000)));
        assert_eq!(
            summary.reports,
            vec![dir.path().join("branch.out"), dir.path().join("commodity.out")]
        );
    }

    #[test]
    fn run_fn_aborts_on_missing_branch_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::new(dir.path(), Config::default());
        let err = pipeline.run().unwrap_err();
        assert!(matches!(err, Error::FileNotFound { kind: TableKind::Branch }));
        assert_eq!(pipeline.stage(), Stage::Aborted);
    }

    #[test]
    fn run_fn_loads_branches_before_commodities() {
        let dir = fixture();
        fs::remove_file(dir.path().join("commodity.lst")).unwrap();
        fs::write(dir.path().join("branch.lst"), "1,Tokyo\n").unwrap();
        let err = run(dir.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { kind: TableKind::Branch, .. }));
    }

    #[test]
    fn run_fn_stops_at_first_bad_record() {
        let dir = fixture();
        fs::write(dir.path().join("00000002.rcd"), "001\nSFT00001\n").unwrap();
        fs::write(dir.path().join("00000003.rcd"), "999\nSFT00001\n1\n").unwrap();
        let err = run(dir.path(), &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "00000002.rcd has an invalid format");
        assert!(!dir.path().join("branch.out").exists());
        assert!(!dir.path().join("commodity.out").exists());
    }

    #[test]
    fn run_fn_applies_configured_overflow_policy() {
        let dir = fixture();
        fs::write(dir.path().join("00000003.rcd"), "005\nSFT00003\n9999999999\n").unwrap();
        fs::write(dir.path().join("00000004.rcd"), "005\nSFT00002\n1\n").unwrap();

        let summary = run(dir.path(), &Config::default()).unwrap();
        assert_eq!(summary.branches.sum("005"), Some(Sum::new(10_000_000_000)));

        fs::remove_file(dir.path().join("branch.out")).unwrap();
        let strict = Config {
            overflow_policy: OverflowPolicy::StrictEither,
            ..Config::default()
        };
        let err = run(dir.path(), &strict).unwrap_err();
        assert!(matches!(err, Error::AmountExceedsLimit { file } if file == "00000004.rcd"));
        assert!(!dir.path().join("branch.out").exists());
    }
}
