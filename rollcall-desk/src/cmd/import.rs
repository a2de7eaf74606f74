//! `rollcall import` - load a CSV or spreadsheet into a partition

use anyhow::{bail, Result};
use clap::Args;
use rollcall_common::{ImportMode, Partition, RosterSession};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Target partition (guest or team)
    pub partition: Partition,

    /// .csv, .xls, .xlsx, .xlsm, .xlsb or .ods file; the first row is a header
    pub file: PathBuf,

    /// Add to the partition instead of replacing it
    #[arg(long)]
    pub append: bool,
}

impl ImportArgs {
    fn mode(&self) -> ImportMode {
        if self.append {
            ImportMode::Append
        } else {
            ImportMode::Replace
        }
    }
}

pub async fn run_import(args: &ImportArgs, session: &mut RosterSession) -> Result<()> {
    let result = session
        .import_file(args.partition, &args.file, args.mode())
        .await?;

    if let Some(problem) = result.problem {
        bail!("Nothing imported: {}", problem);
    }

    println!(
        "Imported {} {} ({} rows skipped)",
        result.summary.loaded,
        args.partition.label().to_lowercase(),
        result.summary.skipped
    );
    Ok(())
}
