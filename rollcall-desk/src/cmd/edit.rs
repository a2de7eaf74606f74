//! Mutating commands: `add`, `present`, `evacuate`, `note`, `clear`

use anyhow::{bail, Result};
use clap::Args;
use rollcall_common::{Partition, PersonId, RosterSession, StatusChange};

use super::{pick, row_of, Selection};
use crate::render;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Partition receiving the placeholder entry
    pub partition: Partition,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Row number as shown by `rollcall list`
    pub row: usize,

    #[command(flatten)]
    pub selection: Selection,
}

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Row number as shown by `rollcall list`
    pub row: usize,

    /// New note text (empty clears it)
    pub text: String,

    #[command(flatten)]
    pub selection: Selection,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Confirm wiping every record and the event log
    #[arg(long)]
    pub yes: bool,
}

fn resolve(session: &RosterSession, selection: &Selection, row: usize) -> Result<PersonId> {
    pick(&selection.listing(session.roster()), row)
}

fn describe(session: &RosterSession, id: PersonId) -> String {
    session
        .roster()
        .get(id)
        .map(|p| format!("{} ({})", p.full_name(), p.group))
        .unwrap_or_default()
}

pub async fn run_add(args: &AddArgs, session: &mut RosterSession) -> Result<()> {
    let id = session.add_entry(args.partition).await?;
    // Row as `rollcall list` shows it with no filters
    let listing = Selection::default().listing(session.roster());
    if let (Some(row), Some(person)) = (row_of(&listing, id), session.roster().get(id)) {
        println!("{}", render::person_line(row, person));
    }
    Ok(())
}

fn report(who: &str, change: StatusChange, partition: Option<Partition>) {
    match partition {
        Some(p) => println!("{} {}", who, change.status_text(p)),
        None => println!("{} {}", who, change.as_str()),
    }
}

pub async fn run_present(args: &ToggleArgs, session: &mut RosterSession) -> Result<()> {
    let id = resolve(session, &args.selection, args.row)?;
    let who = describe(session, id);
    if let Some(change) = session.toggle_presence(id).await? {
        report(&who, change, session.roster().partition_of(id));
    }
    Ok(())
}

pub async fn run_evacuate(args: &ToggleArgs, session: &mut RosterSession) -> Result<()> {
    let id = resolve(session, &args.selection, args.row)?;
    let who = describe(session, id);
    match session.toggle_evacuated(id).await? {
        Some(change) => report(&who, change, session.roster().partition_of(id)),
        None => bail!("{} is not marked present", who),
    }
    Ok(())
}

pub async fn run_note(args: &NoteArgs, session: &mut RosterSession) -> Result<()> {
    let id = resolve(session, &args.selection, args.row)?;
    session.update_note(id, args.text.clone()).await?;
    println!("Note updated for {}", describe(session, id));
    Ok(())
}

pub async fn run_clear(args: &ClearArgs, session: &mut RosterSession) -> Result<()> {
    if !args.yes {
        bail!("Refusing to wipe all data without --yes");
    }
    session.clear_all().await?;
    println!("All records and log entries deleted");
    Ok(())
}
