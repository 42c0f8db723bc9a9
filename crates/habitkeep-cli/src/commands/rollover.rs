use habitkeep_core::{rollover_all, SqliteStore};

use super::{print_json, CmdResult, Context};

pub fn run(ctx: &Context) -> CmdResult {
    let mut store = SqliteStore::open()?;
    let report = rollover_all(&mut store, ctx.today)?;

    if ctx.json {
        return print_json(&report);
    }
    println!(
        "Rolled over to {}: {} checked, {} updated",
        ctx.today, report.checked, report.updated
    );
    for id in &report.failed {
        println!("  failed to save {id}");
    }
    Ok(())
}
