use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Palette;
use crate::store::DataStore;

pub fn run<S: DataStore<Palette>>(store: &mut S) -> Result<CmdResult> {
    let removed = store.clear()?;
    let mut result = CmdResult::default().with_count(removed);
    result.add_message(if removed == 0 {
        CmdMessage::info("Nothing to clear.")
    } else {
        CmdMessage::success(format!("Cleared {} palettes", removed))
    });
    Ok(result)
}
