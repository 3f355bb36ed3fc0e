use crate::commands::{CmdMessage, CmdResult, Selection};
use crate::error::{Result, WherekitError};
use crate::model::Palette;
use crate::request::FetchRequest;
use crate::store::DataStore;

/// Delete the selected palettes. An empty selection is refused; use `clear`.
pub fn run<S: DataStore<Palette>>(store: &mut S, selection: &Selection) -> Result<CmdResult> {
    if selection.is_empty() {
        return Err(WherekitError::Api(
            "Refusing to delete without a filter (use clear to remove everything)".into(),
        ));
    }

    let mut request = FetchRequest::delete::<Palette>();
    let messages = selection.apply(&mut request);
    let removed = store.delete(&request)?;

    let mut result = CmdResult::default().with_messages(messages);
    if removed.is_empty() {
        result.add_message(CmdMessage::info("No palettes matched."));
    }
    for palette in &removed {
        result.add_message(CmdMessage::success(format!(
            "Palette deleted: {}",
            palette.color_name
        )));
    }
    Ok(result.with_affected_palettes(removed))
}
