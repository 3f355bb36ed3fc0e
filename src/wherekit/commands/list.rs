use crate::commands::{CmdResult, Listing, Selection};
use crate::error::Result;
use crate::model::Palette;
use crate::request::FetchRequest;
use crate::store::DataStore;

pub fn run<S: DataStore<Palette>>(
    store: &S,
    selection: &Selection,
    listing: &Listing,
) -> Result<CmdResult> {
    let mut request = FetchRequest::fetch::<Palette>();
    let mut messages = selection.apply(&mut request);
    messages.extend(listing.apply(&mut request));

    let palettes = store.fetch(&request)?;
    Ok(CmdResult::default()
        .with_messages(messages)
        .with_listed_palettes(palettes))
}
