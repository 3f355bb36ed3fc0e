use crate::commands::{CmdResult, Selection};
use crate::error::Result;
use crate::model::Palette;
use crate::request::FetchRequest;
use crate::store::DataStore;

pub fn run<S: DataStore<Palette>>(store: &S, selection: &Selection) -> Result<CmdResult> {
    let mut request = FetchRequest::query::<Palette>();
    let messages = selection.apply(&mut request);
    let count = store.count(&request)?;
    Ok(CmdResult::default().with_messages(messages).with_count(count))
}
