use crate::commands::{CmdResult, Listing, Selection};
use crate::error::Result;
use crate::model::Palette;
use crate::request::FetchRequest;

/// Build the fetch request `list` would run, compile its predicate, and return
/// it without touching the store.
pub fn run(selection: &Selection, listing: &Listing) -> Result<CmdResult> {
    let mut request = FetchRequest::fetch::<Palette>();
    let mut messages = selection.apply(&mut request);
    messages.extend(listing.apply(&mut request));

    if let Some(predicate) = request.predicate() {
        predicate.compile()?;
    }
    Ok(CmdResult::default()
        .with_messages(messages)
        .with_request(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clauses::Where;
    use crate::commands::Preset;
    use crate::error::WherekitError;
    use crate::value::Value;

    #[test]
    fn returns_built_request() {
        let result = run(&Selection::preset(Preset::Muted), &Listing::default()).unwrap();
        let request = result.request.unwrap();
        assert_eq!(
            request.predicate().map(ToString::to_string).as_deref(),
            Some("saturation < 0.3")
        );
    }

    #[test]
    fn surfaces_format_errors() {
        let selection = Selection::clause(Where::format("hue == %d", vec![Value::from("red")]));
        assert!(matches!(
            run(&selection, &Listing::default()),
            Err(WherekitError::Format(_))
        ));
    }
}
