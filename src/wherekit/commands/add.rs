use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, WherekitError};
use crate::model::Palette;
use crate::store::DataStore;
use rand::Rng;

/// Add `count` randomly generated palettes.
pub fn random<S: DataStore<Palette>, R: Rng>(
    store: &mut S,
    count: usize,
    rng: &mut R,
) -> Result<CmdResult> {
    let mut added = Vec::with_capacity(count);
    for _ in 0..count {
        let palette = Palette::random(rng);
        store.insert(palette.clone())?;
        added.push(palette);
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(match count {
        1 => "Added 1 palette".to_string(),
        n => format!("Added {} palettes", n),
    }));
    Ok(result.with_affected_palettes(added))
}

/// Add a single palette with explicit components.
pub fn one<S: DataStore<Palette>>(
    store: &mut S,
    name: &str,
    hue: i64,
    saturation: f64,
    brightness: f64,
) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WherekitError::Api("Color name cannot be empty".into()));
    }

    let palette = Palette::new(name, hue, saturation, brightness);
    store.insert(palette.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added {} (hue {})",
        palette.color_name, palette.hue
    )));
    Ok(result.with_affected_palettes(vec![palette]))
}
