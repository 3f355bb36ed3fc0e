//! How commands pick and order palettes.
//!
//! A [`Selection`] turns the demo's filter presets and ad-hoc clauses into the
//! predicate of a request. A [`Listing`] adds ordering and paging.

use crate::clauses::{OrderBy, Tweak, Where};
use crate::commands::CmdMessage;
use crate::error::{Result, WherekitError};
use crate::key_path::KeyPath;
use crate::model::keys;
use crate::request::FetchRequest;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Canned filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    All,
    /// Reds, oranges and yellows: hue below 60 or from 300 up.
    Warm,
    /// Cyans through blues: hue 180 to 270.
    Cool,
    Bright,
    Muted,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::All,
        Preset::Warm,
        Preset::Cool,
        Preset::Bright,
        Preset::Muted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::All => "all",
            Preset::Warm => "warm",
            Preset::Cool => "cool",
            Preset::Bright => "bright",
            Preset::Muted => "muted",
        }
    }

    pub fn clause(self) -> Where {
        let hue = Value::from(keys::HUE.as_str());
        match self {
            Preset::All => Where::all(),
            Preset::Warm => Where::format(
                "%K < %d OR %K >= %d",
                vec![hue.clone(), Value::Int(60), hue, Value::Int(300)],
            ),
            Preset::Cool => Where::format(
                "%K BETWEEN {%d, %d}",
                vec![hue, Value::Int(180), Value::Int(270)],
            ),
            Preset::Bright => Where::format("brightness >= %f", vec![Value::Float(0.7)])
                .and(Where::format("saturation >= %f", vec![Value::Float(0.5)])),
            Preset::Muted => Where::format("saturation < %f", vec![Value::Float(0.3)]),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = WherekitError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WherekitError::Api(format!("Unknown filter preset: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Hue,
    Saturation,
    Brightness,
    Date,
}

impl SortField {
    pub fn name(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Hue => "hue",
            SortField::Saturation => "saturation",
            SortField::Brightness => "brightness",
            SortField::Date => "date",
        }
    }

    pub fn key_path(self) -> KeyPath {
        match self {
            SortField::Name => keys::COLOR_NAME,
            SortField::Hue => keys::HUE,
            SortField::Saturation => keys::SATURATION,
            SortField::Brightness => keys::BRIGHTNESS,
            SortField::Date => keys::DATE_ADDED,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortField {
    type Err = WherekitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "color_name" => Ok(SortField::Name),
            "hue" => Ok(SortField::Hue),
            "saturation" => Ok(SortField::Saturation),
            "brightness" => Ok(SortField::Brightness),
            "date" | "date_added" => Ok(SortField::Date),
            _ => Err(WherekitError::Api(format!("Unknown sort field: {}", s))),
        }
    }
}

/// Which palettes a command acts on.
///
/// A preset and a clause are combined with AND, unless `replace` is set: then
/// the clause is applied over the preset and the overwrite is reported.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub preset: Option<Preset>,
    pub clause: Option<Where>,
    pub replace: bool,
}

impl Selection {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset: Some(preset),
            ..Self::default()
        }
    }

    pub fn clause(clause: Where) -> Self {
        Self {
            clause: Some(clause),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.preset.is_none() && self.clause.is_none()
    }

    /// Set the request's predicate. Overwrites come back as warnings.
    pub fn apply(&self, request: &mut FetchRequest) -> Vec<CmdMessage> {
        let mut outcomes = Vec::new();
        match (self.preset, &self.clause) {
            (None, None) => {}
            (Some(preset), None) => outcomes.push(request.apply(&preset.clause())),
            (None, Some(clause)) => outcomes.push(request.apply(clause)),
            (Some(preset), Some(clause)) if self.replace => {
                outcomes.push(request.apply(&preset.clause()));
                outcomes.push(request.apply(clause));
            }
            (Some(preset), Some(clause)) => {
                outcomes.push(request.apply(&(preset.clause() & clause.clone())))
            }
        }
        outcomes
            .iter()
            .filter_map(|o| o.describe())
            .map(CmdMessage::warning)
            .collect()
    }
}

/// Ordering and paging for listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub sort: Option<SortField>,
    pub descending: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Listing {
    pub fn apply(&self, request: &mut FetchRequest) -> Vec<CmdMessage> {
        let mut messages = Vec::new();
        if let Some(field) = self.sort {
            let order = if self.descending {
                OrderBy::descending(field.key_path())
            } else {
                OrderBy::ascending(field.key_path())
            };
            // Palettes with equal sort values keep a stable, readable order.
            let order = if field == SortField::Name {
                order
            } else {
                order.then_ascending(keys::COLOR_NAME)
            };
            if let Some(note) = request.apply(&order).describe() {
                messages.push(CmdMessage::warning(note));
            }
        }
        if let Some(limit) = self.limit {
            let _ = request.apply(&Tweak::limit(limit));
        }
        if self.offset > 0 {
            let _ = request.apply(&Tweak::offset(self.offset));
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Palette;

    #[test]
    fn presets_parse_case_insensitively() {
        assert_eq!("WARM".parse::<Preset>().unwrap(), Preset::Warm);
        assert!("lukewarm".parse::<Preset>().is_err());
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn preset_clauses_classify_palettes() {
        let crimson = Palette::new("Crimson", 350, 0.9, 0.8);
        let teal = Palette::new("Teal", 200, 0.2, 0.4);

        assert!(Preset::Warm.clause().evaluate(&crimson).unwrap());
        assert!(!Preset::Warm.clause().evaluate(&teal).unwrap());
        assert!(Preset::Cool.clause().evaluate(&teal).unwrap());
        assert!(Preset::Bright.clause().evaluate(&crimson).unwrap());
        assert!(Preset::Muted.clause().evaluate(&teal).unwrap());
        assert!(Preset::All.clause().evaluate(&teal).unwrap());
    }

    #[test]
    fn preset_and_clause_combine_without_warning() {
        let mut request = FetchRequest::fetch::<Palette>();
        let selection = Selection {
            preset: Some(Preset::Warm),
            clause: Some(Where::eq(keys::COLOR_NAME, "Crimson")),
            replace: false,
        };
        assert!(selection.apply(&mut request).is_empty());
        assert_eq!(
            request.predicate(),
            Some(&(Preset::Warm.clause() & Where::eq(keys::COLOR_NAME, "Crimson")))
        );
    }

    #[test]
    fn replacing_a_preset_reports_the_overwrite() {
        let mut request = FetchRequest::fetch::<Palette>();
        let selection = Selection {
            preset: Some(Preset::Cool),
            clause: Some(Where::eq(keys::HUE, 10)),
            replace: true,
        };
        let messages = selection.apply(&mut request);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("hue BETWEEN {180, 270}"));
        assert_eq!(request.predicate(), Some(&Where::eq(keys::HUE, 10)));
    }

    #[test]
    fn listing_sorts_with_name_tiebreak_and_pages() {
        let mut request = FetchRequest::fetch::<Palette>();
        let listing = Listing {
            sort: Some(SortField::Hue),
            descending: true,
            limit: Some(3),
            offset: 1,
        };
        assert!(listing.apply(&mut request).is_empty());
        assert_eq!(
            request.sort_keys(),
            OrderBy::descending(keys::HUE)
                .then_ascending(keys::COLOR_NAME)
                .keys()
        );
        assert_eq!(request.fetch_limit, Some(3));
        assert_eq!(request.fetch_offset, 1);
    }

    #[test]
    fn sort_fields_accept_key_path_names() {
        assert_eq!("date_added".parse::<SortField>().unwrap(), SortField::Date);
        assert_eq!("Name".parse::<SortField>().unwrap(), SortField::Name);
    }
}
