//! The demo entity.

use crate::key_path::KeyPath;
use crate::record::{Entity, Record};
use crate::value::Value;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed key paths for [`Palette`] fields.
pub mod keys {
    use crate::key_path::KeyPath;

    pub const ID: KeyPath = KeyPath::from_static("id");
    pub const COLOR_NAME: KeyPath = KeyPath::from_static("color_name");
    pub const HUE: KeyPath = KeyPath::from_static("hue");
    pub const SATURATION: KeyPath = KeyPath::from_static("saturation");
    pub const BRIGHTNESS: KeyPath = KeyPath::from_static("brightness");
    pub const DATE_ADDED: KeyPath = KeyPath::from_static("date_added");
}

const COLOR_NAMES: &[&str] = &[
    "Amber", "Azure", "Coral", "Crimson", "Indigo", "Jade", "Lavender", "Lime", "Magenta", "Ochre",
    "Olive", "Saffron", "Scarlet", "Sienna", "Teal", "Ultramarine",
];

/// A color swatch. Hue is in degrees, saturation and brightness in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub id: Uuid,
    pub color_name: String,
    pub hue: i64,
    pub saturation: f64,
    pub brightness: f64,
    pub date_added: DateTime<Utc>,
}

impl Palette {
    pub fn new(color_name: impl Into<String>, hue: i64, saturation: f64, brightness: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            color_name: color_name.into(),
            hue: hue.rem_euclid(360),
            saturation: saturation.clamp(0.0, 1.0),
            brightness: brightness.clamp(0.0, 1.0),
            date_added: Utc::now(),
        }
    }

    /// A palette with random components, added at some point in the last 30 days.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let name = COLOR_NAMES.choose(rng).copied().unwrap_or("Grey");
        let mut palette = Self::new(
            name,
            rng.gen_range(0..360),
            round2(rng.gen_range(0.0..=1.0)),
            round2(rng.gen_range(0.0..=1.0)),
        );
        palette.date_added -= Duration::minutes(rng.gen_range(0..30 * 24 * 60));
        palette
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl Record for Palette {
    fn value_for(&self, key_path: &KeyPath) -> Option<Value> {
        let value = match key_path.as_str() {
            "id" => Value::Uuid(self.id),
            "color_name" => Value::Text(self.color_name.clone()),
            "hue" => Value::Int(self.hue),
            "saturation" => Value::Float(self.saturation),
            "brightness" => Value::Float(self.brightness),
            "date_added" => Value::Timestamp(self.date_added),
            _ => return None,
        };
        Some(value)
    }
}

impl Entity for Palette {
    const NAME: &'static str = "Palette";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_normalizes_components() {
        let p = Palette::new("Teal", 540, 1.5, -0.2);
        assert_eq!(p.hue, 180);
        assert_eq!(p.saturation, 1.0);
        assert_eq!(p.brightness, 0.0);
    }

    #[test]
    fn random_palettes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let p = Palette::random(&mut rng);
            assert!((0..360).contains(&p.hue));
            assert!((0.0..=1.0).contains(&p.saturation));
            assert!(COLOR_NAMES.contains(&p.color_name.as_str()));
            assert!(p.date_added <= Utc::now());
        }
    }

    #[test]
    fn exposes_fields_by_key_path() {
        let p = Palette::new("Jade", 150, 0.5, 0.25);
        assert_eq!(p.value_for(&keys::HUE), Some(Value::Int(150)));
        assert_eq!(p.value_for(&keys::COLOR_NAME), Some(Value::from("Jade")));
        assert_eq!(p.value_for(&keys::ID), Some(Value::Uuid(p.id)));
        assert_eq!(p.value_for(&KeyPath::new("nickname")), None);
    }
}
