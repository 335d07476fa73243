//! Chart snapshot types
//!
//! The backend computes every field; these types only carry the values so
//! the view and the conversation greeting can index into them. Planets keep
//! the order the backend sent them in.

pub mod view;

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use view::{ChartView, DisplayTab};

/// Backend-computed chart for one birth-detail submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub ascendant: Ascendant,
    pub planets: Planets,
    #[serde(default)]
    pub strengths: BTreeMap<String, Strength>,
    pub moon_nakshatra: MoonNakshatra,
    #[serde(default)]
    pub houses: Vec<House>,
    /// Short prose lines keyed by topic (ascendant_sign, moon_sign, ...)
    #[serde(default)]
    pub interpretation: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ascendant {
    pub sign: String,
    pub degree: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub sign: String,
    pub degree: f64,
    pub nakshatra: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonNakshatra {
    pub name: String,
    pub pada: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lord: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub house: u8,
    pub sign: String,
    pub description: String,
}

/// Planet positions in backend order
///
/// Serialized as a JSON object (`{"Sun": {...}, "Moon": {...}}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Planets(Vec<(String, PlanetPosition)>);

impl Planets {
    pub fn get(&self, name: &str) -> Option<&PlanetPosition> {
        self.0
            .iter()
            .find(|(planet, _)| planet == name)
            .map(|(_, position)| position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlanetPosition)> {
        self.0.iter().map(|(name, position)| (name.as_str(), position))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PlanetPosition)> for Planets {
    fn from_iter<I: IntoIterator<Item = (String, PlanetPosition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Planets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, position) in &self.0 {
            map.serialize_entry(name, position)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Planets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlanetsVisitor;

        impl<'de> Visitor<'de> for PlanetsVisitor {
            type Value = Planets;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of planet name to position")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Planets, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(9));
                while let Some((name, position)) = access.next_entry::<String, PlanetPosition>()? {
                    entries.push((name, position));
                }
                Ok(Planets(entries))
            }
        }

        deserializer.deserialize_map(PlanetsVisitor)
    }
}

impl ChartSnapshot {
    /// Sign the Moon occupies, if the backend reported a Moon position
    pub fn moon_sign(&self) -> Option<&str> {
        self.planets.get("Moon").map(|p| p.sign.as_str())
    }

    pub fn sun(&self) -> Option<&PlanetPosition> {
        self.planets.get("Sun")
    }

    pub fn strength_of(&self, planet: &str) -> Option<&Strength> {
        self.strengths.get(planet)
    }
}

/// Snapshot used across unit tests: Leo rising, Moon in Pisces / Revati
///
/// Parsed from text so the planet order is the order written here.
#[cfg(test)]
pub(crate) fn sample_snapshot() -> ChartSnapshot {
    serde_json::from_str(
        r#"{
            "ascendant": {"sign": "Leo", "degree": 12.5},
            "planets": {
                "Sun": {"sign": "Taurus", "degree": 0.75, "nakshatra": "Krittika"},
                "Moon": {"sign": "Pisces", "degree": 22.1, "nakshatra": "Revati"},
                "Mars": {"sign": "Aquarius", "degree": 5.4, "nakshatra": "Dhanishta"},
                "Rahu": {"sign": "Capricorn", "degree": 18.0, "nakshatra": "Shravana"}
            },
            "strengths": {
                "Sun": {"status": "Moderate", "score": 50},
                "Moon": {"status": "Strong", "score": 82.5},
                "Mars": {"status": "Weak", "score": 30}
            },
            "moon_nakshatra": {"name": "Revati", "pada": 3, "lord": "Mercury"},
            "houses": [
                {"house": 1, "sign": "Leo", "description": "Self, personality, physical body"},
                {"house": 2, "sign": "Virgo", "description": "Wealth, family, speech"},
                {"house": 3, "sign": "Libra", "description": "Siblings, courage, communication"},
                {"house": 11, "sign": "Gemini", "description": "Gains, income, aspirations"}
            ]
        }"#,
    )
    .unwrap()
}
