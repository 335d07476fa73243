//! Read-only chart renderer
//!
//! Switching tabs never touches the network and never edits the snapshot.

use std::fmt::Write as _;
use std::str::FromStr;

use super::ChartSnapshot;

/// Which part of the chart is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayTab {
    #[default]
    Overview,
    Planets,
    Houses,
}

impl DisplayTab {
    pub const ALL: [DisplayTab; 3] = [DisplayTab::Overview, DisplayTab::Planets, DisplayTab::Houses];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayTab::Overview => "overview",
            DisplayTab::Planets => "planets",
            DisplayTab::Houses => "houses",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DisplayTab::Overview => "Chart Overview",
            DisplayTab::Planets => "Planetary Positions",
            DisplayTab::Houses => "House System",
        }
    }
}

impl FromStr for DisplayTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overview" => Ok(DisplayTab::Overview),
            "planets" => Ok(DisplayTab::Planets),
            "houses" => Ok(DisplayTab::Houses),
            other => Err(format!(
                "unknown tab '{}' (expected overview, planets or houses)",
                other
            )),
        }
    }
}

/// Tab selection for the chart panel
#[derive(Debug, Clone, Default)]
pub struct ChartView {
    tab: DisplayTab,
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> DisplayTab {
        self.tab
    }

    pub fn select(&mut self, tab: DisplayTab) {
        self.tab = tab;
    }

    /// Render the selected tab; empty when there is no chart yet
    pub fn render(&self, chart: Option<&ChartSnapshot>) -> String {
        let Some(chart) = chart else {
            return String::new();
        };

        match self.tab {
            DisplayTab::Overview => render_overview(chart),
            DisplayTab::Planets => render_planets(chart),
            DisplayTab::Houses => render_houses(chart),
        }
    }
}

fn render_overview(chart: &ChartSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", DisplayTab::Overview.title());

    let _ = writeln!(out, "\nAscendant (Lagna)");
    let _ = writeln!(out, "  {}", chart.ascendant.sign);
    let _ = writeln!(out, "  {}°", chart.ascendant.degree);

    let _ = writeln!(out, "\nMoon Sign");
    let _ = writeln!(out, "  {}", chart.moon_sign().unwrap_or("unknown"));
    let _ = writeln!(out, "  Nakshatra: {}", chart.moon_nakshatra.name);
    let _ = writeln!(out, "  Pada: {}", chart.moon_nakshatra.pada);
    if let Some(lord) = &chart.moon_nakshatra.lord {
        let _ = writeln!(out, "  Lord: {}", lord);
    }

    if let Some(sun) = chart.sun() {
        let _ = writeln!(out, "\nSun Sign");
        let _ = writeln!(out, "  {}", sun.sign);
        let _ = writeln!(out, "  {}°", sun.degree);
    }

    if !chart.interpretation.is_empty() {
        let _ = writeln!(out, "\nReading");
        for line in chart.interpretation.values() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    out
}

fn render_planets(chart: &ChartSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", DisplayTab::Planets.title());

    for (planet, data) in chart.planets.iter() {
        let _ = writeln!(out, "\n{}", planet);
        let _ = writeln!(out, "  Sign: {}", data.sign);
        let _ = writeln!(out, "  Degree: {}°", data.degree);
        let _ = writeln!(out, "  Nakshatra: {}", data.nakshatra);
        if let Some(strength) = chart.strength_of(planet) {
            let _ = writeln!(out, "  Strength: {}", strength.status);
        }
    }

    out
}

fn render_houses(chart: &ChartSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", DisplayTab::Houses.title());

    for house in &chart.houses {
        let _ = writeln!(out, "\n{} House", ordinal(house.house));
        let _ = writeln!(out, "  Sign: {}", house.sign);
        let _ = writeln!(out, "  {}", house.description);
    }

    out
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
