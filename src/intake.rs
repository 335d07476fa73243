//! Birth-details intake
//!
//! Holds the form fields, resolves a location from the city table or manual
//! coordinates, validates locally, and submits once to `/birth-chart`.

use chrono::{Local, NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::api::{Backend, BirthChartRequest, BirthChartResponse};
use crate::error::Result;
use crate::notify::{self, Notice, Notifier};

pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// City choice that switches the form to hand-entered coordinates
pub const MANUAL_LOCATION: &str = "other";

pub const SUCCESS_NOTICE: &str = "Birth chart calculated successfully!";
pub const FAILURE_NOTICE: &str = "Failed to calculate birth chart. Please try again.";
pub const MISSING_FIELDS_NOTICE: &str = "Please fill all required fields";

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: &'static str,
}

pub const CITIES: &[City] = &[
    City { name: "Mumbai", latitude: 19.0760, longitude: 72.8777, timezone: DEFAULT_TIMEZONE },
    City { name: "Delhi", latitude: 28.7041, longitude: 77.1025, timezone: DEFAULT_TIMEZONE },
    City { name: "Bangalore", latitude: 12.9716, longitude: 77.5946, timezone: DEFAULT_TIMEZONE },
    City { name: "Kolkata", latitude: 22.5726, longitude: 88.3639, timezone: DEFAULT_TIMEZONE },
    City { name: "Chennai", latitude: 13.0827, longitude: 80.2707, timezone: DEFAULT_TIMEZONE },
    City { name: "Hyderabad", latitude: 17.3850, longitude: 78.4867, timezone: DEFAULT_TIMEZONE },
    City { name: "Pune", latitude: 18.5204, longitude: 73.8567, timezone: DEFAULT_TIMEZONE },
    City { name: "Ahmedabad", latitude: 23.0225, longitude: 72.5714, timezone: DEFAULT_TIMEZONE },
    City { name: "Jaipur", latitude: 26.9124, longitude: 75.7873, timezone: DEFAULT_TIMEZONE },
    City { name: "Lucknow", latitude: 26.8467, longitude: 80.9462, timezone: DEFAULT_TIMEZONE },
];

/// Case-insensitive lookup in [`CITIES`]
pub fn find_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Local rejection of the form; no request is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("'{0}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("birth date {0} is in the future")]
    FutureDate(String),

    #[error("'{0}' is not a time (expected HH:MM)")]
    InvalidTime(String),

    #[error("{field} '{value}' is not a valid coordinate")]
    InvalidCoordinate { field: &'static str, value: String },
}

/// Birth-details form state
#[derive(Debug, Clone)]
pub struct IntakeForm {
    pub name: String,
    pub date: String,
    pub time: String,
    pub latitude: String,
    pub longitude: String,
    pub timezone: String,
    city: String,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: String::new(),
            time: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            city: String::new(),
        }
    }
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// True when coordinates are entered by hand
    pub fn is_manual(&self) -> bool {
        self.city == MANUAL_LOCATION
    }

    /// Pick a location by name
    ///
    /// A known city fills latitude, longitude and time zone. Any other name is
    /// recorded as-is and leaves the coordinates alone.
    pub fn select_city(&mut self, name: &str) -> Option<&'static City> {
        match find_city(name) {
            Some(city) => {
                self.city = city.name.to_string();
                self.latitude = city.latitude.to_string();
                self.longitude = city.longitude.to_string();
                self.timezone = city.timezone.to_string();
                Some(city)
            }
            None => {
                let name = name.trim();
                self.city = if name.eq_ignore_ascii_case(MANUAL_LOCATION) {
                    MANUAL_LOCATION.to_string()
                } else {
                    name.to_string()
                };
                None
            }
        }
    }

    /// Enter coordinates by hand
    pub fn set_coordinates(&mut self, latitude: impl Into<String>, longitude: impl Into<String>) {
        self.city = MANUAL_LOCATION.to_string();
        self.latitude = latitude.into();
        self.longitude = longitude.into();
    }

    /// Check the form against today's local date
    pub fn validate(&self) -> std::result::Result<BirthChartRequest, ValidationError> {
        self.validate_on(Local::now().date_naive())
    }

    pub fn validate_on(
        &self,
        today: NaiveDate,
    ) -> std::result::Result<BirthChartRequest, ValidationError> {
        let required = [
            ("date", &self.date),
            ("time", &self.time),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::Missing(missing));
        }

        let date = self.date.trim();
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        if parsed > today {
            return Err(ValidationError::FutureDate(date.to_string()));
        }

        let time = self.time.trim();
        NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| ValidationError::InvalidTime(time.to_string()))?;

        let latitude = parse_coordinate("latitude", &self.latitude, 90.0)?;
        let longitude = parse_coordinate("longitude", &self.longitude, 180.0)?;

        let timezone = match self.timezone.trim() {
            "" => DEFAULT_TIMEZONE.to_string(),
            tz => tz.to_string(),
        };

        Ok(BirthChartRequest {
            date: date.to_string(),
            time: time.to_string(),
            latitude,
            longitude,
            timezone,
            name: self.name.trim().to_string(),
        })
    }

    /// Validate, then make exactly one `/birth-chart` request
    ///
    /// Validation failures never reach the backend. Backend failures are not
    /// retried; the caller stays in intake and may submit again.
    pub(crate) async fn submit(
        &self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<BirthChartResponse> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(err) => {
                let text = match &err {
                    ValidationError::Missing(_) => MISSING_FIELDS_NOTICE.to_string(),
                    other => other.to_string(),
                };
                notify::emit(notifier, Notice::error(text));
                return Err(err.into());
            }
        };

        debug!(
            "submitting birth details: {} {} ({}, {})",
            request.date, request.time, request.latitude, request.longitude
        );

        match backend.birth_chart(&request).await {
            Ok(response) => {
                info!("chart calculated, session {}", response.session_id);
                notify::emit(notifier, Notice::success(SUCCESS_NOTICE));
                Ok(response)
            }
            Err(err) => {
                notify::emit(notifier, Notice::error(FAILURE_NOTICE));
                Err(err)
            }
        }
    }
}

fn parse_coordinate(
    field: &'static str,
    raw: &str,
    limit: f64,
) -> std::result::Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidCoordinate {
        field,
        value: raw.trim().to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value.abs() > limit {
        return Err(invalid());
    }
    Ok(value)
}
