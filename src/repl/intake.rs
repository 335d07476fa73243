//! Interactive birth-details prompts
//!
//! Walks the user through the intake form one field at a time. Values given
//! on the command line show up as defaults; an empty answer keeps them.

use anyhow::Result;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use super::colors;
use super::helper::JyotishHelper;
use crate::intake::{CITIES, IntakeForm, MANUAL_LOCATION};

/// Source of answers; `None` means the user bailed out (EOF / Ctrl+C)
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineReader for Editor<JyotishHelper, DefaultHistory> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn ask(reader: &mut dyn LineReader, label: &str, current: &str) -> Result<Option<String>> {
    let prompt = if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, current)
    };

    Ok(reader.read_line(&prompt)?.map(|answer| {
        let answer = answer.trim();
        if answer.is_empty() {
            current.to_string()
        } else {
            answer.to_string()
        }
    }))
}

/// Fill `form` interactively; returns false if the user quit
pub fn fill_form(reader: &mut dyn LineReader, form: &mut IntakeForm) -> Result<bool> {
    println!("{}", colors::header("Enter your birth details"));

    let Some(name) = ask(reader, "Name (optional)", &form.name)? else {
        return Ok(false);
    };
    form.name = name;

    let Some(date) = ask(reader, "Birth date (YYYY-MM-DD)", &form.date)? else {
        return Ok(false);
    };
    form.date = date;

    let Some(time) = ask(reader, "Birth time (HH:MM)", &form.time)? else {
        return Ok(false);
    };
    form.time = time;

    let names: Vec<&str> = CITIES.iter().map(|c| c.name).collect();
    println!(
        "{}",
        colors::status(&format!("Cities: {}, or '{}'", names.join(", "), MANUAL_LOCATION))
    );

    loop {
        let Some(city) = ask(reader, "Birth city", form.city())? else {
            return Ok(false);
        };
        if city.is_empty() {
            println!("{}", colors::warning("Please choose a city or 'other'."));
            continue;
        }
        if form.select_city(&city).is_some() || form.is_manual() {
            break;
        }
        println!(
            "{}",
            colors::warning(&format!("Unknown city '{}'. Pick one from the list or 'other'.", city))
        );
    }

    if form.is_manual() {
        let Some(latitude) = ask(reader, "Latitude (e.g. 28.7041)", &form.latitude)? else {
            return Ok(false);
        };
        let Some(longitude) = ask(reader, "Longitude (e.g. 77.1025)", &form.longitude)? else {
            return Ok(false);
        };
        form.set_coordinates(latitude, longitude);

        let Some(timezone) = ask(reader, "Time zone", &form.timezone)? else {
            return Ok(false);
        };
        form.timezone = timezone;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays canned answers; runs out as EOF
    struct Script {
        answers: Vec<&'static str>,
        prompts: Vec<String>,
    }

    impl Script {
        fn new(mut answers: Vec<&'static str>) -> Self {
            answers.reverse();
            Self { answers, prompts: Vec::new() }
        }
    }

    impl LineReader for Script {
        fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            Ok(self.answers.pop().map(String::from))
        }
    }

    #[test]
    fn test_fill_with_known_city() {
        let mut script = Script::new(vec!["", "1990-05-15", "14:30", "delhi"]);
        let mut form = IntakeForm::new();

        assert!(fill_form(&mut script, &mut form).unwrap());
        assert_eq!(form.name, "");
        assert_eq!(form.city(), "Delhi");
        assert_eq!(form.latitude, "28.7041");
        assert_eq!(form.timezone, "Asia/Kolkata");
    }

    #[test]
    fn test_unknown_city_is_asked_again() {
        let mut script = Script::new(vec!["Ravi", "1990-05-15", "14:30", "Atlantis", "Pune"]);
        let mut form = IntakeForm::new();

        assert!(fill_form(&mut script, &mut form).unwrap());
        assert_eq!(form.city(), "Pune");
        assert_eq!(script.prompts.iter().filter(|p| p.starts_with("Birth city")).count(), 2);
    }

    #[test]
    fn test_manual_coordinates_flow() {
        let mut script = Script::new(vec![
            "", "1985-11-02", "06:05", "other", "51.5074", "-0.1278", "Europe/London",
        ]);
        let mut form = IntakeForm::new();

        assert!(fill_form(&mut script, &mut form).unwrap());
        assert!(form.is_manual());
        assert_eq!(form.longitude, "-0.1278");
        assert_eq!(form.timezone, "Europe/London");
    }

    #[test]
    fn test_prefilled_values_are_kept_on_empty_answer() {
        let mut form = IntakeForm::new();
        form.date = "2001-01-01".into();
        form.time = "09:00".into();
        form.select_city("Jaipur");
        let mut script = Script::new(vec!["", "", "", ""]);

        assert!(fill_form(&mut script, &mut form).unwrap());
        assert_eq!(form.date, "2001-01-01");
        assert_eq!(form.city(), "Jaipur");
        assert!(script.prompts[1].contains("[2001-01-01]"));
    }

    #[test]
    fn test_eof_aborts() {
        let mut script = Script::new(vec!["", "1990-05-15"]);
        let mut form = IntakeForm::new();
        assert!(!fill_form(&mut script, &mut form).unwrap());
    }
}
