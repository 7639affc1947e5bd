//! Local checks applied to a draft before anything is sent to the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::calculator::total_for;
use crate::error::{Field, ValidationError};
use crate::models::{TaskInput, TaskPayload};

/// Parses a calendar date.
///
/// Accepts `YYYY-MM-DD` as well as full RFC 3339 / ISO 8601 timestamps, since
/// some backends echo dates back with a time component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Parses a user-typed amount for `field`.
///
/// Empty input counts as zero, matching a freshly created draft.
pub fn parse_amount(field: Field, value: &str) -> Result<f64, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", value)))
}

fn check_amount(field: Field, value: f64) -> Option<ValidationError> {
    if !value.is_finite() {
        Some(ValidationError::new(field, "must be a finite number"))
    } else if value < 0.0 {
        Some(ValidationError::new(field, "must be greater than or equal to 0"))
    } else {
        None
    }
}

/// Every rule the draft breaks, in form order.
pub fn violations(input: &TaskInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.employee_name.trim().is_empty() {
        errors.push(ValidationError::new(Field::EmployeeName, "is required"));
    }
    if input.task_description.trim().is_empty() {
        errors.push(ValidationError::new(Field::TaskDescription, "is required"));
    }
    if input.date.trim().is_empty() {
        errors.push(ValidationError::new(Field::Date, "is required"));
    } else if parse_date(&input.date).is_none() {
        errors.push(ValidationError::new(
            Field::Date,
            format!("'{}' is not a valid date, use YYYY-MM-DD", input.date.trim()),
        ));
    }

    let amounts = [
        (Field::HoursSpent, input.hours_spent),
        (Field::HourlyRate, input.hourly_rate),
        (Field::AdditionalCharges, input.additional_charges),
    ];
    errors.extend(
        amounts
            .iter()
            .filter_map(|(field, value)| check_amount(*field, *value)),
    );

    errors
}

/// Checks a draft, returning the first broken rule.
pub fn validate(input: &TaskInput) -> Result<(), ValidationError> {
    match violations(input).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Validates a draft and turns it into the body sent to the store, with the
/// total computed by the calculator.
pub fn to_payload(input: &TaskInput) -> Result<TaskPayload, ValidationError> {
    validate(input)?;
    let date = parse_date(&input.date)
        .ok_or_else(|| ValidationError::new(Field::Date, "is not a valid date"))?;

    Ok(TaskPayload {
        employee_name: input.employee_name.trim().to_string(),
        task_description: input.task_description.trim().to_string(),
        date: date.to_string(),
        hours_spent: input.hours_spent,
        hourly_rate: input.hourly_rate,
        additional_charges: input.additional_charges,
        total_remuneration: total_for(input),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TaskInput {
        TaskInput {
            employee_name: "Ada".into(),
            task_description: "Wiring".into(),
            date: "2024-03-01".into(),
            hours_spent: 2.0,
            hourly_rate: 30.0,
            additional_charges: 5.0,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut input = valid();
        input.employee_name = "   ".into();
        let err = validate(&input).unwrap_err();
        assert_eq!(err.field, Field::EmployeeName);
    }

    #[test]
    fn test_all_violations_are_reported() {
        let input = TaskInput {
            employee_name: String::new(),
            task_description: String::new(),
            date: "yesterday".into(),
            hours_spent: -1.0,
            hourly_rate: f64::NAN,
            additional_charges: f64::INFINITY,
        };
        let fields: Vec<Field> = violations(&input).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_payload_is_trimmed_and_totalled() {
        let mut input = valid();
        input.employee_name = "  Ada ".into();
        input.date = "2024-03-01T00:00:00Z".into();
        let payload = to_payload(&input).unwrap();
        assert_eq!(payload.employee_name, "Ada");
        assert_eq!(payload.date, "2024-03-01");
        assert_eq!(payload.total_remuneration, 65.0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Field::HoursSpent, "").unwrap(), 0.0);
        assert_eq!(parse_amount(Field::HoursSpent, " 1.5 ").unwrap(), 1.5);
        let err = parse_amount(Field::HourlyRate, "ten").unwrap_err();
        assert_eq!(err.field, Field::HourlyRate);
    }
}
