use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeopleType {
    Child,
    Adult,
    Elderly,
    Pregnant,
}

impl PeopleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeopleType::Child => "child",
            PeopleType::Adult => "adult",
            PeopleType::Elderly => "elderly",
            PeopleType::Pregnant => "pregnant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    None,
    Asthma,
    Copd,
    HeartDisease,
}

impl Disease {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disease::None => "none",
            Disease::Asthma => "asthma",
            Disease::Copd => "copd",
            Disease::HeartDisease => "heart_disease",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Gender, PeopleType, Disease);

/// Profile submitted to `POST /health-advisory`.
///
/// Numeric fields are signed so that out-of-range values reach validation
/// and come back as 422 rather than a JSON type error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdvisoryRequest {
    #[validate(range(min = 0, max = 120, message = "Age must be between 0 and 120"))]
    pub age: i64,

    pub gender: Gender,

    pub people_type: PeopleType,

    pub disease: Disease,

    #[validate(length(
        min = 2,
        max = 100,
        message = "City must be between 2 and 100 characters"
    ))]
    pub city: String,

    #[validate(range(min = 1, max = 1000, message = "AQI must be between 1 and 1000"))]
    pub aqi: i64,

    #[validate(custom(function = "not_blank", message = "Activity is required"))]
    pub activity: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Success envelope. Advisory-generation failures also use it, with the
/// failure described in `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub success: bool,
    pub message: String,
}

impl AdvisoryResponse {
    pub fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
