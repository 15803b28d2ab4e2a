//! Outbound payloads: review submissions, admin car drafts, credentials.
//!
//! Each type validates on the client before anything is sent and serializes
//! to the API's localized field names.

use serde::Serialize;

use crate::error::SubmissionError;
use crate::models::{Car, Category};

pub const MIN_COMMENT_CHARS: usize = 10;
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_NAME_CHARS: usize = 3;

/// A review being written. A rating of 0 means the star was never picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub ratings: [u8; 5],
    pub comment: String,
}

/// Body of `POST /cars/{id}/evaluations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewPayload {
    #[serde(rename = "notaDesempenho")]
    pub nota_desempenho: u8,
    #[serde(rename = "notaConforto")]
    pub nota_conforto: u8,
    #[serde(rename = "notaConsumo")]
    pub nota_consumo: u8,
    #[serde(rename = "notaDesign")]
    pub nota_design: u8,
    #[serde(rename = "notaCustoBeneficio")]
    pub nota_custo_beneficio: u8,
    pub comentario: String,
}

impl ReviewSubmission {
    pub fn set_rating(&mut self, category: Category, stars: u8) {
        let idx = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        self.ratings[idx] = stars;
    }

    /// Checks every rating is picked and in 1..=5 and the comment is long
    /// enough, then builds the wire payload.
    pub fn validate(&self) -> Result<ReviewPayload, SubmissionError> {
        for (category, &value) in Category::ALL.iter().zip(self.ratings.iter()) {
            match value {
                0 => return Err(SubmissionError::RatingUnset { category: category.label() }),
                1..=5 => {}
                _ => {
                    return Err(SubmissionError::RatingOutOfRange {
                        category: category.label(),
                        value,
                    });
                }
            }
        }
        if self.comment.chars().count() < MIN_COMMENT_CHARS {
            return Err(SubmissionError::CommentTooShort { min: MIN_COMMENT_CHARS });
        }

        let [performance, comfort, consumption, design, cost_benefit] = self.ratings;
        Ok(ReviewPayload {
            nota_desempenho: performance,
            nota_conforto: comfort,
            nota_consumo: consumption,
            nota_design: design,
            nota_custo_beneficio: cost_benefit,
            comentario: self.comment.clone(),
        })
    }
}

/// Image attached to a car draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Admin form for creating or editing a car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub image: Option<CarImage>,
}

impl CarDraft {
    /// Prefills the form from an existing car; the image is kept server-side
    /// unless a new one is attached.
    pub fn from_car(car: &Car) -> Self {
        Self {
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year.map(|y| y.to_string()).unwrap_or_default(),
            image: None,
        }
    }

    /// Validates the draft. Creating a car requires an image; editing does not.
    pub fn validate(&self, creating: bool) -> Result<(), SubmissionError> {
        if self.brand.trim().is_empty() {
            return Err(SubmissionError::MissingField { field: "brand" });
        }
        if self.model.trim().is_empty() {
            return Err(SubmissionError::MissingField { field: "model" });
        }
        if self.year.chars().count() < 4 {
            return Err(SubmissionError::InvalidYear);
        }
        if creating && self.image.is_none() {
            return Err(SubmissionError::ImageRequired);
        }
        Ok(())
    }
}

/// Body of `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), SubmissionError> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Body of `POST /auth/register`. The confirmation never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.name.chars().count() < MIN_NAME_CHARS {
            return Err(SubmissionError::NameTooShort { min: MIN_NAME_CHARS });
        }
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(SubmissionError::PasswordMismatch);
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), SubmissionError> {
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(SubmissionError::InvalidEmail),
    }
}

fn validate_password(password: &str) -> Result<(), SubmissionError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(SubmissionError::PasswordTooShort { min: MIN_PASSWORD_CHARS });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled() -> ReviewSubmission {
        ReviewSubmission {
            ratings: [5, 4, 3, 2, 1],
            comment: "Ótimo custo-benefício".to_string(),
        }
    }

    #[test]
    fn test_review_payload_uses_wire_names() {
        let payload = filled().validate().unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "notaDesempenho": 5,
                "notaConforto": 4,
                "notaConsumo": 3,
                "notaDesign": 2,
                "notaCustoBeneficio": 1,
                "comentario": "Ótimo custo-benefício"
            })
        );
    }

    #[test]
    fn test_unset_rating_not_submittable() {
        let mut review = filled();
        review.set_rating(Category::Comfort, 0);

        assert_eq!(
            review.validate(),
            Err(SubmissionError::RatingUnset { category: "Conforto" })
        );
    }

    #[test]
    fn test_rating_above_five_rejected() {
        let mut review = filled();
        review.set_rating(Category::Design, 6);

        assert_eq!(
            review.validate(),
            Err(SubmissionError::RatingOutOfRange { category: "Design", value: 6 })
        );
    }

    #[test]
    fn test_short_comment_rejected() {
        let review = ReviewSubmission {
            ratings: [3; 5],
            comment: "curto".to_string(),
        };
        assert_eq!(
            review.validate(),
            Err(SubmissionError::CommentTooShort { min: 10 })
        );
    }

    #[test]
    fn test_car_draft_validation() {
        let mut draft = CarDraft {
            brand: "Honda".into(),
            model: "Civic".into(),
            year: "2023".into(),
            image: None,
        };

        assert_eq!(draft.validate(true), Err(SubmissionError::ImageRequired));
        assert_eq!(draft.validate(false), Ok(()));

        draft.year = "23".into();
        assert_eq!(draft.validate(false), Err(SubmissionError::InvalidYear));

        draft.year = "2023".into();
        draft.brand = " ".into();
        assert_eq!(
            draft.validate(false),
            Err(SubmissionError::MissingField { field: "brand" })
        );
    }

    #[test]
    fn test_credentials() {
        let good = Credentials {
            email: "ana@example.com".into(),
            password: "segredo".into(),
        };
        assert_eq!(good.validate(), Ok(()));
        assert_eq!(
            serde_json::to_value(&good).unwrap(),
            json!({ "email": "ana@example.com", "senha": "segredo" })
        );

        let bad_email = Credentials {
            email: "ana.example.com".into(),
            ..good.clone()
        };
        assert_eq!(bad_email.validate(), Err(SubmissionError::InvalidEmail));

        let short = Credentials {
            password: "123".into(),
            ..good
        };
        assert_eq!(
            short.validate(),
            Err(SubmissionError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn test_registration_confirmation() {
        let registration = Registration {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "segredo".into(),
            confirm_password: "segredo!".into(),
        };
        assert_eq!(registration.validate(), Err(SubmissionError::PasswordMismatch));

        let value = serde_json::to_value(&registration).unwrap();
        assert!(value.get("confirm_password").is_none());
    }
}
