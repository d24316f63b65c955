use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("CV text cannot be empty")]
    EmptyCvText,

    #[error("Job description cannot be empty")]
    EmptyJobDescription,
}

/// A CV and job description that are both non-blank.
///
/// The text is kept exactly as entered; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    cv_text: String,
    job_description: String,
}

impl AnalysisInput {
    pub fn new(
        cv_text: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let cv_text = cv_text.into();
        let job_description = job_description.into();

        if cv_text.trim().is_empty() {
            return Err(ValidationError::EmptyCvText);
        }
        if job_description.trim().is_empty() {
            return Err(ValidationError::EmptyJobDescription);
        }

        Ok(Self {
            cv_text,
            job_description,
        })
    }

    /// Whether `new` would accept these texts. Drives submit enablement.
    pub fn is_submittable(cv_text: &str, job_description: &str) -> bool {
        !cv_text.trim().is_empty() && !job_description.trim().is_empty()
    }

    pub fn cv_text(&self) -> &str {
        &self.cv_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}
