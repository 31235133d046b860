use crate::error::SkillError;

#[derive(Debug, Clone, Default)]
pub struct ApplicationGate {
    expected: Option<String>,
}

impl ApplicationGate {
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }

    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_enforced(&self) -> bool {
        self.expected.is_some()
    }

    pub fn check(&self, application_id: &str) -> Result<(), SkillError> {
        match self.expected.as_deref() {
            Some(expected) if expected != application_id => {
                Err(SkillError::InvalidApplicationId {
                    actual: application_id.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}
