use crate::errors::ValidationError;

/// Raw callback form as posted by the landing page. Missing fields are empty
/// strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub name: String,
    pub number: String,
}

/// A prospective customer asking to be called back. Both fields are
/// guaranteed non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lead {
    name: String,
    phone_number: String,
}

impl LeadForm {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self { name: name.into(), number: number.into() }
    }

    pub fn validate(&self) -> Result<Lead, ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.number.is_empty() {
            return Err(ValidationError::EmptyField { field: "number" });
        }

        Ok(Lead { name: self.name.clone(), phone_number: self.number.clone() })
    }
}

/// Builds a form from decoded `key=value` pairs. Unknown keys are ignored and a
/// repeated key keeps its last value.
impl<K, V> FromIterator<(K, V)> for LeadForm
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "name" => form.name = value.into(),
                "number" => form.number = value.into(),
                _ => {}
            }
        }
        form
    }
}

impl Lead {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn message_body(&self) -> String {
        format!("You have a new lead: {}. Call them at {}", self.name, self.phone_number)
    }
}
