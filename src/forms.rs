//! Stateless field validation for submitted forms.
//!
//! A [`Form`] wraps the decoded `application/x-www-form-urlencoded` body and
//! accumulates per-field messages. Checks can be re-run on the same form
//! without duplicating messages.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("Invalid email regex")
    })
}

/// Field name to error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        let messages = self.0.entry(field.to_string()).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    values: HashMap<String, Vec<String>>,
    errors: FormErrors,
}

impl Form {
    #[must_use]
    pub fn new(values: HashMap<String, Vec<String>>) -> Self {
        Self {
            values,
            errors: FormErrors::default(),
        }
    }

    /// Decodes a urlencoded request body. Repeated keys keep every value.
    #[must_use]
    pub fn from_urlencoded(body: &[u8]) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(body))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_default().push(value.into());
        }
        Self::new(values)
    }

    /// First submitted value for `field`, or `""` when absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.values
            .get(field)
            .and_then(|v| v.first())
            .map_or("", String::as_str)
    }

    /// All submitted `(field, first value)` pairs whose key starts with `prefix`.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.values.iter().filter_map(move |(k, v)| {
            k.starts_with(prefix)
                .then(|| (k.as_str(), v.first().map_or("", String::as_str)))
        })
    }

    /// True when the field was submitted with a non-blank value.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).trim().is_empty()
    }

    fn is_present(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn required(&mut self, fields: &[&str]) -> &mut Self {
        for field in fields {
            if !self.has(field) {
                self.errors.add(field, "This field cannot be blank");
            }
        }
        self
    }

    /// Measures the trimmed value. No-op for absent fields; presence is
    /// [`Form::required`]'s job.
    pub fn min_length(&mut self, field: &str, length: usize) -> &mut Self {
        if self.is_present(field) && self.get(field).trim().chars().count() < length {
            self.errors.add(
                field,
                format!("This field must be at least {length} characters long"),
            );
        }
        self
    }

    pub fn is_email(&mut self, field: &str) -> &mut Self {
        if self.is_present(field) && !email_regex().is_match(self.get(field).trim()) {
            self.errors.add(field, "Invalid email address");
        }
        self
    }

    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub const fn errors(&self) -> &FormErrors {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> FormErrors {
        self.errors
    }
}
