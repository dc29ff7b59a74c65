//! Transaction templates.
//!
//! A template is a static transaction shape (amount, category, merchant,
//! payment method) read verbatim from a CSV file with a header row. The pool
//! is loaded once at startup and never mutated afterwards.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

/// Columns every template file must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["amount", "category", "merchant", "payment_method"];

/// Errors that can occur while loading the template pool.
///
/// All of these are fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template file not found: {0}")]
    NotFound(String),

    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed template file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template file is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid amount '{value}' on line {line}")]
    InvalidAmount { line: u64, value: String },

    #[error("Template {index} has amount {amount}; amounts must be finite and non-negative")]
    AmountOutOfRange { index: usize, amount: f64 },

    #[error("Template file contains no rows")]
    Empty,
}

/// A reusable transaction shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionTemplate {
    pub amount: f64,
    pub category: String,
    pub merchant: String,
    pub payment_method: String,
}

/// Raw row as it appears in the file; `amount` is validated separately so the
/// error can name the offending line.
#[derive(Deserialize)]
struct RawTemplate {
    amount: String,
    category: String,
    merchant: String,
    payment_method: String,
}

/// Counters only ever grow, so a template may not carry a negative amount.
fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

/// Read-only, ordered pool of templates.
#[derive(Debug, Clone)]
pub struct TemplatePool {
    templates: Vec<TransactionTemplate>,
}

impl TemplatePool {
    /// Build a pool from already-parsed templates.
    pub fn new(templates: Vec<TransactionTemplate>) -> Result<Self, TemplateError> {
        if templates.is_empty() {
            return Err(TemplateError::Empty);
        }
        if let Some((index, template)) = templates
            .iter()
            .enumerate()
            .find(|(_, t)| !is_valid_amount(t.amount))
        {
            return Err(TemplateError::AmountOutOfRange {
                index,
                amount: template.amount,
            });
        }
        Ok(Self { templates })
    }

    /// Load the pool from a CSV file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TemplateError::NotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a pool from any CSV source with a header row.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, TemplateError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(TemplateError::MissingColumn(column));
            }
        }

        let mut templates = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let raw: RawTemplate = record.deserialize(Some(&headers))?;
            let amount = raw
                .amount
                .parse::<f64>()
                .ok()
                .filter(|a| is_valid_amount(*a))
                .ok_or(TemplateError::InvalidAmount {
                    line,
                    value: raw.amount.clone(),
                })?;

            templates.push(TransactionTemplate {
                amount,
                category: raw.category,
                merchant: raw.merchant,
                payment_method: raw.payment_method,
            });
        }

        debug!(count = templates.len(), "Parsed transaction templates");
        Self::new(templates)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn as_slice(&self) -> &[TransactionTemplate] {
        &self.templates
    }

    /// Whether `template` is one of the loaded templates.
    pub fn contains(&self, template: &TransactionTemplate) -> bool {
        self.templates.iter().any(|t| t == template)
    }
}
