use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Workflow document types that receive sequential identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Material Receipt Voucher.
    Mrv,
    /// Material Issue Voucher.
    Miv,
    Transfer,
    Reconciliation,
    ServiceOrder,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Mrv,
        DocumentKind::Miv,
        DocumentKind::Transfer,
        DocumentKind::Reconciliation,
        DocumentKind::ServiceOrder,
    ];

    /// Upper-case prefix used in display identifiers.
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Mrv => "MRV",
            DocumentKind::Miv => "MIV",
            DocumentKind::Transfer => "TRF",
            DocumentKind::Reconciliation => "REC",
            DocumentKind::ServiceOrder => "SRV",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

/// Calendar month a counter is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Two-digit year (`2025` is stored as `25`).
    pub year: u8,
    pub month: u8,
}

impl Period {
    pub fn new(year: u8, month: u8) -> Result<Self, DocumentIdError> {
        if year > 99 {
            return Err(DocumentIdError::InvalidYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DocumentIdError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn of(at: &DateTime<Utc>) -> Self {
        Self {
            year: at.year().rem_euclid(100) as u8,
            month: at.month() as u8,
        }
    }

    /// Counter document id, e.g. `mrv-25-08`.
    pub fn counter_id(&self, kind: DocumentKind) -> String {
        format!(
            "{}-{:02}-{:02}",
            kind.prefix().to_ascii_lowercase(),
            self.year,
            self.month
        )
    }
}

/// Failure to parse or build a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentIdError {
    #[error("malformed document id: {0}")]
    Malformed(String),
    #[error("unknown document prefix: {0}")]
    UnknownPrefix(String),
    #[error("year out of range: {0}")]
    InvalidYear(u8),
    #[error("month out of range: {0}")]
    InvalidMonth(u8),
    #[error("sequence must be at least 1")]
    InvalidSequence,
}

/// One reserved sequence number with its two encodings.
///
/// Canonical: `PREFIX-YY-MM-###` (e.g. `MRV-25-08-001`).
/// Short: `PREFIX-YYMMSEQ` with the sequence unpadded (e.g. `MRV-25081`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId {
    pub kind: DocumentKind,
    pub period: Period,
    pub seq: u64,
}

impl DocumentId {
    pub fn new(kind: DocumentKind, period: Period, seq: u64) -> Result<Self, DocumentIdError> {
        if seq == 0 {
            return Err(DocumentIdError::InvalidSequence);
        }
        Ok(Self { kind, period, seq })
    }

    pub fn canonical(&self) -> String {
        format!(
            "{}-{:02}-{:02}-{:03}",
            self.kind.prefix(),
            self.period.year,
            self.period.month,
            self.seq
        )
    }

    pub fn short(&self) -> String {
        format!(
            "{}-{:02}{:02}{}",
            self.kind.prefix(),
            self.period.year,
            self.period.month,
            self.seq
        )
    }

    pub fn parse_canonical(s: &str) -> Result<Self, DocumentIdError> {
        let malformed = || DocumentIdError::Malformed(s.to_string());
        let mut parts = s.split('-');
        let (prefix, year, month, seq) = match (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) {
            (Some(p), Some(y), Some(m), Some(n), None) => (p, y, m, n),
            _ => return Err(malformed()),
        };

        if year.len() != 2 || month.len() != 2 || seq.len() < 3 {
            return Err(malformed());
        }

        let kind = DocumentKind::from_prefix(prefix)
            .ok_or_else(|| DocumentIdError::UnknownPrefix(prefix.to_string()))?;
        let period = Period::new(parse_digits(year, s)? as u8, parse_digits(month, s)? as u8)?;
        let seq = parse_digits(seq, s)?;
        let id = Self::new(kind, period, seq)?;

        // Wide sequences are printed unpadded, so anything longer than three
        // digits must not carry a leading zero.
        if id.canonical() != s {
            return Err(malformed());
        }
        Ok(id)
    }

    pub fn parse_short(s: &str) -> Result<Self, DocumentIdError> {
        let malformed = || DocumentIdError::Malformed(s.to_string());
        let (prefix, digits) = s.split_once('-').ok_or_else(malformed)?;
        if digits.len() < 5 || !digits.is_ascii() {
            return Err(malformed());
        }

        let kind = DocumentKind::from_prefix(prefix)
            .ok_or_else(|| DocumentIdError::UnknownPrefix(prefix.to_string()))?;
        let period = Period::new(
            parse_digits(&digits[0..2], s)? as u8,
            parse_digits(&digits[2..4], s)? as u8,
        )?;
        let seq_digits = &digits[4..];
        if seq_digits.starts_with('0') {
            return Err(malformed());
        }
        let seq = parse_digits(seq_digits, s)?;
        Self::new(kind, period, seq)
    }
}

fn parse_digits(part: &str, whole: &str) -> Result<u64, DocumentIdError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DocumentIdError::Malformed(whole.to_string()));
    }
    part.parse()
        .map_err(|_| DocumentIdError::Malformed(whole.to_string()))
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for DocumentId {
    type Err = DocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_canonical(s)
    }
}
