//! Ledger types: transactions and the records they own.
//!
//! This module mirrors the backend record schema field-for-field
//! (`id`, `placing_number`, `record_type`, `datetime`, `callno`,
//! `accession_number`, `book_title`) so that values read from the ledger can
//! be written back without translation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 1-based slot on a library card.
///
/// Doubles as the persisted position of a [`Record`].
pub type PlacingNumber = u32;

/// Backend identifier of a [`Record`].
pub type RecordId = i64;

/// Backend identifier of a [`Transaction`].
pub type TransactionId = i64;

/// Clamps a possibly out-of-range slot computation to a valid placing number.
///
/// Placing numbers start at 1; anything lower is pulled up to 1.
///
/// # Examples
///
/// ```
/// use libcard_protocol::record::clamp_placing_number;
///
/// assert_eq!(clamp_placing_number(-4), 1);
/// assert_eq!(clamp_placing_number(0), 1);
/// assert_eq!(clamp_placing_number(12), 12);
/// ```
#[must_use]
pub fn clamp_placing_number(n: i64) -> PlacingNumber {
    PlacingNumber::try_from(n.max(1)).unwrap_or(PlacingNumber::MAX)
}

/// The status vocabulary of a record line.
///
/// Serialized in the backend's upper-case form (`"BORROWED"`, ...).
///
/// # Examples
///
/// ```
/// use libcard_protocol::RecordType;
///
/// assert_eq!(RecordType::Borrowed.keyword(), "BORROWED");
/// assert_eq!("returned".parse::<RecordType>().ok(), Some(RecordType::Returned));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    /// The book left the library.
    Borrowed,
    /// The book came back.
    Returned,
    /// The loan period was extended.
    Extended,
    /// A manual addition line.
    Addition,
    /// A manual subtraction line.
    Subtraction,
    /// The line was cleared.
    Cleared,
}

impl RecordType {
    /// Returns every record type, in vocabulary order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Borrowed,
            Self::Returned,
            Self::Extended,
            Self::Addition,
            Self::Subtraction,
            Self::Cleared,
        ]
    }

    /// Returns the upper-case keyword written on the card.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Borrowed => "BORROWED",
            Self::Returned => "RETURNED",
            Self::Extended => "EXTENDED",
            Self::Addition => "ADDITION",
            Self::Subtraction => "SUBTRACTION",
            Self::Cleared => "CLEARED",
        }
    }

    /// Matches a whole line against the vocabulary, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_protocol::RecordType;
    ///
    /// assert_eq!(RecordType::from_keyword(" Extended "), Some(RecordType::Extended));
    /// assert_eq!(RecordType::from_keyword("BORROWED BY"), None);
    /// ```
    #[must_use]
    pub fn from_keyword(line: &str) -> Option<Self> {
        let line = line.trim();
        Self::all()
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(line))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for RecordType {
    type Err = crate::ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| crate::ProtocolError::UnknownRecordType(s.to_string()))
    }
}

/// A single status line belonging to a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Backend identifier.
    pub id: RecordId,
    /// Which status this line records.
    pub record_type: RecordType,
    /// When the event happened.
    pub datetime: DateTime<Utc>,
    /// The card slot this record occupies, if it has been placed.
    #[serde(default)]
    pub placing_number: Option<PlacingNumber>,
}

impl Record {
    /// Creates a record placed at the given slot.
    #[must_use]
    pub fn new(
        id: RecordId,
        record_type: RecordType,
        datetime: DateTime<Utc>,
        placing_number: Option<PlacingNumber>,
    ) -> Self {
        Self {
            id,
            record_type,
            datetime,
            placing_number,
        }
    }

    /// Returns the text this record contributes to its card cell:
    /// the status keyword and the date on separate lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use libcard_protocol::{Record, RecordType};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    /// let record = Record::new(7, RecordType::Borrowed, at, Some(12));
    /// assert_eq!(record.cell_text(), "BORROWED\n2024-05-01");
    /// ```
    #[must_use]
    pub fn cell_text(&self) -> String {
        format!("{}\n{}", self.record_type, self.datetime.format("%Y-%m-%d"))
    }
}

/// A borrowing event for a single book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Backend identifier.
    pub id: TransactionId,
    /// Title of the borrowed book.
    pub book_title: String,
    /// Library call number.
    #[serde(rename = "callno")]
    pub call_number: String,
    /// Accession number of the physical copy.
    pub accession_number: String,
    /// Status lines, in ledger order.
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Transaction {
    /// Creates a transaction with no records.
    #[must_use]
    pub fn new(
        id: TransactionId,
        book_title: impl Into<String>,
        call_number: impl Into<String>,
        accession_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            book_title: book_title.into(),
            call_number: call_number.into(),
            accession_number: accession_number.into(),
            records: Vec::new(),
        }
    }

    /// Appends a record and returns `self`, for building fixtures.
    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Describes one of this transaction's records for confirmation prompts
    /// and notices.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use libcard_protocol::{Record, RecordType, Transaction};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    /// let record = Record::new(7, RecordType::Borrowed, at, Some(12));
    /// let tx = Transaction::new(3, "Dune", "PS3558 .E63", "A-0193");
    /// assert_eq!(
    ///     tx.describe(&record),
    ///     "Dune (call no. PS3558 .E63, accession A-0193): BORROWED on 2024-05-01"
    /// );
    /// ```
    #[must_use]
    pub fn describe(&self, record: &Record) -> String {
        format!(
            "{} (call no. {}, accession {}): {}",
            self.book_title,
            self.call_number,
            self.accession_number,
            describe_record(record)
        )
    }
}

/// Describes a record on its own, when its transaction is unknown.
#[must_use]
pub fn describe_record(record: &Record) -> String {
    format!(
        "{} on {}",
        record.record_type,
        record.datetime.format("%Y-%m-%d")
    )
}

/// Body of a placing-number update sent to the ledger.
///
/// # Examples
///
/// ```
/// use libcard_protocol::record::PlacingUpdate;
///
/// let body = serde_json::to_string(&PlacingUpdate { placing_number: 15 }).unwrap();
/// assert_eq!(body, r#"{"placing_number":15}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacingUpdate {
    /// The new slot for the record.
    pub placing_number: PlacingNumber,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 10, 30, 0).unwrap()
    }

    #[test]
    fn keyword_matching_is_case_insensitive_and_whole_line() {
        assert_eq!(RecordType::from_keyword("borrowed"), Some(RecordType::Borrowed));
        assert_eq!(RecordType::from_keyword("Cleared"), Some(RecordType::Cleared));
        assert_eq!(RecordType::from_keyword("BORROWED!"), None);
        assert_eq!(RecordType::from_keyword(""), None);
    }

    #[test]
    fn unknown_record_type_is_an_error() {
        let err = "LOST".parse::<RecordType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown record type: LOST");
    }

    #[test]
    fn record_type_json_format() {
        let json = serde_json::to_string(&RecordType::Subtraction).expect("serialize");
        assert_eq!(json, r#""SUBTRACTION""#);
    }

    #[test]
    fn transaction_deserializes_backend_schema() {
        let json = r#"{
            "id": 3,
            "book_title": "Noli Me Tangere",
            "callno": "PQ8897 .R5",
            "accession_number": "000123",
            "records": [
                {"id": 7, "record_type": "BORROWED", "datetime": "2024-05-01T10:30:00Z", "placing_number": 12},
                {"id": 8, "record_type": "RETURNED", "datetime": "2024-05-08T10:30:00Z", "placing_number": null}
            ]
        }"#;

        let tx: Transaction = serde_json::from_str(json).expect("deserialize");
        assert_eq!(tx.call_number, "PQ8897 .R5");
        assert_eq!(tx.records.len(), 2);
        assert_eq!(tx.records[0].placing_number, Some(12));
        assert_eq!(tx.records[1].placing_number, None);
        assert_eq!(tx.records[1].datetime, at(8));
    }

    #[test]
    fn transaction_serializes_callno_field() {
        let tx = Transaction::new(1, "Title", "QA76", "A-1");
        let value = serde_json::to_value(&tx).expect("serialize");
        assert_eq!(value["callno"], "QA76");
        assert!(value.get("call_number").is_none());
    }

    #[test]
    fn record_without_placing_number_defaults_to_none() {
        let json = r#"{"id": 1, "record_type": "EXTENDED", "datetime": "2024-05-03T10:30:00Z"}"#;
        let record: Record = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.placing_number, None);
        assert_eq!(record.cell_text(), "EXTENDED\n2024-05-03");
    }

    #[test]
    fn describe_record_without_transaction() {
        let record = Record::new(9, RecordType::Extended, at(2), Some(4));
        assert_eq!(describe_record(&record), "EXTENDED on 2024-05-02");
    }
}
