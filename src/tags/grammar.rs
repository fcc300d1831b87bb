//! Tag grammars: the closed kind set, match patterns, and extraction rules
//!
//! Every kind follows one pipeline: apply an anchored pattern to the raw
//! content, fail if it does not match, then build the kind's fixed field set
//! from the captured groups. Patterns are anchored so a tag matches a prefix
//! of its content, never an arbitrary substring; trailing unmatched text is
//! the caller's concern.
//!
//! The message block kind is the one exception to single-shot matching: its
//! content is scanned marker by marker in an explicit loop (see
//! [`extract_blocks`]'s doc), since sub-blocks repeat within one content
//! string.
//!
//! All patterns are compiled once into lazy statics and shared read-only by
//! every parse; the `regex` engine is linear-time, so no input can trigger
//! backtracking blowup.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::fields::{FieldValue, Fields, ParsedTag};
use super::TagError;
use crate::helpers;

/// Shared pattern for the 16-char reference tags (20, 21)
static REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<value>.{0,16})").unwrap());

/// Account identification (25), up to 35 chars
static ACCOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<value>.{0,35})").unwrap());

/// Statement number (28): up to three slash-separated digit groups
static STATEMENT_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<statement>\d{1,5})(/(?P<sequence>\d{1,5}))?(/(?P<section>\d{1,5}))?").unwrap()
});

/// Non-SWIFT narrative (NS), one unbounded line
static NON_SWIFT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<value>.*)").unwrap());

/// Shared pattern for the four balance tags (60, 62, 64, 65)
static BALANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<dc>[DC])",                               // debit/credit indicator
        r"(?P<year>\d{2})(?P<month>\d{2})(?P<day>\d{2})", // date
        r"(?P<currency>[A-Z]{3})",                      // currency
        r"(?P<amount>[0-9,]{0,16})",                    // amount
    ))
    .unwrap()
});

/// Statement line (61), the compound transaction grammar
static STATEMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<year>\d{2})(?P<month>\d{2})(?P<day>\d{2})", // value date
        r"((?P<entry_month>\d{2})(?P<entry_day>\d{2}))?",  // entry date
        r"(?P<dc>R?[DC])(?P<funds>[A-Z])?",                // indicator + funds code
        r"(?P<amount>[0-9,]{0,16})",                       // amount
        r"(?P<tx_type>[A-Z][A-Z0-9]{3})",                  // transaction type
        r"(?P<reference>[^/\n]{0,16})",                    // customer reference
        r"(//(?P<bank_reference>.{0,16}))?",               // bank reference
        r"(\n(?P<extra>.{0,34}))?",                        // extra details
    ))
    .unwrap()
});

/// Transaction details narrative (86), up to 390 chars across line breaks
static NARRATIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^(?P<value>.{0,390})").unwrap());

/// Message block (MB) markers: the `-}` terminator or a `{<digit>:` sub-block
/// opener. Applied repeatedly over the content, not once.
static BLOCK_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?P<eob>-\})|\{(?P<id>\d):").unwrap());

/// The closed set of known tag kinds.
///
/// One variant per concrete tag grammar; the registry is built over exactly
/// this set. The primary id is a small positive integer for all kinds except
/// the two alphabetic ones (`NS`, `MB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    TransactionReferenceNumber,
    RelatedReference,
    AccountIdentification,
    StatementNumber,
    NonSwift,
    OpeningBalance,
    StatementLine,
    ClosingBalance,
    ClosingAvailableBalance,
    ForwardAvailableBalance,
    TransactionDetails,
    MessageBlock,
}

impl TagKind {
    /// Every known kind, in tag-id order. The registry is built from this.
    pub const ALL: [TagKind; 12] = [
        TagKind::TransactionReferenceNumber,
        TagKind::RelatedReference,
        TagKind::AccountIdentification,
        TagKind::StatementNumber,
        TagKind::NonSwift,
        TagKind::OpeningBalance,
        TagKind::StatementLine,
        TagKind::ClosingBalance,
        TagKind::ClosingAvailableBalance,
        TagKind::ForwardAvailableBalance,
        TagKind::TransactionDetails,
        TagKind::MessageBlock,
    ];

    /// Canonical tag id as it appears in a message (`20`, `61`, `NS`, ...)
    pub fn id(&self) -> &'static str {
        match self {
            TagKind::TransactionReferenceNumber => "20",
            TagKind::RelatedReference => "21",
            TagKind::AccountIdentification => "25",
            TagKind::StatementNumber => "28",
            TagKind::NonSwift => "NS",
            TagKind::OpeningBalance => "60",
            TagKind::StatementLine => "61",
            TagKind::ClosingBalance => "62",
            TagKind::ClosingAvailableBalance => "64",
            TagKind::ForwardAvailableBalance => "65",
            TagKind::TransactionDetails => "86",
            TagKind::MessageBlock => "MB",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            TagKind::TransactionReferenceNumber | TagKind::RelatedReference => &REFERENCE,
            TagKind::AccountIdentification => &ACCOUNT,
            TagKind::StatementNumber => &STATEMENT_NUMBER,
            TagKind::NonSwift => &NON_SWIFT,
            TagKind::OpeningBalance
            | TagKind::ClosingBalance
            | TagKind::ClosingAvailableBalance
            | TagKind::ForwardAvailableBalance => &BALANCE,
            TagKind::StatementLine => &STATEMENT_LINE,
            TagKind::TransactionDetails => &NARRATIVE,
            TagKind::MessageBlock => &BLOCK_MARK,
        }
    }
}

/// An immutable tag definition: what a registry lookup resolves to.
///
/// One definition exists per kind, constructed when the registry is built
/// and shared read-only by all parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDefinition {
    kind: TagKind,
}

impl TagDefinition {
    pub(crate) fn new(kind: TagKind) -> Self {
        TagDefinition { kind }
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Parse one tag's content into a typed record.
    ///
    /// A recognized kind whose content does not match its pattern is a hard
    /// error carrying the tag id and the offending content; no partial field
    /// set is ever returned.
    pub fn parse(&self, content: &str) -> Result<ParsedTag, TagError> {
        let fields = if self.kind == TagKind::MessageBlock {
            extract_blocks(content).ok_or_else(|| self.unparsable(content))?
        } else {
            let caps = self
                .kind
                .pattern()
                .captures(content)
                .ok_or_else(|| self.unparsable(content))?;
            self.extract_fields(&caps)?
        };

        Ok(ParsedTag::new(self.kind, content, fields))
    }

    fn unparsable(&self, content: &str) -> TagError {
        TagError::Unparsable {
            id: self.id().to_string(),
            content: content.to_string(),
        }
    }

    fn extract_fields(&self, caps: &Captures<'_>) -> Result<Fields, TagError> {
        let fields = match self.kind {
            TagKind::TransactionReferenceNumber => single_field("transactionReference", caps),
            TagKind::RelatedReference => single_field("relatedReference", caps),
            TagKind::AccountIdentification => single_field("accountIdentification", caps),
            TagKind::NonSwift => single_field("nonSwift", caps),
            TagKind::TransactionDetails => single_field("transactionDetails", caps),
            TagKind::StatementNumber => extract_statement_number(caps),
            TagKind::OpeningBalance
            | TagKind::ClosingBalance
            | TagKind::ClosingAvailableBalance
            | TagKind::ForwardAvailableBalance => extract_balance(caps)?,
            TagKind::StatementLine => extract_statement_line(caps)?,
            // Message blocks take the repeated-match path in `parse` and
            // never reach single-shot extraction
            TagKind::MessageBlock => Fields::new(),
        };
        Ok(fields)
    }
}

/// Named capture as text, empty when the group did not participate.
///
/// Optional groups deliberately collapse to `""` rather than an absent
/// field, so downstream consumers never need null-handling.
fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn single_field(name: &str, caps: &Captures<'_>) -> Fields {
    let mut fields = Fields::new();
    fields.insert(name.to_string(), FieldValue::from(group(caps, "value")));
    fields
}

fn extract_statement_number(caps: &Captures<'_>) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        "statementNumber".to_string(),
        FieldValue::from(group(caps, "statement")),
    );
    fields.insert(
        "sequenceNumber".to_string(),
        FieldValue::from(group(caps, "sequence")),
    );
    fields.insert(
        "sectionNumber".to_string(),
        FieldValue::from(group(caps, "section")),
    );
    fields
}

/// Shared extraction for the whole balance family; the four kinds differ
/// only in identity, never in grammar.
fn extract_balance(caps: &Captures<'_>) -> Result<Fields, TagError> {
    let date = helpers::date::parse(group(caps, "year"), group(caps, "month"), group(caps, "day"))?;
    let amount = helpers::amount::parse(group(caps, "dc"), group(caps, "amount"))?;

    let mut fields = Fields::new();
    fields.insert("date".to_string(), FieldValue::Date(date));
    fields.insert(
        "currency".to_string(),
        FieldValue::from(group(caps, "currency")),
    );
    fields.insert("amount".to_string(), FieldValue::Amount(amount));
    Ok(fields)
}

fn extract_statement_line(caps: &Captures<'_>) -> Result<Fields, TagError> {
    let year = group(caps, "year");
    let date = helpers::date::parse(year, group(caps, "month"), group(caps, "day"))?;

    // The entry date carries month and day only; it reuses the value date's year
    let entry_date = match (caps.name("entry_month"), caps.name("entry_day")) {
        (Some(month), Some(day)) => {
            FieldValue::Date(helpers::date::parse(year, month.as_str(), day.as_str())?)
        }
        _ => FieldValue::from(""),
    };

    let dc = group(caps, "dc");
    let amount = helpers::amount::parse(dc, group(caps, "amount"))?;

    let mut fields = Fields::new();
    fields.insert("date".to_string(), FieldValue::Date(date));
    fields.insert("entryDate".to_string(), entry_date);
    fields.insert("fundsCode".to_string(), FieldValue::from(group(caps, "funds")));
    fields.insert("amount".to_string(), FieldValue::Amount(amount));
    fields.insert(
        "isReversal".to_string(),
        FieldValue::Flag(dc.starts_with('R')),
    );
    fields.insert(
        "transactionType".to_string(),
        FieldValue::from(group(caps, "tx_type")),
    );
    fields.insert(
        "reference".to_string(),
        FieldValue::from(group(caps, "reference")),
    );
    fields.insert(
        "bankReference".to_string(),
        FieldValue::from(group(caps, "bank_reference")),
    );
    fields.insert("extraDetails".to_string(), FieldValue::from(group(caps, "extra")));
    Ok(fields)
}

/// Repeated-match extraction for message blocks.
///
/// Scans the content for successive markers (sub-block openers `{<digit>:`
/// and the `-}` terminator). A sub-block's body runs from its opener to the
/// next marker or the end of the content, minus the `}` that closes it; the
/// terminator records an `EOB` field with an empty value. Each call re-scans
/// from the start of the content, so extraction is independently
/// restartable. Returns `None` when no marker exists at all - content
/// without a single block is not a message block.
fn extract_blocks(content: &str) -> Option<Fields> {
    let marks: Vec<(std::ops::Range<usize>, Option<String>)> = BLOCK_MARK
        .captures_iter(content)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let id = caps.name("id").map(|m| m.as_str().to_string());
            Some((full.range(), id))
        })
        .collect();

    if marks.is_empty() {
        return None;
    }

    let mut fields = Fields::new();
    for (index, (range, id)) in marks.iter().enumerate() {
        match id {
            None => {
                fields.insert("EOB".to_string(), FieldValue::from(""));
            }
            Some(id) => {
                let stop = marks
                    .get(index + 1)
                    .map_or(content.len(), |(next, _)| next.start);
                let body = &content[range.end..stop];
                let body = body.strip_suffix('}').unwrap_or(body);
                fields.insert(id.clone(), FieldValue::from(body));
            }
        }
    }
    Some(fields)
}
