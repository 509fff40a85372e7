//! Sectioned CSV ledger format
//!
//! A ledger file holds three labelled sections in fixed order, each with a
//! header row followed by one positional row per record:
//!
//! ```text
//! === Accounts ===
//! id,name,balance
//! 0,Test,80.0
//!
//! === Categories ===
//! id,name,isPositive
//! 0,Test cat,true
//!
//! === Operations ===
//! id,type,amount,accountId,date,categoryId,description
//! 0,false,20.0,0,2024-05-17T12:30:00,0,lunch
//! ```
//!
//! No quoting or escaping is performed. A comma inside a name shifts the
//! remaining columns and the row fails to parse; a comma inside the trailing
//! description is preserved because extra fields are folded back into it.

use crate::io::codec::LedgerCodec;
use crate::io::document::{AccountRecord, CategoryRecord, LedgerDocument, OperationRecord};
use crate::types::{AccountId, CategoryId, LedgerError, LedgerFormat, OperationId, Result};
use chrono::NaiveDateTime;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use log::warn;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

pub const ACCOUNT_HEADER: [&str; 3] = ["id", "name", "balance"];
pub const CATEGORY_HEADER: [&str; 3] = ["id", "name", "isPositive"];
pub const OPERATION_HEADER: [&str; 7] = [
    "id",
    "type",
    "amount",
    "accountId",
    "date",
    "categoryId",
    "description",
];

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Codec for the sectioned CSV format
#[derive(Debug, Clone, Copy)]
pub struct CsvCodec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Accounts,
    Categories,
    Operations,
}

impl SectionKind {
    fn label(self) -> &'static str {
        match self {
            SectionKind::Accounts => "Accounts",
            SectionKind::Categories => "Categories",
            SectionKind::Operations => "Operations",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Accounts" => Some(SectionKind::Accounts),
            "Categories" => Some(SectionKind::Categories),
            "Operations" => Some(SectionKind::Operations),
            _ => None,
        }
    }
}

/// Non-blank lines of one section, tagged with their line numbers in the file
#[derive(Debug)]
struct Section {
    kind: SectionKind,
    lines: Vec<(u64, String)>,
}

impl Section {
    /// File line number of the `n`th (1-based) line of this section's body
    fn file_line(&self, n: u64) -> Option<u64> {
        self.body_line(n).map(|(line, _)| *line)
    }

    fn raw_text(&self, n: u64) -> Option<&str> {
        self.body_line(n).map(|(_, text)| text.as_str())
    }

    fn body_line(&self, n: u64) -> Option<&(u64, String)> {
        let index = usize::try_from(n.checked_sub(1)?).ok()?;
        self.lines.get(index)
    }

    fn error_at(&self, line: Option<u64>, message: impl Into<String>) -> LedgerError {
        LedgerError::Parse {
            format: LedgerFormat::Csv,
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    #[serde(deserialize_with = "trimmed")]
    id: AccountId,
    name: String,
    balance: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    #[serde(deserialize_with = "trimmed")]
    id: CategoryId,
    name: String,
    #[serde(deserialize_with = "trimmed")]
    is_positive: bool,
}

#[derive(Debug, Deserialize)]
struct OperationRow {
    #[serde(deserialize_with = "trimmed")]
    id: OperationId,
    #[serde(deserialize_with = "trimmed")]
    is_credit: bool,
    amount: String,
    #[serde(deserialize_with = "trimmed")]
    account_id: AccountId,
    date: String,
    #[serde(deserialize_with = "trimmed")]
    category_id: CategoryId,
    #[serde(default)]
    description: Option<String>,
}

impl LedgerCodec for CsvCodec {
    fn format(&self) -> LedgerFormat {
        LedgerFormat::Csv
    }

    fn encode(&self, document: &LedgerDocument, output: &mut dyn Write) -> Result<()> {
        let accounts = document.accounts.iter().map(|a| {
            vec![a.id.to_string(), a.name.clone(), a.balance.to_string()]
        });
        write_section(output, SectionKind::Accounts, &ACCOUNT_HEADER, accounts)?;
        writeln!(output)?;

        let categories = document.categories.iter().map(|c| {
            vec![c.id.to_string(), c.name.clone(), c.is_positive.to_string()]
        });
        write_section(output, SectionKind::Categories, &CATEGORY_HEADER, categories)?;
        writeln!(output)?;

        let operations = document.operations.iter().map(|o| {
            vec![
                o.id.to_string(),
                o.is_credit.to_string(),
                o.amount.to_string(),
                o.account_id.to_string(),
                o.date.format(DATE_FORMAT).to_string(),
                o.category_id.to_string(),
                o.description.clone().unwrap_or_default(),
            ]
        });
        write_section(output, SectionKind::Operations, &OPERATION_HEADER, operations)?;

        output.flush()?;
        Ok(())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<LedgerDocument> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;

        let mut document = LedgerDocument::default();
        for section in split_sections(&text)? {
            match section.kind {
                SectionKind::Accounts => {
                    for (line, row) in read_rows::<AccountRow>(&section, None)? {
                        document.accounts.push(AccountRecord {
                            id: row.id,
                            name: row.name,
                            balance: parse_decimal(&section, line, &row.balance)?,
                        });
                    }
                }
                SectionKind::Categories => {
                    for (_, row) in read_rows::<CategoryRow>(&section, None)? {
                        document.categories.push(CategoryRecord {
                            id: row.id,
                            name: row.name,
                            is_positive: row.is_positive,
                        });
                    }
                }
                SectionKind::Operations => {
                    let rows =
                        read_rows::<OperationRow>(&section, Some(OPERATION_HEADER.len()))?;
                    for (line, row) in rows {
                        let date = NaiveDateTime::from_str(row.date.trim()).map_err(|e| {
                            section.error_at(
                                line,
                                format!("invalid date '{}': {}", row.date, e),
                            )
                        })?;
                        document.operations.push(OperationRecord {
                            id: row.id,
                            is_credit: row.is_credit,
                            amount: parse_decimal(&section, line, &row.amount)?,
                            account_id: row.account_id,
                            date,
                            category_id: row.category_id,
                            description: row.description.filter(|d| !d.is_empty()),
                        });
                    }
                }
            }
        }

        Ok(document)
    }
}

/// Write one labelled section: label line, header row, then records
fn write_section<I>(
    output: &mut dyn Write,
    kind: SectionKind,
    header: &[&str],
    records: I,
) -> Result<()>
where
    I: Iterator<Item = Vec<String>>,
{
    writeln!(output, "=== {} ===", kind.label())?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(&mut *output);
    writer.write_record(header)?;

    for record in records {
        if record.iter().any(|field| field.contains([',', '\n', '\r'])) {
            warn!(
                "{} record '{}' contains a delimiter and will not import cleanly",
                kind.label(),
                record.join(",")
            );
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Group non-blank lines into labelled sections
///
/// Record lines are kept verbatim; only blank and label lines are trimmed.
fn split_sections(text: &str) -> Result<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index as u64 + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("===") {
            let label = line.trim_matches('=').trim();
            let kind = SectionKind::from_label(label).ok_or_else(|| LedgerError::Parse {
                format: LedgerFormat::Csv,
                line: Some(line_number),
                message: format!("unknown section '{}'", label),
            })?;
            sections.push(Section {
                kind,
                lines: Vec::new(),
            });
            continue;
        }

        match sections.last_mut() {
            Some(section) => section.lines.push((line_number, raw.to_string())),
            None => {
                return Err(LedgerError::Parse {
                    format: LedgerFormat::Csv,
                    line: Some(line_number),
                    message: "record outside of any section".to_string(),
                })
            }
        }
    }

    Ok(sections)
}

/// Deserialize the positional rows of a section, skipping its header row
///
/// With `width` set, a row with more than `width` fields gets everything
/// after the `width - 1`th comma of its raw text as its last column.
fn read_rows<T: DeserializeOwned>(
    section: &Section,
    width: Option<usize>,
) -> Result<Vec<(Option<u64>, T)>> {
    let body = section
        .lines
        .iter()
        .map(|(_, line)| line.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().and_then(|pos| section.file_line(pos.line()));
            section.error_at(line, e.to_string())
        })?;
        let body_line = record.position().map(|pos| pos.line());
        let line = body_line.and_then(|n| section.file_line(n));

        let record = match width {
            Some(width) if width > 0 && record.len() > width => {
                let raw = body_line.and_then(|n| section.raw_text(n));
                fold_trailing(&record, width, raw)
            }
            _ => record,
        };

        let row: T = record
            .deserialize(None)
            .map_err(|e| section.error_at(line, e.to_string()))?;
        rows.push((line, row));
    }

    Ok(rows)
}

fn fold_trailing(record: &StringRecord, width: usize, raw: Option<&str>) -> StringRecord {
    let mut folded: StringRecord = record.iter().take(width - 1).collect();
    let tail = match raw.and_then(|text| text.splitn(width, ',').nth(width - 1)) {
        Some(tail) => tail.to_string(),
        None => record.iter().skip(width - 1).collect::<Vec<_>>().join(","),
    };
    folded.push_field(&tail);
    folded.set_position(record.position().cloned());
    folded
}

/// Parse an id or flag column, ignoring padding around it
///
/// Text columns are deserialized as-is so names keep their spacing.
fn trimmed<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = String::deserialize(deserializer)?;
    text.trim().parse().map_err(serde::de::Error::custom)
}

fn parse_decimal(section: &Section, line: Option<u64>, value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| section.error_at(line, format!("invalid number '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap()
    }

    fn sample_document() -> LedgerDocument {
        LedgerDocument {
            accounts: vec![AccountRecord {
                id: 0,
                name: "Test".into(),
                balance: Decimal::new(800, 1),
            }],
            categories: vec![CategoryRecord {
                id: 0,
                name: "Test cat".into(),
                is_positive: true,
            }],
            operations: vec![OperationRecord {
                id: 0,
                is_credit: false,
                amount: Decimal::new(200, 1),
                account_id: 0,
                date: noon(),
                category_id: 0,
                description: None,
            }],
        }
    }

    fn encode(document: &LedgerDocument) -> String {
        let mut output = Vec::new();
        CsvCodec.encode(document, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn decode(text: &str) -> Result<LedgerDocument> {
        CsvCodec.decode(&mut text.as_bytes())
    }

    #[test]
    fn test_encode_layout() {
        let expected = "\
=== Accounts ===
id,name,balance
0,Test,80.0

=== Categories ===
id,name,isPositive
0,Test cat,true

=== Operations ===
id,type,amount,accountId,date,categoryId,description
0,false,20.0,0,2024-05-17T12:30:00,0,
";

        assert_eq!(encode(&sample_document()), expected);
    }

    #[test]
    fn test_encode_empty_document_keeps_headers() {
        let text = encode(&LedgerDocument::default());

        assert_eq!(
            text,
            "=== Accounts ===\nid,name,balance\n\n\
             === Categories ===\nid,name,isPositive\n\n\
             === Operations ===\nid,type,amount,accountId,date,categoryId,description\n"
        );
        assert!(decode(&text).unwrap().is_empty());
    }

    #[test]
    fn test_decode_reverses_encode() {
        let mut document = sample_document();
        document.operations[0].description = Some("lunch".into());

        assert_eq!(decode(&encode(&document)).unwrap(), document);
    }

    #[test]
    fn test_decode_keeps_exact_decimal_text() {
        let text = "=== Accounts ===\nid,name,balance\n3,Savings,1234567890.123456789\n";

        let document = decode(text).unwrap();

        assert_eq!(
            document.accounts[0].balance,
            Decimal::from_str("1234567890.123456789").unwrap()
        );
    }

    #[rstest]
    #[case::missing_description("0,true,5,0,2024-05-17T12:30:00,0", None)]
    #[case::empty_description("0,true,5,0,2024-05-17T12:30:00,0,", None)]
    #[case::plain_description("0,true,5,0,2024-05-17T12:30:00,0,rent", Some("rent"))]
    #[case::comma_in_description("0,true,5,0,2024-05-17T12:30:00,0,rent, march", Some("rent, march"))]
    fn test_decode_description(#[case] row: &str, #[case] expected: Option<&str>) {
        let text = format!("=== Operations ===\n{}\n{}\n", OPERATION_HEADER.join(","), row);

        let document = decode(&text).unwrap();

        assert_eq!(document.operations[0].description.as_deref(), expected);
    }

    #[test]
    fn test_decode_tolerates_blank_lines_and_padded_columns() {
        let text = "\n\n  === Categories ===  \n\n id,name,isPositive \n 4 ,Salary, true \n\n";

        let document = decode(text).unwrap();

        assert_eq!(
            document.categories,
            vec![CategoryRecord { id: 4, name: "Salary".into(), is_positive: true }]
        );
    }

    #[test]
    fn test_text_columns_keep_surrounding_spaces() {
        let mut document = sample_document();
        document.accounts[0].name = " Padded name ".into();
        document.categories[0].name = "  Food".into();
        document.operations[0].description = Some(" lunch, with tip ".into());

        let decoded = decode(&encode(&document)).unwrap();

        assert_eq!(decoded, document);
        assert_eq!(decoded.accounts[0].name, " Padded name ");
    }

    #[rstest]
    #[case::padded_amount(" 20.0 ", " 2024-05-17T12:30:00 ")]
    #[case::tight(" 20.0", "2024-05-17T12:30:00")]
    fn test_decode_trims_number_and_date_columns(#[case] amount: &str, #[case] date: &str) {
        let text = format!(
            "=== Operations ===\n{}\n0, false,{},0,{},0,\n",
            OPERATION_HEADER.join(","),
            amount,
            date
        );

        let document = decode(&text).unwrap();

        assert_eq!(document.operations, sample_document().operations);
    }

    #[rstest]
    #[case::bad_balance("=== Accounts ===\nid,name,balance\n0,Cash,abc\n", Some(3))]
    #[case::comma_in_name("=== Accounts ===\nid,name,balance\n\n0,Cash, Box,5\n", Some(4))]
    #[case::bad_id("=== Categories ===\nid,name,isPositive\nx,Food,true\n", Some(3))]
    #[case::bad_date(
        "=== Operations ===\nid,type,amount,accountId,date,categoryId,description\n0,true,1,0,yesterday,0,\n",
        Some(3)
    )]
    #[case::unknown_section("=== Budgets ===\nid\n", Some(1))]
    #[case::row_before_section("0,Cash,5\n", Some(1))]
    fn test_decode_errors_report_line(#[case] text: &str, #[case] expected_line: Option<u64>) {
        match decode(text) {
            Err(LedgerError::Parse { format, line, .. }) => {
                assert_eq!(format, LedgerFormat::Csv);
                assert_eq!(line, expected_line);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
