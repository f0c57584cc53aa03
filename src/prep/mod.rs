//! Table preparation for raw discussion dumps
//!
//! Raw exports carry epoch timestamps, type-prefixed ids (`t1_`/`t3_`),
//! holes in text and score columns, and a pile of columns the analysis
//! never reads. Each step here is a pure function from one table to a
//! new one — inputs are never mutated — and `prepare_comments` /
//! `prepare_submissions` compose them into the contract the `analyze`
//! stage assumes.

use anyhow::{Context, Result};
use chrono::DateTime;
use csv::StringRecord;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Filler for missing text fields.
pub const NO_TEXT: &str = "[no_text]";

/// Submission columns the analysis never reads.
pub const SUBMISSION_DROP_COLUMNS: &[&str] = &["ups", "downs", "num_comments", "permalink"];

/// Comment columns the analysis never reads.
pub const COMMENT_DROP_COLUMNS: &[&str] = &[
    "score_hidden",
    "archived",
    "name",
    "downs",
    "ups",
    "subreddit_id",
    "author_flair_css_class",
    "year_month",
    "distinguished",
];

/// A raw CSV table: headers plus untyped records.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(headers: StringRecord, records: Vec<StringRecord>) -> Self {
        Self { headers, records }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("failed to read {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers().context("table headers")?.clone();
        let mut records = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            records.push(row.with_context(|| format!("row {}", i + 1))?);
        }
        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of a named column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for record in &self.records {
            csv_writer.write_record(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.write_to(file)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Remove the named columns. Absent names are ignored.
pub fn drop_columns(table: &RawTable, columns: &[&str]) -> RawTable {
    let keep: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !columns.contains(h))
        .map(|(i, _)| i)
        .collect();

    let headers: StringRecord = keep
        .iter()
        .filter_map(|&i| table.headers.get(i))
        .collect();
    let records = table
        .records
        .iter()
        .map(|r| keep.iter().filter_map(|&i| r.get(i)).collect())
        .collect();
    RawTable::new(headers, records)
}

/// Fill empty cells in the named columns with fixed values.
///
/// Columns the table does not have are ignored.
pub fn fill_missing(table: &RawTable, fills: &[(&str, &str)]) -> RawTable {
    let targets: Vec<(usize, &str)> = fills
        .iter()
        .filter_map(|(name, value)| table.column(name).map(|i| (i, *value)))
        .collect();

    let records = table
        .records
        .iter()
        .map(|r| {
            r.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if cell.is_empty() {
                        targets
                            .iter()
                            .find(|(t, _)| *t == i)
                            .map(|(_, v)| *v)
                            .unwrap_or(cell)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();
    RawTable::new(table.headers.clone(), records)
}

/// Convert epoch-second columns to ISO-8601 (UTC, second precision).
///
/// Accepts integer or fractional epochs. Absent columns are ignored; a
/// cell that is neither empty nor a number is a fatal prep error.
pub fn epoch_to_iso(table: &RawTable, columns: &[&str]) -> Result<RawTable> {
    let targets: Vec<usize> = columns.iter().filter_map(|c| table.column(c)).collect();

    let mut records = Vec::with_capacity(table.records.len());
    for (row, record) in table.records.iter().enumerate() {
        let converted: Result<StringRecord> = record
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if !targets.contains(&i) || cell.is_empty() {
                    return Ok(cell.to_string());
                }
                let epoch: f64 = cell
                    .parse()
                    .with_context(|| format!("non-numeric epoch '{cell}' in row {}", row + 1))?;
                let ts = DateTime::from_timestamp(epoch.trunc() as i64, 0)
                    .with_context(|| format!("epoch '{cell}' out of range in row {}", row + 1))?;
                Ok(ts.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
            })
            .collect();
        records.push(converted?);
    }
    Ok(RawTable::new(table.headers.clone(), records))
}

/// Strip the `tN_` fullname prefix from the named id columns.
///
/// `t1_abc` becomes `abc`; a value without the prefix shape is left
/// alone so already-prepared tables pass through unchanged.
pub fn strip_type_prefix(table: &RawTable, columns: &[&str]) -> RawTable {
    let targets: Vec<usize> = columns.iter().filter_map(|c| table.column(c)).collect();

    let records = table
        .records
        .iter()
        .map(|r| {
            r.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if targets.contains(&i) {
                        strip_prefix(cell)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();
    RawTable::new(table.headers.clone(), records)
}

fn strip_prefix(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() > 3 && bytes[0] == b't' && bytes[1].is_ascii_digit() && bytes[2] == b'_' {
        &value[3..]
    } else {
        value
    }
}

/// Full preparation for a raw comment table.
pub fn prepare_comments(table: &RawTable) -> Result<RawTable> {
    let table = drop_columns(table, COMMENT_DROP_COLUMNS);
    let table = fill_missing(
        &table,
        &[
            ("body", NO_TEXT),
            ("author_flair_text", NO_TEXT),
            ("score", "0"),
        ],
    );
    let table = epoch_to_iso(&table, &["created_utc", "retrieved_on"])?;
    let table = strip_type_prefix(&table, &["parent_id", "link_id"]);
    debug!(rows = table.len(), "prepared comment table");
    Ok(table)
}

/// Full preparation for a raw submission table.
pub fn prepare_submissions(table: &RawTable) -> Result<RawTable> {
    let table = drop_columns(table, SUBMISSION_DROP_COLUMNS);
    let table = fill_missing(&table, &[("selftext", NO_TEXT), ("score", "0")]);
    debug!(rows = table.len(), "prepared submission table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> RawTable {
        RawTable::from_reader(csv.as_bytes()).expect("parse")
    }

    fn cell<'a>(t: &'a RawTable, row: usize, col: &str) -> &'a str {
        t.records()[row].get(t.column(col).expect("column")).unwrap()
    }

    #[test]
    fn test_drop_columns() {
        let t = table("id,ups,downs,title\na,1,2,hello\n");
        let out = drop_columns(&t, &["ups", "downs", "missing"]);
        assert_eq!(
            out.headers().iter().collect::<Vec<_>>(),
            vec!["id", "title"]
        );
        assert_eq!(cell(&out, 0, "title"), "hello");
    }

    #[test]
    fn test_fill_missing() {
        let t = table("id,body,score\na,,\nb,text,5\n");
        let out = fill_missing(&t, &[("body", NO_TEXT), ("score", "0")]);
        assert_eq!(cell(&out, 0, "body"), NO_TEXT);
        assert_eq!(cell(&out, 0, "score"), "0");
        assert_eq!(cell(&out, 1, "body"), "text");
        assert_eq!(cell(&out, 1, "score"), "5");
    }

    #[test]
    fn test_epoch_to_iso() {
        let t = table("id,created_utc\na,0\nb,1430478000.0\n");
        let out = epoch_to_iso(&t, &["created_utc"]).expect("convert");
        assert_eq!(cell(&out, 0, "created_utc"), "1970-01-01T00:00:00");
        assert_eq!(cell(&out, 1, "created_utc"), "2015-05-01T11:00:00");
    }

    #[test]
    fn test_epoch_to_iso_rejects_garbage() {
        let t = table("id,created_utc\na,yesterday\n");
        assert!(epoch_to_iso(&t, &["created_utc"]).is_err());
    }

    #[test]
    fn test_strip_type_prefix() {
        let t = table("id,parent_id,link_id\nc1,t1_abc,t3_s1\nc2,already_bare,s1\n");
        let out = strip_type_prefix(&t, &["parent_id", "link_id"]);
        assert_eq!(cell(&out, 0, "parent_id"), "abc");
        assert_eq!(cell(&out, 0, "link_id"), "s1");
        // no tN_ shape: untouched
        assert_eq!(cell(&out, 1, "parent_id"), "already_bare");
        assert_eq!(cell(&out, 1, "link_id"), "s1");
    }

    #[test]
    fn test_prepare_comments_composes() {
        let t = table(
            "id,parent_id,link_id,author,created_utc,controversiality,body,ups\n\
             c1,t3_s1,t3_s1,alice,1430478000,0,,4\n",
        );
        let out = prepare_comments(&t).expect("prepare");
        assert!(out.column("ups").is_none());
        assert_eq!(cell(&out, 0, "parent_id"), "s1");
        assert_eq!(cell(&out, 0, "created_utc"), "2015-05-01T11:00:00");
        assert_eq!(cell(&out, 0, "body"), NO_TEXT);
    }

    #[test]
    fn test_prepare_is_pure() {
        let t = table("id,parent_id,link_id,created_utc\nc1,t3_s1,t3_s1,0\n");
        let _ = prepare_comments(&t).expect("prepare");
        // source table is untouched
        assert_eq!(cell(&t, 0, "parent_id"), "t3_s1");
        assert_eq!(cell(&t, 0, "created_utc"), "0");
    }
}
