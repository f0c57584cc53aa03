//! CSV ingestion for the cleaned comment and submission tables
//!
//! Both tables arrive as CSV with headers. Comments deserialize into the
//! typed [`Comment`] model (extra columns ignored); submissions stay as
//! raw records so every upstream column passes through to the report
//! untouched, with metric columns appended at the end.

use crate::models::Comment;
use anyhow::{bail, Context, Result};
use csv::StringRecord;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Load the comment table from a CSV file.
pub fn load_comments(path: &Path) -> Result<Vec<Comment>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open comments file {}", path.display()))?;
    load_comments_from_reader(file)
        .with_context(|| format!("failed to read comments from {}", path.display()))
}

/// Load the comment table from any CSV reader.
pub fn load_comments_from_reader<R: Read>(reader: R) -> Result<Vec<Comment>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut comments = Vec::new();
    for (i, row) in csv_reader.deserialize::<Comment>().enumerate() {
        let comment: Comment = row.with_context(|| format!("comment row {}", i + 1))?;
        comments.push(comment);
    }
    debug!(rows = comments.len(), "loaded comment table");
    Ok(comments)
}

/// The submission table, kept as raw records for passthrough output.
///
/// Only the `id` column is interpreted; `selftext` is located when
/// present so an injected classifier has something to read.
#[derive(Debug)]
pub struct SubmissionTable {
    headers: StringRecord,
    id_index: usize,
    text_index: Option<usize>,
    records: Vec<StringRecord>,
}

impl SubmissionTable {
    /// Load the submission table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open submissions file {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to read submissions from {}", path.display()))
    }

    /// Load the submission table from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers().context("submission headers")?.clone();

        let Some(id_index) = headers.iter().position(|h| h == "id") else {
            bail!("submission table has no 'id' column");
        };
        let text_index = headers.iter().position(|h| h == "selftext");

        let mut records = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            let record = row.with_context(|| format!("submission row {}", i + 1))?;
            records.push(record);
        }
        debug!(rows = records.len(), "loaded submission table");

        Ok(Self {
            headers,
            id_index,
            text_index,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    /// Submission ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        let id_index = self.id_index;
        self.records
            .iter()
            .map(move |r| r.get(id_index).unwrap_or(""))
    }

    /// The id of one record.
    pub fn id_of<'a>(&self, record: &'a StringRecord) -> &'a str {
        record.get(self.id_index).unwrap_or("")
    }

    /// The submission's own text, when the table carries a `selftext`
    /// column.
    pub fn text_of<'a>(&self, record: &'a StringRecord) -> Option<&'a str> {
        self.text_index.and_then(|i| record.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMENTS_CSV: &str = "\
id,parent_id,link_id,author,created_utc,controversiality,body,score
c1,s1,s1,alice,2015-05-01T10:00:00,0,hello,4
c2,c1,s1,bob,2015-05-01T11:00:00,1,reply,1
";

    #[test]
    fn test_load_comments_ignores_extra_columns() {
        let comments = load_comments_from_reader(COMMENTS_CSV.as_bytes()).expect("load");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "c1");
        assert_eq!(comments[1].controversiality, 1);
        assert_eq!(comments[1].body.as_deref(), Some("reply"));
    }

    #[test]
    fn test_submission_table_passthrough() {
        let csv = "id,title,selftext,score\ns1,First,hello there,10\ns2,Second,,3\n";
        let table = SubmissionTable::from_reader(csv.as_bytes()).expect("load");
        assert_eq!(table.len(), 2);
        assert_eq!(table.ids().collect::<Vec<_>>(), vec!["s1", "s2"]);
        assert_eq!(table.headers().len(), 4);
        assert_eq!(table.text_of(&table.records()[0]), Some("hello there"));
    }

    #[test]
    fn test_submission_table_requires_id() {
        let csv = "title,score\nFirst,10\n";
        let err = SubmissionTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("id"));
    }
}
