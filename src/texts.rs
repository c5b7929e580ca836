// 📝 Text Units - input records and tagged output
//
// Input: CSV with an `id,body` header, or JSON (lines or one array) carrying
// either {"id", "body"} or a submission-style {"id", "title", "selftext"}.
// Output: one JSON object per tagged unit.

use crate::resolver::TaggedText;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One unit of text to tag; `id` is opaque and only used for correlation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub id: String,
    pub body: String,
}

impl TextUnit {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        TextUnit {
            id: id.into(),
            body: body.into(),
        }
    }

    /// Submission: title and self text joined with a single space
    pub fn from_submission(id: impl Into<String>, title: &str, selftext: &str) -> Self {
        TextUnit::new(id, format!("{} {}", title, selftext))
    }
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    id: String,
    body: Option<String>,
    title: Option<String>,
    selftext: Option<String>,
}

impl JsonRecord {
    fn into_unit(self) -> Result<TextUnit> {
        match (self.body, self.title) {
            (Some(body), _) => Ok(TextUnit::new(self.id, body)),
            (None, Some(title)) => Ok(TextUnit::from_submission(
                self.id,
                &title,
                self.selftext.as_deref().unwrap_or(""),
            )),
            (None, None) => Err(anyhow!("record {} has neither body nor title", self.id)),
        }
    }
}

/// Load text units, picking the format from the file extension
pub fn load_texts(path: &Path) -> Result<Vec<TextUnit>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => load_csv(path),
        Some("jsonl") | Some("ndjson") => load_json_lines(path),
        Some("json") => load_json_array(path),
        _ => bail!("Unsupported text file (expected .csv, .jsonl or .json): {:?}", path),
    }
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<TextUnit>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut units = Vec::new();
    for result in rdr.deserialize() {
        let unit: TextUnit = result.context("Failed to deserialize text unit")?;
        units.push(unit);
    }

    Ok(units)
}

pub fn load_json_lines(path: &Path) -> Result<Vec<TextUnit>> {
    let file = File::open(path).with_context(|| format!("Failed to open JSON lines file: {:?}", path))?;

    let mut units = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: JsonRecord =
            serde_json::from_str(&line).with_context(|| format!("Malformed record on line {}", number + 1))?;
        units.push(record.into_unit()?);
    }

    Ok(units)
}

/// A single JSON document holding an array of records
pub fn load_json_array(path: &Path) -> Result<Vec<TextUnit>> {
    let file = File::open(path).with_context(|| format!("Failed to open JSON file: {:?}", path))?;

    let records: Vec<JsonRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Expected a JSON array of text records in {:?}", path))?;

    records.into_iter().map(JsonRecord::into_unit).collect()
}

/// Write one JSON object per tagged unit
pub fn write_tagged<W: Write>(mut writer: W, tagged: &[TaggedText]) -> Result<usize> {
    for item in tagged {
        serde_json::to_writer(&mut writer, item).context("Failed to serialize tagged text")?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(tagged.len())
}

// ============================================================================
// TESTS
// ============================================================================
