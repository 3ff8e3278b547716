// src/reviews/export.rs
//! CSV export/import of scraped reviews (`review,star_rating`).

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use super::ReviewRecord;

pub fn write_csv<W: Write>(writer: W, reviews: &[ReviewRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if reviews.is_empty() {
        wtr.write_record(["review", "star_rating"])?;
    }
    for review in reviews {
        wtr.serialize(review).context("Failed to write review row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn to_csv_bytes(reviews: &[ReviewRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, reviews)?;
    Ok(buffer)
}

/// Read reviews back. Rows whose review or rating is blank are skipped.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ReviewRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut reviews = Vec::new();

    for (index, row) in rdr.deserialize::<ReviewRecord>().enumerate() {
        let record = row.context("Invalid review row")?;
        if record.review.trim().is_empty() || record.star_rating.trim().is_empty() {
            debug!("Skipping CSV row {} without review or rating", index + 1);
            continue;
        }
        reviews.push(record);
    }

    Ok(reviews)
}

pub fn save_csv(path: &Path, reviews: &[ReviewRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, reviews)
}

pub fn load_csv(path: &Path) -> Result<Vec<ReviewRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_csv(file)
}
