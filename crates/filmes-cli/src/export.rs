//! Catalog export to CSV and XLSX.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use filmes_db::MovieRecord;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

/// Header row, written even for an empty catalog.
const HEADER: [&str; 10] = [
    "Id",
    "TmdbId",
    "Title",
    "Synopsis",
    "ReleaseDate",
    "OriginalLanguage",
    "Rating",
    "PosterPath",
    "Latitude",
    "Longitude",
];

/// Worksheet holding the catalog in XLSX exports.
const SHEET_NAME: &str = "Filmes";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
    /// Excel workbook.
    Xlsx,
}

impl ExportFormat {
    /// Picks the format from the file extension; anything but `.xlsx` is CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }
}

/// One exported row, in [`HEADER`] order.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: i64,
    tmdb_id: u64,
    title: &'a str,
    synopsis: &'a str,
    release_date: String,
    original_language: &'a str,
    rating: f64,
    poster_path: &'a str,
    latitude: f64,
    longitude: f64,
}

impl<'a> From<&'a MovieRecord> for ExportRow<'a> {
    fn from(movie: &'a MovieRecord) -> Self {
        Self {
            id: movie.id,
            tmdb_id: movie.remote_id.unwrap_or(0),
            title: &movie.title,
            synopsis: &movie.synopsis,
            release_date: movie.release_date.format("%Y-%m-%d").to_string(),
            original_language: &movie.language,
            rating: movie.rating,
            poster_path: &movie.poster_path,
            latitude: movie.latitude,
            longitude: movie.longitude,
        }
    }
}

/// Writes the header and one row per movie to `writer`.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_csv<W: Write>(writer: W, movies: &[MovieRecord]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .context("failed to write CSV header")?;
    for movie in movies {
        csv_writer
            .serialize(ExportRow::from(movie))
            .with_context(|| format!("failed to write CSV row for movie {}", movie.id))?;
    }
    csv_writer.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Builds an XLSX workbook with the header and one row per movie.
///
/// # Errors
///
/// Returns an error if a cell cannot be written or the workbook cannot be
/// serialized.
pub fn write_xlsx(movies: &[MovieRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context("failed to name worksheet")?;

    for (col, title) in (0_u16..).zip(HEADER) {
        worksheet
            .write_string(0, col, title)
            .context("failed to write XLSX header")?;
    }

    let mut row: u32 = 0;
    for movie in movies {
        row = row.checked_add(1).context("too many rows for a worksheet")?;
        write_xlsx_row(worksheet, row, &ExportRow::from(movie))
            .with_context(|| format!("failed to write XLSX row for movie {}", movie.id))?;
    }

    workbook
        .save_to_buffer()
        .context("failed to serialize XLSX workbook")
}

/// Writes one row; text columns as strings, numeric columns as numbers.
fn write_xlsx_row(worksheet: &mut Worksheet, row: u32, movie: &ExportRow<'_>) -> Result<()> {
    write_integer(worksheet, row, 0, movie.id)?;
    write_integer(worksheet, row, 1, i64::try_from(movie.tmdb_id).unwrap_or(i64::MAX))?;
    worksheet.write_string(row, 2, movie.title)?;
    worksheet.write_string(row, 3, movie.synopsis)?;
    worksheet.write_string(row, 4, movie.release_date.as_str())?;
    worksheet.write_string(row, 5, movie.original_language)?;
    worksheet.write_number(row, 6, movie.rating)?;
    worksheet.write_string(row, 7, movie.poster_path)?;
    worksheet.write_number(row, 8, movie.latitude)?;
    worksheet.write_number(row, 9, movie.longitude)?;
    Ok(())
}

/// Writes an integer as a number when `f64` holds it exactly, else as text.
fn write_integer(worksheet: &mut Worksheet, row: u32, col: u16, value: i64) -> Result<()> {
    match i32::try_from(value) {
        Ok(small) => worksheet.write_number(row, col, f64::from(small))?,
        Err(_) => worksheet.write_string(row, col, &value.to_string())?,
    };
    Ok(())
}

/// Creates the parent directory of `path` if it has one.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Writes the catalog to `path` in `format`, creating parent directories if
/// needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_catalog(path: &Path, movies: &[MovieRecord], format: ExportFormat) -> Result<()> {
    ensure_parent(path)?;
    let written = match format {
        ExportFormat::Csv => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(file, movies)
        }
        ExportFormat::Xlsx => {
            let bytes = write_xlsx(movies)?;
            std::fs::write(path, bytes).map_err(anyhow::Error::from)
        }
    };
    written.with_context(|| format!("failed to export to {}", path.display()))
}
