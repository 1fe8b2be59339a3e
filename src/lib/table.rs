//! # Table
//!
//! Load headerless tab-separated variant tables and write filtered tables back out.
//!
//! Loaders skip `#` comment lines and expect no header. The writer always emits a header line,
//! so writer output has to have its first line stripped before it can be loaded again.
use crate::errors::{Result, SieveError};
use crate::record::{VariantKey, VariantRecord};
use grep_cli::stdout;
use log::*;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};
use termcolor::ColorChoice;

/// Open a file for reading, mapping a missing file to the error built by `missing`.
fn open<F>(path: &Path, missing: F) -> Result<BufReader<File>>
where
    F: FnOnce(PathBuf) -> SieveError,
{
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(missing(path.to_path_buf())),
        Err(err) => Err(err.into()),
    }
}

/// Open a TSV Reader with no header that skips `#` lines.
fn get_reader<R: Read>(raw_reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .quoting(false)
        // Arity is checked per row so it can be reported with a line number.
        .flexible(true)
        .from_reader(raw_reader)
}

/// Read every row of `raw_reader` into `T`, requiring exactly `n_fields` fields per row.
///
/// `origin` is only used in error messages.
fn read_rows<T, R>(raw_reader: R, origin: &Path, n_fields: usize) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = get_reader(raw_reader);
    let mut rows = vec![];
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != n_fields {
            return Err(SieveError::Malformed {
                path: origin.to_path_buf(),
                line,
                reason: format!("expected {} fields, found {}", n_fields, record.len()),
            });
        }
        let row = record
            .deserialize(None)
            .map_err(|err| SieveError::Malformed {
                path: origin.to_path_buf(),
                line,
                reason: err.to_string(),
            })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse variant records from any reader.
pub fn read_variants<R: Read>(raw_reader: R, origin: &Path) -> Result<Vec<VariantRecord>> {
    read_rows(raw_reader, origin, VariantRecord::N_FIELDS)
}

/// Load the variant table at `path`.
pub fn load_variants(path: &Path) -> Result<Vec<VariantRecord>> {
    info!("Reading variants from {:?}", path);
    let reader = open(path, |path| SieveError::InputNotFound { path })?;
    read_variants(reader, path)
}

/// Parse reference variant keys from any reader.
pub fn read_reference<R: Read>(raw_reader: R, origin: &Path) -> Result<Vec<VariantKey>> {
    read_rows(raw_reader, origin, VariantKey::N_FIELDS)
}

/// Load the reference variant set at `path`.
pub fn load_reference(path: &Path) -> Result<Vec<VariantKey>> {
    info!("Reading reference variants from {:?}", path);
    let reader = open(path, |path| SieveError::MissingReference { path })?;
    read_reference(reader, path)
}

/// Open a TSV Writer to a file, or to stdout when `path` is `-`.
pub fn get_writer(path: &Path) -> Result<csv::Writer<Box<dyn Write>>> {
    let raw_writer: Box<dyn Write> = match path.to_str() {
        Some("-") => Box::new(stdout(ColorChoice::Never)),
        _ => Box::new(BufWriter::new(File::create(path)?)),
    };
    Ok(table_writer(raw_writer))
}

/// Wrap a raw writer in the TSV settings used for every output table.
pub fn table_writer<W: Write>(raw_writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        // The header is written explicitly so empty tables still get one.
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(raw_writer)
}

/// Write a header line of `columns` followed by one line per row.
pub fn write_table<W, T>(writer: &mut csv::Writer<W>, columns: &[&str], rows: &[T]) -> Result<()>
where
    W: Write,
    T: Serialize,
{
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::VARIANT_COLUMNS;
    use std::fs;
    use tempfile::tempdir;

    const VARIANTS: &str = "##fileformat=VCFv4.2\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n\
        chr1\t100\t.\tA\tT\t50\tPASS\tDP=20\tGT\t0/1\n\
        chr1\t200\trs1\tG\tC\t.\tPASS\tX=1\tGT\t1/1\n";

    fn origin() -> PathBuf {
        PathBuf::from("test.vcf")
    }

    #[test]
    fn skips_comments_and_keeps_order() {
        let records = read_variants(VARIANTS.as_bytes(), &origin()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pos, 100);
        assert_eq!(records[0].qual.value(), Some(50.0));
        assert_eq!(records[1].id.as_str(), "rs1");
        assert_eq!(records[1].qual.value(), None);
        assert_eq!(records[1].qual.as_str(), ".");
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        let input = "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20\tGT\n";
        match read_variants(input.as_bytes(), &origin()) {
            Err(SieveError::Malformed { reason, .. }) => {
                assert!(reason.contains("expected 10 fields, found 9"), "{}", reason)
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_position_is_malformed() {
        let input = "chr1\tabc\t.\tA\tT\t50\tPASS\tDP=20\tGT\t0/1\n";
        let result = read_variants(input.as_bytes(), &origin());
        assert!(matches!(result, Err(SieveError::Malformed { .. })));
    }

    #[test]
    fn missing_input_and_reference_are_distinct() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.vcf");
        assert!(matches!(
            load_variants(&path),
            Err(SieveError::InputNotFound { .. })
        ));
        assert!(matches!(
            load_reference(&path),
            Err(SieveError::MissingReference { .. })
        ));
    }

    #[test]
    fn reference_rows_need_four_fields() {
        let good = read_reference("chr1\t100\tA\tT\n".as_bytes(), &origin()).unwrap();
        assert_eq!(good.len(), 1);
        assert_eq!(good[0].pos, 100);
        let bad = read_reference("chr1\t100\tA\tT\tX\n".as_bytes(), &origin());
        assert!(matches!(bad, Err(SieveError::Malformed { .. })));
    }

    #[test]
    fn empty_table_still_gets_a_header() {
        let mut writer = table_writer(Vec::<u8>::new());
        let rows: Vec<VariantRecord> = vec![];
        write_table(&mut writer, &VARIANT_COLUMNS, &rows).unwrap();
        let out = String::from_utf8(writer.get_ref().clone()).unwrap();
        assert_eq!(out, "CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n");
    }

    #[test]
    fn written_rows_keep_their_text() {
        let records = read_variants(VARIANTS.as_bytes(), &origin()).unwrap();
        let mut writer = table_writer(Vec::<u8>::new());
        write_table(&mut writer, &VARIANT_COLUMNS, &records).unwrap();
        let out = String::from_utf8(writer.get_ref().clone()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20\tGT\t0/1");
        assert_eq!(lines[2], "chr1\t200\trs1\tG\tC\t.\tPASS\tX=1\tGT\t1/1");
    }

    // The writer emits a header and the loader expects none, so writer output only loads
    // again once the header line is dropped.
    #[test]
    fn writer_output_needs_header_stripped_to_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.vcf");
        let records = read_variants(VARIANTS.as_bytes(), &origin()).unwrap();
        let mut writer = get_writer(&path).unwrap();
        write_table(&mut writer, &VARIANT_COLUMNS, &records).unwrap();
        drop(writer);

        assert!(matches!(
            load_variants(&path),
            Err(SieveError::Malformed { line: 1, .. })
        ));

        let written = fs::read_to_string(&path).unwrap();
        let body: String = written.lines().skip(1).map(|l| format!("{}\n", l)).collect();
        let reloaded = read_variants(body.as_bytes(), &path).unwrap();
        assert_eq!(reloaded, records);
    }
}
