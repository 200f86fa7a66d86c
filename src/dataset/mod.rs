//! Dataset loading and splitting.
//!
//! Reads the semicolon-delimited fact-check export into [`Record`]s and
//! produces the seeded train/test split used for training.

use crate::analysis::clean_label;
use crate::config::DatasetConfig;
use crate::models::{LabeledText, Record};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::{debug, warn};

/// Training and evaluation partitions.
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub train: Vec<LabeledText>,
    pub test: Vec<LabeledText>,
}

/// Read every record from the CSV at `path`.
///
/// Short rows are accepted: a missing flag column gives `flag: None`, a
/// missing text column gives empty text. Invalid UTF-8 in a field is
/// replaced with U+FFFD rather than failing the row.
pub fn load_records(path: &Path, config: &DatasetConfig) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(config.has_headers)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let mut records = Vec::new();
    for (index, row) in reader.byte_records().enumerate() {
        let row = row.with_context(|| {
            format!("Failed to read row {} of {}", index + 1, path.display())
        })?;

        let flag = row
            .get(config.flag_column)
            .map(|field| String::from_utf8_lossy(field).into_owned());
        let text = row
            .get(config.text_column)
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .unwrap_or_default();

        if flag.is_none() {
            debug!("Row {} has no flag column", index + 1);
        }

        records.push(Record { flag, text });
    }

    if records.is_empty() {
        warn!("Dataset {} contains no rows", path.display());
    }

    Ok(records)
}

/// Keep the records usable for training, with their labels normalized.
///
/// A record qualifies when its flag normalizes to a non-empty label and
/// its text is not blank.
pub fn training_examples(records: &[Record]) -> Vec<LabeledText> {
    records
        .iter()
        .filter(|r| !r.text.trim().is_empty())
        .filter_map(|r| {
            clean_label(r.flag.as_deref()).map(|label| LabeledText {
                label,
                text: r.text.clone(),
            })
        })
        .collect()
}

/// Shuffle with a fixed seed and hold out `test_fraction` of the examples.
pub fn train_test_split(mut examples: Vec<LabeledText>, test_fraction: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);

    let fraction = test_fraction.clamp(0.0, 1.0);
    let n_test = ((examples.len() as f64) * fraction).round() as usize;
    // at least one example always trains
    let n_test = n_test.min(examples.len().saturating_sub(1));

    let test = examples.split_off(examples.len() - n_test);
    debug!("Split {} train / {} test", examples.len(), test.len());

    Split {
        train: examples,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE_CSV: &str = "\
id;url;date;flag;source;post_text
1;http://a;2023-01-01;HOAX;fb;\"Vaksin berisi chip; jangan mau\"
2;http://b;2023-01-02;satir;tw;Presiden naik kuda ke kantor
3;http://c;2023-01-03;;ig;Tanpa label
4;http://d;2023-01-04
5;http://e;2023-01-05;Misleading ;fb;
";

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_records() {
        let (_dir, path) = write_csv(SAMPLE_CSV);
        let records = load_records(&path, &DatasetConfig::default()).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].flag.as_deref(), Some("HOAX"));
        assert_eq!(records[0].text, "Vaksin berisi chip; jangan mau");
        assert_eq!(records[1].flag.as_deref(), Some("satir"));
        assert_eq!(records[2].flag.as_deref(), Some(""));
        assert_eq!(records[3].flag, None);
        assert_eq!(records[3].text, "");
        assert_eq!(records[4].flag.as_deref(), Some("Misleading "));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_records(Path::new("no/such/file.csv"), &DatasetConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_records_with_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        let mut content = b"id;url;date;flag;source;post_text\n1;u;d;HOAX;fb;caf".to_vec();
        content.extend_from_slice(&[0xff, b'\n']);
        content.extend_from_slice(b"2;u;d;SATIRE;tw;ok\n");
        fs::write(&path, content).unwrap();

        let records = load_records(&path, &DatasetConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].flag.as_deref(), Some("HOAX"));
        assert_eq!(records[0].text, "caf\u{FFFD}");
        assert_eq!(records[1].text, "ok");
    }

    #[test]
    fn test_training_examples() {
        let (_dir, path) = write_csv(SAMPLE_CSV);
        let records = load_records(&path, &DatasetConfig::default()).unwrap();
        let examples = training_examples(&records);

        // rows 3-5 lack a label or text
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label, "HOAX");
        assert_eq!(examples[1].label, "SATIRE");
    }

    fn numbered(n: usize) -> Vec<LabeledText> {
        (0..n)
            .map(|i| LabeledText::new(if i % 2 == 0 { "A" } else { "B" }, &format!("text {}", i)))
            .collect()
    }

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(numbered(10), 0.2, 1);
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.test.len(), 2);

        let split = train_test_split(numbered(10), 0.0, 1);
        assert_eq!(split.train.len(), 10);
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_split_keeps_one_training_example() {
        let examples = vec![
            LabeledText::new("HOAX", "vaksin chip"),
            LabeledText::new("SATIRE", "naik kuda"),
        ];
        let split = train_test_split(examples, 0.75, 1);
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.test.len(), 1);

        let split = train_test_split(numbered(1), 0.9, 1);
        assert_eq!(split.train.len(), 1);
        assert!(split.test.is_empty());

        assert!(train_test_split(Vec::new(), 0.5, 1).train.is_empty());
    }

    #[test]
    fn test_split_is_deterministic() {
        let a = train_test_split(numbered(50), 0.3, 99);
        let b = train_test_split(numbered(50), 0.3, 99);
        assert_eq!(a.test, b.test);
        assert_eq!(a.train, b.train);
    }

    #[test]
    fn test_split_is_a_partition() {
        let split = train_test_split(numbered(20), 0.25, 5);
        let mut texts: Vec<_> = split
            .train
            .iter()
            .chain(split.test.iter())
            .map(|e| e.text.clone())
            .collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), 20);
    }
}
