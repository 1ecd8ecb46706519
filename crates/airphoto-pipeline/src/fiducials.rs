//! Fiducial mark metadata table.
//!
//! One CSV row per photograph: an identifier column and the pixel
//! coordinates of the four fiducial marks, ordered upper-left, upper-right,
//! lower-right, lower-left (or their medial equivalents up, right, down,
//! left). The table is loaded once and indexed by exact identifier; indexing
//! happens at load time so lookups are constant and an identifier that is a
//! substring of another (e.g. "12" and "112") can never match the wrong row.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;

/// The four fiducial mark coordinates of one photograph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiducialMarks {
    /// Pixel coordinates ordered UL, UR, LR, LL.
    pub points: [[f64; 2]; 4],
}

#[derive(Debug, Deserialize)]
struct FiducialRow {
    #[serde(rename = "PHOTO_ID")]
    photo_id: String,
    #[serde(rename = "Xp1")]
    x1: f64,
    #[serde(rename = "Yp1")]
    y1: f64,
    #[serde(rename = "Xp2")]
    x2: f64,
    #[serde(rename = "Yp2")]
    y2: f64,
    #[serde(rename = "Xp3")]
    x3: f64,
    #[serde(rename = "Yp3")]
    y3: f64,
    #[serde(rename = "Xp4")]
    x4: f64,
    #[serde(rename = "Yp4")]
    y4: f64,
}

impl From<&FiducialRow> for FiducialMarks {
    fn from(row: &FiducialRow) -> Self {
        FiducialMarks {
            points: [
                [row.x1, row.y1],
                [row.x2, row.y2],
                [row.x3, row.y3],
                [row.x4, row.y4],
            ],
        }
    }
}

enum TableEntry {
    Unique(FiducialMarks),
    Ambiguous(usize),
}

/// Identifier-keyed table of fiducial marks, loaded once per run.
pub struct FiducialTable {
    entries: HashMap<String, TableEntry>,
}

impl FiducialTable {
    /// Load the table from a delimited file with a header row.
    ///
    /// Rows sharing the same identifier are retained as ambiguous and fail
    /// at lookup rather than silently shadowing one another.
    ///
    /// # Errors
    ///
    /// [`PipelineError::MetadataLoad`] when the file is unreadable, misses a
    /// required column or contains non-numeric coordinate fields.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let load_err = |e: csv::Error| PipelineError::MetadataLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut reader = csv::Reader::from_path(path).map_err(load_err)?;

        let mut entries = HashMap::new();
        for row in reader.deserialize::<FiducialRow>() {
            let row = row.map_err(load_err)?;
            match entries.entry(row.photo_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(TableEntry::Unique(FiducialMarks::from(&row)));
                }
                Entry::Occupied(mut slot) => {
                    let count = match slot.get() {
                        TableEntry::Unique(_) => 2,
                        TableEntry::Ambiguous(n) => n + 1,
                    };
                    slot.insert(TableEntry::Ambiguous(count));
                }
            }
        }

        log::info!("loaded {} fiducial records from {:?}", entries.len(), path);
        Ok(Self { entries })
    }

    /// Look up the fiducial marks of one image by exact identifier match.
    ///
    /// # Errors
    ///
    /// [`PipelineError::RecordNotFound`] when no row matches and
    /// [`PipelineError::AmbiguousRecord`] when several rows share the
    /// identifier.
    pub fn lookup(&self, image_id: &str) -> Result<&FiducialMarks, PipelineError> {
        match self.entries.get(image_id) {
            Some(TableEntry::Unique(marks)) => Ok(marks),
            Some(TableEntry::Ambiguous(count)) => {
                Err(PipelineError::AmbiguousRecord(image_id.to_owned(), *count))
            }
            None => Err(PipelineError::RecordNotFound(image_id.to_owned())),
        }
    }

    /// The number of distinct identifiers in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "PHOTO_ID,Xp1,Yp1,Xp2,Yp2,Xp3,Yp3,Xp4,Yp4";

    fn write_csv(rows: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fiducials.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        (dir, path)
    }

    #[test]
    fn lookup_exact_match() -> Result<(), PipelineError> {
        let (_dir, path) = write_csv(&[
            "photo_001,10,11,500,12,510,480,9,470",
            "photo_002,20,21,520,22,530,490,19,475",
        ]);

        let table = FiducialTable::from_csv(&path)?;
        assert_eq!(table.len(), 2);

        let marks = table.lookup("photo_002")?;
        assert_eq!(marks.points[0], [20.0, 21.0]);
        assert_eq!(marks.points[3], [19.0, 475.0]);
        Ok(())
    }

    #[test]
    fn lookup_missing_record() -> Result<(), PipelineError> {
        let (_dir, path) = write_csv(&["photo_001,1,2,3,4,5,6,7,8"]);
        let table = FiducialTable::from_csv(&path)?;

        let res = table.lookup("photo_999");
        assert!(matches!(res, Err(PipelineError::RecordNotFound(id)) if id == "photo_999"));
        Ok(())
    }

    #[test]
    fn lookup_duplicate_identifier_is_ambiguous() -> Result<(), PipelineError> {
        let (_dir, path) = write_csv(&[
            "photo_001,1,2,3,4,5,6,7,8",
            "photo_001,9,9,9,9,9,9,9,9",
        ]);
        let table = FiducialTable::from_csv(&path)?;

        let res = table.lookup("photo_001");
        assert!(matches!(
            res,
            Err(PipelineError::AmbiguousRecord(id, 2)) if id == "photo_001"
        ));
        Ok(())
    }

    #[test]
    fn substring_identifiers_do_not_collide() -> Result<(), PipelineError> {
        let (_dir, path) = write_csv(&[
            "112,100,100,200,100,200,200,100,200",
            "12,1,1,2,1,2,2,1,2",
        ]);
        let table = FiducialTable::from_csv(&path)?;

        let marks = table.lookup("12")?;
        assert_eq!(marks.points[0], [1.0, 1.0]);

        let marks = table.lookup("112")?;
        assert_eq!(marks.points[0], [100.0, 100.0]);
        Ok(())
    }

    #[test]
    fn malformed_coordinates_fail_to_load() {
        let (_dir, path) = write_csv(&["photo_001,1,2,three,4,5,6,7,8"]);
        let res = FiducialTable::from_csv(&path);
        assert!(matches!(res, Err(PipelineError::MetadataLoad { .. })));
    }

    #[test]
    fn missing_column_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fiducials.csv");
        std::fs::write(&path, "PHOTO_ID,Xp1\nphoto_001,1\n").unwrap();

        let res = FiducialTable::from_csv(&path);
        assert!(matches!(res, Err(PipelineError::MetadataLoad { .. })));
    }

    #[test]
    fn unreadable_file_fails_to_load() {
        let res = FiducialTable::from_csv("/nonexistent/fiducials.csv");
        assert!(matches!(res, Err(PipelineError::MetadataLoad { .. })));
    }
}
