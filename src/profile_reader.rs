/// CSV profile point import - one row per sample, grouped by feature and profile
///
/// Accepts both the plain column names and the names the GIS export writes
/// (featID, profileID, OBJECTID, POINT_X, POINT_Y, RASTERVALU).
use crate::batch::{FeatureProfiles, ProfilePoints, ProfileSource};
use crate::error::Result;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct PointRecord {
    #[serde(alias = "featID")]
    feature_id: String,
    #[serde(alias = "profileID")]
    profile_id: String,
    #[serde(alias = "OBJECTID")]
    position: usize,
    #[serde(alias = "POINT_X")]
    x: f64,
    #[serde(alias = "POINT_Y")]
    y: f64,
    #[serde(alias = "RASTERVALU")]
    depth: f64,
}

/// Profile points read from one CSV file or every CSV file under a folder.
#[derive(Debug, Clone)]
pub struct CsvProfileSource {
    paths: Vec<PathBuf>,
}

impl CsvProfileSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let paths = if path.is_dir() {
            find_csv_files(path)?
        } else {
            vec![path.to_path_buf()]
        };
        Ok(CsvProfileSource { paths })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ProfileSource for CsvProfileSource {
    fn features(&self) -> Result<Vec<FeatureProfiles>> {
        let mut collector = FeatureCollector::default();
        for path in &self.paths {
            info!("Loading profile points from: {}", path.display());
            let file = File::open(path)?;
            collector.read_from(file)?;
        }
        Ok(collector.finish())
    }
}

/// All `*.csv` files under `folder`, sorted by path.
pub fn find_csv_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(extension) = entry.path().extension() {
                if extension.to_str().unwrap_or("").to_lowercase() == "csv" {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Parse profile points from any reader.
pub fn read_profile_points<R: Read>(reader: R) -> Result<Vec<FeatureProfiles>> {
    let mut collector = FeatureCollector::default();
    collector.read_from(reader)?;
    Ok(collector.finish())
}

#[derive(Default)]
struct FeatureCollector {
    features: Vec<FeatureProfiles>,
    feature_index: HashMap<String, usize>,
    profile_index: HashMap<(String, String), (usize, usize)>,
}

impl FeatureCollector {
    fn read_from<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut loaded = 0usize;

        for result in rdr.deserialize::<PointRecord>() {
            match result {
                Ok(record) => {
                    self.push(record);
                    loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping unparsable profile point: {}", e);
                }
            }
        }

        info!("Loaded {} profile points", loaded);
        Ok(())
    }

    fn push(&mut self, record: PointRecord) {
        let key = (record.feature_id.clone(), record.profile_id.clone());
        let (f, p) = match self.profile_index.get(&key) {
            Some(&slot) => slot,
            None => {
                let f = match self.feature_index.get(&record.feature_id) {
                    Some(&f) => f,
                    None => {
                        self.features.push(FeatureProfiles {
                            feature_id: record.feature_id.clone(),
                            profiles: Vec::new(),
                        });
                        let f = self.features.len() - 1;
                        self.feature_index.insert(record.feature_id.clone(), f);
                        f
                    }
                };
                let profiles = &mut self.features[f].profiles;
                profiles.push(ProfilePoints {
                    profile_id: record.profile_id.clone(),
                    samples: Vec::new(),
                });
                let slot = (f, profiles.len() - 1);
                self.profile_index.insert(key, slot);
                slot
            }
        };

        self.features[f].profiles[p]
            .samples
            .push((record.position, record.x, record.y, record.depth));
    }

    fn finish(mut self) -> Vec<FeatureProfiles> {
        for feature in &mut self.features {
            for profile in &mut feature.profiles {
                profile.samples.sort_by_key(|s| s.0);
            }
        }
        self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_groups_rows_by_feature_and_profile() {
        let data = "\
feature_id,profile_id,position,x,y,depth
7,1,2,20.0,0.0,-8.0
7,1,0,0.0,0.0,0.0
7,2,0,0.0,5.0,-1.0
3,1,0,1.0,1.0,-4.0
7,1,1,10.0,0.0,-2.0
7,2,1,0.0,15.0,-1.5
";
        let features = read_profile_points(data.as_bytes()).unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].feature_id, "7");
        assert_eq!(features[1].feature_id, "3");
        assert_eq!(features[0].profiles.len(), 2);

        let first = &features[0].profiles[0];
        assert_eq!(first.profile_id, "1");
        let positions: Vec<usize> = first.samples.iter().map(|s| s.0).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(first.samples[2].3, -8.0);
    }

    #[test]
    fn test_accepts_gis_export_column_names() {
        let data = "\
OBJECTID,featID,profileID,POINT_X,POINT_Y,RASTERVALU
1,12,1,500.5,100.0,-2500.0
2,12,1,510.5,100.0,-2450.0
";
        let features = read_profile_points(data.as_bytes()).unwrap();
        assert_eq!(features[0].feature_id, "12");
        assert_eq!(features[0].profiles[0].samples[1], (2, 510.5, 100.0, -2450.0));
    }

    #[test]
    fn test_skips_bad_rows() {
        let data = "\
feature_id,profile_id,position,x,y,depth
1,1,0,0.0,0.0,-1.0
1,1,1,10.0,0.0,not-a-number
1,1,2,20.0,0.0,-3.0
";
        let features = read_profile_points(data.as_bytes()).unwrap();
        assert_eq!(features[0].profiles[0].samples.len(), 2);
    }

    #[test]
    fn test_folder_source_reads_every_csv() {
        let dir = tempfile::tempdir().unwrap();
        let header = "feature_id,profile_id,position,x,y,depth\n";
        for (name, feature) in [("a.csv", "1"), ("nested/b.CSV", "2")] {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            let mut file = File::create(&path).unwrap();
            write!(file, "{header}{feature},1,0,0,0,-1\n{feature},1,1,5,0,-2\n").unwrap();
        }
        File::create(dir.path().join("notes.txt")).unwrap();

        let source = CsvProfileSource::from_path(dir.path()).unwrap();
        assert_eq!(source.paths().len(), 2);

        let features = source.features().unwrap();
        let ids: Vec<&str> = features.iter().map(|f| f.feature_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
