use crate::merit::pearson_correlation;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};

#[derive(Clone, Serialize, Deserialize)]
pub struct Data {
    pub X: HashMap<(usize, usize), f64>, // Matrix for feature values, keyed (sample, feature)
    pub y: Vec<u8>,                      // Vector for class labels
    pub features: Vec<String>,           // Feature names
    pub samples: Vec<String>,            // Sample names
    pub feature_len: usize,
    pub sample_len: usize,
    pub classes: Vec<String>,
}

impl Data {
    /// Create a new `Data` instance with default values
    pub fn new() -> Data {
        Data {
            X: HashMap::new(),
            y: Vec::new(),
            features: Vec::new(),
            samples: Vec::new(),
            feature_len: 0,
            sample_len: 0,
            classes: Vec::new(),
        }
    }

    /// Build a dataset from an in-memory dense matrix (rows = samples) and its
    /// aligned label vector. Sample and feature names are generated. Zero
    /// values are not stored.
    pub fn from_rows(rows: Vec<Vec<f64>>, y: Vec<u8>) -> Data {
        let sample_len = rows.len();
        let feature_len = rows.iter().map(|row| row.len()).max().unwrap_or(0);

        let mut X: HashMap<(usize, usize), f64> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    X.insert((i, j), value);
                }
            }
        }

        Data {
            X,
            y,
            features: (0..feature_len).map(|j| format!("feature_{}", j)).collect(),
            samples: (0..sample_len).map(|i| format!("sample_{}", i)).collect(),
            feature_len,
            sample_len,
            classes: Vec::new(),
        }
    }

    /// Load data from `X.tsv` and `y.tsv` files. With `features_in_rows` the
    /// X file starts with a sample-name header and carries one feature per
    /// line; otherwise it starts with a feature-name header and carries one
    /// sample per line.
    pub fn load_data(&mut self, X_path: &str, y_path: &str, features_in_rows: bool) -> Result<(), Box<dyn Error>> {
        info!("Loading files {} and {}...", X_path, y_path);
        let file_X = File::open(X_path)?;
        let mut reader_X = BufReader::new(file_X);

        let mut first_line = String::new();
        reader_X.read_line(&mut first_line)?;
        let trimmed_first_line = first_line
            .strip_suffix('\n')
            .or_else(|| first_line.strip_suffix("\r\n"))
            .unwrap_or(&first_line);
        let header: Vec<String> = trimmed_first_line.split('\t').skip(1).map(String::from).collect();

        if features_in_rows {
            self.samples = header;
        } else {
            self.features = header;
        }

        for (line_no, line) in reader_X.lines().enumerate() {
            let line = line?;
            let trimmed_line = line
                .strip_suffix('\n')
                .or_else(|| line.strip_suffix("\r\n"))
                .unwrap_or(&line);
            let mut fields = trimmed_line.split('\t');

            // First field names the feature (or the sample when samples are in rows)
            if let Some(name) = fields.next() {
                if features_in_rows {
                    self.features.push(name.to_string());
                } else {
                    self.samples.push(name.to_string());
                }
            }

            for (field_no, value) in fields.enumerate() {
                if let Ok(num_val) = value.parse::<f64>() {
                    if num_val != 0.0 {
                        let key = if features_in_rows {
                            (field_no, line_no)
                        } else {
                            (line_no, field_no)
                        };
                        self.X.insert(key, num_val);
                    }
                }
            }
        }

        // Parse y.tsv and store labels
        let file_y = File::open(y_path)?;
        let reader_y = BufReader::new(file_y);

        let mut y_map = HashMap::new();
        for line in reader_y.lines().skip(1) {
            let line = line?;
            let trimmed_line = line
                .strip_suffix('\n')
                .or_else(|| line.strip_suffix("\r\n"))
                .unwrap_or(&line);
            let mut fields = trimmed_line.split('\t');

            if let Some(sample_name) = fields.next() {
                if let Some(value) = fields.next() {
                    let target: u8 = value.parse()?;
                    y_map.insert(sample_name.to_string(), target);
                }
            }
        }

        // Reorder `y` to match the order of `samples` from X.tsv
        self.y = self
            .samples
            .iter()
            .map(|sample_name| {
                *y_map.get(sample_name).unwrap_or_else(|| {
                    warn!("No y value available for {}. Setting y to 2 for this sample.", sample_name);
                    &2
                })
            })
            .collect();

        self.feature_len = self.features.len();
        self.sample_len = self.samples.len();

        Ok(())
    }

    pub fn set_classes(&mut self, classes: Vec<String>) {
        self.classes = classes;
    }

    /// Values of feature #j across all samples, absent entries read as 0.0
    pub fn feature_column(&self, j: usize) -> Vec<f64> {
        (0..self.sample_len)
            .map(|i| self.X.get(&(i, j)).copied().unwrap_or(0.0))
            .collect()
    }

    /// Column vectors for a feature subset, in subset order
    pub fn column_block(&self, subset: &[usize]) -> Vec<Vec<f64>> {
        subset.iter().map(|&j| self.feature_column(j)).collect()
    }

    /// Labels as a numeric vector, for correlation against feature columns
    pub fn label_vector(&self) -> Vec<f64> {
        self.y.iter().map(|&value| value as f64).collect()
    }

    /// Reject shapes the search cannot work with, before any scoring starts
    pub fn validate_for_search(&self) -> Result<(), String> {
        if self.sample_len == 0 {
            return Err("Invalid data: X contains no sample.".to_string());
        }
        if self.feature_len == 0 {
            return Err("Invalid data: X contains no feature.".to_string());
        }
        if self.y.len() != self.sample_len {
            return Err(format!(
                "Invalid data: X has {} samples but y has {} labels.",
                self.sample_len,
                self.y.len()
            ));
        }
        Ok(())
    }

    /// Association of feature #j with the labels: point-biserial Pearson r and
    /// its two-tailed Student-t p-value. Perfectly correlated or too-short
    /// columns get a direct p-value rather than a degenerate t statistic.
    pub fn feature_association(&self, j: usize) -> (f64, f64) {
        let r = pearson_correlation(&self.feature_column(j), &self.label_vector());
        let m = self.sample_len as f64;

        if m < 3.0 {
            return (r, 1.0);
        }
        if r.abs() >= 1.0 {
            return (r, 0.0);
        }

        let t_stat = r.abs() * ((m - 2.0) / (1.0 - r * r)).sqrt();
        let t_dist = StudentsT::new(0.0, 1.0, m - 2.0).unwrap();
        let p_value = 2.0 * (1.0 - t_dist.cdf(t_stat));

        (r, p_value)
    }
}

/// Implement a custom Debug trait for Data
impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let _ = writeln!(f, "Features: {}   Samples: {}", self.feature_len, self.sample_len);

        let samples_string = self.samples.join("\t");
        let truncated_samples = if samples_string.len() > 100 {
            format!("{}...", &samples_string[..97])
        } else {
            samples_string
        };

        writeln!(f, "X:                  {}", truncated_samples)?;
        // Limit to the first 20 rows
        for j in (0..self.feature_len).take(20) {
            let feature = &self.features[j];
            let row_display: String = (0..self.sample_len)
                .map(|i| {
                    if self.X.contains_key(&(i, j)) {
                        format!("{:.2}", self.X[&(i, j)])
                    } else {
                        "".to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("\t");

            let truncated_row = if row_display.len() > 80 {
                format!("{}...", &row_display[..77])
            } else {
                row_display
            };

            writeln!(f, "{:<20} {}", feature, truncated_row)?;
        }

        writeln!(f, "\ny:")?;
        // Limit y to the first 20 entries
        for (i, label) in self.y.iter().take(20).enumerate() {
            let class_name = self
                .classes
                .get(*label as usize)
                .cloned()
                .unwrap_or_else(|| format!("{}", label));
            writeln!(f, "{}\t{}", self.samples[i], class_name)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the Display formatter
        write!(f, "{}", self)
    }
}

// unit tests
#[cfg(test)]
mod tests {
    use super::*;

    /// 8 samples x 3 binary features. Features 0 and 1 are complementary
    /// halves of the label pattern (r=1/sqrt(3) each), feature 2 is
    /// uncorrelated with both of them and with the labels.
    fn create_test_data() -> Data {
        Data::from_rows(
            vec![
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 1.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 1.0, 1.0],
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.0, 0.0],
            ],
            vec![1, 1, 1, 1, 1, 1, 0, 0],
        )
    }

    #[test]
    fn test_load_data_features_in_rows() {
        let mut data_test = Data::new();
        data_test
            .load_data("./samples/tests/X.tsv", "./samples/tests/y.tsv", true)
            .expect("the test dataset should load");

        let reference = create_test_data();
        assert_eq!(data_test.X, reference.X, "the loaded X must match the in-memory reference dataset");
        assert_eq!(data_test.y, reference.y, "the loaded y must match the in-memory reference labels");
        assert_eq!(
            data_test.features,
            vec!["feat_A", "feat_B", "feat_C"],
            "the loaded feature names must come from the first column of X.tsv"
        );
        assert_eq!(
            data_test.samples,
            vec!["S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"],
            "the loaded sample names must come from the header of X.tsv"
        );
        assert_eq!(data_test.feature_len, 3);
        assert_eq!(data_test.sample_len, 8);
    }

    #[test]
    fn test_load_data_samples_in_rows() {
        let mut by_feature = Data::new();
        by_feature
            .load_data("./samples/tests/X.tsv", "./samples/tests/y.tsv", true)
            .expect("the feature-per-row dataset should load");

        let mut by_sample = Data::new();
        by_sample
            .load_data("./samples/tests/X_samples_in_rows.tsv", "./samples/tests/y.tsv", false)
            .expect("the sample-per-row dataset should load");

        assert_eq!(by_sample.X, by_feature.X, "both file orientations must produce the same matrix");
        assert_eq!(by_sample.y, by_feature.y, "both file orientations must produce the same labels");
        assert_eq!(by_sample.feature_len, by_feature.feature_len);
        assert_eq!(by_sample.sample_len, by_feature.sample_len);
    }

    #[test]
    fn test_from_rows_skips_zeros() {
        let data = Data::from_rows(vec![vec![0.0, 2.5], vec![1.0, 0.0]], vec![0, 1]);
        assert_eq!(
            data.X,
            HashMap::from([((0, 1), 2.5), ((1, 0), 1.0)]),
            "zero values must not be stored in the sparse matrix"
        );
        assert_eq!(data.feature_len, 2);
        assert_eq!(data.sample_len, 2);
        assert_eq!(data.features, vec!["feature_0", "feature_1"], "feature names must be generated");
        assert_eq!(data.samples, vec!["sample_0", "sample_1"], "sample names must be generated");
    }

    #[test]
    fn test_feature_column_fills_absent_entries() {
        let data = create_test_data();
        assert_eq!(
            data.feature_column(0),
            vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            "absent entries of the sparse matrix must read as 0.0"
        );
        assert_eq!(
            data.feature_column(2),
            vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_column_block_preserves_subset_order() {
        let data = create_test_data();
        let block = data.column_block(&[2, 0]);
        assert_eq!(block.len(), 2);
        assert_eq!(block[0], data.feature_column(2), "columns must come back in subset order");
        assert_eq!(block[1], data.feature_column(0));
    }

    #[test]
    fn test_label_vector() {
        let data = create_test_data();
        assert_eq!(data.label_vector(), vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_validate_for_search_ok() {
        let data = create_test_data();
        assert!(data.validate_for_search().is_ok(), "the reference dataset is well formed");
    }

    #[test]
    fn test_validate_for_search_shape_mismatch() {
        let mut data = create_test_data();
        data.y.pop();
        let err = data.validate_for_search().expect_err("a y shorter than X must be rejected");
        assert!(err.contains("8 samples but y has 7 labels"), "the error must identify the shape mismatch: {}", err);
    }

    #[test]
    fn test_validate_for_search_empty() {
        let data = Data::new();
        assert!(
            data.validate_for_search().is_err(),
            "an empty dataset must be rejected before any scoring"
        );
    }

    #[test]
    fn test_feature_association_perfect() {
        let data = Data::from_rows(
            vec![vec![1.0], vec![1.0], vec![0.0], vec![0.0], vec![1.0], vec![0.0]],
            vec![1, 1, 0, 0, 1, 0],
        );
        let (r, p_value) = data.feature_association(0);
        assert!((r - 1.0).abs() < 1e-12, "a column identical to the labels has r=1, got {}", r);
        assert_eq!(p_value, 0.0, "a perfect association is reported with p=0");
    }

    #[test]
    fn test_feature_association_uncorrelated() {
        let data = create_test_data();
        let (r, p_value) = data.feature_association(2);
        assert!(r.abs() < 1e-12, "feature 2 is uncorrelated with the labels by construction, got r={}", r);
        assert!((p_value - 1.0).abs() < 1e-9, "an r of exactly 0 has a two-tailed p-value of 1, got {}", p_value);
    }
}
