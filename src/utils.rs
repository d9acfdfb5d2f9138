use crate::data::Data;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// a macro to declare simple Vec<String>
#[macro_export]
macro_rules! string_vec {
    ($($x:expr),*) => {
        vec![$($x.into()),*]
    };
}

/// Generate a reproducible binary-labeled dataset: the first `informative`
/// columns follow the label with additive uniform noise of the given
/// amplitude, the remaining columns are uniform noise in [0,1).
pub fn synthetic_binary_dataset(
    n_samples: usize,
    n_features: usize,
    informative: usize,
    noise: f64,
    rng: &mut ChaCha8Rng,
) -> Data {
    let y: Vec<u8> = (0..n_samples).map(|_| rng.gen_range(0..2)).collect();

    let rows: Vec<Vec<f64>> = (0..n_samples)
        .map(|i| {
            (0..n_features)
                .map(|j| {
                    if j < informative {
                        y[i] as f64 + noise * rng.gen_range(-1.0..1.0)
                    } else {
                        rng.gen_range(0.0..1.0)
                    }
                })
                .collect()
        })
        .collect();

    Data::from_rows(rows, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merit::pearson_correlation;
    use rand::SeedableRng;

    #[test]
    fn test_synthetic_dataset_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let data = synthetic_binary_dataset(30, 5, 2, 0.2, &mut rng);

        assert_eq!(data.sample_len, 30);
        assert_eq!(data.feature_len, 5);
        assert_eq!(data.y.len(), 30);
        assert!(data.y.iter().all(|&label| label < 2), "labels must be binary");
        assert!(data.validate_for_search().is_ok(), "a generated dataset must be well formed");
    }

    #[test]
    fn test_synthetic_dataset_informative_columns_track_labels() {
        let mut rng = ChaCha8Rng::seed_from_u64(4815162342);
        let data = synthetic_binary_dataset(200, 4, 1, 0.1, &mut rng);
        let labels = data.label_vector();

        let r_informative = pearson_correlation(&data.feature_column(0), &labels).abs();
        assert!(r_informative > 0.9, "an informative column with low noise must track the labels, got r={}", r_informative);

        for j in 1..4 {
            let r_noise = pearson_correlation(&data.feature_column(j), &labels).abs();
            assert!(r_noise < 0.4, "a noise column must not track the labels, got r={} for column {}", r_noise, j);
        }
    }

    #[test]
    fn test_synthetic_dataset_reproducible() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        let data_a = synthetic_binary_dataset(20, 3, 1, 0.2, &mut rng_a);
        let data_b = synthetic_binary_dataset(20, 3, 1, 0.2, &mut rng_b);

        assert_eq!(data_a.X, data_b.X, "the same seed must generate the same matrix");
        assert_eq!(data_a.y, data_b.y, "the same seed must generate the same labels");
    }
}
