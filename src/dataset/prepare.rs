//! Dataset preparation for training
//!
//! Derives the binary bleaching target from the two label columns,
//! drops unlabelled rows, imputes missing feature values with the column
//! median, and splits into stratified train and test sets.

use log::info;

use crate::dataset::csv::RawRow;
use crate::error::DatasetError;
use crate::model::forest::{FEATURE_COLUMNS, FEATURE_COUNT};
use crate::utils::rng::Lcg64;

/// Fully numeric, labelled samples ready for fitting
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub features: Vec<[f64; FEATURE_COUNT]>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Derive the bleaching event target for one row
///
/// The level column wins when present: the literal `No Bleaching` means
/// no event, any other level means an event. Otherwise a present percent
/// of exactly zero means no event and any other present percent means an
/// event. Rows with neither column are unusable.
pub fn derive_target(row: &RawRow) -> Option<u8> {
    match &row.bleaching_level {
        Some(level) if level == "No Bleaching" => Some(0),
        Some(_) => Some(1),
        None => match row.percent_bleaching {
            Some(percent) if percent == 0.0 => Some(0),
            Some(_) => Some(1),
            None => None,
        },
    }
}

/// Label rows, drop unlabelled ones, and impute missing features
pub fn prepare(rows: &[RawRow]) -> Result<Dataset, DatasetError> {
    let labelled: Vec<(&RawRow, u8)> = rows
        .iter()
        .filter_map(|row| derive_target(row).map(|label| (row, label)))
        .collect();

    if labelled.is_empty() {
        return Err(DatasetError::Empty);
    }
    info!(
        "Labelled {} of {} rows ({} dropped without a usable target)",
        labelled.len(),
        rows.len(),
        rows.len() - labelled.len()
    );

    // Median per feature column, over the labelled rows only
    let mut medians = [0.0; FEATURE_COUNT];
    for (column, median) in medians.iter_mut().enumerate() {
        let mut values: Vec<f64> = labelled
            .iter()
            .filter_map(|(row, _)| row.features[column])
            .collect();
        if values.is_empty() {
            return Err(DatasetError::AllMissing(
                FEATURE_COLUMNS[column].to_string(),
            ));
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = values.len() / 2;
        *median = if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
    }

    let mut dataset = Dataset::default();
    for (row, label) in labelled {
        let mut sample = [0.0; FEATURE_COUNT];
        for (column, value) in sample.iter_mut().enumerate() {
            *value = row.features[column].unwrap_or(medians[column]);
        }
        dataset.features.push(sample);
        dataset.labels.push(label);
    }

    Ok(dataset)
}

/// Split into train and test sets, preserving the class ratio
///
/// Deterministic for a fixed seed. Classes with a single sample stay in
/// the training set.
pub fn stratified_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> (Dataset, Dataset) {
    let mut rng = Lcg64::new(seed);
    let mut train = Dataset::default();
    let mut test = Dataset::default();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = (0..dataset.len())
            .filter(|&i| dataset.labels[i] == class)
            .collect();
        if indices.is_empty() {
            continue;
        }
        rng.shuffle(&mut indices);

        let mut test_count = (indices.len() as f64 * test_fraction).round() as usize;
        if test_count >= indices.len() {
            test_count = indices.len() - 1;
        }

        for (position, &index) in indices.iter().enumerate() {
            let target = if position < test_count {
                &mut test
            } else {
                &mut train
            };
            target.features.push(dataset.features[index]);
            target.labels.push(dataset.labels[index]);
        }
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        features: [Option<f64>; FEATURE_COUNT],
        level: Option<&str>,
        percent: Option<f64>,
    ) -> RawRow {
        RawRow {
            features,
            bleaching_level: level.map(String::from),
            percent_bleaching: percent,
        }
    }

    #[test]
    fn test_target_rule_arms() {
        let all = [Some(1.0); FEATURE_COUNT];
        // Level present and exactly "No Bleaching"
        assert_eq!(derive_target(&row(all, Some("No Bleaching"), None)), Some(0));
        // Level present with any other value
        assert_eq!(derive_target(&row(all, Some("Severe"), None)), Some(1));
        // No level, percent exactly zero
        assert_eq!(derive_target(&row(all, None, Some(0.0))), Some(0));
        // No level, nonzero percent
        assert_eq!(derive_target(&row(all, None, Some(12.5))), Some(1));
        // Neither column
        assert_eq!(derive_target(&row(all, None, None)), None);
    }

    #[test]
    fn test_level_wins_over_percent() {
        let all = [Some(1.0); FEATURE_COUNT];
        // A percent of zero does not override a present level
        assert_eq!(derive_target(&row(all, Some("Mild"), Some(0.0))), Some(1));
    }

    #[test]
    fn test_prepare_drops_unlabelled_rows() {
        let rows = vec![
            row([Some(1.0); FEATURE_COUNT], Some("Mild"), None),
            row([Some(2.0); FEATURE_COUNT], None, None),
            row([Some(3.0); FEATURE_COUNT], None, Some(0.0)),
        ];
        let dataset = prepare(&rows).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels, vec![1, 0]);
    }

    #[test]
    fn test_prepare_imputes_median_only_for_missing() {
        let rows = vec![
            row([Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(1.0)], Some("Mild"), None),
            row([Some(3.0), Some(3.0), Some(3.0), Some(3.0), Some(3.0)], Some("Mild"), None),
            row([None, Some(5.0), Some(5.0), Some(5.0), Some(5.0)], Some("Mild"), None),
        ];
        let dataset = prepare(&rows).unwrap();
        // Median of [1, 3] for the first column fills the gap
        assert_eq!(dataset.features[2][0], 2.0);
        // Observed cells are untouched
        assert_eq!(dataset.features[0][0], 1.0);
        assert_eq!(dataset.features[2][1], 5.0);
    }

    #[test]
    fn test_prepare_rejects_all_missing_column() {
        let rows = vec![
            row([None, Some(1.0), Some(1.0), Some(1.0), Some(1.0)], Some("Mild"), None),
        ];
        assert!(matches!(
            prepare(&rows),
            Err(DatasetError::AllMissing(c)) if c == FEATURE_COLUMNS[0]
        ));
    }

    #[test]
    fn test_prepare_rejects_fully_unlabelled_input() {
        let rows = vec![row([Some(1.0); FEATURE_COUNT], None, None)];
        assert!(matches!(prepare(&rows), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_stratified_split_preserves_both_classes() {
        let mut dataset = Dataset::default();
        for i in 0..50 {
            dataset.features.push([i as f64; FEATURE_COUNT]);
            dataset.labels.push(0);
        }
        for i in 0..10 {
            dataset.features.push([100.0 + i as f64; FEATURE_COUNT]);
            dataset.labels.push(1);
        }

        let (train, test) = stratified_split(&dataset, 0.2, 42);
        assert_eq!(train.len() + test.len(), 60);
        assert_eq!(test.labels.iter().filter(|&&l| l == 0).count(), 10);
        assert_eq!(test.labels.iter().filter(|&&l| l == 1).count(), 2);
        assert_eq!(train.labels.iter().filter(|&&l| l == 1).count(), 8);
    }

    #[test]
    fn test_split_is_deterministic() {
        let mut dataset = Dataset::default();
        for i in 0..30 {
            dataset.features.push([i as f64; FEATURE_COUNT]);
            dataset.labels.push(u8::from(i % 3 == 0));
        }
        let (train_a, test_a) = stratified_split(&dataset, 0.2, 7);
        let (train_b, test_b) = stratified_split(&dataset, 0.2, 7);
        assert_eq!(train_a.features, train_b.features);
        assert_eq!(test_a.features, test_b.features);
    }

    #[test]
    fn test_singleton_class_stays_in_train() {
        let mut dataset = Dataset::default();
        for i in 0..10 {
            dataset.features.push([i as f64; FEATURE_COUNT]);
            dataset.labels.push(0);
        }
        dataset.features.push([99.0; FEATURE_COUNT]);
        dataset.labels.push(1);

        let (train, test) = stratified_split(&dataset, 0.5, 1);
        assert!(train.labels.contains(&1));
        assert!(!test.labels.contains(&1));
    }
}
