use crate::classifier::{LogisticConfig, LogisticRegression};
use crate::error::{Error, Result};
use crate::features::Features;
use rng::SeedRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldPolicy {
    /// Mean over every fold.
    All,
    /// Score fold 0 only and report it as the mean.
    FirstOnly,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidation {
    pub folds: usize,
    pub shuffle: bool,
    pub seed: u64,
    pub policy: FoldPolicy,
    pub classifier: LogisticConfig,
}

impl Default for CrossValidation {
    fn default() -> Self {
        Self {
            folds: 3,
            shuffle: true,
            seed: 0,
            policy: FoldPolicy::All,
            classifier: LogisticConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CvScore {
    pub mean: f64,
    pub folds: Vec<f64>,
}

impl CrossValidation {
    /// Test indices per fold. The first `n % k` folds hold one extra sample.
    pub fn split(&self, n: usize) -> Result<Vec<Vec<usize>>> {
        let k = self.folds;
        if k < 2 {
            return Err(Error::EmptyFold {
                fold: 0,
                folds: k,
                part: "training",
                samples: n,
            });
        }
        if n < k {
            return Err(Error::EmptyFold {
                fold: n,
                folds: k,
                part: "test",
                samples: n,
            });
        }

        let mut order: Vec<usize> = (0..n).collect();
        if self.shuffle {
            let mut rng = SeedRng::from_u64(self.seed);
            rng.shuffle(&mut order, b"KFOLD");
        }

        let mut folds = Vec::with_capacity(k);
        let mut start = 0;
        for f in 0..k {
            let size = n / k + usize::from(f < n % k);
            folds.push(order[start..start + size].to_vec());
            start += size;
        }
        Ok(folds)
    }

    pub fn evaluate(&self, x: &Features, y: &[usize], n_classes: usize) -> Result<CvScore> {
        if x.n_samples() != y.len() {
            return Err(Error::ShapeMismatch {
                what: "labels per feature row",
                expected: x.n_samples(),
                found: y.len(),
            });
        }

        let folds = self.split(y.len())?;
        let evaluated = match self.policy {
            FoldPolicy::All => folds.len(),
            FoldPolicy::FirstOnly => 1,
        };

        let mut in_test = vec![false; y.len()];
        let mut scores = Vec::with_capacity(evaluated);
        for test in folds.iter().take(evaluated) {
            in_test.iter_mut().for_each(|t| *t = false);
            for &i in test {
                in_test[i] = true;
            }

            let (train_x, train_y): (Vec<&[f64]>, Vec<usize>) = (0..y.len())
                .filter(|&i| !in_test[i])
                .map(|i| (x.row(i), y[i]))
                .unzip();
            let test_x: Vec<&[f64]> = test.iter().map(|&i| x.row(i)).collect();
            let test_y: Vec<usize> = test.iter().map(|&i| y[i]).collect();

            let model = LogisticRegression::fit(&train_x, &train_y, n_classes, &self.classifier)?;
            scores.push(model.score(&test_x, &test_y));
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(CvScore { mean, folds: scores })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cv(folds: usize, seed: u64) -> CrossValidation {
        CrossValidation {
            folds,
            seed,
            ..CrossValidation::default()
        }
    }

    #[test]
    fn folds_partition_the_indices() {
        let folds = cv(3, 5).split(10).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let mut all: Vec<usize> = folds.concat();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn unshuffled_folds_are_contiguous() {
        let c = CrossValidation {
            shuffle: false,
            ..cv(2, 0)
        };
        assert_eq!(c.split(4).unwrap(), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn too_few_samples_is_an_empty_fold() {
        assert!(matches!(
            cv(3, 0).split(2),
            Err(Error::EmptyFold { part: "test", .. })
        ));
        assert!(matches!(
            cv(1, 0).split(5),
            Err(Error::EmptyFold { part: "training", .. })
        ));
    }

    #[test]
    fn first_only_scores_a_single_fold() {
        let rows: Vec<Vec<f64>> = (0..9).map(|i| vec![i as f64]).collect();
        let y: Vec<usize> = (0..9).map(|i| (i >= 5) as usize).collect();
        let x = Features::from_rows(rows).unwrap();

        let all = cv(3, 1).evaluate(&x, &y, 2).unwrap();
        let first = CrossValidation {
            policy: FoldPolicy::FirstOnly,
            ..cv(3, 1)
        }
        .evaluate(&x, &y, 2)
        .unwrap();

        assert_eq!(all.folds.len(), 3);
        approx::assert_abs_diff_eq!(all.mean, all.folds.iter().sum::<f64>() / 3.0, epsilon = 1e-12);
        assert_eq!(first.folds.len(), 1);
        assert_eq!(first.folds[0], all.folds[0]);
        assert_eq!(first.mean, first.folds[0]);
    }
}
