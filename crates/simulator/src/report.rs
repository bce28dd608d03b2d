use crate::grid::{AccuracyGrid, GridCell};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedCell {
    pub accuracy: f64,
    pub lambda: f64,
    pub tau: f64,
    pub i: usize,
    pub j: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnscoredCell {
    pub lambda: f64,
    pub tau: f64,
    pub i: usize,
    pub j: usize,
    /// `None` if the cell was never evaluated.
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub top: Vec<RankedCell>,
    pub bottom: Vec<RankedCell>,
    pub unscored: Vec<UnscoredCell>,
}

/// Best and worst `n` scored cells. Failed and unset cells are never ranked;
/// they are listed in `unscored`. Equal accuracies keep grid order.
pub fn rank(grid: &AccuracyGrid, n: usize) -> Report {
    let mut scored = Vec::new();
    let mut unscored = Vec::new();
    for (i, j, lambda, tau, cell) in grid.iter() {
        match cell {
            GridCell::Accuracy(accuracy) => scored.push(RankedCell {
                accuracy: *accuracy,
                lambda,
                tau,
                i,
                j,
            }),
            GridCell::Failed(msg) => unscored.push(UnscoredCell {
                lambda,
                tau,
                i,
                j,
                error: Some(msg.clone()),
            }),
            GridCell::Unset => unscored.push(UnscoredCell {
                lambda,
                tau,
                i,
                j,
                error: None,
            }),
        }
    }

    let mut top = scored.clone();
    top.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    top.truncate(n);

    let mut bottom = scored;
    bottom.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    bottom.truncate(n);

    Report {
        top,
        bottom,
        unscored,
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top {}:", self.top.len())?;
        for c in &self.top {
            writeln!(f, "  acc = {:.4}  lambda = {:.4}  tau = {:.4}", c.accuracy, c.lambda, c.tau)?;
        }
        writeln!(f, "Bottom {}:", self.bottom.len())?;
        for c in &self.bottom {
            writeln!(f, "  acc = {:.4}  lambda = {:.4}  tau = {:.4}", c.accuracy, c.lambda, c.tau)?;
        }
        if !self.unscored.is_empty() {
            writeln!(f, "Unscored {}:", self.unscored.len())?;
            for c in &self.unscored {
                let why = c.error.as_deref().unwrap_or("not evaluated");
                writeln!(f, "  lambda = {:.4}  tau = {:.4}  {}", c.lambda, c.tau, why)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> AccuracyGrid {
        let mut g = AccuracyGrid::new(vec![0.0, 0.5, 1.0], vec![1.0, 2.0]);
        let acc = [0.60, 0.90, 0.55, 0.90, 0.70];
        for (k, a) in acc.iter().enumerate() {
            g.fill(k / 2, k % 2, GridCell::Accuracy(*a)).unwrap();
        }
        g.fill(2, 1, GridCell::Failed("diverged".into())).unwrap();
        g
    }

    #[test]
    fn ranks_both_ends() {
        let r = rank(&grid(), 2);
        let top: Vec<(usize, usize)> = r.top.iter().map(|c| (c.i, c.j)).collect();
        let bottom: Vec<(usize, usize)> = r.bottom.iter().map(|c| (c.i, c.j)).collect();
        // (0,1) and (1,1) tie at 0.90; grid order wins
        assert_eq!(top, vec![(0, 1), (1, 1)]);
        assert_eq!(bottom, vec![(1, 0), (0, 0)]);
        assert_eq!(r.top[1].lambda, 0.5);
        assert_eq!(r.top[1].tau, 2.0);
    }

    #[test]
    fn failed_cells_are_listed_not_ranked() {
        let r = rank(&grid(), 10);
        assert_eq!(r.top.len(), 5);
        assert_eq!(r.unscored.len(), 1);
        assert_eq!(r.unscored[0].error.as_deref(), Some("diverged"));
        assert!(r.to_string().contains("diverged"));
    }

    #[test]
    fn unset_cells_are_marked() {
        let g = AccuracyGrid::new(vec![0.0], vec![0.0]);
        let r = rank(&g, 3);
        assert!(r.top.is_empty());
        assert_eq!(r.unscored[0].error, None);
        assert!(r.to_string().contains("not evaluated"));
    }
}
