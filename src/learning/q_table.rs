use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::{actions::Action, error::FarmError};

/// Dense table of action values: one row per encoded state, one column per action.
#[derive(Clone, PartialEq)]
pub struct QTable {
    rows: usize,
    values: Vec<f32>,
}

// On-disk form: the table shape plus every row holding a non-zero value.
#[derive(Debug, Serialize, Deserialize)]
struct QTableSnapshot {
    rows: usize,
    actions: usize,
    entries: Vec<(usize, Vec<f32>)>,
}

impl QTable {
    pub fn new(rows: usize) -> Self {
        QTable {
            rows,
            values: vec![0.0; rows * Action::COUNT],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * Action::COUNT;
        &self.values[start..start + Action::COUNT]
    }

    pub fn get(&self, row: usize, action: Action) -> f32 {
        self.values[row * Action::COUNT + action.index()]
    }

    pub fn set(&mut self, row: usize, action: Action, value: f32) {
        self.values[row * Action::COUNT + action.index()] = value;
    }

    pub fn max_value(&self, row: usize) -> f32 {
        self.row(row).iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Highest valued action in the row; ties go to the earliest action.
    pub fn best_action(&self, row: usize) -> Action {
        let values = self.row(row);
        let mut best = Action::iter().next().unwrap_or(Action::DoNothing);
        for action in Action::iter() {
            if values[action.index()] > values[best.index()] {
                best = action;
            }
        }
        best
    }

    /// Q-learning update: `Q(s,a) <- (1 - alpha) Q(s,a) + alpha (r + gamma max_a' Q(s',a'))`.
    /// Returns the new value.
    pub fn update(
        &mut self,
        row: usize,
        action: Action,
        reward: f32,
        next_row: usize,
        learning_rate: f32,
        discount_factor: f32,
    ) -> f32 {
        // Read the bootstrap target before writing, in case next_row == row.
        let target = reward + discount_factor * self.max_value(next_row);
        let old = self.get(row, action);
        let new = (1.0 - learning_rate) * old + learning_rate * target;
        self.set(row, action, new);
        new
    }

    /// Number of rows with at least one non-zero value.
    pub fn visited_rows(&self) -> usize {
        self.values
            .chunks(Action::COUNT)
            .filter(|row| row.iter().any(|v| *v != 0.0))
            .count()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FarmError> {
        let entries = self
            .values
            .chunks(Action::COUNT)
            .enumerate()
            .filter(|(_, row)| row.iter().any(|v| *v != 0.0))
            .map(|(idx, row)| (idx, row.to_vec()))
            .collect();
        let snapshot = QTableSnapshot {
            rows: self.rows,
            actions: Action::COUNT,
            entries,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &snapshot)?;
        Ok(())
    }

    /// Loads a table saved by `save`, checking it has `expected_rows` rows.
    pub fn load<P: AsRef<Path>>(path: P, expected_rows: usize) -> Result<Self, FarmError> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: QTableSnapshot = serde_json::from_reader(reader)?;
        if snapshot.rows != expected_rows || snapshot.actions != Action::COUNT {
            return Err(FarmError::TableShape {
                expected_rows,
                expected_actions: Action::COUNT,
                rows: snapshot.rows,
                actions: snapshot.actions,
            });
        }
        let mut table = QTable::new(expected_rows);
        for (row, values) in snapshot.entries {
            if row >= expected_rows || values.len() != Action::COUNT {
                return Err(FarmError::TableEntry {
                    row,
                    actions: values.len(),
                    rows: expected_rows,
                });
            }
            let start = row * Action::COUNT;
            table.values[start..start + Action::COUNT].copy_from_slice(&values);
        }
        Ok(table)
    }
}
