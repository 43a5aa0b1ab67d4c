//! Time-series storage backing the generated value provider.
//!
//! One type per time representation. `Changes` and `Dense` both keep a
//! sorted index of stamps with parallel values; they differ in what a
//! lookup past the end of the index means. `Interval` is declared for the
//! generated storage types but its semantics belong to the host storage
//! engine and are not implemented here.

use crate::runtime::time::Time;

/// A step series: values hold until changed. A lookup past the last stamp
/// answers the last value.
#[derive(Debug, Default)]
pub struct TimeSeriesChanges<V: Clone> {
    index: Vec<Time>,
    values: Vec<V>,
}

impl<V: Clone> TimeSeriesChanges<V> {
    /// Append a point. The stamp must be strictly after the current last.
    pub fn push(&mut self, time: Time, value: V) {
        if let Some(last) = self.index.last() {
            assert!(*last < time);
        }
        self.index.push(time);
        self.values.push(value);
    }

    pub fn set(&mut self, time: &Time, new_value: V) {
        let idx = self.index.partition_point(|t| t < time);
        if idx != self.index.len() && self.index[idx] == *time {
            self.values[idx] = new_value;
        } else {
            self.index.insert(idx, *time);
            self.values.insert(idx, new_value);
        }
    }

    pub fn get(&self, time: &Time) -> Option<V> {
        let idx = self.index.partition_point(|t| t < time);
        if idx == self.index.len() {
            return self.values.last().cloned();
        }
        if self.index[idx] != *time {
            return None;
        }
        Some(self.values[idx].clone())
    }
}

/// A dense series: only exact stamps answer.
#[derive(Debug, Default)]
pub struct TimeSeriesDense<V: Clone> {
    index: Vec<Time>,
    values: Vec<V>,
}

impl<V: Clone> TimeSeriesDense<V> {
    /// Append a point. The stamp must be strictly after the current last.
    pub fn push(&mut self, time: Time, value: V) {
        if let Some(last) = self.index.last() {
            assert!(*last < time);
        }
        self.index.push(time);
        self.values.push(value);
    }

    pub fn set(&mut self, time: &Time, new_value: V) {
        let idx = self.index.partition_point(|t| t < time);
        if idx != self.index.len() && self.index[idx] == *time {
            self.values[idx] = new_value;
        } else {
            self.index.insert(idx, *time);
            self.values.insert(idx, new_value);
        }
    }

    pub fn get(&self, time: &Time) -> Option<V> {
        let idx = self.index.partition_point(|t| t < time);
        if idx == self.index.len() || self.index[idx] != *time {
            return None;
        }
        Some(self.values[idx].clone())
    }
}

/// An interval series. Storage and interpolation semantics are the host
/// storage engine's to define.
#[derive(Debug, Default)]
pub struct TimeSeriesInterval<V: Clone> {
    _index: Vec<(Time, Time)>,
    _values: Vec<V>,
}

impl<V: Clone> TimeSeriesInterval<V> {
    pub fn set(&mut self, _time: &Time, _new_value: V) {
        todo!()
    }

    pub fn get(&self, _time: &Time) -> Option<V> {
        todo!()
    }
}
