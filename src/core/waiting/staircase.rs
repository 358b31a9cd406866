//! Forward-record staircases.
//!
//! For a direction, point `j` is a forward record of the suffix starting at
//! `i` when no point in `i..j` reaches `price[j]` (Increase: nothing at or
//! above it; Decrease: nothing at or below it). Record prices along a suffix
//! are strictly monotone, so the first point reaching any threshold is
//! always a record and can be found by a boundary search.
//!
//! The builder scans the series backwards with a stack. When index `i` is
//! admitted, the stack below it is exactly the record chain of the suffix
//! `i + 1..`, so linking `i` to the element beneath it stores every suffix
//! view at once. A binary-lifting table over those links answers
//! first-crossing queries in `O(log N)` from any starting index.

use serde::Serialize;
use tracing::debug;

use crate::types::{Direction, PriceSeries};

/// One forward record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Record {
    pub index: usize,
    pub price: f64,
}

/// Forward-record structure for one direction, built by [`build_staircase`].
#[derive(Debug, Clone)]
pub struct Staircase {
    direction: Direction,
    series: PriceSeries,
    /// Records visible from index 0, ascending index.
    records: Vec<u32>,
    /// `lifts[k][v]` is the record `2^k` links after `v`. The last record of a
    /// chain links to itself.
    lifts: Vec<Vec<u32>>,
}

/// Build the staircase of `series` for `direction` in one backward pass.
pub fn build_staircase(series: &PriceSeries, direction: Direction) -> Staircase {
    let prices = series.as_slice();
    let n = prices.len();

    let mut links = vec![0u32; n];
    let mut stack: Vec<u32> = Vec::new();

    for i in (0..n).rev() {
        let price = prices[i];
        while let Some(&top) = stack.last() {
            if direction.dominates(price, prices[top as usize]) {
                stack.pop();
            } else {
                break;
            }
        }
        // Bounded by PriceSeries::new
        let here = i as u32;
        links[i] = stack.last().copied().unwrap_or(here);
        stack.push(here);
    }
    stack.reverse();

    let mut lifts = vec![links];
    while (1usize << lifts.len()) < n {
        let prev = &lifts[lifts.len() - 1];
        let next: Vec<u32> = prev.iter().map(|&v| prev[v as usize]).collect();
        if next == *prev {
            break;
        }
        lifts.push(next);
    }

    debug!(
        %direction,
        points = n,
        records = stack.len(),
        levels = lifts.len(),
        "staircase built"
    );

    Staircase {
        direction,
        series: series.clone(),
        records: stack,
        lifts,
    }
}

impl Staircase {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of points of the underlying series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Forward records visible from index 0, ascending index.
    pub fn records(&self) -> Vec<Record> {
        let prices = self.series.as_slice();
        self.records
            .iter()
            .map(|&j| Record {
                index: j as usize,
                price: prices[j as usize],
            })
            .collect()
    }

    /// Forward records of the suffix starting at `index` (the first one is
    /// `index` itself). Empty when `index` is past the end.
    pub fn visible_from(&self, index: usize) -> Records<'_> {
        Records {
            staircase: self,
            at: (index < self.len()).then_some(index),
        }
    }

    /// Record following `index` in its suffix view.
    pub fn next_record(&self, index: usize) -> Option<usize> {
        let next = *self.lifts.first()?.get(index)? as usize;
        (next != index).then_some(next)
    }

    /// Earliest index `j >= from` whose price reaches `threshold`.
    pub fn first_crossing(&self, from: usize, threshold: f64) -> Option<usize> {
        let prices = self.series.as_slice();
        if from >= prices.len() {
            return None;
        }
        let crosses = |j: u32| self.direction.crosses(prices[j as usize], threshold);

        let mut at = from as u32;
        if crosses(at) {
            return Some(from);
        }
        // Move to the last record that still misses the threshold.
        for level in self.lifts.iter().rev() {
            let ahead = level[at as usize];
            if !crosses(ahead) {
                at = ahead;
            }
        }
        self.next_record(at as usize)
    }

    /// Whether this staircase describes exactly `series`.
    pub fn is_built_from(&self, series: &PriceSeries) -> bool {
        self.series.same_prices(series)
    }
}

/// Iterator over a suffix's forward records.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    staircase: &'a Staircase,
    at: Option<usize>,
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let index = self.at?;
        self.at = self.staircase.next_record(index);
        Some(Record {
            index,
            price: self.staircase.series.as_slice()[index],
        })
    }
}

/// Staircases for both directions of one series.
#[derive(Debug, Clone)]
pub struct Staircases {
    pub increase: Staircase,
    pub decrease: Staircase,
}

impl Staircases {
    /// Build both directions concurrently.
    pub fn build(series: &PriceSeries) -> Self {
        let (increase, decrease) = rayon::join(
            || build_staircase(series, Direction::Increase),
            || build_staircase(series, Direction::Decrease),
        );
        Self { increase, decrease }
    }

    pub fn get(&self, direction: Direction) -> &Staircase {
        match direction {
            Direction::Increase => &self.increase,
            Direction::Decrease => &self.decrease,
        }
    }
}
