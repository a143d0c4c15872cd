//! Planning-horizon calendar model.
//!
//! Discretizes a date range into an ordered sequence of month slots,
//! indexed contiguously from zero, with a parallel vacation flag per
//! slot. A batch occupies *session months*: calendar months counted
//! forward from its start slot, skipping vacation slots (calendar time
//! still elapses during a vacation, session time does not).
//!
//! # Invariant
//! [`MonthCalendar::active_months`] is the only implementation of the
//! vacation-skipping walk. Every consumer — window computation, both
//! optimization stages, reporting — must call it rather than recompute
//! session months, so the semantics cannot drift between components.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a calendar.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// The end date precedes the start date.
    #[error("calendar end {end} precedes start {start}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

/// An ordered sequence of month slots spanning the planning horizon.
///
/// Slot indices are contiguous, zero-based, and strictly increasing in
/// calendar order. Each slot carries a `"Jan/26"`-style label and a
/// vacation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCalendar {
    /// First day of the first month slot.
    origin: NaiveDate,
    /// Display label per slot (`"%b/%y"`).
    labels: Vec<String>,
    /// Vacation flag per slot.
    vacation: Vec<bool>,
}

impl MonthCalendar {
    /// Builds a calendar covering every month touched by `[start, end]`.
    ///
    /// Both dates are truncated to the first of their month; the range
    /// is inclusive on both sides.
    pub fn from_range(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if end < start {
            return Err(CalendarError::EmptyRange { start, end });
        }

        let origin = first_of_month(start);
        let last = first_of_month(end);
        let count = month_offset(origin, last) + 1;

        let mut labels = Vec::with_capacity(count);
        let mut cursor = origin;
        for _ in 0..count {
            labels.push(cursor.format("%b/%y").to_string());
            // Day-1 dates always survive a +1 month step.
            cursor = cursor + Months::new(1);
        }

        Ok(Self {
            origin,
            vacation: vec![false; labels.len()],
            labels,
        })
    }

    /// Number of month slots in the horizon.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the horizon is empty (never true for a built calendar).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Slot index of the month containing `date`.
    ///
    /// Returns `None` if the date falls outside the horizon.
    pub fn month_index(&self, date: NaiveDate) -> Option<usize> {
        let month = first_of_month(date);
        if month < self.origin {
            return None;
        }
        let idx = month_offset(self.origin, month);
        (idx < self.len()).then_some(idx)
    }

    /// Display label for a slot.
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Slot index carrying the given label, if any.
    pub fn index_of_label(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Marks a slot as a vacation month.
    pub fn mark_vacation(&mut self, index: usize) {
        if index < self.vacation.len() {
            self.vacation[index] = true;
        }
    }

    /// Marks every slot whose label appears in `labels` as vacation.
    ///
    /// Labels outside the horizon are ignored: a configured vacation
    /// month that falls outside the planning period constrains nothing.
    pub fn with_vacation_labels(mut self, labels: &[String]) -> Self {
        for label in labels {
            if let Some(idx) = self.index_of_label(label) {
                self.vacation[idx] = true;
            }
        }
        self
    }

    /// Whether a slot is a vacation month.
    #[inline]
    pub fn is_vacation(&self, index: usize) -> bool {
        self.vacation.get(index).copied().unwrap_or(false)
    }

    /// Indices of all vacation slots, in calendar order.
    pub fn vacation_indices(&self) -> Vec<usize> {
        self.vacation
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
            .collect()
    }

    /// Session months for a batch starting at `start` with the given
    /// duration in session months.
    ///
    /// Walks forward from `start`, skipping vacation slots, collecting
    /// slot indices until `duration` non-vacation months are gathered
    /// or the horizon ends. A result shorter than `duration` means the
    /// batch cannot finish inside the horizon — callers must treat that
    /// as a constraint violation, never as a shorter course.
    pub fn active_months(&self, start: usize, duration: usize) -> Vec<usize> {
        let mut active = Vec::with_capacity(duration);
        let mut slot = start;
        while active.len() < duration && slot < self.len() {
            if !self.vacation[slot] {
                active.push(slot);
            }
            slot += 1;
        }
        active
    }
}

/// Truncates a date to the first day of its month.
fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 is always valid")
}

/// Whole months from `from` to `to`, both day-1 dates, `to >= from`.
fn month_offset(from: NaiveDate, to: NaiveDate) -> usize {
    let years = (to.year() - from.year()) as isize;
    let months = to.month() as isize - from.month() as isize;
    (years * 12 + months) as usize
}
