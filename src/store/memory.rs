//! In-memory reference store.
//!
//! Backs the trait contracts in [`super`] with plain hash maps behind a
//! single mutex. The single lock makes the charge upsert batch atomic: a
//! concurrent reader sees either none or all of a batch's rows.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

use crate::models::{
    AttendanceRecord, Child, ChildId, GroupId, Holiday, MonthlyCharge, MonthlyChargeSummary,
};

use super::{AttendanceSource, ChargeStore, ChildSource, HolidaySource, StoreError};

#[derive(Default)]
struct Tables {
    children: Vec<Child>,
    holidays: Vec<Holiday>,
    attendance: HashMap<(ChildId, NaiveDate), AttendanceRecord>,
    charges: HashMap<(ChildId, i32, u32), MonthlyCharge>,
    next_charge_id: i64,
}

/// An in-memory implementation of all four storage contracts.
///
/// Used by the test suites and benchmarks, and suitable as a backing store
/// for demos. Cloning is not supported; share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use fee_engine::models::Child;
/// use fee_engine::store::{ChildSource, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.add_child(Child { id: 1, full_name: "Anna".to_string(), group_id: Some(10) });
/// assert_eq!(store.fetch_children(10).unwrap().len(), 1);
/// ```
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_charge_id: 1,
                ..Tables::default()
            }),
        }
    }

    /// Adds a child.
    pub fn add_child(&self, child: Child) {
        self.tables.lock().unwrap().children.push(child);
    }

    /// Adds a marked holiday.
    pub fn add_holiday(&self, holiday: Holiday) {
        self.tables.lock().unwrap().holidays.push(holiday);
    }

    /// Adds or replaces the attendance record for `(child, date)`.
    pub fn add_attendance(&self, record: AttendanceRecord) {
        self.tables
            .lock()
            .unwrap()
            .attendance
            .insert((record.child_id, record.date), record);
    }

    /// Returns the persisted charge for `(child, year, month)`, if any.
    pub fn charge_for(&self, child_id: ChildId, year: i32, month: u32) -> Option<MonthlyCharge> {
        self.tables
            .lock()
            .unwrap()
            .charges
            .get(&(child_id, year, month))
            .cloned()
    }

    /// Returns the total number of persisted charge rows.
    pub fn charge_count(&self) -> usize {
        self.tables.lock().unwrap().charges.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChildSource for MemoryStore {
    fn fetch_children(&self, group_id: GroupId) -> Result<Vec<Child>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut children: Vec<Child> = tables
            .children
            .iter()
            .filter(|c| c.group_id == Some(group_id))
            .cloned()
            .collect();
        children.sort_by_key(|c| c.id);
        Ok(children)
    }
}

impl HolidaySource for MemoryStore {
    fn fetch_holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .holidays
            .iter()
            .filter(|h| h.date >= start && h.date <= end)
            .cloned()
            .collect())
    }
}

impl AttendanceSource for MemoryStore {
    fn fetch_attendance(
        &self,
        child_id: ChildId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .values()
            .filter(|r| r.child_id == child_id && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

impl ChargeStore for MemoryStore {
    fn upsert_charges(
        &self,
        summaries: &[MonthlyChargeSummary],
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthlyCharge>, StoreError> {
        // One lock held across the whole batch: all-or-nothing visibility.
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();

        let mut persisted = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let key = (summary.child_id, year, month);
            let charge = match tables.charges.get(&key) {
                Some(existing) => MonthlyCharge {
                    id: existing.id,
                    child_id: summary.child_id,
                    year,
                    month,
                    amount_due: summary.amount_due,
                    calculation_details: summary.calculation_details.clone(),
                    calculated_at: now,
                },
                None => {
                    let id = tables.next_charge_id;
                    tables.next_charge_id += 1;
                    MonthlyCharge {
                        id,
                        child_id: summary.child_id,
                        year,
                        month,
                        amount_due: summary.amount_due,
                        calculation_details: summary.calculation_details.clone(),
                        calculated_at: now,
                    }
                }
            };
            tables.charges.insert(key, charge.clone());
            persisted.push(charge);
        }

        Ok(persisted)
    }
}
