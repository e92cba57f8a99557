//! Pure operations over the in-memory expense list.
//!
//! Every function validates first and mutates second, so an `Err` never leaves
//! the list half-modified.

use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::types::timestamp::parse_lenient;
use crate::types::{Expense, ExpenseInput, ExpenseQuery, NewExpense};

pub type ExpenseId = i64;

const INVALID_BOUND: &str = "startdate and enddate must be valid dates";

/// Inclusive `[start, end]` window resolved from the query bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Yields `None` unless both bounds are present and non-empty.
    pub fn from_query(query: &ExpenseQuery) -> Result<Option<Self>, LedgerError> {
        let (Some(start), Some(end)) = (present(&query.startdate), present(&query.enddate)) else {
            return Ok(None);
        };
        let start =
            parse_lenient(start).ok_or_else(|| LedgerError::Validation(INVALID_BOUND.into()))?;
        let end = parse_lenient(end).ok_or_else(|| LedgerError::Validation(INVALID_BOUND.into()))?;
        if start > end {
            return Err(LedgerError::InvalidRange);
        }
        Ok(Some(Self { start, end }))
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        *date >= self.start && *date <= self.end
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Compiled form of [`ExpenseQuery`]; building it performs all query validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    category: Option<String>,
    range: Option<DateRange>,
}

impl ListFilter {
    pub fn from_query(query: &ExpenseQuery) -> Result<Self, LedgerError> {
        Ok(Self {
            category: present(&query.category).map(str::to_lowercase),
            range: DateRange::from_query(query)?,
        })
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.category
            .as_deref()
            .is_none_or(|c| expense.category.to_lowercase() == c)
            && self.range.is_none_or(|r| r.contains(&expense.date))
    }

    /// Category and date-range filters compose by intersection.
    pub fn apply(&self, expenses: Vec<Expense>) -> Vec<Expense> {
        expenses.into_iter().filter(|e| self.matches(e)).collect()
    }
}

pub fn filter(expenses: Vec<Expense>, query: &ExpenseQuery) -> Result<Vec<Expense>, LedgerError> {
    Ok(ListFilter::from_query(query)?.apply(expenses))
}

/// Max-scan id assignment; equals "last id + 1" for an append-ordered list.
pub fn next_id(expenses: &[Expense]) -> Result<ExpenseId, LedgerError> {
    match expenses.iter().map(|e| e.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(LedgerError::IdSpaceExhausted(max)),
    }
}

pub fn parse_id(raw: &str) -> Result<ExpenseId, LedgerError> {
    raw.trim()
        .parse::<ExpenseId>()
        .map_err(|_| LedgerError::id_not_integer())
}

/// Append a new expense stamped with `now`; returns its id.
pub fn insert(
    expenses: &mut Vec<Expense>,
    new: NewExpense,
    now: DateTime<Utc>,
) -> Result<ExpenseId, LedgerError> {
    let id = next_id(expenses)?;
    expenses.push(Expense {
        id,
        name: new.name,
        nominal: new.nominal,
        category: new.category,
        date: now,
    });
    Ok(id)
}

fn position(expenses: &[Expense], id: ExpenseId) -> Result<usize, LedgerError> {
    expenses
        .iter()
        .position(|e| e.id == id)
        .ok_or(LedgerError::NotFound(id))
}

pub fn find(expenses: &[Expense], id: ExpenseId) -> Result<&Expense, LedgerError> {
    position(expenses, id).map(|idx| &expenses[idx])
}

/// Replace the entry in place, keeping its position, id and date.
pub fn update(
    expenses: &mut [Expense],
    id: ExpenseId,
    patch: ExpenseInput,
) -> Result<(), LedgerError> {
    let idx = position(expenses, id)?;
    expenses[idx] = patch.apply_to(&expenses[idx]);
    Ok(())
}

pub fn remove(expenses: &mut Vec<Expense>, id: ExpenseId) -> Result<Expense, LedgerError> {
    let idx = position(expenses, id)?;
    Ok(expenses.remove(idx))
}
