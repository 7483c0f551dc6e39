// src/domain/pastry/pagination.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pastry::{entity::Pastry, value_objects::PastryId};

pub const MIN_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_PAGE_LIMIT: u32 = MIN_PAGE_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(u32);

impl PageLimit {
    pub fn new(value: u32) -> DomainResult<Self> {
        if !(MIN_PAGE_LIMIT..=MAX_PAGE_LIMIT).contains(&value) {
            return Err(DomainError::Validation(format!(
                "limit must be between {MIN_PAGE_LIMIT} and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub cursor: Option<PastryId>,
    pub limit: PageLimit,
}

impl Pagination {
    pub fn new(cursor: Option<PastryId>, limit: PageLimit) -> Self {
        Self { cursor, limit }
    }

    pub fn slice(&self) -> SliceDirective {
        SliceDirective {
            take: self.limit.get(),
            skip: u32::from(self.cursor.is_some()),
            cursor: self.cursor,
        }
    }
}

/// "Start at `cursor` (if any), skip `skip` rows, return `take` rows" over an
/// already-ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceDirective {
    pub take: u32,
    pub skip: u32,
    pub cursor: Option<PastryId>,
}

impl SliceDirective {
    /// Apply the directive to rows that are already in query order. A cursor
    /// that is not part of `ordered` yields an empty slice.
    pub fn apply<T>(&self, ordered: Vec<T>, id_of: impl Fn(&T) -> PastryId) -> Vec<T> {
        let start = match self.cursor {
            Some(cursor) => match ordered.iter().position(|row| id_of(row) == cursor) {
                Some(position) => position,
                None => return Vec::new(),
            },
            None => 0,
        };

        ordered
            .into_iter()
            .skip(start + self.skip as usize)
            .take(self.take as usize)
            .collect()
    }
}

/// Continuation cursor for a page: the id of its last row.
pub fn next_cursor(page: &[Pastry]) -> Option<PastryId> {
    page.last().map(|pastry| pastry.id)
}
