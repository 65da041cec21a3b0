//! Database operations, one module per store.
//!
//! Every function takes a plain `SqliteConnection` so callers decide where the
//! connection comes from (the request pool, a seed script, a test database).

pub mod groups;
pub mod identity;
pub mod membership;
pub mod messaging;
pub mod reputation;
pub mod schedule;
pub mod sessions;

#[cfg(test)]
pub(crate) mod test_support;

/// Trims `value` and turns blank input into `None`
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
