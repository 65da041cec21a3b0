use crate::errors::app_error::{AppError, AppResult};
use crate::models::schedule_entry::{NewScheduleEntry, ScheduleEntry};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::policy::{Action, Resource, authorize};
use crate::schema::schedule_entries;
use chrono::NaiveTime;
use diesel::prelude::*;
use log::trace;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub struct ScheduleDraft<'a> {
    pub weekday: &'a str,
    pub course_name: &'a str,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: &'a str,
}

fn weekday_index(weekday: &str) -> Option<usize> {
    WEEKDAYS
        .iter()
        .position(|day| day.eq_ignore_ascii_case(weekday.trim()))
}

pub fn add_entry(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    draft: &ScheduleDraft<'_>,
) -> AppResult<ScheduleEntry> {
    let weekday = weekday_index(draft.weekday)
        .map(|index| WEEKDAYS[index])
        .ok_or_else(|| AppError::validation(format!("'{}' is not a weekday", draft.weekday.trim())))?;

    let course_name = draft.course_name.trim();
    if course_name.is_empty() {
        return Err(AppError::validation("Course name is required"));
    }

    let room = draft.room.trim();
    if room.is_empty() {
        return Err(AppError::validation("Room is required"));
    }

    if draft.start_time >= draft.end_time {
        return Err(AppError::validation("Class must start before it ends"));
    }

    let entry = diesel::insert_into(schedule_entries::table)
        .values(&NewScheduleEntry {
            user_id: actor.id,
            weekday,
            course_name,
            start_time: draft.start_time,
            end_time: draft.end_time,
            room,
        })
        .returning(ScheduleEntry::as_returning())
        .get_result(connection)?;

    trace!("{} added schedule entry {}", actor.email, entry.id);
    Ok(entry)
}

/// A user's week, Monday first and by start time within a day
pub fn list_entries(connection: &mut SqliteConnection, user_id: i32) -> AppResult<Vec<ScheduleEntry>> {
    let mut entries: Vec<ScheduleEntry> = schedule_entries::table
        .filter(schedule_entries::user_id.eq(user_id))
        .select(ScheduleEntry::as_select())
        .load(connection)?;

    entries.sort_by_key(|entry| {
        (
            weekday_index(&entry.weekday).unwrap_or(WEEKDAYS.len()),
            entry.start_time,
            entry.id,
        )
    });
    Ok(entries)
}

pub fn delete_entry(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    entry_id: i32,
) -> AppResult<()> {
    let entry = schedule_entries::table
        .find(entry_id)
        .select(ScheduleEntry::as_select())
        .first(connection)
        .optional()?
        .ok_or_else(|| AppError::not_found("Schedule entry not found"))?;

    authorize(actor, Resource::ScheduleEntry(&entry), Action::Delete)?;

    diesel::delete(schedule_entries::table.find(entry.id)).execute(connection)?;

    trace!("{} deleted schedule entry {}", actor.email, entry.id);
    Ok(())
}
