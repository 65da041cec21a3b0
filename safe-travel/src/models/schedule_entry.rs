use chrono::NaiveTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = crate::schema::schedule_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScheduleEntry {
    pub id: i32,
    pub user_id: i32,
    pub weekday: String,
    pub course_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::schedule_entries)]
pub struct NewScheduleEntry<'a> {
    pub user_id: i32,
    pub weekday: &'a str,
    pub course_name: &'a str,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: &'a str,
}
