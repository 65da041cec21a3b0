use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Report {
    pub id: i32,
    pub group_id: i32,
    pub reporter_id: i32,
    pub reported_id: i32,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reports)]
pub struct NewReport<'a> {
    pub group_id: i32,
    pub reporter_id: i32,
    pub reported_id: i32,
    pub reason: &'a str,
    pub created_at: NaiveDateTime,
}
