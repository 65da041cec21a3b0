use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::travel_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub destination: String,
    pub meeting_point: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub departure_time: NaiveDateTime,
    /// `Some(true)` when heading to campus, `Some(false)` when heading home
    pub to_campus: Option<bool>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::travel_groups)]
pub struct NewGroup<'a> {
    pub name: &'a str,
    pub destination: &'a str,
    pub meeting_point: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub departure_time: NaiveDateTime,
    pub to_campus: Option<bool>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}
