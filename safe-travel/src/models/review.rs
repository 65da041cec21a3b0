use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Review {
    pub id: i32,
    pub group_id: i32,
    pub reviewer_id: i32,
    pub reviewed_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub group_id: i32,
    pub reviewer_id: i32,
    pub reviewed_id: i32,
    pub rating: i32,
    pub comment: &'a str,
    pub created_at: NaiveDateTime,
}
