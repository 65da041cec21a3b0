use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub name: String,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub is_admin: bool,
    pub dark_mode: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub emergency_contact: Option<&'a str>,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}
