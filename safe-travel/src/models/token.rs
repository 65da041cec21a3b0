use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tokens)]
pub struct NewToken<'a> {
    pub token: &'a str,
    pub valid_until: NaiveDateTime,
    pub user_id: i32,
}
