use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::memberships)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Membership {
    pub user_id: i32,
    pub group_id: i32,
    pub joined_at: NaiveDateTime,
}
