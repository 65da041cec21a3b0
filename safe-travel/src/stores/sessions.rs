use crate::errors::app_error::AppResult;
use crate::models::token::NewToken;
use crate::models::user::User;
use crate::schema::{tokens, users};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;

/// Creates a random session token for `user_id` valid for `lifetime`
pub fn issue_token(connection: &mut SqliteConnection, user_id: i32, lifetime: Duration) -> AppResult<String> {
    let mut bytes = [0u8; 88];
    OsRng.fill_bytes(&mut bytes);
    let generated_token = URL_SAFE.encode(bytes);

    diesel::insert_into(tokens::table)
        .values(&NewToken {
            token: &generated_token,
            valid_until: Utc::now().naive_utc() + lifetime,
            user_id,
        })
        .execute(connection)?;

    Ok(generated_token)
}

/// Owner of `token`, if the token exists and has not expired at `now`
pub fn resolve_token(
    connection: &mut SqliteConnection,
    token: &str,
    now: NaiveDateTime,
) -> AppResult<Option<User>> {
    Ok(tokens::table
        .inner_join(users::table)
        .filter(tokens::token.eq(token))
        .filter(tokens::valid_until.ge(now))
        .select(User::as_select())
        .first(connection)
        .optional()?)
}

pub fn revoke_token(connection: &mut SqliteConnection, token: &str) -> AppResult<()> {
    diesel::delete(tokens::table.filter(tokens::token.eq(token))).execute(connection)?;
    Ok(())
}

pub fn prune_expired(connection: &mut SqliteConnection, user_id: i32, now: NaiveDateTime) -> AppResult<usize> {
    Ok(diesel::delete(
        tokens::table
            .filter(tokens::user_id.eq(user_id))
            .filter(tokens::valid_until.lt(now)),
    )
    .execute(connection)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_connection;
    use crate::stores::test_support::register_student;

    #[test]
    fn token_resolves_until_it_expires() {
        let connection = &mut test_connection();
        let user = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let token = issue_token(connection, user.id, Duration::hours(24)).unwrap();
        let now = Utc::now().naive_utc();

        let resolved = resolve_token(connection, &token, now).unwrap();
        assert_eq!(resolved.map(|user| user.id), Some(user.id));

        let later = now + Duration::hours(25);
        assert!(resolve_token(connection, &token, later).unwrap().is_none());

        assert_eq!(prune_expired(connection, user.id, later).unwrap(), 1);
    }

    #[test]
    fn revoked_token_no_longer_resolves() {
        let connection = &mut test_connection();
        let user = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let token = issue_token(connection, user.id, Duration::hours(1)).unwrap();

        revoke_token(connection, &token).unwrap();

        assert!(resolve_token(connection, &token, Utc::now().naive_utc()).unwrap().is_none());
    }
}
