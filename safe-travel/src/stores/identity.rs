use crate::errors::app_error::{AppError, AppResult};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::models::user::{NewUser, User};
use crate::policy::{Action, Resource, authorize};
use crate::schema::users;
use crate::stores::non_blank;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use diesel::prelude::*;
use email_address::EmailAddress;
use log::{info, trace};
use regex::Regex;
use std::sync::LazyLock;

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 ()-]{6,19}$").expect("Phone number pattern is valid")
});

pub struct Registration<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub emergency_contact: Option<&'a str>,
}

/// Profile fields to change. `None` leaves a field as it is, a blank
/// address or emergency contact clears it.
#[derive(Default)]
pub struct ProfileChanges<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub emergency_contact: Option<&'a str>,
    pub dark_mode: Option<bool>,
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct ProfileChangeset<'a> {
    name: Option<&'a str>,
    address: Option<Option<&'a str>>,
    emergency_contact: Option<Option<&'a str>>,
    dark_mode: Option<bool>,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| AppError::Internal(format!("Could not hash password: {error}")))
}

fn password_matches(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|error| AppError::Internal(format!("Stored password hash is invalid: {error}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_emergency_contact(contact: Option<&str>) -> AppResult<()> {
    match contact {
        Some(contact) if !PHONE_NUMBER.is_match(contact) => Err(AppError::validation(
            "Emergency contact must be a phone number",
        )),
        _ => Ok(()),
    }
}

fn find_by_email(connection: &mut SqliteConnection, email: &str) -> AppResult<Option<User>> {
    Ok(users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(connection)
        .optional()?)
}

pub fn register(
    connection: &mut SqliteConnection,
    institutional_email: &Regex,
    registration: &Registration<'_>,
) -> AppResult<User> {
    let email = registration.email.trim().to_lowercase();

    if !EmailAddress::is_valid(&email) {
        return Err(AppError::validation("Invalid email address"));
    }

    if !institutional_email.is_match(&email) {
        return Err(AppError::validation(
            "Only institutional email addresses are allowed",
        ));
    }

    if registration.password.chars().count() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters long",
        ));
    }

    let name = registration.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    let emergency_contact = non_blank(registration.emergency_contact);
    validate_emergency_contact(emergency_contact)?;

    if find_by_email(connection, &email)?.is_some() {
        return Err(AppError::Conflict(String::from("Email already registered")));
    }

    let password_hash = hash_password(registration.password)?;

    let user = diesel::insert_into(users::table)
        .values(&NewUser {
            email: &email,
            password: &password_hash,
            name,
            address: non_blank(registration.address),
            emergency_contact,
            is_admin: false,
            created_at: Utc::now().naive_utc(),
        })
        .returning(User::as_returning())
        .get_result(connection)
        .map_err(|error| match AppError::from(error) {
            // Lost a race against a concurrent registration
            AppError::Conflict(_) => AppError::Conflict(String::from("Email already registered")),
            other => other,
        })?;

    trace!("{} registered", user.email);
    Ok(user)
}

pub fn authenticate(connection: &mut SqliteConnection, email: &str, password: &str) -> AppResult<User> {
    let invalid = || AppError::Authentication(String::from("Email or password incorrect"));
    let email = email.trim().to_lowercase();

    let user = find_by_email(connection, &email)?.ok_or_else(invalid)?;

    if password_matches(password, &user.password)? {
        Ok(user)
    } else {
        Err(invalid())
    }
}

pub fn find_user(connection: &mut SqliteConnection, user_id: i32) -> AppResult<User> {
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(connection)
        .optional()?
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub fn update_profile(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    changes: &ProfileChanges<'_>,
) -> AppResult<User> {
    authorize(actor, Resource::Profile { owner_id: actor.id }, Action::Update)?;

    let name = match changes.name.map(str::trim) {
        Some("") => return Err(AppError::validation("Name can't be empty")),
        name => name,
    };

    let emergency_contact = changes.emergency_contact.map(|contact| non_blank(Some(contact)));
    validate_emergency_contact(emergency_contact.flatten())?;

    let changeset = ProfileChangeset {
        name,
        address: changes.address.map(|address| non_blank(Some(address))),
        emergency_contact,
        dark_mode: changes.dark_mode,
    };

    if changeset.name.is_none()
        && changeset.address.is_none()
        && changeset.emergency_contact.is_none()
        && changeset.dark_mode.is_none()
    {
        return find_user(connection, actor.id);
    }

    let user = diesel::update(users::table.find(actor.id))
        .set(&changeset)
        .returning(User::as_returning())
        .get_result(connection)?;

    trace!("{} updated their profile", user.email);
    Ok(user)
}

/// Makes `admin_email` the only administrator, creating the account with
/// `admin_password` when it does not exist yet. Running it again changes
/// nothing.
pub fn ensure_admin(
    connection: &mut SqliteConnection,
    admin_email: &str,
    admin_password: &str,
) -> AppResult<User> {
    let admin_email = admin_email.trim().to_lowercase();
    if !EmailAddress::is_valid(&admin_email) {
        return Err(AppError::validation("Invalid admin email address"));
    }

    connection.immediate_transaction::<_, AppError, _>(|connection| {
        let admin = match find_by_email(connection, &admin_email)? {
            Some(user) if user.is_admin => user,
            Some(user) => diesel::update(users::table.find(user.id))
                .set(users::is_admin.eq(true))
                .returning(User::as_returning())
                .get_result(connection)?,
            None => {
                let password_hash = hash_password(admin_password)?;
                diesel::insert_into(users::table)
                    .values(&NewUser {
                        email: &admin_email,
                        password: &password_hash,
                        name: "Administrator",
                        address: None,
                        emergency_contact: None,
                        is_admin: true,
                        created_at: Utc::now().naive_utc(),
                    })
                    .returning(User::as_returning())
                    .get_result(connection)?
            }
        };

        let demoted = diesel::update(
            users::table
                .filter(users::id.ne(admin.id))
                .filter(users::is_admin.eq(true)),
        )
        .set(users::is_admin.eq(false))
        .execute(connection)?;

        if demoted > 0 {
            info!("Removed admin rights from {demoted} other account(s)");
        }

        Ok(admin)
    })
}

/// Clears every admin flag, used when no admin is configured
pub fn revoke_admins(connection: &mut SqliteConnection) -> AppResult<usize> {
    Ok(diesel::update(users::table.filter(users::is_admin.eq(true)))
        .set(users::is_admin.eq(false))
        .execute(connection)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_connection;
    use crate::stores::test_support::{institutional_pattern, register_student};

    #[test]
    fn registration_requires_institutional_domain() {
        let connection = &mut test_connection();
        let error = register(
            connection,
            &institutional_pattern(),
            &Registration {
                email: "alex@gmail.com",
                password: "password123",
                name: "Alex Johnson",
                address: None,
                emergency_contact: None,
            },
        )
        .unwrap_err();

        assert!(matches!(error, AppError::Validation(_)));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let connection = &mut test_connection();
        register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");

        let error = register(
            connection,
            &institutional_pattern(),
            &Registration {
                email: "Student1@G.BRACU.AC.BD",
                password: "password456",
                name: "Someone Else",
                address: None,
                emergency_contact: None,
            },
        )
        .unwrap_err();

        assert!(matches!(error, AppError::Conflict(_)));
    }

    #[test]
    fn short_password_and_bad_contact_are_rejected() {
        let connection = &mut test_connection();
        let pattern = institutional_pattern();

        let short = Registration {
            email: "maya@g.bracu.ac.bd",
            password: "short",
            name: "Maya Rahman",
            address: None,
            emergency_contact: None,
        };
        assert!(matches!(register(connection, &pattern, &short), Err(AppError::Validation(_))));

        let bad_contact = Registration {
            password: "password123",
            emergency_contact: Some("call my mom"),
            ..short
        };
        assert!(matches!(
            register(connection, &pattern, &bad_contact),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn authenticate_checks_password() {
        let connection = &mut test_connection();
        let user = register_student(connection, "student2@g.bracu.ac.bd", "Maya Rahman");

        let authenticated = authenticate(connection, "student2@g.bracu.ac.bd", "password123").unwrap();
        assert_eq!(authenticated.id, user.id);

        assert!(matches!(
            authenticate(connection, "student2@g.bracu.ac.bd", "wrong-password"),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            authenticate(connection, "nobody@g.bracu.ac.bd", "password123"),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn ensure_admin_is_idempotent_and_exclusive() {
        let connection = &mut test_connection();
        let student = register_student(connection, "student3@g.bracu.ac.bd", "Omar Faruk");
        diesel::update(users::table.find(student.id))
            .set(users::is_admin.eq(true))
            .execute(connection)
            .unwrap();

        let admin = ensure_admin(connection, "admin@g.bracu.ac.bd", "admin-password").unwrap();
        let again = ensure_admin(connection, "admin@g.bracu.ac.bd", "admin-password").unwrap();

        assert!(admin.is_admin);
        assert_eq!(admin.id, again.id);
        assert!(!find_user(connection, student.id).unwrap().is_admin);

        let admins: i64 = users::table
            .filter(users::is_admin.eq(true))
            .count()
            .get_result(connection)
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[test]
    fn ensure_admin_promotes_existing_account() {
        let connection = &mut test_connection();
        let student = register_student(connection, "student4@g.bracu.ac.bd", "Priya Ahmed");

        let admin = ensure_admin(connection, "student4@g.bracu.ac.bd", "ignored-password").unwrap();

        assert_eq!(admin.id, student.id);
        assert!(admin.is_admin);
        // The existing password is kept
        assert!(authenticate(connection, "student4@g.bracu.ac.bd", "password123").is_ok());
    }

    #[test]
    fn profile_updates_only_touch_given_fields() {
        let connection = &mut test_connection();
        let user = register_student(connection, "student5@g.bracu.ac.bd", "David Wilson");
        let actor = AuthenticatedUser::from(&user);

        let updated = update_profile(
            connection,
            &actor,
            &ProfileChanges {
                address: Some("Mohakhali"),
                emergency_contact: Some("+8801700000000"),
                dark_mode: Some(true),
                ..ProfileChanges::default()
            },
        )
        .unwrap();

        assert_eq!(updated.name, "David Wilson");
        assert_eq!(updated.address.as_deref(), Some("Mohakhali"));
        assert_eq!(updated.emergency_contact.as_deref(), Some("+8801700000000"));
        assert!(updated.dark_mode);

        let cleared = update_profile(
            connection,
            &actor,
            &ProfileChanges {
                address: Some("  "),
                ..ProfileChanges::default()
            },
        )
        .unwrap();
        assert_eq!(cleared.address, None);
        assert!(cleared.dark_mode);
    }
}
