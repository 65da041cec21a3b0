use chrono::NaiveTime;
use diesel::prelude::*;
use dotenvy::dotenv;
use env_logger::Env;
use log::{info, warn};
use safe_travel::config::Config;
use safe_travel::database;
use safe_travel::display_time::parse_departure_time;
use safe_travel::errors::app_error::{AppError, AppResult};
use safe_travel::models::transient::authenticated_user::AuthenticatedUser;
use safe_travel::schema::users;
use safe_travel::stores::groups::{self, GroupDraft};
use safe_travel::stores::identity::{self, Registration};
use safe_travel::stores::schedule::{self, ScheduleDraft};
use safe_travel::stores::{membership, messaging};

const STUDENTS: [(&str, &str); 5] = [
    ("student1@g.bracu.ac.bd", "Alex Johnson"),
    ("student2@g.bracu.ac.bd", "Maya Rahman"),
    ("student3@g.bracu.ac.bd", "Omar Faruk"),
    ("student4@g.bracu.ac.bd", "Priya Ahmed"),
    ("student5@g.bracu.ac.bd", "David Wilson"),
];

/// (creator, name, destination, local departure time)
const GROUPS: [(usize, &str, &str, &str); 3] = [
    (0, "CSE370 Study Group", "BRACU Main Campus", "2025-05-03 15:30"),
    (1, "Weekend Meetup", "Gulshan City Center", "2025-05-05 10:00"),
    (2, "Library Session", "Ayesha Abed Library", "2025-05-04 14:00"),
];

/// (student, group)
const MEMBERSHIPS: [(usize, usize); 8] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (1, 1),
    (3, 1),
    (0, 2),
    (2, 2),
    (4, 2),
];

/// (student, weekday, course, start, end, room)
const CLASSES: [(usize, &str, &str, (u32, u32), (u32, u32), &str); 5] = [
    (0, "Monday", "CSE370 - Database Systems", (10, 0), (11, 30), "UB30401"),
    (0, "Monday", "CSE471 - System Analysis", (13, 0), (14, 30), "UB40901"),
    (1, "Tuesday", "CSE370 - Database Systems", (14, 0), (15, 30), "UB30401"),
    (2, "Wednesday", "CSE423 - Computer Graphics", (10, 0), (11, 30), "UB21301"),
    (3, "Thursday", "CSE471 - System Analysis", (13, 0), (14, 30), "UB40901"),
];

/// (sender, group, content), posted in this order
const MESSAGES: [(usize, usize, &str); 8] = [
    (0, 0, "Hey everyone, are we still meeting tomorrow?"),
    (1, 0, "Yes, I'll be there at the usual time."),
    (2, 0, "I might be 10 minutes late, but I'll definitely come."),
    (1, 1, "Let's meet at the main entrance."),
    (3, 1, "Sounds good to me!"),
    (0, 2, "I've reserved a study room for us."),
    (2, 2, "Great! Which floor?"),
    (0, 2, "3rd floor, room 305."),
];

fn class_time((hour, minute): (u32, u32)) -> AppResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::validation(format!("{hour}:{minute} is not a time of day")))
}

fn seed(connection: &mut SqliteConnection, config: &Config) -> AppResult<()> {
    let mut students = Vec::with_capacity(STUDENTS.len());
    for (email, name) in STUDENTS {
        let user = identity::register(
            connection,
            &config.institutional_email,
            &Registration {
                email,
                password: "password123",
                name,
                address: None,
                emergency_contact: None,
            },
        )?;
        students.push(AuthenticatedUser::from(&user));
    }
    info!("Created {} users", students.len());

    let mut trips = Vec::with_capacity(GROUPS.len());
    for (creator, name, destination, departure) in GROUPS {
        let group = groups::create_group(
            connection,
            &students[creator],
            &GroupDraft {
                name,
                destination,
                meeting_point: None,
                latitude: None,
                longitude: None,
                departure_time: parse_departure_time(departure, config.display_offset)?,
                to_campus: None,
            },
        )?;
        trips.push(group);
    }
    info!("Created {} groups", trips.len());

    for (student, trip) in MEMBERSHIPS {
        membership::join_group(connection, &students[student], trips[trip].id)?;
    }
    info!("Created {} memberships", MEMBERSHIPS.len());

    for (student, weekday, course_name, start, end, room) in CLASSES {
        schedule::add_entry(
            connection,
            &students[student],
            &ScheduleDraft {
                weekday,
                course_name,
                start_time: class_time(start)?,
                end_time: class_time(end)?,
                room,
            },
        )?;
    }
    info!("Created {} schedule entries", CLASSES.len());

    for (sender, trip, content) in MESSAGES {
        messaging::post_message(connection, &students[sender], trips[trip].id, content)?;
    }
    info!("Created {} messages", MESSAGES.len());

    Ok(())
}

fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().expect("Invalid configuration");
    let pool = database::build_pool(&config.database_url).expect("Could not build connection pool");
    let connection = &mut pool.get().expect("Could not get connection from pool");
    database::run_migrations(connection).expect("Could not run migrations");

    let existing: i64 = users::table
        .count()
        .get_result(connection)
        .expect("Could not count users");
    if existing > 0 {
        warn!("Database already has {existing} user(s), not seeding");
        return;
    }

    seed(connection, &config).expect("Could not seed database");

    info!("Demonstration data created");
}
