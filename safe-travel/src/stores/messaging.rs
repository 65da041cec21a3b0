use crate::errors::app_error::{AppError, AppResult};
use crate::models::message::{Message, NewMessage};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::policy::{Action, Resource, authorize};
use crate::schema::{messages, users};
use crate::stores::groups::find_group;
use crate::stores::membership::is_member;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use log::trace;

pub const MAX_MESSAGE_LENGTH: usize = 2000;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub message: Message,
    pub sender_name: String,
}

impl From<(Message, String)> for ChatMessage {
    fn from((message, sender_name): (Message, String)) -> Self {
        ChatMessage {
            message,
            sender_name,
        }
    }
}

/// Appends a message to a group's chat. The timestamp never goes below the
/// latest one already in the group, so chat order and time order agree.
pub fn post_message(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    group_id: i32,
    content: &str,
) -> AppResult<Message> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::validation("Message can't be empty"));
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::validation(format!(
            "Message can't be longer than {MAX_MESSAGE_LENGTH} characters"
        )));
    }

    // Write lock first, concurrent posters then wait on busy_timeout
    let message = connection.immediate_transaction::<_, AppError, _>(|connection| {
        let group = find_group(connection, group_id)?;
        let member = is_member(connection, actor.id, group.id)?;
        authorize(
            actor,
            Resource::Group {
                group: &group,
                is_member: member,
            },
            Action::PostMessage,
        )?;

        let latest: Option<NaiveDateTime> = messages::table
            .filter(messages::group_id.eq(group.id))
            .select(diesel::dsl::max(messages::created_at))
            .get_result(connection)?;

        let now = Utc::now().naive_utc();
        let created_at = latest.map_or(now, |latest| latest.max(now));

        Ok(diesel::insert_into(messages::table)
            .values(&NewMessage {
                group_id: group.id,
                sender_id: actor.id,
                content,
                created_at,
            })
            .returning(Message::as_returning())
            .get_result(connection)?)
    })?;

    trace!("{} sent message {} to group {}", actor.email, message.id, message.group_id);
    Ok(message)
}

/// Whole chat history of a group, oldest first
pub fn list_messages(connection: &mut SqliteConnection, group_id: i32) -> AppResult<Vec<ChatMessage>> {
    let rows: Vec<(Message, String)> = messages::table
        .inner_join(users::table)
        .filter(messages::group_id.eq(group_id))
        .order((messages::created_at.asc(), messages::id.asc()))
        .select((Message::as_select(), users::name))
        .load(connection)?;

    Ok(rows.into_iter().map(ChatMessage::from).collect())
}

/// One page of chat history: up to `limit` messages following `after_id`
pub fn list_messages_after(
    connection: &mut SqliteConnection,
    group_id: i32,
    after_id: Option<i32>,
    limit: i64,
) -> AppResult<Vec<ChatMessage>> {
    let mut query = messages::table
        .inner_join(users::table)
        .filter(messages::group_id.eq(group_id))
        .order((messages::created_at.asc(), messages::id.asc()))
        .select((Message::as_select(), users::name))
        .into_boxed();

    if let Some(after_id) = after_id {
        query = query.filter(messages::id.gt(after_id));
    }

    let rows: Vec<(Message, String)> = query
        .limit(limit.clamp(1, MAX_PAGE_SIZE))
        .load(connection)?;

    Ok(rows.into_iter().map(ChatMessage::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{build_pool, run_migrations, test_connection};
    use crate::stores::membership::join_group;
    use crate::stores::test_support::{create_trip, register_student};
    use chrono::Duration;

    #[test]
    fn messages_come_back_in_append_order() {
        let connection = &mut test_connection();
        let alex = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let maya = register_student(connection, "student2@g.bracu.ac.bd", "Maya Rahman");
        let alex_actor = AuthenticatedUser::from(&alex);
        let maya_actor = AuthenticatedUser::from(&maya);
        let group = create_trip(connection, &alex, "CSE370 Study Group");
        join_group(connection, &maya_actor, group.id).unwrap();

        let contents = [
            "Hey everyone, are we still meeting tomorrow?",
            "Yes, I'll be there at the usual time.",
            "Let's meet at the main entrance.",
        ];
        let posted: Vec<Message> = contents
            .iter()
            .enumerate()
            .map(|(index, content)| {
                let actor = if index % 2 == 0 { &alex_actor } else { &maya_actor };
                post_message(connection, actor, group.id, content).unwrap()
            })
            .collect();

        let listed = list_messages(connection, group.id).unwrap();

        assert_eq!(
            listed.iter().map(|chat| chat.message.id).collect::<Vec<_>>(),
            posted.iter().map(|message| message.id).collect::<Vec<_>>()
        );
        assert!(
            listed
                .windows(2)
                .all(|pair| pair[0].message.created_at <= pair[1].message.created_at)
        );
        assert_eq!(listed[1].sender_name, "Maya Rahman");
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let connection = &mut test_connection();
        let alex = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let actor = AuthenticatedUser::from(&alex);
        let group = create_trip(connection, &alex, "CSE370 Study Group");

        let future = Utc::now().naive_utc() + Duration::hours(1);
        diesel::insert_into(messages::table)
            .values(&NewMessage {
                group_id: group.id,
                sender_id: alex.id,
                content: "from a skewed clock",
                created_at: future,
            })
            .execute(connection)
            .unwrap();

        let message = post_message(connection, &actor, group.id, "after it").unwrap();

        assert!(message.created_at >= future);
    }

    #[test]
    fn outsiders_cannot_post() {
        let connection = &mut test_connection();
        let alex = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let omar = register_student(connection, "student3@g.bracu.ac.bd", "Omar Faruk");
        let group = create_trip(connection, &alex, "CSE370 Study Group");

        let error = post_message(connection, &AuthenticatedUser::from(&omar), group.id, "hi").unwrap_err();

        assert!(matches!(error, AppError::Authorization(_)));
        assert!(list_messages(connection, group.id).unwrap().is_empty());
    }

    #[test]
    fn blank_messages_are_rejected() {
        let connection = &mut test_connection();
        let alex = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let group = create_trip(connection, &alex, "CSE370 Study Group");

        assert!(matches!(
            post_message(connection, &AuthenticatedUser::from(&alex), group.id, "   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn pages_follow_the_cursor() {
        let connection = &mut test_connection();
        let alex = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
        let actor = AuthenticatedUser::from(&alex);
        let group = create_trip(connection, &alex, "CSE370 Study Group");
        let ids: Vec<i32> = (0..5)
            .map(|index| {
                post_message(connection, &actor, group.id, &format!("message {index}"))
                    .unwrap()
                    .id
            })
            .collect();

        let first = list_messages_after(connection, group.id, None, 2).unwrap();
        let second = list_messages_after(connection, group.id, Some(first[1].message.id), 2).unwrap();
        let rest = list_messages_after(connection, group.id, Some(second[1].message.id), 10).unwrap();

        let paged: Vec<i32> = first
            .iter()
            .chain(&second)
            .chain(&rest)
            .map(|chat| chat.message.id)
            .collect();
        assert_eq!(paged, ids);
    }

    #[test]
    fn concurrent_posters_all_land_in_order() {
        let directory = tempfile::tempdir().unwrap();
        let database_path = directory.path().join("chat.db");
        let pool = build_pool(database_path.to_str().unwrap()).unwrap();

        let (group, posters) = {
            let connection = &mut pool.get().unwrap();
            run_migrations(connection).unwrap();
            let alex = register_student(connection, "student1@g.bracu.ac.bd", "Alex Johnson");
            let group = create_trip(connection, &alex, "CSE370 Study Group");

            let mut posters = vec![AuthenticatedUser::from(&alex)];
            for index in 2..=8 {
                let student = register_student(
                    connection,
                    &format!("student{index}@g.bracu.ac.bd"),
                    &format!("Student {index}"),
                );
                let actor = AuthenticatedUser::from(&student);
                join_group(connection, &actor, group.id).unwrap();
                posters.push(actor);
            }
            (group, posters)
        };

        std::thread::scope(|scope| {
            for actor in &posters {
                let pool = &pool;
                scope.spawn(move || {
                    let connection = &mut pool.get().unwrap();
                    for index in 0..25 {
                        post_message(connection, actor, group.id, &format!("{} #{index}", actor.name))
                            .unwrap();
                    }
                });
            }
        });

        let connection = &mut pool.get().unwrap();
        let listed = list_messages(connection, group.id).unwrap();
        assert_eq!(listed.len(), posters.len() * 25);
        assert!(
            listed
                .windows(2)
                .all(|pair| pair[0].message.created_at <= pair[1].message.created_at)
        );
    }
}
