use crate::errors::app_error::AppResult;
use crate::models::group::Group;
use crate::models::membership::Membership;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::policy::{Action, Resource, authorize};
use crate::schema::{memberships, users};
use crate::stores::groups::find_group;
use chrono::Utc;
use diesel::prelude::*;
use log::trace;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotAMember,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable)]
pub struct MemberSummary {
    pub id: i32,
    pub name: String,
}

pub fn is_member(connection: &mut SqliteConnection, user_id: i32, group_id: i32) -> AppResult<bool> {
    Ok(diesel::select(diesel::dsl::exists(
        memberships::table.find((user_id, group_id)),
    ))
    .get_result(connection)?)
}

/// Members plus the creator, who takes part without a membership row
pub fn is_participant(connection: &mut SqliteConnection, user_id: i32, group: &Group) -> AppResult<bool> {
    Ok(group.created_by == user_id || is_member(connection, user_id, group.id)?)
}

/// Adds `actor` to the group. The composite primary key makes a repeated
/// or concurrent join a no-op instead of a duplicate row.
pub fn join_group(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    group_id: i32,
) -> AppResult<JoinOutcome> {
    let group = find_group(connection, group_id)?;
    let already_member = is_member(connection, actor.id, group.id)?;
    authorize(
        actor,
        Resource::Group {
            group: &group,
            is_member: already_member,
        },
        Action::Join,
    )?;

    let inserted = diesel::insert_or_ignore_into(memberships::table)
        .values(&Membership {
            user_id: actor.id,
            group_id: group.id,
            joined_at: Utc::now().naive_utc(),
        })
        .execute(connection)?;

    if inserted == 0 {
        return Ok(JoinOutcome::AlreadyMember);
    }

    trace!("{} joined group {}", actor.email, group.id);
    Ok(JoinOutcome::Joined)
}

pub fn leave_group(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    group_id: i32,
) -> AppResult<LeaveOutcome> {
    let group = find_group(connection, group_id)?;
    let member = is_member(connection, actor.id, group.id)?;
    authorize(
        actor,
        Resource::Group {
            group: &group,
            is_member: member,
        },
        Action::Leave,
    )?;

    let removed = diesel::delete(memberships::table.find((actor.id, group.id))).execute(connection)?;

    if removed == 0 {
        return Ok(LeaveOutcome::NotAMember);
    }

    trace!("{} left group {}", actor.email, group.id);
    Ok(LeaveOutcome::Left)
}

/// Roster of a group in joining order
pub fn members_of(connection: &mut SqliteConnection, group_id: i32) -> AppResult<Vec<MemberSummary>> {
    Ok(memberships::table
        .inner_join(users::table)
        .filter(memberships::group_id.eq(group_id))
        .order((memberships::joined_at.asc(), users::id.asc()))
        .select((users::id, users::name))
        .load(connection)?)
}

pub fn group_ids_for(connection: &mut SqliteConnection, user_id: i32) -> AppResult<Vec<i32>> {
    Ok(memberships::table
        .filter(memberships::user_id.eq(user_id))
        .order(memberships::group_id.asc())
        .select(memberships::group_id)
        .load(connection)?)
}
