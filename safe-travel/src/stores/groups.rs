use crate::errors::app_error::{AppError, AppResult};
use crate::models::group::{Group, NewGroup};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::policy::{Action, Resource, authorize};
use crate::schema::{memberships, messages, reports, reviews, travel_groups};
use crate::stores::membership::is_member;
use crate::stores::non_blank;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use log::trace;

pub struct GroupDraft<'a> {
    pub name: &'a str,
    pub destination: &'a str,
    pub meeting_point: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub departure_time: NaiveDateTime,
    pub to_campus: Option<bool>,
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<()> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                Err(AppError::validation("Coordinates are out of range"))
            } else {
                Ok(())
            }
        }
        _ => Err(AppError::validation(
            "Latitude and longitude must be given together",
        )),
    }
}

/// Creates a group owned by `actor`. The owner is not added to the
/// membership roster, joining is a separate step.
pub fn create_group(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    draft: &GroupDraft<'_>,
) -> AppResult<Group> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Group name is required"));
    }
    if name.chars().count() > 100 {
        return Err(AppError::validation("Group name is too long"));
    }

    let destination = draft.destination.trim();
    if destination.is_empty() {
        return Err(AppError::validation("Destination is required"));
    }
    if destination.chars().count() > 200 {
        return Err(AppError::validation("Destination is too long"));
    }

    validate_coordinates(draft.latitude, draft.longitude)?;

    let group = diesel::insert_into(travel_groups::table)
        .values(&NewGroup {
            name,
            destination,
            meeting_point: non_blank(draft.meeting_point),
            latitude: draft.latitude,
            longitude: draft.longitude,
            departure_time: draft.departure_time,
            to_campus: draft.to_campus,
            created_by: actor.id,
            created_at: Utc::now().naive_utc(),
        })
        .returning(Group::as_returning())
        .get_result(connection)?;

    trace!("{} created group {}", actor.email, group.id);
    Ok(group)
}

pub fn find_group(connection: &mut SqliteConnection, group_id: i32) -> AppResult<Group> {
    travel_groups::table
        .find(group_id)
        .select(Group::as_select())
        .first(connection)
        .optional()?
        .ok_or_else(|| AppError::not_found("Group not found"))
}

/// Every group on the platform, soonest departure first
pub fn list_groups(connection: &mut SqliteConnection) -> AppResult<Vec<Group>> {
    Ok(travel_groups::table
        .order((travel_groups::departure_time.asc(), travel_groups::id.asc()))
        .select(Group::as_select())
        .load(connection)?)
}

/// Groups whose destination or meeting point mentions `address`
pub fn groups_matching_address(connection: &mut SqliteConnection, address: &str) -> AppResult<Vec<Group>> {
    let address = address.trim();
    if address.is_empty() {
        return Ok(Vec::new());
    }

    let escaped = address
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{escaped}%");

    Ok(travel_groups::table
        .filter(
            travel_groups::destination
                .like(&pattern)
                .escape('\\')
                .nullable()
                .or(travel_groups::meeting_point.like(&pattern).escape('\\')),
        )
        .order((travel_groups::departure_time.asc(), travel_groups::id.asc()))
        .select(Group::as_select())
        .load(connection)?)
}

/// Deletes a group together with its memberships, messages, reviews and
/// reports. Only the creator may do this.
pub fn delete_group(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    group_id: i32,
) -> AppResult<()> {
    connection.immediate_transaction::<_, AppError, _>(|connection| {
        let group = find_group(connection, group_id)?;
        let is_member = is_member(connection, actor.id, group.id)?;
        authorize(
            actor,
            Resource::Group {
                group: &group,
                is_member,
            },
            Action::Delete,
        )?;

        diesel::delete(reviews::table.filter(reviews::group_id.eq(group.id))).execute(connection)?;
        diesel::delete(reports::table.filter(reports::group_id.eq(group.id))).execute(connection)?;
        diesel::delete(messages::table.filter(messages::group_id.eq(group.id))).execute(connection)?;
        diesel::delete(memberships::table.filter(memberships::group_id.eq(group.id)))
            .execute(connection)?;
        diesel::delete(travel_groups::table.find(group.id)).execute(connection)?;

        trace!("{} deleted group {}", actor.email, group.id);
        Ok(())
    })
}
