use crate::errors::app_error::{AppError, AppResult};
use crate::models::report::{NewReport, Report};
use crate::models::review::{NewReview, Review};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::policy::{Action, Resource, authorize};
use crate::schema::{reports, reviews, users};
use crate::stores::groups::find_group;
use crate::stores::identity::find_user;
use crate::stores::membership::{is_member, is_participant};
use chrono::Utc;
use diesel::prelude::*;
use log::trace;
use std::collections::HashMap;
use std::ops::RangeInclusive;

pub const RATING_SCALE: RangeInclusive<i32> = 1..=5;
const MAX_COMMENT_LENGTH: usize = 1000;
const MAX_REASON_LENGTH: usize = 2000;

pub struct ReviewDraft<'a> {
    pub reviewed_id: i32,
    pub group_id: i32,
    pub rating: i32,
    pub comment: &'a str,
}

pub struct ReportDraft<'a> {
    pub reported_id: i32,
    pub group_id: i32,
    pub reason: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedReview {
    pub review: Review,
    pub reviewer_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FiledReport {
    pub report: Report,
    pub reporter_name: String,
    pub reported_name: String,
}

/// Records a review of one trip participant by another
pub fn submit_review(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    draft: &ReviewDraft<'_>,
) -> AppResult<Review> {
    if !RATING_SCALE.contains(&draft.rating) {
        return Err(AppError::validation(format!(
            "Rating must be between {} and {}",
            RATING_SCALE.start(),
            RATING_SCALE.end()
        )));
    }

    if draft.reviewed_id == actor.id {
        return Err(AppError::validation("You can't review yourself"));
    }

    let comment = draft.comment.trim();
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::validation("Comment is too long"));
    }

    let group = find_group(connection, draft.group_id)?;
    let reviewed = find_user(connection, draft.reviewed_id)?;
    let member = is_member(connection, actor.id, group.id)?;
    authorize(
        actor,
        Resource::Group {
            group: &group,
            is_member: member,
        },
        Action::Review,
    )?;

    if !(member || group.created_by == actor.id) {
        return Err(AppError::validation(
            "You can only review people from groups you are part of",
        ));
    }

    if !is_participant(connection, reviewed.id, &group)? {
        return Err(AppError::validation(format!(
            "{} is not part of this group",
            reviewed.name
        )));
    }

    let review = diesel::insert_into(reviews::table)
        .values(&NewReview {
            group_id: group.id,
            reviewer_id: actor.id,
            reviewed_id: reviewed.id,
            rating: draft.rating,
            comment,
            created_at: Utc::now().naive_utc(),
        })
        .returning(Review::as_returning())
        .get_result(connection)?;

    trace!("{} reviewed user {} in group {}", actor.email, reviewed.id, group.id);
    Ok(review)
}

/// Reviews received by `user_id`, newest first
pub fn list_reviews_for(connection: &mut SqliteConnection, user_id: i32) -> AppResult<Vec<ReceivedReview>> {
    let rows: Vec<(Review, String)> = reviews::table
        .inner_join(users::table.on(users::id.eq(reviews::reviewer_id)))
        .filter(reviews::reviewed_id.eq(user_id))
        .order((reviews::created_at.desc(), reviews::id.desc()))
        .select((Review::as_select(), users::name))
        .load(connection)?;

    Ok(rows
        .into_iter()
        .map(|(review, reviewer_name)| ReceivedReview {
            review,
            reviewer_name,
        })
        .collect())
}

pub fn submit_report(
    connection: &mut SqliteConnection,
    actor: &AuthenticatedUser,
    draft: &ReportDraft<'_>,
) -> AppResult<Report> {
    let reason = draft.reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("A reason is required"));
    }
    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(AppError::validation("Reason is too long"));
    }

    let group = find_group(connection, draft.group_id)?;
    let reported = find_user(connection, draft.reported_id)?;
    let member = is_member(connection, actor.id, group.id)?;
    authorize(
        actor,
        Resource::Group {
            group: &group,
            is_member: member,
        },
        Action::Report,
    )?;

    let report = diesel::insert_into(reports::table)
        .values(&NewReport {
            group_id: group.id,
            reporter_id: actor.id,
            reported_id: reported.id,
            reason,
            created_at: Utc::now().naive_utc(),
        })
        .returning(Report::as_returning())
        .get_result(connection)?;

    trace!("{} reported user {} in group {}", actor.email, reported.id, group.id);
    Ok(report)
}

/// Every report on the platform, newest first. Administrators only.
pub fn list_reports(connection: &mut SqliteConnection, actor: &AuthenticatedUser) -> AppResult<Vec<FiledReport>> {
    authorize(actor, Resource::Reports, Action::View)?;

    let all_reports: Vec<Report> = reports::table
        .order((reports::created_at.desc(), reports::id.desc()))
        .select(Report::as_select())
        .load(connection)?;

    let mut user_ids: Vec<i32> = all_reports
        .iter()
        .flat_map(|report| [report.reporter_id, report.reported_id])
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let names: HashMap<i32, String> = users::table
        .filter(users::id.eq_any(user_ids))
        .select((users::id, users::name))
        .load::<(i32, String)>(connection)?
        .into_iter()
        .collect();

    let name_of = |id: i32| names.get(&id).cloned().unwrap_or_default();

    Ok(all_reports
        .into_iter()
        .map(|report| FiledReport {
            reporter_name: name_of(report.reporter_id),
            reported_name: name_of(report.reported_id),
            report,
        })
        .collect())
}
