//! Visibility and write rules for leagues.
//!
//! An invisible league is reported as missing so its existence does not leak.

use tracing::debug;

use super::models::{Actor, League};
use crate::shared::AppError;

/// What the caller intends to do with the league
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

pub fn is_visible(league: &League, actor: Option<&Actor>) -> bool {
    if league.public {
        return true;
    }
    let Some(actor) = actor else {
        return false;
    };
    actor.is_admin || league.is_member(&actor.user_id) || league.is_moderator(&actor.user_id)
}

pub fn is_writable(league: &League, actor: Option<&Actor>) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if actor.is_admin || league.is_moderator(&actor.user_id) {
        return true;
    }
    league.members_are_mods && league.is_member(&actor.user_id)
}

/// Checks `actor` against `league` for the given mode.
///
/// Invisible leagues fail with `NotFound` whatever the mode; visible but
/// read-only leagues fail writes with `Forbidden`.
pub fn authorize(league: &League, actor: Option<&Actor>, mode: AccessMode) -> Result<(), AppError> {
    if !is_visible(league, actor) {
        debug!(league_id = %league.id, "League hidden from actor");
        return Err(AppError::NotFound("League not found".to_string()));
    }

    if mode == AccessMode::Write && !is_writable(league, actor) {
        debug!(league_id = %league.id, "Actor lacks write access to league");
        return Err(AppError::Forbidden(
            "Not allowed to modify this league".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, Copy)]
    enum Who {
        Nobody,
        Stranger,
        Member,
        Moderator,
        Admin,
    }

    fn league(public: bool, members_are_mods: bool) -> League {
        let mut league = League::new("Office Ping Pong".to_string(), public, members_are_mods);
        league.members.insert("member".to_string());
        league.moderators.insert("moderator".to_string());
        league
    }

    fn actor(who: Who) -> Option<Actor> {
        match who {
            Who::Nobody => None,
            Who::Stranger => Some(Actor::user("stranger")),
            Who::Member => Some(Actor::user("member")),
            Who::Moderator => Some(Actor::user("moderator")),
            Who::Admin => Some(Actor::admin("root")),
        }
    }

    #[rstest]
    #[case(true, Who::Nobody, true)]
    #[case(true, Who::Stranger, true)]
    #[case(false, Who::Nobody, false)]
    #[case(false, Who::Stranger, false)]
    #[case(false, Who::Member, true)]
    #[case(false, Who::Moderator, true)]
    #[case(false, Who::Admin, true)]
    fn visibility(#[case] public: bool, #[case] who: Who, #[case] expected: bool) {
        let league = league(public, false);
        assert_eq!(is_visible(&league, actor(who).as_ref()), expected);
    }

    #[rstest]
    #[case(false, Who::Nobody, false)]
    #[case(false, Who::Stranger, false)]
    #[case(false, Who::Member, false)]
    #[case(true, Who::Member, true)]
    #[case(true, Who::Stranger, false)]
    #[case(false, Who::Moderator, true)]
    #[case(false, Who::Admin, true)]
    fn writability(#[case] members_are_mods: bool, #[case] who: Who, #[case] expected: bool) {
        let league = league(true, members_are_mods);
        assert_eq!(is_writable(&league, actor(who).as_ref()), expected);
    }

    #[test]
    fn hidden_league_reports_not_found_even_for_reads() {
        let league = league(false, false);
        let stranger = Actor::user("stranger");

        let read = authorize(&league, Some(&stranger), AccessMode::Read);
        let write = authorize(&league, Some(&stranger), AccessMode::Write);

        assert!(matches!(read, Err(AppError::NotFound(_))));
        assert!(matches!(write, Err(AppError::NotFound(_))));
    }

    #[test]
    fn visible_but_read_only_league_forbids_writes() {
        let league = league(true, false);
        let member = Actor::user("member");

        assert!(authorize(&league, Some(&member), AccessMode::Read).is_ok());
        let write = authorize(&league, Some(&member), AccessMode::Write);
        assert!(matches!(write, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn anonymous_write_to_public_league_is_forbidden() {
        let league = league(true, true);
        let write = authorize(&league, None, AccessMode::Write);
        assert!(matches!(write, Err(AppError::Forbidden(_))));
    }
}
