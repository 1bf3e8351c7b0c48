//! The profile gate: what happens when someone opens a page.
//!
//! Every protected page runs [`check`] before rendering. Rules, first
//! match wins:
//!
//! | Situation                                   | Decision                      |
//! |---------------------------------------------|-------------------------------|
//! | public page                                 | allow                         |
//! | nobody signed in                            | the area's login page         |
//! | signed in under another area's role         | that role's landing page      |
//! | profile incomplete, not on the profile page | the profile page              |
//! | otherwise                                   | allow                         |
//!
//! The area comes from the path: `/doctor/…` is the doctor area, `/admin…`
//! the admin area, anything else the patient area.

use carenexus_model::{Role, Route, SessionIdentity};

/// The outcome of [`check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(Route),
}

/// Decides whether `identity` may open `path`.
///
/// A trailing slash is ignored (`/doctor/dashboard/` is the dashboard).
pub fn check(identity: Option<&SessionIdentity>, path: &str) -> GateDecision {
    let path = normalize(path);

    if Route::from_path(path).is_some_and(Route::is_public) {
        return GateDecision::Allow;
    }

    let area = area_of(path);
    let Some(identity) = identity else {
        return GateDecision::Redirect(Route::login_for(area));
    };

    if identity.role != area {
        let home = Route::landing_for(identity.role, identity.has_completed_profile);
        tracing::debug!(%path, role = %identity.role, %home, "wrong area");
        return GateDecision::Redirect(home);
    }

    if !identity.has_completed_profile {
        if let Some(profile) = Route::profile_for(identity.role) {
            if profile.path() != path {
                return GateDecision::Redirect(profile);
            }
        }
    }

    GateDecision::Allow
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn area_of(path: &str) -> Role {
    if path == "/doctor" || path.starts_with("/doctor/") {
        Role::Doctor
    } else if path == "/admin" || path.starts_with("/admin/") {
        Role::Admin
    } else {
        Role::Patient
    }
}
