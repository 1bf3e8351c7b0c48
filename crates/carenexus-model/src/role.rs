//! Roles and the navigation targets that depend on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which portal an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Returns `true` if this role must fill in a profile before using
    /// its dashboard. Admins have no profile form.
    pub fn requires_profile(self) -> bool {
        matches!(self, Self::Patient | Self::Doctor)
    }

    /// The lowercase name used in storage and in user-facing messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// A page the portal can send someone to.
///
/// Only the routes that authentication and the profile gate decide
/// between are listed; the rest of the page tree is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Welcome,
    PatientLogin,
    PatientSignup,
    PatientDashboard,
    PatientProfile,
    DoctorLogin,
    DoctorSignup,
    DoctorDashboard,
    DoctorProfile,
    Admin,
}

impl Route {
    /// All routes, in path order.
    pub const ALL: [Route; 10] = [
        Self::Welcome,
        Self::PatientLogin,
        Self::PatientSignup,
        Self::PatientDashboard,
        Self::PatientProfile,
        Self::DoctorLogin,
        Self::DoctorSignup,
        Self::DoctorDashboard,
        Self::DoctorProfile,
        Self::Admin,
    ];

    /// The URL path of this route.
    pub fn path(self) -> &'static str {
        match self {
            Self::Welcome => "/",
            Self::PatientLogin => "/login",
            Self::PatientSignup => "/signup",
            Self::PatientDashboard => "/dashboard",
            Self::PatientProfile => "/profile",
            Self::DoctorLogin => "/doctor/login",
            Self::DoctorSignup => "/doctor/signup",
            Self::DoctorDashboard => "/doctor/dashboard",
            Self::DoctorProfile => "/doctor/profile",
            Self::Admin => "/admin",
        }
    }

    /// Looks a route up by its exact path.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Returns `true` for pages anyone may open without signing in.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            Self::Welcome
                | Self::PatientLogin
                | Self::PatientSignup
                | Self::DoctorLogin
                | Self::DoctorSignup
        )
    }

    /// The sign-in page for a role. Admins share the main login page.
    pub fn login_for(role: Role) -> Self {
        match role {
            Role::Doctor => Self::DoctorLogin,
            Role::Patient | Role::Admin => Self::PatientLogin,
        }
    }

    /// The profile form for a role, if it has one.
    pub fn profile_for(role: Role) -> Option<Self> {
        match role {
            Role::Patient => Some(Self::PatientProfile),
            Role::Doctor => Some(Self::DoctorProfile),
            Role::Admin => None,
        }
    }

    /// The dashboard for a role.
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Patient => Self::PatientDashboard,
            Role::Doctor => Self::DoctorDashboard,
            Role::Admin => Self::Admin,
        }
    }

    /// Where someone lands after signing in: their dashboard once the
    /// profile is complete, otherwise the profile form.
    pub fn landing_for(role: Role, has_completed_profile: bool) -> Self {
        match Self::profile_for(role) {
            Some(profile) if !has_completed_profile => profile,
            _ => Self::dashboard_for(role),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
