//! The persisted key layout.
//!
//! ```text
//! users                     → array of account records
//! authUser                  → current session identity
//! nextAccountId             → numeric counter
//! patientProfile:<email>    → patient profile record
//! doctorProfile:<email>     → doctor profile record
//! doctors                   → doctor roster
//! medicines                 → medicine catalog
//! upcomingAppointments      → booked appointments
//! pastAppointments          → visits with reports
//! ```

/// Registered accounts (the credential directory).
pub const USERS: &str = "users";

/// The signed-in identity, mirrored from the session store.
pub const AUTH_USER: &str = "authUser";

/// The next patient account ID to hand out.
pub const NEXT_ACCOUNT_ID: &str = "nextAccountId";

/// The doctor roster shown to patients.
pub const DOCTORS: &str = "doctors";

/// The pharmacy catalog.
pub const MEDICINES: &str = "medicines";

/// Appointments that have not happened yet.
pub const UPCOMING_APPOINTMENTS: &str = "upcomingAppointments";

/// Appointments that have a visit report.
pub const PAST_APPOINTMENTS: &str = "pastAppointments";

const PATIENT_PROFILE_PREFIX: &str = "patientProfile:";
const DOCTOR_PROFILE_PREFIX: &str = "doctorProfile:";

/// Key of the patient profile belonging to `email`.
pub fn patient_profile(email: &str) -> String {
    format!("{PATIENT_PROFILE_PREFIX}{email}")
}

/// Key of the doctor profile belonging to `email`.
pub fn doctor_profile(email: &str) -> String {
    format!("{DOCTOR_PROFILE_PREFIX}{email}")
}
