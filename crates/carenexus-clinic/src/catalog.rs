//! Catalog records: roster entries, medicines, and appointments.
//!
//! Field names follow the stored JSON (camelCase), so records written by
//! earlier versions of the portal load unchanged.

use serde::{Deserialize, Serialize};

/// A doctor on the clinic roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// The roster handle, unique within the roster.
    pub value: String,
    pub name: String,
    pub speciality: String,
    pub hospital: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub languages: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub avatar_seed: String,
    /// Set for doctors who signed up themselves; links the entry to
    /// their account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Doctor {
    /// The handle.
    pub fn handle(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub name: String,
    pub manufacturer: String,
    pub pack_size: String,
    pub price: f64,
    pub stock: u32,
}

/// A booked consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub doctor: String,
    pub speciality: String,
    pub time: String,
    pub hospital: String,
    pub patient_name: String,
    pub patient_age: u32,
    pub patient_gender: String,
}

/// The doctor's write-up of a finished consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub patient: String,
    pub age: u32,
    pub gender: String,
    pub diagnosis: String,
    pub notes: String,
    pub prescription: String,
    pub follow_up: String,
}

/// A finished consultation with its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub report: Report,
}
