//! Profile records: the forms patients and doctors fill in before they
//! can use their dashboards.
//!
//! Validation messages are user-facing and returned as
//! [`ModelError::InvalidProfile`]; the first failing field wins.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MemberId, ModelError};

const PHONE_DIGITS: usize = 10;

fn invalid(msg: &str) -> ModelError {
    ModelError::InvalidProfile(msg.to_string())
}

// ---------------------------------------------------------------------------
// PersonalDetails
// ---------------------------------------------------------------------------

/// Demographics shared by a patient and each of their family members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: String,
    #[serde(default)]
    pub has_allergies: bool,
    #[serde(default)]
    pub allergy_details: String,
    pub phone: String,
}

impl PersonalDetails {
    /// Checks the fields in form order. `relationship` is `Some` when
    /// the details belong to a family member; that also switches the
    /// wording of every message.
    fn check(&self, relationship: Option<&str>) -> Result<(), ModelError> {
        let own = relationship.is_none();
        let pick = |mine: &str, theirs: &str| invalid(if own { mine } else { theirs });

        if self.name.trim().is_empty() {
            return Err(pick(
                "Please enter your full name.",
                "Please enter the family member's full name.",
            ));
        }
        if relationship.is_some_and(|r| r.trim().is_empty()) {
            return Err(invalid("Please enter the relationship with the user."));
        }
        if self.date_of_birth.trim().is_empty() {
            return Err(pick(
                "Please select your date of birth.",
                "Please select the family member's date of birth.",
            ));
        }
        if self.gender.trim().is_empty() {
            return Err(pick(
                "Please select your gender.",
                "Please select the family member's gender.",
            ));
        }
        if self.blood_group.trim().is_empty() {
            return Err(pick(
                "Please select your blood group.",
                "Please select the family member's blood group.",
            ));
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(pick(
                "Please enter your phone number.",
                "Please enter the family member's phone number.",
            ));
        }
        if phone.chars().count() != PHONE_DIGITS {
            return Err(pick(
                "Phone number must be 10 digits.",
                "Family member phone number must be 10 digits.",
            ));
        }

        if self.has_allergies && self.allergy_details.trim().is_empty() {
            return Err(pick(
                "Please specify your allergies.",
                "Please specify the family member's allergies.",
            ));
        }
        Ok(())
    }

    /// Validates the account holder's own details.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.check(None)
    }

    /// Returns a copy with free-text fields trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            allergy_details: self.allergy_details.trim().to_string(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Family members
// ---------------------------------------------------------------------------

/// A family member as entered in the "add member" form, before an ID
/// has been assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberDraft {
    pub relationship: String,
    #[serde(flatten)]
    pub details: PersonalDetails,
}

impl FamilyMemberDraft {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.details.check(Some(&self.relationship))
    }
}

/// A family member attached to a patient account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub member_id: MemberId,
    pub relationship: String,
    #[serde(flatten)]
    pub details: PersonalDetails,
}

// ---------------------------------------------------------------------------
// PatientProfile
// ---------------------------------------------------------------------------

/// The patient profile stored under `patientProfile:<email>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub account_id: AccountId,
    pub member_id: MemberId,
    #[serde(flatten)]
    pub details: PersonalDetails,
    pub email: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub family_members: Vec<FamilyMember>,
}

impl PatientProfile {
    /// The member ID the next family member will get: one past the
    /// highest ID on the account (primary holder included).
    ///
    /// # Errors
    /// [`ModelError::MemberLimit`] when `999` is already taken.
    pub fn next_member_id(&self) -> Result<MemberId, ModelError> {
        self.family_members
            .iter()
            .map(|m| m.member_id)
            .chain(std::iter::once(self.member_id))
            .max()
            .unwrap_or(MemberId::PRIMARY)
            .next()
    }

    /// Validates `draft`, assigns it the next member ID, and appends it.
    pub fn add_family_member(
        &mut self,
        draft: FamilyMemberDraft,
    ) -> Result<MemberId, ModelError> {
        draft.validate()?;
        let member_id = self.next_member_id()?;

        self.family_members.push(FamilyMember {
            member_id,
            relationship: draft.relationship.trim().to_string(),
            details: draft.details.trimmed(),
        });
        Ok(member_id)
    }

    /// Looks up a family member by ID.
    pub fn family_member(&self, member_id: MemberId) -> Option<&FamilyMember> {
        self.family_members.iter().find(|m| m.member_id == member_id)
    }
}

// ---------------------------------------------------------------------------
// DoctorProfile
// ---------------------------------------------------------------------------

/// Professional details a doctor fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetails {
    pub name: String,
    pub license_number: String,
    pub specialization: String,
    pub experience: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub hospital_affiliation: String,
}

impl DoctorDetails {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(invalid("Please enter your full name."));
        }
        if self.license_number.trim().is_empty() {
            return Err(invalid(
                "Please enter your Medical License Number / Credential ID.",
            ));
        }
        if self.specialization.trim().is_empty() {
            return Err(invalid("Please select your specialization."));
        }
        if self.experience.trim().is_empty() {
            return Err(invalid("Please select your years of experience."));
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(invalid("Please enter your phone number."));
        }
        if phone.chars().count() != PHONE_DIGITS {
            return Err(invalid("Phone number must be 10 digits."));
        }

        if self.date_of_birth.trim().is_empty() {
            return Err(invalid("Please select your date of birth."));
        }
        if self.gender.trim().is_empty() {
            return Err(invalid("Please select your gender."));
        }
        if self.hospital_affiliation.trim().is_empty() {
            return Err(invalid("Please enter your hospital/clinic affiliation."));
        }
        Ok(())
    }

    /// Returns a copy with free-text fields trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            license_number: self.license_number.trim().to_string(),
            specialization: self.specialization.trim().to_string(),
            phone: self.phone.trim().to_string(),
            hospital_affiliation: self.hospital_affiliation.trim().to_string(),
            ..self.clone()
        }
    }
}

/// The doctor profile stored under `doctorProfile:<email>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    #[serde(flatten)]
    pub details: DoctorDetails,
    pub email: String,
    #[serde(default)]
    pub completed: bool,
}
