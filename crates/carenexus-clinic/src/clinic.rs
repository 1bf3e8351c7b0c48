//! The clinic: roster, pharmacy, and appointment book.

use carenexus_model::{AccountRecord, AccountDetails, Codec};
use carenexus_session::{CredentialDirectory, PasswordHasher, Records};
use carenexus_storage::{keys, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Appointment, CatalogSeed, ClinicError, Doctor, Medicine, PastAppointment};

/// The clinic catalog, held in memory and written through to storage.
///
/// Each collection lives under its own key. A change is applied to a
/// copy of the collection, written to that key, and only then kept in
/// memory, so a failed write leaves both sides as they were.
///
/// ## Ordering
///
/// Doctors, medicines, and appointments added through the admin views
/// go to the front of their list. Doctors who sign up themselves are
/// appended to the roster.
#[derive(Debug, Clone, Default)]
pub struct Clinic {
    doctors: Vec<Doctor>,
    medicines: Vec<Medicine>,
    upcoming: Vec<Appointment>,
    past: Vec<PastAppointment>,
}

impl Clinic {
    /// Loads every collection, replacing missing or unreadable ones with
    /// the matching part of `seed` (which is then persisted).
    pub fn load<S: KeyValueStore, C: Codec>(
        records: &mut Records<S, C>,
        seed: CatalogSeed,
    ) -> Result<Self, ClinicError> {
        Ok(Self {
            doctors: load_or_seed(records, keys::DOCTORS, seed.doctors)?,
            medicines: load_or_seed(records, keys::MEDICINES, seed.medicines)?,
            upcoming: load_or_seed(records, keys::UPCOMING_APPOINTMENTS, seed.upcoming)?,
            past: load_or_seed(records, keys::PAST_APPOINTMENTS, seed.past)?,
        })
    }

    /// [`load`](Self::load) with the built-in demo catalog.
    pub fn load_or_seed<S: KeyValueStore, C: Codec>(
        records: &mut Records<S, C>,
    ) -> Result<Self, ClinicError> {
        Self::load(records, CatalogSeed::builtin())
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn doctor(&self, handle: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.value == handle)
    }

    pub fn medicines(&self) -> &[Medicine] {
        &self.medicines
    }

    pub fn medicine(&self, name: &str) -> Option<&Medicine> {
        self.medicines.iter().find(|m| m.name == name)
    }

    pub fn upcoming_appointments(&self) -> &[Appointment] {
        &self.upcoming
    }

    pub fn past_appointments(&self) -> &[PastAppointment] {
        &self.past
    }

    // -- Appointments -----------------------------------------------------

    /// Books an appointment. The newest booking is listed first.
    pub fn book_appointment<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        appointment: Appointment,
    ) -> Result<(), ClinicError> {
        let mut upcoming = self.upcoming.clone();
        upcoming.insert(0, appointment);
        self.commit_upcoming(records, upcoming)?;
        if let Some(booked) = self.upcoming.first() {
            tracing::info!(doctor = %booked.doctor, time = %booked.time, "appointment booked");
        }
        Ok(())
    }

    /// Cancels the upcoming appointment at `index` and returns it.
    pub fn cancel_appointment<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        index: usize,
    ) -> Result<Appointment, ClinicError> {
        if index >= self.upcoming.len() {
            return Err(ClinicError::AppointmentNotFound(index));
        }
        let mut upcoming = self.upcoming.clone();
        let cancelled = upcoming.remove(index);
        self.commit_upcoming(records, upcoming)?;
        tracing::info!(doctor = %cancelled.doctor, time = %cancelled.time, "appointment cancelled");
        Ok(cancelled)
    }

    // -- Roster -----------------------------------------------------------

    /// Adds a doctor to the front of the roster.
    ///
    /// # Errors
    /// [`ClinicError::DuplicateDoctor`] if the handle is taken.
    pub fn add_doctor<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        doctor: Doctor,
    ) -> Result<(), ClinicError> {
        if self.doctor(&doctor.value).is_some() {
            return Err(ClinicError::DuplicateDoctor(doctor.value));
        }
        let handle = doctor.value.clone();
        let mut doctors = self.doctors.clone();
        doctors.insert(0, doctor);
        self.commit_doctors(records, doctors)?;
        tracing::info!(%handle, "doctor added to roster");
        Ok(())
    }

    /// Replaces the roster entry with the same handle.
    pub fn update_doctor<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        doctor: Doctor,
    ) -> Result<(), ClinicError> {
        let mut doctors = self.doctors.clone();
        let slot = doctors
            .iter_mut()
            .find(|d| d.value == doctor.value)
            .ok_or_else(|| ClinicError::DoctorNotFound(doctor.value.clone()))?;
        *slot = doctor;
        self.commit_doctors(records, doctors)
    }

    /// Removes a doctor from the roster along with their sign-in account.
    ///
    /// Only doctor accounts are removed: the one whose email the entry
    /// records, or, for entries without an email, those whose email local
    /// part equals the handle.
    pub fn remove_doctor<S, C, H>(
        &mut self,
        records: &mut Records<S, C>,
        directory: &CredentialDirectory<H>,
        handle: &str,
    ) -> Result<Doctor, ClinicError>
    where
        S: KeyValueStore,
        C: Codec,
        H: PasswordHasher,
    {
        let index = self
            .doctors
            .iter()
            .position(|d| d.value == handle)
            .ok_or_else(|| ClinicError::DoctorNotFound(handle.to_string()))?;

        let mut doctors = self.doctors.clone();
        let removed = doctors.remove(index);
        self.commit_doctors(records, doctors)?;

        let accounts =
            directory.remove_doctor_accounts(records, &removed.value, removed.email.as_deref())?;
        tracing::info!(%handle, accounts, "doctor removed from roster");
        Ok(removed)
    }

    /// Lists a newly signed-up doctor on the roster and returns the entry.
    ///
    /// The handle is the email local part, or the whole email when that
    /// is already taken. Non-doctor accounts are ignored.
    pub fn list_doctor_for_signup<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        account: &AccountRecord,
    ) -> Result<Option<&Doctor>, ClinicError> {
        let AccountDetails::Doctor {
            department,
            hospital,
            ..
        } = &account.details
        else {
            return Ok(None);
        };

        let local = account.local_part();
        let handle = if self.doctor(local).is_none() {
            local.to_string()
        } else {
            account.email.clone()
        };

        let mut doctors = self.doctors.clone();
        doctors.push(Doctor {
            avatar_seed: handle.clone(),
            value: handle,
            name: account.name.clone(),
            speciality: department.clone(),
            hospital: hospital.clone(),
            experience: String::new(),
            languages: String::new(),
            availability: String::new(),
            email: Some(account.email.clone()),
        });
        self.commit_doctors(records, doctors)?;

        let entry = self.doctors.last();
        if let Some(entry) = entry {
            tracing::info!(handle = %entry.value, email = %account.email, "signed-up doctor listed");
        }
        Ok(entry)
    }

    // -- Pharmacy ---------------------------------------------------------

    /// Adds a medicine to the front of the stock list.
    pub fn add_medicine<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        medicine: Medicine,
    ) -> Result<(), ClinicError> {
        if self.medicine(&medicine.name).is_some() {
            return Err(ClinicError::DuplicateMedicine(medicine.name));
        }
        let mut medicines = self.medicines.clone();
        medicines.insert(0, medicine);
        self.commit_medicines(records, medicines)
    }

    /// Replaces the medicine with the same name.
    pub fn update_medicine<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        medicine: Medicine,
    ) -> Result<(), ClinicError> {
        let mut medicines = self.medicines.clone();
        let slot = medicines
            .iter_mut()
            .find(|m| m.name == medicine.name)
            .ok_or_else(|| ClinicError::MedicineNotFound(medicine.name.clone()))?;
        *slot = medicine;
        self.commit_medicines(records, medicines)
    }

    pub fn remove_medicine<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        name: &str,
    ) -> Result<Medicine, ClinicError> {
        let index = self
            .medicines
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| ClinicError::MedicineNotFound(name.to_string()))?;
        let mut medicines = self.medicines.clone();
        let removed = medicines.remove(index);
        self.commit_medicines(records, medicines)?;
        Ok(removed)
    }

    // Each commit writes first and swaps the collection in only on success.

    fn commit_upcoming<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        upcoming: Vec<Appointment>,
    ) -> Result<(), ClinicError> {
        records.save(keys::UPCOMING_APPOINTMENTS, &upcoming)?;
        self.upcoming = upcoming;
        Ok(())
    }

    fn commit_doctors<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        doctors: Vec<Doctor>,
    ) -> Result<(), ClinicError> {
        records.save(keys::DOCTORS, &doctors)?;
        self.doctors = doctors;
        Ok(())
    }

    fn commit_medicines<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        medicines: Vec<Medicine>,
    ) -> Result<(), ClinicError> {
        records.save(keys::MEDICINES, &medicines)?;
        self.medicines = medicines;
        Ok(())
    }
}

fn load_or_seed<S, C, T>(
    records: &mut Records<S, C>,
    key: &str,
    seed: Vec<T>,
) -> Result<Vec<T>, ClinicError>
where
    S: KeyValueStore,
    C: Codec,
    T: Serialize + DeserializeOwned,
{
    if let Some(stored) = records.load_or_skip(key)? {
        return Ok(stored);
    }
    tracing::debug!(%key, entries = seed.len(), "seeding catalog collection");
    records.save(key, &seed)?;
    Ok(seed)
}

// =========================================================================
// Tests
// =========================================================================
