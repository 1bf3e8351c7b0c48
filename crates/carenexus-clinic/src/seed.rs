//! Built-in catalog data used when storage has none.

use crate::{Appointment, Doctor, Medicine, PastAppointment, Report};

/// The collections a fresh clinic starts with.
///
/// `CatalogSeed::default()` is empty; [`CatalogSeed::builtin`] is the
/// demo roster and pharmacy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSeed {
    pub doctors: Vec<Doctor>,
    pub medicines: Vec<Medicine>,
    pub upcoming: Vec<Appointment>,
    pub past: Vec<PastAppointment>,
}

impl CatalogSeed {
    pub fn builtin() -> Self {
        Self {
            doctors: doctors(),
            medicines: medicines(),
            upcoming: upcoming(),
            past: past(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn doctor(
    value: &str,
    name: &str,
    speciality: &str,
    hospital: &str,
    experience: &str,
    languages: &str,
    availability: &str,
    avatar_seed: &str,
) -> Doctor {
    Doctor {
        value: value.into(),
        name: name.into(),
        speciality: speciality.into(),
        hospital: hospital.into(),
        experience: experience.into(),
        languages: languages.into(),
        availability: availability.into(),
        avatar_seed: avatar_seed.into(),
        email: None,
    }
}

#[rustfmt::skip]
fn doctors() -> Vec<Doctor> {
    vec![
        doctor("dr-sharma", "Dr. Anjali Sharma", "Cardiologist", "Apollo Hospital, Delhi", "15 years", "English, Hindi", "Available Now", "doc1"),
        doctor("dr-reddy", "Dr. Arjun Reddy", "Cardiologist", "Fortis Hospital, Delhi", "12 years", "English, Telugu", "Available tomorrow", "doc2"),
        doctor("dr-singh", "Dr. Vikram Singh", "Dermatologist", "Fortis Clinic, Mumbai", "10 years", "English, Hindi", "Available Now", "doc3"),
        doctor("dr-gupta", "Dr. Isha Gupta", "Dermatologist", "Max Healthcare, Mumbai", "8 years", "English, Hindi, Marathi", "Available in 30 mins", "doc4"),
        doctor("dr-mehta", "Dr. Priya Mehta", "Pediatrician", "Max Healthcare, Bangalore", "12 years", "English, Hindi", "Available tomorrow", "doc5"),
        doctor("dr-khan", "Dr. Sameer Khan", "Pediatrician", "Rainbow Children's Hospital, Bangalore", "9 years", "English, Hindi, Kannada", "Available Now", "doc6"),
        doctor("dr-desai", "Dr. Rohan Desai", "Orthopedist", "City Hospital, Pune", "14 years", "English, Marathi", "Available Now", "doc7"),
        doctor("dr-verma", "Dr. Alok Verma", "Orthopedist", "Sancheti Hospital, Pune", "11 years", "English, Hindi", "Available in 20 mins", "doc8"),
        doctor("dr-iyer", "Dr. Meera Iyer", "Psychiatrist", "NIMHANS, Bangalore", "18 years", "English, Tamil, Kannada", "Available tomorrow", "doc9"),
        doctor("dr-anand", "Dr. Anand Desai", "Psychiatrist", "VIMHANS, Delhi", "16 years", "English, Hindi, Gujarati", "Available Now", "doc10"),
        doctor("dr-patel", "Dr. Rina Patel", "Gynecologist", "Cloudnine Hospital, Mumbai", "13 years", "English, Gujarati, Hindi", "Available in 45 mins", "doc11"),
        doctor("dr-rao", "Dr. Sunita Rao", "Gynecologist", "Manipal Hospital, Bangalore", "20 years", "English, Kannada, Telugu", "Available Now", "doc12"),
    ]
}

fn medicine(name: &str, manufacturer: &str, pack_size: &str, price: f64, stock: u32) -> Medicine {
    Medicine {
        name: name.into(),
        manufacturer: manufacturer.into(),
        pack_size: pack_size.into(),
        price,
        stock,
    }
}

fn medicines() -> Vec<Medicine> {
    vec![
        medicine("Paracetamol 500mg", "Cipla Ltd.", "15 tablets", 25.5, 150),
        medicine("Atorvastatin 10mg", "Sun Pharma", "10 tablets", 90.0, 80),
        medicine("Metformin 500mg", "Mankind Pharma", "10 tablets", 30.0, 18),
        medicine("Amlodipine 5mg", "Dr. Reddy's Labs", "30 tablets", 65.0, 250),
        medicine("Omeprazole 20mg", "Zydus Cadila", "15 capsules", 55.0, 9),
        medicine("Levocetirizine 5mg", "Glenmark Pharma", "10 tablets", 45.0, 75),
        medicine("Telmisartan 40mg", "Lupin Ltd.", "15 tablets", 150.0, 40),
        medicine("Azithromycin 500mg", "Alembic Pharma", "3 tablets", 119.5, 5),
    ]
}

fn appointment(doctor: &Doctor, time: &str, patient: &str, age: u32, gender: &str) -> Appointment {
    Appointment {
        doctor: doctor.name.clone(),
        speciality: doctor.speciality.clone(),
        time: time.into(),
        hospital: doctor.hospital.clone(),
        patient_name: patient.into(),
        patient_age: age,
        patient_gender: gender.into(),
    }
}

fn upcoming() -> Vec<Appointment> {
    let roster = doctors();
    vec![
        appointment(&roster[0], "Tomorrow, 10:00 AM", "Rahul Kumar", 35, "Male"),
        appointment(&roster[3], "Friday, 2:30 PM", "Sita Devi", 29, "Female"),
        appointment(&roster[4], "Next Monday, 11:15 AM", "Aarav Kumar", 12, "Male"),
    ]
}

fn past() -> Vec<PastAppointment> {
    let roster = doctors();
    vec![PastAppointment {
        appointment: appointment(&roster[1], "Last Tuesday, 4:00 PM", "Rohan Sharma", 42, "Male"),
        report: Report {
            patient: "Rohan Sharma".into(),
            age: 42,
            gender: "Male".into(),
            diagnosis: "Mild hypertension".into(),
            notes: "Blood pressure 145/92. Advised reduced salt intake and daily walks.".into(),
            prescription: "Telmisartan 40mg, once daily".into(),
            follow_up: "Review in 4 weeks".into(),
        },
    }]
}
