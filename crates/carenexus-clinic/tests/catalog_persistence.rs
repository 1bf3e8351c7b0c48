//! The catalog survives a restart: a second `Clinic::load_or_seed` over
//! the same storage sees every change and doesn't reseed.

use carenexus_clinic::{Appointment, Clinic, Medicine};
use carenexus_session::{CredentialDirectory, DirectoryConfig, Records};
use carenexus_storage::MemoryStore;

#[test]
fn changes_survive_reload_without_reseeding() {
    let mut records = Records::new(MemoryStore::new());
    let directory = CredentialDirectory::new(DirectoryConfig {
        hash_iterations: 1,
        ..DirectoryConfig::default()
    });

    {
        let mut clinic = Clinic::load_or_seed(&mut records).unwrap();
        clinic.remove_doctor(&mut records, &directory, "dr-sharma").unwrap();
        clinic.cancel_appointment(&mut records, 0).unwrap();
        clinic
            .add_medicine(
                &mut records,
                Medicine {
                    name: "Cetirizine 10mg".into(),
                    manufacturer: "Dr. Reddy's Labs".into(),
                    pack_size: "10 tablets".into(),
                    price: 20.0,
                    stock: 3,
                },
            )
            .unwrap();
        clinic
            .book_appointment(
                &mut records,
                Appointment {
                    doctor: "Dr. Sunita Rao".into(),
                    speciality: "Gynecologist".into(),
                    time: "Thursday, 3:00 PM".into(),
                    hospital: "Manipal Hospital, Bangalore".into(),
                    patient_name: "Kavya".into(),
                    patient_age: 31,
                    patient_gender: "Female".into(),
                },
            )
            .unwrap();
    }

    let clinic = Clinic::load_or_seed(&mut records).unwrap();

    assert_eq!(clinic.doctors().len(), 11);
    assert!(clinic.doctor("dr-sharma").is_none());
    assert_eq!(clinic.medicines().len(), 9);
    assert_eq!(clinic.medicine("Cetirizine 10mg").map(|m| m.stock), Some(3));
    let upcoming = clinic.upcoming_appointments();
    assert_eq!(upcoming.len(), 3);
    assert_eq!(upcoming[0].patient_name, "Kavya");
    assert_eq!(clinic.past_appointments().len(), 1);
}

#[test]
fn emptied_roster_stays_empty() {
    // An empty list on file is data, not absence.
    let mut records = Records::new(MemoryStore::new());
    let directory = CredentialDirectory::new(DirectoryConfig::default());
    let mut clinic = Clinic::load_or_seed(&mut records).unwrap();
    let handles: Vec<String> = clinic.doctors().iter().map(|d| d.value.clone()).collect();
    for handle in &handles {
        clinic.remove_doctor(&mut records, &directory, handle).unwrap();
    }

    let reloaded = Clinic::load_or_seed(&mut records).unwrap();

    assert!(reloaded.doctors().is_empty());
}
