//! Drives the portal through sign-up, a few failed sign-ins, profile
//! completion, and family members against a JSON file on disk.
//!
//! ```text
//! portal-walkthrough [STORE_PATH] [CONFIG_PATH]
//! ```
//!
//! `STORE_PATH` defaults to `$CARENEXUS_STORE` or `carenexus-demo.json`.
//! `CONFIG_PATH` (or `$CARENEXUS_CONFIG`) is an optional JSON
//! `PortalConfig`. Run it twice: the second run restores the session the
//! first one left behind. Set `RUST_LOG=debug` to see every record write.

use std::env;
use std::path::PathBuf;

use carenexus::prelude::*;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PATIENT_EMAIL: &str = "a@x.com";
const PATIENT_PASSWORD: &str = "pw";
const DOCTOR_EMAIL: &str = "kiran.rao@x.com";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}

fn load_config(path: Option<PathBuf>) -> Result<PortalConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(PortalConfig::default());
    };
    let text = std::fs::read_to_string(&path)?;
    let config = serde_json::from_str(&text)?;
    tracing::info!(path = %path.display(), "loaded portal config");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args = env::args().skip(1);
    let store_path = args
        .next()
        .or_else(|| env::var("CARENEXUS_STORE").ok())
        .unwrap_or_else(|| "carenexus-demo.json".to_string());
    let config_path = args
        .next()
        .or_else(|| env::var("CARENEXUS_CONFIG").ok())
        .map(PathBuf::from);

    let config = load_config(config_path)?;
    let store = FileStore::open(&store_path)?;
    tracing::info!(path = %store_path, "opened store");

    let mut portal = PortalBuilder::new().config(config).build(store)?;
    walkthrough(&mut portal).await?;

    tracing::info!(path = %store_path, "done; run again to see the session restored");
    Ok(())
}

/// The scenario itself. Safe to run repeatedly over the same store.
async fn walkthrough<S: KeyValueStore>(portal: &mut Portal<S>) -> Result<(), CareNexusError> {
    match portal.current() {
        Some(who) => tracing::info!(
            email = %who.email,
            role = %who.role,
            completed = who.has_completed_profile,
            "session restored from a previous run"
        ),
        None => tracing::info!("nobody signed in"),
    }
    portal.sign_out()?;

    // A doctor signs up and shows up on the roster.
    let doctor = NewAccount {
        name: "Dr. Kiran Rao".into(),
        email: DOCTOR_EMAIL.into(),
        password: "pw".into(),
        details: AccountDetails::Doctor {
            department: "Neurology".into(),
            hospital: "City Hospital, Pune".into(),
            license_number: None,
        },
    };
    match portal.sign_up(doctor).await {
        Ok(out) => tracing::info!(route = %out.target, "doctor signed up"),
        Err(CareNexusError::Session(SessionError::DuplicateEmail(email))) => {
            tracing::info!(%email, "doctor already registered")
        }
        Err(e) => return Err(e),
    }
    let listed = portal
        .clinic()
        .doctors()
        .iter()
        .find(|d| d.email.as_deref() == Some(DOCTOR_EMAIL));
    if let Some(entry) = listed {
        tracing::info!(handle = %entry.value, speciality = %entry.speciality, "on the roster");
    }
    portal.sign_out()?;

    // The patient registers (first run only).
    match portal.sign_up(patient()).await {
        Ok(out) => tracing::info!(
            account_id = ?out.identity.account_id,
            member_id = ?out.identity.member_id,
            route = %out.target,
            "patient signed up"
        ),
        Err(CareNexusError::Session(SessionError::DuplicateEmail(email))) => {
            tracing::info!(%email, "patient already registered")
        }
        Err(e) => return Err(e),
    }
    portal.sign_out()?;

    // Wrong portal, then wrong password: both refused with the form text.
    for (password, role) in [(PATIENT_PASSWORD, Role::Doctor), ("not-it", Role::Patient)] {
        if let Err(e) = portal.sign_in(PATIENT_EMAIL, password, role).await {
            tracing::warn!(%role, "sign-in refused: {e}");
        }
    }

    let out = portal.sign_in(PATIENT_EMAIL, PATIENT_PASSWORD, Role::Patient).await?;
    tracing::info!(route = %out.target, "signed in");
    tracing::info!(decision = ?portal.guard("/dashboard"), "opening /dashboard");

    let next = portal
        .save_patient_profile(PersonalDetails {
            name: "Meera Nair".into(),
            date_of_birth: "1990-04-12".into(),
            gender: "Female".into(),
            blood_group: "O+".into(),
            has_allergies: true,
            allergy_details: "Penicillin".into(),
            phone: "9876543210".into(),
        })
        .await?;
    tracing::info!(next = %next, "profile saved");
    tracing::info!(decision = ?portal.guard("/dashboard"), "opening /dashboard");

    let member_id = portal
        .add_family_member(FamilyMemberDraft {
            relationship: "Daughter".into(),
            details: PersonalDetails {
                name: "Anya Nair".into(),
                date_of_birth: "2016-08-01".into(),
                gender: "Female".into(),
                blood_group: "O+".into(),
                has_allergies: false,
                allergy_details: String::new(),
                phone: "9876543210".into(),
            },
        })
        .await?;
    tracing::info!(%member_id, "family member added");

    Ok(())
}

fn patient() -> NewAccount {
    NewAccount {
        name: "Meera Nair".into(),
        email: PATIENT_EMAIL.into(),
        password: PATIENT_PASSWORD.into(),
        details: AccountDetails::patient(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PortalConfig {
        PortalConfig {
            directory: DirectoryConfig {
                hash_iterations: 1,
                ..DirectoryConfig::default()
            },
            ..PortalConfig::default()
        }
    }

    #[tokio::test]
    async fn walkthrough_leaves_completed_patient_signed_in() {
        let mut portal = PortalBuilder::new().config(fast()).build(MemoryStore::new()).unwrap();

        walkthrough(&mut portal).await.unwrap();

        let who = portal.current().unwrap();
        assert_eq!(who.email, PATIENT_EMAIL);
        assert!(who.has_completed_profile);
        assert!(portal.clinic().doctor("kiran.rao").is_some());
    }

    #[tokio::test]
    async fn walkthrough_can_run_twice_over_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");

        for run in 1..=2u16 {
            let mut portal = PortalBuilder::new()
                .config(fast())
                .build(FileStore::open(&path).unwrap())
                .unwrap();
            walkthrough(&mut portal).await.unwrap();

            let profile = portal.patient_profile().unwrap().unwrap();
            assert_eq!(profile.family_members.len(), usize::from(run));
        }
    }

    #[test]
    fn load_config_reads_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"seedCatalog":false}"#).unwrap();

        let config = load_config(Some(path)).unwrap();

        assert!(!config.seed_catalog);
        assert_eq!(config.simulated_latency_ms, 0);
    }
}
