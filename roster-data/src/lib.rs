//! JSON dataset loader and detail-view resolution for the patient roster.

use roster_core::{assemble_rows, Note, Patient, PatientRow, RosterError};

/// Parse the two raw collections and join them into denormalized rows.
///
/// Notes referencing a patient id that does not exist are dropped by the
/// join; they are a data-quality issue, not a load failure.
pub fn load_dataset_str(
    patients_json: &str,
    notes_json: &str,
) -> Result<Vec<PatientRow>, RosterError> {
    let patients: Vec<Patient> =
        serde_json::from_str(patients_json).map_err(|err| RosterError::Parse(err.to_string()))?;
    let notes: Vec<Note> =
        serde_json::from_str(notes_json).map_err(|err| RosterError::Parse(err.to_string()))?;

    if patients.is_empty() {
        return Err(RosterError::MissingData);
    }

    Ok(assemble_rows(&patients, &notes))
}

/// The static dataset bundled with the application, loaded once at startup.
pub fn mock_dataset() -> Result<Vec<PatientRow>, RosterError> {
    load_dataset_str(
        include_str!("../data/mock_patients.json"),
        include_str!("../data/mock_notes.json"),
    )
}

/// Resolve a single patient row for the detail view.
///
/// A missing id or an id with no matching patient is a terminal routing
/// condition, reported through the error enum rather than a panic.
pub fn find_patient(
    rows: &[PatientRow],
    patient_id: Option<i64>,
) -> Result<&PatientRow, RosterError> {
    let patient_id = patient_id.ok_or(RosterError::MissingPatientId)?;
    rows.iter()
        .find(|row| row.patient.id == patient_id)
        .ok_or(RosterError::PatientNotFound(patient_id))
}
