//! Test-drive appointment intake and storage.
//!
//! Every appointment is written once, as its own JSON file, and never
//! touched again.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use uuid::Uuid;

use crate::error::{Error, ErrorKind};

/// The storage directory used when none is configured.
pub const DEFAULT_APPOINTMENTS_DIR: &str = "appointments";

/// A field of the intake form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentField {
    /// The customer's name.
    Name,
    /// How to reach the customer.
    Contact,
    /// When the customer would like to come.
    PreferredTime,
    /// The vehicle the customer wants to drive.
    Vehicle,
    /// Anything else the customer wants to add.
    Notes,
}

impl AppointmentField {
    /// Every field, in the order the intake asks for them.
    pub const ALL: [AppointmentField; 5] = [
        AppointmentField::Name,
        AppointmentField::Contact,
        AppointmentField::PreferredTime,
        AppointmentField::Vehicle,
        AppointmentField::Notes,
    ];

    /// Returns the prompt shown to the customer for this field.
    pub fn prompt(self) -> &'static str {
        match self {
            AppointmentField::Name => "Your name: ",
            AppointmentField::Contact => "Contact number: ",
            AppointmentField::PreferredTime => "Preferred time: ",
            AppointmentField::Vehicle => "Vehicle of interest: ",
            AppointmentField::Notes => "Any additional notes (optional): ",
        }
    }
}

/// The answers collected by the intake. Every field starts unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentForm {
    /// The customer's name.
    pub name: Option<String>,
    /// A phone number or other contact detail.
    pub contact: Option<String>,
    /// Free-form preferred date and time.
    pub preferred_time: Option<String>,
    /// The vehicle the customer asked about.
    pub vehicle: Option<String>,
    /// Optional remarks.
    pub notes: Option<String>,
}

impl AppointmentForm {
    /// Stores an answer with surrounding whitespace removed.
    ///
    /// A blank answer leaves the field unset, and an unset field is written
    /// as `null` in the stored record.
    pub fn set<S: Into<String>>(&mut self, field: AppointmentField, value: S) {
        let value = value.into();
        let value = if value.trim().is_empty() {
            None
        } else {
            Some(value.trim().to_owned())
        };
        *self.slot(field) = value;
    }

    /// Returns the answer for `field`.
    pub fn get(&self, field: AppointmentField) -> Option<&str> {
        match field {
            AppointmentField::Name => self.name.as_deref(),
            AppointmentField::Contact => self.contact.as_deref(),
            AppointmentField::PreferredTime => self.preferred_time.as_deref(),
            AppointmentField::Vehicle => self.vehicle.as_deref(),
            AppointmentField::Notes => self.notes.as_deref(),
        }
    }

    fn slot(&mut self, field: AppointmentField) -> &mut Option<String> {
        match field {
            AppointmentField::Name => &mut self.name,
            AppointmentField::Contact => &mut self.contact,
            AppointmentField::PreferredTime => &mut self.preferred_time,
            AppointmentField::Vehicle => &mut self.vehicle,
            AppointmentField::Notes => &mut self.notes,
        }
    }
}

/// Where an appointment is in its lifecycle. Only `Pending` exists, there
/// are no transitions yet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Recorded, waiting for the dealership to confirm.
    #[default]
    Pending,
}

/// A stored appointment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    /// The intake answers.
    #[serde(flatten)]
    pub form: AppointmentForm,
    /// Unique identifier, also part of the file name.
    pub appointment_id: String,
    /// When the record was created, local time.
    pub created_at: DateTime<Local>,
    /// Lifecycle status.
    pub status: AppointmentStatus,
}

/// The result of [`AppointmentStore::save`].
#[derive(Clone, Debug)]
pub struct SavedAppointment {
    /// The record as written.
    pub record: AppointmentRecord,
    /// The file holding the record.
    pub path: PathBuf,
}

/// A directory of appointment files, one per appointment.
#[derive(Clone, Debug)]
pub struct AppointmentStore {
    dir: PathBuf,
}

impl AppointmentStore {
    /// Creates a store rooted at `dir`. The directory is created on the
    /// first save.
    #[inline]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the storage directory.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns an empty intake form.
    #[inline]
    pub fn new_form() -> AppointmentForm {
        AppointmentForm::default()
    }

    /// Stamps the form with an identifier, the creation time and the
    /// initial status, and writes it as `appointment_<id>.json`.
    ///
    /// An existing file is never overwritten.
    pub fn save(
        &self,
        form: AppointmentForm,
    ) -> Result<SavedAppointment, Error> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| storage_error(&self.dir, err))?;

        let created_at = Local::now();
        let record = AppointmentRecord {
            form,
            appointment_id: generate_id(&created_at),
            created_at,
            status: AppointmentStatus::Pending,
        };
        let contents = to_json(&record)?;

        let path = self
            .dir
            .join(format!("appointment_{}.json", record.appointment_id));
        write_new_file(&path, |file| {
            file.write_all(&contents)?;
            file.sync_all()
        })
        .map_err(|err| storage_error(&path, err))?;

        info!(
            "saved appointment {} to {}",
            record.appointment_id,
            path.display()
        );
        Ok(SavedAppointment { record, path })
    }
}

/// Second-resolution timestamp plus a random suffix, so two appointments in
/// the same second still get distinct files.
fn generate_id(created_at: &DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", created_at.format("%Y%m%d_%H%M%S"), &suffix[..8])
}

fn to_json(record: &AppointmentRecord) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer).map_err(|err| {
        Error::new(ErrorKind::Serialization).with_reason(err.to_string())
    })?;
    buf.push(b'\n');
    Ok(buf)
}

/// Creates `path`, which must not exist yet, and fills it with `write`. A
/// failed write removes the partial file.
fn write_new_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(err) = write(&mut file) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!("failed to remove {}: {remove_err}", path.display());
        }
        return Err(err);
    }
    Ok(())
}

fn storage_error(path: &Path, err: io::Error) -> Error {
    warn!("failed to store appointment at {}: {err}", path.display());
    Error::new(ErrorKind::StorageFailed)
        .with_reason(format!("{}: {err}", path.display()))
}
