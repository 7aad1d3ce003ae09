pub mod error;
pub mod records;

pub use error::AppError;
pub use records::{Appointment, AppointmentStatus, Doctor, PatientDetails, Slot};
