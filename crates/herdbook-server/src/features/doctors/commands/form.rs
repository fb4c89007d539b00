//! Doctor form, shared by create and update

use serde::{Deserialize, Serialize};

use crate::{
    features::shared::{FieldErrors, Validator},
    models::Doctor,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorForm {
    pub name: String,
    pub qualification: String,
    pub specialization: String,
    pub license_number: String,
    pub phone_number: String,
    pub email: String,
    pub clinic_name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidDoctor {
    pub name: String,
    pub qualification: String,
    pub specialization: Option<String>,
    pub license_number: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
}

impl DoctorForm {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            name: doctor.name.clone(),
            qualification: doctor.qualification.clone(),
            specialization: doctor.specialization.clone().unwrap_or_default(),
            license_number: doctor.license_number.clone(),
            phone_number: doctor.phone_number.clone(),
            email: doctor.email.clone().unwrap_or_default(),
            clinic_name: doctor.clinic_name.clone().unwrap_or_default(),
            address: doctor.address.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ValidDoctor, FieldErrors> {
        let mut v = Validator::new();
        let doctor = ValidDoctor {
            name: v.required_text("name", &self.name, 100),
            qualification: v.required_text("qualification", &self.qualification, 200),
            specialization: v.optional_text("specialization", &self.specialization, Some(200)),
            license_number: v.required_text("license_number", &self.license_number, 100),
            phone_number: v.required_text("phone_number", &self.phone_number, 15),
            email: v.optional_email("email", &self.email),
            clinic_name: v.optional_text("clinic_name", &self.clinic_name, Some(200)),
            address: v.optional_text("address", &self.address, None),
        };
        v.finish(doctor)
    }
}
