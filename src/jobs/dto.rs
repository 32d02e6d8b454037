use serde::{Deserialize, Serialize};

use super::repo::Job;
use crate::{error::ApiError, response::PageInfo, validation::Validator};

/// Body of create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobRequest {
    #[serde(rename = "namapekerjaan")]
    pub name: String,
}

impl JobRequest {
    /// Returns the trimmed name.
    pub fn validate(&self) -> Result<String, ApiError> {
        let name = self.name.trim();
        let mut v = Validator::new();
        if name.is_empty() {
            v.check(false, "namapekerjaan", "Nama pekerjaan wajib diisi");
        } else {
            v.length(name, 3, 50, "namapekerjaan", "Nama pekerjaan harus antara 3-50 karakter");
        }
        v.finish()?;
        Ok(name.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct JobList {
    pub pekerjaans: Vec<Job>,
    pub pagination: PageInfo,
}
