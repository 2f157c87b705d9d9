//! Export of a user's QR codes.
//!
//! CSV is the only implemented format; PDF is recognized but unsupported.

use crate::model::user::UserId;
use crate::repo::qr_repo::QrCodeRepository;
use crate::repo::RepoError;
use crate::timestamp::to_iso8601;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const CSV_HEADER: [&str; 5] = ["ID", "Type", "Data", "Created at", "Views"];

/// Export formats accepted by `ExportService::export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

/// Downloadable export payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Service error for exports.
#[derive(Debug)]
pub enum ExportError {
    UnknownFormat(String),
    Unsupported(ExportFormat),
    Csv(csv::Error),
    Repo(RepoError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFormat(value) => write!(f, "unknown export format `{value}`"),
            Self::Unsupported(format) => {
                write!(f, "export format `{}` is not supported yet", format.as_str())
            }
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Export service facade.
pub struct ExportService<Q: QrCodeRepository> {
    codes: Q,
}

impl<Q: QrCodeRepository> ExportService<Q> {
    pub fn new(codes: Q) -> Self {
        Self { codes }
    }

    /// Exports every QR code owned by `user_id` in the requested format.
    pub fn export(&self, user_id: UserId, format: &str) -> Result<ExportFile, ExportError> {
        let format =
            ExportFormat::parse(format).ok_or_else(|| ExportError::UnknownFormat(format.to_string()))?;
        match format {
            ExportFormat::Csv => self.export_csv(user_id),
            ExportFormat::Pdf => Err(ExportError::Unsupported(format)),
        }
    }

    fn export_csv(&self, user_id: UserId) -> Result<ExportFile, ExportError> {
        let codes = self.codes.list_for_user(user_id)?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for code in &codes {
            writer.write_record([
                code.id.to_string(),
                code.kind.as_str().to_string(),
                code.data.clone(),
                to_iso8601(code.created_at),
                code.views.to_string(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Csv(err.into_error().into()))?;

        info!(
            "event=export module=service status=ok format=csv user_id={user_id} rows={}",
            codes.len()
        );
        Ok(ExportFile {
            file_name: "qr_codes.csv".to_string(),
            content_type: "text/csv; charset=utf-8",
            bytes,
        })
    }
}
