//! Favorite link between a user and one of their QR codes.

use crate::model::qr_code::{QrCodeId, QrType};

/// Favorite joined with the QR code it points at, for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub qr_code_id: QrCodeId,
    pub kind: QrType,
    /// Creation time of the QR code (not of the favorite), epoch ms.
    pub created_at: i64,
}
