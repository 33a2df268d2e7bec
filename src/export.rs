use rust_xlsxwriter::Workbook;

use crate::domain::Payment;
use crate::error::{AppError, Result};

const HEADERS: &[&str] = &[
    "id",
    "name",
    "email",
    "phone",
    "crew",
    "paymentStatus",
    "paidAmount",
    "createdAt",
];

/// Render filtered payment rows as an .xlsx workbook with the dashboard's
/// fixed column set.
pub fn payments_workbook(payments: &[Payment]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Records")
        .map_err(|e| AppError::Internal(e.to_string()))?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    for (i, payment) in payments.iter().enumerate() {
        let row = (i + 1) as u32;
        let write = |ws: &mut rust_xlsxwriter::Worksheet, col: u16, value: &str| {
            ws.write_string(row, col, value)
                .map(|_| ())
                .map_err(|e| AppError::Internal(e.to_string()))
        };

        write(worksheet, 0, &payment.id)?;
        write(worksheet, 1, payment.name.as_deref().unwrap_or(""))?;
        write(worksheet, 2, payment.email.as_deref().unwrap_or(""))?;
        write(worksheet, 3, payment.phone.as_deref().unwrap_or(""))?;
        write(worksheet, 4, payment.crew.as_deref().unwrap_or(""))?;
        write(worksheet, 5, payment.payment_status.as_str())?;
        if let Some(amount) = payment.paid_amount {
            worksheet
                .write_number(row, 6, amount)
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }
        write(worksheet, 7, &payment.created_at.to_rfc3339())?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, PaymentStatus};
    use chrono::Utc;

    fn sample_payment() -> Payment {
        let now = Utc::now();
        Payment {
            id: "KIT/001".to_string(),
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("08011112222".to_string()),
            gender: Gender::Female,
            crew: Some("kitchen".to_string()),
            unit: None,
            level: None,
            paid_amount: Some(500.0),
            pending_amount: None,
            payment_status: PaymentStatus::Paid,
            outreach_id: None,
            bank_id: None,
            proof_image: vec![],
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn workbook_is_written_with_rows() {
        let buffer = payments_workbook(&[sample_payment()]).unwrap();
        // xlsx files are zip archives; check the magic and that content landed
        assert!(buffer.len() > 4);
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn empty_row_set_still_produces_a_workbook() {
        let buffer = payments_workbook(&[]).unwrap();
        assert_eq!(&buffer[..2], b"PK");
    }
}
