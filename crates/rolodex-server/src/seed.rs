//! Demo data for a fresh database.

use anyhow::{Context as _, bail};
use chrono::{Local, TimeZone};
use rolodex_core::{ContactInput, ContactRepository, Outcome};

fn sample_contacts() -> Vec<ContactInput> {
  let mut nikita =
    ContactInput::new("Frau", "Nikita", "Khutorni", "nkhutorni@protonmail.com")
      .with_phone_number("0176/123456789");
  if let Some(born) = Local.with_ymd_and_hms(1998, 6, 4, 0, 0, 0).earliest() {
    nikita = nikita.with_birth_date(born);
  }
  vec![nikita]
}

/// Insert the sample contacts if the table is empty. Returns how many rows
/// were written.
pub async fn seed_demo_data<R: ContactRepository>(repo: &R) -> anyhow::Result<usize> {
  let existing = repo.get_all().await.context("failed to read contacts")?;
  if !existing.is_empty() {
    tracing::debug!(existing = existing.len(), "contacts present, skipping seed");
    return Ok(0);
  }

  let mut inserted = 0;
  for input in sample_contacts() {
    match repo.insert(input).await {
      Outcome::Success(contact) => {
        tracing::info!(id = contact.id, name = %contact.display_name(), "seeded contact");
        inserted += 1;
      }
      Outcome::NotFound => bail!("seeding contacts: insert reported no row"),
      Outcome::Failure(f) => {
        tracing::error!(error = %f, "seeding contacts failed");
        bail!("seeding contacts: {f}");
      }
    }
  }
  Ok(inserted)
}
