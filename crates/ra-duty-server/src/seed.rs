//! Sample roster and duties for demo databases.

use ra_duty_core::{
  duty::{NewDuty, Shift, parse_date},
  ra::NewRa,
  store::DutyStore,
};

/// `(name, email, phone, hall)`
const SAMPLE_RAS: [(&str, &str, &str, &str); 4] = [
  ("Alex Smith", "alex.smith@example.edu", "555-123-4567", "East Hall"),
  ("Jordan Lee", "jordan.lee@example.edu", "555-234-5678", "West Hall"),
  ("Taylor Wong", "taylor.wong@example.edu", "555-345-6789", "North Hall"),
  ("Casey Johnson", "casey.johnson@example.edu", "555-456-7890", "South Hall"),
];

/// `(ra_name, date, shift, notes)`
const SAMPLE_DUTIES: [(&str, &str, Shift, &str); 4] = [
  ("Alex Smith", "2025-03-28", Shift::Secondary, "Main entrance duty"),
  ("Jordan Lee", "2025-03-29", Shift::Tertiary, "Weekend patrol"),
  ("Taylor Wong", "2025-03-30", Shift::Primary, "Mail room coverage"),
  ("Casey Johnson", "2025-04-01", Shift::Secondary, "Front desk"),
];

/// Insert the sample data if the roster is empty. Returns whether anything
/// was written.
pub async fn seed_sample_data<S: DutyStore>(store: &S) -> anyhow::Result<bool> {
  if !store.list_ras(true).await?.is_empty() {
    return Ok(false);
  }

  for (name, email, phone, hall) in SAMPLE_RAS {
    let input = NewRa::new(name)?
      .with_email(Some(email.to_owned()))
      .with_phone(Some(phone.to_owned()))
      .with_hall(Some(hall.to_owned()));
    store.create_ra(input).await?;
  }

  for (ra_name, date, shift, notes) in SAMPLE_DUTIES {
    let input = NewDuty::new(ra_name, parse_date(date)?, shift)?
      .with_notes(Some(notes.to_owned()));
    store.create_duty(input).await?;
  }

  tracing::info!(
    ras = SAMPLE_RAS.len(),
    duties = SAMPLE_DUTIES.len(),
    "seeded sample data"
  );
  Ok(true)
}
