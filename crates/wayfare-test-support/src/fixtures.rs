//! Fixture builders for editor tests.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use wayfare_core::experience::{Experience, ExperienceFields};
use wayfare_core::media::{MediaRef, PendingMedia};
use wayfare_core::status::Status;

/// A plausible fetched experience with one persisted photo.
#[must_use]
pub fn sample_experience(status: Status) -> Experience {
    let created_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
    Experience {
        id: Uuid::new_v4(),
        status,
        fields: ExperienceFields {
            title: "Old town food walk".to_owned(),
            description: "Three hours of market stalls and street food".to_owned(),
            price_per_package: Some(15_000),
            min_guests: 2,
            max_guests: 10,
            duration_hours: 3,
            meeting_point: Some("Clock tower".to_owned()),
            ..ExperienceFields::default()
        },
        media: vec![MediaRef::new("https://cdn.example/food-walk/cover.jpg")],
        created_at,
        updated_at: created_at,
    }
}

/// A tiny well-typed JPEG blob for staging tests.
#[must_use]
pub fn jpeg_fixture(file_name: &str) -> PendingMedia {
    PendingMedia::new(file_name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9])
}
