//! Category-conditional field defaulting.

use wayfare_core::experience::{Category, CategoryKind, ExperienceFields};
use wayfare_core::field::FieldName;

/// Applies category-appropriate defaults to a draft's fields.
///
/// Pure function of (previous fields, selected category); the editor calls
/// it once at the moment of category selection, never on re-render.
/// Returns the patched fields together with the names of the fields whose
/// values actually changed, so the caller can mark exactly those dirty.
/// Applying the same category twice produces the same result as applying
/// it once.
#[must_use]
pub fn apply_category_defaults(
    fields: &ExperienceFields,
    category: &Category,
) -> (ExperienceFields, Vec<FieldName>) {
    let mut patched = fields.clone();

    match category.kind {
        CategoryKind::Consultation => {
            // Remote session: no physical logistics, always a single guest.
            patched.meeting_point = None;
            patched.ending_point = None;
            patched.walking_distance_km = None;
            patched.min_guests = 1;
        }
        CategoryKind::TripPlanner => {
            // The route tail is hidden for planning deliverables; clear it
            // so stale values never ride along in a submission.
            patched.ending_point = None;
            patched.walking_distance_km = None;
        }
        CategoryKind::Standard | CategoryKind::Other => {}
    }

    let mut changed = Vec::new();
    if patched.meeting_point != fields.meeting_point {
        changed.push(FieldName::MeetingPoint);
    }
    if patched.ending_point != fields.ending_point {
        changed.push(FieldName::EndingPoint);
    }
    if patched.walking_distance_km != fields.walking_distance_km {
        changed.push(FieldName::WalkingDistance);
    }
    if patched.min_guests != fields.min_guests {
        changed.push(FieldName::MinGuests);
    }

    (patched, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn category(kind: CategoryKind) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: "test".to_owned(),
            kind,
        }
    }

    fn walking_draft() -> ExperienceFields {
        ExperienceFields {
            meeting_point: Some("Main square".to_owned()),
            ending_point: Some("Harbour".to_owned()),
            walking_distance_km: Some(4.5),
            min_guests: 4,
            ..ExperienceFields::default()
        }
    }

    #[test]
    fn test_consultation_clears_logistics_and_forces_single_guest() {
        let (patched, changed) =
            apply_category_defaults(&walking_draft(), &category(CategoryKind::Consultation));

        assert_eq!(patched.meeting_point, None);
        assert_eq!(patched.ending_point, None);
        assert_eq!(patched.walking_distance_km, None);
        assert_eq!(patched.min_guests, 1);
        assert_eq!(
            changed,
            vec![
                FieldName::MeetingPoint,
                FieldName::EndingPoint,
                FieldName::WalkingDistance,
                FieldName::MinGuests,
            ]
        );
    }

    #[test]
    fn test_trip_planner_clears_only_the_route_tail() {
        let (patched, changed) =
            apply_category_defaults(&walking_draft(), &category(CategoryKind::TripPlanner));

        assert_eq!(patched.meeting_point, Some("Main square".to_owned()));
        assert_eq!(patched.ending_point, None);
        assert_eq!(patched.walking_distance_km, None);
        assert_eq!(patched.min_guests, 4);
        assert_eq!(
            changed,
            vec![FieldName::EndingPoint, FieldName::WalkingDistance]
        );
    }

    #[test]
    fn test_standard_category_changes_nothing() {
        let draft = walking_draft();
        let (patched, changed) =
            apply_category_defaults(&draft, &category(CategoryKind::Standard));
        assert_eq!(patched, draft);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_defaulting_is_idempotent() {
        let selected = category(CategoryKind::Consultation);
        let (once, _) = apply_category_defaults(&walking_draft(), &selected);
        let (twice, changed_on_second) = apply_category_defaults(&once, &selected);
        assert_eq!(once, twice);
        assert!(changed_on_second.is_empty());
    }
}
