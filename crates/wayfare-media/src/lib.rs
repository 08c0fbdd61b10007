//! Wayfare Media — reconciles the draft media set against the persisted one.
//!
//! The reconciler tracks three collections: the base (persisted) media
//! list, newly staged blobs, and persisted refs marked for deletion.
//! Marking is non-destructive so a removal can be restored before
//! submission; nothing touches the network until the coordinator asks for
//! the diff exactly once.

use thiserror::Error;

use wayfare_core::media::{MediaDiff, MediaRef, PendingMedia};

/// Platform cap on visible media per experience.
pub const MAX_VISIBLE_MEDIA: usize = 10;

/// Per-file upload size cap.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Why a file was rejected at stage time.
///
/// Rejection is element-wise: one bad file never blocks the valid files
/// staged in the same batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageRejection {
    /// The file is not an image type.
    #[error("{file_name} is not an image")]
    UnsupportedType {
        /// Name of the offending file.
        file_name: String,
    },

    /// The file exceeds `MAX_FILE_BYTES`.
    #[error("{file_name} is larger than 5 MB")]
    TooLarge {
        /// Name of the offending file.
        file_name: String,
    },

    /// Accepting the file would exceed `MAX_VISIBLE_MEDIA`.
    #[error("{file_name} did not fit: only {slots_remaining} photo slot(s) left")]
    QuotaExceeded {
        /// Name of the offending file.
        file_name: String,
        /// Free slots at the start of the batch.
        slots_remaining: usize,
    },
}

/// Outcome of staging a batch of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// How many files were accepted into the pending set.
    pub accepted: usize,
    /// Per-file rejections, in batch order.
    pub rejected: Vec<StageRejection>,
}

/// One entry of the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleMedia<'a> {
    /// A persisted image surviving the pending removals.
    Persisted(&'a MediaRef),
    /// A staged blob not yet uploaded.
    Staged(&'a PendingMedia),
}

/// Tracks pending media changes against a persisted base list.
#[derive(Debug, Clone, Default)]
pub struct MediaReconciler {
    base: Vec<MediaRef>,
    pending_new: Vec<PendingMedia>,
    pending_removed: Vec<MediaRef>,
}

impl MediaReconciler {
    /// Creates an empty reconciler for the create flow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reconciler seeded with the entity's persisted media.
    #[must_use]
    pub fn from_persisted(base: Vec<MediaRef>) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Persisted media in its original order, including refs marked removed.
    #[must_use]
    pub fn base(&self) -> &[MediaRef] {
        &self.base
    }

    /// Staged blobs in append order.
    #[must_use]
    pub fn staged(&self) -> &[PendingMedia] {
        &self.pending_new
    }

    /// Count of media the host currently sees: surviving base plus staged.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.base.len() - self.pending_removed.len() + self.pending_new.len()
    }

    /// Validates and stages a batch of picked files.
    ///
    /// Each file is checked element-wise: non-images and oversized files
    /// are rejected individually without affecting the rest of the batch.
    /// Files that pass are accepted until the visible cap is reached;
    /// the overflow is rejected with the slot count that was available
    /// when the batch started, so nothing is dropped silently.
    pub fn stage(&mut self, files: Vec<PendingMedia>) -> StageReport {
        let slots_at_start = MAX_VISIBLE_MEDIA.saturating_sub(self.visible_count());
        let mut accepted = 0;
        let mut rejected = Vec::new();

        for file in files {
            if !file.is_image() {
                rejected.push(StageRejection::UnsupportedType {
                    file_name: file.file_name,
                });
                continue;
            }
            if file.size_bytes() > MAX_FILE_BYTES {
                rejected.push(StageRejection::TooLarge {
                    file_name: file.file_name,
                });
                continue;
            }
            if self.visible_count() >= MAX_VISIBLE_MEDIA {
                rejected.push(StageRejection::QuotaExceeded {
                    file_name: file.file_name,
                    slots_remaining: slots_at_start,
                });
                continue;
            }
            self.pending_new.push(file);
            accepted += 1;
        }

        if !rejected.is_empty() {
            tracing::debug!(
                accepted,
                rejected = rejected.len(),
                "media batch partially rejected"
            );
        }

        StageReport { accepted, rejected }
    }

    /// Removes one staged blob by position, with stable reindexing of the
    /// remainder. Returns the blob, or `None` when the index is out of
    /// bounds.
    pub fn unstage(&mut self, index: usize) -> Option<PendingMedia> {
        if index < self.pending_new.len() {
            Some(self.pending_new.remove(index))
        } else {
            None
        }
    }

    /// Marks a persisted ref for deletion. Idempotent; refs not in the
    /// base list are ignored, keeping `pending_removed ⊆ base`.
    pub fn mark_removed(&mut self, media_ref: &MediaRef) {
        if self.base.contains(media_ref) && !self.pending_removed.contains(media_ref) {
            self.pending_removed.push(media_ref.clone());
        }
    }

    /// Restores a ref previously marked for deletion. Idempotent.
    pub fn unmark_removed(&mut self, media_ref: &MediaRef) {
        self.pending_removed.retain(|r| r != media_ref);
    }

    /// Whether a persisted ref is currently marked for deletion.
    #[must_use]
    pub fn is_marked_removed(&self, media_ref: &MediaRef) -> bool {
        self.pending_removed.contains(media_ref)
    }

    /// The minimal change set to submit: staged blobs to upload and marked
    /// refs to delete. Side-effect free and callable repeatedly before
    /// commit.
    #[must_use]
    pub fn diff(&self) -> MediaDiff {
        MediaDiff {
            to_upload: self.pending_new.clone(),
            to_delete: self.pending_removed.clone(),
        }
    }

    /// Presentation order: surviving base items in their original order,
    /// then staged blobs in append order. Index 0 is the primary image;
    /// primary status is positional, never stored.
    #[must_use]
    pub fn visible_order(&self) -> Vec<VisibleMedia<'_>> {
        self.base
            .iter()
            .filter(|r| !self.pending_removed.contains(r))
            .map(VisibleMedia::Persisted)
            .chain(self.pending_new.iter().map(VisibleMedia::Staged))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> PendingMedia {
        PendingMedia::new(name, "image/jpeg", vec![0xFF; 16])
    }

    fn refs(n: usize) -> Vec<MediaRef> {
        (0..n)
            .map(|i| MediaRef::new(format!("https://cdn.example/photo-{i}.jpg")))
            .collect()
    }

    #[test]
    fn test_stage_accepts_valid_images() {
        let mut reconciler = MediaReconciler::new();
        let report = reconciler.stage(vec![image("a.jpg"), image("b.jpg")]);
        assert_eq!(report.accepted, 2);
        assert!(report.rejected.is_empty());
        assert_eq!(reconciler.visible_count(), 2);
    }

    #[test]
    fn test_stage_rejects_non_images_element_wise() {
        let mut reconciler = MediaReconciler::new();
        let report = reconciler.stage(vec![
            image("ok.jpg"),
            PendingMedia::new("notes.pdf", "application/pdf", vec![1, 2, 3]),
            image("also-ok.png"),
        ]);
        assert_eq!(report.accepted, 2);
        assert_eq!(
            report.rejected,
            vec![StageRejection::UnsupportedType {
                file_name: "notes.pdf".to_owned()
            }]
        );
    }

    #[test]
    fn test_stage_rejects_oversized_files() {
        let mut reconciler = MediaReconciler::new();
        let big = PendingMedia::new("huge.jpg", "image/jpeg", vec![0; MAX_FILE_BYTES + 1]);
        let report = reconciler.stage(vec![big, image("ok.jpg")]);
        assert_eq!(report.accepted, 1);
        assert_eq!(
            report.rejected,
            vec![StageRejection::TooLarge {
                file_name: "huge.jpg".to_owned()
            }]
        );
    }

    #[test]
    fn test_stage_truncates_at_quota_and_reports_every_overflow_file() {
        // 9 existing images visible, 3 valid files staged: exactly one fits.
        let mut reconciler = MediaReconciler::from_persisted(refs(9));
        let report = reconciler.stage(vec![image("1.jpg"), image("2.jpg"), image("3.jpg")]);

        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected.len(), 2);
        for rejection in &report.rejected {
            assert!(matches!(
                rejection,
                StageRejection::QuotaExceeded {
                    slots_remaining: 1,
                    ..
                }
            ));
        }
        assert_eq!(reconciler.visible_count(), MAX_VISIBLE_MEDIA);
    }

    #[test]
    fn test_marking_a_removal_frees_a_slot_for_staging() {
        let base = refs(10);
        let mut reconciler = MediaReconciler::from_persisted(base.clone());
        assert_eq!(reconciler.stage(vec![image("new.jpg")]).accepted, 0);

        reconciler.mark_removed(&base[4]);
        let report = reconciler.stage(vec![image("new.jpg")]);
        assert_eq!(report.accepted, 1);
        assert_eq!(reconciler.visible_count(), MAX_VISIBLE_MEDIA);
    }

    #[test]
    fn test_mark_and_unmark_round_trip_is_a_noop_on_diff() {
        let base = refs(3);
        let mut reconciler = MediaReconciler::from_persisted(base.clone());
        let before = reconciler.diff();

        reconciler.mark_removed(&base[1]);
        reconciler.unmark_removed(&base[1]);

        assert_eq!(reconciler.diff(), before);
    }

    #[test]
    fn test_mark_removed_is_idempotent() {
        let base = refs(2);
        let mut reconciler = MediaReconciler::from_persisted(base.clone());
        reconciler.mark_removed(&base[0]);
        reconciler.mark_removed(&base[0]);
        assert_eq!(reconciler.diff().to_delete, vec![base[0].clone()]);
    }

    #[test]
    fn test_mark_removed_ignores_refs_outside_the_base() {
        let mut reconciler = MediaReconciler::from_persisted(refs(2));
        reconciler.mark_removed(&MediaRef::new("https://elsewhere.example/x.jpg"));
        assert!(reconciler.diff().to_delete.is_empty());
    }

    #[test]
    fn test_diff_only_ever_deletes_base_refs_and_visible_never_exceeds_cap() {
        let base = refs(4);
        let mut reconciler = MediaReconciler::from_persisted(base.clone());

        // An arbitrary interleaving of operations.
        reconciler.stage(vec![image("a.jpg"), image("b.jpg")]);
        reconciler.mark_removed(&base[0]);
        reconciler.unstage(0);
        reconciler.mark_removed(&base[3]);
        reconciler.unmark_removed(&base[0]);
        reconciler.stage((0..12).map(|i| image(&format!("bulk-{i}.jpg"))).collect());

        let diff = reconciler.diff();
        for deleted in &diff.to_delete {
            assert!(base.contains(deleted));
        }
        assert!(reconciler.visible_order().len() <= MAX_VISIBLE_MEDIA);
    }

    #[test]
    fn test_visible_order_is_surviving_base_then_staged() {
        let base = refs(3);
        let mut reconciler = MediaReconciler::from_persisted(base.clone());
        reconciler.mark_removed(&base[1]);
        reconciler.stage(vec![image("new.jpg")]);

        let order = reconciler.visible_order();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], VisibleMedia::Persisted(&base[0]));
        assert_eq!(order[1], VisibleMedia::Persisted(&base[2]));
        assert!(matches!(order[2], VisibleMedia::Staged(p) if p.file_name == "new.jpg"));
    }

    #[test]
    fn test_unstage_reindexes_remaining_blobs_stably() {
        let mut reconciler = MediaReconciler::new();
        reconciler.stage(vec![image("a.jpg"), image("b.jpg"), image("c.jpg")]);

        let removed = reconciler.unstage(1).unwrap();
        assert_eq!(removed.file_name, "b.jpg");

        let names: Vec<&str> = reconciler
            .staged()
            .iter()
            .map(|p| p.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert!(reconciler.unstage(5).is_none());
    }
}
