//! Gallery Ordering Engine
//!
//! Ordered, capacity-bounded list of image references. Candidates are
//! validated one at a time so a multi-select keeps its valid subset; drag
//! reordering is addressed by stable [`AssetId`] rather than index.

use std::collections::HashMap;

use crate::asset::{
    ALLOWED_IMAGE_TYPES, AssetId, AssetKind, AssetReference, AssetRejection, IdSequence,
    MAX_GALLERY_IMAGES, MAX_IMAGE_BYTES, PreviewAllocator, PreviewRegistry, RejectReason,
    SelectedFile,
};

/// Move `from` to the position currently held by `to`.
///
/// Pure: the input is left untouched and the result is always a permutation
/// of it. Unknown ids or `from == to` yield the input order unchanged.
pub fn reordered(order: &[AssetId], from: AssetId, to: AssetId) -> Vec<AssetId> {
    let mut next = order.to_vec();
    let (Some(old), Some(new)) = (
        order.iter().position(|id| *id == from),
        order.iter().position(|id| *id == to),
    ) else {
        return next;
    };
    if old != new {
        let moved = next.remove(old);
        next.insert(new, moved);
    }
    next
}

/// Check a single image candidate against the gallery rules
pub fn check_image<F: SelectedFile>(file: &F, current_len: usize) -> Result<(), RejectReason> {
    if current_len >= MAX_GALLERY_IMAGES {
        return Err(RejectReason::CapacityReached);
    }
    if !ALLOWED_IMAGE_TYPES.contains(&file.mime_type()) {
        return Err(RejectReason::UnsupportedType {
            mime: file.mime_type().to_string(),
        });
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(RejectReason::TooLarge { size: file.size() });
    }
    Ok(())
}

/// Ordered image references for one form
#[derive(Debug)]
pub struct Gallery<F> {
    items: Vec<AssetReference<F>>,
}

impl<F> Default for Gallery<F> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<F: SelectedFile> Gallery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every acceptable file in input order.
    ///
    /// Rejected files are reported and skipped; they never abort the batch.
    pub fn add<P, I>(
        &mut self,
        files: I,
        ids: &mut IdSequence,
        previews: &mut PreviewRegistry<F, P>,
    ) -> Vec<AssetRejection>
    where
        P: PreviewAllocator<F>,
        I: IntoIterator<Item = F>,
    {
        let mut rejections = Vec::new();

        for file in files {
            if let Err(reason) = check_image(&file, self.items.len()) {
                tracing::debug!(file = %file.name(), ?reason, "Image rejected");
                rejections.push(AssetRejection {
                    file_name: file.name().to_string(),
                    reason,
                });
                continue;
            }

            let preview = previews.acquire(&file);
            let order = self.items.len();
            self.items
                .push(AssetReference::new(ids.next_id(), AssetKind::Image, file, preview, order));
        }

        rejections
    }

    /// Remove the element at `index`, releasing its preview first.
    pub fn remove<P: PreviewAllocator<F>>(
        &mut self,
        index: usize,
        previews: &mut PreviewRegistry<F, P>,
    ) -> Option<F> {
        let preview = self.items.get(index)?.preview().clone();
        previews.release(&preview);
        let removed = self.items.remove(index);
        self.renumber();
        Some(removed.into_file())
    }

    /// Remove by stable id
    pub fn remove_id<P: PreviewAllocator<F>>(
        &mut self,
        id: AssetId,
        previews: &mut PreviewRegistry<F, P>,
    ) -> Option<F> {
        let index = self.position(id)?;
        self.remove(index, previews)
    }

    /// Release every preview and empty the gallery
    pub fn clear<P: PreviewAllocator<F>>(&mut self, previews: &mut PreviewRegistry<F, P>) {
        for item in self.items.drain(..) {
            previews.release(item.preview());
        }
    }
}

impl<F> Gallery<F> {
    /// Drag gesture: move `from` onto the slot of `to`.
    ///
    /// Returns the order that was replaced, for undo, or `None` when nothing
    /// moved.
    pub fn reorder(&mut self, from: AssetId, to: AssetId) -> Option<Vec<AssetId>> {
        let before = self.ids();
        let after = reordered(&before, from, to);
        if after == before {
            return None;
        }
        self.apply_order(&after).then_some(before)
    }

    /// Rearrange to exactly `order`. Rejects anything that is not a
    /// permutation of the current ids and leaves the gallery untouched.
    pub fn apply_order(&mut self, order: &[AssetId]) -> bool {
        if order.len() != self.items.len() {
            return false;
        }
        let index: HashMap<AssetId, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id(), i))
            .collect();
        let mut seen = vec![false; self.items.len()];
        for id in order {
            match index.get(id) {
                Some(&i) if !seen[i] => seen[i] = true,
                _ => return false,
            }
        }

        let mut slots: Vec<Option<AssetReference<F>>> =
            std::mem::take(&mut self.items).into_iter().map(Some).collect();
        self.items = order
            .iter()
            .filter_map(|id| index.get(id).and_then(|&i| slots[i].take()))
            .collect();
        self.renumber();
        true
    }

    pub fn ids(&self) -> Vec<AssetId> {
        self.items.iter().map(AssetReference::id).collect()
    }

    pub fn position(&self, id: AssetId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&AssetReference<F>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetReference<F>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_GALLERY_IMAGES.saturating_sub(self.items.len())
    }

    fn renumber(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.set_order(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::asset::testing::{CountingPreviews, FakeFile};

    const MB: u64 = 1024 * 1024;

    type Registry = PreviewRegistry<FakeFile, CountingPreviews>;

    fn setup() -> (Gallery<FakeFile>, IdSequence, Registry, CountingPreviews) {
        let previews = CountingPreviews::default();
        (
            Gallery::new(),
            IdSequence::new(),
            PreviewRegistry::new(previews.clone()),
            previews,
        )
    }

    #[test]
    fn test_partial_batch_keeps_valid_files() {
        let (mut gallery, mut ids, mut registry, _) = setup();
        let rejected = gallery.add(
            vec![
                FakeFile::jpeg("a.jpg", MB),
                FakeFile::of("doc.pdf", "application/pdf", MB),
                FakeFile::jpeg("huge.jpg", 4 * MB),
                FakeFile::of("b.png", "image/png", 2 * MB),
            ],
            &mut ids,
            &mut registry,
        );

        assert_eq!(gallery.len(), 2);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].file_name, "doc.pdf");
        assert!(matches!(rejected[0].reason, RejectReason::UnsupportedType { .. }));
        assert!(matches!(rejected[1].reason, RejectReason::TooLarge { size } if size == 4 * MB));
        assert_eq!(registry.outstanding(), 2);
        let orders: Vec<usize> = gallery.iter().map(|a| a.order()).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_exactly_three_mib_is_accepted() {
        let (mut gallery, mut ids, mut registry, _) = setup();
        let rejected = gallery.add(
            vec![FakeFile::jpeg("edge.jpg", 3 * MB)],
            &mut ids,
            &mut registry,
        );
        assert!(rejected.is_empty());
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_capacity_is_enforced_per_file() {
        let (mut gallery, mut ids, mut registry, _) = setup();
        let files = (0..12).map(|i| FakeFile::jpeg(&format!("{i}.jpg"), 1000));
        let rejected = gallery.add(files, &mut ids, &mut registry);

        assert_eq!(gallery.len(), MAX_GALLERY_IMAGES);
        assert_eq!(rejected.len(), 2);
        assert!(rejected.iter().all(|r| r.reason == RejectReason::CapacityReached));
        assert_eq!(gallery.remaining_capacity(), 0);
    }

    #[test]
    fn test_remove_releases_preview_and_keeps_order() {
        let (mut gallery, mut ids, mut registry, previews) = setup();
        gallery.add(
            ["a.jpg", "b.jpg", "c.jpg"].map(|n| FakeFile::jpeg(n, 10)),
            &mut ids,
            &mut registry,
        );
        let removed_preview = gallery.get(1).map(|a| a.preview().clone());

        let removed = gallery.remove(1, &mut registry);

        assert_eq!(removed.map(|f| f.name), Some("b.jpg".to_string()));
        assert_eq!(previews.log.borrow().revoked, vec![removed_preview.unwrap()]);
        let names: Vec<&str> = gallery.iter().map(|a| a.file().name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert_eq!(gallery.get(1).map(|a| a.order()), Some(1));
        assert!(gallery.remove(5, &mut registry).is_none());
    }

    #[test]
    fn test_reorder_moves_to_target_slot() {
        let (mut gallery, mut ids, mut registry, _) = setup();
        gallery.add(
            ["a.jpg", "b.jpg", "c.jpg", "d.jpg"].map(|n| FakeFile::jpeg(n, 10)),
            &mut ids,
            &mut registry,
        );
        let order = gallery.ids();

        let undo = gallery.reorder(order[0], order[2]);

        let names: Vec<&str> = gallery.iter().map(|a| a.file().name.as_str()).collect();
        assert_eq!(names, vec!["b.jpg", "c.jpg", "a.jpg", "d.jpg"]);
        assert_eq!(undo.as_deref(), Some(order.as_slice()));

        assert!(gallery.apply_order(&order));
        let names: Vec<&str> = gallery.iter().map(|a| a.file().name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    }

    #[test]
    fn test_reorder_with_stale_id_is_noop() {
        let (mut gallery, mut ids, mut registry, _) = setup();
        gallery.add(["a.jpg", "b.jpg"].map(|n| FakeFile::jpeg(n, 10)), &mut ids, &mut registry);
        let first = gallery.ids()[0];
        let stale = gallery.ids()[1];
        gallery.remove(1, &mut registry);

        assert!(gallery.reorder(first, stale).is_none());
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_apply_order_rejects_non_permutations() {
        let (mut gallery, mut ids, mut registry, _) = setup();
        gallery.add(["a.jpg", "b.jpg"].map(|n| FakeFile::jpeg(n, 10)), &mut ids, &mut registry);
        let order = gallery.ids();

        assert!(!gallery.apply_order(&[order[0], order[0]]));
        assert!(!gallery.apply_order(&[order[0]]));
        assert_eq!(gallery.ids(), order);
    }

    #[test]
    fn test_reordered_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seq = IdSequence::new();
        let order: Vec<AssetId> = (0..8).map(|_| seq.next_id()).collect();

        for _ in 0..200 {
            let from = order[rng.random_range(0..order.len())];
            let to = order[rng.random_range(0..order.len())];
            let next = reordered(&order, from, to);

            assert_eq!(next.len(), order.len());
            let mut sorted = next.clone();
            sorted.sort();
            assert_eq!(sorted, order);
            assert_eq!(
                next.iter().position(|id| *id == from),
                order.iter().position(|id| *id == to)
            );
        }
    }

    #[test]
    fn test_random_add_remove_never_breaks_rules() {
        let mut rng = StdRng::seed_from_u64(42);
        let (mut gallery, mut ids, mut registry, previews) = setup();
        let mimes = ["image/jpeg", "image/png", "image/jpg", "image/gif", "video/mp4"];

        for step in 0..300 {
            if rng.random_bool(0.3) && !gallery.is_empty() {
                let index = rng.random_range(0..gallery.len());
                gallery.remove(index, &mut registry);
            } else {
                let batch: Vec<FakeFile> = (0..rng.random_range(1..5))
                    .map(|i| {
                        let mime = mimes[rng.random_range(0..mimes.len())];
                        FakeFile::of(&format!("{step}-{i}"), mime, rng.random_range(1..5 * MB))
                    })
                    .collect();
                gallery.add(batch, &mut ids, &mut registry);
            }

            assert!(gallery.len() <= MAX_GALLERY_IMAGES);
            for item in gallery.iter() {
                assert!(ALLOWED_IMAGE_TYPES.contains(&item.file().mime.as_str()));
                assert!(item.file().size <= MAX_IMAGE_BYTES);
            }
            assert_eq!(registry.outstanding(), gallery.len());
        }

        gallery.clear(&mut registry);
        let log = previews.log.borrow();
        assert_eq!(log.allocated.len(), log.revoked.len());
    }
}
