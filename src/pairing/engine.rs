use std::path::Path;

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{ComposeError, Result},
    imaging::{stitch::stitch_pair, Composite, PairMember},
    slot::{ImageSlot, SlotId},
};

/// Pairing and compositing engine
///
/// Owns two ordered image sets (`top`, `bottom`), a current index into each,
/// and the most recently produced composite. Navigation on an empty slot is
/// a no-op; index arithmetic wraps modulo slot length. All operations are
/// synchronous and run to completion on the calling thread — a presentation
/// layer that needs a responsive event loop can offload calls to its own
/// worker, the engine holds no locks and expects a single caller.
pub struct PairingEngine {
    config: Config,
    top: ImageSlot,
    bottom: ImageSlot,
    last: Option<Composite>,
}

impl PairingEngine {
    /// Create an engine with empty slots
    pub fn new(config: Config) -> Self {
        Self {
            config,
            top: ImageSlot::default(),
            bottom: ImageSlot::default(),
            last: None,
        }
    }

    /// Scan `dir` and replace the named slot wholesale, resetting its index
    ///
    /// Returns the number of matched files. Zero is a valid result; the
    /// slot is then empty and compose requests report `NotReady`.
    pub fn load_slot<P: AsRef<Path>>(&mut self, id: SlotId, dir: P) -> Result<usize> {
        let slot = ImageSlot::scan(dir.as_ref())?;
        let count = slot.len();

        info!("loaded {} slot: {} images from {:?}", id, count, dir.as_ref());
        *self.slot_mut(id) = slot;

        Ok(count)
    }

    /// Borrow a slot for inspection (index, length, paths)
    pub fn slot(&self, id: SlotId) -> &ImageSlot {
        match id {
            SlotId::Top => &self.top,
            SlotId::Bottom => &self.bottom,
        }
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut ImageSlot {
        match id {
            SlotId::Top => &mut self.top,
            SlotId::Bottom => &mut self.bottom,
        }
    }

    /// Move a slot's index by `delta`, wrapping; no-op on an empty slot
    ///
    /// Pure index mutation — request a composite separately.
    pub fn step(&mut self, id: SlotId, delta: isize) {
        let slot = self.slot_mut(id);
        slot.step(delta);
        debug!("{} slot index -> {}/{}", id, slot.index(), slot.len());
    }

    /// Compose the currently indexed pair
    ///
    /// Requires both slots non-empty, else `NotReady`. On success the engine
    /// keeps a copy as its last composite; on a decode failure the previous
    /// last composite and all indices are left untouched.
    pub fn compose_current(&mut self) -> Result<Composite> {
        let (top_path, bottom_path) = match (self.top.current(), self.bottom.current()) {
            (Some(top), Some(bottom)) => (top, bottom),
            _ => return Err(ComposeError::NotReady.into()),
        };

        let buffer = stitch_pair(top_path, bottom_path, &self.config.compose)?;

        let composite = Composite::new(
            buffer,
            PairMember::new(top_path, self.top.index(), self.top.len()),
            PairMember::new(bottom_path, self.bottom.index(), self.bottom.len()),
        );

        self.last = Some(composite.clone());
        Ok(composite)
    }

    /// Deterministic grid sampling around the current indices
    ///
    /// Row `r`, column `c` pairs `top[(top_index + c) mod len]` with
    /// `bottom[(bottom_index + r) mod len]`, bounded by
    /// `min(max_rows, len(bottom))` and `min(max_cols, len(top))`. The
    /// returned iterator is lazy and row-major; a cell whose source fails to
    /// decode is skipped, not propagated, so the rest of the grid stays
    /// available. The batch does not update the engine's last composite.
    pub fn compose_batch(&self, max_rows: usize, max_cols: usize) -> GridBatch<'_> {
        let rows = max_rows.min(self.bottom.len());
        let cols = max_cols.min(self.top.len());

        debug!("grid batch: {} rows x {} cols", rows, cols);

        GridBatch {
            engine: self,
            rows,
            cols,
            cell: 0,
        }
    }

    /// Write a composite to `path` (format from the extension)
    pub fn save<P: AsRef<Path>>(&self, composite: &Composite, path: P) -> Result<()> {
        composite.save(path.as_ref())?;
        info!("saved composite to {:?}", path.as_ref());
        Ok(())
    }

    /// The most recently produced current composite, if any
    pub fn last_composite(&self) -> Option<&Composite> {
        self.last.as_ref()
    }

    fn compose_cell(&self, row: usize, col: usize) -> Result<Composite> {
        // Callers guarantee both slots are non-empty via the batch bounds.
        let (top_index, top_path) = self
            .top
            .at_offset(col)
            .ok_or(ComposeError::NotReady)?;
        let (bottom_index, bottom_path) = self
            .bottom
            .at_offset(row)
            .ok_or(ComposeError::NotReady)?;

        let buffer = stitch_pair(top_path, bottom_path, &self.config.compose)?;

        Ok(Composite::new(
            buffer,
            PairMember::new(top_path, top_index, self.top.len()),
            PairMember::new(bottom_path, bottom_index, self.bottom.len()),
        ))
    }
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Lazy row-major iterator over a grid of composites
///
/// Restartable in the sense that calling `compose_batch` again with the same
/// indices yields the same sequence.
pub struct GridBatch<'a> {
    engine: &'a PairingEngine,
    rows: usize,
    cols: usize,
    cell: usize,
}

impl GridBatch<'_> {
    /// Grid shape after bounding by the slot lengths: (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl Iterator for GridBatch<'_> {
    type Item = Composite;

    fn next(&mut self) -> Option<Composite> {
        while self.cell < self.rows * self.cols {
            let row = self.cell / self.cols;
            let col = self.cell % self.cols;
            self.cell += 1;

            match self.engine.compose_cell(row, col) {
                Ok(composite) => return Some(composite),
                Err(err) => {
                    warn!("skipping grid cell ({}, {}): {}", row, col, err);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CombinerError;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn write_image(dir: &Path, name: &str, w: u32, h: u32, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb(color)).save(&path).unwrap();
        path
    }

    /// Top slot [a1.png, a2.png, a3.png] (20x10), bottom slot [b1.jpg, b2.jpg] (20x8)
    fn loaded_engine() -> (PairingEngine, TempDir, TempDir) {
        let top_dir = tempdir().unwrap();
        let bottom_dir = tempdir().unwrap();

        for name in ["a1.png", "a2.png", "a3.png"] {
            write_image(top_dir.path(), name, 20, 10, [100, 0, 0]);
        }
        for name in ["b1.jpg", "b2.jpg"] {
            write_image(bottom_dir.path(), name, 20, 8, [0, 100, 0]);
        }

        let mut engine = PairingEngine::new(Config::default());
        assert_eq!(engine.load_slot(SlotId::Top, top_dir.path()).unwrap(), 3);
        assert_eq!(engine.load_slot(SlotId::Bottom, bottom_dir.path()).unwrap(), 2);

        (engine, top_dir, bottom_dir)
    }

    #[test]
    fn test_compose_before_loading_is_not_ready() {
        let mut engine = PairingEngine::default();
        let err = engine.compose_current().unwrap_err();
        assert!(matches!(
            err,
            CombinerError::Compose(ComposeError::NotReady)
        ));
        assert!(engine.last_composite().is_none());
    }

    #[test]
    fn test_navigation_scenario() {
        let (mut engine, _top, _bottom) = loaded_engine();

        let composite = engine.compose_current().unwrap();
        assert_eq!(composite.top.file_name, "a1.png");
        assert_eq!(composite.bottom.file_name, "b1.jpg");

        engine.step(SlotId::Top, 1);
        let composite = engine.compose_current().unwrap();
        assert_eq!(composite.top.file_name, "a2.png");
        assert_eq!(composite.bottom.file_name, "b1.jpg");

        // Two bottom steps wrap b1 -> b2 -> b1
        engine.step(SlotId::Bottom, 1);
        engine.step(SlotId::Bottom, 1);
        let composite = engine.compose_current().unwrap();
        assert_eq!(composite.top.file_name, "a2.png");
        assert_eq!(composite.bottom.file_name, "b1.jpg");
        assert_eq!(composite.caption(), "Top: (2/3) a2.png | Bottom: (1/2) b1.jpg");
    }

    #[test]
    fn test_composite_dimensions() {
        let top_dir = tempdir().unwrap();
        let bottom_dir = tempdir().unwrap();
        write_image(top_dir.path(), "t.png", 100, 40, [1, 1, 1]);
        write_image(bottom_dir.path(), "b.png", 50, 30, [2, 2, 2]);

        let mut engine = PairingEngine::default();
        engine.load_slot(SlotId::Top, top_dir.path()).unwrap();
        engine.load_slot(SlotId::Bottom, bottom_dir.path()).unwrap();

        let composite = engine.compose_current().unwrap();
        assert_eq!(composite.width(), 50);
        assert_eq!(composite.height(), 20 + 30);
    }

    #[test]
    fn test_reload_resets_index() {
        let (mut engine, top_dir, _bottom) = loaded_engine();

        engine.step(SlotId::Top, 2);
        assert_eq!(engine.slot(SlotId::Top).index(), 2);

        engine.load_slot(SlotId::Top, top_dir.path()).unwrap();
        assert_eq!(engine.slot(SlotId::Top).index(), 0);
    }

    #[test]
    fn test_load_slot_of_non_images_leaves_slot_empty() {
        let (mut engine, _top, _bottom) = loaded_engine();

        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let count = engine.load_slot(SlotId::Top, dir.path()).unwrap();
        assert_eq!(count, 0);
        assert!(engine.slot(SlotId::Top).is_empty());

        let err = engine.compose_current().unwrap_err();
        assert!(matches!(
            err,
            CombinerError::Compose(ComposeError::NotReady)
        ));
    }

    #[test]
    fn test_decode_failure_preserves_last_composite() {
        let top_dir = tempdir().unwrap();
        let bottom_dir = tempdir().unwrap();
        write_image(top_dir.path(), "a_good.png", 10, 10, [1, 1, 1]);
        std::fs::write(top_dir.path().join("b_bad.png"), b"garbage").unwrap();
        write_image(bottom_dir.path(), "b.png", 10, 10, [2, 2, 2]);

        let mut engine = PairingEngine::default();
        engine.load_slot(SlotId::Top, top_dir.path()).unwrap();
        engine.load_slot(SlotId::Bottom, bottom_dir.path()).unwrap();

        engine.compose_current().unwrap();
        let good_caption = engine.last_composite().unwrap().caption();

        engine.step(SlotId::Top, 1);
        let err = engine.compose_current().unwrap_err();
        assert!(err.to_string().contains("b_bad.png"));

        // Previous composite and indices untouched
        assert_eq!(engine.last_composite().unwrap().caption(), good_caption);
        assert_eq!(engine.slot(SlotId::Top).index(), 1);
    }

    #[test]
    fn test_batch_bounds_and_wrapping() {
        let top_dir = tempdir().unwrap();
        let bottom_dir = tempdir().unwrap();
        write_image(top_dir.path(), "t.png", 10, 10, [1, 1, 1]);
        for name in ["b1.png", "b2.png", "b3.png"] {
            write_image(bottom_dir.path(), name, 10, 10, [2, 2, 2]);
        }

        let mut engine = PairingEngine::default();
        engine.load_slot(SlotId::Top, top_dir.path()).unwrap();
        engine.load_slot(SlotId::Bottom, bottom_dir.path()).unwrap();

        // rows = min(2, 3) = 2, cols = min(2, 1) = 1
        let batch = engine.compose_batch(2, 2);
        assert_eq!(batch.shape(), (2, 1));

        let cells: Vec<_> = batch.collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].bottom.position, 0);
        assert_eq!(cells[1].bottom.position, 1);
        assert!(cells.iter().all(|c| c.top.position == 0));
    }

    #[test]
    fn test_batch_wraps_around_current_index() {
        let (mut engine, _top, _bottom) = loaded_engine();

        engine.step(SlotId::Top, 2);
        engine.step(SlotId::Bottom, 1);

        let cells: Vec<_> = engine.compose_batch(2, 3).collect();
        assert_eq!(cells.len(), 6);

        // Row 0: bottom stays at index 1; columns wrap 2 -> 0 -> 1
        assert_eq!(cells[0].top.position, 2);
        assert_eq!(cells[1].top.position, 0);
        assert_eq!(cells[2].top.position, 1);
        assert_eq!(cells[0].bottom.position, 1);

        // Row 1 wraps the bottom back to index 0
        assert_eq!(cells[3].bottom.position, 0);
    }

    #[test]
    fn test_batch_skips_undecodable_cells() {
        let top_dir = tempdir().unwrap();
        let bottom_dir = tempdir().unwrap();
        write_image(top_dir.path(), "t.png", 10, 10, [1, 1, 1]);
        std::fs::write(bottom_dir.path().join("a_bad.png"), b"garbage").unwrap();
        write_image(bottom_dir.path(), "b_good.png", 10, 10, [2, 2, 2]);

        let mut engine = PairingEngine::default();
        engine.load_slot(SlotId::Top, top_dir.path()).unwrap();
        engine.load_slot(SlotId::Bottom, bottom_dir.path()).unwrap();

        let cells: Vec<_> = engine.compose_batch(2, 1).collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].bottom.file_name, "b_good.png");

        // The skipped cell never became the last composite
        assert!(engine.last_composite().is_none());
    }

    #[test]
    fn test_batch_on_empty_slot_is_empty() {
        let engine = PairingEngine::default();
        assert_eq!(engine.compose_batch(3, 3).count(), 0);
    }

    #[test]
    fn test_save_via_engine() {
        let (mut engine, _top, _bottom) = loaded_engine();
        let out_dir = tempdir().unwrap();
        let path = out_dir.path().join("pair.png");

        let composite = engine.compose_current().unwrap();
        engine.save(&composite, &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded.dimensions(), (composite.width(), composite.height()));
        assert_eq!(reloaded.as_raw(), composite.as_image().as_raw());
    }
}
