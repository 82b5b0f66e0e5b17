//! Per-frame terrain culling loop.
//!
//! Each frame walks `Begin → ExtractFrustum → Classify → End`. Classification
//! only reads the terrain, so cells are never touched after build.

use glam::Mat4;
use vista_terrain::{LineVertex, Terrain, TerrainCell, TerrainVertex};

use crate::frustum::Frustum;

/// Where the driver is within the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePhase {
    Begin,
    ExtractFrustum,
    Classify,
    End,
}

/// Counters for one frame, reset at [`TerrainRenderDriver::begin_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub cells_drawn: u32,
    pub cells_culled: u32,
    pub vertices_drawn: u64,
    /// `vertices_drawn / 3`.
    pub triangles_drawn: u64,
    /// The frustum for this frame was degenerate and everything was culled.
    pub degenerate_frustum: bool,
}

/// One cell queued for drawing, with its upload payload.
#[derive(Debug)]
pub struct VisibleCell<'a> {
    /// Index into [`Terrain::cells`].
    pub index: usize,
    pub cell: &'a TerrainCell,
    pub vertices: &'a [TerrainVertex],
    pub vertex_bytes: &'a [u8],
    /// Draw with local indices `0..index_count`.
    pub index_count: u32,
    /// Bounding-box wireframe, present when cell bounds are shown.
    pub bounds_lines: Option<[LineVertex; 24]>,
}

/// Decides, once per frame, which terrain cells get submitted.
///
/// Call [`begin_frame`](Self::begin_frame), [`extract_frustum`](Self::extract_frustum),
/// [`classify`](Self::classify), then [`end_frame`](Self::end_frame), or
/// [`run_frame`](Self::run_frame) for all four. Out-of-order calls never
/// carry counts over: `extract_frustum` starts a new frame if none is open,
/// and every `classify` pass recounts from zero against the last frustum.
#[derive(Debug)]
pub struct TerrainRenderDriver {
    frustum: Frustum,
    screen_depth: f32,
    show_cell_bounds: bool,
    phase: FramePhase,
    stats: FrameStats,
    visible: Vec<usize>,
    degenerate_frames: u64,
}

impl TerrainRenderDriver {
    pub fn new(screen_depth: f32, show_cell_bounds: bool) -> Self {
        Self {
            frustum: Frustum::default(),
            screen_depth,
            show_cell_bounds,
            phase: FramePhase::End,
            stats: FrameStats::default(),
            visible: Vec::new(),
            degenerate_frames: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.phase = FramePhase::Begin;
        self.stats = FrameStats::default();
        self.visible.clear();
    }

    pub fn extract_frustum(&mut self, projection: &Mat4, view: &Mat4) {
        if self.phase != FramePhase::Begin {
            self.begin_frame();
        }
        self.phase = FramePhase::ExtractFrustum;
        self.frustum.update(projection, view, self.screen_depth);

        if self.frustum.is_degenerate() {
            self.stats.degenerate_frustum = true;
            self.degenerate_frames += 1;
            log::warn!(
                "Degenerate view frustum, culling every cell ({} frames so far)",
                self.degenerate_frames
            );
        }
    }

    /// Test every cell's bounds against the frame's frustum.
    pub fn classify(&mut self, terrain: &Terrain) {
        if matches!(self.phase, FramePhase::Begin | FramePhase::End) {
            log::warn!("Classifying terrain cells without extracting a frustum this frame");
        }
        self.phase = FramePhase::Classify;

        self.visible.clear();
        self.stats.cells_drawn = 0;
        self.stats.cells_culled = 0;
        self.stats.vertices_drawn = 0;

        for (index, cell) in terrain.cells().iter().enumerate() {
            if self.frustum.check_aabb(&cell.bounds) {
                self.visible.push(index);
                self.stats.cells_drawn += 1;
                self.stats.vertices_drawn += u64::from(cell.vertex_count());
            } else {
                self.stats.cells_culled += 1;
            }
        }
        self.stats.triangles_drawn = self.stats.vertices_drawn / 3;
    }

    pub fn end_frame(&mut self) -> FrameStats {
        self.phase = FramePhase::End;
        log::trace!(
            "Terrain frame: {} drawn, {} culled, {} vertices",
            self.stats.cells_drawn,
            self.stats.cells_culled,
            self.stats.vertices_drawn
        );
        self.stats
    }

    /// Run a full frame and return its counters.
    pub fn run_frame(&mut self, terrain: &Terrain, projection: &Mat4, view: &Mat4) -> FrameStats {
        self.begin_frame();
        self.extract_frustum(projection, view);
        self.classify(terrain);
        self.end_frame()
    }

    /// Cells enqueued this frame, in terrain order.
    pub fn visible_cells<'a>(
        &'a self,
        terrain: &'a Terrain,
    ) -> impl Iterator<Item = VisibleCell<'a>> + 'a {
        let cells = terrain.cells();
        self.visible.iter().filter_map(move |&index| {
            let cell = cells.get(index)?;
            Some(VisibleCell {
                index,
                cell,
                vertices: &cell.vertices,
                vertex_bytes: cell.vertex_bytes(),
                index_count: cell.index_count(),
                bounds_lines: self
                    .show_cell_bounds
                    .then(|| cell.line_box.line_vertices()),
            })
        })
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Frames whose frustum was degenerate since the driver was created.
    pub fn degenerate_frames(&self) -> u64 {
        self.degenerate_frames
    }

    pub fn set_show_cell_bounds(&mut self, show: bool) {
        self.show_cell_bounds = show;
    }
}
