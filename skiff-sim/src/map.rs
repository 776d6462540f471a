use std::f64::consts::PI;
use std::fmt;
use std::path::Path;

use glam::DVec2;

// Track bitmaps use packed abgr pixels (little-endian view of rgba bytes):
// alpha in the top byte, red in the bottom byte. Opaque black is a wall;
// the two marker patterns below carry start poses and checkpoint cells in
// their low nibbles.
const WALL_PIXEL: u32 = 0xff00_0000;
const MARKER_MASK: u32 = 0xfff0_f0f0;
const START_MARKER: u32 = 0xfff0_0000;
const CHECKPOINT_MARKER: u32 = 0xff00_00f0;

/// Decoded track bitmap: one packed abgr color per cell, row-major.
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl PixelBuffer {
    pub fn from_rgba_bytes(width: usize, height: usize, data: &[u8]) -> PixelBuffer {
        let pixels = data
            .chunks_exact(4)
            .map(|px| {
                u32::from(px[0])
                    | u32::from(px[1]) << 8
                    | u32::from(px[2]) << 16
                    | u32::from(px[3]) << 24
            })
            .collect();
        PixelBuffer {
            width,
            height,
            pixels,
        }
    }

    pub fn load_png(path: &Path) -> Result<PixelBuffer, MapError> {
        let img = image::open(path)
            .map_err(|e| MapError::Image(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        Ok(PixelBuffer::from_rgba_bytes(
            img.width() as usize,
            img.height() as usize,
            img.as_raw(),
        ))
    }

    /// Build a buffer from an ascii template, one char per cell: '#' is a
    /// wall, '^' '>' 'v' '<' are start slots (numbered in scan order, facing
    /// up/right/down/left), 'a'..='p' are checkpoint cells for checkpoints
    /// 0..=15, anything else is open space. Rows must share one length.
    pub fn from_template(rows: &[&str]) -> PixelBuffer {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut pixels = Vec::with_capacity(width * height);
        let mut next_slot = 0u32;
        for row in rows {
            for ch in row.chars() {
                let px = match ch {
                    '#' => WALL_PIXEL,
                    '^' | '>' | 'v' | '<' => {
                        let direction = match ch {
                            '^' => 0u32,
                            '>' => 1,
                            'v' => 2,
                            _ => 3,
                        };
                        let px = START_MARKER | next_slot << 16 | direction << 8;
                        next_slot += 1;
                        px
                    }
                    'a'..='p' => CHECKPOINT_MARKER | (ch as u32 - 'a' as u32),
                    _ => 0xffff_ffff,
                };
                pixels.push(px);
            }
        }
        PixelBuffer {
            width,
            height,
            pixels,
        }
    }
}

#[derive(Debug)]
pub enum MapError {
    Image(String),
    MissingStartSlot(usize),
    EmptyCheckpoint(usize),
    UnknownStartSlot(usize),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Image(detail) => write!(f, "could not decode track image {}", detail),
            MapError::MissingStartSlot(slot) => {
                write!(f, "track has no start pose for slot {}", slot)
            }
            MapError::EmptyCheckpoint(index) => {
                write!(f, "track defines no cells for checkpoint {}", index)
            }
            MapError::UnknownStartSlot(slot) => {
                write!(f, "race asked for start slot {} the track doesn't have", slot)
            }
        }
    }
}

impl std::error::Error for MapError {}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StartPose {
    pub position: DVec2,
    pub orientation: f64,
}

/// Immutable occupancy grid plus start poses and ordered checkpoint cell
/// sets, decoded once from a track bitmap.
pub struct OccupancyMap {
    pub width: usize,
    pub height: usize,
    pub walls: Vec<bool>,
    pub start: Vec<StartPose>,
    pub checkpoints: Vec<Vec<usize>>,
}

impl OccupancyMap {
    pub fn decode(img: &PixelBuffer) -> Result<OccupancyMap, MapError> {
        let mut walls = vec![false; img.width * img.height];
        let mut start_slots: Vec<Option<StartPose>> = Vec::new();
        let mut checkpoints: Vec<Vec<usize>> = Vec::new();

        for y in 0..img.height {
            for x in 0..img.width {
                let cell = y * img.width + x;
                let px = img.pixels[cell];
                walls[cell] = px == WALL_PIXEL;
                if px & MARKER_MASK == START_MARKER {
                    let slot = ((px >> 16) & 0xf) as usize;
                    let direction_code = f64::from((px >> 8) & 0xf);
                    if start_slots.len() <= slot {
                        start_slots.resize(slot + 1, None);
                    }
                    start_slots[slot] = Some(StartPose {
                        position: DVec2::new(x as f64 + 0.5, y as f64 + 0.5),
                        orientation: PI * ((1.0 + direction_code / 2.0) % 2.0),
                    });
                } else if px & MARKER_MASK == CHECKPOINT_MARKER {
                    let index = (px & 0xf) as usize;
                    if checkpoints.len() <= index {
                        checkpoints.resize_with(index + 1, Vec::new);
                    }
                    checkpoints[index].push(cell);
                }
            }
        }

        // every slot up to the highest marked one must exist; a map with no
        // start markers at all is still valid (nothing can race on it)
        let mut start = Vec::with_capacity(start_slots.len());
        for (slot, pose) in start_slots.into_iter().enumerate() {
            start.push(pose.ok_or(MapError::MissingStartSlot(slot))?);
        }
        // same for checkpoint indices; a gap would make laps impossible
        for (index, cells) in checkpoints.iter().enumerate() {
            if cells.is_empty() {
                return Err(MapError::EmptyCheckpoint(index));
            }
        }

        Ok(OccupancyMap {
            width: img.width,
            height: img.height,
            walls,
            start,
            checkpoints,
        })
    }

    /// Cells outside the grid count as open space, matching how the probes
    /// behave when the ship slips past the map edge.
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.walls[y as usize * self.width + x as usize]
    }

    pub fn cell_index(&self, position: DVec2) -> Option<usize> {
        let x = position.x.floor();
        let y = position.y.floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn checkpoint_contains(&self, index: usize, cell: usize) -> bool {
        self.checkpoints
            .get(index)
            .map_or(false, |cells| cells.contains(&cell))
    }
}
