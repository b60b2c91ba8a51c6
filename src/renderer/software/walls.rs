use glam::{Vec2, Vec3, vec2};

use crate::{
    renderer::{
        Scene,
        software::{Software, buffers::STENCIL_WALL, projection::View, sampler},
    },
    world::geometry::{Line, WALL_TOP, Wall, intersection_point},
};

/// Nearest wall along one cast column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnHit {
    /// Euclidean hit distance projected on the camera's forward axis.
    pub distance: f32,
    pub color: Vec3,
    /// Distance from the hit point to the wall's `start`; tiles the texture
    /// continuously along the wall.
    pub u: f32,
}

/// Cast the ray of `column` against every wall and keep the nearest hit.
///
/// Ties keep the wall seen first.
pub fn cast_column(view: &View, walls: &[Wall], column: usize) -> Option<ColumnHit> {
    let dir = view.column_ray(column);
    let ray = Line::new(view.position, view.position + dir * view.far);
    let cos = view.front.dot(dir);

    let mut nearest: Option<ColumnHit> = None;
    let mut best = view.far;
    for wall in walls {
        let Some(p) = intersection_point(&ray, &wall.line) else {
            continue;
        };
        let distance = view.position.distance(p) * cos;
        if distance < best {
            best = distance;
            nearest = Some(ColumnHit {
                distance,
                color: wall.color,
                u: p.distance(wall.line.start),
            });
        }
    }
    nearest
}

/// Screen-space span of one wall column.
///
/// Rows are centred and grow upward: row `j` is screen line `height/2 - j`.
/// The slice covers `lo < j < hi`.
#[derive(Clone, Copy, Debug)]
struct WallSlice {
    lo: i32,
    hi: i32,
    distance: f32,
    depth: f32,
    u: f32,
    mip: usize,
}

impl WallSlice {
    fn new(view: &View, hit: &ColumnHit, mip: usize) -> Self {
        let rows_per_plane_unit = view.height as f32 / view.plane_height;
        let top = ((WALL_TOP - view.eye) / hit.distance * rows_per_plane_unit) as i32;
        let bottom = ((0.0 - view.eye) / hit.distance * rows_per_plane_unit) as i32;
        let half = (view.height / 2) as i32;

        Self {
            lo: bottom.max(-half),
            hi: top.min(half),
            distance: hit.distance,
            depth: view.depth(hit.distance),
            u: hit.u,
            mip,
        }
    }

    /// World-space texture coordinate at centred row `j`; V grows upward
    /// from the floor.
    #[inline(always)]
    fn uv(&self, view: &View, j: i32) -> Vec2 {
        vec2(self.u, view.eye + j as f32 * view.row_step * self.distance)
    }
}

impl Software {
    /// Wall pass: cast every column, then fill colour, stencil and depth.
    pub(super) fn draw_walls(&mut self, view: &View, scene: Scene<'_>) {
        let walls = &scene.level.walls;
        self.hits = self
            .pool
            .map_chunks(view.width, |column| cast_column(view, walls, column));

        let config = &self.config;
        let w = view.width;
        // screen column x shows cast column w - x - 1
        let slices: Vec<Option<WallSlice>> = (0..w)
            .map(|x| {
                self.hits[w - x - 1]
                    .map(|hit| WallSlice::new(view, &hit, config.mip_level(hit.distance)))
            })
            .collect();

        let texture = &scene.textures.wall;
        let filtering = config.use_filtering();
        let format = config.pixel_format;
        let half = (view.height / 2) as i32;

        let ranges = self.pool.chunks(view.height);
        self.pool.for_each_band(self.buffers.bands(&ranges), |mut band| {
            for y in band.rows.clone() {
                let j = half - y as i32;
                for (x, slice) in slices.iter().enumerate() {
                    let Some(slice) = slice else { continue };
                    if j <= slice.lo || j >= slice.hi {
                        continue;
                    }
                    let uv = slice.uv(view, j);
                    // texture rows run top-down, V runs bottom-up
                    let color = sampler::sample(texture.mipmap(slice.mip), vec2(uv.x, -uv.y), filtering);

                    let i = band.index(x, y);
                    band.screen[i] = format.pack(color);
                    band.stencil[i] = STENCIL_WALL;
                    band.depth[i] = slice.depth;
                }
            }
        });
    }

    /// Per-column result of the last wall pass, indexed by cast column.
    pub fn column_hits(&self) -> &[Option<ColumnHit>] {
        &self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{
        Renderer,
        software::{buffers::FAR_DEPTH, fixtures},
    };
    use crate::world::camera::Camera;
    use glam::vec3;

    fn wall(ax: f32, ay: f32, bx: f32, by: f32) -> Wall {
        Wall::new(vec2(ax, ay), vec2(bx, by), 1.0, vec3(1.0, 0.0, 0.0))
    }

    #[test]
    fn straight_ray_hits_perpendicular_wall_at_exact_distance() {
        let cam = Camera::default();
        let view = View::new(&cam, 64, 48);
        let walls = [wall(-5.0, 4.0, 5.0, 4.0)];

        let hit = cast_column(&view, &walls, 32).expect("wall ahead");
        assert_eq!(hit.distance, 4.0);
        assert_eq!(hit.u, 5.0);
    }

    #[test]
    fn nearest_wall_wins() {
        let view = View::new(&Camera::default(), 64, 48);
        let walls = [
            wall(-5.0, 9.0, 5.0, 9.0),
            wall(-5.0, 3.0, 5.0, 3.0),
            wall(-5.0, 6.0, 5.0, 6.0),
        ];
        let hit = cast_column(&view, &walls, 32).unwrap();
        assert_eq!(hit.distance, 3.0);
    }

    #[test]
    fn equal_distance_keeps_first_wall() {
        let view = View::new(&Camera::default(), 64, 48);
        let mut first = wall(-5.0, 4.0, 5.0, 4.0);
        first.color = vec3(0.0, 1.0, 0.0);
        let second = wall(5.0, 4.0, -5.0, 4.0);
        let hit = cast_column(&view, &[first, second], 32).unwrap();
        assert_eq!(hit.color, vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn fisheye_is_corrected_for_off_axis_columns() {
        // every column sees the same flat wall at forward distance 4
        let view = View::new(&Camera::default(), 64, 48);
        let walls = [wall(-50.0, 4.0, 50.0, 4.0)];
        for column in [0, 10, 32, 50, 63] {
            let hit = cast_column(&view, &walls, column).unwrap();
            assert!((hit.distance - 4.0).abs() < 1e-4, "column {column}: {}", hit.distance);
        }
    }

    #[test]
    fn walls_beyond_far_plane_are_ignored() {
        let mut cam = Camera::default();
        cam.far_plane = 3.0;
        let view = View::new(&cam, 64, 48);
        assert_eq!(cast_column(&view, &[wall(-5.0, 4.0, 5.0, 4.0)], 32), None);
    }

    #[test]
    fn wall_pass_fills_centre_and_marks_stencil() {
        let mut sw = fixtures::software(32, 24);
        let textures = fixtures::textures();
        let level = fixtures::corridor();
        let cam = Camera::default();

        sw.begin_frame(32, 24);
        let view = View::new(&cam, 32, 24);
        sw.draw_walls(&view, Scene { level: &level, textures: &textures });

        let fb = sw.buffers();
        let centre = fb.index(16, 12);
        assert_eq!(fb.stencil[centre], STENCIL_WALL);
        assert!((fb.depth[centre] - 4.0 / cam.far_plane).abs() < 1e-5);
        assert_eq!(fb.screen[centre], sw.config().pixel_format.pack(fixtures::WALL_RGB));

        // wall spans rows ±(1 / 4 · 24 / 2) around the centre; the top row is free
        let top = fb.index(16, 0);
        assert_eq!(fb.stencil[top], 0);
        assert_eq!(fb.depth[top], FAR_DEPTH);
        assert_eq!(sw.column_hits().len(), 32);
    }
}
