use super::{GroundLogic, GroundType, Landscape, Territory};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Width of the sandy shore band above the water level, in noise units.
const SHORE_BAND: f32 = 0.04;

impl Landscape {
    /// Seeded terrain: low noise becomes water ringed by sand, high noise
    /// becomes forest, with scattered rock outcrops and at least one pond.
    #[must_use]
    pub fn generate(
        width: u16,
        height: u16,
        seed: u64,
        density_cap: usize,
        water_level: f32,
        forest_level: f32,
        resource_max: u32,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut land = Self::new(width, height, density_cap, resource_max);

        let w = usize::from(width);
        for (idx, cell) in land.cells.iter_mut().enumerate() {
            let x = (idx % w) as f32;
            let y = (idx / w) as f32;
            let noise = Self::value_noise(x, y, seed);
            let ground = if noise < water_level {
                GroundType::Water
            } else if noise < water_level + SHORE_BAND {
                GroundType::Sand
            } else if noise > forest_level {
                GroundType::Forest
            } else {
                GroundType::Grass
            };
            *cell = Territory::new(ground, Self::initial_stock(ground, resource_max));
        }

        let area = land.cells.len();
        let pond_count = (area / 300).max(1);
        let rock_count = (area / 150).max(2);
        Self::scatter(&mut land, &mut rng, pond_count, GroundType::Water);
        Self::scatter(&mut land, &mut rng, rock_count, GroundType::Rock);

        tracing::debug!(
            width,
            height,
            seed,
            water = land.count_of(GroundType::Water),
            forest = land.count_of(GroundType::Forest),
            "Generated landscape"
        );
        land
    }

    fn initial_stock(ground: GroundType, resource_max: u32) -> u32 {
        if ground.regrowth_modifier() > 0 {
            resource_max
        } else {
            0
        }
    }

    /// Turns up to `count` random grass cells into `ground`.
    fn scatter(land: &mut Self, rng: &mut ChaCha8Rng, count: usize, ground: GroundType) {
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < count * 10 {
            let idx = rng.gen_range(0..land.cells.len());
            if land.cells[idx].ground() == GroundType::Grass {
                land.cells[idx] = Territory::new(ground, Self::initial_stock(ground, land.resource_max));
                placed += 1;
            }
            attempts += 1;
        }
    }

    fn count_of(&self, ground: GroundType) -> usize {
        self.cells.iter().filter(|c| c.ground() == ground).count()
    }

    pub(crate) fn value_noise(x: f32, y: f32, seed: u64) -> f32 {
        let n1 = Self::hash_noise(x * 0.15, y * 0.15, seed) * 0.5;
        let n2 = Self::hash_noise(x * 0.07, y * 0.07, seed.wrapping_add(1)) * 0.3;
        let n3 = Self::hash_noise(x * 0.03, y * 0.03, seed.wrapping_add(2)) * 0.2;
        (n1 + n2 + n3).clamp(0.0, 1.0)
    }

    fn hash_noise(x: f32, y: f32, seed: u64) -> f32 {
        let ix = x.floor() as i32;
        let iy = y.floor() as i32;
        let fx = x - x.floor();
        let fy = y - y.floor();
        // smoothstep
        let ux = fx * fx * (3.0 - 2.0 * fx);
        let uy = fy * fy * (3.0 - 2.0 * fy);
        let v00 = Self::lattice(ix, iy, seed);
        let v10 = Self::lattice(ix + 1, iy, seed);
        let v01 = Self::lattice(ix, iy + 1, seed);
        let v11 = Self::lattice(ix + 1, iy + 1, seed);
        let top = v00 + ux * (v10 - v00);
        let bottom = v01 + ux * (v11 - v01);
        top + uy * (bottom - top)
    }

    fn lattice(x: i32, y: i32, seed: u64) -> f32 {
        let n = (x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263)) as u32 as u64 ^ seed;
        let n = n.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let n = n ^ (n >> 29);
        (n & 0xFF_FFFF) as f32 / 0xFF_FFFF as f32
    }
}
