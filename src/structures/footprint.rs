//! Footprint and courtyard sizing
//!
//! Dimensions are drawn once here and passed by reference to every later
//! stage; nothing downstream re-derives them.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::{PlannerConfig, Span};
use crate::error::PlanError;
use super::types::{Courtyard, Door, Facing, Footprint, Orientation, Rect, Site};

fn draw(rng: &mut ChaCha8Rng, (lo, hi): Span) -> i32 {
    rng.gen_range(lo..=hi)
}

/// Draw the building rectangle around the site.
///
/// For a north-south building `width` runs along X and the door sits at the
/// middle of the `z_min` wall facing north. For east-west the axes swap and
/// the door sits at the middle of the `x_max` wall facing west.
pub fn plan_footprint(site: &Site, config: &PlannerConfig, rng: &mut ChaCha8Rng) -> Footprint {
    let width = draw(rng, config.width_range);
    let length = draw(rng, config.length_range);
    let wall_height = draw(rng, config.wall_height_range);
    let orientation = if rng.gen_bool(0.5) {
        Orientation::NorthSouth
    } else {
        Orientation::EastWest
    };

    let door_y = site.base_y + 1;
    let (rect, door) = match orientation {
        Orientation::NorthSouth => {
            let rect = Rect::centered(site.x, site.z, width / 2, length / 2);
            let door = Door {
                pos: [site.x, door_y, rect.z_min],
                facing: Facing::North,
            };
            (rect, door)
        }
        Orientation::EastWest => {
            let rect = Rect::centered(site.x, site.z, length / 2, width / 2);
            let door = Door {
                pos: [rect.x_max, door_y, site.z],
                facing: Facing::West,
            };
            (rect, door)
        }
    };

    log::debug!(
        "Footprint {}x{} ({}), walls {} high, door at {:?} facing {}",
        width,
        length,
        orientation.display_name(),
        wall_height,
        door.pos,
        door.facing.as_str()
    );

    Footprint {
        rect,
        width,
        length,
        wall_height,
        orientation,
        door,
        center: (site.x, site.z),
        platform_y: site.base_y,
    }
}

/// Square courtyard of side `min(width, length) / 2 - 2` around the centre.
///
/// Fails with `DegenerateCourtyard` when the size is not positive or when
/// the column ring around it would not fit inside the walls.
pub fn plan_courtyard(footprint: &Footprint) -> Result<Courtyard, PlanError> {
    let size = footprint.width.min(footprint.length) / 2 - 2;
    let degenerate = PlanError::DegenerateCourtyard {
        width: footprint.width,
        length: footprint.length,
        size,
    };
    if size <= 0 {
        return Err(degenerate);
    }

    let (cx, cz) = footprint.center;
    let courtyard = Courtyard {
        rect: Rect::centered(cx, cz, size / 2, size / 2),
        size,
    };
    if !footprint.rect.strictly_contains(&courtyard.frame()) {
        return Err(degenerate);
    }
    Ok(courtyard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const SITE: Site = Site { x: 50, z: -30, base_y: 64 };

    fn on_perimeter(rect: &Rect, x: i32, z: i32) -> bool {
        rect.contains(x, z) && (x == rect.x_min || x == rect.x_max || z == rect.z_min || z == rect.z_max)
    }

    #[test]
    fn test_dimensions_within_ranges() {
        let config = PlannerConfig::default();
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let fp = plan_footprint(&SITE, &config, &mut rng);
            assert!((19..=23).contains(&fp.width));
            assert!((19..=23).contains(&fp.length));
            assert!((4..=6).contains(&fp.wall_height));
            assert!((19..=23).contains(&fp.rect.span_x()));
            assert!((19..=23).contains(&fp.rect.span_z()));
            assert!(fp.rect.x_max > fp.rect.x_min && fp.rect.z_max > fp.rect.z_min);
        }
    }

    #[test]
    fn test_door_rule() {
        let config = PlannerConfig::default();
        let mut seen = [false, false];
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let fp = plan_footprint(&SITE, &config, &mut rng);
            let [dx, dy, dz] = fp.door.pos;
            assert_eq!(dy, SITE.base_y + 1);
            assert!(on_perimeter(&fp.rect, dx, dz));
            match fp.orientation {
                Orientation::NorthSouth => {
                    seen[0] = true;
                    assert_eq!(fp.door.facing, Facing::North);
                    assert_eq!((dx, dz), (SITE.x, fp.rect.z_min));
                }
                Orientation::EastWest => {
                    seen[1] = true;
                    assert_eq!(fp.door.facing, Facing::West);
                    assert_eq!((dx, dz), (fp.rect.x_max, SITE.z));
                }
            }
        }
        assert!(seen[0] && seen[1], "both orientations should occur");
    }

    #[test]
    fn test_courtyard_nested() {
        let config = PlannerConfig::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let fp = plan_footprint(&SITE, &config, &mut rng);
            let court = plan_courtyard(&fp).unwrap();
            assert_eq!(court.size, fp.width.min(fp.length) / 2 - 2);
            assert!(court.rect.area() > 0);
            assert!(fp.rect.strictly_contains(&court.frame()));
        }
    }

    #[test]
    fn test_minimum_footprint_courtyard() {
        let config = PlannerConfig {
            width_range: (19, 19),
            length_range: (19, 19),
            ..PlannerConfig::default()
        };
        let fp = plan_footprint(&SITE, &config, &mut ChaCha8Rng::seed_from_u64(0));
        let court = plan_courtyard(&fp).unwrap();
        assert_eq!(court.size, 7);
        assert_eq!(court.rect, Rect::centered(50, -30, 3, 3));
    }

    #[test]
    fn test_small_footprint_rejected() {
        let config = PlannerConfig {
            width_range: (5, 5),
            length_range: (9, 9),
            ..PlannerConfig::default()
        };
        let fp = plan_footprint(&SITE, &config, &mut ChaCha8Rng::seed_from_u64(0));
        let err = plan_courtyard(&fp).unwrap_err();
        assert!(matches!(err, PlanError::DegenerateCourtyard { size: 0, .. }));
    }
}
