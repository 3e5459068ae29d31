use std::f64::consts::TAU;

use core_types::LooseObjectLayout;
use rand::Rng;

use crate::analytic::{AnalyticObject, Line, Point};

/// Draws per layout before giving up on a well-shaped realization.
pub const MAX_LAYOUT_ATTEMPTS: usize = 64;

const COORDINATE_RANGE: f64 = 1.0;
const MIN_SEPARATION: f64 = 0.1;
/// Lower bound on twice the triangle area relative to its longest side squared.
const MIN_SHAPE_RATIO: f64 = 0.05;

/// Random positions for the loose objects of `layout`, in layout order.
/// Returns `None` when no well-shaped draw was found.
pub fn realize_layout<R: Rng + ?Sized>(
    layout: LooseObjectLayout,
    rng: &mut R,
) -> Option<Vec<AnalyticObject>> {
    (0..MAX_LAYOUT_ATTEMPTS).find_map(|_| draw(layout, rng))
}

fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
    Point::new(
        rng.random_range(-COORDINATE_RANGE..COORDINATE_RANGE),
        rng.random_range(-COORDINATE_RANGE..COORDINATE_RANGE),
    )
}

fn well_shaped(a: Point, b: Point, c: Point) -> bool {
    let longest = a.distance(b).max(b.distance(c)).max(c.distance(a));
    let shortest = a.distance(b).min(b.distance(c)).min(c.distance(a));
    shortest >= MIN_SEPARATION && b.sub(a).cross(c.sub(a)).abs() >= MIN_SHAPE_RATIO * longest * longest
}

fn points(values: &[Point]) -> Vec<AnalyticObject> {
    values.iter().copied().map(AnalyticObject::Point).collect()
}

fn draw<R: Rng + ?Sized>(layout: LooseObjectLayout, rng: &mut R) -> Option<Vec<AnalyticObject>> {
    match layout {
        LooseObjectLayout::LineSegment => {
            let (a, b) = (random_point(rng), random_point(rng));
            (a.distance(b) >= MIN_SEPARATION).then(|| points(&[a, b]))
        }
        LooseObjectLayout::Triangle => {
            let (a, b, c) = (random_point(rng), random_point(rng), random_point(rng));
            well_shaped(a, b, c).then(|| points(&[a, b, c]))
        }
        LooseObjectLayout::RightTriangle => {
            let a = random_point(rng);
            let angle = rng.random_range(0.0..TAU);
            let u = Point::new(angle.cos(), angle.sin());
            let b = a.add(u.scale(rng.random_range(0.3..COORDINATE_RANGE)));
            let c = a.add(u.perpendicular().scale(rng.random_range(0.3..COORDINATE_RANGE)));
            well_shaped(a, b, c).then(|| points(&[a, b, c]))
        }
        LooseObjectLayout::Quadrilateral => {
            let quad = [
                random_point(rng),
                random_point(rng),
                random_point(rng),
                random_point(rng),
            ];
            general_position(&quad).then(|| points(&quad))
        }
        LooseObjectLayout::CyclicQuadrilateral => {
            let center = random_point(rng).scale(0.5);
            let radius = rng.random_range(0.5..1.5);
            let mut angles = [0.0; 4].map(|_: f64| rng.random_range(0.0..TAU));
            angles.sort_by(f64::total_cmp);
            let quad = angles.map(|t| center.add(Point::new(t.cos(), t.sin()).scale(radius)));
            general_position(&quad).then(|| points(&quad))
        }
        LooseObjectLayout::LineAndPoint => {
            let line = Line::through(random_point(rng), random_point(rng))?;
            let p = random_point(rng);
            (line.signed_distance(p).abs() >= MIN_SEPARATION)
                .then(|| vec![AnalyticObject::Line(line), AnalyticObject::Point(p)])
        }
        LooseObjectLayout::LineAndTwoPoints => {
            let line = Line::through(random_point(rng), random_point(rng))?;
            let (a, b) = (random_point(rng), random_point(rng));
            let off_line = line.signed_distance(a).abs() >= MIN_SEPARATION
                && line.signed_distance(b).abs() >= MIN_SEPARATION;
            let not_parallel = Line::through(a, b)
                .and_then(|ab| ab.intersection(&line))
                .is_some();
            (off_line && not_parallel && a.distance(b) >= MIN_SEPARATION).then(|| {
                vec![
                    AnalyticObject::Line(line),
                    AnalyticObject::Point(a),
                    AnalyticObject::Point(b),
                ]
            })
        }
    }
}

fn general_position(quad: &[Point; 4]) -> bool {
    (0..4).all(|skip| {
        let rest = (0..4).filter(|i| *i != skip).map(|i| quad[i]).collect::<Vec<_>>();
        well_shaped(rest[0], rest[1], rest[2])
    })
}
