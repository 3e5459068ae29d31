use crate::analytic::{AnalyticObject, Circle, DEGENERACY_EPSILON, Line, Point};

type Outputs = Option<Vec<AnalyticObject>>;

fn point(inputs: &[AnalyticObject], index: usize) -> Option<Point> {
    inputs.get(index)?.as_point()
}

fn line(inputs: &[AnalyticObject], index: usize) -> Option<Line> {
    inputs.get(index)?.as_line()
}

fn distinct(a: Point, b: Point) -> Option<()> {
    (a.distance(b) >= DEGENERACY_EPSILON).then_some(())
}

fn one_point(p: Point) -> Outputs {
    Some(vec![AnalyticObject::Point(p)])
}

fn one_line(l: Line) -> Outputs {
    Some(vec![AnalyticObject::Line(l)])
}

pub(crate) fn midpoint(inputs: &[AnalyticObject]) -> Outputs {
    let (a, b) = (point(inputs, 0)?, point(inputs, 1)?);
    distinct(a, b)?;
    one_point(a.add(b).scale(0.5))
}

pub(crate) fn line_from_points(inputs: &[AnalyticObject]) -> Outputs {
    one_line(Line::through(point(inputs, 0)?, point(inputs, 1)?)?)
}

pub(crate) fn intersection_of_lines(inputs: &[AnalyticObject]) -> Outputs {
    one_point(line(inputs, 0)?.intersection(&line(inputs, 1)?)?)
}

pub(crate) fn intersection_of_lines_from_points(inputs: &[AnalyticObject]) -> Outputs {
    let first = Line::through(point(inputs, 0)?, point(inputs, 1)?)?;
    let second = Line::through(point(inputs, 2)?, point(inputs, 3)?)?;
    one_point(first.intersection(&second)?)
}

pub(crate) fn perpendicular_bisector(inputs: &[AnalyticObject]) -> Outputs {
    let (a, b) = (point(inputs, 0)?, point(inputs, 1)?);
    distinct(a, b)?;
    one_line(Line::from_point_and_normal(a.add(b).scale(0.5), b.sub(a))?)
}

pub(crate) fn perpendicular_line(inputs: &[AnalyticObject]) -> Outputs {
    let (p, l) = (point(inputs, 0)?, line(inputs, 1)?);
    one_line(Line::from_point_and_direction(p, l.normal())?)
}

pub(crate) fn parallel_line(inputs: &[AnalyticObject]) -> Outputs {
    let (p, l) = (point(inputs, 0)?, line(inputs, 1)?);
    one_line(Line::from_point_and_normal(p, l.normal())?)
}

pub(crate) fn perpendicular_projection(inputs: &[AnalyticObject]) -> Outputs {
    let (p, l) = (point(inputs, 0)?, line(inputs, 1)?);
    one_point(l.project(p))
}

pub(crate) fn perpendicular_drop(inputs: &[AnalyticObject]) -> Outputs {
    let (p, l) = (point(inputs, 0)?, line(inputs, 1)?);
    let perpendicular = Line::from_point_and_direction(p, l.normal())?;
    Some(vec![
        AnalyticObject::Point(l.project(p)),
        AnalyticObject::Line(perpendicular),
    ])
}

pub(crate) fn point_reflection(inputs: &[AnalyticObject]) -> Outputs {
    let (a, center) = (point(inputs, 0)?, point(inputs, 1)?);
    distinct(a, center)?;
    one_point(center.scale(2.0).sub(a))
}

pub(crate) fn reflection_in_line(inputs: &[AnalyticObject]) -> Outputs {
    let (l, p) = (line(inputs, 0)?, point(inputs, 1)?);
    one_point(l.reflect(p))
}

pub(crate) fn circumcircle(inputs: &[AnalyticObject]) -> Outputs {
    let circle = Circle::through(point(inputs, 0)?, point(inputs, 1)?, point(inputs, 2)?)?;
    Some(vec![AnalyticObject::Circle(circle)])
}

pub(crate) fn circle_with_center_through_point(inputs: &[AnalyticObject]) -> Outputs {
    let (center, p) = (point(inputs, 0)?, point(inputs, 1)?);
    let circle = Circle::new(center, center.distance(p))?;
    Some(vec![AnalyticObject::Circle(circle)])
}

pub(crate) fn center_of_circle(inputs: &[AnalyticObject]) -> Outputs {
    one_point(inputs.first()?.as_circle()?.center)
}

pub(crate) fn internal_angle_bisector(inputs: &[AnalyticObject]) -> Outputs {
    let (vertex, b, c) = (point(inputs, 0)?, point(inputs, 1)?, point(inputs, 2)?);
    let towards_b = b.sub(vertex).unit()?;
    let towards_c = c.sub(vertex).unit()?;
    let direction = towards_b.add(towards_c).unit()?;
    one_line(Line::from_point_and_direction(vertex, direction)?)
}

/// Line `AB` meets the circle `ACD` again at the returned point.
pub(crate) fn second_intersection_of_circle_and_line_from_points(
    inputs: &[AnalyticObject],
) -> Outputs {
    let (a, b) = (point(inputs, 0)?, point(inputs, 1)?);
    let circle = Circle::through(a, point(inputs, 2)?, point(inputs, 3)?)?;
    let direction = b.sub(a).unit()?;
    let t = -2.0 * a.sub(circle.center).dot(direction);
    if t.abs() < DEGENERACY_EPSILON {
        return None;
    }
    one_point(a.add(direction.scale(t)))
}

/// Circles `ABC` and `ADE` meet again at the returned point.
pub(crate) fn second_intersection_of_two_circumcircles(inputs: &[AnalyticObject]) -> Outputs {
    let a = point(inputs, 0)?;
    let first = Circle::through(a, point(inputs, 1)?, point(inputs, 2)?)?;
    let second = Circle::through(a, point(inputs, 3)?, point(inputs, 4)?)?;
    let centers = Line::through(first.center, second.center)?;
    let other = centers.reflect(a);
    distinct(a, other)?;
    one_point(other)
}
