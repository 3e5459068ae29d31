use core_types::ObjectType;

/// Threshold below which a numeric quantity is treated as zero when deciding degeneracy.
pub const DEGENERACY_EPSILON: f64 = 1e-9;

/// Relative comparison, absolute for magnitudes below one.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * 1f64.max(a.abs()).max(b.abs())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.sub(other).norm()
    }

    pub fn unit(self) -> Option<Point> {
        let norm = self.norm();
        if norm < DEGENERACY_EPSILON {
            None
        } else {
            Some(self.scale(1.0 / norm))
        }
    }

    pub fn perpendicular(self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        approx_eq(self.x, other.x, tolerance) && approx_eq(self.y, other.y, tolerance)
    }
}

/// `a·x + b·y + c = 0` with `(a, b)` of unit length and a fixed sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    a: f64,
    b: f64,
    c: f64,
}

impl Line {
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Option<Line> {
        let norm = a.hypot(b);
        if !(norm >= DEGENERACY_EPSILON) || !c.is_finite() {
            return None;
        }
        let (mut a, mut b, mut c) = (a / norm, b / norm, c / norm);
        if a < -DEGENERACY_EPSILON || (a.abs() <= DEGENERACY_EPSILON && b < 0.0) {
            a = -a;
            b = -b;
            c = -c;
        }
        Some(Line { a, b, c })
    }

    pub fn through(p: Point, q: Point) -> Option<Line> {
        let direction = q.sub(p).unit()?;
        Self::from_point_and_direction(p, direction)
    }

    pub fn from_point_and_direction(p: Point, direction: Point) -> Option<Line> {
        Self::from_point_and_normal(p, direction.perpendicular())
    }

    pub fn from_point_and_normal(p: Point, normal: Point) -> Option<Line> {
        Self::from_coefficients(normal.x, normal.y, -(normal.x * p.x + normal.y * p.y))
    }

    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    pub fn normal(&self) -> Point {
        Point::new(self.a, self.b)
    }

    pub fn direction(&self) -> Point {
        self.normal().perpendicular()
    }

    pub fn signed_distance(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    pub fn project(&self, p: Point) -> Point {
        p.sub(self.normal().scale(self.signed_distance(p)))
    }

    pub fn reflect(&self, p: Point) -> Point {
        p.sub(self.normal().scale(2.0 * self.signed_distance(p)))
    }

    pub fn intersection(&self, other: &Line) -> Option<Point> {
        let det = self.a * other.b - other.a * self.b;
        if det.abs() < DEGENERACY_EPSILON {
            return None;
        }
        Some(Point::new(
            (self.b * other.c - other.b * self.c) / det,
            (self.c * other.a - self.a * other.c) / det,
        ))
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    pub fn approx_eq(&self, other: &Line, tolerance: f64) -> bool {
        let same = approx_eq(self.a, other.a, tolerance)
            && approx_eq(self.b, other.b, tolerance)
            && approx_eq(self.c, other.c, tolerance);
        // near-vertical lines may land on either side of the sign convention
        let flipped = approx_eq(self.a, -other.a, tolerance)
            && approx_eq(self.b, -other.b, tolerance)
            && approx_eq(self.c, -other.c, tolerance);
        same || flipped
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Option<Circle> {
        if radius.is_finite() && radius > DEGENERACY_EPSILON && center.is_finite() {
            Some(Circle { center, radius })
        } else {
            None
        }
    }

    pub fn through(a: Point, b: Point, c: Point) -> Option<Circle> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < DEGENERACY_EPSILON {
            return None;
        }
        let (a2, b2, c2) = (a.dot(a), b.dot(b), c.dot(c));
        let center = Point::new(
            (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
            (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
        );
        Circle::new(center, center.distance(a))
    }

    pub fn approx_eq(&self, other: &Circle, tolerance: f64) -> bool {
        self.center.approx_eq(other.center, tolerance)
            && approx_eq(self.radius, other.radius, tolerance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnalyticObject {
    Point(Point),
    Line(Line),
    Circle(Circle),
}

impl AnalyticObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Point(_) => ObjectType::Point,
            Self::Line(_) => ObjectType::Line,
            Self::Circle(_) => ObjectType::Circle,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<Line> {
        match self {
            Self::Line(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<Circle> {
        match self {
            Self::Circle(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Self::Point(p) => p.is_finite(),
            Self::Line(l) => l.is_finite(),
            Self::Circle(c) => c.center.is_finite() && c.radius.is_finite(),
        }
    }

    /// Objects of different types are never equal.
    pub fn approx_eq(&self, other: &AnalyticObject, tolerance: f64) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a.approx_eq(*b, tolerance),
            (Self::Line(a), Self::Line(b)) => a.approx_eq(b, tolerance),
            (Self::Circle(a), Self::Circle(b)) => a.approx_eq(b, tolerance),
            _ => false,
        }
    }
}
