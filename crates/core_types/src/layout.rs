use serde::{Deserialize, Serialize};

use crate::object::ObjectType;

/// Relabeling of loose objects: loose index `i` maps to `images[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    pub fn identity(size: usize) -> Self {
        Self {
            images: (0..size).collect(),
        }
    }

    /// `None` unless `images` is a permutation of `0..images.len()`.
    pub fn from_images(images: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; images.len()];
        for &image in &images {
            let slot = seen.get_mut(image)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self { images })
    }

    /// All permutations of `size` elements in lexicographic order, identity first.
    pub fn all(size: usize) -> Vec<Self> {
        let mut out = Vec::new();
        let mut current = (0..size).collect::<Vec<_>>();
        loop {
            out.push(Self {
                images: current.clone(),
            });
            if !next_lexicographic(&mut current) {
                return out;
            }
        }
    }

    pub fn image(&self, index: usize) -> usize {
        self.images.get(index).copied().unwrap_or(index)
    }

    pub fn images(&self) -> &[usize] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.images.iter().enumerate().all(|(i, image)| i == *image)
    }
}

fn next_lexicographic(values: &mut [usize]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let mut pivot = values.len() - 1;
    while pivot > 0 && values[pivot - 1] >= values[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let mut successor = values.len() - 1;
    while values[successor] <= values[pivot - 1] {
        successor -= 1;
    }
    values.swap(pivot - 1, successor);
    values[pivot..].reverse();
    true
}

fn dihedral_square() -> Vec<Permutation> {
    let mut out = Vec::with_capacity(8);
    for shift in 0..4 {
        out.push(Permutation {
            images: (0..4).map(|i| (i + shift) % 4).collect(),
        });
    }
    for axis in 0..4 {
        out.push(Permutation {
            images: (0..4).map(|i| (axis + 4 - i) % 4).collect(),
        });
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LooseObjectLayout {
    LineSegment,
    Triangle,
    /// Right angle at the first point.
    RightTriangle,
    Quadrilateral,
    CyclicQuadrilateral,
    LineAndPoint,
    LineAndTwoPoints,
}

impl LooseObjectLayout {
    pub const ALL: [LooseObjectLayout; 7] = [
        Self::LineSegment,
        Self::Triangle,
        Self::RightTriangle,
        Self::Quadrilateral,
        Self::CyclicQuadrilateral,
        Self::LineAndPoint,
        Self::LineAndTwoPoints,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LineSegment => "LineSegment",
            Self::Triangle => "Triangle",
            Self::RightTriangle => "RightTriangle",
            Self::Quadrilateral => "Quadrilateral",
            Self::CyclicQuadrilateral => "CyclicQuadrilateral",
            Self::LineAndPoint => "LineAndPoint",
            Self::LineAndTwoPoints => "LineAndTwoPoints",
        }
    }

    pub fn object_types(self) -> Vec<ObjectType> {
        use ObjectType::{Line, Point};
        match self {
            Self::LineSegment => vec![Point, Point],
            Self::Triangle | Self::RightTriangle => vec![Point, Point, Point],
            Self::Quadrilateral | Self::CyclicQuadrilateral => vec![Point, Point, Point, Point],
            Self::LineAndPoint => vec![Line, Point],
            Self::LineAndTwoPoints => vec![Line, Point, Point],
        }
    }

    /// Relabelings under which the layout is indistinguishable. Identity comes first.
    pub fn symmetry_permutations(self) -> Vec<Permutation> {
        match self {
            Self::LineSegment => Permutation::all(2),
            Self::Triangle => Permutation::all(3),
            Self::RightTriangle => vec![
                Permutation::identity(3),
                Permutation {
                    images: vec![0, 2, 1],
                },
            ],
            Self::Quadrilateral | Self::CyclicQuadrilateral => dihedral_square(),
            Self::LineAndPoint => vec![Permutation::identity(2)],
            Self::LineAndTwoPoints => vec![
                Permutation::identity(3),
                Permutation {
                    images: vec![0, 2, 1],
                },
            ],
        }
    }

    /// Display label of the loose object at `index`.
    pub fn label(self, index: usize) -> String {
        match self {
            Self::LineAndPoint | Self::LineAndTwoPoints if index == 0 => "l".to_string(),
            Self::LineAndPoint | Self::LineAndTwoPoints => letter(index - 1),
            _ => letter(index),
        }
    }
}

fn letter(index: usize) -> String {
    let letters = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
    match letters.get(index) {
        Some(c) => c.to_string(),
        None => format!("X{index}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{LooseObjectLayout, Permutation};

    #[test]
    fn all_permutations_of_three() {
        let perms = Permutation::all(3);
        assert_eq!(perms.len(), 6);
        assert!(perms[0].is_identity());
        let distinct = perms.iter().cloned().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn from_images_rejects_non_permutations() {
        assert!(Permutation::from_images(vec![1, 0, 2]).is_some());
        assert!(Permutation::from_images(vec![1, 1, 2]).is_none());
        assert!(Permutation::from_images(vec![0, 3, 1]).is_none());
    }

    #[test]
    fn layouts_declare_identity_first_and_consistent_types() {
        for layout in LooseObjectLayout::ALL {
            let perms = layout.symmetry_permutations();
            assert!(perms[0].is_identity(), "{layout:?}");
            let types = layout.object_types();
            for perm in &perms {
                assert_eq!(perm.len(), types.len());
                for (index, object_type) in types.iter().enumerate() {
                    assert_eq!(types[perm.image(index)], *object_type, "{layout:?}");
                }
            }
        }
    }

    #[test]
    fn quadrilateral_symmetries_form_dihedral_group() {
        let perms = LooseObjectLayout::Quadrilateral.symmetry_permutations();
        assert_eq!(perms.len(), 8);
        let distinct = perms.iter().cloned().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 8);
        assert!(!distinct.contains(&Permutation::from_images(vec![1, 0, 2, 3]).expect("perm")));
    }

    #[test]
    fn labels_follow_layout_roles() {
        assert_eq!(LooseObjectLayout::Triangle.label(2), "C");
        assert_eq!(LooseObjectLayout::LineAndTwoPoints.label(0), "l");
        assert_eq!(LooseObjectLayout::LineAndTwoPoints.label(2), "B");
    }
}
