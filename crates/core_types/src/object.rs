use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arguments::Arguments;
use crate::construction::Construction;
use crate::error::ConfigurationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    Point,
    Line,
    Circle,
}

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [ObjectType::Point, ObjectType::Line, ObjectType::Circle];

    pub fn letter(self) -> char {
        match self {
            Self::Point => 'P',
            Self::Line => 'L',
            Self::Circle => 'C',
        }
    }
}

/// Process-wide object identity. Allocated once per structural key and never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub enum ObjectKind {
    Loose {
        index: usize,
    },
    Constructed {
        construction: Arc<Construction>,
        arguments: Arguments,
        output: usize,
    },
}

#[derive(Clone, Debug)]
pub struct ConfigurationObject {
    id: ObjectId,
    object_type: ObjectType,
    kind: ObjectKind,
}

impl ConfigurationObject {
    pub fn loose(id: ObjectId, index: usize, object_type: ObjectType) -> Self {
        Self {
            id,
            object_type,
            kind: ObjectKind::Loose { index },
        }
    }

    pub fn constructed(
        id: ObjectId,
        construction: Arc<Construction>,
        arguments: Arguments,
        output: usize,
    ) -> Result<Self, ConfigurationError> {
        let Some(object_type) = construction.outputs().get(output).copied() else {
            return Err(ConfigurationError::OutputOutOfRange {
                construction: construction.name().to_string(),
                output,
            });
        };
        Ok(Self {
            id,
            object_type,
            kind: ObjectKind::Constructed {
                construction,
                arguments,
                output,
            },
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_loose(&self) -> bool {
        matches!(self.kind, ObjectKind::Loose { .. })
    }

    pub fn construction(&self) -> Option<&Arc<Construction>> {
        match &self.kind {
            ObjectKind::Constructed { construction, .. } => Some(construction),
            ObjectKind::Loose { .. } => None,
        }
    }

    pub fn arguments(&self) -> Option<&Arguments> {
        match &self.kind {
            ObjectKind::Constructed { arguments, .. } => Some(arguments),
            ObjectKind::Loose { .. } => None,
        }
    }

    pub fn output(&self) -> Option<usize> {
        match &self.kind {
            ObjectKind::Constructed { output, .. } => Some(*output),
            ObjectKind::Loose { .. } => None,
        }
    }

    /// Leaf identities of the defining arguments, in flattened order.
    pub fn dependencies(&self) -> Vec<ObjectId> {
        self.arguments().map(Arguments::flatten).unwrap_or_default()
    }

    /// Whether both objects come out of the same construction application.
    pub fn same_source(&self, other: &ConfigurationObject) -> bool {
        match (&self.kind, &other.kind) {
            (
                ObjectKind::Constructed {
                    construction: left,
                    arguments: left_args,
                    ..
                },
                ObjectKind::Constructed {
                    construction: right,
                    arguments: right_args,
                    ..
                },
            ) => left.name() == right.name() && left_args.key() == right_args.key(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ConfigurationObject, ObjectId, ObjectType};
    use crate::{Argument, Arguments, Construction, ConfigurationError, PredefinedConstructionType};

    #[test]
    fn constructed_object_takes_type_from_output() {
        let construction = Construction::predefined(PredefinedConstructionType::PerpendicularDrop);
        let arguments = Arguments::new(vec![
            Argument::Object(ObjectId::from_u64(0)),
            Argument::Object(ObjectId::from_u64(1)),
        ]);
        let foot = ConfigurationObject::constructed(
            ObjectId::from_u64(5),
            Arc::clone(&construction),
            arguments.clone(),
            0,
        )
        .expect("foot");
        let line = ConfigurationObject::constructed(ObjectId::from_u64(6), construction, arguments, 1)
            .expect("line");

        assert_eq!(foot.object_type(), ObjectType::Point);
        assert_eq!(line.object_type(), ObjectType::Line);
        assert!(foot.same_source(&line));
        assert_eq!(foot.dependencies(), vec![ObjectId::from_u64(0), ObjectId::from_u64(1)]);
    }

    #[test]
    fn output_index_is_bounded() {
        let construction = Construction::predefined(PredefinedConstructionType::Midpoint);
        let err = ConfigurationObject::constructed(
            ObjectId::from_u64(3),
            construction,
            Arguments::new(Vec::new()),
            1,
        )
        .expect_err("out of range");
        assert!(matches!(err, ConfigurationError::OutputOutOfRange { output: 1, .. }));
    }
}
