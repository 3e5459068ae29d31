use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arguments::Arguments;
use crate::composed::standard_composed_constructions;
use crate::error::ConfigurationError;
use crate::object::{ObjectId, ObjectType};
use crate::signature::{Parameter, Signature};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PredefinedConstructionType {
    Midpoint,
    LineFromPoints,
    IntersectionOfLines,
    IntersectionOfLinesFromPoints,
    PerpendicularBisector,
    PerpendicularLine,
    ParallelLine,
    PerpendicularProjection,
    PerpendicularDrop,
    PointReflection,
    ReflectionInLine,
    Circumcircle,
    CircleWithCenterThroughPoint,
    CenterOfCircle,
    InternalAngleBisector,
    SecondIntersectionOfCircleAndLineFromPoints,
    SecondIntersectionOfTwoCircumcircles,
}

fn point() -> Parameter {
    Parameter::object(ObjectType::Point)
}

fn line() -> Parameter {
    Parameter::object(ObjectType::Line)
}

fn circle() -> Parameter {
    Parameter::object(ObjectType::Circle)
}

fn points(count: usize) -> Parameter {
    Parameter::set(count, point())
}

impl PredefinedConstructionType {
    pub const ALL: [PredefinedConstructionType; 17] = [
        Self::Midpoint,
        Self::LineFromPoints,
        Self::IntersectionOfLines,
        Self::IntersectionOfLinesFromPoints,
        Self::PerpendicularBisector,
        Self::PerpendicularLine,
        Self::ParallelLine,
        Self::PerpendicularProjection,
        Self::PerpendicularDrop,
        Self::PointReflection,
        Self::ReflectionInLine,
        Self::Circumcircle,
        Self::CircleWithCenterThroughPoint,
        Self::CenterOfCircle,
        Self::InternalAngleBisector,
        Self::SecondIntersectionOfCircleAndLineFromPoints,
        Self::SecondIntersectionOfTwoCircumcircles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Midpoint => "Midpoint",
            Self::LineFromPoints => "LineFromPoints",
            Self::IntersectionOfLines => "IntersectionOfLines",
            Self::IntersectionOfLinesFromPoints => "IntersectionOfLinesFromPoints",
            Self::PerpendicularBisector => "PerpendicularBisector",
            Self::PerpendicularLine => "PerpendicularLine",
            Self::ParallelLine => "ParallelLine",
            Self::PerpendicularProjection => "PerpendicularProjection",
            Self::PerpendicularDrop => "PerpendicularDrop",
            Self::PointReflection => "PointReflection",
            Self::ReflectionInLine => "ReflectionInLine",
            Self::Circumcircle => "Circumcircle",
            Self::CircleWithCenterThroughPoint => "CircleWithCenterThroughPoint",
            Self::CenterOfCircle => "CenterOfCircle",
            Self::InternalAngleBisector => "InternalAngleBisector",
            Self::SecondIntersectionOfCircleAndLineFromPoints => {
                "SecondIntersectionOfCircleAndLineFromPoints"
            }
            Self::SecondIntersectionOfTwoCircumcircles => "SecondIntersectionOfTwoCircumcircles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn signature(self) -> Signature {
        let parameters = match self {
            Self::Midpoint | Self::LineFromPoints | Self::PerpendicularBisector => vec![points(2)],
            Self::IntersectionOfLines => vec![Parameter::set(2, line())],
            Self::IntersectionOfLinesFromPoints => vec![Parameter::set(2, points(2))],
            Self::PerpendicularLine
            | Self::ParallelLine
            | Self::PerpendicularProjection
            | Self::PerpendicularDrop => vec![point(), line()],
            Self::PointReflection | Self::CircleWithCenterThroughPoint => vec![point(), point()],
            Self::ReflectionInLine => vec![line(), point()],
            Self::Circumcircle => vec![points(3)],
            Self::CenterOfCircle => vec![circle()],
            Self::InternalAngleBisector => vec![point(), points(2)],
            Self::SecondIntersectionOfCircleAndLineFromPoints => {
                vec![point(), point(), points(2)]
            }
            Self::SecondIntersectionOfTwoCircumcircles => {
                vec![point(), Parameter::set(2, points(2))]
            }
        };
        Signature::new(parameters)
    }

    pub fn outputs(self) -> Vec<ObjectType> {
        match self {
            Self::LineFromPoints
            | Self::PerpendicularBisector
            | Self::PerpendicularLine
            | Self::ParallelLine
            | Self::InternalAngleBisector => vec![ObjectType::Line],
            Self::Circumcircle | Self::CircleWithCenterThroughPoint => vec![ObjectType::Circle],
            Self::PerpendicularDrop => vec![ObjectType::Point, ObjectType::Line],
            Self::Midpoint
            | Self::IntersectionOfLines
            | Self::IntersectionOfLinesFromPoints
            | Self::PerpendicularProjection
            | Self::PointReflection
            | Self::ReflectionInLine
            | Self::CenterOfCircle
            | Self::SecondIntersectionOfCircleAndLineFromPoints
            | Self::SecondIntersectionOfTwoCircumcircles => vec![ObjectType::Point],
        }
    }
}

/// One step of a composed construction. Argument identities are local indices:
/// the flattened inputs first, then the outputs of earlier steps.
#[derive(Clone, Debug)]
pub struct ComposedStep {
    pub construction: Arc<Construction>,
    pub arguments: Arguments,
}

#[derive(Clone, Debug)]
pub struct ComposedDefinition {
    pub steps: Vec<ComposedStep>,
    pub results: Vec<usize>,
}

#[derive(Clone, Debug)]
pub enum ConstructionBody {
    Predefined(PredefinedConstructionType),
    Composed(ComposedDefinition),
}

#[derive(Clone, Debug)]
pub struct Construction {
    name: String,
    signature: Signature,
    outputs: Vec<ObjectType>,
    body: ConstructionBody,
}

impl Construction {
    pub fn predefined(kind: PredefinedConstructionType) -> Arc<Self> {
        Arc::new(Self {
            name: kind.name().to_string(),
            signature: kind.signature(),
            outputs: kind.outputs(),
            body: ConstructionBody::Predefined(kind),
        })
    }

    pub fn composed(
        name: impl Into<String>,
        signature: Signature,
        definition: ComposedDefinition,
    ) -> Result<Arc<Self>, ConfigurationError> {
        let name = name.into();
        let malformed = |reason: String| ConfigurationError::MalformedComposition {
            construction: name.clone(),
            reason,
        };

        let mut local_types = signature.leaf_types();
        for step in &definition.steps {
            step.construction
                .signature()
                .validate(step.construction.name(), &step.arguments, |id| {
                    local_types.get(id.as_u64() as usize).copied()
                })
                .map_err(|err| malformed(err.to_string()))?;
            local_types.extend(step.construction.outputs().iter().copied());
        }

        if definition.results.is_empty() {
            return Err(malformed("no results".to_string()));
        }
        let mut outputs = Vec::with_capacity(definition.results.len());
        for index in &definition.results {
            let object_type = local_types
                .get(*index)
                .copied()
                .ok_or_else(|| malformed(format!("result {index} is not defined")))?;
            outputs.push(object_type);
        }

        Ok(Arc::new(Self {
            name,
            signature,
            outputs,
            body: ConstructionBody::Composed(definition),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn outputs(&self) -> &[ObjectType] {
        &self.outputs
    }

    pub fn body(&self) -> &ConstructionBody {
        &self.body
    }

    pub fn is_multi_output(&self) -> bool {
        self.outputs.len() > 1
    }

    /// Structural key of the construction. Predefined constructions are keyed by
    /// name; composed ones also carry their steps and results, so two definitions
    /// sharing a name never share object identities.
    pub fn identity_key(&self) -> String {
        match &self.body {
            ConstructionBody::Predefined(_) => self.name.clone(),
            ConstructionBody::Composed(definition) => {
                let steps = definition
                    .steps
                    .iter()
                    .map(|step| format!("{}({})", step.construction.identity_key(), step.arguments.normalized().key()))
                    .collect::<Vec<_>>()
                    .join(";");
                let results = definition
                    .results
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}[{steps}->{results}]", self.name)
            }
        }
    }
}

/// Local index helper for composed step arguments.
pub fn local(index: usize) -> ObjectId {
    ObjectId::from_u64(index as u64)
}

/// Looks up a predefined or shipped composed construction by name.
pub fn construction_by_name(name: &str) -> Option<Arc<Construction>> {
    if let Some(kind) = PredefinedConstructionType::from_name(name) {
        return Some(Construction::predefined(kind));
    }
    standard_composed_constructions()
        .into_iter()
        .find(|construction| construction.name() == name)
}
