use std::sync::Arc;

use crate::arguments::{Argument, Arguments};
use crate::construction::{
    ComposedDefinition, ComposedStep, Construction, PredefinedConstructionType, local,
};
use crate::error::ConfigurationError;
use crate::object::ObjectType;
use crate::signature::{Parameter, Signature};

fn triangle_signature() -> Signature {
    Signature::new(vec![Parameter::set(3, Parameter::object(ObjectType::Point))])
}

fn obj(index: usize) -> Argument {
    Argument::Object(local(index))
}

fn pair(a: usize, b: usize) -> Argument {
    Argument::Set(vec![obj(a), obj(b)])
}

fn step(kind: PredefinedConstructionType, arguments: Vec<Argument>) -> ComposedStep {
    ComposedStep {
        construction: Construction::predefined(kind),
        arguments: Arguments::new(arguments),
    }
}

pub fn centroid() -> Result<Arc<Construction>, ConfigurationError> {
    use PredefinedConstructionType::*;
    Construction::composed(
        "Centroid",
        triangle_signature(),
        ComposedDefinition {
            steps: vec![
                step(Midpoint, vec![pair(1, 2)]),
                step(Midpoint, vec![pair(0, 2)]),
                step(
                    IntersectionOfLinesFromPoints,
                    vec![Argument::Set(vec![pair(0, 3), pair(1, 4)])],
                ),
            ],
            results: vec![5],
        },
    )
}

pub fn orthocenter() -> Result<Arc<Construction>, ConfigurationError> {
    use PredefinedConstructionType::*;
    Construction::composed(
        "Orthocenter",
        triangle_signature(),
        ComposedDefinition {
            steps: vec![
                step(LineFromPoints, vec![pair(1, 2)]),
                step(PerpendicularLine, vec![obj(0), obj(3)]),
                step(LineFromPoints, vec![pair(0, 2)]),
                step(PerpendicularLine, vec![obj(1), obj(5)]),
                step(IntersectionOfLines, vec![pair(4, 6)]),
            ],
            results: vec![7],
        },
    )
}

pub fn circumcenter() -> Result<Arc<Construction>, ConfigurationError> {
    use PredefinedConstructionType::*;
    Construction::composed(
        "Circumcenter",
        triangle_signature(),
        ComposedDefinition {
            steps: vec![
                step(PerpendicularBisector, vec![pair(0, 1)]),
                step(PerpendicularBisector, vec![pair(1, 2)]),
                step(IntersectionOfLines, vec![pair(3, 4)]),
            ],
            results: vec![5],
        },
    )
}

pub fn incenter() -> Result<Arc<Construction>, ConfigurationError> {
    use PredefinedConstructionType::*;
    Construction::composed(
        "Incenter",
        triangle_signature(),
        ComposedDefinition {
            steps: vec![
                step(InternalAngleBisector, vec![obj(0), pair(1, 2)]),
                step(InternalAngleBisector, vec![obj(1), pair(0, 2)]),
                step(IntersectionOfLines, vec![pair(3, 4)]),
            ],
            results: vec![5],
        },
    )
}

pub fn standard_composed_constructions() -> Vec<Arc<Construction>> {
    [centroid(), orthocenter(), circumcenter(), incenter()]
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}
